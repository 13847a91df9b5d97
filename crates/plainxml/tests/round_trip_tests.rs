use plainxml::{from_str, to_string, Document, ErrorKind, WriteConfig};

fn kind_of(input: &str) -> Option<ErrorKind> {
    from_str(input).err().map(|e| e.kind().clone())
}

#[test]
fn test_two_children_scenario() -> plainxml::Result<()> {
    let input = r#"<a><b>1</b><c x="1"></c></a>"#;
    let doc = from_str(input)?;

    let root = doc.root_node();
    assert_eq!(root.name(), "a");
    assert_eq!(root.child_count(), 2);

    let b = doc.node(root.child(0));
    assert_eq!(b.name(), "b");
    assert_eq!(b.value(), "1");
    assert!(b.is_leaf());
    assert_eq!(b.attribute_count(), 0);

    let c = doc.node(root.child(1));
    assert_eq!(c.name(), "c");
    assert_eq!(c.value(), "");
    assert!(c.is_leaf());
    assert_eq!(c.attribute_value("x"), Some("1"));

    assert_eq!(to_string(&doc, WriteConfig::compact()), input);
    Ok(())
}

#[test]
fn test_pretty_output_reparses_to_same_tree() -> plainxml::Result<()> {
    let doc = from_str(r#"<a k="v"><b><c>1</c><d>2</d></b><e>3</e></a>"#)?;
    let pretty = to_string(&doc, WriteConfig::default());
    assert_eq!(
        pretty,
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <a k=\"v\">\n\
         \t<b>\n\
         \t\t<c>1</c>\n\
         \t\t<d>2</d>\n\
         \t</b>\n\
         \t<e>3</e>\n\
         </a>\n"
    );
    assert_eq!(from_str(&pretty)?, doc);
    Ok(())
}

#[test]
fn test_self_closing_comes_back_as_empty_leaf() -> plainxml::Result<()> {
    let doc = from_str(r#"<a><c x="1"/><d/></a>"#)?;
    assert_eq!(doc.root_node().child_count(), 2);
    assert_eq!(
        to_string(&doc, WriteConfig::compact()),
        r#"<a><c x="1"></c><d></d></a>"#
    );
    Ok(())
}

#[test]
fn test_self_closing_root() -> plainxml::Result<()> {
    let doc = from_str(r#"<only a="1"/>"#)?;
    assert_eq!(doc.root_node().name(), "only");
    assert_eq!(doc.root_node().attribute_value("a"), Some("1"));
    assert_eq!(
        to_string(&doc, WriteConfig::compact()),
        r#"<only a="1"></only>"#
    );
    Ok(())
}

#[test]
fn test_whitespace_after_root_is_ignored() -> plainxml::Result<()> {
    let doc = from_str("<a><b>1</b></a>  \t ")?;
    assert_eq!(doc.root_node().child_count(), 1);
    Ok(())
}

#[test]
fn test_leaf_text_keeps_spaces() -> plainxml::Result<()> {
    let doc = from_str("<a><b>  two words </b></a>")?;
    assert_eq!(doc.node(doc.root_node().child(0)).value(), "  two words ");
    Ok(())
}

#[test]
fn test_text_is_not_unescaped() -> plainxml::Result<()> {
    let doc = from_str("<a><b>&lt;tag&gt; &amp;</b></a>")?;
    assert_eq!(doc.node(doc.root_node().child(0)).value(), "&lt;tag&gt; &amp;");
    assert_eq!(
        to_string(&doc, WriteConfig::compact()),
        "<a><b>&lt;tag&gt; &amp;</b></a>"
    );
    Ok(())
}

#[test]
fn test_document_without_prolog_defaults_version() -> plainxml::Result<()> {
    let doc = from_str("<a></a>")?;
    assert_eq!(doc.version(), "1.0");
    let doc = from_str("<?xml version=\"2.5\"?><a></a>")?;
    assert_eq!(doc.version(), "2.5");
    Ok(())
}

#[test]
fn test_built_tree_writes_like_parsed_tree() -> plainxml::Result<()> {
    let mut built = Document::new("a");
    let root = built.root();
    built.append_child_with_value(root, "b", "1");
    let c = built.append_child(root, "c");
    built.node_mut(c).add_attribute("x", "1");

    let parsed = from_str(r#"<a><b>1</b><c x="1"></c></a>"#)?;
    assert_eq!(built, parsed);
    assert_eq!(
        to_string(&built, WriteConfig::default()),
        to_string(&parsed, WriteConfig::default())
    );
    Ok(())
}

#[test]
fn test_crossed_tags_are_rejected() {
    assert_eq!(
        kind_of("<a><b></a></b>"),
        Some(ErrorKind::UnbalancedEndTag {
            expected: "</b>".to_string(),
            found: "</a>".to_string(),
        })
    );
}

#[test]
fn test_close_tag_match_is_exact() {
    assert!(matches!(
        kind_of("<a></A>"),
        Some(ErrorKind::UnbalancedEndTag { .. })
    ));
    assert!(matches!(
        kind_of("<a></a >"),
        Some(ErrorKind::UnbalancedEndTag { .. })
    ));
}

#[test]
fn test_missing_close_tag_is_rejected() {
    assert_eq!(
        kind_of("<a><b>1</b>"),
        Some(ErrorKind::UnclosedElement {
            name: "a".to_string()
        })
    );
}

#[test]
fn test_second_root_is_rejected() {
    assert_eq!(kind_of("<a></a><b></b>"), Some(ErrorKind::TrailingContent));
    assert_eq!(kind_of("<a/><b/>"), Some(ErrorKind::TrailingContent));
}

#[test]
fn test_text_before_root_is_rejected() {
    assert!(matches!(kind_of("hello<a></a>"), Some(ErrorKind::Expected { .. })));
    assert!(matches!(kind_of("</a>"), Some(ErrorKind::Expected { .. })));
}

#[test]
fn test_unterminated_tag_is_rejected() {
    assert_eq!(kind_of("<a><b"), Some(ErrorKind::UnterminatedTag));
}
