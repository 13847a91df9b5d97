//! Document writer
//!
//! Output layout, with newlines enabled:
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <root a="1">
//! 	<leaf>text</leaf>
//! 	<parent>
//! 		<leaf></leaf>
//! 	</parent>
//! </root>
//! ```
//!
//! A leaf always goes on one line. Self-closing input comes back as an
//! empty leaf (`<c/>` is written `<c></c>`). With newlines disabled the
//! whole document is a single line with no tabs.

use std::io;

use tracing::debug;

use crate::model::{Document, Node, NodeId};

/// Output options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WriteConfig {
    /// Emit the `<?xml ...?>` line
    pub prolog: bool,
    /// Emit newlines and tab indentation
    pub new_lines: bool,
}

impl Default for WriteConfig {
    fn default() -> Self {
        Self {
            prolog: true,
            new_lines: true,
        }
    }
}

impl WriteConfig {
    pub const fn new(prolog: bool, new_lines: bool) -> Self {
        Self { prolog, new_lines }
    }

    /// Single line, no prolog
    pub const fn compact() -> Self {
        Self {
            prolog: false,
            new_lines: false,
        }
    }
}

/// Pending writer work, popped from the back of a stack
#[derive(Clone, Copy, Debug)]
enum Step {
    Open(NodeId, usize),
    Close(NodeId, usize),
}

/// Renders a document to text
#[derive(Debug)]
pub struct Writer<'d> {
    doc: &'d Document,
    config: WriteConfig,
}

impl<'d> Writer<'d> {
    pub const fn new(doc: &'d Document, config: WriteConfig) -> Self {
        Self { doc, config }
    }

    /// Render the whole document
    pub fn render(&self) -> String {
        let mut out = String::new();
        if self.config.prolog {
            out.push_str(&prolog(self.doc.version()));
            self.newline(&mut out);
        }

        let root = self.doc.root_node();
        push_start_tag(&mut out, root);
        self.newline(&mut out);
        self.write_children(&mut out, root, 1);
        push_end_tag(&mut out, root);
        self.newline(&mut out);

        debug!(bytes = out.len(), "rendered document");
        out
    }

    /// Render the document into a byte sink
    pub fn write_to<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(self.render().as_bytes())?;
        out.flush()
    }

    fn write_children(&self, out: &mut String, node: &Node, depth: usize) {
        let mut steps: Vec<Step> = node
            .children()
            .iter()
            .rev()
            .map(|&id| Step::Open(id, depth))
            .collect();

        while let Some(step) = steps.pop() {
            match step {
                Step::Open(id, depth) => {
                    let child = self.doc.node(id);
                    self.indent(out, depth);
                    push_start_tag(out, child);
                    if child.is_leaf() {
                        out.push_str(child.value());
                        push_end_tag(out, child);
                        self.newline(out);
                    } else {
                        self.newline(out);
                        steps.push(Step::Close(id, depth));
                        steps.extend(
                            child
                                .children()
                                .iter()
                                .rev()
                                .map(|&grandchild| Step::Open(grandchild, depth + 1)),
                        );
                    }
                }
                Step::Close(id, depth) => {
                    self.indent(out, depth);
                    push_end_tag(out, self.doc.node(id));
                    self.newline(out);
                }
            }
        }
    }

    fn indent(&self, out: &mut String, depth: usize) {
        if self.config.new_lines {
            out.extend(std::iter::repeat('\t').take(depth));
        }
    }

    fn newline(&self, out: &mut String) {
        if self.config.new_lines {
            out.push('\n');
        }
    }
}

/// The declaration line, without a trailing newline
pub fn prolog(version: &str) -> String {
    format!("<?xml version=\"{version}\" encoding=\"UTF-8\"?>")
}

fn push_start_tag(out: &mut String, node: &Node) {
    out.push('<');
    out.push_str(node.name());
    for attribute in node.attributes() {
        out.push(' ');
        out.push_str(attribute.name());
        out.push_str("=\"");
        out.push_str(attribute.value());
        out.push('"');
    }
    out.push('>');
}

fn push_end_tag(out: &mut String, node: &Node) {
    out.push_str("</");
    out.push_str(node.name());
    out.push('>');
}

impl Document {
    /// Render with the given options
    pub fn to_string_with(&self, config: WriteConfig) -> String {
        Writer::new(self, config).render()
    }

    /// Render a single subtree without prolog, as it would appear at depth 0
    pub fn subtree_to_string(&self, id: NodeId, config: WriteConfig) -> String {
        let mut out = String::new();
        let writer = Writer::new(self, config);
        let node = self.node(id);
        push_start_tag(&mut out, node);
        if node.is_leaf() {
            out.push_str(node.value());
        } else {
            writer.newline(&mut out);
            writer.write_children(&mut out, node, 1);
        }
        push_end_tag(&mut out, node);
        out
    }
}
