//! Document data model
//!
//! All nodes of a document live in one arena owned by the [`Document`] and
//! are addressed by [`NodeId`]. A `NodeId` returned by
//! [`Document::append_child`] stays valid when more children are appended
//! anywhere in the tree, so callers (and the parser's open-element stack)
//! can hold on to ids while the tree keeps growing.

/// Version written in the prolog when none was given
pub const DEFAULT_VERSION: &str = "1.0";

/// Handle to a node inside the [`Document`] that created it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in its document's arena
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A name/value pair on an element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    name: String,
    value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// A single element stored in the arena.
///
/// `value` only carries meaning on a leaf; the writer never emits it for a
/// node that has children.
#[derive(Clone, Debug, Default)]
pub struct Node {
    name: String,
    value: String,
    attributes: Vec<Attribute>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl Node {
    fn new(name: String, value: String, parent: Option<NodeId>) -> Self {
        Self {
            name,
            value,
            attributes: Vec::new(),
            children: Vec::new(),
            parent,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Append an attribute; duplicates are kept in insertion order
    pub fn add_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.attributes.push(Attribute::new(name, value));
        self
    }

    pub fn push_attribute(&mut self, attribute: Attribute) -> &mut Self {
        self.attributes.push(attribute);
        self
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Attribute at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[allow(clippy::indexing_slicing)]
    pub fn attribute(&self, index: usize) -> &Attribute {
        &self.attributes[index]
    }

    pub fn get_attribute(&self, index: usize) -> Option<&Attribute> {
        self.attributes.get(index)
    }

    /// Value of the first attribute called `name`
    pub fn attribute_value(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(Attribute::value)
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Child id at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[allow(clippy::indexing_slicing)]
    pub fn child(&self, index: usize) -> NodeId {
        self.children[index]
    }

    pub fn get_child(&self, index: usize) -> Option<NodeId> {
        self.children.get(index).copied()
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

/// A document: a version string and a single root element.
#[derive(Clone, Debug)]
pub struct Document {
    version: String,
    nodes: Vec<Node>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new("")
    }
}

impl Document {
    /// Create a document whose root is named `root_name`, with the default version
    pub fn new(root_name: impl Into<String>) -> Self {
        Self::with_version(root_name, DEFAULT_VERSION)
    }

    pub fn with_version(root_name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            nodes: vec![Node::new(root_name.into(), String::new(), None)],
            root: NodeId(0),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn set_version(&mut self, version: impl Into<String>) {
        self.version = version.into();
    }

    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Access a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by a different document.
    #[allow(clippy::indexing_slicing)]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Mutable access to a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by a different document.
    #[allow(clippy::indexing_slicing)]
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn root_node(&self) -> &Node {
        self.node(self.root)
    }

    pub fn root_node_mut(&mut self) -> &mut Node {
        let root = self.root;
        self.node_mut(root)
    }

    /// Append an empty child element to `parent` and return its id.
    ///
    /// # Panics
    ///
    /// Panics if `parent` was issued by a different document.
    pub fn append_child(&mut self, parent: NodeId, name: impl Into<String>) -> NodeId {
        self.append_child_with_value(parent, name, String::new())
    }

    /// Append a child element carrying text to `parent` and return its id.
    ///
    /// # Panics
    ///
    /// Panics if `parent` was issued by a different document.
    pub fn append_child_with_value(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(name.into(), value.into(), Some(parent)));
        self.node_mut(parent).children.push(id);
        id
    }

    /// First child of `parent` called `name`
    pub fn find_child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.node(parent)
            .children
            .iter()
            .copied()
            .find(|&child| self.node(child).name == name)
    }

    /// Number of elements in the document, root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Compare two subtrees by name, value, attributes and children, in order.
    /// Values of nodes with children are ignored.
    pub fn subtree_eq(&self, id: NodeId, other: &Self, other_id: NodeId) -> bool {
        let mut pending = vec![(id, other_id)];
        while let Some((left, right)) = pending.pop() {
            let (left, right) = (self.node(left), other.node(right));
            if left.name != right.name
                || left.attributes != right.attributes
                || left.children.len() != right.children.len()
            {
                return false;
            }
            if left.is_leaf() {
                if left.value != right.value {
                    return false;
                }
                continue;
            }
            pending.extend(left.children.iter().copied().zip(right.children.iter().copied()));
        }
        true
    }
}

/// Structural equality: arena layout does not matter.
impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version && self.subtree_eq(self.root, other, other.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document() {
        let doc = Document::new("root");
        assert_eq!(doc.version(), "1.0");
        assert_eq!(doc.root_node().name(), "root");
        assert!(doc.root_node().is_leaf());
        assert_eq!(doc.node_count(), 1);
    }

    #[test]
    fn test_child_ids_survive_sibling_growth() {
        let mut doc = Document::new("root");
        let root = doc.root();
        let first = doc.append_child_with_value(root, "first", "1");
        for i in 0..100 {
            doc.append_child(root, format!("n{i}"));
        }
        assert_eq!(doc.node(first).name(), "first");
        assert_eq!(doc.node(first).value(), "1");
        assert_eq!(doc.node(first).parent(), Some(root));
        assert_eq!(doc.root_node().child(0), first);
        assert_eq!(doc.root_node().child_count(), 101);
    }

    #[test]
    fn test_attributes_keep_order_and_duplicates() {
        let mut doc = Document::new("root");
        doc.root_node_mut()
            .add_attribute("b", "2")
            .add_attribute("a", "1")
            .add_attribute("b", "3");
        let root = doc.root_node();
        assert_eq!(root.attribute_count(), 3);
        assert_eq!(root.attribute(0), &Attribute::new("b", "2"));
        assert_eq!(root.attribute(2).value(), "3");
        assert_eq!(root.attribute_value("b"), Some("2"));
        assert_eq!(root.get_attribute(3), None);
    }

    #[test]
    #[should_panic]
    fn test_child_out_of_range_panics() {
        let doc = Document::new("root");
        let _ = doc.root_node().child(0);
    }

    #[test]
    fn test_find_child() {
        let mut doc = Document::new("task");
        let root = doc.root();
        doc.append_child_with_value(root, "name", "wash");
        let done = doc.append_child_with_value(root, "completed", "false");
        assert_eq!(doc.find_child(root, "completed"), Some(done));
        assert_eq!(doc.find_child(root, "missing"), None);
    }

    #[test]
    fn test_structural_equality_ignores_layout() {
        let mut left = Document::new("a");
        let la = left.root();
        let lb = left.append_child(la, "b");
        let lc = left.append_child(la, "c");
        left.append_child_with_value(lb, "x", "1");
        left.append_child_with_value(lc, "y", "2");

        let mut right = Document::new("a");
        let ra = right.root();
        let rb = right.append_child(ra, "b");
        right.append_child_with_value(rb, "x", "1");
        let rc = right.append_child(ra, "c");
        right.append_child_with_value(rc, "y", "2");

        assert_eq!(left, right);

        right.node_mut(rc).set_name("z");
        assert_ne!(left, right);
    }

    fn chain(depth: usize, leaf: &str) -> Document {
        let mut doc = Document::new("n");
        let mut parent = doc.root();
        for _ in 0..depth {
            parent = doc.append_child(parent, "n");
        }
        doc.node_mut(parent).set_value(leaf);
        doc
    }

    #[test]
    fn test_equality_of_very_deep_trees() {
        let left = chain(200_000, "x");
        assert_eq!(left, chain(200_000, "x"));
        assert_ne!(left, chain(200_000, "y"));
        assert_ne!(left, chain(199_999, "x"));
    }

    #[test]
    fn test_equality_ignores_value_on_parents() {
        let mut left = Document::new("a");
        let root = left.root();
        left.append_child(root, "b");
        let mut right = left.clone();
        right.root_node_mut().set_value("\t");
        assert_eq!(left, right);
    }
}
