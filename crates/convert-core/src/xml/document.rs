//! Owned arena tree for XML configuration documents
//!
//! Nodes live in a single `Vec` and are addressed by [`NodeId`]. Elements own
//! an ordered list of child ids. Lookups are plain functions over `&Document`
//! and never mutate; mutation goes through [`Document::append_element`] and
//! [`Document::set_attribute`].

/// Index of a node inside a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// A single `name="value"` pair, kept in source order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// Element node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<NodeId>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Value of the named attribute, if present
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }
}

/// Every kind of node the configuration documents contain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Unescaped character data
    Text(String),
    CData(String),
    Comment(String),
    ProcessingInstruction(String),
    /// Content of `<?xml ...?>` without the delimiters
    Declaration(String),
    DocType(String),
}

impl Node {
    /// Text made only of whitespace is layout, not content
    pub fn is_layout(&self) -> bool {
        matches!(self, Node::Text(text) if text.trim().is_empty())
    }
}

/// An XML document with exactly one root element
#[derive(Debug, Clone)]
pub struct Document {
    pub(crate) nodes: Vec<Node>,
    pub(crate) prolog: Vec<NodeId>,
    pub(crate) root: NodeId,
    pub(crate) epilog: Vec<NodeId>,
}

impl Document {
    /// Create a document holding only an empty root element
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            nodes: vec![Node::Element(Element::new(root_name))],
            prolog: Vec::new(),
            root: NodeId(0),
            epilog: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Nodes before the root element (declaration, comments, doctype)
    pub fn prolog(&self) -> &[NodeId] {
        &self.prolog
    }

    /// Nodes after the root element
    pub fn epilog(&self) -> &[NodeId] {
        &self.epilog
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match self.node(id) {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Tag name of an element node
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|element| element.name.as_str())
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|element| element.attribute(name))
    }

    /// Direct children of `id` that are elements, in document order
    pub fn child_elements(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.element(id)
            .map(|element| element.children.as_slice())
            .unwrap_or_default()
            .iter()
            .copied()
            .filter(move |child| self.element(*child).is_some())
    }

    /// First direct child element with the given tag name
    pub fn first_child_named(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.child_elements(id)
            .find(|child| self.name(*child) == Some(name))
    }

    /// Every element with the given tag name at any depth, root included,
    /// in document order.
    pub fn elements_named(&self, name: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut pending = vec![self.root];

        while let Some(id) = pending.pop() {
            if self.name(id) == Some(name) {
                found.push(id);
            }
            // Reverse so the leftmost child is visited first.
            pending.extend(self.child_elements(id).collect::<Vec<_>>().into_iter().rev());
        }

        found
    }

    /// Append a new element as the last child of `parent`
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not an element.
    pub fn append_element(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        attributes: &[(&str, &str)],
    ) -> NodeId {
        let mut element = Element::new(name);
        element.attributes = attributes
            .iter()
            .map(|(name, value)| Attribute {
                name: (*name).to_string(),
                value: (*value).to_string(),
            })
            .collect();

        let id = self.push(Node::Element(element));
        self.attach(parent, id);
        id
    }

    /// Set or overwrite an attribute on an element
    ///
    /// # Panics
    ///
    /// Panics if `id` is not an element.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        let value = value.into();
        let element = self.element_mut(id);
        match element.attributes.iter_mut().find(|attr| attr.name == name) {
            Some(attr) => attr.value = value,
            None => element.attributes.push(Attribute {
                name: name.to_string(),
                value,
            }),
        }
    }

    pub(crate) fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub(crate) fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.element_mut(parent).children.push(child);
    }

    fn element_mut(&mut self, id: NodeId) -> &mut Element {
        match &mut self.nodes[id.0] {
            Node::Element(element) => element,
            other => panic!("node {:?} is not an element: {:?}", id, other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        let mut doc = Document::new("server");
        let root = doc.root();
        let profiles = doc.append_element(root, "profiles", &[]);
        let first = doc.append_element(profiles, "profile", &[("name", "a")]);
        doc.append_element(first, "profile", &[("name", "nested")]);
        doc.append_element(profiles, "profile", &[("name", "b")]);
        doc
    }

    #[test]
    fn test_elements_named_in_document_order() {
        let doc = sample();
        let names: Vec<_> = doc
            .elements_named("profile")
            .into_iter()
            .map(|id| doc.attribute(id, "name").unwrap())
            .collect();

        assert_eq!(names, vec!["a", "nested", "b"]);
    }

    #[test]
    fn test_first_child_named_ignores_deeper_matches() {
        let doc = sample();
        assert!(doc.first_child_named(doc.root(), "profile").is_none());
        assert!(doc.first_child_named(doc.root(), "profiles").is_some());
    }

    #[test]
    fn test_set_attribute_overwrites_in_place() {
        let mut doc = Document::new("server");
        let root = doc.root();
        let scanner = doc.append_element(root, "deployment-scanner", &[("path", "deployments")]);
        doc.set_attribute(scanner, "deployment-timeout", "500");
        doc.set_attribute(scanner, "deployment-timeout", "1200");

        let element = doc.element(scanner).unwrap();
        assert_eq!(element.attributes.len(), 2);
        assert_eq!(element.attribute("deployment-timeout"), Some("1200"));
        assert_eq!(element.attributes[0].name, "path");
    }

    #[test]
    fn test_append_element_goes_last() {
        let mut doc = Document::new("extensions");
        let root = doc.root();
        doc.append_element(root, "extension", &[("module", "first")]);
        doc.append_element(root, "extension", &[("module", "second")]);

        let modules: Vec<_> = doc
            .child_elements(root)
            .filter_map(|id| doc.attribute(id, "module"))
            .collect();
        assert_eq!(modules, vec!["first", "second"]);
    }
}
