//! CDP-style owned node tree.
//!
//! [`Node`] mirrors the Chrome DevTools Protocol `DOM.Node` shape, so a tree
//! fetched from a browser (or built by hand) can be converted without going
//! through an HTML string. It is lowered into the arena [`Document`] before
//! conversion.

use crate::document::{Document, NodeId};
use crate::TurndownError;

/// Node types matching DOM nodeType values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// Element node (nodeType = 1)
    Element = 1,
    /// Text node (nodeType = 3)
    Text = 3,
    /// CDATA section (nodeType = 4)
    CDataSection = 4,
    /// Comment node (nodeType = 8)
    Comment = 8,
    /// Document node (nodeType = 9)
    Document = 9,
    /// Document fragment node (nodeType = 11)
    DocumentFragment = 11,
}

impl TryFrom<u32> for NodeType {
    type Error = TurndownError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(NodeType::Element),
            3 => Ok(NodeType::Text),
            4 => Ok(NodeType::CDataSection),
            8 => Ok(NodeType::Comment),
            9 => Ok(NodeType::Document),
            11 => Ok(NodeType::DocumentFragment),
            other => Err(TurndownError::InvalidInput(format!(
                "unsupported nodeType {other}"
            ))),
        }
    }
}

/// A DOM node following the CDP DOM.Node structure.
#[derive(Debug, Clone)]
pub struct Node {
    pub node_type: NodeType,

    /// Uppercase for elements ("DIV"), "#text" / "#comment" otherwise
    pub node_name: String,

    /// Content of text, CDATA and comment nodes
    pub node_value: Option<String>,

    /// Flat `[name, value, name, value, ...]` list, elements only
    pub attributes: Option<Vec<String>>,

    pub children: Option<Vec<Node>>,
}

impl Node {
    pub fn element(tag_name: &str) -> Self {
        Self::element_with_attrs(tag_name, Vec::new())
    }

    pub fn element_with_attrs(tag_name: &str, attrs: Vec<(&str, &str)>) -> Self {
        let flat_attrs = attrs
            .into_iter()
            .flat_map(|(k, v)| [k.to_string(), v.to_string()])
            .collect();

        Self {
            node_type: NodeType::Element,
            node_name: tag_name.to_uppercase(),
            node_value: None,
            attributes: Some(flat_attrs),
            children: Some(Vec::new()),
        }
    }

    pub fn text(content: &str) -> Self {
        Self::leaf(NodeType::Text, "#text", content)
    }

    pub fn comment(content: &str) -> Self {
        Self::leaf(NodeType::Comment, "#comment", content)
    }

    pub fn cdata(content: &str) -> Self {
        Self::leaf(NodeType::CDataSection, "#cdata-section", content)
    }

    pub fn document_fragment() -> Self {
        Self {
            node_type: NodeType::DocumentFragment,
            node_name: "#document-fragment".to_string(),
            node_value: None,
            attributes: None,
            children: Some(Vec::new()),
        }
    }

    fn leaf(node_type: NodeType, name: &str, content: &str) -> Self {
        Self {
            node_type,
            node_name: name.to_string(),
            node_value: Some(content.to_string()),
            attributes: None,
            children: None,
        }
    }

    /// Builder-style [`add_child`](Self::add_child).
    pub fn with_child(mut self, child: Node) -> Self {
        self.add_child(child);
        self
    }

    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    pub fn is_text(&self) -> bool {
        self.node_type == NodeType::Text
    }

    /// Lowercase tag name
    pub fn tag_name(&self) -> String {
        self.node_name.to_lowercase()
    }

    /// Attribute value by case-insensitive name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attribute_pairs()
            .find(|(attr_name, _)| attr_name.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    /// Attribute `(name, value)` pairs in source order
    pub fn attribute_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .flat_map(|attrs| attrs.chunks_exact(2))
            .map(|pair| (pair[0].as_str(), pair[1].as_str()))
    }

    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().flat_map(|c| c.iter())
    }

    pub fn element_children(&self) -> impl Iterator<Item = &Node> {
        self.children().filter(|n| n.is_element())
    }

    pub fn add_child(&mut self, child: Node) {
        self.children.get_or_insert_with(Vec::new).push(child);
    }

    /// Set an attribute, replacing an existing value of the same name
    pub fn set_attr(&mut self, name: &str, value: &str) {
        let attrs = self.attributes.get_or_insert_with(Vec::new);
        if let Some(pair) = attrs
            .chunks_exact_mut(2)
            .find(|pair| pair[0].eq_ignore_ascii_case(name))
        {
            pair[1] = value.to_string();
            return;
        }
        attrs.push(name.to_string());
        attrs.push(value.to_string());
    }

    /// Text of this node and its descendants, comments excluded
    pub fn text_content(&self) -> String {
        match self.node_type {
            NodeType::Text | NodeType::CDataSection => self.node_value.clone().unwrap_or_default(),
            NodeType::Comment => String::new(),
            _ => self.children().map(Node::text_content).collect(),
        }
    }
}

impl From<&Node> for Document {
    /// Document and fragment nodes become the document root; any other node is
    /// placed as the root's only child.
    fn from(node: &Node) -> Self {
        let mut doc = Document::new();
        let root = doc.root_id();
        match node.node_type {
            NodeType::Document | NodeType::DocumentFragment => {
                for child in node.children() {
                    lower(&mut doc, root, child);
                }
            }
            _ => lower(&mut doc, root, node),
        }
        doc
    }
}

fn lower(doc: &mut Document, parent: NodeId, node: &Node) {
    let value = node.node_value.as_deref().unwrap_or_default();
    match node.node_type {
        NodeType::Element => {
            if let Some(id) = doc.append_element(parent, &node.node_name, node.attribute_pairs()) {
                for child in node.children() {
                    lower(doc, id, child);
                }
            }
        }
        NodeType::Text => {
            doc.append_text(parent, value);
        }
        NodeType::CDataSection => {
            doc.append_cdata(parent, value);
        }
        NodeType::Comment => {
            doc.append_comment(parent, value);
        }
        // A nested document has no DOM meaning; splice its children in place.
        NodeType::Document | NodeType::DocumentFragment => {
            for child in node.children() {
                lower(doc, parent, child);
            }
        }
    }
}
