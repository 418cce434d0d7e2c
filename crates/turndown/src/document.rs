//! Arena-backed DOM.
//!
//! Every node lives in one `Vec` and is addressed by its [`NodeId`]. Parsers
//! and the CDP-style [`Node`](crate::Node) tree are lowered into a
//! [`Document`], and the converter walks it through [`NodeRef`] views.

use std::fmt;

use indexmap::IndexMap;

use crate::dom::{DomNode, NodeKind};

/// Stable index of a node inside its [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    tag: String,
    text: String,
    attributes: IndexMap<String, String>,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    previous_sibling: Option<NodeId>,
    next_sibling: Option<NodeId>,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            tag: String::new(),
            text: String::new(),
            attributes: IndexMap::new(),
            parent: None,
            first_child: None,
            last_child: None,
            previous_sibling: None,
            next_sibling: None,
        }
    }
}

/// An owned, parsed HTML tree.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
}

impl Document {
    /// Create a document holding only its root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData::new(NodeKind::Document)],
        }
    }

    /// Id of the root node.
    pub fn root_id(&self) -> NodeId {
        NodeId(0)
    }

    /// View of the root node.
    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            doc: self,
            id: self.root_id(),
        }
    }

    /// View of any node, or `None` for an id from another document.
    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        (id.0 < self.nodes.len()).then_some(NodeRef { doc: self, id })
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Append an element with the given attributes under `parent`.
    ///
    /// Tag and attribute names are lowercased. A repeated attribute name keeps
    /// its first value, as HTML parsers do. Returns `None` when `parent` does
    /// not belong to this document.
    pub fn append_element<I, K, V>(
        &mut self,
        parent: NodeId,
        tag: &str,
        attributes: I,
    ) -> Option<NodeId>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut data = NodeData::new(NodeKind::Element);
        data.tag = tag.to_ascii_lowercase();
        for (name, value) in attributes {
            data.attributes
                .entry(name.as_ref().to_ascii_lowercase())
                .or_insert_with(|| value.as_ref().to_string());
        }
        self.append(parent, data)
    }

    /// Append a text node under `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> Option<NodeId> {
        let kind = if !text.is_empty() && text.chars().all(char::is_whitespace) {
            NodeKind::Whitespace
        } else {
            NodeKind::Text
        };
        let mut data = NodeData::new(kind);
        data.text = text.to_string();
        self.append(parent, data)
    }

    /// Append a CDATA section under `parent`.
    pub fn append_cdata(&mut self, parent: NodeId, text: &str) -> Option<NodeId> {
        let mut data = NodeData::new(NodeKind::CData);
        data.text = text.to_string();
        self.append(parent, data)
    }

    /// Append a comment under `parent`.
    pub fn append_comment(&mut self, parent: NodeId, text: &str) -> Option<NodeId> {
        let mut data = NodeData::new(NodeKind::Comment);
        data.text = text.to_string();
        self.append(parent, data)
    }

    fn append(&mut self, parent: NodeId, mut data: NodeData) -> Option<NodeId> {
        let id = NodeId(self.nodes.len());
        let previous = self.nodes.get(parent.0)?.last_child;

        data.parent = Some(parent);
        data.previous_sibling = previous;
        self.nodes.push(data);

        match previous {
            Some(prev) => self.nodes[prev.0].next_sibling = Some(id),
            None => self.nodes[parent.0].first_child = Some(id),
        }
        self.nodes[parent.0].last_child = Some(id);
        Some(id)
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// A cheap, copyable view of one node in a [`Document`].
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub fn id(self) -> NodeId {
        self.id
    }

    pub fn document(self) -> &'a Document {
        self.doc
    }

    fn view(self, id: Option<NodeId>) -> Option<NodeRef<'a>> {
        id.map(|id| NodeRef { doc: self.doc, id })
    }

    /// Concatenated raw text of this node and its descendants, comments excluded.
    pub fn text_content(self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(node: NodeRef<'_>, out: &mut String) {
    match node.kind() {
        kind if kind.is_text_like() => out.push_str(node.text()),
        NodeKind::Element | NodeKind::Document => {
            for child in node.children() {
                collect_text(child, out);
            }
        }
        _ => {}
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

impl Eq for NodeRef<'_> {}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.doc.data(self.id);
        let mut s = f.debug_struct("NodeRef");
        s.field("id", &self.id.0).field("kind", &data.kind);
        if data.kind == NodeKind::Element {
            s.field("tag", &data.tag);
        } else if !data.text.is_empty() {
            s.field("text", &data.text);
        }
        s.finish()
    }
}

impl<'a> DomNode<'a> for NodeRef<'a> {
    type Handle = NodeId;

    fn kind(self) -> NodeKind {
        self.doc.data(self.id).kind
    }

    fn handle(self) -> NodeId {
        self.id
    }

    fn tag_name(self) -> &'a str {
        &self.doc.data(self.id).tag
    }

    fn attribute(self, name: &str) -> Option<&'a str> {
        let attributes = &self.doc.data(self.id).attributes;
        attributes
            .get(name)
            .or_else(|| {
                attributes
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(name))
                    .map(|(_, value)| value)
            })
            .map(String::as_str)
    }

    fn attributes(self) -> Vec<(&'a str, &'a str)> {
        self.doc
            .data(self.id)
            .attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    fn text(self) -> &'a str {
        &self.doc.data(self.id).text
    }

    fn parent(self) -> Option<Self> {
        self.view(self.doc.data(self.id).parent)
    }

    fn first_child(self) -> Option<Self> {
        self.view(self.doc.data(self.id).first_child)
    }

    fn next_sibling(self) -> Option<Self> {
        self.view(self.doc.data(self.id).next_sibling)
    }

    fn previous_sibling(self) -> Option<Self> {
        self.view(self.doc.data(self.id).previous_sibling)
    }
}
