//! Read-only DOM view used by the conversion engine.
//!
//! The collapser, the node analyzer and the text utilities only need to walk a
//! parsed tree: node kind, tag name, attributes and parent/child/sibling
//! links. Any parser backend can plug in by implementing [`DomNode`] for a
//! cheap `Copy` handle type. The crate ships one implementation, the arena
//! [`NodeRef`](crate::NodeRef).

use std::fmt::Debug;
use std::hash::Hash;

/// Kind of a DOM node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Document or document fragment root
    Document,
    /// Element node
    Element,
    /// Text node
    Text,
    /// Text node known to contain only whitespace
    Whitespace,
    /// CDATA section
    CData,
    /// Comment node
    Comment,
}

impl NodeKind {
    /// Text, whitespace and CDATA nodes all carry text content.
    pub fn is_text_like(self) -> bool {
        matches!(self, NodeKind::Text | NodeKind::Whitespace | NodeKind::CData)
    }
}

/// A non-owning view of one node in a parsed tree.
///
/// Implementors are small `Copy` handles that stay valid for `'a`, the
/// lifetime of the borrowed tree.
pub trait DomNode<'a>: Copy + PartialEq + Debug {
    /// Identity key of a node, usable in hash maps.
    type Handle: Copy + Eq + Hash + Debug;

    fn kind(self) -> NodeKind;

    fn handle(self) -> Self::Handle;

    /// Lowercase tag name for elements, empty for every other kind.
    fn tag_name(self) -> &'a str;

    fn attribute(self, name: &str) -> Option<&'a str>;

    /// Attributes in source order.
    fn attributes(self) -> Vec<(&'a str, &'a str)>;

    /// Raw text for text-like and comment nodes, empty otherwise.
    fn text(self) -> &'a str;

    fn parent(self) -> Option<Self>;

    fn first_child(self) -> Option<Self>;

    fn next_sibling(self) -> Option<Self>;

    fn previous_sibling(self) -> Option<Self>;

    fn children(self) -> Siblings<Self> {
        Siblings {
            next: self.first_child(),
        }
    }

    fn is_element(self) -> bool {
        self.kind() == NodeKind::Element
    }

    fn is_text_like(self) -> bool {
        self.kind().is_text_like()
    }

    fn has_tag(self, tag: &str) -> bool {
        self.is_element() && self.tag_name().eq_ignore_ascii_case(tag)
    }

    /// First child element with the given tag.
    fn find_child(self, tag: &str) -> Option<Self> {
        self.children().find(|child| child.has_tag(tag))
    }

    fn element_children(self) -> std::iter::Filter<Siblings<Self>, fn(&Self) -> bool> {
        let is_element: fn(&Self) -> bool = |child| child.is_element();
        self.children().filter(is_element)
    }

    /// Next sibling that is an element, skipping text and comments.
    fn next_element_sibling(self) -> Option<Self> {
        let mut current = self.next_sibling();
        while let Some(node) = current {
            if node.is_element() {
                return Some(node);
            }
            current = node.next_sibling();
        }
        None
    }

    /// Zero-based position among the parent's element children.
    fn element_index(self) -> Option<usize> {
        let parent = self.parent()?;
        parent.element_children().position(|child| child == self)
    }
}

/// Iterator over a node and its following siblings.
#[derive(Debug, Clone)]
pub struct Siblings<N> {
    next: Option<N>,
}

impl<'a, N: DomNode<'a>> Iterator for Siblings<N> {
    type Item = N;

    fn next(&mut self) -> Option<N> {
        let current = self.next?;
        self.next = current.next_sibling();
        Some(current)
    }
}
