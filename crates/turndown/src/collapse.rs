//! Browser-style whitespace collapsing.
//!
//! The tree is never mutated. Instead a single pass records, per text node,
//! the text a browser would render (`text_replacements`) and which nodes
//! render nothing at all (`nodes_to_omit`). The pipeline reads text through
//! this overlay.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::dom::{DomNode, NodeKind};
use crate::utilities::{is_block, is_pre, is_void};

static COLLAPSIBLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \r\n\t]+").expect("valid regex"));

/// Sparse overlay produced by [`collapse_whitespace`].
///
/// A handle is never in both maps.
#[derive(Debug, Clone)]
pub struct CollapsedWhitespace<H> {
    text_replacements: HashMap<H, String>,
    nodes_to_omit: HashSet<H>,
}

impl<H> Default for CollapsedWhitespace<H> {
    fn default() -> Self {
        Self {
            text_replacements: HashMap::new(),
            nodes_to_omit: HashSet::new(),
        }
    }
}

impl<H: Copy + Eq + Hash> CollapsedWhitespace<H> {
    pub fn is_omitted(&self, handle: H) -> bool {
        self.nodes_to_omit.contains(&handle)
    }

    pub fn replacement(&self, handle: H) -> Option<&str> {
        self.text_replacements.get(&handle).map(String::as_str)
    }

    pub fn replacement_count(&self) -> usize {
        self.text_replacements.len()
    }

    pub fn omitted_count(&self) -> usize {
        self.nodes_to_omit.len()
    }

    /// Rendered text of a node: omitted nodes are empty, replaced text nodes
    /// use their replacement, elements concatenate their children.
    pub fn text_of<'a, N>(&self, node: N) -> String
    where
        N: DomNode<'a, Handle = H>,
    {
        let mut out = String::new();
        self.push_text(node, &mut out);
        out
    }

    fn push_text<'a, N>(&self, node: N, out: &mut String)
    where
        N: DomNode<'a, Handle = H>,
    {
        if self.is_omitted(node.handle()) {
            return;
        }
        match node.kind() {
            kind if kind.is_text_like() => {
                out.push_str(self.replacement(node.handle()).unwrap_or(node.text()));
            }
            NodeKind::Element | NodeKind::Document => {
                for child in node.children() {
                    self.push_text(child, out);
                }
            }
            _ => {}
        }
    }

    fn omit(&mut self, handle: H) {
        self.text_replacements.remove(&handle);
        self.nodes_to_omit.insert(handle);
    }

    /// Drop one trailing space from a retained text node, omitting it if
    /// nothing is left.
    fn pop_trailing_space(&mut self, handle: H) {
        let Some(text) = self.text_replacements.get_mut(&handle) else {
            return;
        };
        if text.ends_with(' ') {
            text.pop();
            if text.is_empty() {
                self.omit(handle);
            }
        }
    }
}

/// Compute the whitespace overlay for everything below `root`.
///
/// `<pre>` subtrees (and `<code>` ones when `treat_code_as_pre` is set) are
/// left untouched.
pub fn collapse_whitespace<'a, N: DomNode<'a>>(
    root: N,
    treat_code_as_pre: bool,
) -> CollapsedWhitespace<N::Handle> {
    let mut overlay = CollapsedWhitespace::default();
    if root.first_child().is_none() || is_pre(root, treat_code_as_pre) {
        return overlay;
    }

    let mut prev_text: Option<N> = None;
    let mut keep_leading_whitespace = false;
    let mut prev: Option<N> = None;
    let mut current = next_node(prev, root, treat_code_as_pre);

    while let Some(node) = current {
        if node == root {
            break;
        }

        match node.kind() {
            kind if kind.is_text_like() => {
                let collapsed = COLLAPSIBLE.replace_all(node.text(), " ");
                let mut text: &str = &collapsed;

                let after_space = match prev_text {
                    Some(p) => overlay.replacement(p.handle()).is_some_and(|t| t.ends_with(' ')),
                    None => true,
                };
                if after_space && !keep_leading_whitespace {
                    text = text.strip_prefix(' ').unwrap_or(text);
                }

                if text.is_empty() {
                    overlay.omit(node.handle());
                    prev = Some(node);
                    current = after_removal(node);
                    continue;
                }

                overlay
                    .text_replacements
                    .insert(node.handle(), text.to_string());
                prev_text = Some(node);
            }
            NodeKind::Element => {
                if is_block(node) || node.has_tag("br") {
                    if let Some(p) = prev_text {
                        overlay.pop_trailing_space(p.handle());
                    }
                    prev_text = None;
                    keep_leading_whitespace = false;
                } else if is_void(node) || is_pre(node, treat_code_as_pre) {
                    prev_text = None;
                    keep_leading_whitespace = true;
                } else if prev_text.is_some() {
                    keep_leading_whitespace = false;
                }
            }
            _ => {
                overlay.omit(node.handle());
                prev = Some(node);
                current = after_removal(node);
                continue;
            }
        }

        let next = next_node(prev, node, treat_code_as_pre);
        prev = Some(node);
        current = next;
    }

    if let Some(p) = prev_text {
        overlay.pop_trailing_space(p.handle());
    }

    log::trace!(
        "collapsed whitespace: {} replacements, {} omitted nodes",
        overlay.replacement_count(),
        overlay.omitted_count()
    );
    overlay
}

/// Pre-order step that skips the inside of pre-like nodes and does not
/// re-enter a node we just climbed out of.
fn next_node<'a, N: DomNode<'a>>(prev: Option<N>, current: N, treat_code_as_pre: bool) -> Option<N> {
    let ascended = prev.and_then(|p| p.parent()) == Some(current);
    if ascended || is_pre(current, treat_code_as_pre) {
        return current.next_sibling().or_else(|| current.parent());
    }
    current
        .first_child()
        .or_else(|| current.next_sibling())
        .or_else(|| current.parent())
}

/// Where the walk continues once `node` is dropped.
fn after_removal<'a, N: DomNode<'a>>(node: N) -> Option<N> {
    node.next_sibling().or_else(|| node.parent())
}
