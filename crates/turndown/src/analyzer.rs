//! Per-node classification used while converting.
//!
//! Everything here is a pure function of the node, the `preformatted_code`
//! option and the whitespace overlay of the current call.

use crate::collapse::CollapsedWhitespace;
use crate::dom::{DomNode, NodeKind};
use crate::utf8::Codepoints;
use crate::utilities::{
    encode_nbsp, has_meaningful_when_blank, has_void, is_ascii_whitespace_codepoint, is_block,
    is_code_node, is_meaningful_when_blank, is_unicode_whitespace, is_void,
};

/// Whitespace moved outside an inline element's Markdown delimiters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlankingWhitespace {
    pub leading: String,
    pub trailing: String,
}

impl FlankingWhitespace {
    pub fn is_empty(&self) -> bool {
        self.leading.is_empty() && self.trailing.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlankSide {
    Left,
    Right,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeMetadata {
    pub is_block: bool,
    pub is_code: bool,
    pub is_blank: bool,
    pub is_void: bool,
    pub is_meaningful_when_blank: bool,
    pub has_meaningful_when_blank: bool,
    pub has_void_descendant: bool,
    pub flanking_whitespace: FlankingWhitespace,
}

pub fn analyze_node<'a, N: DomNode<'a>>(
    node: N,
    preformatted_code: bool,
    overlay: &CollapsedWhitespace<N::Handle>,
) -> NodeMetadata {
    NodeMetadata {
        is_block: is_block(node),
        is_code: is_code_node(node),
        is_blank: is_blank(node),
        is_void: is_void(node),
        is_meaningful_when_blank: is_meaningful_when_blank(node),
        has_meaningful_when_blank: has_meaningful_when_blank(node),
        has_void_descendant: has_void(node),
        flanking_whitespace: flanking_whitespace(node, preformatted_code, overlay),
    }
}

/// An element that renders nothing: no text, nothing void or
/// meaningful-when-blank anywhere inside.
pub fn is_blank<'a, N: DomNode<'a>>(node: N) -> bool {
    !is_void(node)
        && !is_meaningful_when_blank(node)
        && only_whitespace(node)
        && !has_void(node)
        && !has_meaningful_when_blank(node)
}

fn only_whitespace<'a, N: DomNode<'a>>(node: N) -> bool {
    match node.kind() {
        kind if kind.is_text_like() => Codepoints::new(node.text().as_bytes())
            .all(|cp| is_unicode_whitespace(cp.value)),
        NodeKind::Element | NodeKind::Document => node.children().all(|child| only_whitespace(child)),
        _ => true,
    }
}

/// Leading and trailing whitespace of a node's text, with the ASCII part
/// dropped on a side where the neighbour already supplies a space.
pub fn flanking_whitespace<'a, N: DomNode<'a>>(
    node: N,
    preformatted_code: bool,
    overlay: &CollapsedWhitespace<N::Handle>,
) -> FlankingWhitespace {
    if is_block(node) || (preformatted_code && is_code_node(node)) {
        return FlankingWhitespace::default();
    }

    let text = overlay.text_of(node);
    if text.is_empty() {
        return FlankingWhitespace::default();
    }

    let edges = EdgeWhitespace::split(&text);
    let mut leading = edges.leading;
    let mut trailing = edges.trailing;

    if !edges.leading_ascii.is_empty()
        && is_flanked_by_whitespace(FlankSide::Left, node, preformatted_code, overlay)
    {
        leading = edges.leading_non_ascii;
    }
    if !edges.trailing_ascii.is_empty()
        && is_flanked_by_whitespace(FlankSide::Right, node, preformatted_code, overlay)
    {
        trailing = edges.trailing_non_ascii;
    }

    FlankingWhitespace {
        leading: encode_nbsp(&leading),
        trailing: encode_nbsp(&trailing),
    }
}

/// Whether the sibling on `side` already ends (left) or starts (right) with a
/// space.
pub fn is_flanked_by_whitespace<'a, N: DomNode<'a>>(
    side: FlankSide,
    node: N,
    preformatted_code: bool,
    overlay: &CollapsedWhitespace<N::Handle>,
) -> bool {
    let sibling = match side {
        FlankSide::Left => node.previous_sibling(),
        FlankSide::Right => node.next_sibling(),
    };
    let Some(sibling) = sibling else {
        return false;
    };

    match sibling.kind() {
        NodeKind::Element if is_block(sibling) => return false,
        NodeKind::Element if preformatted_code && sibling.has_tag("code") => return false,
        kind if kind == NodeKind::Element || kind.is_text_like() => {}
        _ => return false,
    }

    let text = overlay.text_of(sibling);
    match side {
        FlankSide::Left => text.ends_with(' '),
        FlankSide::Right => text.starts_with(' '),
    }
}

/// Edge whitespace runs, each split into its ASCII and non-ASCII code points.
#[derive(Debug, Default, PartialEq, Eq)]
struct EdgeWhitespace {
    leading: String,
    leading_ascii: String,
    leading_non_ascii: String,
    trailing: String,
    trailing_ascii: String,
    trailing_non_ascii: String,
}

impl EdgeWhitespace {
    fn split(text: &str) -> Self {
        let mut edges = Self::default();
        let codepoints: Vec<_> = Codepoints::new(text.as_bytes()).collect();
        let is_ws = |value: u32| is_unicode_whitespace(value);

        let leading_len = codepoints.iter().take_while(|cp| is_ws(cp.value)).count();
        for cp in &codepoints[..leading_len] {
            let piece = text.get(cp.offset..cp.end()).unwrap_or_default();
            edges.leading.push_str(piece);
            if is_ascii_whitespace_codepoint(cp.value) {
                edges.leading_ascii.push_str(piece);
            } else {
                edges.leading_non_ascii.push_str(piece);
            }
        }
        if leading_len == codepoints.len() {
            return edges;
        }

        let trailing_len = codepoints.iter().rev().take_while(|cp| is_ws(cp.value)).count();
        for cp in &codepoints[codepoints.len() - trailing_len..] {
            let piece = text.get(cp.offset..cp.end()).unwrap_or_default();
            edges.trailing.push_str(piece);
            if is_ascii_whitespace_codepoint(cp.value) {
                edges.trailing_ascii.push_str(piece);
            } else {
                edges.trailing_non_ascii.push_str(piece);
            }
        }
        edges
    }
}
