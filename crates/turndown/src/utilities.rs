//! Utility functions and constants for HTML processing.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::dom::{DomNode, NodeKind};
use crate::utf8::Codepoints;

/// Block-level HTML elements
pub const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "audio", "blockquote", "body", "canvas",
    "center", "dd", "dir", "div", "dl", "dt", "fieldset", "figcaption",
    "figure", "footer", "form", "frameset", "h1", "h2", "h3", "h4", "h5",
    "h6", "header", "hgroup", "hr", "html", "isindex", "li", "main", "menu",
    "nav", "noframes", "noscript", "ol", "output", "p", "pre", "section",
    "table", "tbody", "td", "tfoot", "th", "thead", "tr", "ul",
];

/// Void (self-closing) HTML elements
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// Elements that have meaning even when blank
pub const MEANINGFUL_WHEN_BLANK: &[&str] = &[
    "a", "table", "thead", "tbody", "tfoot", "th", "td", "iframe", "script",
    "audio", "video",
];

/// Unicode space separators beyond the ASCII set
const UNICODE_SPACES: &[u32] = &[
    0x85, 0xA0, 0x1680, 0x180E, 0x2028, 0x2029, 0x202F, 0x205F, 0x3000,
];

pub const NBSP: char = '\u{a0}';

pub fn is_block_tag(tag: &str) -> bool {
    BLOCK_ELEMENTS.contains(&tag.to_ascii_lowercase().as_str())
}

pub fn is_void_tag(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag.to_ascii_lowercase().as_str())
}

pub fn is_meaningful_when_blank_tag(tag: &str) -> bool {
    MEANINGFUL_WHEN_BLANK.contains(&tag.to_ascii_lowercase().as_str())
}

pub fn is_block<'a, N: DomNode<'a>>(node: N) -> bool {
    node.is_element() && is_block_tag(node.tag_name())
}

pub fn is_void<'a, N: DomNode<'a>>(node: N) -> bool {
    node.is_element() && is_void_tag(node.tag_name())
}

pub fn is_meaningful_when_blank<'a, N: DomNode<'a>>(node: N) -> bool {
    node.is_element() && is_meaningful_when_blank_tag(node.tag_name())
}

/// `<pre>`, or `<code>` when code is treated as preformatted.
pub fn is_pre<'a, N: DomNode<'a>>(node: N, treat_code_as_pre: bool) -> bool {
    node.has_tag("pre") || (treat_code_as_pre && node.has_tag("code"))
}

/// A `<code>` element or any node inside one.
pub fn is_code_node<'a, N: DomNode<'a>>(node: N) -> bool {
    let mut current = Some(node);
    while let Some(n) = current {
        if n.has_tag("code") {
            return true;
        }
        current = n.parent();
    }
    false
}

/// Depth-first search for a void descendant.
pub fn has_void<'a, N: DomNode<'a>>(node: N) -> bool {
    node.children().any(|child| is_void(child) || has_void(child))
}

/// Depth-first search for a meaningful-when-blank descendant.
pub fn has_meaningful_when_blank<'a, N: DomNode<'a>>(node: N) -> bool {
    node.children()
        .any(|child| is_meaningful_when_blank(child) || has_meaningful_when_blank(child))
}

/// Tab, LF, VT, FF, CR and space.
pub fn is_ascii_whitespace_codepoint(cp: u32) -> bool {
    matches!(cp, 0x09..=0x0D | 0x20)
}

pub fn is_unicode_whitespace(cp: u32) -> bool {
    is_ascii_whitespace_codepoint(cp)
        || (0x2000..=0x200A).contains(&cp)
        || UNICODE_SPACES.contains(&cp)
}

/// The characters stripped from the end of the final Markdown.
pub fn is_ascii_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// Trim Unicode whitespace from both ends without splitting a code point.
pub fn trim_bytes(bytes: &[u8]) -> &[u8] {
    let (start, end) = trim_bounds(bytes);
    &bytes[start..end]
}

pub fn trim_str(s: &str) -> &str {
    let (start, end) = trim_bounds(s.as_bytes());
    s.get(start..end).unwrap_or(s)
}

fn trim_bounds(bytes: &[u8]) -> (usize, usize) {
    let mut start = None;
    let mut end = 0;
    for cp in Codepoints::new(bytes) {
        if is_unicode_whitespace(cp.value) {
            continue;
        }
        start.get_or_insert(cp.offset);
        end = cp.end();
    }
    match start {
        Some(start) => (start, end),
        None => (0, 0),
    }
}

pub fn encode_nbsp(s: &str) -> String {
    s.replace(NBSP, "&nbsp;")
}

pub fn repeat_char(c: char, n: usize) -> String {
    std::iter::repeat(c).take(n).collect()
}

static ATTRIBUTE_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\n+\s*)+").expect("valid regex"));

/// Collapse newline runs (and the indentation after them) in an attribute value.
pub fn clean_attribute(value: Option<&str>) -> String {
    match value {
        Some(v) => ATTRIBUTE_NEWLINES.replace_all(v, "\n").into_owned(),
        None => String::new(),
    }
}

static ESCAPES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"\\", r"\\"),
        (r"\*", r"\*"),
        (r"^-", r"\-"),
        (r"^\+ ", r"\+ "),
        (r"^(=+)", r"\${1}"),
        (r"^(#{1,6}) ", r"\${1} "),
        (r"`", r"\`"),
        (r"^~~~", r"\~~~"),
        (r"\[", r"\["),
        (r"\]", r"\]"),
        (r"^>", r"\>"),
        (r"_", r"\_"),
        (r"^(\d+)\. ", r"${1}\. "),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).expect("valid regex"), replacement))
    .collect()
});

/// Escape text so it is not read back as Markdown syntax.
///
/// Substitutions apply in a fixed order; anchored ones only look at the start
/// of the text.
pub fn advanced_escape(text: &str) -> String {
    ESCAPES.iter().fold(text.to_string(), |acc, (pattern, replacement)| {
        pattern.replace_all(&acc, *replacement).into_owned()
    })
}

/// Escape only backslashes and square brackets.
pub fn minimal_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '[' | ']') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Re-serialize a node as HTML.
pub fn serialize_node<'a, N: DomNode<'a>>(node: N) -> String {
    let mut out = String::new();
    write_node(node, &mut out);
    out
}

fn write_node<'a, N: DomNode<'a>>(node: N, out: &mut String) {
    match node.kind() {
        NodeKind::Element => {
            let tag = node.tag_name();
            out.push('<');
            out.push_str(tag);
            for (name, value) in node.attributes() {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                escape_html_into(value, true, out);
                out.push('"');
            }
            out.push('>');
            if is_void_tag(tag) {
                return;
            }
            for child in node.children() {
                write_node(child, out);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
        NodeKind::Text | NodeKind::Whitespace | NodeKind::CData => {
            escape_html_into(node.text(), false, out);
        }
        NodeKind::Comment => {
            out.push_str("<!--");
            out.push_str(node.text());
            out.push_str("-->");
        }
        NodeKind::Document => {
            for child in node.children() {
                write_node(child, out);
            }
        }
    }
}

fn escape_html_into(s: &str, attribute: bool, out: &mut String) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            '\'' if attribute => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}
