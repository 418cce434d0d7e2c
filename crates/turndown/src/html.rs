//! HTML parsing support.
//!
//! Parses an HTML fragment with scraper (html5ever) and lowers it into the
//! arena [`Document`] the converter walks.

use scraper::{ElementRef, Html, Node as ScraperNode};

use crate::document::{Document, NodeId};

/// Parse an HTML string into a [`Document`].
///
/// The input is parsed as a fragment, so `<html>`/`<body>` wrappers are not
/// added to the result.
///
/// # Example
///
/// ```rust
/// use turndown::{parse_html, TurndownService};
///
/// let document = parse_html("<h1>Hello <em>World</em></h1>");
///
/// let service = TurndownService::new();
/// let markdown = service.turndown_document(&document).unwrap();
/// assert_eq!(markdown, "Hello _World_\n=============");
/// ```
pub fn parse_html(html: &str) -> Document {
    let fragment = Html::parse_fragment(html);
    let mut document = Document::new();
    let root = document.root_id();
    append_children(&mut document, root, fragment.root_element());
    log::trace!("parsed {} bytes of HTML into {} nodes", html.len(), document.len());
    document
}

fn append_children(document: &mut Document, parent: NodeId, element: ElementRef<'_>) {
    for child in element.children() {
        match child.value() {
            ScraperNode::Text(text) => {
                document.append_text(parent, text);
            }
            ScraperNode::Comment(comment) => {
                document.append_comment(parent, comment);
            }
            ScraperNode::Element(data) => {
                let id = document.append_element(parent, data.name(), data.attrs());
                if let (Some(id), Some(child_element)) = (id, ElementRef::wrap(child)) {
                    append_children(document, id, child_element);
                }
            }
            _ => {}
        }
    }
}
