//! # turndown
//!
//! Convert HTML to CommonMark Markdown.
//!
//! This is a Rust implementation of [turndown](https://github.com/mixmark-io/turndown):
//! a rule-driven converter that walks a DOM tree, collapses whitespace the way
//! a browser renders it, and turns every element into Markdown through an
//! ordered list of rules.
//!
//! ## Design
//!
//! The converter works on an arena [`Document`]. Documents come from:
//!
//! - **HTML strings**: [`parse_html`] (feature `html`, on by default)
//! - **CDP-style trees**: any [`Node`] converts into a `Document`
//! - **Direct construction**: [`Document::append_element`] and friends
//!
//! Whitespace collapsing never touches the tree; it produces an overlay that
//! the pipeline reads through, so one `Document` can be converted many times.
//!
//! ## Example (Node-based)
//!
//! ```rust
//! use turndown::{TurndownService, Node};
//!
//! let service = TurndownService::new();
//!
//! let mut h1 = Node::element("h1");
//! h1.add_child(Node::text("Hello World"));
//!
//! let markdown = service.turndown(&h1).unwrap();
//! assert_eq!(markdown, "Hello World\n===========");
//! ```
//!
//! ## Example (HTML string)
//!
//! ```rust
//! use turndown::{HeadingStyle, TurndownService};
//!
//! let mut service = TurndownService::new();
//! service.configure(|opts| opts.heading_style = HeadingStyle::Atx);
//!
//! let markdown = service.turndown_html("<h1>Hello <em>World</em></h1>").unwrap();
//! assert_eq!(markdown, "# Hello _World_");
//! ```
//!
//! ## Custom rules
//!
//! ```rust
//! use turndown::{Rule, TurndownService};
//!
//! let mut service = TurndownService::new();
//! service.add_rule(
//!     "strikethrough",
//!     Rule::for_tags(&["del", "s"], |_, content, _| format!("~~{content}~~")),
//! );
//! service.keep("kbd");
//!
//! let markdown = service.turndown_html("<p><del>old</del> <kbd>Ctrl</kbd></p>").unwrap();
//! assert_eq!(markdown, "~~old~~ <kbd>Ctrl</kbd>");
//! ```

pub mod analyzer;
pub mod collapse;
pub mod document;
pub mod dom;
#[cfg(feature = "html")]
pub mod html;
pub mod node;
pub mod options;
mod rules;
mod service;
pub mod utf8;
pub mod utilities;

pub use document::{Document, NodeId, NodeRef};
pub use dom::{DomNode, NodeKind};
#[cfg(feature = "html")]
pub use html::parse_html;
pub use node::{Node, NodeType};
pub use options::{
    hook, CodeBlockStyle, Escape, HeadingStyle, LinkReferenceStyle, LinkStyle, TurndownOptions,
};
pub use rules::{define_commonmark_rules, AppendFn, Filter, PredicateFn, Rule, Rules};
#[cfg(feature = "html")]
pub use service::turndown;
pub use service::{RuleFactory, RulePlacement, TurndownService};

/// Error type for turndown operations
#[derive(Debug, thiserror::Error)]
pub enum TurndownError {
    #[error("Conversion error: {0}")]
    ConversionError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Invalid value {value:?} for option {key}")]
    InvalidOption { key: String, value: String },
}

pub type Result<T> = std::result::Result<T, TurndownError>;
