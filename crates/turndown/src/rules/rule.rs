//! Rule and Filter types for HTML conversion.

use std::fmt;
use std::sync::Arc;

use crate::document::NodeRef;
use crate::dom::DomNode;
use crate::options::TurndownOptions;
use crate::Result;

/// Replacement function: `(node, content, options) -> markdown`
pub type ReplacementFn =
    Arc<dyn Fn(NodeRef<'_>, &str, &TurndownOptions) -> Result<String> + Send + Sync>;

/// Filter predicate: `(tag, node, options) -> matches`
pub type PredicateFn = Arc<dyn Fn(&str, NodeRef<'_>, &TurndownOptions) -> bool + Send + Sync>;

/// Produces trailing output (such as a link reference list) after conversion
pub type AppendFn = Arc<dyn Fn(&TurndownOptions) -> String + Send + Sync>;

/// A filter determines which elements a rule applies to
#[derive(Clone)]
pub enum Filter {
    /// Match a single tag name
    TagName(String),
    /// Match any of multiple tag names
    TagNames(Vec<String>),
    /// Match using a predicate; the tag is lowercase and empty for non-elements
    Predicate(PredicateFn),
}

impl Filter {
    pub fn tag(name: &str) -> Self {
        Filter::TagName(name.to_ascii_lowercase())
    }

    pub fn tags(names: &[&str]) -> Self {
        Filter::TagNames(names.iter().map(|s| s.to_ascii_lowercase()).collect())
    }

    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&str, NodeRef<'_>, &TurndownOptions) -> bool + Send + Sync + 'static,
    {
        Filter::Predicate(Arc::new(f))
    }

    /// Tag filters only ever match elements.
    pub fn matches(&self, node: NodeRef<'_>, options: &TurndownOptions) -> bool {
        let tag = node.tag_name();
        match self {
            Filter::TagName(t) => node.is_element() && tag.eq_ignore_ascii_case(t),
            Filter::TagNames(tags) => {
                node.is_element() && tags.iter().any(|t| tag.eq_ignore_ascii_case(t))
            }
            Filter::Predicate(f) => f(tag, node, options),
        }
    }

    /// Suffix used in generated keep/remove rule keys.
    pub(crate) fn key_suffix(&self) -> &str {
        match self {
            Filter::TagName(t) => t,
            Filter::TagNames(_) => "multi",
            Filter::Predicate(_) => "custom",
        }
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::TagName(t) => f.debug_tuple("TagName").field(t).finish(),
            Filter::TagNames(t) => f.debug_tuple("TagNames").field(t).finish(),
            Filter::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl From<&str> for Filter {
    fn from(tag: &str) -> Self {
        Filter::tag(tag)
    }
}

impl From<String> for Filter {
    fn from(tag: String) -> Self {
        Filter::tag(&tag)
    }
}

impl From<&[&str]> for Filter {
    fn from(tags: &[&str]) -> Self {
        Filter::tags(tags)
    }
}

impl<const N: usize> From<[&str; N]> for Filter {
    fn from(tags: [&str; N]) -> Self {
        Filter::tags(&tags)
    }
}

impl From<Vec<&str>> for Filter {
    fn from(tags: Vec<&str>) -> Self {
        Filter::tags(&tags)
    }
}

impl From<Vec<String>> for Filter {
    fn from(tags: Vec<String>) -> Self {
        Filter::TagNames(tags.into_iter().map(|t| t.to_ascii_lowercase()).collect())
    }
}

/// A rule defines how to convert a matched HTML element to Markdown
#[derive(Clone)]
pub struct Rule {
    /// Set when the rule is registered
    pub key: String,
    pub filter: Filter,
    pub replacement: ReplacementFn,
    pub append: Option<AppendFn>,
}

impl Rule {
    /// Create a rule from an infallible replacement
    pub fn new<F>(filter: impl Into<Filter>, replacement: F) -> Self
    where
        F: Fn(NodeRef<'_>, &str, &TurndownOptions) -> String + Send + Sync + 'static,
    {
        Self::try_new(filter, move |node, content, options| {
            Ok(replacement(node, content, options))
        })
    }

    /// Create a rule whose replacement may fail, aborting the conversion
    pub fn try_new<F>(filter: impl Into<Filter>, replacement: F) -> Self
    where
        F: Fn(NodeRef<'_>, &str, &TurndownOptions) -> Result<String> + Send + Sync + 'static,
    {
        Self {
            key: String::new(),
            filter: filter.into(),
            replacement: Arc::new(replacement),
            append: None,
        }
    }

    /// Create a rule that matches a single tag
    pub fn for_tag<F>(tag: &str, replacement: F) -> Self
    where
        F: Fn(NodeRef<'_>, &str, &TurndownOptions) -> String + Send + Sync + 'static,
    {
        Self::new(Filter::tag(tag), replacement)
    }

    /// Create a rule that matches multiple tags
    pub fn for_tags<F>(tags: &[&str], replacement: F) -> Self
    where
        F: Fn(NodeRef<'_>, &str, &TurndownOptions) -> String + Send + Sync + 'static,
    {
        Self::new(Filter::tags(tags), replacement)
    }

    /// Attach an append function, flushed once after every conversion
    pub fn with_append<F>(mut self, append: F) -> Self
    where
        F: Fn(&TurndownOptions) -> String + Send + Sync + 'static,
    {
        self.append = Some(Arc::new(append));
        self
    }

    pub(crate) fn with_key(mut self, key: &str) -> Self {
        self.key = key.to_string();
        self
    }

    /// Apply this rule's replacement
    pub fn replace(&self, node: NodeRef<'_>, content: &str, options: &TurndownOptions) -> Result<String> {
        (self.replacement)(node, content, options)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("key", &self.key)
            .field("filter", &self.filter)
            .field("append", &self.append.is_some())
            .finish()
    }
}
