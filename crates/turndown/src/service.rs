//! TurndownService - the main entry point for HTML to Markdown conversion.

use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::analyzer::flanking_whitespace;
use crate::collapse::{collapse_whitespace, CollapsedWhitespace};
use crate::document::{Document, NodeId, NodeRef};
use crate::dom::{DomNode, NodeKind};
use crate::node::Node;
use crate::options::TurndownOptions;
use crate::rules::{define_commonmark_rules, Filter, Rule, Rules};
use crate::utilities::{encode_nbsp, is_ascii_whitespace, is_code_node, trim_str};
use crate::Result;

/// When a factory runs while the rule set is built.
///
/// Factories always run after the CommonMark rules are defined, so every
/// rule they add takes precedence over the built-ins. `AfterDefaults`
/// factories run last and therefore also win over `BeforeDefaults` ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RulePlacement {
    BeforeDefaults,
    #[default]
    AfterDefaults,
}

/// Adds rules to a rule set while it is being built.
pub type RuleFactory = Arc<dyn Fn(&mut Rules) + Send + Sync>;

#[derive(Clone)]
enum Mutation {
    AddRule(String, Rule),
    Keep(Filter),
    Remove(Filter),
}

/// The main service for converting HTML to Markdown
pub struct TurndownService {
    options: TurndownOptions,
    rules: OnceCell<Rules>,
    factories: Vec<(RuleFactory, RulePlacement)>,
    mutations: Vec<Mutation>,
}

impl TurndownService {
    /// Create a new TurndownService with default options
    pub fn new() -> Self {
        Self::with_options(TurndownOptions::default())
    }

    /// Create a TurndownService with custom options
    pub fn with_options(options: TurndownOptions) -> Self {
        Self {
            options,
            rules: OnceCell::new(),
            factories: Vec::new(),
            mutations: Vec::new(),
        }
    }

    /// Edit the options in place
    pub fn configure<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&mut TurndownOptions),
    {
        f(self.options_mut());
        self
    }

    /// Get the current options
    pub fn options(&self) -> &TurndownOptions {
        &self.options
    }

    /// Get mutable access to options
    pub fn options_mut(&mut self) -> &mut TurndownOptions {
        self.invalidate();
        &mut self.options
    }

    /// Apply a plugin
    pub fn use_plugin<F>(&mut self, plugin: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        plugin(self);
        self
    }

    /// Add a custom rule
    pub fn add_rule(&mut self, key: &str, rule: Rule) -> &mut Self {
        self.mutations.push(Mutation::AddRule(key.to_string(), rule));
        self.invalidate();
        self
    }

    /// Keep elements matching the filter as HTML
    pub fn keep(&mut self, filter: impl Into<Filter>) -> &mut Self {
        self.mutations.push(Mutation::Keep(filter.into()));
        self.invalidate();
        self
    }

    /// Remove elements matching the filter
    pub fn remove(&mut self, filter: impl Into<Filter>) -> &mut Self {
        self.mutations.push(Mutation::Remove(filter.into()));
        self.invalidate();
        self
    }

    /// Register a function that adds rules whenever the rule set is built
    pub fn register_rule_factory<F>(&mut self, factory: F, placement: RulePlacement) -> &mut Self
    where
        F: Fn(&mut Rules) + Send + Sync + 'static,
    {
        self.factories.push((Arc::new(factory), placement));
        self.invalidate();
        self
    }

    /// Escape markdown special characters in a string
    pub fn escape(&self, text: &str) -> String {
        self.options.escape.apply(text)
    }

    /// Convert a CDP-style node tree
    pub fn turndown(&self, node: &Node) -> Result<String> {
        self.turndown_document(&Document::from(node))
    }

    /// Convert a whole document
    pub fn turndown_document(&self, document: &Document) -> Result<String> {
        self.turndown_node(document.root())
    }

    /// Convert the children of `root`
    pub fn turndown_node(&self, root: NodeRef<'_>) -> Result<String> {
        let rules = self.rules();
        log::debug!(
            "converting {:?} root: heading={} code_block={} link={}",
            root.kind(),
            self.options.heading_style,
            self.options.code_block_style,
            self.options.link_style
        );

        let overlay = collapse_whitespace(root, self.options.preformatted_code);
        let converter = Converter {
            rules,
            options: &self.options,
            overlay: &overlay,
        };

        let body = match converter.process_children(root) {
            Ok(body) => body,
            Err(err) => {
                drain_appends(rules, &self.options);
                return Err(err);
            }
        };

        let markdown = self.post_process(rules, &body);
        log::debug!("conversion produced {} bytes", markdown.len());
        Ok(markdown)
    }

    /// Parse and convert an HTML string
    #[cfg(feature = "html")]
    pub fn turndown_html(&self, html: &str) -> Result<String> {
        self.turndown_document(&crate::html::parse_html(html))
    }

    fn invalidate(&mut self) {
        self.rules.take();
    }

    fn rules(&self) -> &Rules {
        self.rules.get_or_init(|| self.build_rules())
    }

    fn build_rules(&self) -> Rules {
        let mut rules = Rules::new();
        define_commonmark_rules(&mut rules);

        for placement in [RulePlacement::BeforeDefaults, RulePlacement::AfterDefaults] {
            for factory in self.factories_at(placement) {
                factory(&mut rules);
            }
        }

        for mutation in &self.mutations {
            match mutation.clone() {
                Mutation::AddRule(key, rule) => rules.add_rule(&key, rule),
                Mutation::Keep(filter) => rules.keep(filter),
                Mutation::Remove(filter) => rules.remove(filter),
            }
        }

        log::trace!("built rule set with {} rules", rules.len());
        rules
    }

    fn factories_at(&self, placement: RulePlacement) -> impl Iterator<Item = &RuleFactory> + '_ {
        self.factories
            .iter()
            .filter(move |(_, p)| *p == placement)
            .map(|(factory, _)| factory)
    }

    /// Flush appends, encode NBSP and trim the ends
    fn post_process(&self, rules: &Rules, body: &str) -> String {
        let mut markdown = encode_nbsp(body);
        rules.for_each(|rule| {
            if let Some(append) = &rule.append {
                markdown = join_chunks(&markdown, &append(&self.options));
            }
        });

        let markdown = encode_nbsp(&markdown);
        markdown
            .trim_start_matches(is_newline)
            .trim_end_matches(is_ascii_whitespace)
            .to_string()
    }
}

impl Default for TurndownService {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse `html` and convert it with `options`
#[cfg(feature = "html")]
pub fn turndown(html: &str, options: &TurndownOptions) -> Result<String> {
    TurndownService::with_options(options.clone()).turndown_html(html)
}

/// Per-call conversion state
struct Converter<'r> {
    rules: &'r Rules,
    options: &'r TurndownOptions,
    overlay: &'r CollapsedWhitespace<NodeId>,
}

impl Converter<'_> {
    fn process_children(&self, node: NodeRef<'_>) -> Result<String> {
        let mut output = String::new();
        for child in node.children() {
            let replacement = self.process_node(child)?;
            output = join_chunks(&output, &replacement);
        }
        Ok(output)
    }

    fn process_node(&self, node: NodeRef<'_>) -> Result<String> {
        match node.kind() {
            kind if kind.is_text_like() => {
                let text = self.overlay.text_of(node);
                if text.is_empty() {
                    Ok(String::new())
                } else if is_code_node(node) {
                    Ok(text)
                } else {
                    Ok(self.options.escape.apply(&text))
                }
            }
            NodeKind::Element => self.replacement_for_node(node),
            NodeKind::Document => self.process_children(node),
            _ => Ok(String::new()),
        }
    }

    fn replacement_for_node(&self, node: NodeRef<'_>) -> Result<String> {
        let tag = node.tag_name();
        if self.options.keep_tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            let content = self.process_children(node)?;
            return self
                .rules
                .keep_replacement_rule()
                .replace(node, &content, self.options);
        }

        let mut content = self.process_children(node)?;
        let flanking = flanking_whitespace(node, self.options.preformatted_code, self.overlay);
        if !flanking.is_empty() {
            content = trim_str(&content).to_string();
        }

        let rule = self.rules.for_node(node, self.options);
        log::trace!("<{}> handled by rule {:?}", tag, rule.key);
        let replacement = rule.replace(node, &content, self.options)?;
        Ok(format!("{}{}{}", flanking.leading, replacement, flanking.trailing))
    }
}

/// Run every append and throw the output away, leaving rule state clean.
fn drain_appends(rules: &Rules, options: &TurndownOptions) {
    rules.for_each(|rule| {
        if let Some(append) = &rule.append {
            append(options);
        }
    });
}

fn is_newline(c: char) -> bool {
    c == '\n' || c == '\r'
}

/// Concatenate two chunks, separating them by the larger of their facing
/// newline runs, capped at two.
pub(crate) fn join_chunks(output: &str, replacement: &str) -> String {
    if output.is_empty() {
        return replacement.to_string();
    }
    if replacement.is_empty() {
        return output.to_string();
    }

    let left = output.trim_end_matches(is_newline);
    let right = replacement.trim_start_matches(is_newline);
    let removed = (output.len() - left.len()).max(replacement.len() - right.len());
    let separator = &"\n\n"[..removed.min(2)];

    let mut joined = String::with_capacity(left.len() + separator.len() + right.len());
    joined.push_str(left);
    joined.push_str(separator);
    joined.push_str(right);
    joined
}
