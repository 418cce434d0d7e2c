//! Rule system for HTML to Markdown conversion.
//!
//! Lookup order for an element: the blank rule, then `rules_array` (most
//! recently added first), then keep rules, then remove rules, then the
//! default rule.

mod commonmark;
mod rule;

pub use commonmark::define_commonmark_rules;
pub use rule::{AppendFn, Filter, PredicateFn, ReplacementFn, Rule};

use crate::analyzer::is_blank;
use crate::document::NodeRef;
use crate::options::TurndownOptions;

/// Collection of rules for conversion
#[derive(Debug, Clone)]
pub struct Rules {
    rules_array: Vec<Rule>,
    keep_rules: Vec<Rule>,
    remove_rules: Vec<Rule>,
    blank_rule: Rule,
    keep_replacement_rule: Rule,
    default_rule: Rule,
}

impl Rules {
    /// An empty rule set; only the synthetic rules are present.
    pub fn new() -> Self {
        let any = || Filter::predicate(|_, _, _| true);
        Self {
            rules_array: Vec::new(),
            keep_rules: Vec::new(),
            remove_rules: Vec::new(),
            blank_rule: Rule::new(any(), |node, content, options| {
                (options.blank_replacement)(content, node)
            })
            .with_key("blank"),
            keep_replacement_rule: keep_rule(any()).with_key("keep-replacement"),
            default_rule: Rule::new(any(), |node, content, options| {
                (options.default_replacement)(content, node)
            })
            .with_key("default"),
        }
    }

    /// A rule set holding the CommonMark rules.
    pub fn commonmark() -> Self {
        let mut rules = Self::new();
        define_commonmark_rules(&mut rules);
        rules
    }

    /// Register a rule ahead of every rule added before it.
    pub fn add_rule(&mut self, key: &str, rule: Rule) {
        self.rules_array.insert(0, rule.with_key(key));
    }

    /// Render matching elements as HTML.
    pub fn keep(&mut self, filter: impl Into<Filter>) {
        let filter = filter.into();
        let key = format!("keep-{}", filter.key_suffix());
        self.keep_rules.insert(0, keep_rule(filter).with_key(&key));
    }

    /// Drop matching elements and their content.
    pub fn remove(&mut self, filter: impl Into<Filter>) {
        let filter = filter.into();
        let key = format!("remove-{}", filter.key_suffix());
        let rule = Rule::new(filter, |_, _, _| String::new()).with_key(&key);
        self.remove_rules.insert(0, rule);
    }

    /// The rule that governs `node`.
    pub fn for_node(&self, node: NodeRef<'_>, options: &TurndownOptions) -> &Rule {
        if is_blank(node) {
            return &self.blank_rule;
        }

        let find = |rules: &[Rule]| -> Option<usize> {
            rules.iter().position(|rule| rule.filter.matches(node, options))
        };

        if let Some(i) = find(&self.rules_array) {
            return &self.rules_array[i];
        }
        if let Some(i) = find(&self.keep_rules) {
            return &self.keep_rules[i];
        }
        if let Some(i) = find(&self.remove_rules) {
            return &self.remove_rules[i];
        }
        &self.default_rule
    }

    /// Visit `rules_array` in precedence order.
    pub fn for_each<F: FnMut(&Rule)>(&self, f: F) {
        self.rules_array.iter().for_each(f);
    }

    pub fn keep_replacement_rule(&self) -> &Rule {
        &self.keep_replacement_rule
    }

    /// Number of rules in `rules_array`.
    pub fn len(&self) -> usize {
        self.rules_array.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules_array.is_empty()
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::new()
    }
}

fn keep_rule(filter: Filter) -> Rule {
    Rule::new(filter, |node, content, options| {
        (options.keep_replacement)(content, node)
    })
}
