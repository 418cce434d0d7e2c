//! CommonMark rules for HTML to Markdown conversion.

use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Filter, Rule, Rules};
use crate::document::NodeRef;
use crate::dom::DomNode;
use crate::options::{CodeBlockStyle, HeadingStyle, LinkReferenceStyle, LinkStyle, TurndownOptions};
use crate::utilities::{clean_attribute, repeat_char, trim_str};

static LANGUAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"language-(\S+)").expect("valid regex"));
static TRAILING_BLANK_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*$").expect("valid regex"));
static LINE_ENDING: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r?\n|\r").expect("valid regex"));
static NEEDS_PADDING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^`|^ .*?[^ ].* $|`$").expect("valid regex"));
static BACKTICK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"`+").expect("valid regex"));

/// Register the CommonMark rules on `rules`.
///
/// Each rule is added in front of the previous one, so `image` ends up with
/// the highest precedence and `paragraph` with the lowest.
pub fn define_commonmark_rules(rules: &mut Rules) {
    rules.add_rule("paragraph", Rule::for_tag("p", |_, content, _| format!("\n\n{content}\n\n")));
    rules.add_rule(
        "lineBreak",
        Rule::for_tag("br", |_, _, options| format!("{}\n", options.br)),
    );
    for level in 1..=6 {
        let tag = format!("h{level}");
        rules.add_rule(
            &tag,
            Rule::for_tag(&tag, move |_, content, options| heading(level, content, options)),
        );
    }
    rules.add_rule("blockquote", Rule::for_tag("blockquote", |_, content, _| blockquote(content)));
    rules.add_rule("list", Rule::for_tags(&["ul", "ol"], list));
    rules.add_rule("listItem", Rule::for_tag("li", list_item));
    rules.add_rule("indentedCodeBlock", indented_code_block_rule());
    rules.add_rule("fencedCodeBlock", fenced_code_block_rule());
    rules.add_rule(
        "horizontalRule",
        Rule::for_tag("hr", |_, _, options| format!("\n\n{}\n\n", options.hr)),
    );
    rules.add_rule("inlineLink", inline_link_rule());
    rules.add_rule("referenceLink", reference_link_rule());
    rules.add_rule(
        "emphasis",
        Rule::for_tags(&["em", "i"], |_, content, options| {
            let delimiter = options.em_delimiter;
            wrap_unless_blank(content, &delimiter.to_string())
        }),
    );
    rules.add_rule(
        "strong",
        Rule::for_tags(&["strong", "b"], |_, content, options| {
            wrap_unless_blank(content, &options.strong_delimiter)
        }),
    );
    rules.add_rule("code", code_rule());
    rules.add_rule("image", Rule::for_tag("img", image));
}

fn trim_newlines_start(text: &str) -> &str {
    text.trim_start_matches(|c: char| c == '\r' || c == '\n')
}

fn trim_newlines_end(text: &str) -> &str {
    text.trim_end_matches(|c: char| c == '\r' || c == '\n')
}

fn trim_newlines(text: &str) -> &str {
    trim_newlines_end(trim_newlines_start(text))
}

fn heading(level: usize, content: &str, options: &TurndownOptions) -> String {
    if options.heading_style == HeadingStyle::Setext && level <= 2 {
        let underline = repeat_char(if level == 1 { '=' } else { '-' }, content.chars().count());
        return format!("\n\n{content}\n{underline}\n\n");
    }
    format!("\n\n{} {content}\n\n", repeat_char('#', level))
}

fn blockquote(content: &str) -> String {
    let trimmed = trim_newlines(content);
    let mut block = String::new();
    if !trimmed.is_empty() {
        for line in trimmed.split('\n') {
            block.push_str("> ");
            block.push_str(line);
            block.push('\n');
        }
    }
    format!("\n\n{block}\n\n")
}

fn list(node: NodeRef<'_>, content: &str, _: &TurndownOptions) -> String {
    let inner = trim_newlines(content);
    let nested_last = node
        .parent()
        .filter(|parent| parent.has_tag("li"))
        .and_then(|parent| parent.element_children().last())
        == Some(node);
    if nested_last {
        format!("\n{inner}")
    } else {
        format!("\n\n{inner}\n\n")
    }
}

fn list_item(node: NodeRef<'_>, content: &str, options: &TurndownOptions) -> String {
    let body = trim_newlines_start(content);
    let trimmed = trim_newlines_end(body);
    let mut result = trimmed.to_string();
    if trimmed.len() != body.len() {
        result.push('\n');
    }
    let mut result = result.replace('\n', "\n    ");

    let prefix = match node.parent() {
        Some(parent) if parent.has_tag("ol") => {
            let start = parent
                .attribute("start")
                .and_then(|s| s.trim().parse::<i64>().ok())
                .unwrap_or(1);
            match node.element_index() {
                Some(index) => {
                    let offset = i64::try_from(index).unwrap_or(i64::MAX);
                    format!("{}.  ", start.saturating_add(offset))
                }
                None => "1.  ".to_string(),
            }
        }
        _ => format!("{}   ", options.bullet_list_marker),
    };

    let has_next = node.next_element_sibling().is_some();
    if has_next && result.contains('\n') {
        result = TRAILING_BLANK_LINE.replace(&result, "\n    ").into_owned();
    }
    if has_next && !result.ends_with('\n') {
        result.push('\n');
    }
    format!("{prefix}{result}")
}

fn is_code_block(tag: &str, node: NodeRef<'_>) -> bool {
    tag == "pre" && node.find_child("code").is_some()
}

fn indented_code_block_rule() -> Rule {
    Rule::new(
        Filter::predicate(|tag, node, options| {
            options.code_block_style == CodeBlockStyle::Indented && is_code_block(tag, node)
        }),
        |node, _, _| {
            let source = node.find_child("code").unwrap_or(node);
            let text = source.text_content();
            let code = text.strip_suffix('\n').unwrap_or(&text);
            format!("\n\n    {}\n\n", code.replace('\n', "\n    "))
        },
    )
}

/// Length of the longest run of `fence_char` opening a line of `code`.
fn longest_fence_run(code: &str, fence_char: char) -> usize {
    code.split('\n')
        .map(|line| line.chars().take_while(|&c| c == fence_char).count())
        .filter(|&run| run >= 3)
        .max()
        .unwrap_or(0)
}

fn fenced_code_block_rule() -> Rule {
    Rule::new(
        Filter::predicate(|tag, node, options| {
            options.code_block_style == CodeBlockStyle::Fenced && is_code_block(tag, node)
        }),
        |node, _, options| {
            let Some(code_node) = node.find_child("code") else {
                return String::new();
            };
            let language = code_node
                .attribute("class")
                .and_then(|class| LANGUAGE.captures(class))
                .and_then(|caps| caps.get(1))
                .map_or("", |m| m.as_str());

            let text = code_node.text_content();
            let fence_char = options.fence.chars().next().unwrap_or('`');
            let fence_size = (longest_fence_run(&text, fence_char) + 1).max(3);
            let fence = repeat_char(fence_char, fence_size);
            let code = text.strip_suffix('\n').unwrap_or(&text);

            format!("\n\n{fence}{language}\n{code}\n{fence}\n\n")
        },
    )
}

fn is_link(tag: &str, node: NodeRef<'_>) -> bool {
    tag == "a" && node.attribute("href").is_some_and(|href| !href.is_empty())
}

fn title_part(title: &str) -> String {
    if title.is_empty() {
        String::new()
    } else {
        format!(" \"{title}\"")
    }
}

fn inline_link_rule() -> Rule {
    Rule::new(
        Filter::predicate(|tag, node, options| {
            options.link_style == LinkStyle::Inlined && is_link(tag, node)
        }),
        |node, content, _| {
            let href = node
                .attribute("href")
                .unwrap_or_default()
                .replace('(', "\\(")
                .replace(')', "\\)");
            let title = clean_attribute(node.attribute("title")).replace('"', "\\\"");
            format!("[{content}]({href}{})", title_part(&title))
        },
    )
}

fn reference_link_rule() -> Rule {
    let references: Arc<Mutex<Vec<String>>> = Arc::default();
    let store = Arc::clone(&references);

    Rule::new(
        Filter::predicate(|tag, node, options| {
            options.link_style == LinkStyle::Referenced && is_link(tag, node)
        }),
        move |node, content, options| {
            let href = node.attribute("href").unwrap_or_default();
            let title = title_part(&clean_attribute(node.attribute("title")));
            let mut store = store.lock().unwrap_or_else(|e| e.into_inner());

            let (replacement, reference) = match options.link_reference_style {
                LinkReferenceStyle::Collapsed => {
                    (format!("[{content}][]"), format!("[{content}]: {href}{title}"))
                }
                LinkReferenceStyle::Shortcut => {
                    (format!("[{content}]"), format!("[{content}]: {href}{title}"))
                }
                LinkReferenceStyle::Full => {
                    let id = store.len() + 1;
                    (format!("[{content}][{id}]"), format!("[{id}]: {href}{title}"))
                }
            };
            store.push(reference);
            replacement
        },
    )
    .with_append(move |_| {
        let mut store = references.lock().unwrap_or_else(|e| e.into_inner());
        if store.is_empty() {
            return String::new();
        }
        let mut output = String::from("\n\n");
        for reference in store.drain(..) {
            output.push_str(&reference);
            output.push('\n');
        }
        output.push_str("\n\n");
        output
    })
}

fn wrap_unless_blank(content: &str, delimiter: &str) -> String {
    if trim_str(content).is_empty() {
        return String::new();
    }
    format!("{delimiter}{content}{delimiter}")
}

fn code_rule() -> Rule {
    Rule::new(
        Filter::predicate(|tag, node, _| {
            if tag != "code" {
                return false;
            }
            // A lone <code> inside <pre> belongs to the code block rules.
            let in_pre = node.parent().is_some_and(|parent| parent.has_tag("pre"));
            let has_siblings = node
                .parent()
                .is_some_and(|parent| parent.element_children().any(|child| child != node));
            !(in_pre && !has_siblings)
        }),
        |_, content, _| {
            if content.is_empty() {
                return String::new();
            }
            let normalized = LINE_ENDING.replace_all(content, " ");
            let pad = if NEEDS_PADDING.is_match(&normalized) { " " } else { "" };

            let runs: Vec<&str> = BACKTICK_RUN.find_iter(&normalized).map(|m| m.as_str()).collect();
            let mut delimiter = String::from("`");
            while runs.contains(&delimiter.as_str()) {
                delimiter.push('`');
            }
            format!("{delimiter}{pad}{normalized}{pad}{delimiter}")
        },
    )
}

fn image(node: NodeRef<'_>, _: &str, _: &TurndownOptions) -> String {
    let src = node.attribute("src").unwrap_or_default();
    if src.is_empty() {
        return String::new();
    }
    let alt = clean_attribute(node.attribute("alt"));
    let title = clean_attribute(node.attribute("title"));
    format!("![{alt}]({src}{})", title_part(&title))
}
