//! Conversion options.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::document::NodeRef;
use crate::utilities::{advanced_escape, is_block, minimal_escape, serialize_node};
use crate::{Result, TurndownError};

/// Hook called with the converted content of a node and the node itself.
pub type ReplacementFn = Arc<dyn Fn(&str, NodeRef<'_>) -> String + Send + Sync>;

/// Wrap a closure as a [`ReplacementFn`].
pub fn hook<F>(f: F) -> ReplacementFn
where
    F: Fn(&str, NodeRef<'_>) -> String + Send + Sync + 'static,
{
    Arc::new(f)
}

/// User-supplied text escaper.
pub type EscapeFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Heading style options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeadingStyle {
    /// Underline h1 and h2 with `=` or `-`; deeper levels fall back to ATX
    #[default]
    Setext,
    /// Prefix with `#`
    Atx,
}

/// Code block style options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeBlockStyle {
    /// Indent by 4 spaces
    #[default]
    Indented,
    /// Wrap in a fence
    Fenced,
}

/// Link style options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkStyle {
    /// `[text](url)`
    #[default]
    Inlined,
    /// `[text][ref]` plus a reference list at the end
    Referenced,
}

/// Reference style for referenced links
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkReferenceStyle {
    /// `[text][1]`
    #[default]
    Full,
    /// `[text][]`
    Collapsed,
    /// `[text]`
    Shortcut,
}

macro_rules! option_enum {
    ($ty:ident, $key:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(self) -> &'static str {
                match self {
                    $($ty::$variant => $name,)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = TurndownError;

            fn from_str(s: &str) -> Result<Self> {
                match s.to_ascii_lowercase().as_str() {
                    $($name => Ok($ty::$variant),)+
                    _ => Err(invalid($key, s)),
                }
            }
        }
    };
}

option_enum!(HeadingStyle, "headingStyle", { Setext => "setext", Atx => "atx" });
option_enum!(CodeBlockStyle, "codeBlockStyle", { Indented => "indented", Fenced => "fenced" });
option_enum!(LinkStyle, "linkStyle", { Inlined => "inlined", Referenced => "referenced" });
option_enum!(LinkReferenceStyle, "linkReferenceStyle", {
    Full => "full",
    Collapsed => "collapsed",
    Shortcut => "shortcut",
});

/// How text outside code is escaped.
#[derive(Clone, Default)]
pub enum Escape {
    /// Backslash-escape everything that could start Markdown syntax
    #[default]
    Advanced,
    /// Escape only backslashes and brackets
    Minimal,
    Custom(EscapeFn),
}

impl Escape {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Escape::Custom(Arc::new(f))
    }

    pub fn apply(&self, text: &str) -> String {
        match self {
            Escape::Advanced => advanced_escape(text),
            Escape::Minimal => minimal_escape(text),
            Escape::Custom(f) => f(text),
        }
    }
}

impl fmt::Debug for Escape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Escape::Advanced => f.write_str("Advanced"),
            Escape::Minimal => f.write_str("Minimal"),
            Escape::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl FromStr for Escape {
    type Err = TurndownError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "advanced" => Ok(Escape::Advanced),
            "minimal" => Ok(Escape::Minimal),
            _ => Err(invalid("escape", s)),
        }
    }
}

/// Options for TurndownService
#[derive(Clone)]
pub struct TurndownOptions {
    pub heading_style: HeadingStyle,

    /// Horizontal rule string
    pub hr: String,

    /// `*`, `-` or `+`
    pub bullet_list_marker: char,

    pub code_block_style: CodeBlockStyle,

    /// Fence for fenced code blocks; only its first character is used
    pub fence: String,

    /// `_` or `*`
    pub em_delimiter: char,

    /// `**` or `__`
    pub strong_delimiter: String,

    pub link_style: LinkStyle,

    pub link_reference_style: LinkReferenceStyle,

    /// Line break marker emitted before the newline of a `<br>`
    pub br: String,

    /// Keep whitespace inside inline `<code>` exactly as written
    pub preformatted_code: bool,

    pub escape: Escape,

    /// Tags rendered through `keep_replacement` without consulting any rule
    pub keep_tags: Vec<String>,

    pub blank_replacement: ReplacementFn,

    pub keep_replacement: ReplacementFn,

    pub default_replacement: ReplacementFn,
}

impl Default for TurndownOptions {
    fn default() -> Self {
        Self {
            heading_style: HeadingStyle::Setext,
            hr: "* * *".to_string(),
            bullet_list_marker: '*',
            code_block_style: CodeBlockStyle::Indented,
            fence: "```".to_string(),
            em_delimiter: '_',
            strong_delimiter: "**".to_string(),
            link_style: LinkStyle::Inlined,
            link_reference_style: LinkReferenceStyle::Full,
            br: "  ".to_string(),
            preformatted_code: false,
            escape: Escape::Advanced,
            keep_tags: Vec::new(),
            blank_replacement: hook(|_, node| {
                if is_block(node) { "\n\n".to_string() } else { String::new() }
            }),
            keep_replacement: hook(|_, node| serialize_node(node)),
            default_replacement: hook(|content, node| {
                if is_block(node) {
                    format!("\n\n{content}\n\n")
                } else {
                    content.to_string()
                }
            }),
        }
    }
}

impl fmt::Debug for TurndownOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TurndownOptions")
            .field("heading_style", &self.heading_style)
            .field("hr", &self.hr)
            .field("bullet_list_marker", &self.bullet_list_marker)
            .field("code_block_style", &self.code_block_style)
            .field("fence", &self.fence)
            .field("em_delimiter", &self.em_delimiter)
            .field("strong_delimiter", &self.strong_delimiter)
            .field("link_style", &self.link_style)
            .field("link_reference_style", &self.link_reference_style)
            .field("br", &self.br)
            .field("preformatted_code", &self.preformatted_code)
            .field("escape", &self.escape)
            .field("keep_tags", &self.keep_tags)
            .finish_non_exhaustive()
    }
}

impl TurndownOptions {
    /// Set an option from its string form.
    ///
    /// Keys may be camelCase (`headingStyle`) or snake_case (`heading_style`).
    ///
    /// ```rust
    /// use turndown::{HeadingStyle, TurndownOptions};
    ///
    /// let mut options = TurndownOptions::default();
    /// options.set("headingStyle", "atx").unwrap();
    /// assert_eq!(options.heading_style, HeadingStyle::Atx);
    /// assert!(options.set("colour", "red").is_err());
    /// ```
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let normalized: String = key
            .chars()
            .filter(|c| !matches!(c, '_' | '-'))
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "headingstyle" => self.heading_style = value.parse()?,
            "hr" => self.hr = value.to_string(),
            "bulletlistmarker" => {
                self.bullet_list_marker = single_char(value, &['*', '-', '+'])
                    .ok_or_else(|| invalid("bulletListMarker", value))?;
            }
            "codeblockstyle" => self.code_block_style = value.parse()?,
            "fence" => {
                if !matches!(value, "```" | "~~~") {
                    return Err(invalid("fence", value));
                }
                self.fence = value.to_string();
            }
            "emdelimiter" => {
                self.em_delimiter =
                    single_char(value, &['_', '*']).ok_or_else(|| invalid("emDelimiter", value))?;
            }
            "strongdelimiter" => {
                if !matches!(value, "**" | "__") {
                    return Err(invalid("strongDelimiter", value));
                }
                self.strong_delimiter = value.to_string();
            }
            "linkstyle" => self.link_style = value.parse()?,
            "linkreferencestyle" => self.link_reference_style = value.parse()?,
            "br" => self.br = value.to_string(),
            "preformattedcode" => {
                self.preformatted_code = match value.to_ascii_lowercase().as_str() {
                    "true" | "1" | "yes" => true,
                    "false" | "0" | "no" => false,
                    _ => return Err(invalid("preformattedCode", value)),
                };
            }
            "escape" | "escapefunction" => self.escape = value.parse()?,
            "keeptags" => {
                self.keep_tags = value
                    .split(',')
                    .map(|tag| tag.trim().to_ascii_lowercase())
                    .filter(|tag| !tag.is_empty())
                    .collect();
            }
            _ => return Err(TurndownError::UnknownOption(key.to_string())),
        }
        Ok(())
    }
}

fn single_char(value: &str, allowed: &[char]) -> Option<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if allowed.contains(&c) => Some(c),
        _ => None,
    }
}

fn invalid(key: &str, value: &str) -> TurndownError {
    TurndownError::InvalidOption {
        key: key.to_string(),
        value: value.to_string(),
    }
}
