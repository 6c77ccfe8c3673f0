//! Markdown link rendering for model replies
//!
//! Replies may contain `[text](url)` links. Each link is rendered by the
//! first matching rule of an ordered list:
//!
//! 1. item pages (`https://nexreality.io/.../NN/`) become a styled
//!    "Click to view" button
//! 2. shortened image URLs (`tinyurl.com`) become a centered inline image
//! 3. anything else becomes a plain anchor keeping the link text
//!
//! Text outside links passes through untouched.

mod config;
mod detector;

pub use config::LinkConfig;
pub use detector::{MarkdownLink, parse_links};

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Trailing two-digit path segment, e.g. `/42/`
static TWO_DIGIT_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/[0-9]{2}/$").expect("valid regex"));

type Predicate = Box<dyn Fn(&MarkdownLink<'_>) -> bool + Send + Sync>;
type Renderer = Box<dyn Fn(&MarkdownLink<'_>) -> String + Send + Sync>;

/// A `(predicate, renderer)` pair
pub struct LinkRule {
    name: &'static str,
    matches: Predicate,
    render: Renderer,
}

impl LinkRule {
    /// Create a rule from a predicate and a renderer
    pub fn new<P, R>(name: &'static str, matches: P, render: R) -> Self
    where
        P: Fn(&MarkdownLink<'_>) -> bool + Send + Sync + 'static,
        R: Fn(&MarkdownLink<'_>) -> String + Send + Sync + 'static,
    {
        Self {
            name,
            matches: Box::new(matches),
            render: Box::new(render),
        }
    }

    /// Rule name, for logging and tests
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Whether this rule applies to `link`
    #[must_use]
    pub fn matches(&self, link: &MarkdownLink<'_>) -> bool {
        (self.matches)(link)
    }

    /// Render `link` as HTML
    #[must_use]
    pub fn render(&self, link: &MarkdownLink<'_>) -> String {
        (self.render)(link)
    }
}

impl fmt::Debug for LinkRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkRule").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Rule name of item page links
pub const ITEM_PAGE_RULE: &str = "item_page";
/// Rule name of inline image links
pub const IMAGE_RULE: &str = "image";
/// Rule name of the plain anchor fallback
pub const PLAIN_RULE: &str = "plain";

/// Escape a value for use inside a double-quoted attribute
fn escape_attr(value: &str) -> String {
    value.replace('"', "&quot;")
}

/// Item page link: styled button, link text discarded
#[must_use]
pub fn item_page_rule(url_prefix: String, label: String) -> LinkRule {
    LinkRule::new(
        ITEM_PAGE_RULE,
        move |link| link.url.starts_with(&url_prefix) && TWO_DIGIT_SEGMENT.is_match(link.url),
        move |link| {
            format!(
                "<a href=\"{}\" target=\"_blank\" style=\"color: #007bff; text-decoration: none; font-size: 14px; font-weight: bold;\">{label}</a>",
                escape_attr(link.url)
            )
        },
    )
}

/// Shortened image link: centered, rounded, shadowed `<img>`
#[must_use]
pub fn image_rule(host: String) -> LinkRule {
    LinkRule::new(
        IMAGE_RULE,
        move |link| link.url.contains(host.as_str()),
        |link| {
            format!(
                "<div style=\"text-align: center; margin-top: 20px;\"><img src=\"{}\" alt=\"Image\" style=\"max-width: 100%; height: auto; border-radius: 8px; box-shadow: 0 4px 12px rgba(0, 0, 0, 0.1); transition: transform 0.3s ease, box-shadow 0.3s ease;\"></div>",
                escape_attr(link.url)
            )
        },
    )
}

/// Fallback: plain anchor keeping the link text
#[must_use]
pub fn plain_rule() -> LinkRule {
    LinkRule::new(
        PLAIN_RULE,
        |_| true,
        |link| {
            format!(
                "<a href=\"{}\" target=\"_blank\">{}</a>",
                escape_attr(link.url),
                link.text
            )
        },
    )
}

/// Rewrites markdown links into HTML using an ordered rule list
#[derive(Debug)]
pub struct LinkFormatter {
    rules: Vec<LinkRule>,
}

impl LinkFormatter {
    /// Standard rules: item page, image, plain anchor
    #[must_use]
    pub fn new(config: &LinkConfig) -> Self {
        Self::with_rules(vec![
            item_page_rule(config.item_url_prefix.clone(), config.item_label.clone()),
            image_rule(config.image_host.clone()),
            plain_rule(),
        ])
    }

    /// Custom rules, tried in order
    #[must_use]
    pub const fn with_rules(rules: Vec<LinkRule>) -> Self {
        Self { rules }
    }

    /// First rule that matches `link`
    #[must_use]
    pub fn rule_for(&self, link: &MarkdownLink<'_>) -> Option<&LinkRule> {
        self.rules.iter().find(|rule| rule.matches(link))
    }

    /// Replace every markdown link in `text` with its rendered HTML
    ///
    /// Links no rule matches are kept verbatim.
    #[must_use]
    pub fn format(&self, text: &str) -> String {
        let links = parse_links(text);
        if links.is_empty() {
            return text.to_string();
        }

        let mut out = String::with_capacity(text.len());
        let mut cursor = 0;
        for link in &links {
            out.push_str(&text[cursor..link.span.start]);
            match self.rule_for(link) {
                Some(rule) => out.push_str(&rule.render(link)),
                None => out.push_str(&text[link.span.clone()]),
            }
            cursor = link.span.end;
        }
        out.push_str(&text[cursor..]);
        out
    }
}

impl Default for LinkFormatter {
    fn default() -> Self {
        Self::new(&LinkConfig::default())
    }
}
