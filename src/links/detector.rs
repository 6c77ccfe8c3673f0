//! Markdown link detection in text

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

/// Regex for `[text](http(s)://url)` links
static MARKDOWN_LINK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(.*?)\]\((https?://[^\s)]+)\)").expect("valid regex")
});

/// A markdown link found in text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownLink<'a> {
    /// Bracketed link text
    pub text: &'a str,
    /// Parenthesized URL
    pub url: &'a str,
    /// Byte range of the whole `[text](url)` occurrence
    pub span: Range<usize>,
}

/// Detect all markdown links in a string, left to right
#[must_use]
pub fn parse_links(text: &str) -> Vec<MarkdownLink<'_>> {
    MARKDOWN_LINK_REGEX
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(MarkdownLink {
                text: caps.get(1)?.as_str(),
                url: caps.get(2)?.as_str(),
                span: whole.range(),
            })
        })
        .collect()
}
