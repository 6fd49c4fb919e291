//! Link extraction: relative `[text](./path)` tokens from markdown text.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::types::LinkToken;

/// Fenced code blocks, non-greedy across lines.
static FENCED_CODE: LazyLock<Regex> = LazyLock::new(|| return compile(r"(?s)```.*?```"));

/// Bracketed text followed by a parenthesized `./` or `../` path. The text
/// may wrap across lines; the href may not.
static RELATIVE_LINK: LazyLock<Regex> =
    LazyLock::new(|| return compile(r"\[([^\]]*)\]\((\.\.?/[^)\n]+)\)"));

/// An href split into the part that names a file and its fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HrefParts<'a> {
    /// Fragment after `#`, without any trailing `?query`. `None` when absent or empty.
    pub anchor: Option<&'a str>,
    /// Everything before the first `#` or `?`.
    pub path: &'a str,
}

/// Compile a hardcoded pattern.
#[allow(clippy::expect_used, reason = "patterns are string literals checked by tests")]
fn compile(pattern: &str) -> Regex {
    return Regex::new(pattern).expect("valid regex");
}

/// Extract every relative link token from a document, skipping fenced code.
/// Line numbers refer to the original content and name the line the link
/// starts on.
pub fn extract_links(content: &str) -> Vec<LinkToken> {
    let stripped = strip_code_blocks(content);
    let mut tokens = Vec::new();
    let mut line_no = 1_u32;
    let mut counted_to = 0_usize;
    for cap in RELATIVE_LINK.captures_iter(&stripped) {
        let (Some(whole), Some(text), Some(href)) = (cap.get(0), cap.get(1), cap.get(2)) else {
            continue;
        };
        let newlines = stripped
            .get(counted_to..whole.start())
            .map_or(0, |between| return between.matches('\n').count());
        line_no = line_no.saturating_add(u32::try_from(newlines).unwrap_or(u32::MAX));
        counted_to = whole.start();
        tokens.push(LinkToken {
            href: href.as_str().to_string(),
            line: line_no,
            text: text.as_str().to_string(),
        });
    }
    return tokens;
}

/// Split an href into path and anchor. The anchor wins over a query: a query
/// before or after the fragment is dropped either way.
pub fn split_href(href: &str) -> HrefParts<'_> {
    let (before_fragment, anchor) = match href.split_once('#') {
        None => (href, None),
        Some((path, fragment)) => {
            let fragment = fragment.split_once('?').map_or(fragment, |(f, _)| return f);
            (path, Some(fragment).filter(|f| return !f.is_empty()))
        },
    };
    let path = before_fragment
        .split_once('?')
        .map_or(before_fragment, |(p, _)| return p);
    return HrefParts { anchor, path };
}

/// Blank out fenced code blocks, keeping their newlines so line numbers hold.
pub fn strip_code_blocks(content: &str) -> String {
    return FENCED_CODE
        .replace_all(content, |cap: &Captures<'_>| {
            let newlines = cap.get(0).map_or(0, |m| return m.as_str().matches('\n').count());
            return "\n".repeat(newlines);
        })
        .into_owned();
}
