//! Heading anchors: slugification and a per-run cache of target headings.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::scanner::strip_code_blocks;

/// ATX heading line; captures the text after the marker.
static HEADING: LazyLock<Regex> = LazyLock::new(|| return compile(r"(?m)^#{1,6}[ \t]+(.+)$"));

/// Backtick-delimited inline code span.
static CODE_SPAN: LazyLock<Regex> = LazyLock::new(|| return compile(r"`[^`]*`"));

/// `**bold**`.
static BOLD: LazyLock<Regex> = LazyLock::new(|| return compile(r"\*\*([^*]+)\*\*"));

/// `*italic*`.
static ITALIC: LazyLock<Regex> = LazyLock::new(|| return compile(r"\*([^*]+)\*"));

/// `[text](url)`.
static INLINE_LINK: LazyLock<Regex> =
    LazyLock::new(|| return compile(r"\[([^\]]*)\]\([^)]*\)"));

/// Anything that is not a Unicode word character, whitespace, or hyphen.
static NON_SLUG: LazyLock<Regex> = LazyLock::new(|| return compile(r"[^\w\s-]"));

/// Whitespace runs.
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| return compile(r"\s+"));

/// Hyphen runs.
static HYPHENS: LazyLock<Regex> = LazyLock::new(|| return compile(r"-+"));

/// Emoji codepoints removed from slugs.
const EMOJI: std::ops::RangeInclusive<char> = '\u{1F300}'..='\u{1F9FF}';

/// Anchors of target documents, read lazily and kept for one run.
#[derive(Debug, Default)]
pub struct AnchorCache {
    /// Target document to its anchors in heading order.
    by_document: HashMap<PathBuf, Vec<String>>,
}

impl AnchorCache {
    /// Anchors of `path`, reading and slugifying its headings on first use.
    /// An unreadable target has no anchors.
    pub fn anchors_for(&mut self, path: &Path) -> &[String] {
        return self
            .by_document
            .entry(path.to_path_buf())
            .or_insert_with(|| return read_anchors(path));
    }
}

/// Compile a hardcoded pattern.
#[allow(clippy::expect_used, reason = "patterns are string literals checked by tests")]
fn compile(pattern: &str) -> Regex {
    return Regex::new(pattern).expect("valid regex");
}

/// Slugs of every heading outside fenced code, deduplicated, in order.
pub fn heading_anchors(content: &str) -> Vec<String> {
    let stripped = strip_code_blocks(content);
    let mut anchors: Vec<String> = Vec::new();
    for cap in HEADING.captures_iter(&stripped) {
        let Some(text) = cap.get(1) else { continue };
        let slug = slugify(text.as_str());
        if !slug.is_empty() && !anchors.contains(&slug) {
            anchors.push(slug);
        }
    }
    return anchors;
}

/// Read a document and collect its anchors; empty on any read failure.
fn read_anchors(path: &Path) -> Vec<String> {
    return std::fs::read_to_string(path)
        .map(|content| return heading_anchors(&content))
        .unwrap_or_default();
}

/// Convert heading text to its anchor slug.
///
/// Strips code spans, bold, italics, and link syntax (in that order), then
/// lower-cases, drops emoji and punctuation, turns whitespace runs into a
/// single hyphen, collapses hyphen runs, and trims hyphens from both ends.
///
/// Word characters are Unicode word characters, so `Über` keeps its `ü`.
/// An ASCII-only reading of the punctuation rule would drop it; slugs here
/// intentionally differ from renderers that use that reading.
pub fn slugify(heading: &str) -> String {
    let text = CODE_SPAN.replace_all(heading, "");
    let text = BOLD.replace_all(&text, "$1");
    let text = ITALIC.replace_all(&text, "$1");
    let text = INLINE_LINK.replace_all(&text, "$1");
    let lowered: String = text
        .to_lowercase()
        .chars()
        .filter(|c| return !EMOJI.contains(c))
        .collect();
    let text = NON_SLUG.replace_all(&lowered, "");
    let text = WHITESPACE.replace_all(&text, "-");
    let text = HYPHENS.replace_all(&text, "-");
    return text.trim_matches('-').to_string();
}
