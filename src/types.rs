/// Core domain types for doclinks: link tokens, issues, and run results.
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// Aggregate counts of issues by category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    /// Broken links with several same-named candidates.
    pub ambiguous: usize,
    /// Broken links with exactly one candidate elsewhere in the tree.
    pub auto_fixable: usize,
    /// Anchors that match no heading in an existing target.
    pub broken_anchor: usize,
    /// Broken links with no same-named document anywhere in the tree.
    pub not_found: usize,
}

impl Counts {
    /// Bump the counter for one issue's category.
    pub fn record(&mut self, category: Category) {
        let slot = match category {
            Category::Ambiguous => &mut self.ambiguous,
            Category::AutoFixable => &mut self.auto_fixable,
            Category::BrokenAnchor => &mut self.broken_anchor,
            Category::NotFound => &mut self.not_found,
        };
        *slot = slot.saturating_add(1);
        return;
    }

    /// Total number of issues across every category.
    pub const fn total(&self) -> usize {
        return self
            .ambiguous
            .saturating_add(self.auto_fixable)
            .saturating_add(self.broken_anchor)
            .saturating_add(self.not_found);
    }
}

/// Flat classification of an issue, used for tallies and console tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// `broken-link` with several candidates.
    Ambiguous,
    /// `broken-link` with exactly one candidate.
    AutoFixable,
    /// `broken-anchor`.
    BrokenAnchor,
    /// `broken-link` with no candidate.
    NotFound,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Category::Ambiguous => "broken-link (ambiguous)",
            Category::AutoFixable => "broken-link (auto-fixable)",
            Category::BrokenAnchor => "broken-anchor",
            Category::NotFound => "broken-link (not-found)",
        };
        return f.write_str(tag);
    }
}

/// Issues found in one scanned document.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// Whether the document was rewritten with at least one fix.
    pub fixed: bool,
    /// Issues in source order.
    pub issues: Vec<Issue>,
    /// Absolute path of the document. Not serialized; `path` is the public name.
    #[serde(skip)]
    pub location: PathBuf,
    /// Document path relative to the scan root, forward slashes.
    pub path: String,
}

/// What the fixer concluded for an unresolved link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum FixSuggestion {
    /// Several documents share the basename; never rewritten.
    Ambiguous {
        /// Candidate locations relative to the scan root.
        candidates: Vec<String>,
    },
    /// Exactly one document shares the basename.
    AutoFixable {
        /// Candidate location relative to the scan root.
        location: String,
        /// Replacement href relative to the source document. Never empty.
        suggested_href: String,
    },
    /// No document shares the basename.
    NotFound {
        /// Human-readable explanation.
        reason: String,
    },
}

/// Outcome of validating one link token that did not check out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    /// Whether this link was rewritten to its suggested href.
    pub fixed: bool,
    /// Raw href exactly as written in the document.
    pub href: String,
    /// Broken link or broken anchor, with details.
    #[serde(flatten)]
    pub kind: IssueKind,
    /// One-based line number in the source document.
    pub line: u32,
    /// Display text of the link.
    pub text: String,
}

impl Issue {
    /// Flat category of this issue.
    pub const fn category(&self) -> Category {
        return match &self.kind {
            IssueKind::BrokenAnchor { .. } => Category::BrokenAnchor,
            IssueKind::BrokenLink { suggestion } => match suggestion {
                FixSuggestion::Ambiguous { .. } => Category::Ambiguous,
                FixSuggestion::AutoFixable { .. } => Category::AutoFixable,
                FixSuggestion::NotFound { .. } => Category::NotFound,
            },
        };
    }

    /// The replacement href, if this issue can be fixed automatically.
    pub fn suggested_href(&self) -> Option<&str> {
        return match &self.kind {
            IssueKind::BrokenLink {
                suggestion: FixSuggestion::AutoFixable { suggested_href, .. },
            } => Some(suggested_href.as_str()),
            _ => None,
        };
    }
}

/// The two issue variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum IssueKind {
    /// Target exists, anchor matches none of its headings.
    BrokenAnchor {
        /// The anchor slug as written, without `#`.
        anchor: String,
        /// Up to five valid anchors of the target, for diagnostics.
        available: Vec<String>,
    },
    /// Target could not be located.
    BrokenLink {
        /// Fix suggester result.
        suggestion: FixSuggestion,
    },
}

/// A relative link found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkToken {
    /// Raw href between the parentheses.
    pub href: String,
    /// One-based line number in the source document.
    pub line: u32,
    /// Display text between the brackets.
    pub text: String,
}

/// Aggregate result of one run over a scan root.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    /// Issue tallies by category.
    pub counts: Counts,
    /// Only documents with at least one issue.
    pub files: Vec<FileReport>,
    /// Number of documents read and validated.
    pub files_scanned: usize,
    /// Number of auto-fixable issues whose document was rewritten.
    pub fixes_applied: usize,
    /// Issues still outstanding after any fixes were applied.
    pub remaining: usize,
    /// Scan root the run covered.
    pub root: PathBuf,
}

impl RunResult {
    /// Whether the run finished with nothing left to report.
    pub const fn is_clean(&self) -> bool {
        return self.remaining == 0;
    }
}
