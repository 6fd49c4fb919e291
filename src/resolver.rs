//! Link resolution: locate each relative link's target and check its anchor.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use crate::anchors::AnchorCache;
use crate::config::Config;
use crate::discover::{DOCUMENT_EXTENSION, is_document};
use crate::fixer;
use crate::index::FilenameIndex;
use crate::scanner::{extract_links, split_href};
use crate::types::{Issue, IssueKind, LinkToken};

/// Number of valid anchors listed on a broken-anchor issue.
const SAMPLE_ANCHORS: usize = 5;

/// Validates documents against the filesystem. Holds the read-only index
/// and a per-run cache of target anchors; nothing else is shared.
pub struct Resolver<'a> {
    /// Heading anchors of targets seen so far in this run.
    anchors: AnchorCache,
    /// Skip-list and index document name.
    config: &'a Config,
    /// Basename lookup used to suggest fixes.
    index: &'a FilenameIndex,
    /// Scan root; candidate locations are reported relative to it.
    root: &'a Path,
}

impl<'a> Resolver<'a> {
    /// Create a resolver for one run.
    pub fn new(root: &'a Path, config: &'a Config, index: &'a FilenameIndex) -> Self {
        return Self {
            anchors: AnchorCache::default(),
            config,
            index,
            root,
        };
    }

    /// Validate every relative link in one document, in source order.
    pub fn validate(&mut self, document: &Path, content: &str) -> Vec<Issue> {
        let source_dir = document.parent().unwrap_or(self.root);
        return extract_links(content)
            .iter()
            .filter_map(|token| return self.validate_link(document, source_dir, token))
            .collect();
    }

    /// Validate a single link token, returning an issue if it is broken.
    fn validate_link(
        &mut self,
        document: &Path,
        source_dir: &Path,
        token: &LinkToken,
    ) -> Option<Issue> {
        let parts = split_href(&token.href);
        if self.config.is_skipped_asset(parts.path) {
            return None;
        }

        let candidate = normalize_path(&source_dir.join(parts.path));
        let Some(target) = locate_target(&candidate, &self.config.index_file) else {
            let suggestion = fixer::suggest(document, &token.href, self.index, self.root);
            return Some(issue_for(token, IssueKind::BrokenLink { suggestion }));
        };

        let anchor = parts.anchor?;
        let known = self.anchors.anchors_for(&target);
        if known.iter().any(|a| return a == anchor) {
            return None;
        }

        let available = known.iter().take(SAMPLE_ANCHORS).cloned().collect();
        return Some(issue_for(
            token,
            IssueKind::BrokenAnchor {
                anchor: anchor.to_string(),
                available,
            },
        ));
    }
}

/// Append the document extension to a path without touching the existing one.
fn append_document_extension(path: &Path) -> PathBuf {
    let mut raw: OsString = path.as_os_str().to_owned();
    raw.push(".");
    raw.push(DOCUMENT_EXTENSION);
    return PathBuf::from(raw);
}

/// Build an issue for a token.
fn issue_for(token: &LinkToken, kind: IssueKind) -> Issue {
    return Issue {
        fixed: false,
        href: token.href.clone(),
        kind,
        line: token.line,
        text: token.text.clone(),
    };
}

/// Find the file a resolved link path refers to. First match wins:
/// the exact file, the path with `.md` appended (when it has no `.md`
/// extension), the index document of the directory it names, and the index
/// document of the directory named by the path without its extension.
pub fn locate_target(candidate: &Path, index_file: &str) -> Option<PathBuf> {
    if candidate.is_file() {
        return Some(candidate.to_path_buf());
    }

    if !is_document(candidate) {
        let with_ext = append_document_extension(candidate);
        if with_ext.is_file() {
            return Some(with_ext);
        }
    }

    if candidate.is_dir() {
        let index = candidate.join(index_file);
        if index.is_file() {
            return Some(index);
        }
    }

    let stem = candidate.with_extension("");
    if stem != candidate && stem.is_dir() {
        let index = stem.join(index_file);
        if index.is_file() {
            return Some(index);
        }
    }

    return None;
}

/// Collapse `.` and `..` components in a path without touching the filesystem.
/// Preserves leading `..` when there is nothing left to pop.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        push_normalized_component(&mut components, component);
    }
    return components.iter().collect();
}

/// Handle a single path component during normalization.
/// `..` only pops a normal segment; roots and prefixes are never popped.
fn push_normalized_component<'a>(components: &mut Vec<Component<'a>>, component: Component<'a>) {
    match component {
        Component::CurDir => {},
        Component::ParentDir => match components.last() {
            Some(Component::Normal(_)) => {
                components.pop();
            },
            Some(Component::RootDir | Component::Prefix(_)) => {},
            _ => components.push(component),
        },
        other => components.push(other),
    }
    return;
}
