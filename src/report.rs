//! Run aggregation, in-place fix application, and report output.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::discover::{discover, relative_to_root};
use crate::error::Error;
use crate::index::FilenameIndex;
use crate::resolver::Resolver;
use crate::types::{Counts, FileReport, FixSuggestion, Issue, IssueKind, RunResult};

/// A document whose auto-fixable issues may be written back.
struct PendingRewrite {
    /// Exact content read before analysis.
    content: String,
    /// Index into `RunResult::files`.
    report: usize,
}

/// Rewrite every `[text](old)` with `[text](new)` for each auto-fixable issue.
/// Returns the new content and the indices of the issues it repairs. An issue
/// counts as repaired when its exact link token appears in the original content.
pub fn apply_fixes_to_content(content: &str, issues: &[Issue]) -> (String, Vec<usize>) {
    let mut rewritten = content.to_string();
    let mut repaired = Vec::new();
    for (idx, issue) in issues.iter().enumerate() {
        let Some(new_href) = issue.suggested_href() else { continue };
        let old_token = format!("[{}]({})", issue.text, issue.href);
        if !content.contains(&old_token) {
            continue;
        }
        let new_token = format!("[{}]({new_href})", issue.text);
        rewritten = rewritten.replace(&old_token, &new_token);
        repaired.push(idx);
    }
    return (rewritten, repaired);
}

/// Write fixes for one document. Returns the indices of the issues repaired.
///
/// # Errors
///
/// Returns `Error::WriteFailed` if the document cannot be written.
fn apply_fixes_to_file(path: &Path, content: &str, issues: &[Issue]) -> Result<Vec<usize>, Error> {
    let (rewritten, repaired) = apply_fixes_to_content(content, issues);
    if repaired.is_empty() || rewritten == content {
        return Ok(repaired);
    }
    std::fs::write(path, rewritten).map_err(|source| {
        return Error::WriteFailed {
            path: path.to_path_buf(),
            source,
        };
    })?;
    return Ok(repaired);
}

/// Apply pending rewrites document by document. A failed write is reported
/// and skipped; the rest of the batch is still attempted. Returns the number
/// of issues repaired across every written document.
fn apply_pending_rewrites(files: &mut [FileReport], pending: &[PendingRewrite]) -> usize {
    let mut total = 0_usize;
    for rewrite in pending {
        let Some(file) = files.get_mut(rewrite.report) else { continue };
        match apply_fixes_to_file(&file.location, &rewrite.content, &file.issues) {
            Err(e) => eprintln!("warning: {e}"),
            Ok(repaired) => {
                for idx in &repaired {
                    if let Some(issue) = file.issues.get_mut(*idx) {
                        issue.fixed = true;
                    }
                }
                file.fixed = !repaired.is_empty();
                log_applied_fixes(file);
                total = total.saturating_add(repaired.len());
            },
        }
    }
    return total;
}

/// Short remediation text for an issue, shown after its tag.
fn describe_issue(issue: &Issue) -> String {
    return match &issue.kind {
        IssueKind::BrokenAnchor { anchor, available } => {
            if available.is_empty() {
                format!("#{anchor} matches no heading; target has no headings")
            } else {
                format!("#{anchor} matches no heading; available: {}", available.join(", "))
            }
        },
        IssueKind::BrokenLink { suggestion } => match suggestion {
            FixSuggestion::Ambiguous { candidates } => {
                format!("candidates: {}", candidates.join(", "))
            },
            FixSuggestion::AutoFixable { suggested_href, .. } => format!("-> {suggested_href}"),
            FixSuggestion::NotFound { reason } => reason.clone(),
        },
    };
}

/// Report each repaired link on stderr.
fn log_applied_fixes(file: &FileReport) {
    for issue in &file.issues {
        if !issue.fixed {
            continue;
        }
        if let Some(new_href) = issue.suggested_href() {
            eprintln!("fixed: {}:{}  {} -> {new_href}", file.path, issue.line, issue.href);
        }
    }
    return;
}

/// Print the human-readable report to stdout.
pub fn print_console(result: &RunResult, write: bool) {
    print!("{}", render_console(result, write));
    return;
}

/// Print the run result as pretty JSON to stdout.
///
/// # Errors
///
/// Returns `Error::Json` if serialization fails.
pub fn print_json(result: &RunResult) -> Result<(), Error> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    return Ok(());
}

/// Render the console report: one block per offending document, then totals.
pub fn render_console(result: &RunResult, write: bool) -> String {
    let mut out = String::new();
    for file in &result.files {
        let _ = writeln!(out, "{}", file.path);
        for issue in &file.issues {
            let category = issue.category();
            let status = if issue.fixed { "  (fixed)" } else { "" };
            let _ = writeln!(
                out,
                "  {:>4}  {category}  {}  {}{status}",
                issue.line,
                issue.href,
                describe_issue(issue),
            );
        }
        out.push('\n');
    }

    let counts = &result.counts;
    let _ = writeln!(
        out,
        "Scanned {} files: {} auto-fixable, {} ambiguous, {} not-found, {} broken-anchor",
        result.files_scanned,
        counts.auto_fixable,
        counts.ambiguous,
        counts.not_found,
        counts.broken_anchor,
    );
    if write {
        let _ = writeln!(out, "Applied {} fixes", result.fixes_applied);
    }
    if result.is_clean() {
        out.push_str("All links valid\n");
    } else {
        let _ = writeln!(out, "{} issues remain", result.remaining);
    }
    return out;
}

/// Validate every document under `root` and, when `write` is set, rewrite
/// auto-fixable links in place.
///
/// # Errors
///
/// Returns `Error::RootNotFound` if `root` is not an existing directory,
/// or `Error::Io` if it cannot be canonicalized. Per-document read and write
/// failures are reported on stderr and do not abort the run.
pub fn run(root: &Path, config: &Config, write: bool) -> Result<RunResult, Error> {
    if !root.is_dir() {
        return Err(Error::RootNotFound {
            path: root.to_path_buf(),
        });
    }
    let root = std::fs::canonicalize(root)?;

    let documents = discover(&root, config);
    let index = FilenameIndex::build(&documents);
    let mut resolver = Resolver::new(&root, config, &index);

    let mut counts = Counts::default();
    let mut files: Vec<FileReport> = Vec::new();
    let mut files_scanned = 0_usize;
    let mut pending: Vec<PendingRewrite> = Vec::new();

    for document in &documents {
        let content = match std::fs::read_to_string(document) {
            Err(e) => {
                eprintln!("warning: skipping {}: {e}", document.display());
                continue;
            },
            Ok(c) => c,
        };
        files_scanned = files_scanned.saturating_add(1);

        let issues = resolver.validate(document, &content);
        if issues.is_empty() {
            continue;
        }
        for issue in &issues {
            counts.record(issue.category());
        }

        let has_fixable = issues.iter().any(|i| return i.suggested_href().is_some());
        if write && has_fixable {
            pending.push(PendingRewrite {
                content,
                report: files.len(),
            });
        }
        files.push(FileReport {
            fixed: false,
            issues,
            location: document.clone(),
            path: relative_to_root(&root, document),
        });
    }

    let fixes_applied = if write { apply_pending_rewrites(&mut files, &pending) } else { 0 };

    return Ok(RunResult {
        counts,
        files,
        files_scanned,
        fixes_applied,
        remaining: counts.total().saturating_sub(fixes_applied),
        root: PathBuf::from(&root),
    });
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used, reason = "test code")]
mod tests {
    use std::fs;

    use super::*;

    fn tree(files: &[(&str, &str)]) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("docs");
        fs::create_dir_all(&root).unwrap();
        for (rel, content) in files {
            let path = root.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        return (dir, root);
    }

    fn auto_fixable(text: &str, href: &str, suggested_href: &str) -> Issue {
        return Issue {
            fixed: false,
            href: href.to_string(),
            kind: IssueKind::BrokenLink {
                suggestion: FixSuggestion::AutoFixable {
                    location: suggested_href.trim_start_matches("./").to_string(),
                    suggested_href: suggested_href.to_string(),
                },
            },
            line: 1,
            text: text.to_string(),
        };
    }

    fn report_for(location: PathBuf, issues: Vec<Issue>) -> FileReport {
        return FileReport {
            fixed: false,
            issues,
            path: relative_to_root(location.parent().unwrap(), &location),
            location,
        };
    }

    #[test]
    fn missing_root_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(&dir.path().join("nope"), &Config::default(), false).unwrap_err();
        assert!(matches!(err, Error::RootNotFound { .. }));
    }

    #[test]
    fn clean_tree_has_no_issues() {
        let (_dir, root) = tree(&[("a.md", "[b](./b.md)\n"), ("b.md", "# B\n")]);
        let result = run(&root, &Config::default(), false).unwrap();
        assert_eq!(result.files_scanned, 2);
        assert!(result.files.is_empty());
        assert!(result.is_clean());
    }

    #[test]
    fn tallies_every_category() {
        let (_dir, root) = tree(&[
            (
                "a.md",
                "[m](./missing.md)\n[o](./old.md)\n[d](./dup.md)\n[f](./file.md#nope)\n",
            ),
            ("moved/old.md", "# Old\n"),
            ("x/dup.md", ""),
            ("y/dup.md", ""),
            ("file.md", "# Real\n"),
        ]);
        let result = run(&root, &Config::default(), false).unwrap();
        assert_eq!(
            result.counts,
            Counts {
                ambiguous: 1,
                auto_fixable: 1,
                broken_anchor: 1,
                not_found: 1,
            }
        );
        assert_eq!(result.remaining, 4);
        assert_eq!(result.fixes_applied, 0);
        assert_eq!(result.files.len(), 1);
        assert_eq!(result.files[0].path, "a.md");
    }

    #[test]
    fn write_fixes_only_unambiguous_links_and_rerun_is_clean() {
        let original = "See [o](./old.md#intro) and [o](./old.md#intro).\n[d](./dup.md)\n";
        let (_dir, root) = tree(&[
            ("guide/a.md", original),
            ("ref/old.md", "# Intro\n"),
            ("x/dup.md", ""),
            ("y/dup.md", ""),
        ]);

        let result = run(&root, &Config::default(), true).unwrap();
        assert_eq!(result.counts.auto_fixable, 2);
        assert_eq!(result.fixes_applied, 2);
        assert_eq!(result.remaining, 1);

        let rewritten = fs::read_to_string(root.join("guide/a.md")).unwrap();
        assert_eq!(
            rewritten,
            "See [o](../ref/old.md#intro) and [o](../ref/old.md#intro).\n[d](./dup.md)\n"
        );

        let again = run(&root, &Config::default(), false).unwrap();
        assert_eq!(again.counts.auto_fixable, 0);
        assert_eq!(again.counts.ambiguous, 1);
    }

    #[test]
    fn dry_run_leaves_files_untouched() {
        let original = "[o](./old.md)\n";
        let (_dir, root) = tree(&[("a.md", original), ("sub/old.md", "")]);
        let result = run(&root, &Config::default(), false).unwrap();
        assert_eq!(result.remaining, 1);
        assert_eq!(fs::read_to_string(root.join("a.md")).unwrap(), original);
    }

    #[test]
    fn content_rewrite_preserves_everything_else() {
        let content = "# T\r\n\r\nkeep [x](./y.md) and [o](./old.md)  \r\n";
        let issues = vec![Issue {
            fixed: false,
            href: "./old.md".to_string(),
            kind: IssueKind::BrokenLink {
                suggestion: FixSuggestion::AutoFixable {
                    location: "n/old.md".to_string(),
                    suggested_href: "./n/old.md".to_string(),
                },
            },
            line: 3,
            text: "o".to_string(),
        }];
        let (rewritten, repaired) = apply_fixes_to_content(content, &issues);
        assert_eq!(repaired, [0]);
        assert_eq!(rewritten, "# T\r\n\r\nkeep [x](./y.md) and [o](./n/old.md)  \r\n");
    }

    #[test]
    fn console_report_lists_issues_and_totals() {
        let (_dir, root) = tree(&[("a.md", "[m](./missing.md)\n")]);
        let result = run(&root, &Config::default(), false).unwrap();
        let text = render_console(&result, false);
        assert!(text.contains("a.md\n"));
        assert!(text.contains("broken-link (not-found)  ./missing.md"));
        assert!(text.contains("1 not-found"));
        assert!(text.contains("1 issues remain"));
    }

    #[test]
    fn json_shape_is_tagged() {
        let (_dir, root) = tree(&[("a.md", "[o](./old.md)\n"), ("n/old.md", "")]);
        let result = run(&root, &Config::default(), false).unwrap();
        let value = serde_json::to_value(&result).unwrap();
        let issue = &value["files"][0]["issues"][0];
        assert_eq!(issue["type"], "broken-link");
        assert_eq!(issue["suggestion"]["status"], "auto-fixable");
        assert_eq!(issue["suggestion"]["suggested_href"], "./n/old.md");
        assert_eq!(issue["line"], 1);
        assert_eq!(value["counts"]["auto_fixable"], 1);
        assert!(value["files"][0].get("location").is_none());
    }

    #[test]
    fn wrapped_link_text_is_reported_and_fixed() {
        let original = "See the [installation\nguide](./setup.md) for details.\n";
        let (_dir, root) = tree(&[("a.md", original), ("ref/setup.md", "# Setup\n")]);

        let dry = run(&root, &Config::default(), false).unwrap();
        assert_eq!(dry.counts.auto_fixable, 1);
        assert_eq!(dry.files[0].issues[0].line, 1);

        let written = run(&root, &Config::default(), true).unwrap();
        assert_eq!(written.fixes_applied, 1);
        assert_eq!(
            fs::read_to_string(root.join("a.md")).unwrap(),
            "See the [installation\nguide](./ref/setup.md) for details.\n"
        );
    }

    #[test]
    fn wrapped_missing_link_is_not_found() {
        let (_dir, root) = tree(&[("a.md", "See the [installation\nguide](./missing.md).\n")]);
        let result = run(&root, &Config::default(), false).unwrap();
        assert_eq!(result.counts.not_found, 1);
        assert_eq!(result.remaining, 1);
    }

    #[test]
    fn failed_write_does_not_stop_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let blocked = dir.path().join("blocked.md");
        fs::create_dir(&blocked).unwrap();
        let good = dir.path().join("good.md");
        let content = "[o](./old.md)\n";
        fs::write(&good, content).unwrap();

        let mut files = vec![
            report_for(blocked, vec![auto_fixable("o", "./old.md", "./n/old.md")]),
            report_for(good.clone(), vec![auto_fixable("o", "./old.md", "./n/old.md")]),
        ];
        let pending = [
            PendingRewrite {
                content: content.to_string(),
                report: 0,
            },
            PendingRewrite {
                content: content.to_string(),
                report: 1,
            },
        ];

        let total = apply_pending_rewrites(&mut files, &pending);
        assert_eq!(total, 1);
        assert!(!files[0].fixed);
        assert!(!files[0].issues[0].fixed);
        assert!(files[1].fixed);
        assert_eq!(fs::read_to_string(&good).unwrap(), "[o](./n/old.md)\n");
    }

    #[test]
    fn only_replaced_links_are_marked_fixed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.md");
        let content = "[o](./old.md)\n";
        fs::write(&path, content).unwrap();

        let mut files = vec![report_for(
            path,
            vec![
                auto_fixable("o", "./old.md", "./n/old.md"),
                auto_fixable("gone", "./other.md", "./n/other.md"),
            ],
        )];
        let pending = [PendingRewrite {
            content: content.to_string(),
            report: 0,
        }];

        assert_eq!(apply_pending_rewrites(&mut files, &pending), 1);
        assert!(files[0].issues[0].fixed);
        assert!(!files[0].issues[1].fixed);

        let result = RunResult {
            counts: Counts {
                auto_fixable: 2,
                ..Counts::default()
            },
            files,
            files_scanned: 1,
            fixes_applied: 1,
            remaining: 1,
            root: dir.path().to_path_buf(),
        };
        let text = render_console(&result, true);
        assert!(text.contains("./old.md  -> ./n/old.md  (fixed)"), "{text}");
        assert!(text.contains("./other.md  -> ./n/other.md\n"), "{text}");
    }
}
