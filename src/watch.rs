//! File watcher: runs `check` on startup, then re-runs on markdown changes.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use notify::{RecursiveMode, Watcher as _};

use crate::commands::{self, EXIT_ERROR};
use crate::config::Config;
use crate::discover::is_document;
use crate::error;

/// Debounce delay between filesystem events and re-check.
const DEBOUNCE_MS: u64 = 100;

/// Create a filesystem watcher that signals on markdown creates, edits, and removals.
///
/// # Errors
///
/// Returns `Error::Watch` if the watcher cannot be created.
fn create_watcher(
    tx: crossbeam_channel::Sender<()>,
) -> Result<notify::RecommendedWatcher, error::Error> {
    return notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
        if let Ok(event) = res
            && is_relevant_event(&event)
        {
            let _ = tx.send(());
        }
    })
    .map_err(|e| {
        return error::Error::Watch {
            reason: format!("watcher setup failed: {e}"),
        };
    });
}

/// Markdown files being created, modified, or removed.
fn is_relevant_event(event: &notify::Event) -> bool {
    let kind_matches = matches!(
        event.kind,
        notify::EventKind::Create(_) | notify::EventKind::Modify(_) | notify::EventKind::Remove(_)
    );
    return kind_matches && event.paths.iter().any(|p| return is_document(p));
}

/// Entry point for the watch command.
///
/// Runs an initial check, then watches the scan root recursively and
/// re-checks on changes. Never rewrites documents.
///
/// # Errors
///
/// Returns errors from config loading, a missing scan root, or watcher setup.
pub fn run(
    root_override: Option<&Path>,
    scope: Option<&Path>,
    json: bool,
) -> Result<ExitCode, error::Error> {
    let config = Config::load(Path::new("."))?;
    let root: PathBuf = commands::scan_root(&config, root_override, scope);
    if !root.is_dir() {
        return Err(error::Error::RootNotFound { path: root });
    }

    eprintln!("watch: initial check");
    let mut last_code = run_check(&root, &config, json);

    let (tx, rx) = crossbeam_channel::unbounded();
    let mut watcher = create_watcher(tx)?;
    watcher
        .watch(&root, RecursiveMode::Recursive)
        .map_err(|e| {
            return error::Error::Watch {
                reason: format!("cannot watch {}: {e}", root.display()),
            };
        })?;

    eprintln!("watch: monitoring {}, press Ctrl+C to stop", root.display());

    while rx.recv().is_ok() {
        let debounce = Duration::from_millis(DEBOUNCE_MS);
        while rx.recv_timeout(debounce).is_ok() {}
        eprintln!("watch: change detected, re-checking...");
        last_code = run_check(&root, &config, json);
    }

    return Ok(last_code);
}

/// Run check once and print result. Returns the exit code from check.
fn run_check(root: &Path, config: &Config, json: bool) -> ExitCode {
    return match commands::run_and_print(root, config, false, json) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(EXIT_ERROR)
        },
    };
}
