//! Core CLI commands for doclinks: check, info.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::Config;
use crate::error;
use crate::report;

/// Exit code when issues remain after the run.
pub const EXIT_ISSUES: u8 = 1;

/// Exit code for fatal errors: missing root, bad config, watcher failure.
pub const EXIT_ERROR: u8 = 2;

/// Validate links under the scan root, optionally rewriting auto-fixable ones.
///
/// # Errors
///
/// Returns errors from config loading, a missing scan root, or JSON output.
pub fn check(
    root_override: Option<&Path>,
    scope: Option<&Path>,
    write: bool,
    json: bool,
) -> Result<ExitCode, error::Error> {
    let config = Config::load(Path::new("."))?;
    let root = scan_root(&config, root_override, scope);
    return run_and_print(&root, &config, write, json);
}

/// Output a comprehensive reference document for doclinks.
pub fn info(root_override: Option<&Path>, json: bool) {
    return crate::info::run(root_override, json);
}

/// Run one pass over `root` and print the report in the requested format.
///
/// # Errors
///
/// Returns `Error::RootNotFound` for a missing root or `Error::Json` if
/// serialization fails.
pub fn run_and_print(
    root: &Path,
    config: &Config,
    write: bool,
    json: bool,
) -> Result<ExitCode, error::Error> {
    let result = report::run(root, config, write)?;
    if json {
        report::print_json(&result)?;
    } else {
        report::print_console(&result, write);
    }

    if result.is_clean() {
        return Ok(ExitCode::SUCCESS);
    }
    return Ok(ExitCode::from(EXIT_ISSUES));
}

/// Effective scan root: `--root` or the configured root, narrowed by an
/// optional subtree.
pub fn scan_root(config: &Config, root_override: Option<&Path>, scope: Option<&Path>) -> PathBuf {
    let base = root_override.map_or_else(|| return config.root.clone(), Path::to_path_buf);
    return match scope {
        None => base,
        Some(sub) => base.join(sub),
    };
}
