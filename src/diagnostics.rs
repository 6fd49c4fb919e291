use crate::config::CONFIG_FILE;
use crate::error::Error;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened and, where there is one,
/// how to fix it.
pub fn render_error(e: &Error) -> String {
    match e {
        Error::RootNotFound { path } => render_root_not_found(&path.display().to_string()),
        Error::TomlDe(err) => render_invalid_config(&err.to_string()),
        Error::Watch { reason } => render_watch_failed(reason),
        _ => render_generic(e),
    }
}

fn render_generic(e: &Error) -> String {
    match e {
        Error::Io(err) => format!("\
# Error: I/O

{err}
"),
        Error::Json(err) => format!("\
# Error: JSON Output

{err}
"),
        Error::WriteFailed { path, source } => format!("\
# Error: Write Failed

Could not rewrite `{}`: {source}
", path.display()),
        // Already handled in render_error, but need exhaustive match.
        _ => format!("\
# Error

{e}
"),
    }
}

fn render_invalid_config(reason: &str) -> String {
    format!(
        "\
# Error: Invalid Config

`{CONFIG_FILE}` could not be parsed:

{reason}

## Fix

Allowed keys are `root`, `include`, `exclude`, `index_file`, and
`skip_extensions`. Delete the file to fall back to defaults.
"
    )
}

fn render_root_not_found(path: &str) -> String {
    format!(
        "\
# Error: Scan Root Not Found

`{path}` does not exist or is not a directory.

## Fix

Point doclinks at your documentation:

    doclinks --root path/to/docs check

Or set it once in `{CONFIG_FILE}`:

    root = \"path/to/docs\"
"
    )
}

fn render_watch_failed(reason: &str) -> String {
    format!(
        "\
# Error: Watch Failed

{reason}

## Fix

Run a one-off check instead:

    doclinks check
"
    )
}
