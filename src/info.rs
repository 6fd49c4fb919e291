use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::commands::{EXIT_ERROR, EXIT_ISSUES, scan_root};
use crate::config::{CONFIG_FILE, Config};
use crate::discover::discover;

/// Output the comprehensive doclinks reference document.
pub fn run(root_override: Option<&Path>, json: bool) {
    let state = gather_state(Path::new("."), root_override);

    if json {
        print_json(&state);
    } else {
        print_markdown(&state);
    }
}

// ── State gathering ───────────────────────────────────────────────────

/// Snapshot of the working directory as doclinks would see it.
struct CurrentState {
    /// Whether `.doclinks.toml` exists.
    config_found: bool,
    /// Whether the config parsed; `false` means `check` would fail.
    config_valid: bool,
    /// Documents discovered under the scan root, if it exists.
    documents: Option<usize>,
    /// Effective scan root.
    root: PathBuf,
}

fn gather_state(dir: &Path, root_override: Option<&Path>) -> CurrentState {
    let config_found = dir.join(CONFIG_FILE).exists();
    let loaded = Config::load(dir);
    let config_valid = loaded.is_ok();
    let config = loaded.unwrap_or_default();

    let root = scan_root(&config, root_override, None);
    let documents = root.is_dir().then(|| discover(&root, &config).len());

    CurrentState { config_found, config_valid, documents, root }
}

// ── Markdown output ───────────────────────────────────────────────────

fn print_markdown(state: &CurrentState) {
    let version = env!("CARGO_PKG_VERSION");
    print_markdown_header(version);
    print_markdown_state(state);
    println!();
    print_markdown_exit_codes();
}

fn print_markdown_header(version: &str) {
    print!(
        "\
# doclinks {version}

Validate relative links between markdown documents, check their anchors
against target headings, and repair links to documents that moved.

## Link Syntax

    [text](./sibling.md)                 relative document
    [text](../other/page)                `.md` appended when missing
    [text](./folder/)                    folder index document
    [text](./page.md#some-heading)       anchor checked against headings

Links starting with `/` or a scheme, links inside fenced code blocks, and
links to assets (images, archives, PDFs, text files) are not checked.

## Workflow

    doclinks check [PATH]             Validate links (exit 0/1/2)
    doclinks check --write            Rewrite links with a single unambiguous fix
    doclinks check --json             Emit the full report as JSON
    doclinks watch [PATH]             Re-check on every markdown change
    doclinks info                     Show this reference

## Configuration (.doclinks.toml)

    root = \"docs\"                       # default scan root
    include = [\"guide/\"]                # only scan these paths
    exclude = [\"guide/archive/\"]        # skip these paths
    index_file = \"index.md\"             # document served for a folder link
    skip_extensions = [\".csv\"]          # extra asset extensions to ignore

## Current State

"
    );
}

fn print_markdown_state(state: &CurrentState) {
    match (state.config_found, state.config_valid) {
        (false, _) => println!("Config:     {CONFIG_FILE} (not found, using defaults)"),
        (true, true) => println!("Config:     {CONFIG_FILE} (found)"),
        (true, false) => println!("Config:     {CONFIG_FILE} (found, invalid)"),
    }

    let root = state.root.display();
    match state.documents {
        Some(n) => println!("Scan root:  {root} ({n} documents)"),
        None => println!("Scan root:  {root} (not found)"),
    }
}

fn print_markdown_exit_codes() {
    print!(
        "\
## Exit Codes

| Code | Meaning |
|------|---------|
| 0    | All links valid (or all issues fixed with --write) |
| {EXIT_ISSUES}    | Broken links or anchors remain |
| {EXIT_ERROR}    | Fatal error: missing scan root, invalid config |
"
    );
}

// ── JSON output ───────────────────────────────────────────────────────

#[derive(Serialize)]
struct InfoJson {
    version: String,
    exit_codes: Vec<ExitCodeInfo>,
    current_state: StateJson,
}

#[derive(Serialize)]
struct ExitCodeInfo {
    code: u8,
    meaning: String,
}

#[derive(Serialize)]
struct StateJson {
    config_found: bool,
    config_valid: bool,
    documents: Option<usize>,
    root: PathBuf,
}

fn print_json(state: &CurrentState) {
    let info = InfoJson {
        version: env!("CARGO_PKG_VERSION").to_string(),
        exit_codes: vec![
            ExitCodeInfo { code: 0, meaning: "All links valid".to_string() },
            ExitCodeInfo { code: EXIT_ISSUES, meaning: "Broken links or anchors remain".to_string() },
            ExitCodeInfo { code: EXIT_ERROR, meaning: "Fatal error".to_string() },
        ],
        current_state: StateJson {
            config_found: state.config_found,
            config_valid: state.config_valid,
            documents: state.documents,
            root: state.root.clone(),
        },
    };

    // serde_json::to_string_pretty won't fail on this structure.
    let json = serde_json::to_string_pretty(&info).unwrap_or_default();
    println!("{json}");
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used, reason = "test code")]
mod tests {
    use super::*;

    #[test]
    fn state_reports_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let state = gather_state(dir.path(), Some(&dir.path().join("absent")));
        assert!(!state.config_found);
        assert!(state.config_valid);
        assert_eq!(state.documents, None);
    }

    #[test]
    fn state_counts_documents_and_flags_bad_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "root = 3").unwrap();
        let root = dir.path().join("docs");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("a.md"), "").unwrap();

        let state = gather_state(dir.path(), Some(&root));
        assert!(state.config_found);
        assert!(!state.config_valid);
        assert_eq!(state.documents, Some(1));
    }
}
