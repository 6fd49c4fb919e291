//! Document discovery: recursive walk of the scan root.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::config::Config;

/// Extension of files treated as documents.
pub const DOCUMENT_EXTENSION: &str = "md";

/// Collect every document under `root`, in a stable order.
///
/// Any file or directory whose name starts with `_` or `.` is skipped along
/// with everything beneath it. Unreadable directories are dropped silently so
/// a partially inaccessible tree still yields the documents that can be read.
pub fn discover(root: &Path, config: &Config) -> Vec<PathBuf> {
    return WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| return e.depth() == 0 || !is_hidden_or_private(e.file_name()))
        .filter_map(Result::ok)
        .filter(|e| return e.file_type().is_file() && is_document(e.path()))
        .filter(|e| return config.should_scan(&relative_display(root, e)))
        .map(DirEntry::into_path)
        .collect();
}

/// Whether a path names a document by extension.
pub fn is_document(path: &Path) -> bool {
    return path.extension().is_some_and(|ext| return ext == DOCUMENT_EXTENSION);
}

/// Names starting with `_` or `.` are private or hidden.
fn is_hidden_or_private(name: &OsStr) -> bool {
    let name = name.to_string_lossy();
    return name.starts_with('_') || name.starts_with('.');
}

/// Relative display form of a walk entry.
fn relative_display(root: &Path, entry: &DirEntry) -> String {
    return relative_to_root(root, entry.path());
}

/// Render a path relative to `root` with forward slashes, for display and filtering.
pub fn relative_to_root(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    return relative
        .components()
        .map(|c| return c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/");
}
