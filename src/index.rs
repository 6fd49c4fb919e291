//! Filename index: base filename to every document sharing it.

use std::collections::HashMap;
use std::path::PathBuf;

/// Immutable lookup from base filename to all documents with that name,
/// in discovery order. Built once per run and only consulted by the fixer.
#[derive(Debug, Default)]
pub struct FilenameIndex {
    /// Base filename to full paths.
    by_name: HashMap<String, Vec<PathBuf>>,
}

impl FilenameIndex {
    /// Build the index from discovered documents.
    /// Every document lands in exactly one entry, keyed by its own basename.
    pub fn build(documents: &[PathBuf]) -> Self {
        let mut by_name: HashMap<String, Vec<PathBuf>> = HashMap::new();
        for doc in documents {
            let Some(name) = doc.file_name() else { continue };
            by_name
                .entry(name.to_string_lossy().into_owned())
                .or_default()
                .push(doc.clone());
        }
        return Self { by_name };
    }

    /// All documents named `basename`, or an empty slice.
    pub fn candidates(&self, basename: &str) -> &[PathBuf] {
        return self.by_name.get(basename).map(Vec::as_slice).unwrap_or_default();
    }
}
