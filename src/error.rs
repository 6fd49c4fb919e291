/// Crate-level error types for doclinks diagnostics.
use std::path::PathBuf;

/// Fatal and per-file failures. Broken links are not errors; they are
/// reported as issues. Each variant names the path or reason for failure.
#[allow(clippy::error_impl_error, reason = "crate-internal error type in binary")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// JSON serialization of the run result failed.
    #[error("json: {0}")]
    Json(
        /// The wrapped serde_json error.
        #[from]
        serde_json::Error,
    ),

    /// The requested scan root does not exist or is not a directory.
    #[error("scan root not found: {}", path.display())]
    RootNotFound {
        /// Path that was requested as the scan root.
        path: PathBuf,
    },

    /// TOML deserialization of `.doclinks.toml` failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// The filesystem watcher could not be created or attached.
    #[error("watch: {reason}")]
    Watch {
        /// Description of the watcher failure.
        reason: String,
    },

    /// Rewriting a document in place failed. Never fatal for the batch.
    #[error("write failed: {}: {source}", path.display())]
    WriteFailed {
        /// Document that could not be rewritten.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
