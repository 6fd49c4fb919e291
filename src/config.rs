use std::path::{Path, PathBuf};

use crate::error::Error;

/// Name of the project config file, looked up in the working directory.
pub const CONFIG_FILE: &str = ".doclinks.toml";

/// Scan root used when neither the config nor `--root` names one.
const DEFAULT_ROOT: &str = "docs";

/// Index document looked up when a link points at a directory.
const DEFAULT_INDEX_FILE: &str = "index.md";

/// Non-document asset extensions whose links are never validated.
const BUILTIN_SKIP_EXTENSIONS: &[&str] = &[
    "bmp", "gif", "gz", "ico", "jpeg", "jpg", "pdf", "png", "svg", "tar", "tgz", "txt", "webp",
    "zip",
];

/// Project configuration loaded from `.doclinks.toml`.
/// Include/exclude patterns are path prefixes relative to the scan root.
#[derive(Debug, Clone)]
pub struct Config {
    /// Prefixes of documents to leave out.
    exclude: Vec<String>,
    /// Prefixes of documents to scan; empty means everything.
    include: Vec<String>,
    /// File name of the index document inside a linked directory.
    pub index_file: String,
    /// Default scan root.
    pub root: PathBuf,
    /// Lower-cased asset extensions without the leading dot.
    skip_extensions: Vec<String>,
}

/// Raw TOML structure for `.doclinks.toml`.
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct DoclinksTomlConfig {
    #[serde(default)]
    exclude: Vec<String>,
    #[serde(default)]
    include: Vec<String>,
    index_file: Option<String>,
    root: Option<PathBuf>,
    #[serde(default)]
    skip_extensions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        return Self {
            exclude: Vec::new(),
            include: Vec::new(),
            index_file: DEFAULT_INDEX_FILE.to_string(),
            root: PathBuf::from(DEFAULT_ROOT),
            skip_extensions: builtin_skip_extensions(),
        };
    }
}

impl Config {
    /// Whether a link target with this path should be skipped as an asset.
    /// Comparison is case-insensitive on the final extension.
    pub fn is_skipped_asset(&self, path: &str) -> bool {
        let Some(ext) = Path::new(path).extension() else {
            return false;
        };
        let ext = ext.to_string_lossy().to_lowercase();
        return self.skip_extensions.iter().any(|s| return *s == ext);
    }

    /// Load config from `.doclinks.toml` in the given directory.
    /// Returns defaults if the file doesn't exist.
    /// Returns an error if the file exists but is malformed; never silently
    /// falls back to defaults when the user wrote a config file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(dir: &Path) -> Result<Self, Error> {
        let path = dir.join(CONFIG_FILE);
        let content = match std::fs::read_to_string(&path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(Error::Io(e)),
            Ok(c) => c,
        };
        return Self::parse(&content);
    }

    /// Parse config from TOML content, layering it over the defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::TomlDe` if the TOML is malformed or has unknown keys.
    pub fn parse(content: &str) -> Result<Self, Error> {
        let raw: DoclinksTomlConfig = toml::from_str(content)?;
        let mut skip_extensions = builtin_skip_extensions();
        for ext in raw.skip_extensions {
            let normalized = ext.trim_start_matches('.').to_lowercase();
            if !normalized.is_empty() && !skip_extensions.contains(&normalized) {
                skip_extensions.push(normalized);
            }
        }

        return Ok(Self {
            exclude: raw.exclude,
            include: raw.include,
            index_file: raw.index_file.unwrap_or_else(|| return DEFAULT_INDEX_FILE.to_string()),
            root: raw.root.unwrap_or_else(|| return PathBuf::from(DEFAULT_ROOT)),
            skip_extensions,
        });
    }

    /// Check whether a document path (relative to the scan root) should be scanned.
    ///
    /// A path is included if no include patterns are set (scan everything),
    /// or if the path starts with at least one include pattern.
    /// An included path is then excluded if it starts with any exclude pattern.
    pub fn should_scan(&self, relative_path: &str) -> bool {
        let included = self.include.is_empty()
            || self.include.iter().any(|p| return relative_path.starts_with(p.as_str()));

        if !included {
            return false;
        }

        return !self.exclude.iter().any(|p| return relative_path.starts_with(p.as_str()));
    }
}

/// The built-in skip-list as owned strings.
fn builtin_skip_extensions() -> Vec<String> {
    return BUILTIN_SKIP_EXTENSIONS.iter().map(|s| return (*s).to_string()).collect();
}
