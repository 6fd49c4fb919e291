//! Fix suggestions for unresolved links, by basename lookup.
//!
//! Assumes a moved document kept its filename. Only a single same-named
//! candidate is ever proposed as an automatic fix; two or more are reported as
//! ambiguous and left alone.

use std::path::{Component, Path};

use crate::discover::{DOCUMENT_EXTENSION, is_document, relative_to_root};
use crate::index::FilenameIndex;
use crate::scanner::split_href;
use crate::types::FixSuggestion;

/// Compute a forward-slash href from `from_dir` to `to`, starting with `./`
/// or `../`. Both paths must be absolute and normalized.
pub fn relative_href(from_dir: &Path, to: &Path) -> String {
    let from: Vec<Component<'_>> = from_dir.components().collect();
    let target: Vec<Component<'_>> = to.components().collect();
    let common = from
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| return a == b)
        .count();

    let ups = from.iter().skip(common).map(|_| return "..".to_string());
    let downs = target
        .iter()
        .skip(common)
        .map(|c| return c.as_os_str().to_string_lossy().into_owned());
    let joined = ups.chain(downs).collect::<Vec<_>>().join("/");

    if joined.starts_with('.') {
        return joined;
    }
    return format!("./{joined}");
}

/// Propose a replacement for an href that resolved to nothing.
///
/// The basename of the intended target (with `.md` appended if missing) is
/// looked up in the index. The anchor is carried over to the suggestion; any
/// query string is dropped.
pub fn suggest(source: &Path, href: &str, index: &FilenameIndex, root: &Path) -> FixSuggestion {
    let parts = split_href(href);
    let Some(basename) = target_basename(parts.path) else {
        return FixSuggestion::NotFound {
            reason: format!("`{href}` does not name a file"),
        };
    };

    return match index.candidates(&basename) {
        [] => FixSuggestion::NotFound {
            reason: format!("no document named `{basename}` exists under the scan root"),
        },
        [only] => {
            let source_dir = source.parent().unwrap_or(root);
            let mut suggested_href = relative_href(source_dir, only);
            if let Some(anchor) = parts.anchor {
                suggested_href.push('#');
                suggested_href.push_str(anchor);
            }
            FixSuggestion::AutoFixable {
                location: relative_to_root(root, only),
                suggested_href,
            }
        },
        many => FixSuggestion::Ambiguous {
            candidates: many.iter().map(|p| return relative_to_root(root, p)).collect(),
        },
    };
}

/// Basename a link was aiming at, as it would appear in the index.
fn target_basename(path: &str) -> Option<String> {
    let name = Path::new(path).file_name()?.to_string_lossy().into_owned();
    if is_document(Path::new(&name)) {
        return Some(name);
    }
    return Some(format!("{name}.{DOCUMENT_EXTENSION}"));
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "test code")]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn index(paths: &[&str]) -> FilenameIndex {
        let docs: Vec<PathBuf> = paths.iter().map(PathBuf::from).collect();
        return FilenameIndex::build(&docs);
    }

    #[test]
    fn relative_href_siblings_and_cousins() {
        let root = Path::new("/r");
        assert_eq!(relative_href(root, Path::new("/r/a.md")), "./a.md");
        assert_eq!(relative_href(Path::new("/r/x"), Path::new("/r/y/a.md")), "../y/a.md");
        assert_eq!(relative_href(Path::new("/r/x/y"), Path::new("/r/a.md")), "../../a.md");
        assert_eq!(relative_href(root, Path::new("/r/deep/er/a.md")), "./deep/er/a.md");
    }

    #[test]
    fn no_candidates_is_not_found() {
        let idx = index(&["/r/a.md"]);
        let got = suggest(Path::new("/r/a.md"), "./missing.md", &idx, Path::new("/r"));
        let FixSuggestion::NotFound { reason } = got else {
            panic!("expected not-found, got {got:?}");
        };
        assert!(reason.contains("missing.md"));
    }

    #[test]
    fn single_candidate_is_auto_fixable() {
        let idx = index(&["/r/guide/a.md", "/r/ref/old-name.md"]);
        let got = suggest(Path::new("/r/guide/a.md"), "./old-name.md", &idx, Path::new("/r"));
        assert_eq!(
            got,
            FixSuggestion::AutoFixable {
                location: "ref/old-name.md".to_string(),
                suggested_href: "../ref/old-name.md".to_string(),
            }
        );
    }

    #[test]
    fn extensionless_href_gets_document_extension() {
        let idx = index(&["/r/ref/setup.md"]);
        let got = suggest(Path::new("/r/a.md"), "./setup", &idx, Path::new("/r"));
        assert!(matches!(
            got,
            FixSuggestion::AutoFixable { suggested_href, .. } if suggested_href == "./ref/setup.md"
        ));
    }

    #[test]
    fn anchor_is_kept_and_query_dropped() {
        let idx = index(&["/r/ref/api.md"]);
        let got = suggest(Path::new("/r/a.md"), "./api.md?v=2#auth", &idx, Path::new("/r"));
        assert!(matches!(
            got,
            FixSuggestion::AutoFixable { suggested_href, .. } if suggested_href == "./ref/api.md#auth"
        ));
    }

    #[test]
    fn several_candidates_are_ambiguous() {
        let idx = index(&["/r/one/dup.md", "/r/two/dup.md", "/r/a.md"]);
        let got = suggest(Path::new("/r/a.md"), "./dup.md", &idx, Path::new("/r"));
        assert_eq!(
            got,
            FixSuggestion::Ambiguous {
                candidates: vec!["one/dup.md".to_string(), "two/dup.md".to_string()],
            }
        );
    }

    #[test]
    fn href_without_file_name_is_not_found() {
        let idx = index(&["/r/a.md"]);
        let got = suggest(Path::new("/r/x/a.md"), "../", &idx, Path::new("/r"));
        assert!(matches!(got, FixSuggestion::NotFound { .. }));
    }
}
