//! Shell-style wildcard expansion of path specifications

use globset::{GlobBuilder, GlobMatcher};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const WILDCARDS: &[char] = &['*', '?', '['];

/// One wildcard component of a specification
struct ComponentPattern {
    text: String,
    matcher: GlobMatcher,
}

impl ComponentPattern {
    fn new(text: String) -> Result<Self, globset::Error> {
        let matcher = GlobBuilder::new(&text)
            .literal_separator(true)
            .build()?
            .compile_matcher();
        Ok(Self { text, matcher })
    }

    /// Wildcards never match a leading dot unless the pattern spells it out
    fn matches(&self, name: &OsStr) -> bool {
        let hidden = name.to_string_lossy().starts_with('.');
        if hidden && !self.text.starts_with('.') {
            return false;
        }
        self.matcher.is_match(Path::new(name))
    }
}

/// Whether a specification contains any wildcard characters
pub fn has_wildcard(spec: &str) -> bool {
    spec.contains(WILDCARDS)
}

/// Expand a path specification against the filesystem
///
/// # Arguments
/// * `spec` - Path, optionally containing `*`, `?` or `[...]` in any component
///
/// # Returns
/// Matching paths, sorted by name within each directory. A specification
/// without wildcards yields itself when the path exists, including dangling
/// symlinks. Unreadable directories along the way are skipped.
pub fn expand_pattern(spec: &str) -> Vec<PathBuf> {
    if !has_wildcard(spec) {
        return literal_match(Path::new(spec));
    }

    let mut base = PathBuf::new();
    let mut components: Vec<String> = Vec::new();
    for component in Path::new(spec).components() {
        let text = component.as_os_str().to_string_lossy();
        if components.is_empty() && !has_wildcard(&text) {
            base.push(component);
        } else {
            components.push(text.into_owned());
        }
    }

    let patterns = match components
        .into_iter()
        .map(ComponentPattern::new)
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(patterns) => patterns,
        Err(e) => {
            log::debug!("treating `{}` as a literal path: {}", spec, e);
            return literal_match(Path::new(spec));
        }
    };

    let implicit_base = base.as_os_str().is_empty();
    let root = if implicit_base { PathBuf::from(".") } else { base };
    let depth = patterns.len();

    let mut matches = Vec::new();
    // No min_depth: entries above it would bypass the predicate
    let walker = WalkDir::new(&root)
        .max_depth(depth)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0 || patterns[entry.depth() - 1].matches(entry.file_name())
        });

    for entry in walker {
        let path = match entry {
            Ok(entry) if entry.depth() == depth => entry.into_path(),
            Ok(_) => continue,
            Err(err) => match dangling_match(&err, depth, &patterns) {
                Some(path) => path,
                None => {
                    log::debug!("skipping while expanding `{}`: {}", spec, err);
                    continue;
                }
            },
        };
        let path = if implicit_base {
            path.strip_prefix(".").map(Path::to_path_buf).unwrap_or(path)
        } else {
            path
        };
        matches.push(path);
    }

    log::debug!("`{}` expanded to {} path(s)", spec, matches.len());
    matches
}

fn literal_match(path: &Path) -> Vec<PathBuf> {
    if fs::symlink_metadata(path).is_ok() {
        vec![path.to_path_buf()]
    } else {
        log::debug!("no such path `{}`", path.display());
        Vec::new()
    }
}

/// A dangling symlink surfaces as a walk error when links are followed;
/// it still counts as a match if its name fits the final component
fn dangling_match(
    err: &walkdir::Error,
    depth: usize,
    patterns: &[ComponentPattern],
) -> Option<PathBuf> {
    if err.depth() != depth {
        return None;
    }
    let path = err.path()?;
    let name = path.file_name()?;
    let is_symlink = fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false);
    (is_symlink && patterns.last()?.matches(name)).then(|| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_has_wildcard() {
        assert!(has_wildcard("*.txt"));
        assert!(has_wildcard("file?.log"));
        assert!(has_wildcard("[ab].rs"));
        assert!(!has_wildcard("plain/path.txt"));
    }

    #[test]
    fn test_literal_spec_requires_existence() {
        let temp_dir = TempDir::new().unwrap();
        let present = temp_dir.path().join("present.txt");
        File::create(&present).unwrap();

        assert_eq!(expand_pattern(present.to_str().unwrap()), vec![present]);
        let missing = temp_dir.path().join("missing.txt");
        assert!(expand_pattern(missing.to_str().unwrap()).is_empty());
    }

    #[test]
    fn test_star_matches_sorted_and_skips_hidden() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["b.txt", "a.txt", ".hidden.txt", "c.log"] {
            File::create(temp_dir.path().join(name)).unwrap();
        }

        let spec = format!("{}/*.txt", temp_dir.path().display());
        assert_eq!(names(&expand_pattern(&spec)), vec!["a.txt", "b.txt"]);

        let spec = format!("{}/.*.txt", temp_dir.path().display());
        assert_eq!(names(&expand_pattern(&spec)), vec![".hidden.txt"]);
    }

    #[test]
    fn test_wildcard_in_directory_component() {
        let temp_dir = TempDir::new().unwrap();
        for dir in ["one", "two", "skip"] {
            fs::create_dir(temp_dir.path().join(dir)).unwrap();
        }
        File::create(temp_dir.path().join("one/x.dat")).unwrap();
        File::create(temp_dir.path().join("two/y.dat")).unwrap();
        File::create(temp_dir.path().join("skip/z.dat")).unwrap();
        File::create(temp_dir.path().join("top.dat")).unwrap();

        let spec = format!("{}/t*/*.dat", temp_dir.path().display());
        assert_eq!(names(&expand_pattern(&spec)), vec!["y.dat"]);

        let spec = format!("{}/???/*.dat", temp_dir.path().display());
        assert_eq!(names(&expand_pattern(&spec)), vec!["x.dat", "y.dat"]);
    }

    #[test]
    fn test_star_does_not_cross_separator() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("sub")).unwrap();
        File::create(temp_dir.path().join("sub/deep.txt")).unwrap();

        let spec = format!("{}/*.txt", temp_dir.path().display());
        assert!(expand_pattern(&spec).is_empty());
    }

    #[test]
    fn test_directories_match_too() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("data")).unwrap();

        let spec = format!("{}/d*", temp_dir.path().display());
        assert_eq!(expand_pattern(&spec), vec![temp_dir.path().join("data")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_matched() {
        let temp_dir = TempDir::new().unwrap();
        std::os::unix::fs::symlink(
            temp_dir.path().join("nowhere"),
            temp_dir.path().join("link.txt"),
        )
        .unwrap();

        let spec = format!("{}/*.txt", temp_dir.path().display());
        assert_eq!(expand_pattern(&spec), vec![temp_dir.path().join("link.txt")]);
    }
}
