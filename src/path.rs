//! Path ordering and lexical normalization utilities shared by the entry store, patch engine, and
//! virtual filesystem facade.
use std::path::{Component, Path, PathBuf};

use crate::error::*;

/// Byte-wise comparison of two normalized relative paths. Directories never carry a trailing `/`
/// for comparison purposes, so `"b"` and `"b/"` compare equal.
///
/// ### Examples
/// ```
/// use patchfs::prelude::*;
/// use std::cmp::Ordering;
///
/// assert_eq!(compare_by_relative_path("a.js", "b.js"), Ordering::Less);
/// assert_eq!(compare_by_relative_path("b/", "b"), Ordering::Equal);
/// ```
pub fn compare_by_relative_path<T: AsRef<Path>, U: AsRef<Path>>(a: T, b: U) -> std::cmp::Ordering
{
    trim_trailing_sep(a.as_ref()).cmp(&trim_trailing_sep(b.as_ref()))
}

/// Strip a single trailing separator used to mark directories, for comparison purposes only.
fn trim_trailing_sep(path: &Path) -> PathBuf
{
    let s = path.to_string_lossy();
    match s.strip_suffix('/') {
        Some(stripped) => PathBuf::from(stripped),
        None => path.to_path_buf(),
    }
}

/// Validate that `paths` are strictly sorted and free of duplicates under
/// [`compare_by_relative_path`]. Returns the offending neighbor pair as an [`EntryError::InvalidOrder`]
/// otherwise.
///
/// ### Examples
/// ```
/// use patchfs::prelude::*;
///
/// assert!(validate_sorted_unique(&[PathBuf::from("a"), PathBuf::from("b")]).is_ok());
/// assert!(validate_sorted_unique(&[PathBuf::from("b"), PathBuf::from("a")]).is_err());
/// ```
pub fn validate_sorted_unique(paths: &[PathBuf]) -> Result<()>
{
    for (i, pair) in paths.windows(2).enumerate() {
        let (prev, next) = (&pair[0], &pair[1]);
        if compare_by_relative_path(prev, next) != std::cmp::Ordering::Less {
            return Err(EntryError::InvalidOrder { index: i + 1, prev: prev.clone(), next: next.clone() }.into());
        }
    }
    Ok(())
}

/// Longest common prefix of `a` and `b`, truncated after the last occurrence of `terminator`.
///
/// Used by `sort_and_expand` to track which ancestor directories have already been emitted
/// without re-deriving them from scratch for every entry.
///
/// ### Examples
/// ```
/// use patchfs::prelude::*;
///
/// assert_eq!(common_prefix("foo/bar/baz", "foo/bar/qux", '/'), "foo/bar/");
/// assert_eq!(common_prefix("foo/bar", "baz/qux", '/'), "");
/// ```
pub fn common_prefix(a: &str, b: &str, terminator: char) -> String
{
    let max = a.len().min(b.len());
    let mut end = 0;
    for (x, y) in a.bytes().zip(b.bytes()).take(max) {
        if x != y {
            break;
        }
        end += 1;
    }
    match a[..end].rfind(terminator) {
        Some(idx) => a[..=idx].to_string(),
        None => String::new(),
    }
}

/// The parent directory path of `path`, including a trailing separator, or the empty string for a
/// top-level path.
///
/// ### Examples
/// ```
/// use patchfs::prelude::*;
///
/// assert_eq!(basename("foo/bar/baz.js"), "foo/bar/");
/// assert_eq!(basename("baz.js"), "");
/// ```
pub fn basename<T: AsRef<str>>(path: T) -> String
{
    match path.as_ref().rfind('/') {
        Some(idx) => path.as_ref()[..=idx].to_string(),
        None => String::new(),
    }
}

/// Returns the shortest equivalent of `path` by purely lexical processing: collapse repeated
/// separators, drop `.` components, resolve inner `..` components, and drop a trailing separator.
///
/// ### Examples
/// ```
/// use patchfs::prelude::*;
///
/// assert_eq!(clean("./foo/./bar"), PathBuf::from("foo/bar"));
/// assert_eq!(clean("foo/../bar"), PathBuf::from("bar"));
/// ```
pub fn clean<T: AsRef<Path>>(path: T) -> PathBuf
{
    let mut out = PathBuf::new();
    let mut depth = 0usize;
    for component in path.as_ref().components() {
        match component {
            Component::CurDir => continue,
            Component::ParentDir if depth > 0 => {
                out.pop();
                depth -= 1;
            },
            Component::Normal(_) => {
                out.push(component);
                depth += 1;
            },
            other => out.push(other),
        }
    }
    if out.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        out
    }
}

/// Join `base` and `path`, then lexically clean the result.
///
/// ### Examples
/// ```
/// use patchfs::prelude::*;
///
/// assert_eq!(mash("/root", "a/../b"), PathBuf::from("/root/b"));
/// ```
pub fn mash<T: AsRef<Path>, U: AsRef<Path>>(base: T, path: U) -> PathBuf
{
    clean(base.as_ref().join(path.as_ref()))
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_compare_by_relative_path()
    {
        assert_eq!(compare_by_relative_path("a.js", "b.js"), std::cmp::Ordering::Less);
        assert_eq!(compare_by_relative_path("b/", "b"), std::cmp::Ordering::Equal);
        assert_eq!(compare_by_relative_path("b/f.js", "b.js"), std::cmp::Ordering::Greater);
    }

    #[test]
    fn test_validate_sorted_unique_duplicate()
    {
        let err = validate_sorted_unique(&[PathBuf::from("a"), PathBuf::from("a")]).unwrap_err();
        assert!(err.is::<EntryError>());
    }

    #[test]
    fn test_common_prefix()
    {
        assert_eq!(common_prefix("foo/bar/baz", "foo/bar/qux", '/'), "foo/bar/");
        assert_eq!(common_prefix("foo", "foo", '/'), "");
        assert_eq!(common_prefix("a/b", "a/c", '/'), "a/");
    }

    #[test]
    fn test_basename()
    {
        assert_eq!(basename("foo/bar/baz.js"), "foo/bar/");
        assert_eq!(basename("baz.js"), "");
        assert_eq!(basename("b/"), "b/");
    }

    #[test]
    fn test_clean()
    {
        assert_eq!(clean("./foo/./bar"), PathBuf::from("foo/bar"));
        assert_eq!(clean("foo/../bar"), PathBuf::from("bar"));
        assert_eq!(clean("foo//bar/"), PathBuf::from("foo/bar"));
        assert_eq!(clean(""), PathBuf::from("."));
    }

    #[test]
    fn test_mash()
    {
        assert_eq!(mash("/root", "a/../b"), PathBuf::from("/root/b"));
        assert_eq!(mash("/root", "/abs"), PathBuf::from("/abs"));
    }
}
