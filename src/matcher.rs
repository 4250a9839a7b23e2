//! Path matching: a small sum type over the ways a caller may want to select paths, plus the
//! [`Filters`] overlay a [`crate::VirtualFs`] consults on every read-side operation.
//!
//! Generalizes the source system's string-or-regex-or-function matcher argument into a typed
//! [`Matcher`] enum, per REDESIGN FLAGS in `SPEC_FULL.md` section 9.
use std::{
    collections::HashSet,
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use globset::{Glob, GlobSet, GlobSetBuilder};

/// A single path-selection rule.
#[derive(Clone)]
pub enum Matcher
{
    /// Match against a set of glob patterns (`*`, `**`, `?`, character classes)
    Glob(Arc<GlobSet>),

    /// Match an exact set of relative paths
    Exact(Arc<HashSet<PathBuf>>),

    /// Match via an arbitrary predicate
    Predicate(Arc<dyn Fn(&Path) -> bool + Send + Sync>),
}

impl fmt::Debug for Matcher
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            Matcher::Glob(_) => write!(f, "Matcher::Glob(..)"),
            Matcher::Exact(set) => write!(f, "Matcher::Exact({:?})", set),
            Matcher::Predicate(_) => write!(f, "Matcher::Predicate(..)"),
        }
    }
}

impl Matcher
{
    /// Build a [`Matcher::Glob`] from one or more glob patterns
    pub fn glob<T: AsRef<str>>(patterns: &[T]) -> Matcher
    {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            if let Ok(glob) = Glob::new(pattern.as_ref()) {
                builder.add(glob);
            }
        }
        Matcher::Glob(Arc::new(builder.build().unwrap_or_else(|_| GlobSet::empty())))
    }

    /// Build a [`Matcher::Exact`] from a set of relative paths
    pub fn exact<T: Into<PathBuf>, I: IntoIterator<Item=T>>(paths: I) -> Matcher
    {
        Matcher::Exact(Arc::new(paths.into_iter().map(Into::into).collect()))
    }

    /// Build a [`Matcher::Predicate`] from an arbitrary function
    pub fn predicate<F: Fn(&Path) -> bool + Send + Sync + 'static>(f: F) -> Matcher
    {
        Matcher::Predicate(Arc::new(f))
    }

    /// Does `path` satisfy this matcher?
    pub fn is_match(&self, path: &Path) -> bool
    {
        match self {
            Matcher::Glob(set) => set.is_match(path),
            Matcher::Exact(set) => set.contains(path),
            Matcher::Predicate(f) => f(path),
        }
    }
}

/// The visibility overlay attached to a [`crate::VirtualFs`] projection: an optional working
/// directory plus include/exclude/exact-files rules.
///
/// ### Examples
/// ```
/// use patchfs::prelude::*;
/// use std::path::Path;
///
/// let mut filters = Filters::default();
/// filters.exclude.push(Matcher::glob(&["*.log"]));
/// assert!(!filters.is_visible(Path::new("a.log")));
/// assert!(filters.is_visible(Path::new("a.rs")));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Filters
{
    /// Working directory this projection resolves relative paths against, when set
    pub cwd: Option<PathBuf>,

    /// Paths to include; empty means "everything not excluded"
    pub include: Vec<Matcher>,

    /// Paths to exclude, checked after `files`
    pub exclude: Vec<Matcher>,

    /// Exact paths always considered visible, checked first and bypassing `exclude`/`include`
    pub files: Vec<Matcher>,
}

impl Filters
{
    /// Compose `files`, `exclude`, and `include` into one visibility decision: an exact `files`
    /// match always wins, then `exclude` hides a path, then `include` (when non-empty) must match.
    pub fn is_visible(&self, path: &Path) -> bool
    {
        if self.files.iter().any(|m| m.is_match(path)) {
            return true;
        }
        if self.exclude.iter().any(|m| m.is_match(path)) {
            return false;
        }
        if self.include.is_empty() {
            return true;
        }
        self.include.iter().any(|m| m.is_match(path))
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_glob_matches()
    {
        let m = Matcher::glob(&["*.js"]);
        assert!(m.is_match(Path::new("a.js")));
        assert!(!m.is_match(Path::new("a.rs")));
    }

    #[test]
    fn test_exact_matches()
    {
        let m = Matcher::exact(vec!["a/b"]);
        assert!(m.is_match(Path::new("a/b")));
        assert!(!m.is_match(Path::new("a/c")));
    }

    #[test]
    fn test_files_bypasses_exclude()
    {
        let mut filters = Filters::default();
        filters.exclude.push(Matcher::glob(&["*"]));
        filters.files.push(Matcher::exact(vec!["keep.txt"]));
        assert!(filters.is_visible(Path::new("keep.txt")));
        assert!(!filters.is_visible(Path::new("other.txt")));
    }

    #[test]
    fn test_include_restricts_when_non_empty()
    {
        let mut filters = Filters::default();
        filters.include.push(Matcher::glob(&["src/**"]));
        assert!(filters.is_visible(Path::new("src/a.rs")));
        assert!(!filters.is_visible(Path::new("docs/a.md")));
    }
}
