//! [`EntryStore`]: a sorted, path-unique collection of [`Entry`] values.
use std::path::{Path, PathBuf};

use crate::{entry::Entry, error::*, path::*};

/// The result of looking an entry up by relative path: the entry itself when found, and the index
/// at which it was found (or where it would be inserted, when not found).
pub struct FindResult<'a>
{
    /// The matching entry, if one exists at `path`
    pub entry: Option<&'a Entry>,

    /// The entry's index when found, or its sorted insertion point when not found
    pub index: usize,

    /// Whether `index` refers to an existing entry
    pub found: bool,
}

/// Options controlling how [`EntryStore::add`] treats its input
#[derive(Clone, Copy, Debug, Default)]
pub struct AddOpts
{
    /// Sort the input and inject implied ancestor directory entries before merging, instead of
    /// requiring the input to already be sorted and complete
    pub sort_and_expand: bool,
}

/// A sorted, path-unique collection of [`Entry`] values.
///
/// ### Examples
/// ```
/// use patchfs::prelude::*;
///
/// let mut store = EntryStore::new();
/// store.add(vec![Entry::dir("b"), Entry::dir("a")], AddOpts { sort_and_expand: true }).unwrap();
/// let paths: Vec<_> = store.iter().map(|e| e.relative_path.clone()).collect();
/// assert_eq!(paths, vec![PathBuf::from("a"), PathBuf::from("b")]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct EntryStore
{
    entries: Vec<Entry>,
}

impl EntryStore
{
    /// Construct an empty store
    pub fn new() -> EntryStore
    {
        EntryStore { entries: Vec::new() }
    }

    /// Construct a store directly from entries already known to be sorted and unique. Intended
    /// for internal call sites (e.g. a disk walk that already produced sorted output); prefer
    /// [`EntryStore::add`] from arbitrary input.
    pub fn from_sorted(entries: Vec<Entry>) -> Result<EntryStore>
    {
        let paths: Vec<PathBuf> = entries.iter().map(|e| e.relative_path.clone()).collect();
        validate_sorted_unique(&paths)?;
        Ok(EntryStore { entries })
    }

    /// Number of entries in the store
    pub fn len(&self) -> usize
    {
        self.entries.len()
    }

    /// True when the store holds no entries
    pub fn is_empty(&self) -> bool
    {
        self.entries.is_empty()
    }

    /// Iterate over entries in sorted order
    pub fn iter(&self) -> impl Iterator<Item=&Entry>
    {
        self.entries.iter()
    }

    /// Borrow the underlying sorted slice
    pub fn as_slice(&self) -> &[Entry]
    {
        &self.entries
    }

    /// Find an entry by relative path. The input's trailing slash, if any, is ignored for
    /// lookup purposes.
    ///
    /// ### Examples
    /// ```
    /// use patchfs::prelude::*;
    ///
    /// let mut store = EntryStore::new();
    /// store.add(vec![Entry::dir("a")], AddOpts::default()).unwrap();
    /// assert!(store.find_by_relative_path("a/").found);
    /// assert!(!store.find_by_relative_path("b").found);
    /// ```
    pub fn find_by_relative_path<T: AsRef<Path>>(&self, path: T) -> FindResult<'_>
    {
        match self.entries.binary_search_by(|e| compare_by_relative_path(&e.relative_path, path.as_ref())) {
            Ok(index) => FindResult { entry: Some(&self.entries[index]), index, found: true },
            Err(index) => FindResult { entry: None, index, found: false },
        }
    }

    /// Insert `entry`, replacing any existing entry at the same path in place, or inserting at
    /// the correct sorted position otherwise.
    pub fn insert(&mut self, entry: Entry)
    {
        match self.entries.binary_search_by(|e| compare_by_relative_path(&e.relative_path, &entry.relative_path)) {
            Ok(index) => self.entries[index] = entry,
            Err(index) => self.entries.insert(index, entry),
        }
    }

    /// Remove the entry at `path`, if any. Returns the removed entry.
    pub fn remove<T: AsRef<Path>>(&mut self, path: T) -> Option<Entry>
    {
        match self.entries.binary_search_by(|e| compare_by_relative_path(&e.relative_path, path.as_ref())) {
            Ok(index) => Some(self.entries.remove(index)),
            Err(_) => None,
        }
    }

    /// Add a batch of entries. With `opts.sort_and_expand`, the input is sorted and missing
    /// ancestor directories are injected first; otherwise the input must already satisfy
    /// [`validate_sorted_unique`] or this returns [`EntryError::InvalidOrder`].
    ///
    /// Entries that collide on path with an existing store entry replace it in place.
    pub fn add(&mut self, entries: Vec<Entry>, opts: AddOpts) -> Result<()>
    {
        let entries = if opts.sort_and_expand {
            sort_and_expand(entries)
        } else {
            let paths: Vec<PathBuf> = entries.iter().map(|e| e.relative_path.clone()).collect();
            validate_sorted_unique(&paths)?;
            entries
        };
        for entry in entries {
            self.insert(entry);
        }
        Ok(())
    }

    /// Convert bare paths into entries (a trailing `/` marks a directory) and delegate to
    /// [`EntryStore::add`].
    pub fn add_paths<T: AsRef<str>>(&mut self, paths: &[T], opts: AddOpts) -> Result<()>
    {
        let entries = paths.iter().map(|p| Entry::from_path(p.as_ref())).collect();
        self.add(entries, opts)
    }
}

/// Stable-sort `entries` by path, then inject missing intermediate directory entries so that
/// every entry at depth D has every ancestor directory at depths `1..D-1` present in the result.
///
/// Uses a running "common prefix" watermark against the previously emitted path to avoid
/// re-emitting directories already implied by an earlier entry.
///
/// ### Examples
/// ```
/// use patchfs::prelude::*;
///
/// let expanded = sort_and_expand(vec![Entry::new("a/b/c.js", 0, 0, MODE_FILE)]);
/// let paths: Vec<_> = expanded.iter().map(|e| e.relative_path.to_string_lossy().into_owned()).collect();
/// assert_eq!(paths, vec!["a", "a/b", "a/b/c.js"]);
/// ```
pub fn sort_and_expand(mut entries: Vec<Entry>) -> Vec<Entry>
{
    entries.sort_by(|a, b| compare_by_relative_path(&a.relative_path, &b.relative_path));

    let mut out: Vec<Entry> = Vec::with_capacity(entries.len());
    let mut watermark = String::new();
    for entry in entries {
        let path = entry.relative_path.to_string_lossy().into_owned();
        let full = if entry.is_dir() { format!("{}/", path) } else { path.clone() };
        let prefix = common_prefix(&watermark, &full, '/');
        let mut cursor = prefix.len().min(path.len());
        // Scan `path`, not `full`, for ancestor boundaries: `full` carries a directory's own
        // trailing slash, which would otherwise surface as a bogus "ancestor" equal to the entry
        // itself.
        while let Some(rel) = path[cursor..].find('/') {
            let dir_end = cursor + rel;
            let dir_path = &path[..dir_end];
            if out.last().map(|e: &Entry| e.relative_path.to_string_lossy() != dir_path).unwrap_or(true) {
                out.push(Entry::dir(dir_path));
            }
            cursor = dir_end + 1;
        }
        watermark = full;
        out.push(entry);
    }
    out
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::entry::MODE_FILE;

    #[test]
    fn test_sort_and_expand_injects_ancestors()
    {
        let expanded = sort_and_expand(vec![Entry::new("a/b/c.js", 0, 0, MODE_FILE), Entry::new("a/d.js", 0, 0, MODE_FILE)]);
        let paths: Vec<_> = expanded.iter().map(|e| e.relative_path.to_string_lossy().into_owned()).collect();
        assert_eq!(paths, vec!["a", "a/b", "a/b/c.js", "a/d.js"]);
    }

    #[test]
    fn test_sort_and_expand_no_duplicates_for_shared_prefix()
    {
        let expanded =
            sort_and_expand(vec![Entry::new("a/b/c.js", 0, 0, MODE_FILE), Entry::new("a/b/d.js", 0, 0, MODE_FILE)]);
        let dirs: Vec<_> = expanded.iter().filter(|e| e.is_dir()).map(|e| e.relative_path.clone()).collect();
        assert_eq!(dirs, vec![PathBuf::from("a"), PathBuf::from("a/b")]);
    }

    #[test]
    fn test_sort_and_expand_does_not_duplicate_an_explicit_directory_entry()
    {
        let expanded = sort_and_expand(vec![Entry::dir("a"), Entry::dir("a/b")]);
        let paths: Vec<_> = expanded.iter().map(|e| e.relative_path.to_string_lossy().into_owned()).collect();
        assert_eq!(paths, vec!["a", "a/b"]);
        assert!(validate_sorted_unique(&expanded.iter().map(|e| e.relative_path.clone()).collect::<Vec<_>>()).is_ok());
    }

    #[test]
    fn test_add_rejects_unsorted_without_expand()
    {
        let mut store = EntryStore::new();
        let err = store.add(vec![Entry::dir("b"), Entry::dir("a")], AddOpts::default()).unwrap_err();
        assert!(err.is::<EntryError>());
    }

    #[test]
    fn test_insert_replaces_in_place()
    {
        let mut store = EntryStore::new();
        store.add(vec![Entry::new("a", 1, 1, MODE_FILE)], AddOpts::default()).unwrap();
        store.insert(Entry::new("a", 2, 2, MODE_FILE));
        assert_eq!(store.len(), 1);
        assert_eq!(store.find_by_relative_path("a").entry.unwrap().size, 2);
    }

    #[test]
    fn test_remove()
    {
        let mut store = EntryStore::new();
        store.add(vec![Entry::new("a", 0, 0, MODE_FILE)], AddOpts::default()).unwrap();
        assert!(store.remove("a").is_some());
        assert!(store.is_empty());
        assert!(store.remove("a").is_none());
    }
}
