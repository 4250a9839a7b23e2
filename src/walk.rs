//! Disk-to-[`Entry`] adapter: walks a real directory tree with `walkdir` and produces a sorted
//! [`Vec<Entry>`] ready for [`crate::EntryStore::from_sorted`].
use std::path::Path;

use walkdir::WalkDir;

use crate::{entry::Entry, error::*, hash};

/// Walk `root` and return every entry beneath it (directories and files, symlinks included but
/// not followed) as a sorted, relative-to-`root` [`Vec<Entry>`].
///
/// Content hashes are populated only for files; call sites that don't need them can ignore
/// `checksum`, since hashing every file up front would make a plain directory listing expensive
/// for large trees. Use [`walk_with_hashes`] when checksums are required immediately.
pub fn walk<T: AsRef<Path>>(root: T) -> Result<Vec<Entry>>
{
    walk_impl(root.as_ref(), false)
}

/// As [`walk`], but eagerly computes and populates `checksum` for every file.
pub fn walk_with_hashes<T: AsRef<Path>>(root: T) -> Result<Vec<Entry>>
{
    walk_impl(root.as_ref(), true)
}

fn walk_impl(root: &Path, with_hashes: bool) -> Result<Vec<Entry>>
{
    let mut entries = Vec::new();
    for dent in WalkDir::new(root).min_depth(1).follow_links(false) {
        let dent = dent.map_err(|e| VfsError::NotFound(e.path().unwrap_or(root).to_path_buf()))?;
        let relative = dent.path().strip_prefix(root).unwrap_or(dent.path());
        let meta = dent.metadata().map_err(|e| VfsError::NotFound(e.path().unwrap_or(root).to_path_buf()))?;
        let mut entry = Entry::from_stat(relative, &meta);

        if with_hashes && entry.is_file() {
            let bytes = std::fs::read(dent.path())?;
            entry.checksum = Some(hash::hash(&bytes));
        }
        entries.push(entry);
    }
    entries.sort_by(|a, b| crate::path::compare_by_relative_path(&a.relative_path, &b.relative_path));
    Ok(entries)
}

#[cfg(test)]
mod tests
{
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_walk_produces_sorted_entries()
    {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("b")).unwrap();
        std::fs::write(dir.path().join("a.txt"), "hi").unwrap();
        std::fs::write(dir.path().join("b/c.txt"), "yo").unwrap();

        let entries = walk(dir.path()).unwrap();
        let paths: Vec<_> = entries.iter().map(|e| e.relative_path.to_string_lossy().into_owned()).collect();
        assert_eq!(paths, vec!["a.txt", "b", "b/c.txt"]);
    }

    #[test]
    fn test_walk_with_hashes_populates_checksum()
    {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "hi").unwrap();

        let entries = walk_with_hashes(dir.path()).unwrap();
        let file = entries.iter().find(|e| e.relative_path.to_string_lossy() == "a.txt").unwrap();
        assert!(file.checksum.is_some());
    }
}
