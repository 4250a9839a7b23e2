//! The N-way merge engine: flattens several [`VirtualFs`] trees into one logical view, with
//! case-insensitive collision detection, file/directory type-conflict detection, an overwrite
//! policy, and a symlinked-mount optimization for directories contributed by exactly one tree.
use std::{collections::HashMap, path::PathBuf, sync::Arc};

use tracing::warn;

use crate::{
    entry::{Entry, Projection},
    entry_eq,
    error::*,
    patch::Patch,
    store::EntryStore,
    vfs::VirtualFs,
};

/// Per-contributor aggregate for one name while scanning a directory during a merge
struct Contribution
{
    indices: Vec<usize>,
    is_dir: bool,
    entry: Entry,
}

/// Merges N [`VirtualFs`] trees into one synthesized view.
pub struct MergeEngine
{
    trees: Vec<Arc<VirtualFs>>,
    overwrite: bool,
    /// A non-source tree (per `SPEC_FULL.md` 4.7.6's `FSTree.fromEntries(results)`) that
    /// accumulates the merge result across calls to [`MergeEngine::changes`], so the diff reuses
    /// [`VirtualFs`]'s own root-diffing machinery instead of tracking a baseline by hand.
    result_tree: Option<VirtualFs>,
}

impl MergeEngine
{
    /// Construct a merge engine over `trees`. `overwrite` controls whether a file contributed by
    /// more than one tree is allowed (later tree wins) or refused with [`MergeError::OverwriteRefused`].
    pub fn new(trees: Vec<Arc<VirtualFs>>, overwrite: bool) -> MergeEngine
    {
        MergeEngine { trees, overwrite, result_tree: None }
    }

    /// Compute the merged entry list rooted at `base_dir`.
    pub fn merge<T: AsRef<std::path::Path>>(&self, base_dir: T) -> Result<EntryStore>
    {
        let mut results = self.merge_dir(base_dir.as_ref(), &(0..self.trees.len()).collect::<Vec<_>>())?;
        results.sort_by(|a, b| crate::path::compare_by_relative_path(&a.relative_path, &b.relative_path));
        EntryStore::from_sorted(results)
    }

    fn merge_dir(&self, dir: &std::path::Path, indices: &[usize]) -> Result<Vec<Entry>>
    {
        let mut by_lower: HashMap<String, (String, usize)> = HashMap::new();
        let mut contributions: HashMap<String, Contribution> = HashMap::new();

        for &index in indices {
            let tree = &self.trees[index];
            let names = match tree.readdir(dir) {
                Ok(names) => names,
                Err(_) => continue,
            };
            for name_path in names {
                let name = name_path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
                let lower = name.to_lowercase();
                if let Some((existing_case, first_index)) = by_lower.get(&lower) {
                    if existing_case != &name {
                        warn!(left = %existing_case, right = %name, tree = index, "merge: capitalization conflict");
                        return Err(MergeError::CapitalizationConflict {
                            left: *first_index,
                            right: index,
                            left_name: existing_case.clone(),
                            right_name: name.clone(),
                        }
                        .into());
                    }
                } else {
                    by_lower.insert(lower, (name.clone(), index));
                }

                let entry = tree.stat(&name_path)?.ok_or_else(|| VfsError::NotFound(name_path.clone()))?;
                match contributions.get_mut(&name) {
                    Some(contribution) => {
                        if contribution.is_dir != entry.is_dir() {
                            warn!(path = %name_path.display(), "merge: file/directory type conflict");
                            return Err(MergeError::FileTypeConflict { path: name_path.clone() }.into());
                        }
                        if !contribution.is_dir && !self.overwrite {
                            warn!(path = %name_path.display(), "merge: overwrite refused");
                            return Err(MergeError::OverwriteRefused { path: name_path.clone() }.into());
                        }
                        contribution.indices.push(index);
                        contribution.entry = entry;
                    },
                    None => {
                        contributions.insert(name.clone(), Contribution { indices: vec![index], is_dir: entry.is_dir(), entry });
                    },
                }
            }
        }

        let mut names: Vec<&String> = contributions.keys().collect();
        names.sort();

        let mut results = Vec::new();
        for name in names {
            let contribution = &contributions[name];
            let path = dir.join(name);
            if contribution.is_dir {
                if contribution.indices.len() == 1 && symlinks_supported() {
                    let mut entry = Entry::dir(&path);
                    entry.projection = Some(Projection::Mount(Arc::clone(&self.trees[contribution.indices[0]]), path.clone()));
                    results.push(entry);
                } else {
                    results.push(Entry::dir(&path));
                    results.extend(self.merge_dir(&path, &contribution.indices)?);
                }
            } else {
                let mut entry = contribution.entry.clone();
                entry.relative_path = path;
                results.push(entry);
            }
        }
        Ok(results)
    }

    /// Diff the current merge result against the last captured snapshot, using [`entry_eq::merge`]
    /// (directory equality additionally requires the `is_projection` flag to match).
    pub fn changes<T: AsRef<std::path::Path>>(&mut self, base_dir: T) -> Result<Patch>
    {
        let current = self.merge(base_dir)?;
        let tree = self.result_tree.get_or_insert_with(|| VirtualFs::from_entries(EntryStore::new()));
        tree.replace_entries(current);
        let eq = entry_eq::merge();
        tree.changes_with(Some(eq.as_ref()))
    }
}

fn symlinks_supported() -> bool
{
    crate::symlink::symlinks_supported()
}

#[cfg(test)]
mod tests
{
    use tempfile::tempdir;
    use tracing_test::traced_test;

    use super::*;

    fn tree<T: AsRef<std::path::Path>>(root: T) -> Arc<VirtualFs>
    {
        Arc::new(VirtualFs::new(root.as_ref()).unwrap())
    }

    #[test]
    fn test_single_contributor_dir_is_symlinked_mount()
    {
        let a = tempdir().unwrap();
        std::fs::create_dir(a.path().join("only_a")).unwrap();
        std::fs::write(a.path().join("only_a/f.txt"), "hi").unwrap();
        let b = tempdir().unwrap();

        let engine = MergeEngine::new(vec![tree(a.path()), tree(b.path())], true);
        let merged = engine.merge("").unwrap();
        let dir_entry = merged.find_by_relative_path("only_a").entry.unwrap();
        assert!(dir_entry.is_projection());
    }

    #[test]
    fn test_shared_dir_recurses_instead_of_mounting()
    {
        let a = tempdir().unwrap();
        std::fs::create_dir(a.path().join("shared")).unwrap();
        std::fs::write(a.path().join("shared/a.txt"), "a").unwrap();
        let b = tempdir().unwrap();
        std::fs::create_dir(b.path().join("shared")).unwrap();
        std::fs::write(b.path().join("shared/b.txt"), "b").unwrap();

        let engine = MergeEngine::new(vec![tree(a.path()), tree(b.path())], true);
        let merged = engine.merge("").unwrap();
        let dir_entry = merged.find_by_relative_path("shared").entry.unwrap();
        assert!(!dir_entry.is_projection());
        assert!(merged.find_by_relative_path("shared/a.txt").found);
        assert!(merged.find_by_relative_path("shared/b.txt").found);
    }

    #[test]
    fn test_overwrite_refused_when_disabled()
    {
        let a = tempdir().unwrap();
        std::fs::write(a.path().join("f.txt"), "a").unwrap();
        let b = tempdir().unwrap();
        std::fs::write(b.path().join("f.txt"), "b").unwrap();

        let engine = MergeEngine::new(vec![tree(a.path()), tree(b.path())], false);
        let err = engine.merge("").unwrap_err();
        assert!(err.is::<MergeError>());
    }

    #[test]
    fn test_capitalization_conflict_detected()
    {
        let a = tempdir().unwrap();
        std::fs::write(a.path().join("File.txt"), "a").unwrap();
        let b = tempdir().unwrap();
        std::fs::write(b.path().join("file.txt"), "b").unwrap();

        let engine = MergeEngine::new(vec![tree(a.path()), tree(b.path())], true);
        let err = engine.merge("").unwrap_err();
        assert!(err.is::<MergeError>());
    }

    #[traced_test]
    #[test]
    fn test_capitalization_conflict_logs_warning()
    {
        let a = tempdir().unwrap();
        std::fs::write(a.path().join("File.txt"), "a").unwrap();
        let b = tempdir().unwrap();
        std::fs::write(b.path().join("file.txt"), "b").unwrap();

        let engine = MergeEngine::new(vec![tree(a.path()), tree(b.path())], true);
        let _ = engine.merge("").unwrap_err();
        assert!(logs_contain("capitalization conflict"));
    }

    #[test]
    fn test_type_conflict_detected()
    {
        let a = tempdir().unwrap();
        std::fs::write(a.path().join("x"), "a").unwrap();
        let b = tempdir().unwrap();
        std::fs::create_dir(b.path().join("x")).unwrap();

        let engine = MergeEngine::new(vec![tree(a.path()), tree(b.path())], true);
        let err = engine.merge("").unwrap_err();
        assert!(err.is::<MergeError>());
    }
}
