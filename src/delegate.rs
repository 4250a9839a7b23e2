//! The default [`PatchDelegate`]: materializes patch operations against the real filesystem using
//! [`crate::symlink::link_or_copy`].
use std::{fs, path::Path};

use crate::{error::*, patch::PatchDelegate, symlink};

/// Applies patches to a real directory tree: files are linked or copied via
/// [`crate::symlink::link_or_copy`], directories via `std::fs`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DiskDelegate;

impl PatchDelegate for DiskDelegate
{
    fn unlink(&self, _input: &Path, output: &Path, _relative: &Path) -> Result<()>
    {
        if output.exists() {
            fs::remove_file(output)?;
        }
        Ok(())
    }

    fn rmdir(&self, _input: &Path, output: &Path, _relative: &Path) -> Result<()>
    {
        if output.exists() {
            fs::remove_dir(output)?;
        }
        Ok(())
    }

    fn mkdir(&self, _input: &Path, output: &Path, _relative: &Path) -> Result<()>
    {
        if !output.exists() {
            fs::create_dir(output)?;
        }
        Ok(())
    }

    fn mkdirp(&self, _input: &Path, output: &Path, _relative: &Path) -> Result<()>
    {
        symlink::mkdirp(output)
    }

    fn create(&self, input: &Path, output: &Path, _relative: &Path) -> Result<()>
    {
        symlink::link_or_copy(input, output)
    }

    fn change(&self, input: &Path, output: &Path, _relative: &Path) -> Result<()>
    {
        if output.exists() {
            fs::remove_file(output)?;
        }
        symlink::link_or_copy(input, output)
    }
}

#[cfg(test)]
mod tests
{
    use tempfile::tempdir;

    use super::*;
    use crate::{patch::calculate_and_apply_patch, store::{AddOpts, EntryStore}};

    #[test]
    fn test_disk_delegate_round_trip()
    {
        let src = tempdir().unwrap();
        let dst = tempdir().unwrap();
        fs::create_dir(src.path().join("sub")).unwrap();
        fs::write(src.path().join("sub/a.txt"), "hi").unwrap();

        let entries = crate::walk::walk(src.path()).unwrap();
        let ours = EntryStore::new();
        let mut theirs = EntryStore::new();
        theirs.add(entries, AddOpts { sort_and_expand: true }).unwrap();

        calculate_and_apply_patch(&ours, &theirs, src.path(), dst.path(), &DiskDelegate).unwrap();

        assert!(dst.path().join("sub").is_dir());
        assert_eq!(fs::read_to_string(dst.path().join("sub/a.txt")).unwrap(), "hi");
    }
}
