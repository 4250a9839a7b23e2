//! Symlink-or-copy: the concrete adapter a [`crate::PatchDelegate`] uses to materialize a `create`
//! or `change` operation on disk, falling back to a real copy on platforms or filesystems that
//! reject symlinks.
use std::{
    fs,
    path::{Path, PathBuf},
    sync::atomic::{AtomicBool, Ordering},
};

use crate::error::*;

static SYMLINKS_SUPPORTED: AtomicBool = AtomicBool::new(true);

/// Force subsequent [`link_or_copy`] calls to skip the symlink attempt and copy directly. Intended
/// for tests and for platforms where a capability probe has already determined symlinks aren't
/// available.
pub fn set_symlinks_supported(supported: bool)
{
    SYMLINKS_SUPPORTED.store(supported, Ordering::Relaxed);
}

/// Whether [`link_or_copy`] will currently attempt a symlink before falling back to a copy
pub fn symlinks_supported() -> bool
{
    SYMLINKS_SUPPORTED.load(Ordering::Relaxed)
}

/// Link (or copy) `target` at `link`, creating `link`'s parent directory if it's missing.
///
/// Tries a symlink first; on failure (permission denied, unsupported filesystem, or after
/// [`set_symlinks_supported`]`(false)`) falls back to a full copy. If the parent directory is
/// missing, it's created once and the attempt is retried exactly once before giving up.
pub fn link_or_copy(target: &Path, link: &Path) -> Result<()>
{
    match try_link_or_copy(target, link) {
        Ok(()) => Ok(()),
        Err(err) => {
            let parent = link.parent().filter(|p| !p.as_os_str().is_empty());
            match parent {
                Some(parent) if !parent.exists() => {
                    fs::create_dir_all(parent)?;
                    try_link_or_copy(target, link)
                },
                _ => Err(err),
            }
        },
    }
}

fn try_link_or_copy(target: &Path, link: &Path) -> Result<()>
{
    if symlinks_supported() {
        if symlink(target, link).is_ok() {
            return Ok(());
        }
    }
    copy(target, link)
}

fn copy(target: &Path, link: &Path) -> Result<()>
{
    fs::copy(target, link)?;
    Ok(())
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> std::io::Result<()>
{
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(target: &Path, link: &Path) -> std::io::Result<()>
{
    if target.is_dir() {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}

/// `mkdir -p`: create `path` and any missing ancestors, succeeding if `path` already exists as a
/// directory.
pub fn mkdirp(path: &Path) -> Result<()>
{
    if path.is_dir() {
        return Ok(());
    }
    fs::create_dir_all(path)?;
    Ok(())
}

/// Resolve a relative path into an absolute one under `base`, without touching the filesystem.
pub fn abs_under(base: &Path, relative: &Path) -> PathBuf
{
    crate::path::mash(base, relative)
}
