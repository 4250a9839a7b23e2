//! The [`Entry`] value type: one filesystem record (file, directory, or symlink) as tracked by an
//! [`crate::EntryStore`].
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use crate::vfs::VirtualFs;

/// `mode` bits identifying a directory, per `mode & MODE_MASK == MODE_DIR`
pub const MODE_MASK: u32 = 0xF000;

/// `mode` bits identifying a directory
pub const MODE_DIR: u32 = 0x4000;

/// `mode` bits identifying a symlink
pub const MODE_SYMLINK: u32 = 0xA000;

/// `mode` bits identifying a regular file
pub const MODE_FILE: u32 = 0x8000;

/// Marks a directory entry as a symlinked mount point backed by another [`VirtualFs`].
///
/// Generalizes the source system's untyped `_projection = {tree, entry}` pair (with an `entry ==
/// ROOT` sentinel) into a proper tagged enum, per REDESIGN FLAGS in `SPEC_FULL.md` section 9.
#[derive(Clone, Debug)]
pub enum Projection
{
    /// The entire `tree` is mounted at this entry's path
    Root(Arc<VirtualFs>),

    /// A specific path within `tree` is mounted at this entry's path
    Mount(Arc<VirtualFs>, PathBuf),
}

/// A single filesystem record: a file, directory, or symlink.
///
/// ### Examples
/// ```
/// use patchfs::prelude::*;
///
/// let entry = Entry::dir("foo/bar");
/// assert!(entry.is_dir());
/// assert_eq!(entry.relative_path, PathBuf::from("foo/bar"));
/// ```
#[derive(Clone, Debug)]
pub struct Entry
{
    /// POSIX-style relative path; directories never carry a trailing `/` in the stored value
    pub relative_path: PathBuf,

    /// Content size in bytes, `0` for directories by convention
    pub size: u64,

    /// Milliseconds since the Unix epoch
    pub mtime: i64,

    /// Bit pattern identifying file type (`MODE_MASK`) plus permission bits
    pub mode: u32,

    /// Content hash, populated lazily on read or eagerly on write
    pub checksum: Option<String>,

    /// Symlink target, set only when `is_symlink()` is true
    pub target: Option<PathBuf>,

    /// Set when this directory entry is a symlinked mount point from a merge or
    /// `symlink_from_entry`
    pub projection: Option<Projection>,

    /// Opaque extra equality keys a caller may attach
    pub meta: Option<HashMap<String, String>>,
}

impl Entry
{
    /// Construct a new, empty file entry at `path` with the given metadata
    pub fn new<T: AsRef<Path>>(path: T, size: u64, mtime: i64, mode: u32) -> Entry
    {
        Entry {
            relative_path: strip_trailing_slash(path.as_ref()),
            size,
            mtime,
            mode,
            checksum: None,
            target: None,
            projection: None,
            meta: None,
        }
    }

    /// Construct a zero-size directory entry at `path`
    ///
    /// ### Examples
    /// ```
    /// use patchfs::prelude::*;
    ///
    /// assert!(Entry::dir("a/b").is_dir());
    /// ```
    pub fn dir<T: AsRef<Path>>(path: T) -> Entry
    {
        Entry::new(path, 0, 0, MODE_DIR | 0o755)
    }

    /// Construct a zero-size, zero-mtime file entry at `path` with mode inferred from a trailing
    /// `/` on the input (mirrors the source system's `fromPath` factory: 0 size, current time,
    /// mode inferred from trailing `/`). The current time is taken from the system clock.
    ///
    /// ### Examples
    /// ```
    /// use patchfs::prelude::*;
    ///
    /// assert!(Entry::from_path("a/b/").is_dir());
    /// assert!(Entry::from_path("a/b").is_file());
    /// ```
    pub fn from_path<T: AsRef<Path>>(path: T) -> Entry
    {
        let is_dir = path.as_ref().to_string_lossy().ends_with('/');
        let mode = if is_dir { MODE_DIR | 0o755 } else { MODE_FILE | 0o644 };
        Entry::new(path, 0, now_ms(), mode)
    }

    /// Construct an entry from a `std::fs::Metadata` stat-like record, mirroring the source
    /// system's `fromStat(path, stat)` factory.
    pub fn from_stat<T: AsRef<Path>>(path: T, stat: &fs::Metadata) -> Entry
    {
        let mode = if stat.is_dir() {
            MODE_DIR | 0o755
        } else if stat.file_type().is_symlink() {
            MODE_SYMLINK | 0o777
        } else {
            MODE_FILE | 0o644
        };
        let mtime = stat.modified().map(to_ms).unwrap_or(0);
        Entry::new(path, if stat.is_dir() { 0 } else { stat.len() }, mtime, mode)
    }

    /// Construct a symlink entry at `path` pointing at `target`
    pub fn symlink<T: AsRef<Path>, U: AsRef<Path>>(path: T, target: U) -> Entry
    {
        let mut entry = Entry::new(path, 0, now_ms(), MODE_SYMLINK | 0o777);
        entry.target = Some(target.as_ref().to_path_buf());
        entry
    }

    /// Regular directories report true; symlinks never do (symlink-to-directory is surfaced via
    /// `is_symlink() && is_dir_target()` by the VFS, which resolves through the real filesystem)
    pub fn is_dir(&self) -> bool
    {
        self.mode & MODE_MASK == MODE_DIR
    }

    /// Regular files report true
    pub fn is_file(&self) -> bool
    {
        self.mode & MODE_MASK == MODE_FILE
    }

    /// Symlinks (to either a file or a directory) report true
    pub fn is_symlink(&self) -> bool
    {
        self.mode & MODE_MASK == MODE_SYMLINK
    }

    /// True when this directory entry is a symlinked mount point (produced by a merge's
    /// single-contributor optimization or `symlink_from_entry`)
    pub fn is_projection(&self) -> bool
    {
        self.projection.is_some()
    }

    /// The parent directory path of this entry, including a trailing separator, or empty for a
    /// top-level entry
    pub fn basename(&self) -> String
    {
        crate::path::basename(self.relative_path.to_string_lossy())
    }

    /// Render this entry's relative path the way patches do: a trailing `/` for directories
    pub fn patch_path(&self) -> String
    {
        let s = self.relative_path.to_string_lossy().into_owned();
        if self.is_dir() && !s.is_empty() {
            format!("{}/", s)
        } else {
            s
        }
    }
}

fn strip_trailing_slash(path: &Path) -> PathBuf
{
    let s = path.to_string_lossy();
    match s.strip_suffix('/') {
        Some(stripped) if !stripped.is_empty() => PathBuf::from(stripped),
        _ => path.to_path_buf(),
    }
}

fn to_ms(time: SystemTime) -> i64
{
    time.duration_since(UNIX_EPOCH).map(|d| d.as_millis() as i64).unwrap_or(0)
}

pub(crate) fn now_ms() -> i64
{
    to_ms(SystemTime::now())
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_dir_strips_trailing_slash()
    {
        let entry = Entry::dir("foo/bar/");
        assert_eq!(entry.relative_path, PathBuf::from("foo/bar"));
        assert!(entry.is_dir());
    }

    #[test]
    fn test_from_path_infers_kind()
    {
        assert!(Entry::from_path("a/b/").is_dir());
        assert!(Entry::from_path("a/b").is_file());
    }

    #[test]
    fn test_patch_path_trailing_slash_for_dirs()
    {
        assert_eq!(Entry::dir("b").patch_path(), "b/");
        assert_eq!(Entry::new("b.js", 0, 0, MODE_FILE).patch_path(), "b.js");
    }

    #[test]
    fn test_symlink_entry()
    {
        let entry = Entry::symlink("link", "/target");
        assert!(entry.is_symlink());
        assert_eq!(entry.target, Some(PathBuf::from("/target")));
    }
}
