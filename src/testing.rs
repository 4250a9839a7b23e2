//! Test-only helpers and `assert_*!` macros for exercising a [`crate::VirtualFs`] against a
//! disposable [`tempfile::TempDir`].

/// Create a [`crate::VirtualFs`] rooted at a fresh [`tempfile::TempDir`] and started (ready for
/// writes), returning both so the directory isn't dropped (and deleted) before the test finishes.
///
/// ### Examples
/// ```
/// use patchfs::prelude::*;
///
/// let (vfs, _tmpdir) = assert_vfs_setup!();
/// assert_vfs_write!(vfs, "a.txt", b"hello");
/// assert_vfs_exists!(vfs, "a.txt");
/// ```
#[macro_export]
macro_rules! assert_vfs_setup {
    () => {{
        let tmpdir = tempfile::tempdir().expect("assert_vfs_setup!: failed to create temp dir");
        let vfs = $crate::VirtualFs::new(tmpdir.path()).expect("assert_vfs_setup!: failed to open vfs");
        vfs.start();
        (vfs, tmpdir)
    }};
}

/// Write `content` to `path` through `vfs`, panicking with context on failure
#[macro_export]
macro_rules! assert_vfs_write {
    ($vfs:expr, $path:expr, $content:expr) => {
        $vfs.write($path, $content).unwrap_or_else(|e| panic!("assert_vfs_write!({}): {}", $path, e))
    };
}

/// Assert that `path` exists in `vfs`
#[macro_export]
macro_rules! assert_vfs_exists {
    ($vfs:expr, $path:expr) => {
        assert!($vfs.exists($path).unwrap_or(false), "assert_vfs_exists!: '{}' does not exist", $path)
    };
}

/// Assert that `path` does not exist in `vfs`
#[macro_export]
macro_rules! assert_vfs_no_exists {
    ($vfs:expr, $path:expr) => {
        assert!(!$vfs.exists($path).unwrap_or(true), "assert_vfs_no_exists!: '{}' unexpectedly exists", $path)
    };
}

/// Create `path` (and ancestors) as a directory through `vfs`, panicking with context on failure
#[macro_export]
macro_rules! assert_vfs_mkdir_p {
    ($vfs:expr, $path:expr) => {
        $vfs.mkdirp($path).unwrap_or_else(|e| panic!("assert_vfs_mkdir_p!({}): {}", $path, e))
    };
}

/// Assert that reading `path` through `vfs` yields exactly `content`
#[macro_export]
macro_rules! assert_vfs_read_eq {
    ($vfs:expr, $path:expr, $content:expr) => {
        assert_eq!($vfs.read($path).unwrap_or_else(|e| panic!("assert_vfs_read_eq!({}): {}", $path, e)), $content)
    };
}

#[cfg(test)]
mod tests
{
    #[test]
    fn test_assert_macros_round_trip()
    {
        let (vfs, _tmpdir) = assert_vfs_setup!();
        assert_vfs_write!(vfs, "a.txt", b"hello");
        assert_vfs_exists!(vfs, "a.txt");
        assert_vfs_read_eq!(vfs, "a.txt", b"hello");
        vfs.unlink("a.txt").unwrap();
        assert_vfs_no_exists!(vfs, "a.txt");
    }
}
