use std::{error::Error as StdError, fmt, path::PathBuf};

/// An error indicating something went wrong inside the [`crate::VirtualFs`] facade
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum VfsError
{
    /// A `VirtualFs` root was given a non-absolute path at construction or `reread`
    NonAbsoluteRoot(PathBuf),

    /// `reread(new_root)` was called on a tree that isn't a source tree
    NonSourceRootChange,

    /// A resolved path escaped the tree's root
    PathEscape
    {
        path: PathBuf, cwd: PathBuf, root: PathBuf
    },

    /// The given path has no corresponding entry
    NotFound(PathBuf),

    /// The given path exists but is not a directory
    NotDirectory(PathBuf),

    /// A write-style operation was attempted while the tree's state was STOPPED. Carries the
    /// name of the attempted operation.
    WriteOnStopped(String),
}

impl StdError for VfsError {}

impl fmt::Display for VfsError
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result
    {
        match self {
            VfsError::NonAbsoluteRoot(path) => write!(f, "root is not absolute: {}", path.display()),
            VfsError::NonSourceRootChange => {
                write!(f, "reread with a new root is only valid on a source tree")
            },
            VfsError::PathEscape { path, cwd, root } => write!(
                f,
                "path '{}' escapes root '{}' (cwd: '{}')",
                path.display(),
                root.display(),
                cwd.display()
            ),
            VfsError::NotFound(path) => write!(f, "no such file or directory: {}", path.display()),
            VfsError::NotDirectory(path) => write!(f, "not a directory: {}", path.display()),
            VfsError::WriteOnStopped(op) => write!(f, "{} called on a stopped tree", op),
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_vfs_errors()
    {
        assert_eq!(VfsError::NonSourceRootChange.to_string(), "reread with a new root is only valid on a source tree");
        assert_eq!(VfsError::NotFound(PathBuf::from("/a")).to_string(), "no such file or directory: /a");
        assert_eq!(VfsError::NotDirectory(PathBuf::from("/a")).to_string(), "not a directory: /a");
        assert_eq!(VfsError::WriteOnStopped("mkdir".into()).to_string(), "mkdir called on a stopped tree");
    }
}
