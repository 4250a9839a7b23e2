use std::{error::Error as StdError, fmt, path::PathBuf};

/// An error indicating something went wrong while normalizing or validating a path
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum PathError
{
    /// A path was required to be non-empty but wasn't
    Empty,

    /// A root path was required to be absolute but wasn't
    NonAbsolute(PathBuf),
}

impl StdError for PathError {}

impl fmt::Display for PathError
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result
    {
        match self {
            PathError::Empty => write!(f, "path is empty"),
            PathError::NonAbsolute(path) => write!(f, "path is not absolute: {}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_path_errors()
    {
        assert_eq!(PathError::Empty.to_string(), "path is empty");
        assert_eq!(
            PathError::NonAbsolute(PathBuf::from("foo")).to_string(),
            "path is not absolute: foo"
        );
    }
}
