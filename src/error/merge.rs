use std::{error::Error as StdError, fmt, path::PathBuf};

/// An error indicating something went wrong while merging multiple trees via [`crate::MergeEngine`]
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum MergeError
{
    /// Two distinct original-case names collided once lower-cased, citing both source trees'
    /// indices and the two original names.
    CapitalizationConflict
    {
        left: usize, right: usize, left_name: String, right_name: String
    },

    /// A name is a file in one contributing tree and a directory in another
    FileTypeConflict
    {
        path: PathBuf
    },

    /// A file name appears in more than one contributing tree and `overwrite` was false
    OverwriteRefused
    {
        path: PathBuf
    },
}

impl StdError for MergeError {}

impl fmt::Display for MergeError
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result
    {
        match self {
            MergeError::CapitalizationConflict { left, right, left_name, right_name } => write!(
                f,
                "capitalization conflict between tree {} ('{}') and tree {} ('{}')",
                left, left_name, right, right_name
            ),
            MergeError::FileTypeConflict { path } => {
                write!(f, "'{}' is a file in one tree and a directory in another", path.display())
            },
            MergeError::OverwriteRefused { path } => {
                write!(f, "'{}' exists in more than one tree and overwrite is disabled", path.display())
            },
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_merge_errors()
    {
        assert_eq!(
            MergeError::CapitalizationConflict { left: 0, right: 1, left_name: "bar".into(), right_name: "Bar".into() }
                .to_string(),
            "capitalization conflict between tree 0 ('bar') and tree 1 ('Bar')"
        );
        assert_eq!(
            MergeError::OverwriteRefused { path: PathBuf::from("qux") }.to_string(),
            "'qux' exists in more than one tree and overwrite is disabled"
        );
    }
}
