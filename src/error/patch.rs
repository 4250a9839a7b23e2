use std::{error::Error as StdError, fmt};

/// An error indicating something went wrong while applying a [`crate::Patch`]
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum PatchError
{
    /// `apply_patch` encountered an operation with no matching delegate method
    UnknownOperation(String),
}

impl StdError for PatchError {}

impl fmt::Display for PatchError
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result
    {
        match self {
            PatchError::UnknownOperation(op) => write!(f, "no delegate registered for operation: {}", op),
        }
    }
}
