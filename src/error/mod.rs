//! Provides a common error hierarchy for the crate in the teacher's layered-enum style: small
//! per-concern error types, implemented by hand, aggregated into one top-level [`Error`].
//!
//! ### Using the error type
//! ```
//! use patchfs::prelude::*;
//!
//! let mut err = Error::from(VfsError::NonSourceRootChange);
//! assert!(err.downcast_ref::<VfsError>().is_some());
//! assert!(err.downcast_mut::<VfsError>().is_some());
//! ```
mod entry;
mod merge;
mod patch;
mod path;
mod vfs;

use std::{error::Error as StdError, fmt, io};

pub use entry::*;
pub use merge::*;
pub use patch::*;
pub use path::*;
pub use vfs::*;

/// A simplified result type using this crate's common [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Aggregates every concern-specific error type in the crate behind a single error, mirroring the
/// teacher's hand-rolled `RvError` aggregate rather than a derive-macro crate.
#[derive(Debug)]
pub enum Error
{
    /// An entry store ordering error
    Entry(EntryError),

    /// An io error surfaced directly from a syscall
    Io(io::Error),

    /// A merge engine error
    Merge(MergeError),

    /// A patch application error
    Patch(PatchError),

    /// A path normalization error
    Path(PathError),

    /// A virtual filesystem facade error
    Vfs(VfsError),
}

impl Error
{
    /// Implemented directly on the `Error` type to reduce casting required
    pub fn is<T: StdError + 'static>(&self) -> bool
    {
        self.as_ref().is::<T>()
    }

    /// Implemented directly on the `Error` type to reduce casting required
    pub fn downcast_ref<T: StdError + 'static>(&self) -> Option<&T>
    {
        self.as_ref().downcast_ref::<T>()
    }

    /// Implemented directly on the `Error` type to reduce casting required
    pub fn downcast_mut<T: StdError + 'static>(&mut self) -> Option<&mut T>
    {
        self.as_mut().downcast_mut::<T>()
    }

    /// Implemented directly on the `Error` type, delegating through `as_ref`
    pub fn source(&self) -> Option<&(dyn StdError + 'static)>
    {
        self.as_ref().source()
    }
}

impl StdError for Error {}

impl fmt::Display for Error
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result
    {
        match self {
            Error::Entry(err) => write!(f, "{}", err),
            Error::Io(err) => write!(f, "{}", err),
            Error::Merge(err) => write!(f, "{}", err),
            Error::Patch(err) => write!(f, "{}", err),
            Error::Path(err) => write!(f, "{}", err),
            Error::Vfs(err) => write!(f, "{}", err),
        }
    }
}

impl AsRef<dyn StdError> for Error
{
    fn as_ref(&self) -> &(dyn StdError+'static)
    {
        match self {
            Error::Entry(err) => err,
            Error::Io(err) => err,
            Error::Merge(err) => err,
            Error::Patch(err) => err,
            Error::Path(err) => err,
            Error::Vfs(err) => err,
        }
    }
}

impl AsMut<dyn StdError> for Error
{
    fn as_mut(&mut self) -> &mut (dyn StdError+'static)
    {
        match self {
            Error::Entry(err) => err,
            Error::Io(err) => err,
            Error::Merge(err) => err,
            Error::Patch(err) => err,
            Error::Path(err) => err,
            Error::Vfs(err) => err,
        }
    }
}

impl From<EntryError> for Error
{
    fn from(err: EntryError) -> Error
    {
        Error::Entry(err)
    }
}

impl From<io::Error> for Error
{
    fn from(err: io::Error) -> Error
    {
        Error::Io(err)
    }
}

impl From<MergeError> for Error
{
    fn from(err: MergeError) -> Error
    {
        Error::Merge(err)
    }
}

impl From<PatchError> for Error
{
    fn from(err: PatchError) -> Error
    {
        Error::Patch(err)
    }
}

impl From<PathError> for Error
{
    fn from(err: PathError) -> Error
    {
        Error::Path(err)
    }
}

impl From<VfsError> for Error
{
    fn from(err: VfsError) -> Error
    {
        Error::Vfs(err)
    }
}
