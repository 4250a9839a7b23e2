//! Composable two-entry equality predicates, generalizing the source system's "default isEqual /
//! user-supplied isEqual / merge isEqual" tri-state into one predicate shape with named
//! constructors, per REDESIGN FLAGS in `SPEC_FULL.md` section 9.
use crate::entry::Entry;

/// A predicate deciding whether a `change` operation is needed when two entries share a path
pub type EntryEq = dyn Fn(&Entry, &Entry) -> bool;

/// The default predicate used by [`crate::calculate_patch`]: directories are always equal
/// (ignoring directory metadata); files are equal iff `size`, `mtime`, and `mode` all match.
///
/// ### Examples
/// ```
/// use patchfs::prelude::*;
///
/// let eq = default();
/// assert!(eq(&Entry::dir("a"), &Entry::dir("a")));
/// assert!(eq(&Entry::new("a", 1, 2, MODE_FILE), &Entry::new("a", 1, 2, MODE_FILE)));
/// assert!(!eq(&Entry::new("a", 1, 2, MODE_FILE), &Entry::new("a", 1, 3, MODE_FILE)));
/// ```
pub fn default() -> Box<EntryEq>
{
    Box::new(|a: &Entry, b: &Entry| {
        if a.is_dir() && b.is_dir() {
            true
        } else {
            a.size == b.size && a.mtime == b.mtime && a.mode == b.mode
        }
    })
}

/// The predicate used by [`crate::MergeEngine`]: extends [`default`] with "the `linkDir` flag
/// (whether a directory is a symlinked mount projection) must match".
///
/// ### Examples
/// ```
/// use patchfs::prelude::*;
///
/// let eq = merge();
/// assert!(eq(&Entry::dir("a"), &Entry::dir("a")));
/// ```
pub fn merge() -> Box<EntryEq>
{
    Box::new(|a: &Entry, b: &Entry| {
        if a.is_dir() && b.is_dir() {
            a.is_projection() == b.is_projection()
        } else {
            a.size == b.size && a.mtime == b.mtime && a.mode == b.mode
        }
    })
}
