//! A tree-diffing patch engine, virtual filesystem facade, and N-way merge engine.
//!
//! ## Patch engine
//! [`EntryStore`] holds a sorted, path-unique set of [`Entry`] values. [`calculate_patch`] diffs
//! two stores into an ordered [`Patch`] — the removals-then-additions ordering guarantees a
//! directory's children are unlinked before the directory itself, and a `mkdir` precedes anything
//! created inside it. [`apply_patch`] replays a patch through a [`PatchDelegate`]; [`DiskDelegate`]
//! is the default implementation, symlinking-or-copying file content from input to output.
//!
//! ## Virtual filesystem facade
//! [`VirtualFs`] wraps a real directory tree, lazily populating its entry store from disk and
//! recording every mutation in a [`ChangeLog`]. [`VirtualFs::chdir`] and [`VirtualFs::filtered`]
//! return projections that share the same backing state as their parent.
//!
//! ## Merge engine
//! [`MergeEngine`] flattens several [`VirtualFs`] trees into one logical view, detecting
//! case-insensitive name collisions and file/directory type conflicts, and optimizing a directory
//! contributed by exactly one tree into a symlinked mount rather than a deep copy.
//!
//! ```
//! use patchfs::prelude::*;
//!
//! let mut ours = EntryStore::new();
//! ours.add_paths(&["a.js"], AddOpts::default()).unwrap();
//! let mut theirs = EntryStore::new();
//! theirs.add_paths(&["b.js"], AddOpts::default()).unwrap();
//!
//! let patch = calculate_patch(&ours, &theirs, None);
//! assert_eq!(patch.len(), 2);
//! ```
pub mod changelog;
pub mod delegate;
pub mod entry;
pub mod entry_eq;
pub mod error;
pub mod hash;
pub mod matcher;
pub mod merge;
pub mod patch;
pub mod path;
pub mod store;
pub mod symlink;
#[macro_use]
pub mod testing;
pub mod vfs;
pub mod walk;

pub use changelog::{ChangeLog, ChangeRecord};
pub use delegate::DiskDelegate;
pub use entry::{Entry, Projection, MODE_DIR, MODE_FILE, MODE_MASK, MODE_SYMLINK};
pub use error::*;
pub use hash::hash;
pub use matcher::{Filters, Matcher};
pub use merge::MergeEngine;
pub use patch::{apply_patch, calculate_and_apply_patch, calculate_patch, OpKind, Patch, PatchDelegate, PatchOp};
pub use path::{basename, clean, common_prefix, compare_by_relative_path, mash, validate_sorted_unique};
pub use store::{sort_and_expand, AddOpts, EntryStore, FindResult};
pub use vfs::VirtualFs;
pub use walk::{walk, walk_with_hashes};

/// Re-exports everything needed to use this crate, including the `assert_vfs_*!` test macros.
pub mod prelude
{
    pub use std::{
        path::{Path, PathBuf},
        sync::Arc,
    };

    pub use crate::{
        assert_vfs_exists, assert_vfs_mkdir_p, assert_vfs_no_exists, assert_vfs_read_eq, assert_vfs_setup,
        assert_vfs_write,
        changelog::{ChangeLog, ChangeRecord},
        delegate::DiskDelegate,
        entry::{Entry, Projection, MODE_DIR, MODE_FILE, MODE_MASK, MODE_SYMLINK},
        entry_eq,
        error::*,
        hash::hash,
        matcher::{Filters, Matcher},
        merge::MergeEngine,
        patch::{apply_patch, calculate_and_apply_patch, calculate_patch, OpKind, Patch, PatchDelegate, PatchOp},
        path::{basename, clean, common_prefix, compare_by_relative_path, mash, validate_sorted_unique},
        store::{sort_and_expand, AddOpts, EntryStore, FindResult},
        vfs::VirtualFs,
        walk::{walk, walk_with_hashes},
    };
}
