//! The patch engine: [`calculate_patch`] diffs two sorted [`crate::EntryStore`]s into an ordered
//! [`Patch`]; [`apply_patch`] replays a patch through a pluggable [`PatchDelegate`].
use std::path::{Path, PathBuf};

use crate::{
    entry::Entry,
    entry_eq,
    error::*,
    store::EntryStore,
};

/// The kind of mutation a single [`PatchOp`] represents
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum OpKind
{
    /// Create a new file
    Create,

    /// Create a new directory
    Mkdir,

    /// Create a new directory, along with any missing ancestors
    Mkdirp,

    /// Remove a file
    Unlink,

    /// Remove a directory
    Rmdir,

    /// Overwrite an existing file or replace an existing directory's metadata
    Change,
}

impl OpKind
{
    /// The lowercase operation name used in error messages and by [`PatchDelegate`] dispatch
    pub fn name(&self) -> &'static str
    {
        match self {
            OpKind::Create => "create",
            OpKind::Mkdir => "mkdir",
            OpKind::Mkdirp => "mkdirp",
            OpKind::Unlink => "unlink",
            OpKind::Rmdir => "rmdir",
            OpKind::Change => "change",
        }
    }
}

/// A single patch operation: what to do, where, and (when available) the entry driving it.
#[derive(Clone, Debug)]
pub struct PatchOp
{
    /// The mutation kind
    pub op: OpKind,

    /// The relative path the operation applies to
    pub path: PathBuf,

    /// Whether `path` names a directory (controls the trailing `/` in [`PatchOp::path_str`])
    pub is_dir: bool,

    /// The entry driving this operation: the right-hand entry for `create`/`mkdir`/`change`/
    /// `mkdirp`, the left-hand entry for `unlink`/`rmdir`. Absent on hand-constructed patches
    /// that only carry op + path.
    pub entry: Option<Entry>,
}

impl PatchOp
{
    fn new(op: OpKind, entry: &Entry) -> PatchOp
    {
        PatchOp { op, path: entry.relative_path.clone(), is_dir: entry.is_dir(), entry: Some(entry.clone()) }
    }

    /// Render this operation's path the way the external patch format does: a trailing `/` for
    /// directories.
    pub fn path_str(&self) -> String
    {
        let s = self.path.to_string_lossy().into_owned();
        if self.is_dir && !s.is_empty() {
            format!("{}/", s)
        } else {
            s
        }
    }
}

/// An ordered sequence of [`PatchOp`]s, safe to replay in order against a filesystem.
pub type Patch = Vec<PatchOp>;

/// Diff two sorted [`EntryStore`]s into an ordered [`Patch`] that transforms `ours` into `theirs`.
///
/// `is_equal` decides, for entries sharing a path, whether a `change` operation is needed; pass
/// `None` to use [`entry_eq::default`] (directories always equal; files equal iff `size`, `mtime`,
/// and `mode` all match).
///
/// ### Algorithm
/// A linear two-pointer merge over both sorted stores. Entries unique to `ours` become removals
/// (`unlink`/`rmdir`); entries unique to `theirs` become additions (`create`/`mkdir`). Entries at
/// the same path that differ emit a `change` when both are the same kind, or a removal+addition
/// pair when the kind (file vs. directory) differs.
///
/// Removals are emitted in **reverse** sorted order so that a directory's children are unlinked
/// before the directory itself is `rmdir`'d; additions are emitted in forward sorted order so a
/// `mkdir` precedes anything created inside it. This ordering is the engine's central correctness
/// invariant (`SPEC_FULL.md` section 4.2 / section 8 invariant 3).
///
/// ### Examples
/// ```
/// use patchfs::prelude::*;
///
/// let mut ours = EntryStore::new();
/// ours.add_paths(&["a.js"], AddOpts::default()).unwrap();
/// let mut theirs = EntryStore::new();
/// theirs.add_paths(&["b.js"], AddOpts::default()).unwrap();
///
/// let patch = calculate_patch(&ours, &theirs, None);
/// let ops: Vec<_> = patch.iter().map(|p| (p.op, p.path_str())).collect();
/// assert_eq!(ops, vec![(OpKind::Unlink, "a.js".to_string()), (OpKind::Create, "b.js".to_string())]);
/// ```
pub fn calculate_patch(ours: &EntryStore, theirs: &EntryStore, is_equal: Option<&entry_eq::EntryEq>) -> Patch
{
    let default_eq = entry_eq::default();
    let is_equal = is_equal.unwrap_or(default_eq.as_ref());

    let a = ours.as_slice();
    let b = theirs.as_slice();
    let (mut i, mut j) = (0usize, 0usize);
    let mut removals: Patch = Vec::new();
    let mut additions: Patch = Vec::new();

    while i < a.len() && j < b.len() {
        let (x, y) = (&a[i], &b[j]);
        match crate::path::compare_by_relative_path(&x.relative_path, &y.relative_path) {
            std::cmp::Ordering::Less => {
                removals.push(removal_op(x));
                i += 1;
            },
            std::cmp::Ordering::Greater => {
                additions.push(addition_op(y));
                j += 1;
            },
            std::cmp::Ordering::Equal => {
                if !is_equal(x, y) {
                    match (x.is_dir(), y.is_dir()) {
                        (true, true) => removals.push(PatchOp::new(OpKind::Change, y)),
                        (false, false) => additions.push(PatchOp::new(OpKind::Change, y)),
                        _ => {
                            removals.push(removal_op(x));
                            additions.push(addition_op(y));
                        },
                    }
                }
                i += 1;
                j += 1;
            },
        }
    }
    while i < a.len() {
        removals.push(removal_op(&a[i]));
        i += 1;
    }
    while j < b.len() {
        additions.push(addition_op(&b[j]));
        j += 1;
    }

    removals.reverse();
    removals.extend(additions);
    removals
}

fn removal_op(entry: &Entry) -> PatchOp
{
    PatchOp::new(if entry.is_dir() { OpKind::Rmdir } else { OpKind::Unlink }, entry)
}

fn addition_op(entry: &Entry) -> PatchOp
{
    PatchOp::new(if entry.is_dir() { OpKind::Mkdir } else { OpKind::Create }, entry)
}

/// The operations [`apply_patch`] dispatches to, one method per [`OpKind`] (minus `Change`, which
/// reuses `create`'s semantics by default since a prior `create` already linked the content on
/// symlink-capable platforms).
///
/// Each method receives the absolute input path, absolute output path, and the relative path the
/// operation applies to.
pub trait PatchDelegate
{
    /// Remove a file at `output`
    fn unlink(&self, input: &Path, output: &Path, relative: &Path) -> Result<()>;

    /// Remove a directory at `output`
    fn rmdir(&self, input: &Path, output: &Path, relative: &Path) -> Result<()>;

    /// Create a directory at `output`
    fn mkdir(&self, input: &Path, output: &Path, relative: &Path) -> Result<()>;

    /// Create a directory at `output`, along with any missing ancestors. Defaults to [`PatchDelegate::mkdir`].
    fn mkdirp(&self, input: &Path, output: &Path, relative: &Path) -> Result<()>
    {
        self.mkdir(input, output, relative)
    }

    /// Symlink-or-copy `input` to `output`
    fn create(&self, input: &Path, output: &Path, relative: &Path) -> Result<()>;

    /// Update an existing `output` to match `input`. Defaults to [`PatchDelegate::create`] (a
    /// no-op re-link on symlink-capable platforms since the prior `create` already linked the
    /// content; a real copy-on-write on platforms without symlink support).
    fn change(&self, input: &Path, output: &Path, relative: &Path) -> Result<()>
    {
        self.create(input, output, relative)
    }
}

/// Replay `patch` by dispatching each operation to `delegate`, resolving `path` against
/// `input_root`/`output_root` to get the absolute paths each [`PatchDelegate`] method expects.
///
/// ### Examples
/// ```
/// use patchfs::prelude::*;
/// use std::path::Path;
///
/// struct NullDelegate;
/// impl PatchDelegate for NullDelegate {
///     fn unlink(&self, _: &Path, _: &Path, _: &Path) -> Result<()> { Ok(()) }
///     fn rmdir(&self, _: &Path, _: &Path, _: &Path) -> Result<()> { Ok(()) }
///     fn mkdir(&self, _: &Path, _: &Path, _: &Path) -> Result<()> { Ok(()) }
///     fn create(&self, _: &Path, _: &Path, _: &Path) -> Result<()> { Ok(()) }
/// }
///
/// let patch = vec![PatchOp { op: OpKind::Mkdir, path: "a".into(), is_dir: true, entry: None }];
/// apply_patch(Path::new("/in"), Path::new("/out"), &patch, &NullDelegate).unwrap();
/// ```
pub fn apply_patch(input_root: &Path, output_root: &Path, patch: &Patch, delegate: &dyn PatchDelegate) -> Result<()>
{
    for patch_op in patch {
        let input = input_root.join(&patch_op.path);
        let output = output_root.join(&patch_op.path);
        match patch_op.op {
            OpKind::Unlink => delegate.unlink(&input, &output, &patch_op.path)?,
            OpKind::Rmdir => delegate.rmdir(&input, &output, &patch_op.path)?,
            OpKind::Mkdir => delegate.mkdir(&input, &output, &patch_op.path)?,
            OpKind::Mkdirp => delegate.mkdirp(&input, &output, &patch_op.path)?,
            OpKind::Create => delegate.create(&input, &output, &patch_op.path)?,
            OpKind::Change => delegate.change(&input, &output, &patch_op.path)?,
        }
    }
    Ok(())
}

/// Convenience: [`calculate_patch`] followed by [`apply_patch`].
pub fn calculate_and_apply_patch(
    ours: &EntryStore,
    theirs: &EntryStore,
    input_root: &Path,
    output_root: &Path,
    delegate: &dyn PatchDelegate,
) -> Result<Patch>
{
    let patch = calculate_patch(ours, theirs, None);
    apply_patch(input_root, output_root, &patch, delegate)?;
    Ok(patch)
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::{entry::MODE_FILE, store::AddOpts};

    fn store(paths: &[&str]) -> EntryStore
    {
        let mut s = EntryStore::new();
        let entries: Vec<Entry> = paths.iter().map(|p| Entry::from_path(*p)).collect();
        s.add(entries, AddOpts { sort_and_expand: true }).unwrap();
        s
    }

    fn ops(patch: &Patch) -> Vec<(OpKind, String)>
    {
        patch.iter().map(|p| (p.op, p.path_str())).collect()
    }

    #[test]
    fn s1_simple_rename()
    {
        let patch = calculate_patch(&store(&["a.js"]), &store(&["b.js"]), None);
        assert_eq!(ops(&patch), vec![(OpKind::Unlink, "a.js".into()), (OpKind::Create, "b.js".into())]);
    }

    #[test]
    fn s2_nested_reshape()
    {
        let ours = store(&["a.js", "b/", "b/f.js"]);
        let theirs = store(&["b.js", "b/", "b/c/", "b/c/d.js", "b/e.js"]);
        let patch = calculate_patch(&ours, &theirs, None);
        assert_eq!(
            ops(&patch),
            vec![
                (OpKind::Unlink, "a.js".into()),
                (OpKind::Unlink, "b/f.js".into()),
                (OpKind::Create, "b.js".into()),
                (OpKind::Mkdir, "b/c/".into()),
                (OpKind::Create, "b/c/d.js".into()),
                (OpKind::Create, "b/e.js".into()),
            ]
        );
    }

    #[test]
    fn s3_remove_entire_deep_tree()
    {
        let ours = store(&["bar/", "bar/quz/", "bar/quz/baz.js", "foo.js"]);
        let theirs = EntryStore::new();
        let patch = calculate_patch(&ours, &theirs, None);
        assert_eq!(
            ops(&patch),
            vec![
                (OpKind::Unlink, "foo.js".into()),
                (OpKind::Unlink, "bar/quz/baz.js".into()),
                (OpKind::Rmdir, "bar/quz/".into()),
                (OpKind::Rmdir, "bar/".into()),
            ]
        );
    }

    #[test]
    fn s4_folder_to_file_transition()
    {
        let ours = store(&["subdir1/", "subdir1/foo"]);
        let theirs = store(&["subdir1"]);
        let patch = calculate_patch(&ours, &theirs, None);
        assert_eq!(
            ops(&patch),
            vec![
                (OpKind::Unlink, "subdir1/foo".into()),
                (OpKind::Rmdir, "subdir1/".into()),
                (OpKind::Create, "subdir1".into()),
            ]
        );
    }

    #[test]
    fn invariant_diff_against_self_is_empty()
    {
        let tree = store(&["a.js", "b/", "b/c.js"]);
        assert!(calculate_patch(&tree, &tree, None).is_empty());
    }

    #[test]
    fn invariant_rmdir_follows_its_children()
    {
        let ours = store(&["d/", "d/e/", "d/e/f.js"]);
        let theirs = EntryStore::new();
        let patch = calculate_patch(&ours, &theirs, None);
        let rmdir_d = patch.iter().position(|p| p.op == OpKind::Rmdir && p.path == PathBuf::from("d")).unwrap();
        let rmdir_e = patch.iter().position(|p| p.op == OpKind::Rmdir && p.path == PathBuf::from("d/e")).unwrap();
        let unlink_f = patch.iter().position(|p| p.op == OpKind::Unlink && p.path == PathBuf::from("d/e/f.js")).unwrap();
        assert!(unlink_f < rmdir_e);
        assert!(rmdir_e < rmdir_d);
    }

    #[test]
    fn change_emitted_for_modified_file()
    {
        let mut ours = EntryStore::new();
        ours.add(vec![Entry::new("a", 1, 1, MODE_FILE)], AddOpts::default()).unwrap();
        let mut theirs = EntryStore::new();
        theirs.add(vec![Entry::new("a", 2, 2, MODE_FILE)], AddOpts::default()).unwrap();

        let patch = calculate_patch(&ours, &theirs, None);
        assert_eq!(ops(&patch), vec![(OpKind::Change, "a".into())]);
    }
}
