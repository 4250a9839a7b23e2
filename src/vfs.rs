//! [`VirtualFs`]: a facade over a real directory tree that lazily populates an [`EntryStore`],
//! tracks mutations in a [`ChangeLog`], and supports filtered/chdir'd child projections that share
//! the same backing state.
use std::{
    path::{Component, Path, PathBuf},
    sync::{Arc, Mutex},
};

use tracing::{debug, trace_span};

use crate::{
    changelog::ChangeLog,
    entry::{self, Entry, Projection},
    entry_eq,
    error::*,
    matcher::Filters,
    patch::{calculate_patch, OpKind, Patch, PatchOp},
    store::{AddOpts, EntryStore},
    symlink, walk,
};

/// Whether a [`VirtualFs`] accepts mutations
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State
{
    Started,
    Stopped,
}

/// The state shared by a root [`VirtualFs`] and every projection descended from it.
struct VirtualFsInner
{
    root: PathBuf,
    entries: EntryStore,
    populated: bool,
    changelog: ChangeLog,
    state: State,
    prev_entries: Option<EntryStore>,
}

/// A facade over a directory tree rooted at an absolute path.
///
/// The root handle owns the backing [`EntryStore`]/[`ChangeLog`]; [`VirtualFs::chdir`] and
/// [`VirtualFs::filtered`] return *projections* that share the same inner state through an
/// `Arc<Mutex<_>>`, generalizing the source system's parent back-reference chain into owned shared
/// state, per `SPEC_FULL.md` sections 3/4.4.
///
/// A tree's `src_tree` flag distinguishes a disk-backed root (built via [`VirtualFs::new`], whose
/// contents are authoritative on disk and which therefore starts `STOPPED` until [`VirtualFs::start`]
/// is called) from a synthetic tree (built via [`VirtualFs::from_entries`]/[`VirtualFs::from_paths`]/
/// [`VirtualFs::from_parent`], which starts `STARTED` and accepts no disk re-rooting).
pub struct VirtualFs
{
    inner: Arc<Mutex<VirtualFsInner>>,
    filters: Filters,
    is_root: bool,
    src_tree: bool,
}

impl std::fmt::Debug for VirtualFs
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        f.debug_struct("VirtualFs")
            .field("is_root", &self.is_root)
            .field("src_tree", &self.src_tree)
            .field("cwd", &self.filters.cwd)
            .finish()
    }
}

impl VirtualFs
{
    /// Open a root [`VirtualFs`] at `root`, which must be a non-empty absolute path. This is a
    /// source tree: its contents are authoritative on disk, so it starts `STOPPED` until
    /// [`VirtualFs::start`] is called.
    pub fn new<T: AsRef<Path>>(root: T) -> Result<VirtualFs>
    {
        let root = root.as_ref();
        if root.as_os_str().is_empty() {
            return Err(PathError::Empty.into());
        }
        if !root.is_absolute() {
            return Err(VfsError::NonAbsoluteRoot(root.to_path_buf()).into());
        }
        let inner = VirtualFsInner {
            root: root.to_path_buf(),
            entries: EntryStore::new(),
            populated: false,
            changelog: ChangeLog::new(),
            state: State::Stopped,
            prev_entries: None,
        };
        Ok(Self::from_inner(inner, true))
    }

    /// `fromEntries`: a synthetic, non-source tree built directly from already-known entries. Starts
    /// `STARTED` and fully populated; has no backing disk root.
    pub fn from_entries(entries: EntryStore) -> VirtualFs
    {
        let inner = VirtualFsInner {
            root: PathBuf::new(),
            entries,
            populated: true,
            changelog: ChangeLog::new(),
            state: State::Started,
            prev_entries: None,
        };
        Self::from_inner(inner, false)
    }

    /// `fromPaths`: a synthetic, non-source tree built from bare path strings (a trailing `/` marks
    /// a directory), expanding implied ancestor directories as it goes.
    pub fn from_paths<T: AsRef<str>>(paths: &[T]) -> Result<VirtualFs>
    {
        let mut store = EntryStore::new();
        store.add_paths(paths, AddOpts { sort_and_expand: true })?;
        Ok(Self::from_entries(store))
    }

    /// `fromParent`: a synthetic, non-source snapshot of `parent`'s current entries, decoupled from
    /// the parent's further mutations (unlike [`VirtualFs::chdir`]/[`VirtualFs::filtered`], which
    /// share live state with their parent).
    pub fn from_parent(parent: &VirtualFs) -> Result<VirtualFs>
    {
        parent.ensure_populated()?;
        let guard = parent.inner.lock().unwrap();
        Ok(Self::from_entries(guard.entries.clone()))
    }

    fn from_inner(inner: VirtualFsInner, src_tree: bool) -> VirtualFs
    {
        VirtualFs { inner: Arc::new(Mutex::new(inner)), filters: Filters::default(), is_root: true, src_tree }
    }

    fn clone_handle(&self, filters: Filters) -> VirtualFs
    {
        VirtualFs { inner: Arc::clone(&self.inner), filters, is_root: false, src_tree: self.src_tree }
    }

    /// This node's effective current working directory, relative to `root`
    pub fn cwd(&self) -> PathBuf
    {
        self.filters.cwd.clone().unwrap_or_default()
    }

    /// The root directory backing this handle (and every projection sharing its state)
    pub fn root(&self) -> PathBuf
    {
        self.inner.lock().unwrap().root.clone()
    }

    fn ensure_populated(&self) -> Result<()>
    {
        let mut guard = self.inner.lock().unwrap();
        if guard.populated {
            return Ok(());
        }
        let root = guard.root.clone();
        let entries = if root.is_dir() { walk::walk(&root)? } else { Vec::new() };
        guard.entries = EntryStore::from_sorted(entries)?;
        guard.populated = true;
        Ok(())
    }

    fn resolve(&self, path: &Path) -> Result<PathBuf>
    {
        let joined = crate::path::mash(&self.cwd(), path);
        let cleaned = crate::path::clean(joined);
        if cleaned.components().any(|c| matches!(c, Component::ParentDir)) {
            return Err(VfsError::PathEscape { path: path.to_path_buf(), cwd: self.cwd(), root: self.root() }.into());
        }
        // `clean` renders an empty result as "." (conventional lexical-cleaning behavior); the
        // entry store keys top-level entries by an empty parent, so normalize back here.
        Ok(if cleaned == Path::new(".") { PathBuf::new() } else { cleaned })
    }

    /// Look up an entry by a path relative to this node's `cwd`, following symlinked mount
    /// projections when `walk_symlinks` is set.
    pub fn find_entry<T: AsRef<Path>>(&self, path: T, walk_symlinks: bool) -> Result<Option<Entry>>
    {
        self.ensure_populated()?;
        let relative = self.resolve(path.as_ref())?;
        let guard = self.inner.lock().unwrap();
        let found = guard.entries.find_by_relative_path(&relative).entry.cloned();
        drop(guard);

        match found {
            Some(entry) if walk_symlinks && entry.is_projection() => self.follow_projection(&entry, &relative),
            other => Ok(other),
        }
    }

    fn follow_projection(&self, entry: &Entry, relative: &Path) -> Result<Option<Entry>>
    {
        match &entry.projection {
            Some(Projection::Root(tree)) => tree.find_entry("", true),
            Some(Projection::Mount(tree, mount_path)) => {
                let remainder = relative.strip_prefix(&entry.relative_path).unwrap_or(Path::new(""));
                tree.find_entry(mount_path.join(remainder), true)
            },
            None => Ok(Some(entry.clone())),
        }
    }

    /// `stat(path)`: look up the entry at `path`, if any
    pub fn stat<T: AsRef<Path>>(&self, path: T) -> Result<Option<Entry>>
    {
        self.find_entry(path, true)
    }

    /// `exists(path)`: does an entry exist at `path`?
    pub fn exists<T: AsRef<Path>>(&self, path: T) -> Result<bool>
    {
        Ok(self.stat(path)?.is_some())
    }

    /// Immediate children of the directory at `path`, expanding a whole-tree mount projection's
    /// top level in place of its mount point.
    pub fn readdir<T: AsRef<Path>>(&self, path: T) -> Result<Vec<PathBuf>>
    {
        let path = path.as_ref();
        let relative = self.resolve(path)?;

        if !relative.as_os_str().is_empty() {
            let entry = self.find_entry(path, false)?.ok_or_else(|| VfsError::NotFound(path.to_path_buf()))?;
            if !entry.is_dir() {
                return Err(VfsError::NotDirectory(path.to_path_buf()).into());
            }
            if let Some(Projection::Root(tree)) = &entry.projection {
                return tree.readdir("");
            }
        }

        self.ensure_populated()?;
        let guard = self.inner.lock().unwrap();
        let mut names: Vec<PathBuf> = guard
            .entries
            .iter()
            .filter(|e| e.relative_path.parent() == Some(relative.as_path()) && self.filters.is_visible(&e.relative_path))
            .map(|e| e.relative_path.clone())
            .collect();
        names.sort();
        Ok(names)
    }

    fn require_started(&self) -> Result<()>
    {
        let guard = self.inner.lock().unwrap();
        if guard.state == State::Stopped {
            return Err(VfsError::WriteOnStopped("vfs is stopped".into()).into());
        }
        Ok(())
    }

    /// `writeFileSync`: write `content`, creating or updating the entry and [`ChangeLog`]
    pub fn write<T: AsRef<Path>>(&self, path: T, content: &[u8]) -> Result<()>
    {
        let _span = trace_span!("write", path = %path.as_ref().display()).entered();
        self.require_started()?;
        self.ensure_populated()?;
        let relative = self.resolve(path.as_ref())?;
        let checksum = crate::hash::hash(content);
        let absolute = self.root().join(&relative);

        let mut guard = self.inner.lock().unwrap();
        let existed = guard.entries.find_by_relative_path(&relative).found;
        if let Some(existing) = guard.entries.find_by_relative_path(&relative).entry {
            if existing.checksum.as_deref() == Some(checksum.as_str()) {
                debug!(path = %relative.display(), "write: content unchanged, skipping");
                return Ok(());
            }
        }
        drop(guard);

        if let Some(parent) = absolute.parent() {
            symlink::mkdirp(parent)?;
        }
        std::fs::write(&absolute, content)?;

        let mut entry = Entry::new(&relative, content.len() as u64, entry::now_ms(), entry::MODE_FILE | 0o644);
        entry.checksum = Some(checksum);

        let mut guard = self.inner.lock().unwrap();
        guard.entries.insert(entry.clone());
        let op = if existed { OpKind::Change } else { OpKind::Create };
        guard.changelog.record(op, relative, Some(entry));
        Ok(())
    }

    /// `readFileSync`: read file content at `path`, populating entries lazily
    pub fn read<T: AsRef<Path>>(&self, path: T) -> Result<Vec<u8>>
    {
        let relative = self.resolve(path.as_ref())?;
        let absolute = self.root().join(&relative);
        std::fs::read(&absolute).map_err(|_| VfsError::NotFound(relative).into())
    }

    /// `unlinkSync`: remove the file at `path`. Tolerant of a missing entry.
    pub fn unlink<T: AsRef<Path>>(&self, path: T) -> Result<()>
    {
        let _span = trace_span!("unlink", path = %path.as_ref().display()).entered();
        self.require_started()?;
        self.ensure_populated()?;
        let relative = self.resolve(path.as_ref())?;
        let absolute = self.root().join(&relative);

        let mut guard = self.inner.lock().unwrap();
        if guard.entries.remove(&relative).is_none() {
            debug!(path = %relative.display(), "unlink: entry already absent");
            return Ok(());
        }
        guard.changelog.record(OpKind::Unlink, relative.clone(), None);
        drop(guard);

        if absolute.exists() {
            std::fs::remove_file(&absolute)?;
        }
        Ok(())
    }

    /// `rmdirSync`: remove the directory at `path`. Tolerant of a missing entry.
    pub fn rmdir<T: AsRef<Path>>(&self, path: T) -> Result<()>
    {
        let _span = trace_span!("rmdir", path = %path.as_ref().display()).entered();
        self.require_started()?;
        self.ensure_populated()?;
        let relative = self.resolve(path.as_ref())?;
        let absolute = self.root().join(&relative);

        let mut guard = self.inner.lock().unwrap();
        if guard.entries.remove(&relative).is_none() {
            debug!(path = %relative.display(), "rmdir: entry already absent");
            return Ok(());
        }
        guard.changelog.record(OpKind::Rmdir, relative.clone(), None);
        drop(guard);

        if absolute.exists() {
            std::fs::remove_dir(&absolute)?;
        }
        Ok(())
    }

    /// `mkdirSync`: create the directory at `path`. A no-op (with a debug log) if it already
    /// exists.
    pub fn mkdir<T: AsRef<Path>>(&self, path: T) -> Result<()>
    {
        let _span = trace_span!("mkdir", path = %path.as_ref().display()).entered();
        self.require_started()?;
        self.ensure_populated()?;
        let relative = self.resolve(path.as_ref())?;
        let absolute = self.root().join(&relative);

        if self.exists(&relative)? {
            debug!(path = %relative.display(), "mkdir: directory already exists");
            return Ok(());
        }

        std::fs::create_dir(&absolute)?;
        let entry = Entry::dir(&relative);
        let mut guard = self.inner.lock().unwrap();
        guard.entries.insert(entry.clone());
        guard.changelog.record(OpKind::Mkdir, relative, Some(entry));
        Ok(())
    }

    /// `mkdirpSync`: create `path` and any missing ancestors
    pub fn mkdirp<T: AsRef<Path>>(&self, path: T) -> Result<()>
    {
        let relative = self.resolve(path.as_ref())?;
        let mut built = PathBuf::new();
        for component in relative.components() {
            built.push(component);
            if !self.exists(&built)? {
                self.mkdir(&built)?;
            }
        }
        Ok(())
    }

    /// `symlinkSync`: create a symlink (or copy, on platforms without symlink support) at `path`
    /// pointing at `target`
    pub fn symlink<T: AsRef<Path>, U: AsRef<Path>>(&self, target: T, path: U) -> Result<()>
    {
        let _span = trace_span!("symlink", path = %path.as_ref().display()).entered();
        self.require_started()?;
        self.ensure_populated()?;
        let relative = self.resolve(path.as_ref())?;
        if self.exists(&relative)? {
            debug!(path = %relative.display(), "symlink: entry already exists");
            return Ok(());
        }

        let absolute = self.root().join(&relative);
        symlink::link_or_copy(target.as_ref(), &absolute)?;

        let entry = Entry::symlink(&relative, target.as_ref());
        let mut guard = self.inner.lock().unwrap();
        guard.entries.insert(entry.clone());
        guard.changelog.record(OpKind::Create, relative, Some(entry));
        Ok(())
    }

    /// `symlinkSyncFromEntry`: mount another tree's subtree at `dest_path` as a projection
    pub fn symlink_from_entry<T: AsRef<Path>>(&self, src_tree: &Arc<VirtualFs>, src_path: Option<T>, dest_path: T) -> Result<()>
    {
        let dest = self.resolve(dest_path.as_ref())?;
        self.require_started()?;

        if let Some(parent) = dest.parent() {
            if !parent.as_os_str().is_empty() {
                self.mkdirp(parent)?;
            }
        }

        let mut entry = Entry::dir(&dest);
        entry.projection = Some(match src_path {
            Some(p) => Projection::Mount(Arc::clone(src_tree), p.as_ref().to_path_buf()),
            None => Projection::Root(Arc::clone(src_tree)),
        });

        let mut guard = self.inner.lock().unwrap();
        guard.entries.insert(entry.clone());
        guard.changelog.record(OpKind::Mkdir, dest, Some(entry));
        Ok(())
    }

    /// `chdir`: a projection rooted at `self`'s cwd joined with `path`
    pub fn chdir<T: AsRef<Path>>(&self, path: T, allow_empty: bool) -> Result<VirtualFs>
    {
        let relative = self.resolve(path.as_ref())?;
        if !allow_empty {
            match self.find_entry(&relative, false)? {
                Some(entry) if !entry.is_dir() => return Err(VfsError::NotDirectory(relative).into()),
                None => return Err(VfsError::NotFound(relative).into()),
                _ => {},
            }
        }
        let mut filters = self.filters.clone();
        filters.cwd = Some(relative);
        Ok(self.clone_handle(filters))
    }

    /// `filtered`: a projection with an additional include/exclude/files overlay
    pub fn filtered(&self, filters: Filters) -> VirtualFs
    {
        let mut merged = self.filters.clone();
        if filters.cwd.is_some() {
            merged.cwd = filters.cwd;
        }
        merged.include.extend(filters.include);
        merged.exclude.extend(filters.exclude);
        merged.files.extend(filters.files);
        self.clone_handle(merged)
    }

    /// `addEntries`: bulk-load entries into the backing store
    pub fn add_entries(&self, entries: Vec<Entry>, opts: AddOpts) -> Result<()>
    {
        self.ensure_populated()?;
        let mut guard = self.inner.lock().unwrap();
        guard.entries.add(entries, opts)
    }

    /// `start`: clear the change log and begin accepting mutations
    pub fn start(&self)
    {
        let mut guard = self.inner.lock().unwrap();
        guard.changelog.start();
        guard.state = State::Started;
    }

    /// `stop`: reject further mutations until [`VirtualFs::start`] is called again
    pub fn stop(&self)
    {
        self.inner.lock().unwrap().state = State::Stopped;
    }

    /// `reread`: invalidate cached entries (and optionally re-root) so the next access re-walks
    /// disk. Only meaningful on the root handle of a source tree; changing the root of a
    /// non-source (synthetic) tree is rejected with [`VfsError::NonSourceRootChange`], and a
    /// projection's call (with no new root) is a no-op.
    pub fn reread<T: AsRef<Path>>(&self, new_root: Option<T>) -> Result<()>
    {
        if !self.is_root || !self.src_tree {
            if new_root.is_some() {
                return Err(VfsError::NonSourceRootChange.into());
            }
            return Ok(());
        }
        let mut guard = self.inner.lock().unwrap();
        if let Some(new_root) = new_root {
            let new_root = new_root.as_ref();
            if !new_root.is_absolute() {
                return Err(VfsError::NonAbsoluteRoot(new_root.to_path_buf()).into());
            }
            guard.root = new_root.to_path_buf();
        }
        guard.populated = false;
        Ok(())
    }

    /// `changes`: diff the current filtered entries against the last captured snapshot (root
    /// handle) or project the live change log through this node's filters/cwd (projection).
    pub fn changes(&self) -> Result<Patch>
    {
        self.changes_with(None)
    }

    /// Like [`VirtualFs::changes`], but with a caller-supplied equality predicate in place of
    /// [`entry_eq::default`]. Exposed crate-internally so [`crate::MergeEngine`] can reuse this
    /// root-diffing machinery with [`entry_eq::merge`] instead of hand-rolling its own diff.
    pub(crate) fn changes_with(&self, is_equal: Option<&entry_eq::EntryEq>) -> Result<Patch>
    {
        self.ensure_populated()?;
        if self.is_root {
            return self.changes_as_root(is_equal);
        }
        self.changes_as_projection()
    }

    /// Replace this tree's entries wholesale (as opposed to [`VirtualFs::add_entries`], which
    /// merges). Exposed crate-internally for [`crate::MergeEngine`] to refresh its synthetic
    /// result tree between merges.
    pub(crate) fn replace_entries(&self, entries: EntryStore)
    {
        let mut guard = self.inner.lock().unwrap();
        guard.entries = entries;
        guard.populated = true;
    }

    fn changes_as_root(&self, is_equal: Option<&entry_eq::EntryEq>) -> Result<Patch>
    {
        let mut guard = self.inner.lock().unwrap();
        let current = guard.entries.clone();
        let baseline = guard.prev_entries.clone().unwrap_or_default();
        let patch = calculate_patch(&baseline, &current, is_equal);
        guard.prev_entries = Some(current);
        Ok(patch)
    }

    fn changes_as_projection(&self) -> Result<Patch>
    {
        let guard = self.inner.lock().unwrap();
        let cwd = self.cwd();
        let ops = guard
            .changelog
            .changes()
            .iter()
            .filter(|record| record.path.starts_with(&cwd) || cwd.as_os_str().is_empty())
            .filter(|record| self.filters.is_visible(&record.path))
            .map(|record| {
                let relative = record.path.strip_prefix(&cwd).unwrap_or(&record.path).to_path_buf();
                let is_dir = record.entry.as_ref().map(|e| e.is_dir()).unwrap_or(false);
                let op = if record.op == OpKind::Mkdir && record.entry.as_ref().map(|e| e.is_projection()).unwrap_or(false) {
                    OpKind::Mkdirp
                } else {
                    record.op
                };
                PatchOp { op, path: relative, is_dir, entry: record.entry.clone() }
            })
            .collect();
        Ok(ops)
    }
}

impl Clone for VirtualFs
{
    fn clone(&self) -> VirtualFs
    {
        VirtualFs {
            inner: Arc::clone(&self.inner),
            filters: self.filters.clone(),
            is_root: self.is_root,
            src_tree: self.src_tree,
        }
    }
}

#[cfg(test)]
mod tests
{
    use tempfile::tempdir;
    use tracing_test::traced_test;

    use super::*;

    #[traced_test]
    #[test]
    fn test_unchanged_write_logs_debug_not_trace()
    {
        let dir = tempdir().unwrap();
        let vfs = VirtualFs::new(dir.path()).unwrap();
        vfs.start();
        vfs.write("a.txt", b"hello").unwrap();
        vfs.write("a.txt", b"hello").unwrap();
        assert!(logs_contain("content unchanged"));
    }

    #[test]
    fn test_write_then_read()
    {
        let dir = tempdir().unwrap();
        let vfs = VirtualFs::new(dir.path()).unwrap();
        vfs.start();
        vfs.write("a.txt", b"hello").unwrap();
        assert_eq!(vfs.read("a.txt").unwrap(), b"hello");
        assert!(vfs.exists("a.txt").unwrap());
    }

    #[test]
    fn test_write_records_create_then_change()
    {
        let dir = tempdir().unwrap();
        let vfs = VirtualFs::new(dir.path()).unwrap();
        vfs.start();
        vfs.write("a.txt", b"v1").unwrap();
        vfs.write("a.txt", b"v2").unwrap();
        let changes = vfs.changes().unwrap();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].op, OpKind::Create);
    }

    #[test]
    fn test_new_source_tree_starts_stopped()
    {
        let dir = tempdir().unwrap();
        let vfs = VirtualFs::new(dir.path()).unwrap();
        let err = vfs.write("a.txt", b"x").unwrap_err();
        assert!(err.is::<VfsError>());
    }

    #[test]
    fn test_stopped_vfs_rejects_writes()
    {
        let dir = tempdir().unwrap();
        let vfs = VirtualFs::new(dir.path()).unwrap();
        vfs.start();
        vfs.stop();
        let err = vfs.write("a.txt", b"x").unwrap_err();
        assert!(err.is::<VfsError>());
    }

    #[test]
    fn test_mkdirp_creates_ancestors()
    {
        let dir = tempdir().unwrap();
        let vfs = VirtualFs::new(dir.path()).unwrap();
        vfs.start();
        vfs.mkdirp("a/b/c").unwrap();
        assert!(vfs.exists("a/b/c").unwrap());
        assert!(dir.path().join("a/b/c").is_dir());
    }

    #[test]
    fn test_chdir_scopes_resolution()
    {
        let dir = tempdir().unwrap();
        let vfs = VirtualFs::new(dir.path()).unwrap();
        vfs.start();
        vfs.mkdirp("sub").unwrap();
        let child = vfs.chdir("sub", false).unwrap();
        child.write("a.txt", b"hi").unwrap();
        assert!(dir.path().join("sub/a.txt").exists());
    }

    #[test]
    fn test_path_escape_rejected()
    {
        let dir = tempdir().unwrap();
        let vfs = VirtualFs::new(dir.path()).unwrap();
        vfs.start();
        let err = vfs.write("../escape.txt", b"x").unwrap_err();
        assert!(err.is::<VfsError>());
    }

    #[test]
    fn test_readdir_lists_immediate_children()
    {
        let dir = tempdir().unwrap();
        let vfs = VirtualFs::new(dir.path()).unwrap();
        vfs.start();
        vfs.mkdir("a").unwrap();
        vfs.write("a/f.txt", b"x").unwrap();
        vfs.write("b.txt", b"y").unwrap();

        let names = vfs.readdir("").unwrap();
        assert_eq!(names, vec![PathBuf::from("a"), PathBuf::from("b.txt")]);
    }

    #[test]
    fn test_from_entries_is_non_source_and_starts_started()
    {
        let mut store = EntryStore::new();
        store.add(vec![Entry::dir("a")], AddOpts::default()).unwrap();
        let vfs = VirtualFs::from_entries(store);
        // `mkdir` on an already-present directory entry is a no-op that never touches disk, so
        // this only succeeds if the `require_started` state gate already passed.
        vfs.mkdir("a").unwrap();
    }

    #[test]
    fn test_from_paths_expands_ancestors()
    {
        let vfs = VirtualFs::from_paths(&["a/b/c.js"]).unwrap();
        assert!(vfs.exists("a/b").unwrap());
        assert!(vfs.exists("a/b/c.js").unwrap());
    }

    #[test]
    fn test_from_parent_is_a_decoupled_snapshot()
    {
        let dir = tempdir().unwrap();
        let parent = VirtualFs::new(dir.path()).unwrap();
        parent.start();
        parent.write("a.txt", b"hi").unwrap();

        let snapshot = VirtualFs::from_parent(&parent).unwrap();
        parent.write("b.txt", b"new").unwrap();

        assert!(snapshot.exists("a.txt").unwrap());
        assert!(!snapshot.exists("b.txt").unwrap());
    }

    #[test]
    fn test_reread_with_new_root_rejected_on_non_source_tree()
    {
        let vfs = VirtualFs::from_paths(&["a"]).unwrap();
        let other = tempdir().unwrap();
        let err = vfs.reread(Some(other.path())).unwrap_err();
        assert!(err.is::<VfsError>());
    }

    #[test]
    fn test_reread_changes_source_root()
    {
        let dir = tempdir().unwrap();
        let vfs = VirtualFs::new(dir.path()).unwrap();
        vfs.start();
        vfs.write("a.txt", b"hi").unwrap();

        let other = tempdir().unwrap();
        std::fs::write(other.path().join("b.txt"), "hey").unwrap();
        vfs.reread(Some(other.path())).unwrap();

        assert!(!vfs.exists("a.txt").unwrap());
        assert!(vfs.exists("b.txt").unwrap());
    }
}
