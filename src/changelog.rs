//! [`ChangeLog`]: an ordered, path-deduplicated record of mutations applied through a
//! [`crate::VirtualFs`] since its last `start()`.
use std::{collections::HashMap, path::PathBuf};

use crate::{entry::Entry, patch::OpKind};

/// One recorded mutation: the operation applied, the path it applied to, and (for everything but
/// a removal of a no-longer-existing entry) the resulting entry.
#[derive(Clone, Debug)]
pub struct ChangeRecord
{
    /// The operation that produced this record
    pub op: OpKind,

    /// The path the operation applied to
    pub path: PathBuf,

    /// The entry as it exists after the operation, when applicable
    pub entry: Option<Entry>,
}

/// An ordered sequence of [`ChangeRecord`]s with at most one record per path: a new record for an
/// already-recorded path replaces the old one *in place*, preserving its original chronological
/// position, so callers observe "the current net effect at each path" in insertion order rather
/// than a full event history.
#[derive(Clone, Debug, Default)]
pub struct ChangeLog
{
    records: Vec<ChangeRecord>,
    index: HashMap<PathBuf, usize>,
}

impl ChangeLog
{
    /// Construct an empty change log
    pub fn new() -> ChangeLog
    {
        ChangeLog { records: Vec::new(), index: HashMap::new() }
    }

    /// Record an operation against `path`. If `path` already has a record, it is overwritten in
    /// place; otherwise a new record is appended.
    ///
    /// ### Examples
    /// ```
    /// use patchfs::prelude::*;
    ///
    /// let mut log = ChangeLog::new();
    /// log.record(OpKind::Create, "a", Some(Entry::new("a", 1, 0, MODE_FILE)));
    /// log.record(OpKind::Unlink, "a", None);
    /// assert_eq!(log.changes().len(), 1);
    /// assert_eq!(log.changes()[0].op, OpKind::Unlink);
    /// ```
    pub fn record<T: Into<PathBuf>>(&mut self, op: OpKind, path: T, entry: Option<Entry>)
    {
        let path = path.into();
        match self.index.get(&path) {
            Some(&i) => self.records[i] = ChangeRecord { op, path, entry },
            None => {
                self.index.insert(path.clone(), self.records.len());
                self.records.push(ChangeRecord { op, path, entry });
            },
        }
    }

    /// The live, ordered, deduplicated list of changes
    pub fn changes(&self) -> &[ChangeRecord]
    {
        &self.records
    }

    /// Truncate the log, clearing all recorded changes
    pub fn start(&mut self)
    {
        self.records.clear();
        self.index.clear();
    }

    /// Number of distinct paths with a recorded change
    pub fn len(&self) -> usize
    {
        self.records.len()
    }

    /// True when no changes are recorded
    pub fn is_empty(&self) -> bool
    {
        self.records.is_empty()
    }
}
