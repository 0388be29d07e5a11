use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Outcome counters for one run.
///
/// Every field is written only by the run's background thread and only ever
/// increases for the duration of a run, so readers on other threads take a
/// [`snapshot`](Self::snapshot) at any time and tolerate momentarily stale
/// values. Counters reset to zero when a new run starts.
#[derive(Debug, Default)]
pub struct RunCounters {
    pub(crate) folders_traversed: AtomicU64,
    pub(crate) files_searched: AtomicU64,
    pub(crate) replacements_performed: AtomicU64,
    pub(crate) searches_skipped: AtomicU64,
    pub(crate) files_skipped: AtomicU64,
    pub(crate) files_copied: AtomicU64,
    pub(crate) file_copies_failed: AtomicU64,
    pub(crate) file_reads_failed: AtomicU64,
    pub(crate) file_writes_failed: AtomicU64,
}

impl RunCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reset(&self) {
        self.folders_traversed.store(0, Ordering::Relaxed);
        self.files_searched.store(0, Ordering::Relaxed);
        self.replacements_performed.store(0, Ordering::Relaxed);
        self.searches_skipped.store(0, Ordering::Relaxed);
        self.files_skipped.store(0, Ordering::Relaxed);
        self.files_copied.store(0, Ordering::Relaxed);
        self.file_copies_failed.store(0, Ordering::Relaxed);
        self.file_reads_failed.store(0, Ordering::Relaxed);
        self.file_writes_failed.store(0, Ordering::Relaxed);
    }

    /// A point-in-time copy of every counter.
    pub fn snapshot(&self) -> CountersSnapshot {
        CountersSnapshot {
            folders_traversed: self.folders_traversed.load(Ordering::Relaxed),
            files_searched: self.files_searched.load(Ordering::Relaxed),
            replacements_performed: self.replacements_performed.load(Ordering::Relaxed),
            searches_skipped: self.searches_skipped.load(Ordering::Relaxed),
            files_skipped: self.files_skipped.load(Ordering::Relaxed),
            files_copied: self.files_copied.load(Ordering::Relaxed),
            file_copies_failed: self.file_copies_failed.load(Ordering::Relaxed),
            file_reads_failed: self.file_reads_failed.load(Ordering::Relaxed),
            file_writes_failed: self.file_writes_failed.load(Ordering::Relaxed),
        }
    }
}

/// A plain copy of [`RunCounters`], safe to hold, compare, and serialize.
///
/// `Display` renders the human-readable summary block the worker also writes
/// to the report sink when a run finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CountersSnapshot {
    pub folders_traversed: u64,
    pub files_searched: u64,
    pub replacements_performed: u64,
    pub searches_skipped: u64,
    pub files_skipped: u64,
    pub files_copied: u64,
    pub file_copies_failed: u64,
    pub file_reads_failed: u64,
    pub file_writes_failed: u64,
}

impl fmt::Display for CountersSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Folders Traversed: {}", self.folders_traversed)?;
        writeln!(f, "Files Searched: {}", self.files_searched)?;
        writeln!(f, "Search Replacements Performed: {}", self.replacements_performed)?;
        writeln!(f, "Searches Skipped: {}", self.searches_skipped)?;
        writeln!(f, "Files Skipped: {}", self.files_skipped)?;
        writeln!(f, "Files Copied: {}", self.files_copied)?;
        writeln!(f, "File Copies Failed: {}", self.file_copies_failed)?;
        writeln!(f, "File Reads Failed: {}", self.file_reads_failed)?;
        write!(f, "File Writes Failed: {}", self.file_writes_failed)
    }
}
