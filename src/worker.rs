use crate::config::RunConfig;
use crate::control::ControlFlags;
use crate::counters::{CountersSnapshot, RunCounters};
use crate::errors::{Error, Result};
use crate::sink::LogSink;
use crate::transfer::FileTransfer;
use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// File-name suffixes treated as searchable text when the text-only filter
/// is enabled. Matching is a case-insensitive suffix check against the whole
/// file name, so dot-files such as `.classpath` themselves qualify.
pub const TEXT_FILE_SUFFIXES: &[&str] = &[
    ".txt",
    ".rtf",
    ".log",
    ".properties",
    ".classpath",
    ".project",
    ".java",
    ".html",
    ".css",
    ".csv",
    ".xml",
    ".php",
    ".c",
    ".h",
    ".cmd",
    ".bat",
    ".com",
];

/// Lifecycle of a [`SearchWorker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// No run has started, or the last one has been reaped by `stop`.
    Idle,
    /// The background thread is processing files.
    Running,
    /// The background thread is parked at a pause point.
    Paused,
    /// A stop was requested and the thread has not yet exited.
    Stopping,
    /// The thread has exited but `stop` has not yet been called.
    Stopped,
}

/// Owns one batch find/replace run.
///
/// `start` spawns a single background thread that walks the source tree,
/// hands each file to [`FileTransfer`], and narrates progress to the sink.
/// The caller keeps the worker and may `pause`, `resume`, or `stop` at any
/// time, and poll [`snapshot`](Self::snapshot) for live counters. Files are
/// processed strictly one at a time; there is no parallelism within a run.
pub struct SearchWorker {
    config: RunConfig,
    flags: Arc<ControlFlags>,
    counters: Arc<RunCounters>,
    handle: Option<JoinHandle<()>>,
}

impl SearchWorker {
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            flags: Arc::new(ControlFlags::new()),
            counters: Arc::new(RunCounters::new()),
            handle: None,
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Starts the run on a background thread.
    ///
    /// Idempotent while a run is live: a second call returns without
    /// touching the run in progress. Fails fast, with no thread spawned,
    /// when the pattern set is empty and `only_copy_matching` is set, since
    /// that combination can never produce output. Otherwise resets the
    /// counters and transitions to `Running`.
    pub fn start(&mut self, sink: LogSink) -> Result<()> {
        if self.is_active() {
            return Ok(());
        }
        if self.config.patterns.is_empty() && self.config.only_copy_matching {
            return Err(Error::Config(
                "no search strings were given, but only files containing matches would be copied; \
                 this run could never produce output"
                    .into(),
            ));
        }

        self.counters.reset();
        self.flags.mark_running();

        let config = self.config.clone();
        let flags = Arc::clone(&self.flags);
        let counters = Arc::clone(&self.counters);
        let handle = thread::Builder::new()
            .name("find-replace-search".into())
            .spawn(move || run_traversal(&config, &flags, &counters, &sink))?;
        self.handle = Some(handle);
        Ok(())
    }

    /// Parks the background thread at its next suspension point.
    pub fn pause(&self) {
        self.flags.pause();
    }

    /// Lets a paused background thread continue.
    pub fn resume(&self) {
        self.flags.resume();
    }

    /// Requests a stop and blocks until the background thread has exited.
    ///
    /// Also clears a pause so the thread can observe the stop. After this
    /// returns the worker is `Idle` and may be started again.
    pub fn stop(&mut self) {
        self.flags.request_stop();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Whether a background run is in progress (paused counts as active).
    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Whether a run is in progress and currently paused.
    pub fn is_paused(&self) -> bool {
        self.is_active() && self.flags.is_paused()
    }

    pub fn state(&self) -> RunState {
        match &self.handle {
            None => RunState::Idle,
            Some(handle) if handle.is_finished() => RunState::Stopped,
            Some(_) if !self.flags.is_running() => RunState::Stopping,
            Some(_) if self.flags.is_paused() => RunState::Paused,
            Some(_) => RunState::Running,
        }
    }

    /// A point-in-time copy of the run counters. Eventually consistent
    /// while the run is live; exact once it has stopped.
    pub fn snapshot(&self) -> CountersSnapshot {
        self.counters.snapshot()
    }
}

impl Drop for SearchWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The background thread body: walk the tree, transfer every file.
fn run_traversal(
    config: &RunConfig,
    flags: &ControlFlags,
    counters: &RunCounters,
    sink: &LogSink,
) {
    let source_root = normalize(&config.source_root);
    let destination_root = normalize(&config.destination_root);
    let transfer = FileTransfer::new(
        &config.patterns,
        config.only_copy_matching,
        counters,
        flags,
        sink,
    );

    let mut queue: VecDeque<PathBuf> = VecDeque::new();
    enter_folder(&source_root, &mut queue, counters, sink);

    while flags.is_running() {
        let Some(path) = queue.pop_front() else {
            break;
        };

        if path.is_dir() {
            if config.recursive {
                enter_folder(&path, &mut queue, counters, sink);
            }
            continue;
        }
        if !flags.pause_point() {
            break;
        }

        let relative = path.strip_prefix(&source_root).unwrap_or(&path);
        let dest = destination_root.join(relative);

        if config.text_files_only && !has_text_suffix(&path) {
            if config.only_copy_matching {
                sink.line(format!(
                    "Skipping search within and copy of non-text file \"{}\"...",
                    relative.display()
                ));
                counters.files_skipped.fetch_add(1, Ordering::Relaxed);
                counters.searches_skipped.fetch_add(1, Ordering::Relaxed);
            } else {
                sink.line(format!(
                    "Performing byte-copy of non-text file \"{}\"...",
                    relative.display()
                ));
                ensure_parent(&dest, sink);
                transfer.copy(&path, &dest);
            }
            continue;
        }

        ensure_parent(&dest, sink);
        transfer.find_and_replace(&path, &dest);
    }

    for line in counters.snapshot().to_string().lines() {
        sink.line(line);
    }
}

/// Lists a folder into the work queue and counts it as traversed.
/// An unreadable folder is reported and skipped.
fn enter_folder(
    dir: &Path,
    queue: &mut VecDeque<PathBuf>,
    counters: &RunCounters,
    sink: &LogSink,
) {
    sink.line(format!("Searching through folder \"{}\"...", dir.display()));
    match list_children(dir) {
        Ok(children) => {
            counters.folders_traversed.fetch_add(1, Ordering::Relaxed);
            queue.extend(children);
        }
        Err(err) => {
            sink.line(format!(
                "Failed to list folder \"{}\": {}",
                dir.display(),
                err
            ));
        }
    }
}

fn list_children(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut children = Vec::new();
    for entry in fs::read_dir(dir)? {
        children.push(entry?.path());
    }
    Ok(children)
}

/// Resolves a root so the same-directory case compares equal even when the
/// two roots were spelled differently. A destination that does not exist
/// yet cannot resolve and is used as spelled.
fn normalize(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Creates the destination's parent chain; create-if-missing, no error when
/// already present. A failure is reported and left to surface as a write
/// failure on the file itself.
fn ensure_parent(dest: &Path, sink: &LogSink) {
    if let Some(parent) = dest.parent() {
        if let Err(err) = fs::create_dir_all(parent) {
            sink.line(format!(
                "Failed to create destination folder \"{}\": {}",
                parent.display(),
                err
            ));
        }
    }
}

fn has_text_suffix(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
        return false;
    };
    let name = name.to_lowercase();
    TEXT_FILE_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}
