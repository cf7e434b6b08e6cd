//! Concurrent encryption pipeline
//!
//! A fixed pool of worker threads drains a bounded queue of [`FileTask`]s.
//! Each worker reads and encrypts its file without holding any lock, then
//! takes the shared-state mutex just long enough to insert the ciphertext
//! into the group's entries and bump the progress counter. After every real
//! task has been queued, one [`Job::Shutdown`] sentinel per worker is sent;
//! the pipeline returns once all workers have observed theirs and exited.
//!
//! Failures are per file: a file that vanished, became unreadable or could
//! not be encrypted is logged and reported, and the rest keep going.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread;

use indicatif::ProgressBar;
use tracing::{debug, info, warn};

use crate::crypto::{encrypt, ArchiveKey};
use crate::error::{ItemFailure, PeridotError, PeridotResult};
use crate::models::{to_archive_key, GroupEntries};

/// Default number of worker threads
pub const DEFAULT_WORKERS: usize = 4;

/// Default bound on queued, not yet claimed tasks
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// A single file queued for encryption
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    path: PathBuf,
}

impl FileTask {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Work queue message
enum Job {
    Encrypt(FileTask),
    /// No more work for the worker that receives it
    Shutdown,
}

/// State mutated by workers, always behind one mutex
struct SharedState {
    entries: GroupEntries,
    processed: u64,
    encrypted_paths: Vec<String>,
    failures: Vec<ItemFailure>,
}

/// Outcome of a pipeline run
#[derive(Debug, Default)]
pub struct PipelineReport {
    /// The seeded entries with this run's ciphertexts merged in
    pub entries: GroupEntries,
    /// Archive keys written during this run, in completion order
    pub encrypted_paths: Vec<String>,
    /// Files that could not be encrypted
    pub failures: Vec<ItemFailure>,
    /// Number of files submitted
    pub total: usize,
}

impl PipelineReport {
    /// Number of files encrypted during this run
    pub fn encrypted(&self) -> usize {
        self.encrypted_paths.len()
    }

    /// Whether every submitted file was encrypted
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Encrypts files into a group's entries using a pool of worker threads
pub struct EncryptionPipeline<'a> {
    key: &'a ArchiveKey,
    home: &'a Path,
    workers: usize,
    queue_capacity: usize,
    progress: ProgressBar,
}

impl<'a> EncryptionPipeline<'a> {
    /// Create a pipeline encrypting with `key`, keying entries relative to `home`
    pub fn new(key: &'a ArchiveKey, home: &'a Path) -> Self {
        Self {
            key,
            home,
            workers: DEFAULT_WORKERS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            progress: ProgressBar::hidden(),
        }
    }

    /// Set the number of worker threads (at least one)
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Set the work queue bound (at least one)
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    /// Report progress through `progress`; its length is set to the file count
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Encrypt `files` on top of `seed`
    ///
    /// Existing entries are only added to or overwritten, never removed.
    /// Returns after every file has been attempted.
    pub fn run(&self, seed: GroupEntries, files: Vec<PathBuf>) -> PipelineReport {
        let total = files.len();
        self.progress.set_length(total as u64);
        self.progress.set_position(0);

        info!(files = total, workers = self.workers, "starting encryption");

        let shared = Mutex::new(SharedState {
            entries: seed,
            processed: 0,
            encrypted_paths: Vec::with_capacity(total),
            failures: Vec::new(),
        });

        let (sender, receiver) = mpsc::sync_channel::<Job>(self.queue_capacity);
        let receiver = Mutex::new(receiver);

        thread::scope(|scope| {
            for id in 0..self.workers {
                let receiver = &receiver;
                let shared = &shared;
                scope.spawn(move || self.worker(id, receiver, shared));
            }

            for path in files {
                if sender.send(Job::Encrypt(FileTask::new(path))).is_err() {
                    break;
                }
            }
            for _ in 0..self.workers {
                if sender.send(Job::Shutdown).is_err() {
                    break;
                }
            }
        });

        let state = shared.into_inner().unwrap_or_else(PoisonError::into_inner);

        info!(
            encrypted = state.processed,
            failed = state.failures.len(),
            "encryption finished"
        );

        PipelineReport {
            entries: state.entries,
            encrypted_paths: state.encrypted_paths,
            failures: state.failures,
            total,
        }
    }

    fn worker(&self, id: usize, receiver: &Mutex<Receiver<Job>>, shared: &Mutex<SharedState>) {
        loop {
            // The receiver guard is dropped before the task runs
            let job = lock(receiver).recv();
            match job {
                Ok(Job::Encrypt(task)) => self.process(id, task, shared),
                Ok(Job::Shutdown) | Err(_) => break,
            }
        }
        debug!(worker = id, "worker stopped");
    }

    fn process(&self, id: usize, task: FileTask, shared: &Mutex<SharedState>) {
        match self.seal(task.path()) {
            Ok((archive_key, token)) => {
                let mut state = lock(shared);
                state.entries.insert(archive_key.clone(), token);
                state.processed += 1;
                self.progress.set_position(state.processed);
                debug!(worker = id, path = %archive_key, "encrypted file");
                state.encrypted_paths.push(archive_key);
            }
            Err(error) => {
                warn!(path = %task.path().display(), %error, "failed to encrypt file");
                lock(shared)
                    .failures
                    .push(ItemFailure::new(task.path, error));
            }
        }
    }

    /// Read and encrypt one file, returning its archive key and token
    fn seal(&self, path: &Path) -> PeridotResult<(String, String)> {
        let archive_key = to_archive_key(self.home, path)?;

        // The file may have been replaced since enumeration
        let meta = fs::symlink_metadata(path)
            .map_err(|e| PeridotError::Io(format!("Failed to stat: {}", e)))?;
        if !meta.file_type().is_file() {
            return Err(PeridotError::Path(format!(
                "{} is no longer a regular file",
                path.display()
            )));
        }

        let plaintext =
            fs::read(path).map_err(|e| PeridotError::Io(format!("Failed to read: {}", e)))?;
        let token = encrypt(&plaintext, self.key)?;

        Ok((archive_key, token))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
