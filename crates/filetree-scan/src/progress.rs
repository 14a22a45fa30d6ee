//! Scan progress reporting.

use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Progress information during a scan.
#[derive(Debug, Clone)]
pub struct ScanProgress {
    /// Number of nodes visited so far, root included.
    pub nodes_scanned: u64,
    /// Number of directories visited so far.
    pub dirs_scanned: u64,
    /// Most recently visited path.
    pub current_path: PathBuf,
    /// Number of warnings recorded so far.
    pub warnings_count: u64,
    /// Time elapsed since scan started.
    pub elapsed: Duration,
    /// Whether this is the final snapshot of a completed scan.
    pub finished: bool,
}

impl ScanProgress {
    /// Create initial progress state.
    pub fn new() -> Self {
        Self {
            nodes_scanned: 0,
            dirs_scanned: 0,
            current_path: PathBuf::new(),
            warnings_count: 0,
            elapsed: Duration::ZERO,
            finished: false,
        }
    }

    /// Calculate scan rate in nodes per second.
    pub fn nodes_per_second(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.nodes_scanned as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Get the number of non-directory nodes visited.
    pub fn files_scanned(&self) -> u64 {
        self.nodes_scanned.saturating_sub(self.dirs_scanned)
    }
}

impl Default for ScanProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// Running counters owned by the scanning thread.
#[derive(Debug)]
pub(crate) struct ProgressTracker {
    start_time: Instant,
    nodes_scanned: u64,
    dirs_scanned: u64,
    warnings_count: u64,
    current_path: PathBuf,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            nodes_scanned: 0,
            dirs_scanned: 0,
            warnings_count: 0,
            current_path: PathBuf::new(),
        }
    }

    pub fn record_node(&mut self, is_dir: bool) {
        self.nodes_scanned += 1;
        if is_dir {
            self.dirs_scanned += 1;
        }
    }

    pub fn record_warning(&mut self) {
        self.warnings_count += 1;
    }

    pub fn set_current_path(&mut self, path: PathBuf) {
        self.current_path = path;
    }

    pub fn nodes_scanned(&self) -> u64 {
        self.nodes_scanned
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn snapshot(&self, finished: bool) -> ScanProgress {
        ScanProgress {
            nodes_scanned: self.nodes_scanned,
            dirs_scanned: self.dirs_scanned,
            current_path: self.current_path.clone(),
            warnings_count: self.warnings_count,
            elapsed: self.start_time.elapsed(),
            finished,
        }
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}
