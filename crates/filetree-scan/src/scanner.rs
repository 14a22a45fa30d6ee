//! Recursive, cancellable directory scanner.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use tokio::sync::broadcast;
use tracing::{debug, trace, warn};

use filetree_core::{NodeId, NodeKind, ScanConfig, ScanError, ScanResult, ScanWarning, TreeNode};

use crate::context::ScanContext;
use crate::progress::{ProgressTracker, ScanProgress};

/// Depth beyond which directories are never expanded, whatever the config.
pub const HARD_DEPTH_CEILING: usize = 50;

/// Directories with more entries than this are truncated.
pub const ENTRY_LIMIT: usize = 10_000;

/// Number of entries kept from a truncated directory.
pub const TRUNCATED_ENTRY_COUNT: usize = 1_000;

/// Path fragments of OS-reserved locations that are skipped entirely.
pub const RESERVED_PATH_FRAGMENTS: &[&str] = &[
    "System Volume Information",
    "$Recycle.Bin",
    "$WINDOWS.~BT",
    "Recovery",
    "ProgramData\\Microsoft\\Windows Defender",
    "Windows\\System32\\config",
];

/// Siblings processed between short pauses.
const YIELD_INTERVAL: usize = 100;

const YIELD_PAUSE: Duration = Duration::from_millis(1);

/// Visited nodes between progress broadcasts.
const PROGRESS_INTERVAL: u64 = 1_000;

const PROGRESS_CHANNEL_SIZE: usize = 100;

/// Depth-first scanner that builds an owned [`TreeNode`] tree.
///
/// Traversal is single-threaded; `concurrent_ops` in the config is not used.
#[derive(Debug, Clone)]
pub struct TreeScanner {
    config: ScanConfig,
    progress_tx: broadcast::Sender<ScanProgress>,
}

impl TreeScanner {
    /// Create a new scanner.
    pub fn new(config: ScanConfig) -> Self {
        let (progress_tx, _) = broadcast::channel(PROGRESS_CHANNEL_SIZE);
        Self {
            config,
            progress_tx,
        }
    }

    /// The policy this scanner applies.
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Subscribe to scan progress updates.
    pub fn subscribe(&self) -> broadcast::Receiver<ScanProgress> {
        self.progress_tx.subscribe()
    }

    /// Scan the directory at `root`.
    ///
    /// Fails without a tree when the root is empty, missing, not a directory,
    /// or when `ctx` is cancelled or expires. Unreadable subdirectories are
    /// kept as leaves and reported in [`ScanResult::warnings`].
    pub fn scan(&self, ctx: &ScanContext, root: impl AsRef<Path>) -> Result<ScanResult, ScanError> {
        let root_path = root.as_ref();
        if root_path.as_os_str().is_empty() {
            return Err(ScanError::EmptyPath);
        }
        self.config.validate()?;

        let metadata =
            fs::metadata(root_path).map_err(|e| ScanError::not_found(root_path, e))?;
        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory {
                path: root_path.to_path_buf(),
            });
        }

        debug!(
            root = %root_path.display(),
            max_depth = ?self.config.max_depth,
            show_hidden = self.config.show_hidden,
            "starting scan"
        );

        let mut walk = Walk {
            config: &self.config,
            ctx,
            progress_tx: &self.progress_tx,
            tracker: ProgressTracker::new(),
            warnings: Vec::new(),
            next_id: 0,
        };

        let mut root_node = TreeNode::new_directory(walk.next_id(), root_path);
        let node_count = walk.scan_node(&mut root_node, 0)?;

        let scan_duration = walk.tracker.elapsed();
        let _ = self.progress_tx.send(walk.tracker.snapshot(true));
        debug!(
            root = %root_path.display(),
            node_count,
            warnings = walk.warnings.len(),
            elapsed_ms = scan_duration.as_millis() as u64,
            "scan finished"
        );

        Ok(ScanResult::new(
            root_path.to_path_buf(),
            root_node,
            node_count,
            walk.warnings,
            scan_duration,
        ))
    }

    /// Run [`TreeScanner::scan`] on a blocking worker thread.
    pub async fn scan_async(
        &self,
        ctx: ScanContext,
        root: impl Into<PathBuf>,
    ) -> Result<ScanResult, ScanError> {
        let scanner = self.clone();
        let root = root.into();
        tokio::task::spawn_blocking(move || scanner.scan(&ctx, &root))
            .await
            .unwrap_or_else(|e| {
                Err(ScanError::Other {
                    message: e.to_string(),
                })
            })
    }
}

impl Default for TreeScanner {
    fn default() -> Self {
        Self::new(ScanConfig::default())
    }
}

/// Scan `root` with `config`, polling `ctx` for cancellation.
pub fn scan(
    ctx: &ScanContext,
    root: impl AsRef<Path>,
    config: &ScanConfig,
) -> Result<ScanResult, ScanError> {
    TreeScanner::new(config.clone()).scan(ctx, root)
}

/// Check whether a path lies inside an OS-reserved location.
pub fn is_reserved_path(path: &Path) -> bool {
    let path = path.to_string_lossy();
    RESERVED_PATH_FRAGMENTS
        .iter()
        .any(|fragment| path.contains(fragment))
}

/// Keep the entries that could be read. Entries that vanish between listing
/// and inspection are dropped without failing the whole directory.
fn readable_entries<T>(dir: &Path, entries: impl IntoIterator<Item = io::Result<T>>) -> Vec<T> {
    entries
        .into_iter()
        .filter_map(|entry| readable_entry(dir, entry))
        .collect()
}

fn readable_entry<T>(dir: &Path, entry: io::Result<T>) -> Option<T> {
    match entry {
        Ok(entry) => Some(entry),
        Err(err) => {
            trace!(dir = %dir.display(), error = %err, "skipping unreadable entry");
            None
        }
    }
}

/// A directory entry reduced to what the tree needs.
struct Entry {
    file_name: OsString,
    kind: NodeKind,
    size: Option<u64>,
}

/// State of one traversal.
struct Walk<'a> {
    config: &'a ScanConfig,
    ctx: &'a ScanContext,
    progress_tx: &'a broadcast::Sender<ScanProgress>,
    tracker: ProgressTracker,
    warnings: Vec<ScanWarning>,
    next_id: u64,
}

impl Walk<'_> {
    fn next_id(&mut self) -> NodeId {
        let id = NodeId::new(self.next_id);
        self.next_id += 1;
        id
    }

    fn visit(&mut self, node: &TreeNode) {
        self.tracker.record_node(node.is_dir());
        if self.tracker.nodes_scanned() % PROGRESS_INTERVAL == 0 {
            self.tracker.set_current_path(node.path.clone());
            let _ = self.progress_tx.send(self.tracker.snapshot(false));
        }
    }

    fn record(&mut self, warning: ScanWarning) {
        self.tracker.record_warning();
        self.warnings.push(warning);
    }

    /// Expand `node` and return how many nodes its subtree holds, itself
    /// included. Only interruptions are returned as errors.
    fn scan_node(&mut self, node: &mut TreeNode, depth: usize) -> Result<usize, ScanError> {
        self.ctx.check()?;
        self.visit(node);

        if self.config.exceeds_depth(depth) {
            return Ok(1);
        }

        if depth > HARD_DEPTH_CEILING {
            warn!(depth, path = %node.path.display(), "stopping scan at depth ceiling");
            self.record(ScanWarning::depth_ceiling(&node.path, depth));
            return Ok(1);
        }

        let entries = match self.read_entries(&node.path) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(path = %node.path.display(), error = %err, "failed to read directory");
                self.record(ScanWarning::read_error(&node.path, &err));
                return Ok(1);
            }
        };

        let mut count = 1;
        for (index, entry) in entries.into_iter().enumerate() {
            self.ctx.check()?;

            if index > 0 && index % YIELD_INTERVAL == 0 {
                thread::sleep(YIELD_PAUSE);
            }

            let child_path = node.path.join(&entry.file_name);
            if is_reserved_path(&child_path) {
                trace!(path = %child_path.display(), "skipping reserved path");
                continue;
            }

            let mut child = TreeNode::new(self.next_id(), child_path, entry.kind).with_size(entry.size);
            if child.is_dir() {
                match self.scan_node(&mut child, depth + 1) {
                    Ok(subtree) => count += subtree,
                    Err(err) if err.is_interruption() => return Err(err),
                    Err(err) => {
                        warn!(path = %child.path.display(), error = %err, "error scanning subdirectory");
                        count += 1;
                    }
                }
            } else {
                self.visit(&child);
                count += 1;
            }
            node.push_child(child);
        }

        Ok(count)
    }

    /// List a directory and apply the entry cap, hidden filter and sort.
    fn read_entries(&mut self, path: &Path) -> io::Result<Vec<Entry>> {
        let mut raw = readable_entries(path, fs::read_dir(path)?);

        if raw.len() > ENTRY_LIMIT {
            warn!(
                path = %path.display(),
                entries = raw.len(),
                kept = TRUNCATED_ENTRY_COUNT,
                "directory too large, truncating"
            );
            self.record(ScanWarning::truncated(path, raw.len(), TRUNCATED_ENTRY_COUNT));
            raw.truncate(TRUNCATED_ENTRY_COUNT);
        }

        let mut entries = Vec::with_capacity(raw.len());
        for dir_entry in raw {
            let file_name = dir_entry.file_name();
            if self.config.should_skip_hidden(&file_name.to_string_lossy()) {
                continue;
            }
            let Some(file_type) = readable_entry(path, dir_entry.file_type()) else {
                continue;
            };
            let kind = NodeKind::from_file_type(file_type);
            let size = if self.config.show_size && !kind.is_dir() {
                dir_entry.metadata().ok().map(|m| m.len())
            } else {
                None
            };
            entries.push(Entry {
                file_name,
                kind,
                size,
            });
        }

        if self.config.sort_directories_first {
            entries.sort_by(|a, b| {
                b.kind
                    .is_dir()
                    .cmp(&a.kind.is_dir())
                    .then_with(|| {
                        a.file_name
                            .as_encoded_bytes()
                            .cmp(b.file_name.as_encoded_bytes())
                    })
            });
        }

        Ok(entries)
    }
}
