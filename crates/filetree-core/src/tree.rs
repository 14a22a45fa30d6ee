//! Scan result container.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ScanWarning;
use crate::node::TreeNode;

/// Outcome of one completed scan.
///
/// Owns the whole tree; dropping the result releases every node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    /// Root path exactly as it was requested.
    pub root_path: PathBuf,

    /// Root node of the tree.
    pub root: TreeNode,

    /// Number of nodes reachable from `root`, root included.
    pub node_count: usize,

    /// Recovered problems (unreadable directories, truncations).
    pub warnings: Vec<ScanWarning>,

    /// Duration of the scan.
    pub scan_duration: Duration,
}

impl ScanResult {
    /// Create a new scan result.
    pub fn new(
        root_path: PathBuf,
        root: TreeNode,
        node_count: usize,
        warnings: Vec<ScanWarning>,
        scan_duration: Duration,
    ) -> Self {
        Self {
            root_path,
            root,
            node_count,
            warnings,
            scan_duration,
        }
    }

    /// Look up the node that owns `node`.
    pub fn parent_of(&self, node: &TreeNode) -> Option<&TreeNode> {
        node.parent.and_then(|id| self.root.find(id))
    }

    /// Number of non-directory entries in the tree.
    pub fn file_count(&self) -> usize {
        let mut files = 0;
        self.root.walk(&mut |node, _| {
            if !node.is_dir() {
                files += 1;
            }
        });
        files
    }

    /// Number of directories below the root.
    pub fn dir_count(&self) -> usize {
        let mut dirs = 0;
        self.root.walk(&mut |node, depth| {
            if depth > 0 && node.is_dir() {
                dirs += 1;
            }
        });
        dirs
    }

    /// Check if there were any warnings during scanning.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
