//! Directory scanning engine for filetree.
//!
//! This crate walks a directory subtree depth-first and builds an owned
//! [`TreeNode`] tree, honoring the policies in [`ScanConfig`]:
//!
//! - **Depth limit** from the config, plus a hard ceiling of
//!   [`HARD_DEPTH_CEILING`] levels
//! - **Hidden entries** (names starting with `.`) filtered unless requested
//! - **Directories first**, then files, each by byte-wise name
//! - **Entry cap**: directories above [`ENTRY_LIMIT`] entries keep only the
//!   first [`TRUNCATED_ENTRY_COUNT`]
//! - **Reserved paths** (recycle bins, volume metadata) skipped
//!
//! Unreadable subdirectories become leaves and are reported as warnings.
//! Cancellation and deadlines are delivered through a [`ScanContext`] that
//! the scanner polls at every node and sibling.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use filetree_scan::{ScanConfig, ScanContext, TreeScanner};
//!
//! let ctx = ScanContext::with_timeout(Duration::from_secs(30));
//! let scanner = TreeScanner::new(ScanConfig::default());
//! let result = scanner.scan(&ctx, "/path/to/scan").unwrap();
//!
//! println!("Scanned {} items", result.node_count);
//! ```
//!
//! # Progress Monitoring
//!
//! ```rust,no_run
//! use filetree_scan::{ScanContext, TreeScanner};
//!
//! # async fn run() {
//! let scanner = TreeScanner::default();
//! let mut progress_rx = scanner.subscribe();
//!
//! tokio::spawn(async move {
//!     while let Ok(progress) = progress_rx.recv().await {
//!         eprintln!("Scanned {} items", progress.nodes_scanned);
//!     }
//! });
//!
//! let result = scanner.scan_async(ScanContext::new(), "/path/to/scan").await;
//! # }
//! ```

mod context;
mod progress;
mod scanner;

pub use context::ScanContext;
pub use progress::ScanProgress;
pub use scanner::{
    ENTRY_LIMIT, HARD_DEPTH_CEILING, RESERVED_PATH_FRAGMENTS, TRUNCATED_ENTRY_COUNT, TreeScanner,
    is_reserved_path, scan,
};

// Re-export core types for convenience
pub use filetree_core::{
    NodeId, NodeKind, ScanConfig, ScanError, ScanResult, ScanWarning, TreeNode, WarningKind,
};
