//! Core types for filetree.
//!
//! This crate provides the data structures shared by the scanner and the
//! renderer: tree nodes, scan results, scan configuration and errors.

mod config;
mod error;
mod node;
mod tree;

pub use config::{DEFAULT_CONCURRENT_OPS, DEFAULT_MAX_DEPTH, ScanConfig, ScanConfigBuilder};
pub use error::{ScanError, ScanWarning, WarningKind};
pub use node::{NodeId, NodeKind, TreeNode};
pub use tree::ScanResult;
