//! Rendering for filetree scans.
//!
//! Turns a scanned [`TreeNode`] tree into the line-oriented box-drawing text
//! format and writes it to disk.
//!
//! ```text
//! File Tree for: root
//! ==================================================
//!
//! 📁 b/
//! ├── 📄 a.txt
//! └── 📄 z.txt
//! └── 📄 a.log
//! ```
//!
//! [`TreeNode`]: filetree_core::TreeNode

mod export;
mod text;

pub use export::{ExportError, default_file_name, save, timestamped_file_name};
pub use text::{RenderOptions, TreeRenderer, render};
