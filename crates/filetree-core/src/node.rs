//! File and directory node types.

use std::path::{Path, PathBuf};

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Unique identifier for a node within a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Create a new NodeId from a u64.
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Type of file system node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Directory.
    Directory,
    /// Regular file (and anything else that is not a directory or link).
    File,
    /// Symbolic link. Never followed, so it is always a leaf.
    Symlink,
}

impl NodeKind {
    /// Derive the kind from a file type without following links.
    pub fn from_file_type(file_type: std::fs::FileType) -> Self {
        if file_type.is_symlink() {
            Self::Symlink
        } else if file_type.is_dir() {
            Self::Directory
        } else {
            Self::File
        }
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, Self::Directory)
    }

    /// Check if this is a symlink.
    pub fn is_symlink(&self) -> bool {
        matches!(self, Self::Symlink)
    }
}

/// A single entry in the scanned tree.
///
/// Children are owned and kept in traversal order. The parent link is a
/// plain id and never owns anything.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    /// Unique identifier for this node.
    pub id: NodeId,

    /// Full path of the entry.
    pub path: PathBuf,

    /// Base name (not full path).
    pub name: CompactString,

    /// Node type.
    pub kind: NodeKind,

    /// File length in bytes, recorded only when sizes were requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// Id of the owning node; `None` for the root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeId>,

    /// Owned children in traversal/sort order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Create a node. The name is taken from the last path component, or the
    /// whole path when there is none (`/`, `.`).
    pub fn new(id: NodeId, path: impl Into<PathBuf>, kind: NodeKind) -> Self {
        let path = path.into();
        let name = base_name(&path);
        Self {
            id,
            path,
            name,
            kind,
            size: None,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Create a directory node.
    pub fn new_directory(id: NodeId, path: impl Into<PathBuf>) -> Self {
        Self::new(id, path, NodeKind::Directory)
    }

    /// Create a file node.
    pub fn new_file(id: NodeId, path: impl Into<PathBuf>) -> Self {
        Self::new(id, path, NodeKind::File)
    }

    /// Set the recorded size.
    pub fn with_size(mut self, size: Option<u64>) -> Self {
        self.size = size;
        self
    }

    /// Check if this node is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    /// Check if this node is the root of its tree.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Get the number of direct children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Append a child, pointing its parent link at this node.
    pub fn push_child(&mut self, mut child: TreeNode) {
        child.parent = Some(self.id);
        self.children.push(child);
    }

    /// Count this node and every node below it.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::count).sum::<usize>()
    }

    /// Find a node by id in this subtree.
    pub fn find(&self, id: NodeId) -> Option<&TreeNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Visit this node and all descendants in pre-order with their depth
    /// relative to this node.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a TreeNode, usize)) {
        self.walk_at(0, visit);
    }

    fn walk_at<'a>(&'a self, depth: usize, visit: &mut impl FnMut(&'a TreeNode, usize)) {
        visit(self, depth);
        for child in &self.children {
            child.walk_at(depth + 1, visit);
        }
    }
}

fn base_name(path: &Path) -> CompactString {
    match path.file_name() {
        Some(name) => CompactString::new(name.to_string_lossy()),
        None => CompactString::new(path.to_string_lossy()),
    }
}
