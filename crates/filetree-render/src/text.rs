//! Box-drawing text renderer.

use std::fmt::Write;

use filetree_core::TreeNode;

const FOLDER_ICON: &str = "📁";
const FILE_ICON: &str = "📄";

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const SPACING: &str = "    ";
const CONNECTION: &str = "│   ";

const HEADER_RULE_WIDTH: usize = 50;

/// Rendering switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Append the recorded size to file lines.
    pub show_size: bool,
}

/// Renders a tree as text.
///
/// Output depends only on the shape and order of the tree, so rendering the
/// same tree twice gives identical text.
#[derive(Debug, Clone, Default)]
pub struct TreeRenderer {
    options: RenderOptions,
}

impl TreeRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> RenderOptions {
        self.options
    }

    /// Render `root` and everything below it. An absent tree renders as an
    /// empty string.
    pub fn render(&self, root: Option<&TreeNode>) -> String {
        let Some(root) = root else {
            return String::new();
        };

        let mut out = String::new();
        let _ = writeln!(out, "File Tree for: {}", root.path.display());
        out.push_str(&"=".repeat(HEADER_RULE_WIDTH));
        out.push_str("\n\n");

        self.render_children(&mut out, root, "", true);
        out
    }

    fn render_children(&self, out: &mut String, node: &TreeNode, prefix: &str, is_root: bool) {
        let last = node.children.len().saturating_sub(1);
        for (i, child) in node.children.iter().enumerate() {
            // The first child of the root is drawn flush-left, without a
            // connector, and its subtree starts from an empty prefix.
            let (connector, next_prefix) = if is_root && i == 0 {
                ("", String::new())
            } else if i == last {
                (LAST_BRANCH, format!("{prefix}{SPACING}"))
            } else {
                (BRANCH, format!("{prefix}{CONNECTION}"))
            };

            out.push_str(prefix);
            out.push_str(connector);
            self.render_line(out, child);
            self.render_children(out, child, &next_prefix, false);
        }
    }

    fn render_line(&self, out: &mut String, node: &TreeNode) {
        if node.is_dir() {
            let _ = writeln!(out, "{FOLDER_ICON} {}/", node.name);
            return;
        }

        match node.size.filter(|_| self.options.show_size) {
            Some(size) => {
                let size = humansize::format_size(size, humansize::BINARY);
                let _ = writeln!(out, "{FILE_ICON} {} ({size})", node.name);
            }
            None => {
                let _ = writeln!(out, "{FILE_ICON} {}", node.name);
            }
        }
    }
}

/// Render with default options.
pub fn render(root: Option<&TreeNode>) -> String {
    TreeRenderer::default().render(root)
}
