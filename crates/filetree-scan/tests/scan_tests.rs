use filetree_scan::{
    NodeKind, ScanConfig, ScanContext, ScanError, TreeNode, TreeScanner, WarningKind, scan,
};
use std::fs;
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Build the reference fixture:
///
/// ```text
/// root/
///   b/
///     z.txt
///     a.txt
///   a.log
/// ```
fn reference_tree(temp: &TempDir) -> std::path::PathBuf {
    let root = temp.path().join("root");
    fs::create_dir_all(root.join("b")).unwrap();
    fs::write(root.join("b/z.txt"), "z").unwrap();
    fs::write(root.join("b/a.txt"), "a").unwrap();
    fs::write(root.join("a.log"), "log").unwrap();
    root
}

/// A mixed fixture with hidden entries and names that sort differently
/// byte-wise than case-insensitively.
fn mixed_tree() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    for dir in ["B", "a", "_x", ".git", "a/Inner", "a/.cache"] {
        fs::create_dir_all(root.join(dir)).unwrap();
    }
    for file in [
        "Z.txt",
        "b.txt",
        ".env",
        "a/zeta.rs",
        "a/Alpha.rs",
        "a/.secret",
        "B/readme",
        ".git/HEAD",
    ] {
        fs::write(root.join(file), file).unwrap();
    }
    temp
}

fn names(node: &TreeNode) -> Vec<&str> {
    node.children.iter().map(|c| c.name.as_str()).collect()
}

fn child<'a>(node: &'a TreeNode, name: &str) -> &'a TreeNode {
    node.children
        .iter()
        .find(|c| c.name.as_str() == name)
        .unwrap_or_else(|| panic!("no child named {name}"))
}

fn unlimited() -> ScanConfig {
    ScanConfig::builder().max_depth(None::<u32>).build().unwrap()
}

#[test]
fn test_reference_scenario() {
    let temp = TempDir::new().unwrap();
    let root = reference_tree(&temp);

    let config = ScanConfig::builder()
        .show_hidden(false)
        .sort_directories_first(true)
        .build()
        .unwrap();
    let result = scan(&ScanContext::new(), &root, &config).unwrap();

    assert_eq!(result.root_path, root);
    assert_eq!(result.node_count, 5);
    assert_eq!(names(&result.root), vec!["b", "a.log"]);
    assert_eq!(names(child(&result.root, "b")), vec!["a.txt", "z.txt"]);
}

#[test]
fn test_empty_directory() {
    let temp = TempDir::new().unwrap();
    let result = scan(&ScanContext::new(), temp.path(), &ScanConfig::default()).unwrap();

    assert_eq!(result.node_count, 1);
    assert!(result.root.children.is_empty());
    assert!(result.root.is_dir());
}

#[test]
fn test_node_count_matches_tree_for_all_policies() {
    let temp = mixed_tree();
    for show_hidden in [false, true] {
        for sort in [false, true] {
            for max_depth in [Some(0u32), Some(1), None] {
                let config = ScanConfig::builder()
                    .show_hidden(show_hidden)
                    .sort_directories_first(sort)
                    .max_depth(max_depth)
                    .build()
                    .unwrap();
                let result = scan(&ScanContext::new(), temp.path(), &config).unwrap();
                assert_eq!(
                    result.root.count(),
                    result.node_count,
                    "count mismatch for {config:?}"
                );
            }
        }
    }
}

#[test]
fn test_hidden_entries_filtered() {
    let temp = mixed_tree();
    let result = scan(&ScanContext::new(), temp.path(), &unlimited()).unwrap();

    result.root.walk(&mut |node, depth| {
        if depth > 0 {
            assert!(!node.name.starts_with('.'), "hidden entry {}", node.name);
        }
    });
}

#[test]
fn test_hidden_entries_shown() {
    let temp = mixed_tree();
    let config = ScanConfig::builder()
        .show_hidden(true)
        .max_depth(None::<u32>)
        .build()
        .unwrap();
    let result = scan(&ScanContext::new(), temp.path(), &config).unwrap();

    let top = names(&result.root);
    assert!(top.contains(&".git"));
    assert!(top.contains(&".env"));
    assert!(names(child(&result.root, "a")).contains(&".secret"));
}

#[test]
fn test_directories_first_bytewise() {
    let temp = mixed_tree();
    let result = scan(&ScanContext::new(), temp.path(), &unlimited()).unwrap();

    // Uppercase sorts before underscore, which sorts before lowercase.
    assert_eq!(names(&result.root), vec!["B", "_x", "a", "Z.txt", "b.txt"]);
    assert_eq!(
        names(child(&result.root, "a")),
        vec!["Inner", "Alpha.rs", "zeta.rs"]
    );

    result.root.walk(&mut |node, _| {
        let dirs_done = node
            .children
            .iter()
            .position(|c| !c.is_dir())
            .unwrap_or(node.children.len());
        assert!(node.children[dirs_done..].iter().all(|c| !c.is_dir()));

        for group in [&node.children[..dirs_done], &node.children[dirs_done..]] {
            for pair in group.windows(2) {
                assert!(pair[0].name.as_bytes() <= pair[1].name.as_bytes());
            }
        }
    });
}

#[test]
fn test_unsorted_keeps_same_entries() {
    let temp = mixed_tree();
    let config = ScanConfig::builder()
        .sort_directories_first(false)
        .build()
        .unwrap();
    let result = scan(&ScanContext::new(), temp.path(), &config).unwrap();

    let mut top = names(&result.root);
    top.sort();
    assert_eq!(top, vec!["B", "Z.txt", "_x", "a", "b.txt"]);
}

#[test]
fn test_depth_boundary() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("a/b/c/d/e")).unwrap();
    fs::write(temp.path().join("a/b/c/d/e/deep.txt"), "x").unwrap();

    for limit in [0u32, 1, 2, 3] {
        let config = ScanConfig::builder().max_depth(limit).build().unwrap();
        let result = scan(&ScanContext::new(), temp.path(), &config).unwrap();

        let mut deepest = 0;
        result.root.walk(&mut |node, depth| {
            deepest = deepest.max(depth);
            if depth > limit as usize {
                assert!(node.children.is_empty(), "{} expanded", node.path.display());
            }
        });
        // The boundary level is expanded, the next one is present as leaves.
        assert_eq!(deepest, limit as usize + 1);
        assert_eq!(result.node_count, limit as usize + 2);
    }
}

#[test]
fn test_depth_ceiling() {
    let temp = TempDir::new().unwrap();
    let mut path = temp.path().to_path_buf();
    for i in 0..55 {
        path.push(format!("d{i}"));
    }
    fs::create_dir_all(&path).unwrap();

    let result = scan(&ScanContext::new(), temp.path(), &unlimited()).unwrap();

    // Depths 0..=51 exist; the node at depth 51 is never expanded.
    assert_eq!(result.node_count, 52);
    assert_eq!(result.root.count(), 52);
    assert!(
        result
            .warnings
            .iter()
            .any(|w| w.kind == WarningKind::DepthCeiling)
    );
}

#[test]
fn test_reserved_paths_excluded() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("System Volume Information/inner")).unwrap();
    fs::create_dir_all(root.join("$Recycle.Bin")).unwrap();
    fs::write(root.join("Recovery.img"), "x").unwrap();
    fs::write(root.join("keep.txt"), "x").unwrap();

    let result = scan(&ScanContext::new(), root, &ScanConfig::default()).unwrap();

    assert_eq!(names(&result.root), vec!["keep.txt"]);
    assert_eq!(result.node_count, 2);
}

#[test]
fn test_huge_directory_truncated() {
    let temp = TempDir::new().unwrap();
    let big = temp.path().join("big");
    fs::create_dir(&big).unwrap();
    for i in 0..10_001 {
        fs::write(big.join(format!("f{i:05}")), "").unwrap();
    }

    let result = scan(&ScanContext::new(), temp.path(), &ScanConfig::default()).unwrap();
    let big_node = child(&result.root, "big");

    assert_eq!(big_node.children.len(), 1_000);
    assert_eq!(result.node_count, 1 + 1 + 1_000);
    assert!(
        result
            .warnings
            .iter()
            .any(|w| w.kind == WarningKind::Truncated && w.path == big)
    );
}

#[test]
fn test_truncation_applies_before_hidden_filter() {
    let temp = TempDir::new().unwrap();
    for i in 0..10_001 {
        let name = if i % 2 == 0 {
            format!(".h{i:05}")
        } else {
            format!("f{i:05}")
        };
        fs::write(temp.path().join(name), "").unwrap();
    }

    let result = scan(&ScanContext::new(), temp.path(), &ScanConfig::default()).unwrap();
    let kept = result.root.children.len();

    // Filtering first would leave about 5 000 visible names to cap at 1 000.
    assert!(kept < 1_000, "kept {kept} entries");
    assert_eq!(result.node_count, kept + 1);
    assert!(
        result
            .root
            .children
            .iter()
            .all(|c| !c.name.starts_with('.'))
    );
    assert!(
        result
            .warnings
            .iter()
            .any(|w| w.kind == WarningKind::Truncated)
    );
}

#[test]
fn test_directory_at_limit_not_truncated() {
    let temp = TempDir::new().unwrap();
    for i in 0..1_500 {
        fs::write(temp.path().join(format!("f{i:04}")), "").unwrap();
    }

    let result = scan(&ScanContext::new(), temp.path(), &ScanConfig::default()).unwrap();
    assert_eq!(result.root.children.len(), 1_500);
    assert!(!result.has_warnings());
}

#[cfg(unix)]
#[test]
fn test_unreadable_directory_becomes_leaf() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let locked = temp.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::write(locked.join("inside.txt"), "x").unwrap();
    fs::write(temp.path().join("open.txt"), "x").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can read anything; nothing to test then.
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let result = scan(&ScanContext::new(), temp.path(), &ScanConfig::default());
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    let result = result.unwrap();

    let locked_node = child(&result.root, "locked");
    assert!(locked_node.children.is_empty());
    assert_eq!(result.node_count, 3);
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].kind, WarningKind::PermissionDenied);
}

#[cfg(unix)]
#[test]
fn test_symlinks_not_followed() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("real")).unwrap();
    std::os::unix::fs::symlink(temp.path(), temp.path().join("real/loop")).unwrap();

    let result = scan(&ScanContext::new(), temp.path(), &unlimited()).unwrap();
    let link = child(child(&result.root, "real"), "loop");

    assert_eq!(link.kind, NodeKind::Symlink);
    assert!(link.children.is_empty());
    assert_eq!(result.node_count, 3);
}

#[test]
fn test_parent_links() {
    let temp = mixed_tree();
    let result = scan(&ScanContext::new(), temp.path(), &unlimited()).unwrap();

    assert!(result.root.parent.is_none());
    result.root.walk(&mut |node, _| {
        for c in &node.children {
            assert_eq!(c.parent, Some(node.id));
            assert_eq!(result.parent_of(c).unwrap().path, node.path);
        }
    });
}

#[test]
fn test_root_errors() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("plain.txt");
    fs::write(&file, "x").unwrap();
    let ctx = ScanContext::new();
    let config = ScanConfig::default();

    assert!(matches!(scan(&ctx, "", &config), Err(ScanError::EmptyPath)));
    assert!(matches!(
        scan(&ctx, temp.path().join("missing"), &config),
        Err(ScanError::NotFound { .. })
    ));
    assert!(matches!(
        scan(&ctx, &file, &config),
        Err(ScanError::NotADirectory { .. })
    ));
}

/// Directories whose listing takes at least `dirs * 9` ms because of the
/// pause every 100 siblings.
fn slow_tree(dirs: usize) -> TempDir {
    let temp = TempDir::new().unwrap();
    for d in 0..dirs {
        let dir = temp.path().join(format!("dir{d}"));
        fs::create_dir(&dir).unwrap();
        for f in 0..1_000 {
            fs::write(dir.join(format!("f{f:04}")), "").unwrap();
        }
    }
    temp
}

#[test]
fn test_cancelled_before_start() {
    let temp = TempDir::new().unwrap();
    let ctx = ScanContext::new();
    ctx.cancel();

    let err = scan(&ctx, temp.path(), &ScanConfig::default()).unwrap_err();
    assert!(matches!(err, ScanError::Cancelled));
    assert!(err.is_interruption());
}

#[test]
fn test_cancelled_mid_scan() {
    let temp = slow_tree(5);
    let ctx = ScanContext::new();

    let canceller = {
        let ctx = ctx.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(5));
            ctx.cancel();
        })
    };

    let result = scan(&ctx, temp.path(), &ScanConfig::default());
    canceller.join().unwrap();

    assert!(matches!(result, Err(ScanError::Cancelled)));
}

#[test]
fn test_deadline_mid_scan() {
    let temp = slow_tree(4);
    let ctx = ScanContext::with_deadline(Instant::now() + Duration::from_millis(5));

    let result = scan(&ctx, temp.path(), &ScanConfig::default());
    assert!(matches!(result, Err(ScanError::DeadlineExceeded)));
}

#[tokio::test]
async fn test_scan_async() {
    let temp = TempDir::new().unwrap();
    let root = reference_tree(&temp);

    let scanner = TreeScanner::default();
    let result = scanner
        .scan_async(ScanContext::with_timeout(Duration::from_secs(30)), root.clone())
        .await
        .unwrap();

    assert_eq!(result.node_count, 5);
    assert_eq!(result.root.path, root);
}

#[tokio::test]
async fn test_progress_reports_while_scanning() {
    let temp = slow_tree(2);
    let scanner = TreeScanner::default();
    let mut rx = scanner.subscribe();

    let result = scanner
        .scan_async(ScanContext::new(), temp.path().to_path_buf())
        .await
        .unwrap();

    let mut updates = Vec::new();
    while let Ok(progress) = rx.try_recv() {
        updates.push(progress);
    }
    assert!(updates.len() >= 2);
    assert!(updates.last().unwrap().finished);
    assert!(updates.iter().filter(|p| !p.finished).all(|p| p.nodes_scanned % 1_000 == 0));
    assert_eq!(
        updates.last().unwrap().nodes_scanned,
        result.node_count as u64
    );
}
