use std::collections::{HashMap, HashSet};
use std::path::Path;

use tracing::{debug, warn};

use crate::tree::{DiffKind, DiffNode, DiffTag, DirNode, FileNode, Node};
use crate::utils::file_bytes_equal;

/// Path of `path` below `root`, compared component by component.
///
/// `/foo` is not a prefix of `/foobar/x`; the root itself maps to the empty path.
pub fn relative_path<'a>(path: &'a Path, root: &Path) -> Option<&'a Path> {
    path.strip_prefix(root).ok()
}

/// Annotates `left` against `right`, returning a new tree rooted at `left`.
///
/// Entries only on the left are `added`; entries only on the right are copied
/// into the result as `removed` subtrees, appended after the left children of
/// their parent in right-side order. A directory is `modified` iff some child
/// in the result is not `unchanged`.
pub fn diff_trees(left: &Node, left_root: &Path, right: &Node, right_root: &Path) -> DiffNode {
    let mut right_map = HashMap::new();
    index_tree(right, right_root, &mut right_map);
    debug!(
        "Indexed {} right-side entries under {}",
        right_map.len(),
        right_root.display()
    );

    let differ = TreeDiffer {
        left_root,
        right_root,
        right_map,
    };
    differ.compare(left)
}

fn index_tree<'a>(node: &'a Node, root: &Path, map: &mut HashMap<&'a Path, &'a Node>) {
    match relative_path(node.path(), root) {
        Some(rel) => {
            map.insert(rel, node);
        }
        None => warn!(
            "{} is not under {}, ignoring it",
            node.path().display(),
            root.display()
        ),
    }
    for child in node.children() {
        index_tree(child, root, map);
    }
}

struct TreeDiffer<'a> {
    left_root: &'a Path,
    right_root: &'a Path,
    right_map: HashMap<&'a Path, &'a Node>,
}

impl TreeDiffer<'_> {
    fn counterpart(&self, node: &Node) -> Option<&Node> {
        let rel = relative_path(node.path(), self.left_root);
        if rel.is_none() {
            warn!(
                "{} is not under {}, treating it as added",
                node.path().display(),
                self.left_root.display()
            );
        }
        rel.and_then(|rel| self.right_map.get(rel)).copied()
    }

    fn compare(&self, node: &Node) -> DiffNode {
        match (node, self.counterpart(node)) {
            (_, None) => DiffNode::uniform(node, DiffTag::Added),
            (Node::File(left), Some(Node::File(right))) => {
                DiffNode::file(left, compare_files(left, right))
            }
            (Node::Dir(left), Some(Node::Dir(right))) => self.compare_dirs(left, right),
            (Node::File(left), Some(Node::Dir(_))) => DiffNode::file(left, DiffTag::Modified),
            (Node::Dir(left), Some(Node::File(_))) => DiffNode {
                path: left.path.clone(),
                name: left.name.clone(),
                diff_tag: DiffTag::Modified,
                kind: DiffKind::Dir {
                    children: left
                        .children
                        .iter()
                        .map(|c| DiffNode::uniform(c, DiffTag::Added))
                        .collect(),
                },
            },
        }
    }

    fn compare_dirs(&self, left: &DirNode, right: &DirNode) -> DiffNode {
        let mut children: Vec<DiffNode> = left.children.iter().map(|c| self.compare(c)).collect();

        let left_rels: HashSet<&Path> = left
            .children
            .iter()
            .filter_map(|c| relative_path(c.path(), self.left_root))
            .collect();
        for right_child in &right.children {
            let Some(rel) = relative_path(right_child.path(), self.right_root) else {
                continue;
            };
            if !left_rels.contains(rel) {
                children.push(DiffNode::uniform(right_child, DiffTag::Removed));
            }
        }

        let diff_tag = if children.iter().any(|c| c.diff_tag.is_change()) {
            DiffTag::Modified
        } else {
            DiffTag::Unchanged
        };
        DiffNode {
            path: left.path.clone(),
            name: left.name.clone(),
            diff_tag,
            kind: DiffKind::Dir { children },
        }
    }
}

/// Unreadable content counts as a change, never as equal.
fn compare_files(left: &FileNode, right: &FileNode) -> DiffTag {
    match file_bytes_equal(&left.path, &right.path) {
        Ok(true) => DiffTag::Unchanged,
        Ok(false) => DiffTag::Modified,
        Err(err) => {
            warn!("Comparing {} failed, marking modified: {err}", left.path.display());
            DiffTag::Modified
        }
    }
}
