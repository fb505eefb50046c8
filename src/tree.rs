use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One entry of a directory snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    File(FileNode),
    Dir(DirNode),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileNode {
    pub path: PathBuf,
    pub name: String,
    pub size: Option<u64>,
    pub modified_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirNode {
    pub path: PathBuf,
    pub name: String,
    pub children: Vec<Node>,
}

impl Node {
    pub fn path(&self) -> &Path {
        match self {
            Node::File(f) => &f.path,
            Node::Dir(d) => &d.path,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Node::File(f) => &f.name,
            Node::Dir(d) => &d.name,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Node::Dir(_))
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::File(_) => &[],
            Node::Dir(d) => &d.children,
        }
    }

    /// Number of nodes in this subtree, excluding `self`.
    pub fn count(&self) -> usize {
        self.children().iter().map(|c| 1 + c.count()).sum()
    }

    /// Depth-first lookup by absolute path.
    pub fn find(&self, path: &Path) -> Option<&Node> {
        if self.path() == path {
            return Some(self);
        }
        if !path.starts_with(self.path()) {
            return None;
        }
        self.children().iter().find_map(|c| c.find(path))
    }
}

/// Classification of a node or line run against its counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffTag {
    Added,
    Removed,
    Modified,
    Unchanged,
}

impl DiffTag {
    pub fn is_change(self) -> bool {
        self != DiffTag::Unchanged
    }

    pub fn marker(self) -> char {
        match self {
            DiffTag::Added => '+',
            DiffTag::Removed => '-',
            DiffTag::Modified => '~',
            DiffTag::Unchanged => ' ',
        }
    }
}

/// A snapshot node annotated with its diff status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffNode {
    pub path: PathBuf,
    pub name: String,
    pub diff_tag: DiffTag,
    #[serde(flatten)]
    pub kind: DiffKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DiffKind {
    #[serde(rename_all = "camelCase")]
    File {
        size: Option<u64>,
        modified_time: Option<DateTime<Utc>>,
    },
    Dir { children: Vec<DiffNode> },
}

impl DiffNode {
    /// Copies `node` and every descendant, tagging them all with `tag`.
    pub fn uniform(node: &Node, tag: DiffTag) -> Self {
        match node {
            Node::File(f) => DiffNode::file(f, tag),
            Node::Dir(d) => DiffNode {
                path: d.path.clone(),
                name: d.name.clone(),
                diff_tag: tag,
                kind: DiffKind::Dir {
                    children: d
                        .children
                        .iter()
                        .map(|c| DiffNode::uniform(c, tag))
                        .collect(),
                },
            },
        }
    }

    pub(crate) fn file(f: &FileNode, tag: DiffTag) -> Self {
        DiffNode {
            path: f.path.clone(),
            name: f.name.clone(),
            diff_tag: tag,
            kind: DiffKind::File {
                size: f.size,
                modified_time: f.modified_time,
            },
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self.kind, DiffKind::Dir { .. })
    }

    pub fn children(&self) -> &[DiffNode] {
        match &self.kind {
            DiffKind::File { .. } => &[],
            DiffKind::Dir { children } => children,
        }
    }

    /// Number of nodes in this subtree, excluding `self`.
    pub fn count(&self) -> usize {
        self.children().iter().map(|c| 1 + c.count()).sum()
    }

    /// Pre-order iterator over `self` and all descendants.
    pub fn iter(&self) -> impl Iterator<Item = &DiffNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(next.children().iter().rev());
            Some(next)
        })
    }

    /// Counts files by tag.
    pub fn summary(&self) -> DiffSummary {
        let mut summary = DiffSummary::default();
        for node in self.iter().filter(|n| !n.is_dir()) {
            match node.diff_tag {
                DiffTag::Added => summary.added += 1,
                DiffTag::Removed => summary.removed += 1,
                DiffTag::Modified => summary.modified += 1,
                DiffTag::Unchanged => summary.unchanged += 1,
            }
        }
        summary
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiffSummary {
    pub added: usize,
    pub removed: usize,
    pub modified: usize,
    pub unchanged: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn file(path: &str) -> Node {
        let path = PathBuf::from(path);
        Node::File(FileNode {
            name: path.file_name().unwrap().to_string_lossy().into_owned(),
            path,
            size: Some(1),
            modified_time: None,
        })
    }

    fn dir(path: &str, children: Vec<Node>) -> Node {
        let path = PathBuf::from(path);
        Node::Dir(DirNode {
            name: path.file_name().unwrap().to_string_lossy().into_owned(),
            path,
            children,
        })
    }

    fn sample() -> Node {
        dir(
            "/r",
            vec![
                file("/r/a.txt"),
                dir("/r/sub", vec![file("/r/sub/b.txt"), file("/r/sub/c.txt")]),
            ],
        )
    }

    #[test]
    fn count_excludes_root() {
        assert_eq!(sample().count(), 4);
        assert_eq!(file("/x").count(), 0);
    }

    #[test]
    fn find_descends_by_prefix() {
        let tree = sample();
        assert_eq!(
            tree.find(Path::new("/r/sub/c.txt")).map(Node::name),
            Some("c.txt")
        );
        assert!(tree.find(Path::new("/r/sub/zz.txt")).is_none());
        assert!(tree.find(Path::new("/other")).is_none());
    }

    #[test]
    fn uniform_tags_every_descendant() {
        let diff = DiffNode::uniform(&sample(), DiffTag::Removed);
        assert_eq!(diff.count(), 4);
        assert!(diff.iter().all(|n| n.diff_tag == DiffTag::Removed));
        let names: Vec<_> = diff.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["r", "a.txt", "sub", "b.txt", "c.txt"]);
    }

    #[test]
    fn summary_counts_files_only() {
        let diff = DiffNode::uniform(&sample(), DiffTag::Added);
        assert_eq!(
            diff.summary(),
            DiffSummary {
                added: 3,
                ..Default::default()
            }
        );
    }

    #[test]
    fn serializes_camel_case_with_type_tag() {
        let json = serde_json::to_value(DiffNode::uniform(&file("/r/a.txt"), DiffTag::Unchanged))
            .unwrap();
        assert_eq!(json["type"], "file");
        assert_eq!(json["diffTag"], "unchanged");
        assert_eq!(json["name"], "a.txt");
        assert!(json.get("modifiedTime").is_some());
    }
}
