use std::fs::{self, Metadata};
use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{DirdiffError, Result};
use crate::filter::PathFilter;
use crate::tree::{DirNode, FileNode, Node};

/// Snapshots `root` into a [`Node`] tree.
///
/// A root that cannot be stat'ed or listed fails the whole call. Below the root,
/// any entry that cannot be read (permission denied, symlink, special file,
/// vanished mid-walk) is logged and left out, and the walk carries on with its
/// siblings.
pub fn build_tree(root: &Path, filter: &PathFilter) -> Result<Node> {
    let root_err = |source| DirdiffError::RootAccess {
        path: root.to_path_buf(),
        source,
    };
    let meta = fs::metadata(root).map_err(root_err)?;
    if meta.is_file() {
        return Ok(file_node(root, &meta));
    }
    if !meta.is_dir() {
        return Err(root_err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file or directory",
        )));
    }
    let children = list_dir(root, filter).map_err(|e| match e {
        DirdiffError::EntryAccess { source, .. } => root_err(source),
        other => other,
    })?;
    debug!("Scanned {} ({} top-level entries)", root.display(), children.len());
    Ok(Node::Dir(DirNode {
        path: root.to_path_buf(),
        name: node_name(root),
        children,
    }))
}

fn build_entry(path: &Path, filter: &PathFilter) -> Result<Node> {
    let meta = fs::symlink_metadata(path).map_err(|source| DirdiffError::EntryAccess {
        path: path.to_path_buf(),
        source,
    })?;
    if meta.file_type().is_symlink() {
        return Err(DirdiffError::Symlink {
            path: path.to_path_buf(),
        });
    }
    if meta.is_file() {
        return Ok(file_node(path, &meta));
    }
    if !meta.is_dir() {
        return Err(DirdiffError::SpecialFile {
            path: path.to_path_buf(),
        });
    }
    Ok(Node::Dir(DirNode {
        path: path.to_path_buf(),
        name: node_name(path),
        children: list_dir(path, filter)?,
    }))
}

fn list_dir(dir: &Path, filter: &PathFilter) -> Result<Vec<Node>> {
    let mut children = Vec::new();
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();

    for entry in walker.filter_entry(|e| {
        if e.depth() == 0 {
            return true;
        }
        let name = e.file_name().to_string_lossy();
        !filter.should_ignore(&name)
    }) {
        let entry = match entry {
            Ok(entry) => entry,
            // Listing `dir` itself failed.
            Err(err) if err.depth() == 0 => {
                return Err(DirdiffError::EntryAccess {
                    path: dir.to_path_buf(),
                    source: err.into(),
                });
            }
            Err(err) => {
                warn!("Skipping unreadable entry under {}: {err}", dir.display());
                continue;
            }
        };
        match build_entry(entry.path(), filter) {
            Ok(node) => children.push(node),
            Err(err) if err.is_recoverable() => warn!("{err}"),
            Err(err) => return Err(err),
        }
    }
    Ok(children)
}

fn file_node(path: &Path, meta: &Metadata) -> Node {
    Node::File(FileNode {
        path: path.to_path_buf(),
        name: node_name(path),
        size: Some(meta.len()),
        modified_time: meta.modified().ok().map(DateTime::<Utc>::from),
    })
}

fn node_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
