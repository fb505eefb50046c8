use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::cli::Options;
use crate::compare::{diff_trees, relative_path};
use crate::diff::{diff_files, FileDiff, TextOptions};
use crate::error::Result;
use crate::scanner::build_tree;
use crate::tree::{DiffNode, Node};

/// Result of [`ComparisonService::build_and_compare`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TreeView {
    /// No comparison was requested, or one of the roots is not a directory.
    Plain(Node),
    Compared(DiffNode),
}

impl TreeView {
    pub fn path(&self) -> &Path {
        match self {
            TreeView::Plain(node) => node.path(),
            TreeView::Compared(node) => &node.path,
        }
    }
}

/// Entry point for the presentation layer.
///
/// Holds configuration only; every call builds its own snapshots and returns
/// them. Callers that fire overlapping requests for the same side should keep
/// the newest result and drop the rest, see [`RequestTracker`].
#[derive(Debug, Clone, Default)]
pub struct ComparisonService {
    options: Options,
}

impl ComparisonService {
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Builds the tree at `path` and, when `compare_path` is given and both roots
    /// are directories, annotates it against the tree at `compare_path`.
    ///
    /// An `Err` means the folder at `path` could not be opened, never that it was
    /// empty. A `compare_path` that cannot be opened only drops the annotation.
    pub fn build_and_compare(
        &self,
        path: &Path,
        compare_path: Option<&Path>,
    ) -> Result<TreeView> {
        let tree = build_tree(path, &self.options.filter).inspect_err(|e| error!("{e}"))?;

        let Some(compare_path) = compare_path else {
            return Ok(TreeView::Plain(tree));
        };
        if !tree.is_dir() {
            return Ok(TreeView::Plain(tree));
        }
        let other = match build_tree(compare_path, &self.options.filter) {
            Ok(other) => other,
            Err(err) => {
                warn!("{err}, returning plain tree");
                return Ok(TreeView::Plain(tree));
            }
        };
        if !other.is_dir() {
            debug!(
                "{} is not a directory, returning plain tree",
                compare_path.display()
            );
            return Ok(TreeView::Plain(tree));
        }

        let annotated = diff_trees(&tree, path, &other, compare_path);
        let summary = annotated.summary();
        info!(
            "Compared {} with {}: {} added, {} removed, {} modified, {} unchanged",
            path.display(),
            compare_path.display(),
            summary.added,
            summary.removed,
            summary.modified,
            summary.unchanged
        );
        Ok(TreeView::Compared(annotated))
    }

    /// Line diff between two files.
    pub fn diff_files(&self, left: &Path, right: &Path) -> Result<FileDiff> {
        diff_files(left, right, &self.text_options()).inspect_err(|e| error!("{e}"))
    }

    fn text_options(&self) -> TextOptions {
        TextOptions {
            normalize_eol: self.options.normalize_eol,
            max_text_size: self.options.max_text_size,
        }
    }
}

/// Finds the file in `other_tree` at the same relative position as `selected`.
pub fn counterpart_path(
    selected: &Path,
    selected_root: &Path,
    other_root: &Path,
    other_tree: &Node,
) -> Option<PathBuf> {
    let rel = relative_path(selected, selected_root)?;
    let candidate = other_root.join(rel);
    match other_tree.find(&candidate) {
        Some(Node::File(file)) => Some(file.path.clone()),
        _ => {
            debug!("No counterpart for {} in {}", selected.display(), other_root.display());
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RequestId(u64);

/// Hands out request ids per side so callers can keep only the latest result.
#[derive(Debug, Default)]
pub struct RequestTracker {
    left: AtomicU64,
    right: AtomicU64,
}

impl RequestTracker {
    fn counter(&self, side: Side) -> &AtomicU64 {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Starts a request on `side`, superseding any earlier one.
    pub fn begin(&self, side: Side) -> RequestId {
        RequestId(self.counter(side).fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Whether `id` is still the newest request on `side`.
    pub fn is_current(&self, side: Side, id: RequestId) -> bool {
        self.counter(side).load(Ordering::Acquire) == id.0
    }
}
