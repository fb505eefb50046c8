use std::fs;
use std::path::Path;

use serde::Serialize;
use similar::{ChangeTag, TextDiff};
use tracing::debug;

use crate::error::{DirdiffError, Result};
use crate::tree::DiffTag;
use crate::utils::{decode_text_best_effort, is_probably_binary, read_bytes};

/// Default cap on the size of a file handed to the line differ.
pub const DEFAULT_MAX_TEXT_SIZE: u64 = 5_000_000;

/// The subset of [`DiffTag`] a line run can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineTag {
    Added,
    Removed,
    Unchanged,
}

impl From<LineTag> for DiffTag {
    fn from(tag: LineTag) -> Self {
        match tag {
            LineTag::Added => DiffTag::Added,
            LineTag::Removed => DiffTag::Removed,
            LineTag::Unchanged => DiffTag::Unchanged,
        }
    }
}

/// A maximal run of lines sharing one tag. `value` keeps every line terminator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineChange {
    pub value: String,
    pub tag: LineTag,
}

impl LineChange {
    fn new(tag: LineTag, value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            tag,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDiff {
    pub old_content: String,
    pub new_content: String,
    pub changes: Vec<LineChange>,
}

#[derive(Debug, Clone, Copy)]
pub struct TextOptions {
    pub normalize_eol: bool,
    pub max_text_size: u64,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            normalize_eol: false,
            max_text_size: DEFAULT_MAX_TEXT_SIZE,
        }
    }
}

/// Line diff of `old` against `new` as maximal runs.
///
/// Where a hunk both removes and adds lines, the `removed` run always comes
/// first, immediately followed by the `added` run.
pub fn diff_lines(old: &str, new: &str) -> Vec<LineChange> {
    let diff = TextDiff::from_lines(old, new);
    let mut runs = Vec::new();
    let mut removed = String::new();
    let mut added = String::new();

    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Delete => removed.push_str(change.value()),
            ChangeTag::Insert => added.push_str(change.value()),
            ChangeTag::Equal => {
                flush_hunk(&mut runs, &mut removed, &mut added);
                push_run(&mut runs, LineTag::Unchanged, change.value());
            }
        }
    }
    flush_hunk(&mut runs, &mut removed, &mut added);
    runs
}

fn flush_hunk(runs: &mut Vec<LineChange>, removed: &mut String, added: &mut String) {
    if !removed.is_empty() {
        runs.push(LineChange::new(LineTag::Removed, std::mem::take(removed)));
    }
    if !added.is_empty() {
        runs.push(LineChange::new(LineTag::Added, std::mem::take(added)));
    }
}

fn push_run(runs: &mut Vec<LineChange>, tag: LineTag, value: &str) {
    match runs.last_mut() {
        Some(last) if last.tag == tag => last.value.push_str(value),
        _ => runs.push(LineChange::new(tag, value)),
    }
}

/// Reads both files as text and diffs them line by line.
pub fn diff_files(left: &Path, right: &Path, opts: &TextOptions) -> Result<FileDiff> {
    let old_content = read_text(left, opts)?;
    let new_content = read_text(right, opts)?;
    let changes = diff_lines(&old_content, &new_content);
    debug!(
        "Diffed {} against {}: {} runs",
        left.display(),
        right.display(),
        changes.len()
    );
    Ok(FileDiff {
        old_content,
        new_content,
        changes,
    })
}

fn read_text(path: &Path, opts: &TextOptions) -> Result<String> {
    let size = fs::metadata(path)
        .map_err(|source| DirdiffError::ContentRead {
            path: path.to_path_buf(),
            source,
        })?
        .len();
    if size > opts.max_text_size {
        return Err(DirdiffError::TooLarge {
            path: path.to_path_buf(),
            size,
            limit: opts.max_text_size,
        });
    }
    let bytes = read_bytes(path)?;
    if is_probably_binary(&bytes) {
        return Err(DirdiffError::Binary {
            path: path.to_path_buf(),
        });
    }
    Ok(decode_text_best_effort(bytes, opts.normalize_eol))
}
