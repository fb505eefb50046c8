//
// lib.rs
// dirdiff
//
// Library entry that re-exports the comparison engine: tree snapshots, structural tree diff, line diff and the service the binary and any front end call into.
//
// Thales Matheus Mendonça Santos - November 2025
//
// Public crate interface: re-export modules used by the binary and tests.
pub mod cli;
pub mod compare;
pub mod diff;
pub mod error;
pub mod filter;
pub mod render;
pub mod scanner;
pub mod service;
pub mod tree;
pub mod utils;

pub use cli::{build_options, Args, Options};
pub use compare::diff_trees;
pub use diff::{diff_files, diff_lines, FileDiff, LineChange, LineTag, TextOptions};
pub use error::{DirdiffError, Result};
pub use filter::PathFilter;
pub use scanner::build_tree;
pub use service::{counterpart_path, ComparisonService, RequestTracker, Side, TreeView};
pub use tree::{DiffNode, DiffSummary, DiffTag, Node};
