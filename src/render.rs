use std::fmt::Write as _;

use crate::diff::{LineChange, LineTag};
use crate::service::TreeView;
use crate::tree::{DiffNode, DiffSummary, Node};

pub fn render_tree(view: &TreeView) -> String {
    let mut out = String::new();
    match view {
        TreeView::Plain(node) => plain_node(&mut out, node, 0),
        TreeView::Compared(node) => diff_node(&mut out, node, 0),
    }
    out
}

fn plain_node(out: &mut String, node: &Node, depth: usize) {
    let slash = if node.is_dir() { "/" } else { "" };
    let _ = writeln!(out, "{}{}{slash}", "  ".repeat(depth), node.name());
    for child in node.children() {
        plain_node(out, child, depth + 1);
    }
}

fn diff_node(out: &mut String, node: &DiffNode, depth: usize) {
    let slash = if node.is_dir() { "/" } else { "" };
    let _ = writeln!(
        out,
        "{} {}{}{slash}",
        node.diff_tag.marker(),
        "  ".repeat(depth),
        node.name
    );
    for child in node.children() {
        diff_node(out, child, depth + 1);
    }
}

pub fn render_summary(summary: &DiffSummary) -> String {
    format!(
        "== Summary ==\n\
Added:      {}\n\
Removed:    {}\n\
Modified:   {}\n\
Unchanged:  {}\n",
        summary.added, summary.removed, summary.modified, summary.unchanged
    )
}

/// One output line per input line, prefixed with `-`, `+` or a space.
pub fn render_changes(changes: &[LineChange]) -> String {
    let mut out = String::new();
    for change in changes {
        let sign = match change.tag {
            LineTag::Removed => '-',
            LineTag::Added => '+',
            LineTag::Unchanged => ' ',
        };
        for line in change.value.split_inclusive('\n') {
            let _ = writeln!(out, "{sign}{}", strip_newline(line));
        }
    }
    out
}

fn strip_newline(s: &str) -> &str {
    s.strip_suffix("\r\n")
        .or_else(|| s.strip_suffix('\n'))
        .unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::diff_lines;
    use crate::tree::{DiffKind, DiffTag};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn renders_prefixed_lines() {
        let changes = diff_lines("a\nb\nc", "a\nx\r\nc");
        assert_eq!(render_changes(&changes), " a\n-b\n+x\n c\n");
    }

    #[test]
    fn strips_one_line_terminator() {
        assert_eq!(strip_newline("a\r\n"), "a");
        assert_eq!(strip_newline("a\n"), "a");
        assert_eq!(strip_newline("a\r\r\n"), "a\r");
        assert_eq!(strip_newline("tail"), "tail");
    }

    #[test]
    fn renders_annotated_tree_with_markers() {
        let leaf = DiffNode {
            path: PathBuf::from("/r/a.txt"),
            name: "a.txt".into(),
            diff_tag: DiffTag::Added,
            kind: DiffKind::File {
                size: None,
                modified_time: None,
            },
        };
        let root = DiffNode {
            path: PathBuf::from("/r"),
            name: "r".into(),
            diff_tag: DiffTag::Modified,
            kind: DiffKind::Dir {
                children: vec![leaf],
            },
        };
        assert_eq!(
            render_tree(&TreeView::Compared(root)),
            "~ r/\n+   a.txt\n"
        );
    }

    #[test]
    fn summary_lists_counts() {
        let text = render_summary(&DiffSummary {
            added: 2,
            ..Default::default()
        });
        assert!(text.contains("Added:      2"));
    }
}
