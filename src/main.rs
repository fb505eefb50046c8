use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use dirdiff::cli::{build_options, Args, Command, LogLevel};
use dirdiff::render::{render_changes, render_summary, render_tree};
use dirdiff::{ComparisonService, TreeView};

fn main() -> Result<()> {
    let args = Args::parse();
    setup_tracing(args.log_level);
    debug!("Parsed CLI arguments: {args:?}");

    let opts = build_options(&args)?;
    let service = ComparisonService::new(opts);

    match &args.command {
        Command::Tree {
            path,
            compare,
            json,
        } => {
            let root = path.canonicalize().context("Invalid path")?;
            let other = compare
                .as_ref()
                .map(|p| p.canonicalize().context("Invalid compare path"))
                .transpose()?;

            let view = service
                .build_and_compare(&root, other.as_deref())
                .with_context(|| format!("Could not open {}", root.display()))?;

            if *json {
                println!("{}", serde_json::to_string_pretty(&view)?);
                return Ok(());
            }
            print!("{}", render_tree(&view));
            if let TreeView::Compared(tree) = &view {
                print!("{}", render_summary(&tree.summary()));
            }
        }
        Command::File {
            left, right, json, ..
        } => {
            let diff = service.diff_files(left, right).with_context(|| {
                format!("Could not diff {} and {}", left.display(), right.display())
            })?;

            if *json {
                println!("{}", serde_json::to_string_pretty(&diff)?);
            } else {
                print!("{}", render_changes(&diff.changes));
            }
        }
    }

    Ok(())
}

fn setup_tracing(level: LogLevel) {
    if let Some(level) = level.to_tracing_level() {
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .without_time()
            .compact()
            .init();
    }
}
