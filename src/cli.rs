use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use crate::diff::DEFAULT_MAX_TEXT_SIZE;
use crate::filter::PathFilter;
use crate::utils::parse_size;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Extra basename patterns to ignore, on top of the built-in list (comma separated)
    #[arg(short, long, global = true, value_delimiter = ',')]
    pub ignore: Vec<String>,

    #[arg(long, global = true, default_value = "warn", value_enum)]
    pub log_level: LogLevel,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the tree at PATH, annotated against --compare when given
    Tree {
        path: PathBuf,

        /// Directory to compare PATH against
        #[arg(short, long)]
        compare: Option<PathBuf>,

        /// Print JSON instead of an indented tree
        #[arg(long)]
        json: bool,
    },
    /// Line diff between two files
    File {
        left: PathBuf,
        right: PathBuf,

        /// Normalize EOL (CRLF/LF) before text comparison
        #[arg(short = 'E', long)]
        normalize_eol: bool,

        /// Max size (in bytes) for text diff per file (e.g., 5MB, 102400)
        #[arg(short = 'S', long, default_value = "5MB")]
        max_text_size: String,

        /// Print JSON instead of prefixed lines
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum LogLevel {
    Debug,
    Info,
    #[default]
    Warn,
    Error,
    Silent,
}

impl LogLevel {
    pub fn to_tracing_level(self) -> Option<tracing::Level> {
        match self {
            LogLevel::Debug => Some(tracing::Level::DEBUG),
            LogLevel::Info => Some(tracing::Level::INFO),
            LogLevel::Warn => Some(tracing::Level::WARN),
            LogLevel::Error => Some(tracing::Level::ERROR),
            LogLevel::Silent => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Options {
    pub filter: PathFilter,
    pub normalize_eol: bool,
    pub max_text_size: u64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            filter: PathFilter::default(),
            normalize_eol: false,
            max_text_size: DEFAULT_MAX_TEXT_SIZE,
        }
    }
}

pub fn build_options(args: &Args) -> Result<Options> {
    let filter = PathFilter::with_patterns(&args.ignore).context("Invalid --ignore pattern")?;

    let mut opts = Options {
        filter,
        ..Options::default()
    };
    if let Command::File {
        normalize_eol,
        max_text_size,
        ..
    } = &args.command
    {
        let limit = parse_size(max_text_size);
        if limit == 0 {
            anyhow::bail!("Invalid --max-text-size: {max_text_size}");
        }
        opts.normalize_eol = *normalize_eol;
        opts.max_text_size = limit;
    }
    Ok(opts)
}
