//! CLI argument parsing for shakesearch

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::ranges::StrategyKind;

#[derive(Parser, Debug)]
#[command(name = "ss")]
#[command(author, version, about = "Substring search over the complete works", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the search endpoint and static files
    Serve {
        /// Corpus file (default: from config)
        #[arg(long)]
        corpus: Option<PathBuf>,

        /// Static files directory (default: from config)
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Listen port (default: $PORT, then config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Run a single query and print the matches
    Search {
        /// Text to search for (case-insensitive)
        #[arg(required = true)]
        query: String,

        /// Corpus file (default: from config)
        #[arg(long)]
        corpus: Option<PathBuf>,

        /// Maximum matches to print
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print snippets only, skipping title attribution
        #[arg(long)]
        no_titles: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List extracted titles with their content start offsets
    Titles {
        /// Corpus file (default: from config)
        #[arg(long)]
        corpus: Option<PathBuf>,

        /// Range resolution strategy (default: from config)
        #[arg(short, long, value_enum)]
        strategy: Option<StrategyKind>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
