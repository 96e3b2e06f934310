//! ShakeSearch - CLI entry point
//!
//! Loads the corpus once, then either serves HTTP queries or answers a
//! single query from the command line.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::{debug, info};

use shakesearch::cli::{Cli, Command, OutputFormat};
use shakesearch::config::Config;
use shakesearch::server::{self, TitledSnippet};
use shakesearch::{SearchOptions, Searcher};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level).map(str::to_uppercase).as_deref() {
        Some("TRACE") => tracing::Level::TRACE,
        Some("DEBUG") => tracing::Level::DEBUG,
        Some("INFO") | None => tracing::Level::INFO,
        Some("WARN") | Some("WARNING") => tracing::Level::WARN,
        Some("ERROR") => tracing::Level::ERROR,
        Some(other) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", other);
            tracing::Level::INFO
        }
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .try_init()
        .map_err(|e| eyre::eyre!("{}", e))?;

    debug!("Logging initialized (level: {:?})", level);
    Ok(())
}

fn load_searcher(corpus: Option<PathBuf>, config: &Config, options: &SearchOptions) -> Result<Searcher> {
    let path = corpus.unwrap_or_else(|| config.corpus_path.clone());
    Searcher::load(&path, options).context(format!("Failed to load corpus from {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Serve {
            corpus,
            static_dir,
            port,
        } => {
            let searcher = Arc::new(load_searcher(corpus, &config, &config.search)?);
            let static_dir = static_dir.unwrap_or_else(|| config.static_dir.clone());
            let port = config.resolve_port(port, std::env::var("PORT").ok().as_deref());
            let addr = SocketAddr::from(([0, 0, 0, 0], port));

            info!(titles = searcher.titles().len(), static_dir = %static_dir.display(), "Starting server");
            println!("Listening on port {}...", port.to_string().cyan());
            server::serve(searcher, &static_dir, addr).await?;
        }
        Command::Search {
            query,
            corpus,
            limit,
            no_titles,
            format,
        } => {
            let searcher = load_searcher(corpus, &config, &config.search)?;

            if no_titles {
                let mut snippets = searcher.search_snippets(&query);
                if let Some(limit) = limit {
                    snippets.truncate(limit);
                }
                match format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&snippets)?),
                    OutputFormat::Text => {
                        if snippets.is_empty() {
                            println!("No matches found");
                        }
                        for snippet in snippets {
                            println!("{}", snippet);
                            println!("{}", "---".dimmed());
                        }
                    }
                }
                return Ok(());
            }

            let mut matches = searcher.search(&query);
            if let Some(limit) = limit {
                matches.truncate(limit);
            }

            match format {
                OutputFormat::Json => {
                    let results: Vec<TitledSnippet> = matches.into_iter().map(TitledSnippet::from).collect();
                    println!("{}", serde_json::to_string_pretty(&results)?);
                }
                OutputFormat::Text => {
                    if matches.is_empty() {
                        println!("No matches found");
                    }
                    for m in matches {
                        let title = if m.title.is_empty() { "?" } else { m.title.as_str() };
                        println!("{} {}", title.yellow(), m.offset.to_string().dimmed());
                        println!("{}", m.snippet);
                        println!("{}", "---".dimmed());
                    }
                }
            }
        }
        Command::Titles { corpus, strategy } => {
            let mut options = config.search.clone();
            if let Some(strategy) = strategy {
                options.range_strategy = strategy;
            }
            let searcher = load_searcher(corpus, &config, &options)?;

            for (title, start) in searcher.titles().iter().zip(searcher.ranges().raw()) {
                let column = format!("{:>10}", start);
                if start < 0 {
                    println!("{} {}", column.red(), title);
                } else {
                    println!("{} {}", column.dimmed(), title);
                }
            }
            println!(
                "{} titles, {} unresolved",
                searcher.titles().len(),
                searcher.ranges().unresolved()
            );
        }
    }

    Ok(())
}
