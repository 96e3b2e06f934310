//! Configuration for shakesearch

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::searcher::SearchOptions;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Corpus file to load at startup
    #[serde(rename = "corpus-path")]
    pub corpus_path: PathBuf,

    /// Directory served for every path other than the search endpoint
    #[serde(rename = "static-dir")]
    pub static_dir: PathBuf,

    /// Listen port (the PORT environment variable takes precedence)
    pub port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Indexing and query options
    pub search: SearchOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            corpus_path: PathBuf::from(crate::DEFAULT_CORPUS_PATH),
            static_dir: PathBuf::from(crate::DEFAULT_STATIC_DIR),
            port: crate::DEFAULT_PORT,
            log_level: None,
            search: SearchOptions::default(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    ///
    /// Explicit path, then `./shakesearch.yml`, then
    /// `~/.config/shakesearch/shakesearch.yml`, then defaults.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        for path in Self::default_paths() {
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is set up
    ///
    /// Errors are swallowed; the full [`Config::load`] reports them later.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let candidates: Vec<PathBuf> = match config_path {
            Some(path) => vec![path.clone()],
            None => Self::default_paths(),
        };
        candidates
            .iter()
            .find(|p| p.exists())
            .and_then(|p| Self::load_from_file(p).ok())
            .and_then(|c| c.log_level)
    }

    fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("shakesearch.yml")];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("shakesearch").join("shakesearch.yml"));
        }
        paths
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Port to listen on: CLI flag, then `PORT` env value, then config
    ///
    /// An unparsable `PORT` is ignored with a warning.
    pub fn resolve_port(&self, cli_port: Option<u16>, env_port: Option<&str>) -> u16 {
        if let Some(port) = cli_port {
            return port;
        }
        match env_port.filter(|s| !s.is_empty()).map(str::parse::<u16>) {
            Some(Ok(port)) => port,
            Some(Err(e)) => {
                tracing::warn!("Ignoring invalid PORT value: {}", e);
                self.port
            }
            None => self.port,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranges::StrategyKind;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.port, 3001);
        assert_eq!(config.corpus_path, PathBuf::from("completeworks.txt"));
        assert_eq!(config.search.snippet_radius, 250);
        assert_eq!(config.search.range_strategy, StrategyKind::SecondOccurrence);
    }

    #[test]
    fn test_load_partial_yaml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("shakesearch.yml");
        fs::write(
            &path,
            "corpus-path: /data/works.txt\nlog-level: debug\nsearch:\n  snippet-radius: 80\n  range-strategy: standalone-heading\n  toc:\n    terminal: THE END\n",
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.corpus_path, PathBuf::from("/data/works.txt"));
        assert_eq!(config.port, 3001);
        assert_eq!(config.search.snippet_radius, 80);
        assert_eq!(config.search.range_strategy, StrategyKind::StandaloneHeading);
        assert_eq!(config.search.toc.terminal, "THE END");
        assert_eq!(config.search.toc.heading, "Contents");
        assert_eq!(Config::load_log_level(Some(&path)).as_deref(), Some("debug"));
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("absent.yml");
        assert!(Config::load(Some(&path)).is_err());
        assert_eq!(Config::load_log_level(Some(&path)), None);
    }

    #[test]
    fn test_resolve_port_priority() {
        let config = Config::default();
        assert_eq!(config.resolve_port(Some(8080), Some("9090")), 8080);
        assert_eq!(config.resolve_port(None, Some("9090")), 9090);
        assert_eq!(config.resolve_port(None, Some("")), 3001);
        assert_eq!(config.resolve_port(None, Some("http")), 3001);
        assert_eq!(config.resolve_port(None, None), 3001);
    }

    #[test]
    fn test_workspace_config_points_at_bundled_assets() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("..");
        let config = Config::load(Some(&root.join("shakesearch.yml"))).unwrap();
        assert_eq!(config.static_dir, PathBuf::from("ss/static"));
        assert!(root.join(&config.static_dir).join("index.html").is_file());
        assert_eq!(config.corpus_path, PathBuf::from(crate::DEFAULT_CORPUS_PATH));
    }
}
