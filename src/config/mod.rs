//! Application configuration.
//!
//! Settings are read from an optional `labtrack.toml` file and overridden by
//! environment variables (`DATABASE_URL`, `UPLOAD_DIR`, `BIND_ADDR`), so a
//! deployment can ship a file while local runs tweak single values via `.env`.

/// Database connection and table bootstrap
pub mod database;

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default file consulted when no explicit path is given
const DEFAULT_CONFIG_FILE: &str = "labtrack.toml";

/// Resolved application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Database connection string
    pub database_url: String,
    /// Directory uploaded attachments are stored in
    pub upload_dir: PathBuf,
    /// Address the HTTP server binds to
    pub bind_addr: String,
}

/// Raw shape of `labtrack.toml`; every field optional
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    database_url: Option<String>,
    upload_dir: Option<String>,
    bind_addr: Option<String>,
}

/// Loads configuration from the given TOML file (when it exists) and applies
/// environment overrides.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let file = read_file_config(path.as_ref())?;

    let database_url = std::env::var("DATABASE_URL")
        .ok()
        .or(file.database_url)
        .unwrap_or_else(|| "sqlite://data/labtrack.sqlite?mode=rwc".to_string());

    let upload_dir = std::env::var("UPLOAD_DIR")
        .ok()
        .or(file.upload_dir)
        .unwrap_or_else(|| "uploads".to_string());

    let bind_addr = std::env::var("BIND_ADDR")
        .ok()
        .or(file.bind_addr)
        .unwrap_or_else(|| "0.0.0.0:5000".to_string());

    Ok(AppConfig {
        database_url,
        upload_dir: PathBuf::from(upload_dir),
        bind_addr,
    })
}

/// Loads configuration from the default location (`./labtrack.toml`).
pub fn load_default() -> Result<AppConfig> {
    load(DEFAULT_CONFIG_FILE)
}

fn read_file_config(path: &Path) -> Result<FileConfig> {
    if !path.exists() {
        return Ok(FileConfig::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("failed to read {}: {e}", path.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("failed to parse {}: {e}", path.display()),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_file_config() {
        let toml_str = r#"
            database_url = "sqlite://test.sqlite"
            upload_dir = "attachments"
            bind_addr = "127.0.0.1:8080"
        "#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.database_url.as_deref(),
            Some("sqlite://test.sqlite")
        );
        assert_eq!(config.upload_dir.as_deref(), Some("attachments"));
        assert_eq!(config.bind_addr.as_deref(), Some("127.0.0.1:8080"));
    }

    #[test]
    fn test_partial_file_config() {
        let config: FileConfig = toml::from_str(r#"upload_dir = "files""#).unwrap();
        assert_eq!(config.upload_dir.as_deref(), Some("files"));
        assert!(config.database_url.is_none());
        assert!(config.bind_addr.is_none());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = load("does-not-exist.toml").unwrap();
        // Env vars may be set in the test environment; only check the
        // fallbacks when they are not.
        if std::env::var("UPLOAD_DIR").is_err() {
            assert_eq!(config.upload_dir, PathBuf::from("uploads"));
        }
        if std::env::var("BIND_ADDR").is_err() {
            assert_eq!(config.bind_addr, "0.0.0.0:5000");
        }
    }
}
