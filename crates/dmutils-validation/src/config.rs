//! Validator configuration
//!
//! Values come from defaults, an optional TOML file, then `DMUTILS_*`
//! environment variables. Command-line flags are applied last by the CLI.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Result, ValidationError};

/// Default base URL of stored documents
pub const DEFAULT_DOCUMENTS_URL: &str = "https://assets.digitalmarketplace.service.gov.uk";

/// Log output format of the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(ValidationError::config(format!("Unknown log format: {}", s))),
        }
    }
}

/// Validator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Base URL that stored document paths are resolved against
    pub documents_url: String,

    /// Directory uploads are stored in; uploads stay in memory when unset
    pub store_dir: Option<PathBuf>,

    pub log_format: LogFormat,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            documents_url: DEFAULT_DOCUMENTS_URL.to_string(),
            store_dir: None,
            log_format: LogFormat::Text,
        }
    }
}

impl ValidatorConfig {
    /// Create a new config builder
    pub fn builder() -> ValidatorConfigBuilder {
        ValidatorConfigBuilder::new()
    }

    /// Load a TOML config file; missing keys keep their defaults
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::file_error(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: Self = toml::from_str(&contents)?;
        config.validated()
    }

    /// Defaults overridden by environment variables
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides()
    }

    /// Apply `DMUTILS_DOCUMENTS_URL`, `DMUTILS_STORE_DIR` and `DMUTILS_LOG_FORMAT`
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(url) = lookup("DMUTILS_DOCUMENTS_URL") {
            self.documents_url = url;
        }
        if let Some(dir) = lookup("DMUTILS_STORE_DIR") {
            self.store_dir = Some(PathBuf::from(dir));
        }
        if let Some(format) = lookup("DMUTILS_LOG_FORMAT") {
            self.log_format = format.parse()?;
        }
        self.validated()
    }

    /// Check that the documents URL can serve as a base URL
    pub fn validated(self) -> Result<Self> {
        dmutils_documents::join_document_url(&self.documents_url, "documents/").map_err(|e| {
            ValidationError::config(format!(
                "Invalid documents URL '{}': {}",
                self.documents_url, e
            ))
        })?;
        Ok(self)
    }
}

/// Builder for ValidatorConfig
pub struct ValidatorConfigBuilder {
    config: ValidatorConfig,
}

impl ValidatorConfigBuilder {
    /// Create a new builder with defaults
    pub fn new() -> Self {
        Self {
            config: ValidatorConfig::default(),
        }
    }

    pub fn documents_url(mut self, url: impl Into<String>) -> Self {
        self.config.documents_url = url.into();
        self
    }

    /// Store uploads beneath this directory
    pub fn store_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.store_dir = Some(dir.into());
        self
    }

    pub fn log_format(mut self, format: LogFormat) -> Self {
        self.config.log_format = format;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ValidatorConfig> {
        self.config.validated()
    }
}

impl Default for ValidatorConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ValidatorConfig::default();
        assert_eq!(config.documents_url, DEFAULT_DOCUMENTS_URL);
        assert_eq!(config.store_dir, None);
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_config_builder() {
        let config = ValidatorConfig::builder()
            .documents_url("https://assets.example.com")
            .store_dir("/tmp/documents")
            .log_format(LogFormat::Json)
            .build()
            .unwrap();

        assert_eq!(config.documents_url, "https://assets.example.com");
        assert_eq!(config.store_dir, Some(PathBuf::from("/tmp/documents")));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_documents_url() {
        let result = ValidatorConfig::builder().documents_url("not a url").build();
        assert!(matches!(result, Err(ValidationError::Config(_))));
    }

    #[test]
    fn test_from_toml_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dmutils.toml");
        std::fs::write(
            &path,
            "documents_url = \"https://assets.example.com\"\nlog_format = \"json\"\n",
        )
        .unwrap();

        let config = ValidatorConfig::from_toml_file(&path).unwrap();
        assert_eq!(config.documents_url, "https://assets.example.com");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.store_dir, None);
    }

    #[test]
    fn test_from_toml_file_missing() {
        let result = ValidatorConfig::from_toml_file("/nonexistent/dmutils.toml");
        assert!(matches!(result, Err(ValidationError::FileError(_))));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("DMUTILS_DOCUMENTS_URL", "https://assets.example.com"),
            ("DMUTILS_STORE_DIR", "/var/documents"),
            ("DMUTILS_LOG_FORMAT", "JSON"),
        ]
        .into_iter()
        .collect();

        let config = ValidatorConfig::default()
            .with_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.documents_url, "https://assets.example.com");
        assert_eq!(config.store_dir, Some(PathBuf::from("/var/documents")));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_bad_log_format_override() {
        let result = ValidatorConfig::default().with_overrides(|key| {
            (key == "DMUTILS_LOG_FORMAT").then(|| "xml".to_string())
        });
        assert!(matches!(result, Err(ValidationError::Config(_))));
    }
}
