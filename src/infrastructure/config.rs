use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::application::diff::EngineOptions;
use crate::domain::summary::MissingCountPolicy;
use crate::domain::value_objects::{Column, ColumnName};

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub left: SourceConfig,
    pub right: SourceConfig,
    pub compare: CompareConfig,
    #[serde(default)]
    pub loader: LoaderConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    /// Display name; defaults to the file stem of `path`.
    #[serde(default)]
    pub name: Option<String>,
    pub path: String,
}

impl SourceConfig {
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            Path::new(&self.path)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.path.clone())
        })
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CompareConfig {
    pub key: String,
    pub columns: Vec<Column>,
    #[serde(default)]
    pub missing_count_policy: MissingCountPolicy,
}

impl CompareConfig {
    pub fn key_column(&self) -> ColumnName {
        ColumnName(self.key.clone())
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoaderConfig {
    /// Single-byte field delimiter.
    pub delimiter: char,
    /// `chrono` format used to read date columns.
    pub date_format: String,
    /// Cell contents read as absent.
    pub null_values: Vec<String>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            date_format: "%Y-%m-%d".to_string(),
            null_values: ["", "NA", "N/A", "NaN", "nan", "null", "NULL"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EngineConfig {
    pub parallel: bool,
    pub chunk_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let defaults = EngineOptions::default();
        Self {
            parallel: defaults.parallel,
            chunk_size: defaults.chunk_size,
        }
    }
}

impl EngineConfig {
    pub fn options(&self) -> EngineOptions {
        EngineOptions {
            parallel: self.parallel,
            chunk_size: self.chunk_size,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    pub dir: String,
}

impl AppConfig {
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let cfg: AppConfig =
            toml::from_str(content).with_context(|| "Failed to parse config TOML")?;
        if !cfg.loader.delimiter.is_ascii() {
            anyhow::bail!(
                "loader.delimiter must be a single ASCII character, got {:?}",
                cfg.loader.delimiter
            );
        }
        Ok(cfg)
    }
}
