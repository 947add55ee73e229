//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use curator_extractor::ChunkConfig;
use curator_gatekeeper::GatekeeperConfig;
use curator_janitor::{AnalyzerConfig, BatchConfig, ScoringConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Everything the `curator` binary can be tuned with.
///
/// Every section is optional in the TOML file:
///
/// ```toml
/// [settings]
/// database = "/var/lib/curator/curator.db"
/// format = "json"
///
/// [chunking]
/// size = 800
///
/// [gatekeeper.duplicates]
/// very_similar_title = 0.9
///
/// [scoring]
/// keep_threshold = 75
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CuratorConfig {
    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Chunk geometry for ingest
    #[serde(default)]
    pub chunking: ChunkConfig,

    /// Duplicate, conflict and date checks
    #[serde(default)]
    pub gatekeeper: GatekeeperConfig,

    /// Score arithmetic
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Batch timing
    #[serde(default)]
    pub batch: BatchConfig,
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// SQLite database file; `~/.curator/curator.db` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
}

impl CuratorConfig {
    /// Directory holding the default config and database.
    pub fn home() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".curator"))
    }

    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        Ok(Self::home()?.join("config.toml"))
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: CuratorConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Load `explicit` if given, else the default file if it exists, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let path = Self::path()?;
        if path.exists() {
            Self::from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.chunking
            .validate()
            .map_err(|e| CliError::Config(format!("chunking: {}", e)))?;
        self.gatekeeper
            .validate()
            .map_err(|e| CliError::Config(format!("gatekeeper: {}", e)))?;
        self.scoring
            .validate()
            .map_err(|e| CliError::Config(format!("scoring: {}", e)))?;
        Ok(())
    }

    /// Database file to open.
    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.settings.database {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::home()?.join("curator.db")),
        }
    }

    /// Settings for the document analyzer.
    pub fn analyzer_config(&self) -> AnalyzerConfig {
        AnalyzerConfig {
            gatekeeper: self.gatekeeper.clone(),
            scoring: self.scoring.clone(),
            batch: self.batch.clone(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
            database: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}
