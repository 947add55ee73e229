//! Configuration for chunking

use serde::{Deserialize, Serialize};

/// Default window size in characters
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Default overlap with the previous window in characters
pub const DEFAULT_CHUNK_OVERLAP: usize = 50;

/// Window geometry for the fixed-size chunker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkConfig {
    /// Window size (characters)
    #[serde(default = "default_size")]
    pub size: usize,

    /// Characters shared with the previous window
    #[serde(default = "default_overlap")]
    pub overlap: usize,
}

fn default_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_overlap() -> usize {
    DEFAULT_CHUNK_OVERLAP
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

impl ChunkConfig {
    /// Distance between the starts of consecutive windows
    pub fn stride(&self) -> usize {
        self.size - self.overlap
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.size == 0 {
            return Err("size must be greater than 0".to_string());
        }
        if self.overlap >= self.size {
            return Err(format!(
                "overlap ({}) must be smaller than size ({})",
                self.overlap, self.size
            ));
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ChunkConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.stride(), 450);
    }

    #[test]
    fn test_zero_size_is_invalid() {
        let config = ChunkConfig { size: 0, overlap: 0 };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overlap_must_be_smaller_than_size() {
        let config = ChunkConfig { size: 50, overlap: 50 };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ChunkConfig { size: 300, overlap: 30 };
        let parsed = ChunkConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let parsed = ChunkConfig::from_toml("size = 200").unwrap();
        assert_eq!(parsed.size, 200);
        assert_eq!(parsed.overlap, DEFAULT_CHUNK_OVERLAP);
    }
}
