//! Configuration for document analysis
//!
//! Defines the score deductions, recommendation thresholds and batch timing.

use curator_gatekeeper::GatekeeperConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Score arithmetic for a single document
///
/// # Examples
///
/// ```
/// use curator_janitor::ScoringConfig;
///
/// let config = ScoringConfig::default();
/// assert_eq!(config.base_score, 100);
/// assert_eq!(config.keep_threshold, 70);
///
/// let config = ScoringConfig::strict();
/// assert!(config.keep_threshold > 70);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Starting score before deductions
    /// Default: 100
    pub base_score: i32,

    /// Content longer than this many chars counts as useful
    /// Default: 100
    pub useful_content_length: usize,

    /// Deduction when content is too short
    pub short_content_penalty: i32,

    /// Deduction when no insurance keywords are present
    pub no_specific_info_penalty: i32,

    /// Deduction when near-duplicates exist
    pub duplicate_penalty: i32,

    /// Deduction when a validity date has passed
    pub outdated_penalty: i32,

    /// Deduction for soft date warnings
    pub date_warning_penalty: i32,

    /// Deduction when a sibling document supersedes this one
    pub newer_version_penalty: i32,

    /// Deduction when content points at another carrier
    pub wrong_company_penalty: i32,

    /// Deduction when the title omits its product or carrier
    pub title_mismatch_penalty: i32,

    /// Minimum score recommended to keep
    pub keep_threshold: u8,

    /// Minimum score recommended for review
    pub review_threshold: u8,

    /// Duplicates scoring below this are recommended for deletion
    pub duplicate_delete_threshold: u8,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_score: 100,
            useful_content_length: 100,
            short_content_penalty: 30,
            no_specific_info_penalty: 20,
            duplicate_penalty: 15,
            outdated_penalty: 25,
            date_warning_penalty: 10,
            newer_version_penalty: 20,
            wrong_company_penalty: 10,
            title_mismatch_penalty: 5,
            keep_threshold: 70,
            review_threshold: 40,
            duplicate_delete_threshold: 60,
        }
    }
}

impl ScoringConfig {
    /// Higher bar to keep a document
    pub fn strict() -> Self {
        Self {
            useful_content_length: 300,
            keep_threshold: 80,
            review_threshold: 50,
            duplicate_delete_threshold: 70,
            ..Self::default()
        }
    }

    /// Lower bar to keep a document
    pub fn lenient() -> Self {
        Self {
            useful_content_length: 50,
            keep_threshold: 60,
            review_threshold: 30,
            duplicate_delete_threshold: 45,
            ..Self::default()
        }
    }

    /// Check threshold ordering
    pub fn validate(&self) -> Result<(), String> {
        if self.keep_threshold > 100 {
            return Err(format!("keep_threshold must be at most 100, got {}", self.keep_threshold));
        }
        if self.review_threshold > self.keep_threshold {
            return Err(format!(
                "review_threshold ({}) must not exceed keep_threshold ({})",
                self.review_threshold, self.keep_threshold
            ));
        }
        let penalties = [
            self.short_content_penalty,
            self.no_specific_info_penalty,
            self.duplicate_penalty,
            self.outdated_penalty,
            self.date_warning_penalty,
            self.newer_version_penalty,
            self.wrong_company_penalty,
            self.title_mismatch_penalty,
        ];
        if penalties.iter().any(|p| *p < 0) {
            return Err("penalties must not be negative".to_string());
        }
        Ok(())
    }
}

/// Batch run timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// How long a finished run's progress channel stays open
    /// Default: 1000 ms
    pub close_delay_ms: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { close_delay_ms: 1000 }
    }
}

impl BatchConfig {
    /// Get close delay as Duration
    pub fn close_delay(&self) -> Duration {
        Duration::from_millis(self.close_delay_ms)
    }
}

/// Everything the analyzer needs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Duplicate, conflict and date checks
    pub gatekeeper: GatekeeperConfig,

    /// Score arithmetic
    pub scoring: ScoringConfig,

    /// Batch timing
    pub batch: BatchConfig,
}

impl AnalyzerConfig {
    /// Validate every section
    pub fn validate(&self) -> Result<(), String> {
        self.gatekeeper.validate()?;
        self.scoring.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ScoringConfig::default();
        assert_eq!(config.base_score, 100);
        assert_eq!(config.useful_content_length, 100);
        assert_eq!(config.short_content_penalty, 30);
        assert_eq!(config.no_specific_info_penalty, 20);
        assert_eq!(config.duplicate_penalty, 15);
        assert_eq!(config.outdated_penalty, 25);
        assert_eq!(config.date_warning_penalty, 10);
        assert_eq!(config.newer_version_penalty, 20);
        assert_eq!(config.wrong_company_penalty, 10);
        assert_eq!(config.title_mismatch_penalty, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_worst_case_reaches_zero() {
        let c = ScoringConfig::default();
        let worst = c.short_content_penalty
            + c.no_specific_info_penalty
            + c.duplicate_penalty
            + c.outdated_penalty
            + c.newer_version_penalty
            + c.wrong_company_penalty
            + c.title_mismatch_penalty;
        assert!(worst >= c.base_score);
    }

    #[test]
    fn test_presets() {
        assert!(ScoringConfig::strict().keep_threshold > ScoringConfig::default().keep_threshold);
        assert!(ScoringConfig::lenient().keep_threshold < ScoringConfig::default().keep_threshold);
        assert!(ScoringConfig::strict().validate().is_ok());
        assert!(ScoringConfig::lenient().validate().is_ok());
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let config = ScoringConfig {
            review_threshold: 80,
            ..ScoringConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duration_conversions() {
        assert_eq!(BatchConfig::default().close_delay(), Duration::from_millis(1000));
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = AnalyzerConfig::default();
        let serialized = serde_json::to_string(&config).unwrap();
        let deserialized: AnalyzerConfig = serde_json::from_str(&serialized).unwrap();
        assert_eq!(config, deserialized);

        let partial: AnalyzerConfig = serde_json::from_str(r#"{"batch": {"close_delay_ms": 0}}"#).unwrap();
        assert_eq!(partial.batch.close_delay_ms, 0);
        assert_eq!(partial.scoring, ScoringConfig::default());
    }
}
