//! Gatekeeper configuration

use serde::{Deserialize, Serialize};

/// Configuration for upload review and the individual checks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatekeeperConfig {
    /// Run duplicate detection
    pub check_duplicates: bool,

    /// Run conflict detection against related documents
    pub check_conflicts: bool,

    /// Run date validation
    pub check_dates: bool,

    /// Duplicate detection thresholds
    pub duplicates: DuplicateThresholds,

    /// Date validation windows
    pub dates: DateConfig,
}

impl Default for GatekeeperConfig {
    fn default() -> Self {
        Self {
            check_duplicates: true,
            check_conflicts: true,
            check_dates: true,
            duplicates: DuplicateThresholds::default(),
            dates: DateConfig::default(),
        }
    }
}

impl GatekeeperConfig {
    /// Create a strict configuration (flags more candidates)
    pub fn strict() -> Self {
        Self {
            duplicates: DuplicateThresholds::strict(),
            dates: DateConfig {
                expiring_soon_days: 60,
                monitor_days: 180,
                stale_version_days: 180,
                ..DateConfig::default()
            },
            ..Self::default()
        }
    }

    /// Create a lenient configuration (only near-certain findings)
    pub fn lenient() -> Self {
        Self {
            check_conflicts: false,
            duplicates: DuplicateThresholds::lenient(),
            dates: DateConfig {
                expiring_soon_days: 7,
                monitor_days: 30,
                stale_version_days: 720,
                ..DateConfig::default()
            },
            ..Self::default()
        }
    }

    /// Check that every threshold is a similarity in [0, 1]
    pub fn validate(&self) -> Result<(), String> {
        self.duplicates.validate()
    }
}

/// Similarity thresholds for duplicate detection
///
/// Every comparison is strict (`>`), so a threshold of 1.0 disables its path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuplicateThresholds {
    /// Title similarity that alone confirms a duplicate
    pub very_similar_title: f64,

    /// Title similarity that triggers the keyword comparison
    pub title_keyword_gate: f64,

    /// Keyword Jaccard index that confirms a duplicate
    pub title_keyword_jaccard: f64,

    /// Number of top keywords taken from each title
    pub title_keyword_count: usize,

    /// Cosine similarity that alone confirms a duplicate
    pub identical_content: f64,

    /// Cosine similarity that triggers the key-phrase comparison
    pub key_phrase_gate: f64,

    /// Edit similarity for two key phrases to count as matching
    pub key_phrase_pair: f64,

    /// Fraction of matched key phrases that confirms a duplicate
    pub key_phrase_fraction: f64,

    /// Content size ratio for the size+title heuristic
    pub size_ratio: f64,

    /// Title similarity for the size+title heuristic
    pub size_title: f64,
}

impl Default for DuplicateThresholds {
    fn default() -> Self {
        Self {
            very_similar_title: 0.85,
            title_keyword_gate: 0.70,
            title_keyword_jaccard: 0.80,
            title_keyword_count: 10,
            identical_content: 0.90,
            key_phrase_gate: 0.75,
            key_phrase_pair: 0.80,
            key_phrase_fraction: 0.80,
            size_ratio: 0.95,
            size_title: 0.60,
        }
    }
}

impl DuplicateThresholds {
    /// Lower thresholds
    pub fn strict() -> Self {
        Self {
            very_similar_title: 0.80,
            title_keyword_gate: 0.60,
            title_keyword_jaccard: 0.70,
            identical_content: 0.85,
            key_phrase_gate: 0.65,
            key_phrase_fraction: 0.70,
            size_ratio: 0.90,
            size_title: 0.50,
            ..Self::default()
        }
    }

    /// Higher thresholds
    pub fn lenient() -> Self {
        Self {
            very_similar_title: 0.92,
            title_keyword_gate: 0.80,
            title_keyword_jaccard: 0.90,
            identical_content: 0.95,
            key_phrase_gate: 0.85,
            key_phrase_fraction: 0.90,
            size_ratio: 0.98,
            size_title: 0.75,
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<(), String> {
        let named = [
            ("very_similar_title", self.very_similar_title),
            ("title_keyword_gate", self.title_keyword_gate),
            ("title_keyword_jaccard", self.title_keyword_jaccard),
            ("identical_content", self.identical_content),
            ("key_phrase_gate", self.key_phrase_gate),
            ("key_phrase_pair", self.key_phrase_pair),
            ("key_phrase_fraction", self.key_phrase_fraction),
            ("size_ratio", self.size_ratio),
            ("size_title", self.size_title),
        ];
        for (name, value) in named {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("duplicates.{} must be within [0, 1], got {}", name, value));
            }
        }
        if self.title_keyword_count == 0 {
            return Err("duplicates.title_keyword_count must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Windows used by date validation, in days
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateConfig {
    /// Expiry/effective dates closer than this produce a soft warning
    pub expiring_soon_days: i64,

    /// Dates closer than this produce a "monitor" recommendation
    pub monitor_days: i64,

    /// Version dates older than this produce a soft warning
    pub stale_version_days: i64,

    /// Characters of context kept on each side of a date
    pub context_radius: usize,
}

impl Default for DateConfig {
    fn default() -> Self {
        Self {
            expiring_soon_days: 30,
            monitor_days: 90,
            stale_version_days: 360,
            context_radius: 50,
        }
    }
}
