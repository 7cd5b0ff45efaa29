//! Tracker configuration types
//!
//! This module defines the configuration the tracking engine needs: which source
//! to subscribe to, how to group signals for display, and optional replay pacing.
//! Presentation concerns (output format, files) live in the application layer.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::types::{ANALOG_INPUT_PREFIX, DIGITAL_INPUT_PREFIX, DIGITAL_OUTPUT_PREFIX};

/// Configuration for the tracking engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Source the tracker subscribes to
    #[serde(default)]
    pub selectors: SourceSelectors,

    /// Identifier prefixes used to group signals in categorized views
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,

    /// Optional delay between replayed records, in milliseconds
    #[serde(default)]
    pub replay_interval_ms: Option<u64>,
}

fn default_categories() -> Vec<String> {
    vec![
        DIGITAL_OUTPUT_PREFIX.to_string(),
        DIGITAL_INPUT_PREFIX.to_string(),
        ANALOG_INPUT_PREFIX.to_string(),
    ]
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            selectors: SourceSelectors::default(),
            categories: default_categories(),
            replay_interval_ms: None,
        }
    }
}

/// Selects the event source: a primary source and a secondary channel within it
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SourceSelectors {
    /// Primary source id (e.g. the I/O board or bus)
    pub primary: String,
    /// Secondary source id (e.g. the I/O group within the board)
    pub secondary: String,
}

impl SourceSelectors {
    /// Create a new selector pair
    pub fn new(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }
}

impl std::fmt::Display for SourceSelectors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.primary, self.secondary)
    }
}

impl TrackerConfig {
    /// Create a new tracker configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the source selectors
    pub fn with_selectors(mut self, primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        self.selectors = SourceSelectors::new(primary, secondary);
        self
    }

    /// Builder method: replace the category prefixes
    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }

    /// Builder method: add one category prefix
    pub fn add_category(mut self, prefix: impl Into<String>) -> Self {
        self.categories.push(prefix.into());
        self
    }

    /// Builder method: pace replayed records
    pub fn with_replay_interval(mut self, interval_ms: u64) -> Self {
        self.replay_interval_ms = Some(interval_ms);
        self
    }

    /// Replay pacing as a duration, if any
    pub fn replay_interval(&self) -> Option<Duration> {
        self.replay_interval_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }
}
