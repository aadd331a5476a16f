//! Advisor configuration

use crate::error::{ConfigError, ConfigResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default budget handed to the tempo gate
pub const DEFAULT_TEMPO_BUDGET_MINUTES: f64 = 60.0;

/// Advisor configuration
///
/// Every field is optional in TOML:
///
/// ```toml
/// tempo_budget_minutes = 45.0
/// fixed_time = "2026-04-01T12:00:00Z"
/// id_seed = 7
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdvisorConfig {
    /// Budget passed to the tempo gate
    pub tempo_budget_minutes: f64,
    /// Pin the clock to this instant
    pub fixed_time: Option<DateTime<Utc>>,
    /// Seed for reproducible id suffixes
    pub id_seed: Option<u64>,
}

impl AdvisorConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With tempo budget
    #[inline]
    #[must_use]
    pub fn with_tempo_budget(mut self, minutes: f64) -> Self {
        self.tempo_budget_minutes = minutes;
        self
    }

    /// With a pinned clock
    #[inline]
    #[must_use]
    pub fn with_fixed_time(mut self, at: DateTime<Utc>) -> Self {
        self.fixed_time = Some(at);
        self
    }

    /// With seeded id suffixes
    #[inline]
    #[must_use]
    pub fn with_id_seed(mut self, seed: u64) -> Self {
        self.id_seed = Some(seed);
        self
    }

    /// Parse and validate TOML
    pub fn from_toml_str(input: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded advisor config");
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.tempo_budget_minutes.is_finite() {
            return Err(ConfigError::Invalid {
                field: "tempo_budget_minutes",
                reason: "must be finite".to_string(),
            });
        }
        if self.tempo_budget_minutes < 0.0 {
            return Err(ConfigError::Invalid {
                field: "tempo_budget_minutes",
                reason: format!("must be non-negative, got {}", self.tempo_budget_minutes),
            });
        }
        Ok(())
    }
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            tempo_budget_minutes: DEFAULT_TEMPO_BUDGET_MINUTES,
            fixed_time: None,
            id_seed: None,
        }
    }
}
