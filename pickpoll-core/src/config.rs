//! Startup configuration for a voting session.
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Persistence key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "pickpoll.session";

/// Smallest catalog that can present two consecutive disjoint rounds.
pub const MIN_CATALOG_LEN: usize = 2;

/// Errors raised when session configuration invariants are violated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} must be at least 1 (got {value})")]
    Zero { field: &'static str, value: u32 },
    #[error("storage key must not be empty")]
    BlankStorageKey,
    #[error("catalog of {len} items is too small to present distinct rounds")]
    CatalogTooSmall { len: usize },
}

/// Fixed-at-startup knobs for a session cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    /// Requested number of items per round; clamped against the catalog size.
    #[serde(default = "SessionConfig::default_presentation_size")]
    pub presentation_size: u32,
    /// Attributed clicks per session cycle before completion.
    #[serde(default = "SessionConfig::default_max_clicks")]
    pub max_clicks: u32,
    #[serde(default = "SessionConfig::default_storage_key")]
    pub storage_key: String,
}

impl SessionConfig {
    const fn default_presentation_size() -> u32 {
        4
    }

    const fn default_max_clicks() -> u32 {
        25
    }

    fn default_storage_key() -> String {
        DEFAULT_STORAGE_KEY.to_string()
    }

    /// Parse and validate configuration from JSON. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a value is out of range.
    pub fn from_json(json: &str) -> Result<Self, ConfigLoadError> {
        let cfg: Self = serde_json::from_str(json).map_err(ConfigLoadError::Json)?;
        cfg.validate().map_err(ConfigLoadError::Invalid)?;
        Ok(cfg)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.presentation_size == 0 {
            return Err(ConfigError::Zero {
                field: "presentationSize",
                value: self.presentation_size,
            });
        }
        if self.max_clicks == 0 {
            return Err(ConfigError::Zero {
                field: "maxClicks",
                value: self.max_clicks,
            });
        }
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::BlankStorageKey);
        }
        Ok(())
    }

    /// Round size actually used for a catalog: `min(configured, floor(len / 2))`.
    ///
    /// Halving guarantees that a round can always be drawn while excluding the
    /// previous round.
    ///
    /// # Errors
    ///
    /// Returns an error when the catalog holds fewer than two items.
    pub fn effective_presentation_size(&self, catalog_len: usize) -> Result<usize, ConfigError> {
        if catalog_len < MIN_CATALOG_LEN {
            return Err(ConfigError::CatalogTooSmall { len: catalog_len });
        }
        let requested = usize::try_from(self.presentation_size).unwrap_or(usize::MAX);
        Ok(requested.min(catalog_len / 2))
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            presentation_size: Self::default_presentation_size(),
            max_clicks: Self::default_max_clicks(),
            storage_key: Self::default_storage_key(),
        }
    }
}

/// Failure while loading configuration text.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("config JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(#[from] ConfigError),
}
