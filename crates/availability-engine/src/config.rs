//! Engine configuration, loaded from JSON with per-field defaults.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{BookingError, Result};

/// How an appointment's buffer extends the time it occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BufferPolicy {
    /// Buffer follows the appointment: `[start, end + buffer)`.
    #[default]
    Trailing,
    /// Buffer on both sides: `[start - buffer, end + buffer)`.
    Symmetric,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct CacheConfig {
    pub enabled: bool,
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: 5 * 60,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct EngineConfig {
    /// Upper bound on alternative slots returned for an unavailable request.
    pub max_suggestions: usize,
    /// Days before and after the requested date searched for alternatives.
    pub suggestion_adjacent_days: u32,
    pub buffer_policy: BufferPolicy,
    pub cache: CacheConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_suggestions: 5,
            suggestion_adjacent_days: 0,
            buffer_policy: BufferPolicy::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EngineConfig =
            serde_json::from_str(json).map_err(|e| BookingError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| BookingError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.suggestion_adjacent_days > 31 {
            return Err(BookingError::Config(format!(
                "suggestion_adjacent_days must be at most 31, got {}",
                self.suggestion_adjacent_days
            )));
        }
        if self.cache.enabled && self.cache.ttl_secs == 0 {
            return Err(BookingError::Config(
                "cache.ttl_secs must be positive when the cache is enabled".to_string(),
            ));
        }
        Ok(())
    }
}
