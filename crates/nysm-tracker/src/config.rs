//! Tracker configuration

use std::time::Duration;

use nysm_viewability::ClampMode;
use serde::{Deserialize, Serialize};

/// When a timer firing should trigger a real evaluation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirtyPolicy {
    /// Every firing marks the tracker dirty.
    #[default]
    EveryInterval,
    /// Only `check()`/`trigger()` mark it dirty. The flag starts set so the
    /// first pass after start still runs.
    OnTrigger,
}

/// Tracker configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Coarse timer period
    #[serde(rename = "interval_ms", with = "millis")]
    pub interval: Duration,
    /// Start the timer as soon as something is tracked
    pub auto_start: bool,
    pub dirty_policy: DirtyPolicy,
    pub clamp_mode: ClampMode,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(200),
            auto_start: true,
            dirty_policy: DirtyPolicy::EveryInterval,
            clamp_mode: ClampMode::Geometric,
        }
    }
}

impl TrackerConfig {
    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        if config.interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(config)
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_auto_start(mut self, auto_start: bool) -> Self {
        self.auto_start = auto_start;
        self
    }

    pub fn with_dirty_policy(mut self, policy: DirtyPolicy) -> Self {
        self.dirty_policy = policy;
        self
    }

    pub fn with_clamp_mode(mut self, clamp_mode: ClampMode) -> Self {
        self.clamp_mode = clamp_mode;
        self
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid tracker config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Tracker interval must be at least 1ms")]
    ZeroInterval,
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(interval: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(interval.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TrackerConfig::default();
        assert_eq!(config.interval, Duration::from_millis(200));
        assert!(config.auto_start);
        assert_eq!(config.dirty_policy, DirtyPolicy::EveryInterval);
        assert_eq!(config.clamp_mode, ClampMode::Geometric);
    }

    #[test]
    fn test_from_json_partial() {
        let config = TrackerConfig::from_json(r#"{"interval_ms": 50, "dirty_policy": "on_trigger"}"#).unwrap();
        assert_eq!(config.interval, Duration::from_millis(50));
        assert_eq!(config.dirty_policy, DirtyPolicy::OnTrigger);
        assert!(config.auto_start);
    }

    #[test]
    fn test_from_json_roundtrip_fields() {
        let config = TrackerConfig::default()
            .with_auto_start(false)
            .with_clamp_mode(ClampMode::SwappedAxes);
        let json = serde_json::to_string(&config).unwrap();

        assert!(json.contains("\"interval_ms\":200"));
        assert!(json.contains("\"swapped_axes\""));
        assert_eq!(TrackerConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_from_json_rejects_zero_interval() {
        assert!(matches!(
            TrackerConfig::from_json(r#"{"interval_ms": 0}"#),
            Err(ConfigError::ZeroInterval)
        ));
        assert!(matches!(TrackerConfig::from_json("{"), Err(ConfigError::Parse(_))));
    }
}
