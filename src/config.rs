//! Gate timing configuration.
//!
//! Environment variables:
//! - `AUTH_GATE_MIN_DELAY_MS`: minimum splash duration (default: 1000)
//! - `AUTH_GATE_DEADLINE_MS`: deadline for login and citizenship, `0` disables
//!   (default: 30000)

use std::time::Duration;
use serde::{Deserialize, Serialize};

/// Env var for the minimum splash duration.
pub const MIN_DELAY_ENV: &str = "AUTH_GATE_MIN_DELAY_MS";

/// Env var for the probe deadline.
pub const DEADLINE_ENV: &str = "AUTH_GATE_DEADLINE_MS";

/// Default minimum splash duration.
pub const DEFAULT_MIN_DELAY: Duration = Duration::from_millis(1000);

/// Default deadline for the login and citizenship checks.
pub const DEFAULT_PROBE_DEADLINE: Duration = Duration::from_secs(30);

/// Configuration error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A variable was set but could not be parsed.
    #[error("Invalid value for {key}: {value:?} (expected milliseconds)")]
    InvalidValue {
        /// Variable name.
        key: &'static str,
        /// Raw value.
        value: String,
    },
}

/// Timing for one gate evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateConfig {
    /// The gate never resolves sooner than this.
    pub min_delay: Duration,
    /// Shared deadline for login and citizenship. `None` waits forever.
    pub probe_deadline: Option<Duration>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            min_delay: DEFAULT_MIN_DELAY,
            probe_deadline: Some(DEFAULT_PROBE_DEADLINE),
        }
    }
}

impl GateConfig {
    /// Set the minimum delay.
    pub fn with_min_delay(mut self, min_delay: Duration) -> Self {
        self.min_delay = min_delay;
        self
    }

    /// Set or clear the probe deadline.
    pub fn with_probe_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.probe_deadline = deadline;
        self
    }

    /// Deadline actually applied: never shorter than the minimum delay.
    pub fn effective_deadline(&self) -> Option<Duration> {
        self.probe_deadline.map(|d| d.max(self.min_delay))
    }

    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(ms) = parse_millis(&lookup, MIN_DELAY_ENV)? {
            config.min_delay = Duration::from_millis(ms);
        }

        if let Some(ms) = parse_millis(&lookup, DEADLINE_ENV)? {
            config.probe_deadline = (ms > 0).then(|| Duration::from_millis(ms));
        }

        if config.probe_deadline.is_none() {
            tracing::warn!("Probe deadline disabled; a hung collaborator blocks the gate");
        }

        Ok(config)
    }
}

/// Read a millisecond duration from the process environment.
///
/// Unset yields `None`; an unparsable value is a `ConfigError`.
pub fn env_millis(key: &'static str) -> Result<Option<Duration>, ConfigError> {
    lookup_millis(&|key: &str| std::env::var(key).ok(), key)
}

/// Read a millisecond duration through an arbitrary variable lookup.
pub fn lookup_millis<F>(lookup: &F, key: &'static str) -> Result<Option<Duration>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    Ok(parse_millis(lookup, key)?.map(Duration::from_millis))
}

fn parse_millis<F>(lookup: &F, key: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = GateConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, GateConfig::default());
        assert_eq!(config.min_delay, Duration::from_millis(1000));
    }

    #[test]
    fn test_env_overrides() {
        let config = GateConfig::from_lookup(lookup(&[
            (MIN_DELAY_ENV, "250"),
            (DEADLINE_ENV, "5000"),
        ]))
        .unwrap();
        assert_eq!(config.min_delay, Duration::from_millis(250));
        assert_eq!(config.probe_deadline, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_zero_deadline_disables() {
        let config = GateConfig::from_lookup(lookup(&[(DEADLINE_ENV, "0")])).unwrap();
        assert_eq!(config.probe_deadline, None);
        assert_eq!(config.effective_deadline(), None);
    }

    #[test]
    fn test_invalid_value() {
        let err = GateConfig::from_lookup(lookup(&[(MIN_DELAY_ENV, "soon")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue { key: MIN_DELAY_ENV, value: "soon".to_string() }
        );
    }

    #[test]
    fn test_deadline_never_below_min_delay() {
        let config = GateConfig::default()
            .with_min_delay(Duration::from_secs(2))
            .with_probe_deadline(Some(Duration::from_millis(500)));
        assert_eq!(config.effective_deadline(), Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_lookup_millis() {
        let vars = lookup(&[("SIM_LOGIN_DELAY_MS", "300"), ("BAD_DELAY_MS", "3s")]);

        assert_eq!(
            lookup_millis(&vars, "SIM_LOGIN_DELAY_MS").unwrap(),
            Some(Duration::from_millis(300))
        );
        assert_eq!(lookup_millis(&vars, "UNSET_DELAY_MS").unwrap(), None);
        assert_eq!(
            lookup_millis(&vars, "BAD_DELAY_MS").unwrap_err(),
            ConfigError::InvalidValue { key: "BAD_DELAY_MS", value: "3s".to_string() }
        );
    }
}
