//! Dashboard runtime configuration.
//!
//! # Responsibility
//! - Describe simulation timers, probabilities and view capacities.
//! - Load overrides from `SECUREPROFILE_*` environment variables or JSON.
//!
//! # Invariants
//! - Defaults reproduce the dashboard's stock timers.
//! - Every interval is strictly positive.
//! - Probabilities stay within `0.0..=1.0`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::time::Duration;

const ENV_PREFIX: &str = "SECUREPROFILE_";

static DURATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d+)\s*(ms|s|m)?\s*$").expect("valid duration regex"));

#[derive(Debug)]
pub enum ConfigError {
    InvalidDuration { key: String, value: String },
    InvalidNumber { key: String, value: String },
    OutOfRange { key: &'static str, detail: String },
    Json(serde_json::Error),
    Io(std::io::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDuration { key, value } => write!(
                f,
                "invalid duration `{value}` for `{key}`; expected e.g. 500ms|45s|2m"
            ),
            Self::InvalidNumber { key, value } => write!(f, "invalid number `{value}` for `{key}`"),
            Self::OutOfRange { key, detail } => write!(f, "`{key}` out of range: {detail}"),
            Self::Json(err) => write!(f, "invalid config JSON: {err}"),
            Self::Io(err) => write!(f, "failed to read config file: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Timers and capacities for one dashboard session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    #[serde(deserialize_with = "deserialize_duration")]
    pub notification_interval: Duration,
    pub notification_probability: f64,
    #[serde(deserialize_with = "deserialize_duration")]
    pub stats_interval: Duration,
    #[serde(deserialize_with = "deserialize_duration")]
    pub activity_interval: Duration,
    pub activity_capacity: usize,
    #[serde(deserialize_with = "deserialize_duration")]
    pub entry_point_interval: Duration,
    #[serde(deserialize_with = "deserialize_duration")]
    pub chart_interval: Duration,
    #[serde(deserialize_with = "deserialize_duration")]
    pub recent_arrival_delay: Duration,
    #[serde(deserialize_with = "deserialize_duration")]
    pub recent_update_interval: Duration,
    pub recent_capacity: usize,
    #[serde(deserialize_with = "deserialize_duration")]
    pub active_users_interval: Duration,
    #[serde(deserialize_with = "deserialize_duration")]
    pub toast_ttl: Duration,
    /// Fixed RNG seed for reproducible sessions.
    pub seed: Option<u64>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            notification_interval: Duration::from_secs(45),
            notification_probability: 0.3,
            stats_interval: Duration::from_secs(10),
            activity_interval: Duration::from_secs(8),
            activity_capacity: 5,
            entry_point_interval: Duration::from_secs(5),
            chart_interval: Duration::from_secs(5),
            recent_arrival_delay: Duration::from_secs(10),
            recent_update_interval: Duration::from_secs(15),
            recent_capacity: 5,
            active_users_interval: Duration::from_secs(5),
            toast_ttl: Duration::from_secs(5),
            seed: None,
        }
    }
}

impl DashboardConfig {
    /// Loads defaults overridden by `SECUREPROFILE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads defaults overridden by `lookup(<PREFIX><FIELD>)` values.
    ///
    /// Keys are upper-cased field names, e.g. `SECUREPROFILE_STATS_INTERVAL`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let get = |field: &str| {
            let key = format!("{ENV_PREFIX}{}", field.to_ascii_uppercase());
            lookup(&key).map(|value| (key, value))
        };

        for (field, slot) in [
            ("notification_interval", &mut config.notification_interval),
            ("stats_interval", &mut config.stats_interval),
            ("activity_interval", &mut config.activity_interval),
            ("entry_point_interval", &mut config.entry_point_interval),
            ("chart_interval", &mut config.chart_interval),
            ("recent_arrival_delay", &mut config.recent_arrival_delay),
            ("recent_update_interval", &mut config.recent_update_interval),
            ("active_users_interval", &mut config.active_users_interval),
            ("toast_ttl", &mut config.toast_ttl),
        ] {
            if let Some((key, value)) = get(field) {
                *slot = parse_duration(&value)
                    .ok_or(ConfigError::InvalidDuration { key, value })?;
            }
        }

        for (field, slot) in [
            ("activity_capacity", &mut config.activity_capacity),
            ("recent_capacity", &mut config.recent_capacity),
        ] {
            if let Some((key, value)) = get(field) {
                *slot = parse_number(key, value)?;
            }
        }

        if let Some((key, value)) = get("notification_probability") {
            config.notification_probability = parse_number(key, value)?;
        }
        if let Some((key, value)) = get("seed") {
            config.seed = Some(parse_number(key, value)?);
        }

        config.validate()?;
        Ok(config)
    }

    /// Parses a JSON document; missing fields keep their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.notification_probability) {
            return Err(ConfigError::OutOfRange {
                key: "notification_probability",
                detail: format!("{} is not within 0.0..=1.0", self.notification_probability),
            });
        }

        for (key, interval) in [
            ("notification_interval", self.notification_interval),
            ("stats_interval", self.stats_interval),
            ("activity_interval", self.activity_interval),
            ("entry_point_interval", self.entry_point_interval),
            ("chart_interval", self.chart_interval),
            ("recent_update_interval", self.recent_update_interval),
            ("active_users_interval", self.active_users_interval),
        ] {
            if interval.is_zero() {
                return Err(ConfigError::OutOfRange {
                    key,
                    detail: "interval must be greater than zero".to_string(),
                });
            }
        }

        if self.activity_capacity == 0 {
            return Err(ConfigError::OutOfRange {
                key: "activity_capacity",
                detail: "capacity must be at least 1".to_string(),
            });
        }
        if self.recent_capacity == 0 {
            return Err(ConfigError::OutOfRange {
                key: "recent_capacity",
                detail: "capacity must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

/// Parses `500ms`, `45s`, `2m` or a bare number of seconds.
pub fn parse_duration(value: &str) -> Option<Duration> {
    let caps = DURATION_RE.captures(value)?;
    let amount: u64 = caps.get(1)?.as_str().parse().ok()?;
    match caps.get(2).map(|unit| unit.as_str()) {
        Some("ms") => Some(Duration::from_millis(amount)),
        Some("s") | None => Some(Duration::from_secs(amount)),
        Some("m") => amount.checked_mul(60).map(Duration::from_secs),
        Some(_) => None,
    }
}

fn parse_number<T: std::str::FromStr>(key: String, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber { key, value })
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_duration(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid duration `{raw}`")))
}
