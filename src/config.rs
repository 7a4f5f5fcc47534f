//! Runtime configuration, read from the environment
//!
//! Every setting has a default so the tool works with nothing exported.

use std::path::PathBuf;
use std::time::Duration;

/// How the brief generator treats a failed feed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchPolicy {
    /// Any failed feed aborts the brief and yields the unavailable message
    #[default]
    AbortOnAnyFailure,
    /// Failed feeds become empty data; only a total outage aborts
    BestEffort,
}

impl FetchPolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "abort" | "all-or-nothing" => Some(FetchPolicy::AbortOnAnyFailure),
            "best-effort" | "partial" => Some(FetchPolicy::BestEffort),
            _ => None,
        }
    }
}

/// Settings for the brief generator
#[derive(Debug, Clone)]
pub struct BriefConfig {
    /// Base URL of the Precognition backend
    pub api_url: String,

    /// Per-request timeout; expiry counts as a fetch failure
    pub fetch_timeout: Duration,

    pub fetch_policy: FetchPolicy,

    /// Optional cap on the number of points. The posture point survives the cap.
    pub max_points: Option<usize>,

    /// Relevant themes needed before a domain counts as signal-positive
    pub min_domain_signal: usize,
}

pub const DEFAULT_API_URL: &str = "https://yc-scout.onrender.com";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_MIN_DOMAIN_SIGNAL: usize = 2;

impl Default for BriefConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            fetch_policy: FetchPolicy::default(),
            max_points: None,
            min_domain_signal: DEFAULT_MIN_DOMAIN_SIGNAL,
        }
    }
}

impl BriefConfig {
    /// Build from `PRECOGNITION_API`, `TERRAIN_FETCH_TIMEOUT_SECS`,
    /// `TERRAIN_FETCH_POLICY` and `TERRAIN_MAX_POINTS`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; invalid values fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("PRECOGNITION_API").filter(|u| !u.trim().is_empty()) {
            config.api_url = url.trim().trim_end_matches('/').to_string();
        }

        if let Some(raw) = lookup("TERRAIN_FETCH_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.fetch_timeout = Duration::from_secs(secs),
                _ => tracing::warn!("Ignoring invalid TERRAIN_FETCH_TIMEOUT_SECS={:?}", raw),
            }
        }

        if let Some(raw) = lookup("TERRAIN_FETCH_POLICY") {
            match FetchPolicy::parse(&raw) {
                Some(policy) => config.fetch_policy = policy,
                None => tracing::warn!("Ignoring invalid TERRAIN_FETCH_POLICY={:?}", raw),
            }
        }

        if let Some(raw) = lookup("TERRAIN_MAX_POINTS") {
            match raw.trim().parse::<usize>() {
                Ok(cap) if cap > 0 => config.max_points = Some(cap),
                _ => tracing::warn!("Ignoring invalid TERRAIN_MAX_POINTS={:?}", raw),
            }
        }

        config
    }
}

/// Directory holding `terrain.db`
pub fn get_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("TERRAIN_DATA_DIR") {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }
    // XDG data dir on Linux, ~/Library/Application Support on macOS
    let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("terrain")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = BriefConfig::from_lookup(|_| None);
        assert_eq!(config.api_url, "https://yc-scout.onrender.com");
        assert_eq!(config.fetch_timeout, Duration::from_secs(5));
        assert_eq!(config.fetch_policy, FetchPolicy::AbortOnAnyFailure);
        assert_eq!(config.max_points, None);
        assert_eq!(config.min_domain_signal, 2);
    }

    #[test]
    fn test_overrides() {
        let config = BriefConfig::from_lookup(lookup_from(&[
            ("PRECOGNITION_API", "https://precog.example.com/"),
            ("TERRAIN_FETCH_TIMEOUT_SECS", "2"),
            ("TERRAIN_FETCH_POLICY", "best-effort"),
            ("TERRAIN_MAX_POINTS", "5"),
        ]));
        assert_eq!(config.api_url, "https://precog.example.com");
        assert_eq!(config.fetch_timeout, Duration::from_secs(2));
        assert_eq!(config.fetch_policy, FetchPolicy::BestEffort);
        assert_eq!(config.max_points, Some(5));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = BriefConfig::from_lookup(lookup_from(&[
            ("TERRAIN_FETCH_TIMEOUT_SECS", "soon"),
            ("TERRAIN_FETCH_POLICY", "yolo"),
            ("TERRAIN_MAX_POINTS", "0"),
        ]));
        assert_eq!(config.fetch_timeout, Duration::from_secs(5));
        assert_eq!(config.fetch_policy, FetchPolicy::AbortOnAnyFailure);
        assert_eq!(config.max_points, None);
    }
}
