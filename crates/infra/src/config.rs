//! Configuration loading from the environment.

use std::time::Duration;

use thiserror::Error;

use hirelens_analysis::{CoordinatorConfig, ErrorMarkers};

use crate::persisted::postgres::DEFAULT_POSTINGS_TABLE;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a non-negative integer (milliseconds), got {value:?}")]
    InvalidMillis { key: &'static str, value: String },

    #[error("{key} must not be empty")]
    Empty { key: &'static str },
}

/// Process settings for the analysis service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub bind_addr: String,
    pub backend_url: String,
    pub backend_token: Option<String>,
    pub backend_timeout: Duration,
    pub cooldown: Duration,
    pub error_markers: Vec<String>,
    /// Absent means the in-memory persisted store is used.
    pub database_url: Option<String>,
    pub postings_table: String,
}

impl Default for Settings {
    fn default() -> Self {
        let coordinator = CoordinatorConfig::default();
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            backend_url: "http://localhost:8000".to_string(),
            backend_token: None,
            backend_timeout: coordinator.backend_timeout,
            cooldown: coordinator.cooldown,
            error_markers: coordinator.error_markers.as_slice().to_vec(),
            database_url: None,
            postings_table: DEFAULT_POSTINGS_TABLE.to_string(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup. Unset or blank keys keep their default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut settings = Self::default();

        if let Some(v) = get("HIRELENS_BIND_ADDR") {
            settings.bind_addr = v;
        }
        if let Some(v) = get("HIRELENS_BACKEND_URL") {
            settings.backend_url = v;
        }
        settings.backend_token = get("HIRELENS_BACKEND_TOKEN");
        if let Some(v) = get("HIRELENS_BACKEND_TIMEOUT_MS") {
            settings.backend_timeout = parse_millis("HIRELENS_BACKEND_TIMEOUT_MS", &v)?;
        }
        if let Some(v) = get("HIRELENS_COOLDOWN_MS") {
            settings.cooldown = parse_millis("HIRELENS_COOLDOWN_MS", &v)?;
        }
        if let Some(v) = get("HIRELENS_ERROR_MARKERS") {
            let markers: Vec<String> = v
                .split(',')
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
                .collect();
            if markers.is_empty() {
                return Err(ConfigError::Empty {
                    key: "HIRELENS_ERROR_MARKERS",
                });
            }
            settings.error_markers = markers;
        }
        settings.database_url = get("DATABASE_URL");
        if let Some(v) = get("HIRELENS_POSTINGS_TABLE") {
            settings.postings_table = v;
        }

        Ok(settings)
    }

    pub fn coordinator_config(&self) -> CoordinatorConfig {
        CoordinatorConfig::default()
            .with_cooldown(self.cooldown)
            .with_backend_timeout(self.backend_timeout)
            .with_error_markers(ErrorMarkers::new(self.error_markers.iter().cloned()))
    }
}

fn parse_millis(key: &'static str, value: &str) -> Result<Duration, ConfigError> {
    value
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| ConfigError::InvalidMillis {
            key,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_coordinator_contract() {
        let s = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(s.cooldown, Duration::from_millis(60_000));
        assert_eq!(s.backend_timeout, Duration::from_millis(30_000));
        assert_eq!(s.error_markers, vec!["오류", "실패"]);
        assert!(s.database_url.is_none());
        assert_eq!(s.postings_table, "job_postings");
    }

    #[test]
    fn overrides_are_applied() {
        let s = Settings::from_lookup(lookup(&[
            ("HIRELENS_BACKEND_URL", "http://analysis:9000"),
            ("HIRELENS_BACKEND_TOKEN", "secret"),
            ("HIRELENS_COOLDOWN_MS", "1500"),
            ("HIRELENS_ERROR_MARKERS", "error, failed ,"),
            ("DATABASE_URL", "postgres://localhost/hirelens"),
        ]))
        .unwrap();

        assert_eq!(s.backend_url, "http://analysis:9000");
        assert_eq!(s.backend_token.as_deref(), Some("secret"));
        assert_eq!(s.cooldown, Duration::from_millis(1500));
        assert_eq!(s.error_markers, vec!["error", "failed"]);

        let config = s.coordinator_config();
        assert!(config.error_markers.matches("request failed"));
        assert!(!config.error_markers.matches("처리 실패"));
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let err = Settings::from_lookup(lookup(&[("HIRELENS_BACKEND_TIMEOUT_MS", "soon")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidMillis {
                key: "HIRELENS_BACKEND_TIMEOUT_MS",
                value: "soon".into()
            }
        );
    }

    #[test]
    fn marker_list_of_only_separators_is_rejected() {
        let err = Settings::from_lookup(lookup(&[("HIRELENS_ERROR_MARKERS", " , ,")])).unwrap_err();
        assert!(matches!(err, ConfigError::Empty { .. }));
    }
}
