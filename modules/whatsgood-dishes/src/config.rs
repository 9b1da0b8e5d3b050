use std::env;
use std::time::Duration;

use thiserror::Error;
use tracing::info;

const DEFAULT_RADIUS_MILES: f64 = 5.0;
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Settings the query controller needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryConfig {
    /// Upper bound on one strategy call. Expiry is reported as a timeout
    /// error like any other failed read.
    pub fetch_timeout: Duration,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub default_radius_miles: f64,
    pub query: QueryConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from any key lookup. `from_env` is this over the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let default_radius_miles = match lookup("WHATSGOOD_DEFAULT_RADIUS_MILES") {
            Some(raw) => parse_positive_f64("WHATSGOOD_DEFAULT_RADIUS_MILES", &raw)?,
            None => DEFAULT_RADIUS_MILES,
        };

        let fetch_timeout_secs = match lookup("WHATSGOOD_FETCH_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                    key: "WHATSGOOD_FETCH_TIMEOUT_SECS",
                    reason: format!("expected whole seconds, got {raw:?}"),
                })?;
                if secs == 0 {
                    return Err(ConfigError::Invalid {
                        key: "WHATSGOOD_FETCH_TIMEOUT_SECS",
                        reason: "must be greater than zero".to_string(),
                    });
                }
                secs
            }
            None => DEFAULT_FETCH_TIMEOUT_SECS,
        };

        Ok(Self {
            supabase_url: required("SUPABASE_URL")?,
            supabase_anon_key: required("SUPABASE_ANON_KEY")?,
            default_radius_miles,
            query: QueryConfig {
                fetch_timeout: Duration::from_secs(fetch_timeout_secs),
            },
        })
    }

    /// Log the effective configuration with secrets redacted.
    pub fn log_redacted(&self) {
        info!(
            supabase_url = %self.supabase_url,
            supabase_anon_key = redact(&self.supabase_anon_key),
            default_radius_miles = self.default_radius_miles,
            fetch_timeout_secs = self.query.fetch_timeout.as_secs(),
            "Loaded configuration"
        );
    }
}

fn parse_positive_f64(key: &'static str, raw: &str) -> Result<f64, ConfigError> {
    let value: f64 = raw.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        reason: format!("expected a number, got {raw:?}"),
    })?;
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::Invalid {
            key,
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(value)
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<empty>"
    } else {
        "<redacted>"
    }
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
    fn defaults_apply_when_optional_keys_are_absent() {
        let config = Config::from_lookup(lookup(&[
            ("SUPABASE_URL", "https://abc.supabase.co"),
            ("SUPABASE_ANON_KEY", "anon"),
        ]))
        .unwrap();

        assert_eq!(config.default_radius_miles, 5.0);
        assert_eq!(config.query.fetch_timeout, Duration::from_secs(15));
    }

    #[test]
    fn missing_url_is_reported_by_name() {
        let err = Config::from_lookup(lookup(&[("SUPABASE_ANON_KEY", "anon")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("SUPABASE_URL"));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let err = Config::from_lookup(lookup(&[
            ("SUPABASE_URL", "https://abc.supabase.co"),
            ("SUPABASE_ANON_KEY", "  "),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing("SUPABASE_ANON_KEY"));
    }

    #[test]
    fn overrides_are_validated() {
        let base = [
            ("SUPABASE_URL", "https://abc.supabase.co"),
            ("SUPABASE_ANON_KEY", "anon"),
        ];

        let mut pairs = base.to_vec();
        pairs.push(("WHATSGOOD_DEFAULT_RADIUS_MILES", "0"));
        assert!(matches!(
            Config::from_lookup(lookup(&pairs)),
            Err(ConfigError::Invalid { key: "WHATSGOOD_DEFAULT_RADIUS_MILES", .. })
        ));

        let mut pairs = base.to_vec();
        pairs.push(("WHATSGOOD_FETCH_TIMEOUT_SECS", "soon"));
        assert!(matches!(
            Config::from_lookup(lookup(&pairs)),
            Err(ConfigError::Invalid { key: "WHATSGOOD_FETCH_TIMEOUT_SECS", .. })
        ));

        let mut pairs = base.to_vec();
        pairs.push(("WHATSGOOD_DEFAULT_RADIUS_MILES", "12.5"));
        pairs.push(("WHATSGOOD_FETCH_TIMEOUT_SECS", "3"));
        let config = Config::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.default_radius_miles, 12.5);
        assert_eq!(config.query.fetch_timeout, Duration::from_secs(3));
    }
}
