use chrono::Duration;
use std::{num::NonZeroU32, path::PathBuf, str::FromStr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has invalid value {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Dev,
    Prod,
}

/// Runtime settings, read from the environment (after `.env` is loaded).
#[derive(Clone)]
pub struct Config {
    pub jwt_secret: String,
    /// API key the payment webhook presents as `Authorization: ApiKey <key>`.
    pub polka_key: String,
    pub db_path: PathBuf,
    pub bind_addr: String,
    pub platform: Platform,
    /// Wipe the database before serving. Meant for local debugging.
    pub reset_on_start: bool,
    pub fileserver_root: PathBuf,
    pub login_attempts_per_minute: NonZeroU32,
    /// Tracked login keys above which idle entries are pruned.
    pub login_limiter_max_keys: usize,
    pub max_concurrent_requests: usize,
    pub bcrypt_cost: u32,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let platform = match lookup("PLATFORM").as_deref() {
            None | Some("") | Some("prod") => Platform::Prod,
            Some("dev") => Platform::Dev,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "PLATFORM",
                    value: other.to_owned(),
                });
            }
        };

        Ok(Self {
            jwt_secret: required("JWT_SECRET")?,
            polka_key: required("POLKA_KEY")?,
            db_path: lookup("DB_PATH")
                .unwrap_or_else(|| "database.json".into())
                .into(),
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:8080".into()),
            platform,
            reset_on_start: parse_or(&lookup, "DEBUG_RESET_ON_START", false)?,
            fileserver_root: lookup("FILESERVER_ROOT").unwrap_or_else(|| ".".into()).into(),
            login_attempts_per_minute: parse_or(
                &lookup,
                "LOGIN_ATTEMPTS_PER_MINUTE",
                NonZeroU32::new(10).unwrap_or(NonZeroU32::MIN),
            )?,
            login_limiter_max_keys: parse_or(&lookup, "LOGIN_LIMITER_MAX_KEYS", 10_000)?,
            max_concurrent_requests: parse_or(&lookup, "MAX_CONCURRENT_REQUESTS", 1024)?,
            bcrypt_cost: parse_or(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            access_token_ttl: Duration::seconds(parse_or(
                &lookup,
                "ACCESS_TOKEN_TTL_SECONDS",
                60 * 60,
            )?),
            refresh_token_ttl: Duration::seconds(parse_or(
                &lookup,
                "REFRESH_TOKEN_TTL_SECONDS",
                60 * 24 * 60 * 60,
            )?),
        })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(value) if value.is_empty() => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply() {
        let config = config(&[("JWT_SECRET", "s"), ("POLKA_KEY", "k")]).unwrap();
        assert_eq!(config.db_path, PathBuf::from("database.json"));
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.platform, Platform::Prod);
        assert!(!config.reset_on_start);
        assert_eq!(config.login_attempts_per_minute.get(), 10);
        assert_eq!(config.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert_eq!(config.login_limiter_max_keys, 10_000);
        assert_eq!(config.access_token_ttl, Duration::hours(1));
        assert_eq!(config.refresh_token_ttl, Duration::days(60));
    }

    #[test]
    fn secrets_are_required() {
        assert!(matches!(
            config(&[("POLKA_KEY", "k")]),
            Err(ConfigError::Missing("JWT_SECRET"))
        ));
        assert!(matches!(
            config(&[("JWT_SECRET", "s"), ("POLKA_KEY", "")]),
            Err(ConfigError::Missing("POLKA_KEY"))
        ));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = config(&[
            ("JWT_SECRET", "s"),
            ("POLKA_KEY", "k"),
            ("PLATFORM", "dev"),
            ("DEBUG_RESET_ON_START", "true"),
            ("DB_PATH", "/tmp/chirpy.json"),
            ("BCRYPT_COST", "4"),
            ("ACCESS_TOKEN_TTL_SECONDS", "900"),
        ])
        .unwrap();
        assert_eq!(config.platform, Platform::Dev);
        assert!(config.reset_on_start);
        assert_eq!(config.db_path, PathBuf::from("/tmp/chirpy.json"));
        assert_eq!(config.bcrypt_cost, 4);
        assert_eq!(config.access_token_ttl, Duration::minutes(15));
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(matches!(
            config(&[("JWT_SECRET", "s"), ("POLKA_KEY", "k"), ("PLATFORM", "staging")]),
            Err(ConfigError::Invalid { key: "PLATFORM", .. })
        ));
        assert!(matches!(
            config(&[
                ("JWT_SECRET", "s"),
                ("POLKA_KEY", "k"),
                ("LOGIN_ATTEMPTS_PER_MINUTE", "0")
            ]),
            Err(ConfigError::Invalid { .. })
        ));
    }
}
