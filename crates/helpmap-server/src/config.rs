use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

/// Placeholder JWT secret used when none is configured.
pub const DEV_JWT_SECRET: &str = "dev-secret-change-me";

/// Upper bound for session token lifetime.
pub const MAX_TOKEN_TTL_DAYS: i64 = 3650;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub jwt_secret: String,
    pub token_ttl_days: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let jwt_secret = lookup("HELPMAP_JWT_SECRET").unwrap_or_default();
        let jwt_secret = if jwt_secret.is_empty() {
            warn!("HELPMAP_JWT_SECRET is unset, using the development placeholder");
            DEV_JWT_SECRET.to_string()
        } else {
            jwt_secret
        };

        let token_ttl_days = parse(&lookup, "HELPMAP_TOKEN_TTL_DAYS", 30)?;
        if !(1..=MAX_TOKEN_TTL_DAYS).contains(&token_ttl_days) {
            bail!("HELPMAP_TOKEN_TTL_DAYS must be between 1 and {MAX_TOKEN_TTL_DAYS}, got {token_ttl_days}");
        }

        Ok(Self {
            host: lookup("HELPMAP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse(&lookup, "HELPMAP_PORT", 5000)?,
            data_dir: lookup("HELPMAP_DATA_DIR")
                .unwrap_or_else(|| "data".into())
                .into(),
            jwt_secret,
            token_ttl_days,
        })
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr + Display,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("invalid {key} value: {raw:?}")),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.jwt_secret, DEV_JWT_SECRET);
        assert_eq!(config.token_ttl_days, 30);
    }

    #[test]
    fn overrides() {
        let config = config(&[
            ("HELPMAP_HOST", "127.0.0.1"),
            ("HELPMAP_PORT", "8080"),
            ("HELPMAP_DATA_DIR", "/var/lib/helpmap"),
            ("HELPMAP_JWT_SECRET", "s3cret"),
            ("HELPMAP_TOKEN_TTL_DAYS", "7"),
        ])
        .unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/helpmap"));
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.token_ttl_days, 7);
    }

    #[test]
    fn token_ttl_must_be_positive() {
        assert!(config(&[("HELPMAP_TOKEN_TTL_DAYS", "0")]).is_err());
        assert!(config(&[("HELPMAP_TOKEN_TTL_DAYS", "-1")]).is_err());
    }

    #[test]
    fn token_ttl_is_capped() {
        assert!(config(&[("HELPMAP_TOKEN_TTL_DAYS", "100000000")]).is_err());
        let max = MAX_TOKEN_TTL_DAYS.to_string();
        assert_eq!(
            config(&[("HELPMAP_TOKEN_TTL_DAYS", max.as_str())]).unwrap().token_ttl_days,
            MAX_TOKEN_TTL_DAYS
        );
    }

    #[test]
    fn bad_port_is_an_error() {
        assert!(config(&[("HELPMAP_PORT", "http")]).is_err());
    }
}
