// Application configuration
// Read once at startup from the environment (after dotenv has loaded `.env`)

use crate::auth::token::DEFAULT_TOKEN_TTL_SECS;
use chrono_tz::Tz;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set in environment")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Runtime configuration of the menu API
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_ttl_secs: i64,
    /// IANA zone used for "today" and opening hours
    pub timezone: Tz,
    pub rotation_period: Duration,
    pub eligibility_refresh: Duration,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let parsed = |name: &'static str, default: &str| -> Result<u64, ConfigError> {
            let value = lookup(name).unwrap_or_else(|| default.to_string());
            value
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid { name, value })
        };

        let timezone_name = lookup("RESTAURANT_TIMEZONE").unwrap_or_else(|| "America/Sao_Paulo".to_string());
        let timezone: Tz = timezone_name.parse().map_err(|_| ConfigError::Invalid {
            name: "RESTAURANT_TIMEZONE",
            value: timezone_name.clone(),
        })?;

        // tokio intervals panic on a zero period
        let period = |name: &'static str, default: &str| -> Result<Duration, ConfigError> {
            match parsed(name, default)? {
                0 => Err(ConfigError::Invalid {
                    name,
                    value: "0".to_string(),
                }),
                secs => Ok(Duration::from_secs(secs)),
            }
        };

        let jwt_ttl_secs = parsed("JWT_TTL_SECS", &DEFAULT_TOKEN_TTL_SECS.to_string())?;
        let jwt_ttl_secs = i64::try_from(jwt_ttl_secs).map_err(|_| ConfigError::Invalid {
            name: "JWT_TTL_SECS",
            value: jwt_ttl_secs.to_string(),
        })?;

        let port = parsed("PORT", "8080")?;
        let port = u16::try_from(port).map_err(|_| ConfigError::Invalid {
            name: "PORT",
            value: port.to_string(),
        })?;

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            jwt_secret: required("JWT_SECRET")?,
            jwt_ttl_secs,
            timezone,
            rotation_period: period("ROTATION_PERIOD_SECS", "5")?,
            eligibility_refresh: period("ELIGIBILITY_REFRESH_SECS", "60")?,
            admin_email: lookup("ADMIN_EMAIL").filter(|v| !v.is_empty()),
            admin_password: lookup("ADMIN_PASSWORD").filter(|v| !v.is_empty()),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
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
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/menu"),
            ("JWT_SECRET", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.jwt_ttl_secs, 28_800);
        assert_eq!(config.timezone, chrono_tz::America::Sao_Paulo);
        assert_eq!(config.rotation_period, Duration::from_secs(5));
        assert_eq!(config.eligibility_refresh, Duration::from_secs(60));
        assert!(config.admin_email.is_none());
    }

    #[test]
    fn test_missing_required() {
        let result = AppConfig::from_lookup(lookup_from(&[("JWT_SECRET", "secret")]));
        assert!(matches!(result, Err(ConfigError::Missing("DATABASE_URL"))));
    }

    #[test]
    fn test_invalid_values() {
        let result = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/menu"),
            ("JWT_SECRET", "secret"),
            ("RESTAURANT_TIMEZONE", "Mars/Olympus"),
        ]));
        assert!(matches!(result, Err(ConfigError::Invalid { name: "RESTAURANT_TIMEZONE", .. })));

        let result = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/menu"),
            ("JWT_SECRET", "secret"),
            ("PORT", "99999"),
        ]));
        assert!(matches!(result, Err(ConfigError::Invalid { name: "PORT", .. })));
    }

    #[test]
    fn test_zero_periods_are_rejected() {
        for name in ["ROTATION_PERIOD_SECS", "ELIGIBILITY_REFRESH_SECS"] {
            let result = AppConfig::from_lookup(lookup_from(&[
                ("DATABASE_URL", "postgres://localhost/menu"),
                ("JWT_SECRET", "secret"),
                (name, "0"),
            ]));
            assert!(
                matches!(result, Err(ConfigError::Invalid { name: n, .. }) if n == name),
                "{} = 0 should be rejected",
                name
            );
        }
    }

    #[test]
    fn test_token_ttl_out_of_range() {
        let result = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/menu"),
            ("JWT_SECRET", "secret"),
            ("JWT_TTL_SECS", "18446744073709551615"),
        ]));
        assert!(matches!(result, Err(ConfigError::Invalid { name: "JWT_TTL_SECS", .. })));

        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/menu"),
            ("JWT_SECRET", "secret"),
            ("JWT_TTL_SECS", "9223372036854775807"),
        ]))
        .unwrap();
        assert_eq!(config.jwt_ttl_secs, i64::MAX);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/menu"),
            ("JWT_SECRET", "secret"),
            ("HOST", "127.0.0.1"),
            ("PORT", "3000"),
            ("RESTAURANT_TIMEZONE", "Europe/Lisbon"),
            ("ADMIN_EMAIL", "owner@restaurant.com"),
            ("ADMIN_PASSWORD", "changeme"),
        ]))
        .unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.timezone, chrono_tz::Europe::Lisbon);
        assert_eq!(config.admin_email.as_deref(), Some("owner@restaurant.com"));
    }
}
