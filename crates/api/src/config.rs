//! Environment-driven configuration.
//!
//! Every key but `TENANTRY_EXPIRED_PLAN` has a default. The profile expired
//! subscribers degrade to is never inferred, so that key must be set. A key
//! that is present but unparsable is a startup error.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use tenantry_billing::{ExpiryPolicy, LOCKED_PLAN_ID};
use tenantry_core::PlanId;
use tenantry_session::{PolicyError, SessionPolicy};

pub const BIND_ADDR: &str = "TENANTRY_BIND_ADDR";
pub const IDLE_TIMEOUT_SECS: &str = "TENANTRY_IDLE_TIMEOUT_SECS";
pub const WARNING_WINDOW_SECS: &str = "TENANTRY_WARNING_WINDOW_SECS";
pub const EXPIRED_PLAN: &str = "TENANTRY_EXPIRED_PLAN";
pub const ENTRY_ROUTE: &str = "TENANTRY_ENTRY_ROUTE";
pub const UNAUTHORIZED_ROUTE: &str = "TENANTRY_UNAUTHORIZED_ROUTE";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be set")]
    Missing { key: &'static str },

    #[error("{key}={value} is invalid: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    SessionPolicy(#[from] PolicyError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub session_policy: SessionPolicy,
    pub expiry_policy: ExpiryPolicy,
    pub entry_route: String,
    pub unauthorized_route: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = parse_or(&lookup, BIND_ADDR, "0.0.0.0:8080".parse().ok())?;
        let idle_timeout: u64 = parse_or(&lookup, IDLE_TIMEOUT_SECS, Some(300))?;
        let warning_window: u64 = parse_or(&lookup, WARNING_WINDOW_SECS, Some(30))?;
        let session_policy = SessionPolicy::new(
            Duration::from_secs(idle_timeout),
            Duration::from_secs(warning_window),
        )?;

        let expiry_policy = match lookup(EXPIRED_PLAN) {
            None => return Err(ConfigError::Missing { key: EXPIRED_PLAN }),
            Some(v) if v.trim() == LOCKED_PLAN_ID => ExpiryPolicy::Locked,
            Some(v) => {
                let plan_id = PlanId::new(v.trim()).map_err(|e| ConfigError::Invalid {
                    key: EXPIRED_PLAN,
                    value: v.clone(),
                    reason: e.to_string(),
                })?;
                ExpiryPolicy::Downgrade(plan_id)
            }
        };

        Ok(Self {
            bind_addr,
            session_policy,
            expiry_policy,
            entry_route: lookup(ENTRY_ROUTE).unwrap_or_else(|| "/login".to_string()),
            unauthorized_route: lookup(UNAUTHORIZED_ROUTE)
                .unwrap_or_else(|| "/unauthorized".to_string()),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: Option<T>) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value,
            reason: e.to_string(),
        }),
        None => {
            tracing::debug!(key, "using default");
            default.ok_or(ConfigError::Missing { key })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[(EXPIRED_PLAN, "locked")]).unwrap();

        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.session_policy.idle_timeout(), Duration::from_secs(300));
        assert_eq!(config.session_policy.warning_window(), Duration::from_secs(30));
        assert_eq!(config.expiry_policy, ExpiryPolicy::Locked);
        assert_eq!(config.entry_route, "/login");
        assert_eq!(config.unauthorized_route, "/unauthorized");
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = config_from(&[
            (BIND_ADDR, "127.0.0.1:9000"),
            (IDLE_TIMEOUT_SECS, "900"),
            (WARNING_WINDOW_SECS, "60"),
            (EXPIRED_PLAN, "free"),
            (ENTRY_ROUTE, "/connexion"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.session_policy.warning_threshold(), Duration::from_secs(840));
        assert_eq!(
            config.expiry_policy,
            ExpiryPolicy::Downgrade(PlanId::new("free").unwrap())
        );
        assert_eq!(config.entry_route, "/connexion");
    }

    #[test]
    fn expired_plan_must_be_configured() {
        assert_eq!(
            config_from(&[]),
            Err(ConfigError::Missing { key: EXPIRED_PLAN })
        );
    }

    #[test]
    fn locked_keyword_selects_locked_profile() {
        let config = config_from(&[(EXPIRED_PLAN, "locked")]).unwrap();
        assert_eq!(config.expiry_policy, ExpiryPolicy::Locked);
    }

    #[test]
    fn invalid_values_are_errors() {
        assert!(matches!(
            config_from(&[(IDLE_TIMEOUT_SECS, "five minutes")]),
            Err(ConfigError::Invalid { key: IDLE_TIMEOUT_SECS, .. })
        ));
        assert!(matches!(
            config_from(&[(IDLE_TIMEOUT_SECS, "30"), (WARNING_WINDOW_SECS, "60")]),
            Err(ConfigError::SessionPolicy(_))
        ));
        assert!(matches!(
            config_from(&[(EXPIRED_PLAN, "free tier")]),
            Err(ConfigError::Invalid { key: EXPIRED_PLAN, .. })
        ));
    }
}
