//! Process configuration, read from `INKSHOP_*` environment variables.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;

use inkshop_shop::{Catalog, default_catalog, parse_catalog};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_CURRENCY: &str = "R$";
pub const DEFAULT_MAX_SESSIONS: usize = 1024;
pub const DEFAULT_SESSION_IDLE_SECS: u64 = 30 * 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// Prefixed to totals in status messages.
    pub currency: String,
    /// Cap on concurrently open sessions.
    pub max_sessions: usize,
    /// Sessions unused for longer than this are dropped.
    pub session_idle_timeout: Duration,
    /// Catalog every new session is seeded with.
    pub catalog: Catalog,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (tests pass a map here).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let bind_addr = lookup("INKSHOP_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("INKSHOP_BIND_ADDR must be a socket address (host:port)")?;

        let currency = lookup("INKSHOP_CURRENCY").unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

        let max_sessions = match lookup("INKSHOP_MAX_SESSIONS") {
            Some(raw) => raw
                .trim()
                .parse()
                .context("INKSHOP_MAX_SESSIONS must be a non-negative integer")?,
            None => DEFAULT_MAX_SESSIONS,
        };

        let idle_secs: u64 = match lookup("INKSHOP_SESSION_IDLE_SECS") {
            Some(raw) => raw
                .trim()
                .parse()
                .context("INKSHOP_SESSION_IDLE_SECS must be a positive integer")?,
            None => DEFAULT_SESSION_IDLE_SECS,
        };
        if idle_secs == 0 {
            anyhow::bail!("INKSHOP_SESSION_IDLE_SECS must be a positive integer");
        }

        let catalog = match lookup("INKSHOP_CATALOG") {
            Some(raw) => parse_catalog(&raw).context("INKSHOP_CATALOG is invalid")?,
            None => default_catalog().context("built-in catalog is invalid")?,
        };

        Ok(Self {
            bind_addr,
            currency,
            max_sessions,
            session_idle_timeout: Duration::from_secs(idle_secs),
            catalog,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(config.currency, "R$");
        assert_eq!(config.max_sessions, DEFAULT_MAX_SESSIONS);
        assert_eq!(config.session_idle_timeout, Duration::from_secs(1800));
        assert_eq!(config.catalog.len(), 5);
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("INKSHOP_BIND_ADDR", "127.0.0.1:9000"),
            ("INKSHOP_CURRENCY", "$"),
            ("INKSHOP_MAX_SESSIONS", "3"),
            ("INKSHOP_SESSION_IDLE_SECS", "90"),
            ("INKSHOP_CATALOG", "A=10.00;B=12.50"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.currency, "$");
        assert_eq!(config.max_sessions, 3);
        assert_eq!(config.session_idle_timeout, Duration::from_secs(90));
        assert_eq!(config.catalog.len(), 2);
    }

    #[test]
    fn reports_which_variable_is_wrong() {
        let err = config_from(&[("INKSHOP_MAX_SESSIONS", "lots")]).unwrap_err();
        assert!(err.to_string().contains("INKSHOP_MAX_SESSIONS"));

        let err = config_from(&[("INKSHOP_SESSION_IDLE_SECS", "0")]).unwrap_err();
        assert!(err.to_string().contains("INKSHOP_SESSION_IDLE_SECS"));

        let err = config_from(&[("INKSHOP_CATALOG", "A=1;A=2")]).unwrap_err();
        assert!(err.to_string().contains("INKSHOP_CATALOG"));
    }
}
