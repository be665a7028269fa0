use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use anyhow::Context;

/// Port both services fall back to.
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub db_max_connections: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source; unset keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        Ok(Self {
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://inventory.db".to_string()),
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("PORT")
                .unwrap_or_else(|| DEFAULT_PORT.to_string())
                .parse()
                .context("PORT must be a valid number")?,
            db_max_connections: lookup("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|| "5".to_string())
                .parse()
                .context("DB_MAX_CONNECTIONS must be a valid number")?,
        })
    }

    /// Bind address of the in-memory service. Loopback only, never read from the environment.
    pub fn simulated_addr() -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), DEFAULT_PORT)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from_pairs(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = from_pairs(&[]).unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.database_url, "sqlite://inventory.db");
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.bind_addr(), "0.0.0.0:5000");
    }

    #[test]
    fn set_values_override_defaults() {
        let config = from_pairs(&[
            ("PORT", "8081"),
            ("DATABASE_URL", "sqlite://other.db"),
            ("DB_MAX_CONNECTIONS", "2"),
        ])
        .unwrap();
        assert_eq!(config.port, 8081);
        assert_eq!(config.database_url, "sqlite://other.db");
        assert_eq!(config.db_max_connections, 2);
    }

    #[test]
    fn non_numeric_port_is_an_error() {
        let err = from_pairs(&[("PORT", "abc")]).unwrap_err();
        assert!(err.to_string().contains("PORT must be a valid number"), "{err:#}");
    }

    #[test]
    fn non_numeric_pool_size_is_an_error() {
        assert!(from_pairs(&[("DB_MAX_CONNECTIONS", "many")]).is_err());
    }

    #[test]
    fn simulated_service_binds_loopback() {
        let addr = Config::simulated_addr();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 5000);
    }

    #[test]
    fn bind_addr_joins_host_and_port() {
        let config = Config {
            database_url: "sqlite::memory:".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8080,
            db_max_connections: 1,
        };
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
    }
}
