//! HTTP server configuration parsing from environment variables.

use anyhow::{Context, Result};
use std::net::{IpAddr, SocketAddr};

/// Server environment configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerEnvConfig {
    pub bind_address: String,
    pub port: u16,
}

impl Default for ServerEnvConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl ServerEnvConfig {
    pub fn load(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            bind_address: var("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            port: match var("PORT") {
                Some(raw) => raw.parse::<u16>().context("Failed to parse PORT")?,
                None => defaults.port,
            },
        })
    }

    /// Listen address; `bind_address` may be IPv4 or IPv6.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .bind_address
            .trim()
            .parse()
            .with_context(|| format!("Invalid BIND_ADDRESS {}", self.bind_address))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_defaults() {
        let config = ServerEnvConfig::load(|_| None).unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:8000");
    }

    #[test]
    fn test_server_config_accepts_ipv6_bind_address() {
        let config = ServerEnvConfig::load(|key| match key {
            "BIND_ADDRESS" => Some("::".to_string()),
            "PORT" => Some("9000".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.socket_addr().unwrap().to_string(), "[::]:9000");

        let loopback = ServerEnvConfig {
            bind_address: "::1".to_string(),
            port: 8000,
        };
        assert_eq!(loopback.socket_addr().unwrap().to_string(), "[::1]:8000");
    }

    #[test]
    fn test_server_config_rejects_bad_bind_address() {
        let config = ServerEnvConfig {
            bind_address: "not-an-ip".to_string(),
            port: 8000,
        };
        assert!(config.socket_addr().is_err());
    }

    #[test]
    fn test_server_config_rejects_bad_port() {
        let result = ServerEnvConfig::load(|key| (key == "PORT").then(|| "eighty".to_string()));
        assert!(result.is_err());
    }
}
