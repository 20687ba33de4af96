//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files and
//! every field has a default, so an empty file is a valid configuration.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the fixture server.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ErsatzConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Where fixture definitions live.
    pub fixtures: FixturesConfig,

    /// Administrative endpoint settings.
    pub admin: AdminConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Fixture tree configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct FixturesConfig {
    /// Root of the `<path>/<VERB>/<variant>.json` tree.
    pub root_dir: PathBuf,
}

impl Default for FixturesConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("fixtures"),
        }
    }
}

/// Administrative endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct AdminConfig {
    /// Reserved path for control commands. Introspection lives beneath it.
    pub path: String,

    /// Optional API key; when set, admin requests need `Authorization: Bearer <key>`.
    pub api_key: Option<String>,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            path: "/__ersatz".to_string(),
            api_key: None,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter directive.
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

impl ErsatzConfig {
    /// Listen on `port` on the configured host, keeping the host part.
    pub fn set_port(&mut self, port: u16) {
        let host = self
            .listener
            .bind_address
            .rsplit_once(':')
            .map(|(host, _)| host.to_string())
            .unwrap_or_else(|| "0.0.0.0".to_string());
        self.listener.bind_address = format!("{host}:{port}");
    }

    /// Listen on `host:port`. IPv6 literals are bracketed.
    pub fn set_listen_address(&mut self, host: &str, port: u16) {
        let host = host.trim_start_matches('[').trim_end_matches(']');
        self.listener.bind_address = match host.parse::<IpAddr>() {
            Ok(ip) => SocketAddr::new(ip, port).to_string(),
            Err(_) => format!("{host}:{port}"),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_default() {
        let config: ErsatzConfig = toml::from_str("").unwrap();
        assert_eq!(config, ErsatzConfig::default());
        assert_eq!(config.admin.path, "/__ersatz");
        assert!(config.admin.api_key.is_none());
    }

    #[test]
    fn test_partial_toml() {
        let config: ErsatzConfig = toml::from_str(
            r#"
            [fixtures]
            root_dir = "/srv/fixtures"

            [admin]
            api_key = "secret"
            "#,
        )
        .unwrap();
        assert_eq!(config.fixtures.root_dir, PathBuf::from("/srv/fixtures"));
        assert_eq!(config.admin.api_key.as_deref(), Some("secret"));
        assert_eq!(config.admin.path, "/__ersatz");
        assert_eq!(config.timeouts.request_secs, 30);
    }

    #[test]
    fn test_set_port_keeps_host() {
        let mut config = ErsatzConfig::default();
        config.listener.bind_address = "127.0.0.1:8080".into();
        config.set_port(9999);
        assert_eq!(config.listener.bind_address, "127.0.0.1:9999");

        config.listener.bind_address = "[::1]:8080".into();
        config.set_port(9999);
        assert_eq!(config.listener.bind_address, "[::1]:9999");
    }

    #[test]
    fn test_set_listen_address_brackets_ipv6() {
        let mut config = ErsatzConfig::default();
        config.set_listen_address("::1", 8080);
        assert_eq!(config.listener.bind_address, "[::1]:8080");
        assert!(config.listener.bind_address.parse::<SocketAddr>().is_ok());

        config.set_listen_address("[fe80::1]", 80);
        assert_eq!(config.listener.bind_address, "[fe80::1]:80");

        config.set_listen_address("127.0.0.1", 7000);
        assert_eq!(config.listener.bind_address, "127.0.0.1:7000");
    }
}
