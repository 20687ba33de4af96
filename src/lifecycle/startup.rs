//! Startup orchestration.
//!
//! # Order
//! 1. Validate configuration
//! 2. Scan the fixture tree into a RouteTable
//! 3. Build the HTTP server from the table
//! 4. Bind the listener (traffic only when everything above succeeded)

use std::io;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{validate_config, ConfigError, ErsatzConfig};
use crate::http::HttpServer;
use crate::routing::{DiscoveryError, RouteTable};

/// Anything that stops the server from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },
}

/// Validate `config` and build a server for its fixture tree.
pub fn prepare(config: ErsatzConfig) -> Result<HttpServer, StartupError> {
    validate_config(&config).map_err(ConfigError::Validation)?;

    let routes = RouteTable::scan(&config.fixtures.root_dir)?;
    for path in routes.paths() {
        tracing::debug!(path = %path, verbs = ?routes.verbs(path), "Discovered route");
    }

    Ok(HttpServer::new(config, routes))
}

/// Bind the configured listener address.
pub async fn bind(config: &ErsatzConfig) -> Result<TcpListener, StartupError> {
    let address = config.listener.bind_address.clone();
    TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_prepare_rejects_invalid_config() {
        let mut config = ErsatzConfig::default();
        config.timeouts.request_secs = 0;
        assert!(matches!(prepare(config), Err(StartupError::Config(_))));
    }

    #[test]
    fn test_prepare_reports_discovery_errors() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("endpoint1")).unwrap();

        let mut config = ErsatzConfig::default();
        config.fixtures.root_dir = dir.path().to_path_buf();
        let err = prepare(config).unwrap_err();
        assert!(matches!(err, StartupError::Discovery(DiscoveryError::NoVerbsFound(_))));
    }

    #[test]
    fn test_prepare_builds_server() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("endpoint1/GET")).unwrap();
        fs::write(dir.path().join("endpoint1/GET/default.json"), "{}").unwrap();

        let mut config = ErsatzConfig::default();
        config.fixtures.root_dir = dir.path().to_path_buf();
        let server = prepare(config).unwrap();
        assert_eq!(server.resolver().routes().route_count(), 1);
    }
}
