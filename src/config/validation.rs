//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Keep the admin path clear of the fixture namespace root
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ErsatzConfig → Result<(), Vec<ValidationError>>
//! - Whether the fixture root exists is checked by discovery, not here

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::ErsatzConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub fn validate_config(config: &ErsatzConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.fixtures.root_dir.as_os_str().is_empty() {
        errors.push(ValidationError::new("fixtures.root_dir", "must not be empty"));
    }

    let admin_path = &config.admin.path;
    if !admin_path.starts_with('/') {
        errors.push(ValidationError::new("admin.path", "must start with '/'"));
    }
    if admin_path == "/" || admin_path.ends_with('/') {
        errors.push(ValidationError::new(
            "admin.path",
            "must name a path segment and not end with '/'",
        ));
    }
    if admin_path.contains(['{', '}', '*']) {
        errors.push(ValidationError::new("admin.path", "must not contain '{', '}' or '*'"));
    }

    if config.admin.api_key.as_deref() == Some("") {
        errors.push(ValidationError::new("admin.api_key", "must not be empty when set"));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
