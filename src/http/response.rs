//! Rendering resolved definitions and resolution failures.
//!
//! # Responsibilities
//! - Turn a Definition into status, headers and a JSON body
//! - Map fixture errors to 404/500 with a diagnostic header
//!
//! # Design Decisions
//! - Definition headers are applied over the default Content-Type
//! - Content-Length always reflects the serialized body
//! - Failures carry no body; the reason travels in `Ersatz-Error`

use axum::{
    body::Body,
    http::{
        header::{self, HeaderName, HeaderValue, InvalidHeaderName, InvalidHeaderValue},
        status::InvalidStatusCode,
        StatusCode,
    },
    response::Response,
};
use thiserror::Error;

use crate::http::resolver::{ResolveError, Resolved};

/// Diagnostic header attached to every failed resolution.
pub const ERSATZ_ERROR: &str = "ersatz-error";

/// Names the variant that produced a fixture response.
pub const ERSATZ_VARIANT: &str = "ersatz-variant";

/// A definition that cannot be expressed as an HTTP response.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid response_code: {0}")]
    Status(#[from] InvalidStatusCode),

    #[error("invalid header name: {0}")]
    HeaderName(#[from] InvalidHeaderName),

    #[error("invalid header value: {0}")]
    HeaderValue(#[from] InvalidHeaderValue),

    #[error("failed to serialize body: {0}")]
    Body(#[from] serde_json::Error),
}

/// Build the HTTP response for a resolved definition.
pub fn render(resolved: &Resolved) -> Result<Response, RenderError> {
    let definition = &resolved.definition;
    let body = definition.body_bytes()?;
    let status = StatusCode::from_u16(definition.status())?;

    let mut response = Response::new(Body::empty());
    *response.status_mut() = status;

    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    for (name, value) in &definition.headers {
        let name = HeaderName::from_bytes(name.as_bytes())?;
        if name == header::CONTENT_LENGTH {
            continue;
        }
        headers.insert(name, HeaderValue::from_str(value)?);
    }
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(body.len()));
    if let Ok(variant) = HeaderValue::from_str(&resolved.variant) {
        headers.insert(ERSATZ_VARIANT, variant);
    }

    *response.body_mut() = Body::from(body);
    Ok(response)
}

/// Response for a failed resolution: 404 for missing fixtures, 500 otherwise.
pub fn fixture_error_response(err: &ResolveError) -> Response {
    let status = if err.is_not_found() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    error_response(status, &err.to_string())
}

/// Empty-bodied response carrying `message` in the diagnostic header.
pub fn error_response(status: StatusCode, message: &str) -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(ERSATZ_ERROR, diagnostic_value(message));
    response
}

/// Header-safe form of an error message.
fn diagnostic_value(message: &str) -> HeaderValue {
    HeaderValue::from_str(message).unwrap_or_else(|_| {
        let sanitized: String = message
            .chars()
            .map(|c| if c.is_ascii_graphic() || c == ' ' { c } else { '?' })
            .collect();
        HeaderValue::from_str(&sanitized).unwrap_or_else(|_| HeaderValue::from_static("error"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{Definition, FixtureError};
    use axum::body::to_bytes;
    use std::sync::Arc;

    fn resolved(definition: Definition) -> Resolved {
        Resolved {
            variant: "default".into(),
            definition: Arc::new(definition),
        }
    }

    #[tokio::test]
    async fn test_render_definition() {
        let definition =
            Definition::from_slice(br#"{"response_code":201,"headers":{"X":"1"},"body":{"a":1}}"#)
                .unwrap();
        let response = render(&resolved(definition)).unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()["x"], "1");
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(response.headers()[header::CONTENT_LENGTH], "7");
        assert_eq!(response.headers()[ERSATZ_VARIANT], "default");

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"a":1}"#);
    }

    #[test]
    fn test_definition_may_override_content_type_but_not_length() {
        let definition = Definition::from_slice(
            br#"{"headers":{"Content-Type":"application/vnd.api+json","Content-Length":"999"},"body":true}"#,
        )
        .unwrap();
        let response = render(&resolved(definition)).unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/vnd.api+json"
        );
        assert_eq!(response.headers()[header::CONTENT_LENGTH], "4");
    }

    #[test]
    fn test_invalid_definitions_fail_to_render() {
        let bad_status = Definition {
            status_code: Some(42),
            ..Definition::default()
        };
        assert!(matches!(render(&resolved(bad_status)), Err(RenderError::Status(_))));

        let bad_header = Definition::from_slice(br#"{"headers":{"bad header":"x"}}"#).unwrap();
        assert!(matches!(render(&resolved(bad_header)), Err(RenderError::HeaderName(_))));
    }

    #[test]
    fn test_error_responses() {
        let not_found =
            fixture_error_response(&FixtureError::NotFound("no route for GET /x".into()).into());
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.headers()[ERSATZ_ERROR], "no route for GET /x");

        let response = error_response(StatusCode::BAD_REQUEST, "line\nbreak");
        assert_eq!(response.headers()[ERSATZ_ERROR], "line?break");
    }
}
