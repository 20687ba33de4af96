//! HTTP verbs recognised as fixture directory names.

use std::fmt;
use std::str::FromStr;

use axum::http::Method;
use serde::{Deserialize, Serialize};

/// The verbs a fixture tree may declare.
///
/// Directory names are matched exactly and case-sensitively, so `get/` is an
/// ordinary path segment while `GET/` declares a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum HttpVerb {
    Delete,
    Get,
    Head,
    Options,
    Post,
    Put,
}

impl HttpVerb {
    pub const ALL: [HttpVerb; 6] = [
        HttpVerb::Delete,
        HttpVerb::Get,
        HttpVerb::Head,
        HttpVerb::Post,
        HttpVerb::Put,
        HttpVerb::Options,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpVerb::Delete => "DELETE",
            HttpVerb::Get => "GET",
            HttpVerb::Head => "HEAD",
            HttpVerb::Options => "OPTIONS",
            HttpVerb::Post => "POST",
            HttpVerb::Put => "PUT",
        }
    }

    /// Map a request method onto a fixture verb, if it is one.
    pub fn from_method(method: &Method) -> Option<Self> {
        method.as_str().parse().ok()
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the six fixture verbs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported HTTP verb '{0}'")]
pub struct UnknownVerb(pub String);

impl FromStr for HttpVerb {
    type Err = UnknownVerb;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HttpVerb::ALL
            .into_iter()
            .find(|verb| verb.as_str() == s)
            .ok_or_else(|| UnknownVerb(s.to_string()))
    }
}

impl From<HttpVerb> for String {
    fn from(verb: HttpVerb) -> Self {
        verb.as_str().to_string()
    }
}

impl TryFrom<String> for HttpVerb {
    type Error = UnknownVerb;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
