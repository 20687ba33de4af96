//! The stored response for one variant.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Status, headers and body of a fixture response.
///
/// Deserialized from `{ "response_code": int, "headers": {..}, "body": any }`;
/// every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Definition {
    #[serde(rename = "response_code", skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,

    pub headers: BTreeMap<String, String>,

    pub body: serde_json::Value,
}

impl Definition {
    /// Parse a definition file's contents.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Status to answer with: the stored code, or 200 when absent or zero.
    pub fn status(&self) -> u16 {
        match self.status_code {
            Some(code) if code > 0 => code,
            _ => 200,
        }
    }

    /// Compact JSON encoding of the body.
    pub fn body_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&self.body)
    }
}
