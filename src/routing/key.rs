//! Keys identifying routes and the concrete variants stored for them.

use std::fmt;

use serde::Serialize;

use crate::routing::HttpVerb;

/// Variant served when no override is scheduled.
pub const DEFAULT_VARIANT: &str = "default";

/// A logical endpoint plus verb.
///
/// The path is stored without a leading slash; `RouteKey::new("/a/b", ..)`
/// and `RouteKey::new("a/b", ..)` are the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RouteKey {
    path: String,
    verb: HttpVerb,
}

impl RouteKey {
    pub fn new(path: impl AsRef<str>, verb: HttpVerb) -> Self {
        Self {
            path: normalize_path(path.as_ref()).to_string(),
            verb,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn verb(&self) -> HttpVerb {
        self.verb
    }

    /// Pair this route with a variant name.
    pub fn with_variant(&self, variant: impl Into<String>) -> VariantKey {
        VariantKey {
            route: self.clone(),
            variant: variant.into(),
        }
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} /{}", self.verb, self.path)
    }
}

/// One stored response: a route plus the variant name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct VariantKey {
    route: RouteKey,
    variant: String,
}

impl VariantKey {
    pub fn route(&self) -> &RouteKey {
        &self.route
    }

    pub fn variant(&self) -> &str {
        &self.variant
    }
}

impl fmt::Display for VariantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.route, self.variant)
    }
}

/// Strip the leading slash(es) of a request path.
pub fn normalize_path(path: &str) -> &str {
    path.trim_start_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_slash_is_stripped() {
        let a = RouteKey::new("/endpoint1/sub", HttpVerb::Get);
        let b = RouteKey::new("endpoint1/sub", HttpVerb::Get);
        assert_eq!(a, b);
        assert_eq!(a.path(), "endpoint1/sub");
    }

    #[test]
    fn test_root_route_has_empty_path() {
        let key = RouteKey::new("/", HttpVerb::Post);
        assert_eq!(key.path(), "");
        assert_eq!(key.to_string(), "POST /");
    }

    #[test]
    fn test_variant_keys_differ_by_variant() {
        let route = RouteKey::new("a", HttpVerb::Get);
        assert_ne!(route.with_variant("default"), route.with_variant("alt"));
        assert_eq!(route.with_variant("alt").variant(), "alt");
    }
}
