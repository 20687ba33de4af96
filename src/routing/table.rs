//! The immutable route table built from a fixture tree.
//!
//! # Responsibilities
//! - Map each endpoint path to the verbs it supports
//! - Map each (path, verb) to the variant names found on disk
//! - Answer lookups from the resolver and the admin surface
//!
//! # Design Decisions
//! - Built once at startup, never mutated afterwards (shared via `Arc`)
//! - Ordered maps so listings are sorted and deterministic

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::routing::{HttpVerb, RouteKey};

/// Path → verbs and route → variant names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    verbs: BTreeMap<String, BTreeSet<HttpVerb>>,
    variants: BTreeMap<RouteKey, BTreeSet<String>>,
}

/// Serializable view of one path, used by the admin listing.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RouteSummary {
    pub path: String,
    pub verbs: BTreeMap<HttpVerb, Vec<String>>,
}

impl RouteTable {
    /// Record that `path` has a directory for `verb`.
    pub(crate) fn insert_verb(&mut self, path: &str, verb: HttpVerb) {
        let key = RouteKey::new(path, verb);
        self.verbs
            .entry(key.path().to_string())
            .or_default()
            .insert(verb);
        self.variants.entry(key).or_default();
    }

    /// Record a variant file found under `path/verb`.
    pub(crate) fn insert_variant(&mut self, path: &str, verb: HttpVerb, variant: impl Into<String>) {
        self.insert_verb(path, verb);
        self.variants
            .entry(RouteKey::new(path, verb))
            .or_default()
            .insert(variant.into());
    }

    /// Every discovered endpoint path, sorted.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.verbs.keys().map(String::as_str)
    }

    /// Verbs supported by `path`, sorted. Empty for unknown paths.
    pub fn verbs(&self, path: &str) -> Vec<HttpVerb> {
        self.verbs
            .get(crate::routing::normalize_path(path))
            .map(|verbs| verbs.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Variant names for a route, sorted. Empty for unknown routes.
    pub fn variants(&self, route: &RouteKey) -> Vec<&str> {
        self.variants
            .get(route)
            .map(|names| names.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn contains(&self, route: &RouteKey) -> bool {
        self.variants.contains_key(route)
    }

    pub fn has_variant(&self, route: &RouteKey, variant: &str) -> bool {
        self.variants
            .get(route)
            .is_some_and(|names| names.contains(variant))
    }

    /// Number of (path, verb) routes.
    pub fn route_count(&self) -> usize {
        self.variants.len()
    }

    /// Number of variant files across all routes.
    pub fn definition_count(&self) -> usize {
        self.variants.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.verbs.is_empty()
    }

    /// Listing of every path with its verbs and variants.
    pub fn summaries(&self) -> Vec<RouteSummary> {
        self.verbs
            .iter()
            .map(|(path, verbs)| RouteSummary {
                path: path.clone(),
                verbs: verbs
                    .iter()
                    .map(|verb| {
                        let route = RouteKey::new(path, *verb);
                        let names = self.variants(&route).into_iter().map(String::from).collect();
                        (*verb, names)
                    })
                    .collect(),
            })
            .collect()
    }
}
