//! Per-route override schedule.
//!
//! # States (per RouteKey)
//! ```text
//! absent → scheduled(variant, n) → ... → scheduled(variant, 1) → absent
//! ```
//!
//! # Design Decisions
//! - One mutex guards the whole table; critical sections are map operations
//! - Scheduling overwrites, it never queues
//! - A use is consumed only when the resolution it served succeeded

use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::Mutex;

use serde::Serialize;

use crate::observability::metrics;
use crate::routing::{RouteKey, DEFAULT_VARIANT};

/// A pending override for one route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleEntry {
    pub variant: String,
    pub remaining_uses: NonZeroU32,
}

/// A route with its pending override, as listed by the admin surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledRoute {
    pub route: RouteKey,
    #[serde(flatten)]
    pub entry: ScheduleEntry,
}

/// Holds at most one [`ScheduleEntry`] per route.
#[derive(Debug, Default)]
pub struct VariationScheduler {
    entries: Mutex<HashMap<RouteKey, ScheduleEntry>>,
}

impl VariationScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `variant` for the next `uses` resolutions of `route`,
    /// replacing whatever was scheduled before.
    pub fn schedule(&self, route: RouteKey, variant: impl Into<String>, uses: NonZeroU32) {
        let entry = ScheduleEntry {
            variant: variant.into(),
            remaining_uses: uses,
        };
        tracing::info!(route = %route, variant = %entry.variant, uses = uses.get(), "Variation scheduled");
        metrics::record_variation_scheduled();

        let mut entries = self.entries.lock().expect("schedule mutex poisoned");
        entries.insert(route, entry);
    }

    /// Variant for the next resolution of `route`, consuming one use.
    pub fn resolve(&self, route: &RouteKey) -> String {
        self.resolve_with(route, |variant| Ok::<_, std::convert::Infallible>(variant.to_string()))
            .unwrap_or_else(|never| match never {})
    }

    /// Run `f` with the variant for the next resolution of `route`.
    ///
    /// When an override is pending, `f` runs while the schedule lock is held
    /// and one use is consumed only if `f` returns `Ok`; concurrent callers
    /// therefore never both consume the last use, and a failed resolution
    /// leaves the schedule untouched. Without an override `f` runs with
    /// `"default"` and nothing is locked while it runs.
    pub fn resolve_with<T, E>(
        &self,
        route: &RouteKey,
        f: impl FnOnce(&str) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut entries = self.entries.lock().expect("schedule mutex poisoned");

        let Some(entry) = entries.get(route) else {
            drop(entries);
            return f(DEFAULT_VARIANT);
        };

        let result = f(&entry.variant)?;

        match NonZeroU32::new(entry.remaining_uses.get() - 1) {
            Some(remaining) => {
                if let Some(entry) = entries.get_mut(route) {
                    entry.remaining_uses = remaining;
                }
            }
            None => {
                entries.remove(route);
            }
        }
        metrics::record_variation_consumed();
        tracing::debug!(route = %route, "Variation use consumed");

        Ok(result)
    }

    /// The pending override for `route`, if any.
    pub fn pending(&self, route: &RouteKey) -> Option<ScheduleEntry> {
        let entries = self.entries.lock().expect("schedule mutex poisoned");
        entries.get(route).cloned()
    }

    /// Drop the pending override for `route`. Returns whether one existed.
    pub fn clear(&self, route: &RouteKey) -> bool {
        let mut entries = self.entries.lock().expect("schedule mutex poisoned");
        entries.remove(route).is_some()
    }

    /// All pending overrides, sorted by route.
    pub fn snapshot(&self) -> Vec<ScheduledRoute> {
        let entries = self.entries.lock().expect("schedule mutex poisoned");
        let mut routes: Vec<_> = entries
            .iter()
            .map(|(route, entry)| ScheduledRoute {
                route: route.clone(),
                entry: entry.clone(),
            })
            .collect();
        routes.sort_by(|a, b| a.route.cmp(&b.route));
        routes
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("schedule mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
