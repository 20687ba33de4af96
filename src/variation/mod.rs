//! Variation scheduling.
//!
//! # Data Flow
//! ```text
//! Admin "vary" command
//!     → schedule.rs (store variant + remaining uses for the route)
//!
//! Incoming request
//!     → schedule.rs (pending override? take one use : "default")
//!     → resolver continues with the chosen variant
//! ```
//!
//! # Design Decisions
//! - State lives only in memory; restarts forget pending overrides
//! - Consumption is at-most-once per request under concurrency

pub mod schedule;

pub use schedule::{ScheduleEntry, ScheduledRoute, VariationScheduler};
