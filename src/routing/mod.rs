//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Discovery (at startup):
//!     fixture root
//!     → discovery.rs (walk tree, find VERB/ directories and their files)
//!     → table.rs (freeze as immutable RouteTable)
//!     → http server registers one handler per path
//!
//! Incoming Request (path, method):
//!     → key.rs (normalize into RouteKey)
//!     → RouteTable lookup (known route or NotFound)
//! ```
//!
//! # Design Decisions
//! - Routes discovered at startup, immutable at runtime
//! - Verb directory names are case-sensitive
//! - Deterministic: listings are sorted regardless of filesystem order

pub mod discovery;
pub mod key;
pub mod table;
pub mod verb;

pub use discovery::{DiscoveryError, WalkEntry};
pub use key::{normalize_path, RouteKey, VariantKey, DEFAULT_VARIANT};
pub use table::{RouteSummary, RouteTable};
pub use verb::{HttpVerb, UnknownVerb};
