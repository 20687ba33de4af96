//! Fixture definitions: parsing, loading and caching.
//!
//! # Data Flow
//! ```text
//! VariantKey (path, verb, variant)
//!     → cache.rs (hit: shared Arc<Definition>)
//!     → store.rs (miss: read root/path/VERB/variant.json)
//!     → definition.rs (parse status, headers, body)
//!     → cache.rs (insert for next time)
//! ```
//!
//! # Design Decisions
//! - One canonical Definition type; status code optional
//! - Definitions are immutable once parsed and shared by reference
//! - Missing files are client errors (404); bad files are authoring errors (500)

pub mod cache;
pub mod definition;
pub mod error;
pub mod store;

pub use cache::EndpointCache;
pub use definition::Definition;
pub use error::FixtureError;
pub use store::DefinitionStore;
