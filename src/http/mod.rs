//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, one route per fixture path)
//!     → request.rs (request ID)
//!     → resolver.rs (route check, variant choice, cache/store)
//!     → response.rs (status, headers, JSON body or Ersatz-Error)
//!     → Send to client
//! ```

pub mod request;
pub mod resolver;
pub mod response;
pub mod server;

pub use request::{RequestIdExt, X_REQUEST_ID};
pub use resolver::{ResolveError, Resolved, Resolver};
pub use response::{ERSATZ_ERROR, ERSATZ_VARIANT};
pub use server::{AppState, HttpServer};
