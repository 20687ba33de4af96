//! Ersatz: a fixture server answering HTTP requests from a directory of
//! pre-recorded JSON definitions, with per-route variant overrides.

pub mod admin;
pub mod config;
pub mod fixtures;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod variation;

pub use config::ErsatzConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::RouteTable;
