//! Administrative surface.
//!
//! - `POST <admin>`: control commands (`vary`)
//! - `GET <admin>/routes`: discovered routes and variants
//! - `GET <admin>/schedule`: pending overrides
//! - `GET <admin>/status`: version and counters

pub mod auth;
pub mod command;
pub mod handlers;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use self::auth::admin_auth_middleware;
use self::handlers::*;
use crate::http::server::AppState;

pub use command::{Command, CommandEndpoint, CommandError, ServerCommand, COMMAND_VARY};

pub fn setup_admin_router(admin_path: &str, state: AppState) -> Router<AppState> {
    Router::new()
        .route(admin_path, post(handle_command).fallback(command_method_not_allowed))
        .route(&format!("{admin_path}/routes"), get(get_routes))
        .route(&format!("{admin_path}/schedule"), get(get_schedule))
        .route(&format!("{admin_path}/status"), get(get_status))
        .route_layer(middleware::from_fn_with_state(state, admin_auth_middleware))
}
