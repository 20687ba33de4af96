use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::admin::command::ServerCommand;
use crate::http::response::error_response;
use crate::http::server::AppState;
use crate::routing::RouteSummary;
use crate::variation::ScheduledRoute;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub root_dir: String,
    pub routes: usize,
    pub definitions: usize,
    pub cached_definitions: usize,
    pub pending_variations: usize,
}

/// `POST <admin>`: parse and execute a command.
pub async fn handle_command(State(state): State<AppState>, body: Bytes) -> Response {
    let resolver = &state.resolver;
    let result = ServerCommand::from_slice(&body)
        .and_then(ServerCommand::parse)
        .and_then(|command| command.execute(resolver.routes(), resolver.scheduler()));

    match result {
        Ok(scheduled) => Json(scheduled).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "Admin command rejected");
            error_response(StatusCode::BAD_REQUEST, &e.to_string())
        }
    }
}

/// Any non-POST request to the command endpoint.
pub async fn command_method_not_allowed() -> Response {
    error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        "admin endpoint accepts only POST",
    )
}

pub async fn get_routes(State(state): State<AppState>) -> Json<Vec<RouteSummary>> {
    Json(state.resolver.routes().summaries())
}

pub async fn get_schedule(State(state): State<AppState>) -> Json<Vec<ScheduledRoute>> {
    Json(state.resolver.scheduler().snapshot())
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    let resolver = &state.resolver;
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        root_dir: resolver.store().root().display().to_string(),
        routes: resolver.routes().route_count(),
        definitions: resolver.routes().definition_count(),
        cached_definitions: resolver.cache().len(),
        pending_variations: resolver.scheduler().len(),
    })
}
