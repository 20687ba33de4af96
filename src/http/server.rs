//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Mount the admin router under the reserved admin path
//! - Dispatch every other request, percent-decoded, to the resolver
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener and shut down gracefully

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::Response,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::admin;
use crate::config::{AdminConfig, ErsatzConfig};
use crate::fixtures::DefinitionStore;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, RequestIdExt};
use crate::http::resolver::Resolver;
use crate::http::response::{error_response, fixture_error_response, ERSATZ_VARIANT};
use crate::observability::metrics;
use crate::routing::RouteTable;

/// Application state injected into handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub resolver: Arc<Resolver>,
    pub admin: Arc<AdminConfig>,
}

/// HTTP server for the fixture tree.
#[derive(Debug)]
pub struct HttpServer {
    router: Router,
    config: ErsatzConfig,
    state: AppState,
}

impl HttpServer {
    /// Create a server answering from `routes`, which must have been
    /// scanned from `config.fixtures.root_dir`.
    pub fn new(config: ErsatzConfig, routes: RouteTable) -> Self {
        let store = DefinitionStore::new(config.fixtures.root_dir.clone());
        let resolver = Arc::new(Resolver::new(Arc::new(routes), store));

        let state = AppState {
            resolver,
            admin: Arc::new(config.admin.clone()),
        };

        let router = Self::build_router(&config, state.clone());
        Self {
            router,
            config,
            state,
        }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Fixture paths are not registered with the router: they may contain
    /// characters the router treats as syntax. Everything outside the admin
    /// routes falls through to [`fixture_handler`], which asks the route table.
    #[allow(deprecated)]
    fn build_router(config: &ErsatzConfig, state: AppState) -> Router {
        let admin_path = config.admin.path.trim_end_matches('/');
        let routes = state.resolver.routes();

        for path in routes.paths() {
            let route_path = format!("/{path}");
            if is_admin_path(&route_path, admin_path) {
                tracing::warn!(path = %route_path, "Fixture path shadowed by admin endpoint, skipping");
                continue;
            }
            tracing::debug!(path = %route_path, verbs = ?routes.verbs(path), "Serving fixture path");
        }

        tracing::info!(routes = routes.route_count(), admin_path = %admin_path, "Routes ready");
        metrics::record_routes_discovered(routes.route_count());

        Router::new()
            .merge(admin::setup_admin_router(admin_path, state.clone()))
            .fallback(fixture_handler)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http())
                    .layer(propagate_request_id_layer())
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            root = %self.config.fixtures.root_dir.display(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ErsatzConfig {
        &self.config
    }

    /// Shared resolver, e.g. for inspecting the schedule in tests.
    pub fn resolver(&self) -> Arc<Resolver> {
        Arc::clone(&self.state.resolver)
    }

    /// The fully layered router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Serves every request that is not an admin route.
async fn fixture_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let start_time = Instant::now();
    let request_id = headers.request_id();

    let Some(path) = decode_path(uri.path()) else {
        tracing::warn!(request_id = %request_id, path = %uri.path(), "Request path is not valid UTF-8");
        let response = error_response(
            StatusCode::NOT_FOUND,
            &format!("no route for {} {}", method, uri.path()),
        );
        metrics::record_request(method.as_str(), 404, start_time);
        return response;
    };

    let response = if is_admin_path(&path, &state.admin.path) {
        tracing::warn!(request_id = %request_id, method = %method, path = %path, "No admin route matched");
        error_response(
            StatusCode::NOT_FOUND,
            &format!("no route for {method} {path}"),
        )
    } else {
        match state.resolver.respond(&path, method.as_str()) {
            Ok(response) => {
                tracing::debug!(
                    request_id = %request_id,
                    method = %method,
                    path = %path,
                    variant = ?response.headers().get(ERSATZ_VARIANT),
                    status = response.status().as_u16(),
                    "Fixture served"
                );
                response
            }
            Err(e) => {
                if e.is_not_found() {
                    tracing::warn!(request_id = %request_id, method = %method, path = %path, error = %e, "Fixture not found");
                } else {
                    tracing::error!(request_id = %request_id, method = %method, path = %path, error = %e, "Fixture failed to load");
                }
                fixture_error_response(&e)
            }
        }
    };

    metrics::record_request(method.as_str(), response.status().as_u16(), start_time);
    response
}

/// Percent-decode a request path. `None` when the result is not UTF-8.
fn decode_path(raw: &str) -> Option<String> {
    urlencoding::decode(raw).ok().map(|path| path.into_owned())
}

/// Whether `path` is the admin path or lies below it.
fn is_admin_path(path: &str, admin_path: &str) -> bool {
    let admin_path = admin_path.trim_end_matches('/');
    path == admin_path
        || path
            .strip_prefix(admin_path)
            .is_some_and(|rest| rest.starts_with('/'))
}
