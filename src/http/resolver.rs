//! Request resolution: which definition answers a (path, method) pair.
//!
//! # Responsibilities
//! - Normalize the request into a RouteKey and reject unknown routes
//! - Ask the scheduler for the effective variant
//! - Serve the definition from the cache, loading it on a miss
//! - Render it while the choice of variant is still uncommitted
//!
//! # Design Decisions
//! - Unknown routes fail before the scheduler is touched (no side effects)
//! - A pending override is consumed only when its definition loaded and rendered
//! - The file read on a cache miss is short and done inline

use std::sync::Arc;

use axum::response::Response;
use thiserror::Error;

use crate::fixtures::{Definition, DefinitionStore, EndpointCache, FixtureError};
use crate::http::response::{render, RenderError};
use crate::routing::{normalize_path, HttpVerb, RouteKey, RouteTable, VariantKey};
use crate::variation::VariationScheduler;

/// A definition chosen for one request.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub variant: String,
    pub definition: Arc<Definition>,
}

/// Why a request could not be answered from the fixture tree.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    #[error("variant '{variant}' cannot be rendered: {source}")]
    Render {
        variant: String,
        #[source]
        source: RenderError,
    },
}

impl ResolveError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ResolveError::Fixture(e) if e.is_not_found())
    }
}

/// Ties the route table, scheduler, cache and store together.
#[derive(Debug)]
pub struct Resolver {
    routes: Arc<RouteTable>,
    store: DefinitionStore,
    cache: EndpointCache,
    scheduler: VariationScheduler,
}

impl Resolver {
    pub fn new(routes: Arc<RouteTable>, store: DefinitionStore) -> Self {
        Self {
            routes,
            store,
            cache: EndpointCache::new(),
            scheduler: VariationScheduler::new(),
        }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn scheduler(&self) -> &VariationScheduler {
        &self.scheduler
    }

    pub fn cache(&self) -> &EndpointCache {
        &self.cache
    }

    pub fn store(&self) -> &DefinitionStore {
        &self.store
    }

    /// Resolve a decoded request path and method.
    pub fn resolve(&self, path: &str, method: &str) -> Result<Resolved, FixtureError> {
        let route = route_for(path, method)?;
        self.resolve_route(&route)
    }

    /// Resolve an already-normalized route.
    pub fn resolve_route(&self, route: &RouteKey) -> Result<Resolved, FixtureError> {
        self.resolve_route_with(route, Ok)
    }

    /// Resolve and render a request. A pending override is consumed only
    /// when the response was built.
    pub fn respond(&self, path: &str, method: &str) -> Result<Response, ResolveError> {
        let route = route_for(path, method)?;
        self.resolve_route_with(&route, |resolved| {
            render(&resolved).map_err(|source| ResolveError::Render {
                variant: resolved.variant.clone(),
                source,
            })
        })
    }

    fn resolve_route_with<T, E>(
        &self,
        route: &RouteKey,
        f: impl FnOnce(Resolved) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<FixtureError>,
    {
        if !self.routes.contains(route) {
            return Err(FixtureError::NotFound(format!("no route for {route}")).into());
        }

        self.scheduler.resolve_with(route, |variant| {
            let definition = self.definition(route.with_variant(variant))?;
            f(Resolved {
                variant: variant.to_string(),
                definition,
            })
        })
    }

    fn definition(&self, key: VariantKey) -> Result<Arc<Definition>, FixtureError> {
        if let Some(definition) = self.cache.get(&key) {
            return Ok(definition);
        }

        let definition = Arc::new(self.store.load(&key)?);
        self.cache.put(key, Arc::clone(&definition));
        Ok(definition)
    }
}

fn route_for(path: &str, method: &str) -> Result<RouteKey, FixtureError> {
    let path = normalize_path(path);
    let verb: HttpVerb = method
        .parse()
        .map_err(|_| FixtureError::NotFound(format!("no route for {method} /{path}")))?;
    Ok(RouteKey::new(path, verb))
}
