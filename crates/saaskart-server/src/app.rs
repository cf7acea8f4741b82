// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use saaskart_policies::{CachePolicy, PolicyConfig, TelemetryPolicy};
use saaskart_query::QueryLimits;

use crate::http::handlers;

/// Shared request state. Nothing in it is mutable; each request opens its
/// own read-only connection.
#[derive(Clone)]
pub struct AppState {
    pub(crate) db_path: Arc<PathBuf>,
    pub(crate) limits: Arc<QueryLimits>,
    pub(crate) cache: Arc<CachePolicy>,
    pub(crate) telemetry: Arc<TelemetryPolicy>,
}

impl AppState {
    #[must_use]
    pub fn new(db_path: PathBuf, policy: &PolicyConfig) -> Self {
        Self {
            db_path: Arc::new(db_path),
            limits: Arc::new(QueryLimits::from_policy(policy)),
            cache: Arc::new(policy.cache.clone()),
            telemetry: Arc::new(policy.telemetry.clone()),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz_handler))
        .route("/v1/facets", get(handlers::facets_handler))
        .route("/v1/companies", get(handlers::companies_handler))
        .route(
            "/v1/facets/:name/options",
            get(handlers::facet_options_handler),
        )
        .with_state(state)
}
