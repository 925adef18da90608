//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! JSON endpoints are nested under `/api/`; the entry page sits at `/`.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::api::endpoints;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the application router.
pub fn api_router(core: Arc<CoreState>) -> Router {
    let ctx = ApiContext::new(core);

    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/symptoms", get(endpoints::symptoms::list))
        .route("/predict", post(endpoints::predict::submit))
        .route("/report/pdf", get(endpoints::export::download))
        .with_state(ctx);

    Router::new()
        .route("/", get(endpoints::page::index))
        .nest("/api", api)
}
