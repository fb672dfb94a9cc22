use std::sync::Arc;

use axum::{routing::get, Router};

use shared_config::AppConfig;

use crate::handlers;

// Bearer tokens are forwarded to persistence untouched; row-level policies
// there decide who may read or replace a provider's rules.
pub fn availability_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/weekdays", get(handlers::list_weekdays))
        .route(
            "/{provider_id}/availability",
            get(handlers::get_provider_availability).put(handlers::replace_provider_availability),
        )
        .route("/{provider_id}/slots", get(handlers::get_available_slots))
        .with_state(state)
}
