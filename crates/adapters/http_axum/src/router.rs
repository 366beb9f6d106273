//! Axum router assembly.

use axum::Router;
use axum::http::StatusCode;
use axum::response::Response;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use devicestore_app::ports::DeviceRepository;

use crate::body;
use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Serves the liveness probe at `/` (and `/health`) and merges the device
/// routes. Includes a [`TraceLayer`] that logs each HTTP request/response at
/// the `DEBUG` level using the `tracing` ecosystem.
pub fn build<DR>(state: AppState<DR>) -> Router
where
    DR: DeviceRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .merge(crate::api::routes::<DR>())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> Response {
    tracing::debug!("health check");
    body::status_only(StatusCode::OK)
}
