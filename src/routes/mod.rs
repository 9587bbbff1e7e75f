//! Route definitions for the dashboard API.

pub mod activities;
pub mod agents;
pub mod analytics;
pub mod health;
pub mod overview;
pub mod systems;

use axum::extract::{FromRequestParts, Query};
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::errors::AppError;
use crate::AppState;

/// Query-string extractor whose rejections use the JSON error envelope.
#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let cors = match state.config.frontend_url.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new().allow_origin(origin),
        Err(_) => {
            tracing::warn!(
                frontend_url = %state.config.frontend_url,
                "Invalid FRONTEND_URL, allowing any origin"
            );
            CorsLayer::new().allow_origin(Any)
        }
    }
    .allow_methods([Method::GET])
    .allow_headers(Any);

    let api_routes = Router::new()
        .route("/overview", get(overview::get))
        .route("/agents", get(agents::list))
        .route("/activities", get(activities::list))
        .route("/analytics", get(analytics::list))
        .route("/systems", get(systems::list));

    Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
