//! Application route configuration.

use axum::{extract::State, middleware, response::Json, routing::get, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::{SERVICE_NAME, SERVICE_VERSION};

use super::handlers::user_routes;
use super::middleware::process_time_middleware;
use super::openapi::ApiDoc;
use super::AppState;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        // OpenAPI Swagger UI documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // User CRUD routes
        .nest("/users", user_routes())
        // Global middleware
        .layer(middleware::from_fn(process_time_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Welcome to Users API"
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    users: usize,
}

/// Health check endpoint.
///
/// The store is purely in-memory, so the only signal worth reporting
/// besides liveness is the current record count.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let users = state.user_service.count_users().await.unwrap_or(0);

    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        version: SERVICE_VERSION,
        users,
    })
}
