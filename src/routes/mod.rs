//! Rutas de la API
//!
//! Routers por recurso y el ensamblado de la aplicación completa.

use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::dto::{ApiResponse, MessageResponse};
use crate::middleware::cors::cors_middleware;
use crate::state::AppState;

pub mod auth_routes;
pub mod booking_routes;
pub mod trip_routes;

/// Router completo de la aplicación
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/api/v1", get(api_v1))
        .nest("/api/v1/auth", auth_routes::create_auth_router())
        .nest("/api/v1/trips", trip_routes::create_trip_router(state.clone()))
        .nest("/api/v1/bookings", booking_routes::create_booking_router(state.clone()))
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors_middleware(&state.config.cors_origins))
        .with_state(state)
}

async fn welcome() -> Json<ApiResponse<MessageResponse>> {
    Json(ApiResponse::success(MessageResponse {
        message: "Welcome to WayFarer API".to_string(),
        version: Some("v1"),
    }))
}

async fn api_v1() -> Json<ApiResponse<MessageResponse>> {
    Json(ApiResponse::success(MessageResponse::new("WayFarer API v1")))
}

async fn route_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "status": "error",
            "error": "Route not found"
        })),
    )
}
