//! Backend de gestión de flota de alquiler
//!
//! API HTTP sobre el recurso Vehicle: validación por capas, servicio sobre
//! un repositorio intercambiable y rutas Axum montadas en `/api/vehicles`.

pub mod config;
pub mod controllers;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
pub mod validators;

use axum::{response::Json, routing::get, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use middleware::cors::{cors_middleware, cors_middleware_with_origins};
use state::AppState;

/// Armar el router completo de la aplicación
pub fn create_app(state: AppState) -> Router {
    let cors = if state.config.is_production() && !state.config.cors_origins.is_empty() {
        cors_middleware_with_origins(&state.config.cors_origins)
    } else {
        cors_middleware()
    };

    Router::new()
        .route("/health", get(health_check))
        .nest(
            "/api/vehicles",
            routes::vehicle_routes::create_vehicle_router(),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Endpoint de liveness
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "rental-fleet-api",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
