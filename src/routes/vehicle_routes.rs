//! Rutas HTTP del recurso Vehicle
//!
//! Los handlers parsean query/path/body, arman el controller desde el
//! estado compartido y traducen el resultado al envelope de la API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post, put},
    Json, Router,
};

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::vehicle_dto::{
    AvailabilityQuery, BulkUpdateRequest, CreateVehicleRequest, PopularQuery,
    UpdateVehicleRequest, VehicleFilters,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vehicles))
        .route("/", post(create_vehicle))
        .route("/available", get(list_available_vehicles))
        .route("/statistics", get(vehicle_statistics))
        .route("/popular", get(popular_vehicles))
        .route("/bulk-update", patch(bulk_update_vehicles))
        .route("/:id", get(get_vehicle))
        .route("/:id", put(update_vehicle))
        .route("/:id", delete(delete_vehicle))
        .route("/:id/toggle-availability", patch(toggle_vehicle_availability))
}

async fn list_vehicles(
    State(state): State<AppState>,
    Query(filters): Query<VehicleFilters>,
) -> Result<impl IntoResponse, AppError> {
    let controller = VehicleController::new(state.vehicle_service.clone());
    let response = controller.list(filters).await?;
    Ok(Json(response))
}

async fn list_available_vehicles(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<impl IntoResponse, AppError> {
    let controller = VehicleController::new(state.vehicle_service.clone());
    let response = controller
        .list_available(query.start_date.as_deref(), query.end_date.as_deref())
        .await?;
    Ok(Json(response))
}

async fn vehicle_statistics(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let controller = VehicleController::new(state.vehicle_service.clone());
    let response = controller.statistics().await?;
    Ok(Json(response))
}

async fn popular_vehicles(
    State(state): State<AppState>,
    Query(query): Query<PopularQuery>,
) -> Result<impl IntoResponse, AppError> {
    let controller = VehicleController::new(state.vehicle_service.clone());
    let response = controller.popular(query.limit).await?;
    Ok(Json(response))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let controller = VehicleController::new(state.vehicle_service.clone());
    let response = controller.get_by_id(&id).await?;
    Ok(Json(response))
}

async fn create_vehicle(
    State(state): State<AppState>,
    Json(request): Json<CreateVehicleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let controller = VehicleController::new(state.vehicle_service.clone());
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateVehicleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let controller = VehicleController::new(state.vehicle_service.clone());
    let response = controller.update(&id, request).await?;
    Ok(Json(response))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let controller = VehicleController::new(state.vehicle_service.clone());
    let response = controller.delete(&id).await?;
    Ok(Json(response))
}

async fn toggle_vehicle_availability(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let controller = VehicleController::new(state.vehicle_service.clone());
    let response = controller.toggle_availability(&id).await?;
    Ok(Json(response))
}

async fn bulk_update_vehicles(
    State(state): State<AppState>,
    Json(request): Json<BulkUpdateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let controller = VehicleController::new(state.vehicle_service.clone());
    let response = controller.bulk_update(request.ids, request.updates).await?;
    Ok(Json(response))
}
