//! Controller del recurso Vehicle
//!
//! Un método por operación del servicio. El controller solo hace gating de
//! entrada: delega la validación al validador, chequea ids en blanco y
//! acota límites - la lógica de negocio vive en el servicio.

use crate::dto::response::ApiResponse;
use crate::dto::vehicle_dto::{
    CreateVehicleRequest, PaginatedVehicles, UpdateVehicleRequest, VehicleFilters,
};
use crate::models::vehicle::{Vehicle, VehicleStatistics};
use crate::services::vehicle_service::VehicleService;
use crate::utils::errors::AppError;
use crate::validators::vehicle_validator as validator;

/// Tope del listado de populares
const MAX_POPULAR_LIMIT: i64 = 50;
const DEFAULT_POPULAR_LIMIT: i64 = 10;

/// Máximo de ids por update masivo
const MAX_BULK_IDS: usize = 100;

pub struct VehicleController {
    service: VehicleService,
}

impl VehicleController {
    pub fn new(service: VehicleService) -> Self {
        Self { service }
    }

    pub async fn list(
        &self,
        filters: VehicleFilters,
    ) -> Result<ApiResponse<PaginatedVehicles>, AppError> {
        let filter_report = validator::validate_filters(&filters);
        let pagination_report = validator::validate_pagination(filters.page, filters.limit);

        let mut errors = filter_report.errors;
        errors.extend(pagination_report.errors);
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let page = self.service.list_vehicles(&filters).await?;
        Ok(ApiResponse::success(page))
    }

    pub async fn list_available(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<ApiResponse<Vec<Vehicle>>, AppError> {
        let report = validator::validate_date_range(start_date, end_date);
        if !report.is_valid {
            return Err(AppError::Validation(report.errors));
        }

        let vehicles = self.service.list_available().await?;
        Ok(ApiResponse::success(vehicles))
    }

    pub async fn get_by_id(&self, id: &str) -> Result<ApiResponse<Vehicle>, AppError> {
        require_id(id)?;
        let vehicle = self.service.get_vehicle(id).await?;
        Ok(ApiResponse::success(vehicle))
    }

    pub async fn create(
        &self,
        request: CreateVehicleRequest,
    ) -> Result<ApiResponse<Vehicle>, AppError> {
        let report = validator::validate_create(&request);
        if !report.is_valid {
            return Err(AppError::Validation(report.errors));
        }

        let vehicle = self.service.create_vehicle(request).await?;
        Ok(ApiResponse::success_with_message(
            vehicle,
            "Vehicle created successfully".to_string(),
        ))
    }

    pub async fn update(
        &self,
        id: &str,
        request: UpdateVehicleRequest,
    ) -> Result<ApiResponse<Vehicle>, AppError> {
        require_id(id)?;
        let report = validator::validate_update(&request);
        if !report.is_valid {
            return Err(AppError::Validation(report.errors));
        }

        let vehicle = self.service.update_vehicle(id, &request).await?;
        Ok(ApiResponse::success_with_message(
            vehicle,
            "Vehicle updated successfully".to_string(),
        ))
    }

    pub async fn delete(&self, id: &str) -> Result<ApiResponse<()>, AppError> {
        require_id(id)?;
        self.service.delete_vehicle(id).await?;
        Ok(ApiResponse::success_with_message(
            (),
            "Vehicle deleted successfully".to_string(),
        ))
    }

    pub async fn statistics(&self) -> Result<ApiResponse<VehicleStatistics>, AppError> {
        let statistics = self.service.statistics().await?;
        Ok(ApiResponse::success(statistics))
    }

    pub async fn popular(
        &self,
        limit: Option<i64>,
    ) -> Result<ApiResponse<Vec<Vehicle>>, AppError> {
        // Limit acotado a [1, 50] en lugar de rechazado
        let limit = limit
            .unwrap_or(DEFAULT_POPULAR_LIMIT)
            .clamp(1, MAX_POPULAR_LIMIT);
        let vehicles = self.service.popular_vehicles(limit as usize).await?;
        Ok(ApiResponse::success(vehicles))
    }

    pub async fn toggle_availability(&self, id: &str) -> Result<ApiResponse<Vehicle>, AppError> {
        require_id(id)?;
        let vehicle = self.service.toggle_availability(id).await?;
        let state = if vehicle.is_available {
            "available"
        } else {
            "unavailable"
        };
        Ok(ApiResponse::success_with_message(
            vehicle,
            format!("Vehicle is now {}", state),
        ))
    }

    pub async fn bulk_update(
        &self,
        ids: Vec<String>,
        updates: UpdateVehicleRequest,
    ) -> Result<ApiResponse<Vec<Vehicle>>, AppError> {
        if ids.is_empty() {
            return Err(AppError::Validation(vec![
                "ids must contain at least one vehicle id".to_string(),
            ]));
        }
        if ids.len() > MAX_BULK_IDS {
            return Err(AppError::Validation(vec![format!(
                "ids must contain at most {} entries",
                MAX_BULK_IDS
            )]));
        }
        let report = validator::validate_update(&updates);
        if !report.is_valid {
            return Err(AppError::Validation(report.errors));
        }

        let requested = ids.len();
        let updated = self.service.bulk_update(&ids, &updates).await?;
        let message = format!("Updated {} of {} vehicles", updated.len(), requested);
        Ok(ApiResponse::success_with_message(updated, message))
    }
}

fn require_id(id: &str) -> Result<(), AppError> {
    if id.trim().is_empty() {
        return Err(AppError::BadRequest("Vehicle id is required".to_string()));
    }
    Ok(())
}
