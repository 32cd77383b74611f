//! DTOs del recurso Vehicle
//!
//! Requests de creación/actualización/filtrado con sus reglas de forma
//! (longitud, rango, patrón) declaradas via `validator`. Las reglas de
//! pertenencia a enums y de consistencia entre campos viven en
//! `validators::vehicle_validator`.

use crate::models::vehicle::Vehicle;
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

lazy_static! {
    /// 1-20 caracteres alfanuméricos, guiones o espacios
    pub static ref LICENSE_PLATE_RE: Regex = Regex::new(r"^[A-Za-z0-9 -]{1,20}$").unwrap();
    /// VIN: exactamente 17 caracteres en mayúsculas, alfabeto sin I/O/Q
    pub static ref VIN_RE: Regex = Regex::new(r"^[A-HJ-NPR-Z0-9]{17}$").unwrap();
}

fn validate_positive_price(value: &Decimal) -> Result<(), ValidationError> {
    if !crate::validators::vehicle_validator::is_positive(value) {
        let mut error = ValidationError::new("price_per_day");
        error.message = Some("price_per_day must be a positive amount".into());
        return Err(error);
    }
    Ok(())
}

/// Request para crear un vehículo - todos los campos requeridos
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(length(min = 1, max = 100, message = "make is required (1-100 characters)"))]
    pub make: String,

    #[validate(length(min = 1, max = 100, message = "model is required (1-100 characters)"))]
    pub model: String,

    #[validate(range(min = 1900, max = 2030, message = "year must be between 1900 and 2030"))]
    pub year: i32,

    #[validate(length(min = 1, max = 50, message = "color is required (1-50 characters)"))]
    pub color: String,

    #[validate(regex(
        path = "LICENSE_PLATE_RE",
        message = "license_plate must be 1-20 alphanumeric, dash or space characters"
    ))]
    pub license_plate: String,

    #[validate(regex(
        path = "VIN_RE",
        message = "vin must be exactly 17 characters (letters I, O and Q are not allowed)"
    ))]
    pub vin: String,

    pub fuel_type: String,
    pub transmission: String,
    pub category: String,

    #[validate(custom = "validate_positive_price")]
    pub price_per_day: Decimal,

    #[validate(range(min = 0, message = "mileage must be non-negative"))]
    pub mileage: Option<i64>,

    #[validate(range(min = 1, max = 12, message = "capacity must be between 1 and 12"))]
    pub capacity: i32,

    pub location_id: Option<String>,
    pub features: Option<Vec<String>>,
    pub image_urls: Option<Vec<String>>,
}

/// Request para actualizar un vehículo - campos opcionales
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    #[validate(length(min = 1, max = 100, message = "make must be 1-100 characters"))]
    pub make: Option<String>,

    #[validate(length(min = 1, max = 100, message = "model must be 1-100 characters"))]
    pub model: Option<String>,

    #[validate(range(min = 1900, max = 2030, message = "year must be between 1900 and 2030"))]
    pub year: Option<i32>,

    #[validate(length(min = 1, max = 50, message = "color must be 1-50 characters"))]
    pub color: Option<String>,

    #[validate(regex(
        path = "LICENSE_PLATE_RE",
        message = "license_plate must be 1-20 alphanumeric, dash or space characters"
    ))]
    pub license_plate: Option<String>,

    #[validate(regex(
        path = "VIN_RE",
        message = "vin must be exactly 17 characters (letters I, O and Q are not allowed)"
    ))]
    pub vin: Option<String>,

    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    pub category: Option<String>,

    #[validate(custom = "validate_positive_price")]
    pub price_per_day: Option<Decimal>,

    #[validate(range(min = 0, message = "mileage must be non-negative"))]
    pub mileage: Option<i64>,

    #[validate(range(min = 1, max = 12, message = "capacity must be between 1 and 12"))]
    pub capacity: Option<i32>,

    pub is_available: Option<bool>,
    pub location_id: Option<String>,
    pub features: Option<Vec<String>>,
    pub image_urls: Option<Vec<String>>,
}

impl UpdateVehicleRequest {
    /// Request vacío - útil como base para updates parciales
    pub fn empty() -> Self {
        Self {
            make: None,
            model: None,
            year: None,
            color: None,
            license_plate: None,
            vin: None,
            fuel_type: None,
            transmission: None,
            category: None,
            price_per_day: None,
            mileage: None,
            capacity: None,
            is_available: None,
            location_id: None,
            features: None,
            image_urls: None,
        }
    }
}

/// Filtros, orden y paginación para el listado de vehículos
#[derive(Debug, Default, Deserialize)]
pub struct VehicleFilters {
    pub make: Option<String>,
    pub model: Option<String>,
    pub category: Option<String>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    pub is_available: Option<bool>,
    pub location_id: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Query de disponibilidad por rango de fechas (YYYY-MM-DD)
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Query del listado de populares
#[derive(Debug, Deserialize)]
pub struct PopularQuery {
    pub limit: Option<i64>,
}

/// Request de actualización masiva
#[derive(Debug, Deserialize)]
pub struct BulkUpdateRequest {
    pub ids: Vec<String>,
    pub updates: UpdateVehicleRequest,
}

/// Página de resultados del listado
#[derive(Debug, Serialize)]
pub struct PaginatedVehicles {
    pub items: Vec<Vehicle>,
    pub total: usize,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_license_plate_pattern() {
        assert!(LICENSE_PLATE_RE.is_match("ABC-1234"));
        assert!(LICENSE_PLATE_RE.is_match("AB 12 CD"));
        assert!(!LICENSE_PLATE_RE.is_match(""));
        assert!(!LICENSE_PLATE_RE.is_match("PLATE_WITH_UNDERSCORE"));
        assert!(!LICENSE_PLATE_RE.is_match(&"A".repeat(21)));
    }

    #[test]
    fn test_vin_pattern() {
        assert!(VIN_RE.is_match("5YJ3E1EA0KF123456"));
        // I, O y Q excluidos del alfabeto VIN
        assert!(!VIN_RE.is_match("5YJ3E1EA0KF12345I"));
        assert!(!VIN_RE.is_match("5YJ3E1EA0KF12345O"));
        assert!(!VIN_RE.is_match("5YJ3E1EA0KF12345Q"));
        assert!(!VIN_RE.is_match("SHORT"));
        assert!(!VIN_RE.is_match("5YJ3E1EA0KF1234567"));
        // solo mayúsculas
        assert!(!VIN_RE.is_match("5yj3e1ea0kf123456"));
    }
}
