//! Reglas de validación del recurso Vehicle
//!
//! Cinco puntos de entrada puros, sin efectos: create, update, filtros,
//! paginación y rango de fechas. Los errores se acumulan en una lista de
//! mensajes legibles - nunca se corta en el primer fallo.

use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest, VehicleFilters};
use crate::models::vehicle::{FuelType, Transmission, VehicleCategory};
use chrono::NaiveDate;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// Campos aceptados como clave de ordenación del listado
pub const SORT_FIELDS: &[&str] = &[
    "make",
    "model",
    "year",
    "price_per_day",
    "mileage",
    "capacity",
    "created_at",
];

const SORT_ORDERS: &[&str] = &["asc", "desc"];

/// Límite máximo de resultados por página
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Resultado de una validación: bandera más mensajes acumulados
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Chequeo genérico de positividad estricta
pub fn is_positive<T: PartialOrd + num_traits::Zero>(value: &T) -> bool {
    *value > T::zero()
}

/// Aplanar los errores del derive `validator` a mensajes legibles
fn flatten_errors(errors: &ValidationErrors, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        if let ValidationErrorsKind::Field(field_errors) = kind {
            for error in field_errors {
                match &error.message {
                    Some(message) => out.push(message.to_string()),
                    None => out.push(format!("{}: invalid value ({})", field, error.code)),
                }
            }
        }
    }
}

/// Chequear pertenencia de un valor a una lista de valores permitidos
fn check_membership(field: &str, value: &str, allowed: &[&str], out: &mut Vec<String>) {
    if !allowed.contains(&value) {
        out.push(format!(
            "{} must be one of: {} (got '{}')",
            field,
            allowed.join(", "),
            value
        ));
    }
}

/// Validar un request de creación - todos los campos requeridos
pub fn validate_create(request: &CreateVehicleRequest) -> ValidationReport {
    let mut errors = Vec::new();

    if let Err(shape_errors) = request.validate() {
        flatten_errors(&shape_errors, &mut errors);
    }

    check_membership("fuel_type", &request.fuel_type, FuelType::ALLOWED, &mut errors);
    check_membership(
        "transmission",
        &request.transmission,
        Transmission::ALLOWED,
        &mut errors,
    );
    check_membership(
        "category",
        &request.category,
        VehicleCategory::ALLOWED,
        &mut errors,
    );

    errors.sort();
    ValidationReport::from_errors(errors)
}

/// Validar un request de actualización - campos opcionales, mismas reglas
pub fn validate_update(request: &UpdateVehicleRequest) -> ValidationReport {
    let mut errors = Vec::new();

    if let Err(shape_errors) = request.validate() {
        flatten_errors(&shape_errors, &mut errors);
    }

    if let Some(ref fuel_type) = request.fuel_type {
        check_membership("fuel_type", fuel_type, FuelType::ALLOWED, &mut errors);
    }
    if let Some(ref transmission) = request.transmission {
        check_membership("transmission", transmission, Transmission::ALLOWED, &mut errors);
    }
    if let Some(ref category) = request.category {
        check_membership("category", category, VehicleCategory::ALLOWED, &mut errors);
    }

    errors.sort();
    ValidationReport::from_errors(errors)
}

/// Validar filtros de listado: enums, orden y consistencia de rangos
pub fn validate_filters(filters: &VehicleFilters) -> ValidationReport {
    let mut errors = Vec::new();

    if let Some(ref category) = filters.category {
        check_membership("category", category, VehicleCategory::ALLOWED, &mut errors);
    }
    if let Some(ref fuel_type) = filters.fuel_type {
        check_membership("fuel_type", fuel_type, FuelType::ALLOWED, &mut errors);
    }
    if let Some(ref transmission) = filters.transmission {
        check_membership("transmission", transmission, Transmission::ALLOWED, &mut errors);
    }
    if let Some(ref sort_by) = filters.sort_by {
        check_membership("sort_by", sort_by, SORT_FIELDS, &mut errors);
    }
    if let Some(ref sort_order) = filters.sort_order {
        check_membership("sort_order", sort_order, SORT_ORDERS, &mut errors);
    }

    if let (Some(min_price), Some(max_price)) = (filters.min_price, filters.max_price) {
        if min_price > max_price {
            errors.push("min_price must not be greater than max_price".to_string());
        }
    }
    if let Some(min_price) = filters.min_price {
        if min_price < rust_decimal::Decimal::ZERO {
            errors.push("min_price must be non-negative".to_string());
        }
    }
    if let (Some(min_year), Some(max_year)) = (filters.min_year, filters.max_year) {
        if min_year > max_year {
            errors.push("min_year must not be greater than max_year".to_string());
        }
    }

    ValidationReport::from_errors(errors)
}

/// Validar parámetros de paginación: page >= 1, 1 <= limit <= 100
pub fn validate_pagination(page: Option<i64>, limit: Option<i64>) -> ValidationReport {
    let mut errors = Vec::new();

    if let Some(page) = page {
        if page < 1 {
            errors.push("page must be greater than or equal to 1".to_string());
        }
    }
    if let Some(limit) = limit {
        if limit < 1 || limit > MAX_PAGE_LIMIT {
            errors.push(format!("limit must be between 1 and {}", MAX_PAGE_LIMIT));
        }
    }

    ValidationReport::from_errors(errors)
}

/// Validar un rango de fechas YYYY-MM-DD: ambas parseables, inicio < fin
pub fn validate_date_range(start_date: Option<&str>, end_date: Option<&str>) -> ValidationReport {
    let mut errors = Vec::new();

    let start = match start_date {
        Some(value) => match parse_date(value) {
            Some(date) => Some(date),
            None => {
                errors.push(format!("start_date '{}' is not a valid date (YYYY-MM-DD)", value));
                None
            }
        },
        None => {
            errors.push("start_date is required".to_string());
            None
        }
    };

    let end = match end_date {
        Some(value) => match parse_date(value) {
            Some(date) => Some(date),
            None => {
                errors.push(format!("end_date '{}' is not a valid date (YYYY-MM-DD)", value));
                None
            }
        },
        None => {
            errors.push("end_date is required".to_string());
            None
        }
    };

    if let (Some(start), Some(end)) = (start, end) {
        if start >= end {
            errors.push("start_date must be strictly before end_date".to_string());
        }
    }

    ValidationReport::from_errors(errors)
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn valid_create_request() -> CreateVehicleRequest {
        CreateVehicleRequest {
            make: "Tesla".to_string(),
            model: "Model 3".to_string(),
            year: 2023,
            color: "white".to_string(),
            license_plate: "ABC-1234".to_string(),
            vin: "5YJ3E1EA0KF123456".to_string(),
            fuel_type: "electric".to_string(),
            transmission: "automatic".to_string(),
            category: "mid-size".to_string(),
            price_per_day: Decimal::new(8999, 2),
            mileage: Some(12_000),
            capacity: 5,
            location_id: None,
            features: Some(vec!["autopilot".to_string()]),
            image_urls: None,
        }
    }

    #[test]
    fn test_validate_create_accepts_valid_request() {
        let report = validate_create(&valid_create_request());
        assert!(report.is_valid, "unexpected errors: {:?}", report.errors);
    }

    #[test]
    fn test_validate_create_rejects_year_out_of_range() {
        let mut request = valid_create_request();
        request.year = 1899;
        let report = validate_create(&request);
        assert!(!report.is_valid);
        assert!(report
            .errors
            .iter()
            .any(|e| e.contains("year must be between 1900 and 2030")));

        request.year = 2031;
        assert!(!validate_create(&request).is_valid);
    }

    #[test]
    fn test_validate_create_rejects_bad_vin() {
        let mut request = valid_create_request();
        request.vin = "INVALID".to_string();
        let report = validate_create(&request);
        assert!(!report.is_valid);
        assert!(report.errors.iter().any(|e| e.contains("vin")));
    }

    #[test]
    fn test_validate_create_rejects_unknown_enum_values() {
        let mut request = valid_create_request();
        request.fuel_type = "kerosene".to_string();
        request.transmission = "cvt".to_string();
        request.category = "rocket".to_string();
        let report = validate_create(&request);
        // Los tres fallos se reportan juntos
        assert_eq!(report.errors.len(), 3);
    }

    #[test]
    fn test_validate_create_rejects_non_positive_price() {
        let mut request = valid_create_request();
        request.price_per_day = Decimal::ZERO;
        assert!(!validate_create(&request).is_valid);

        request.price_per_day = Decimal::new(-100, 2);
        assert!(!validate_create(&request).is_valid);
    }

    #[test]
    fn test_validate_create_accumulates_all_errors() {
        let mut request = valid_create_request();
        request.make = String::new();
        request.year = 1800;
        request.vin = "BAD".to_string();
        request.capacity = 0;
        let report = validate_create(&request);
        assert!(report.errors.len() >= 4);
    }

    #[test]
    fn test_validate_update_empty_is_valid() {
        let report = validate_update(&UpdateVehicleRequest::empty());
        assert!(report.is_valid);
    }

    #[test]
    fn test_validate_update_checks_present_fields() {
        let mut request = UpdateVehicleRequest::empty();
        request.year = Some(2050);
        request.category = Some("spaceship".to_string());
        let report = validate_update(&request);
        assert_eq!(report.errors.len(), 2);
    }

    #[test]
    fn test_validate_filters_price_range_consistency() {
        let filters = VehicleFilters {
            min_price: Some(Decimal::new(10_000, 2)),
            max_price: Some(Decimal::new(5_000, 2)),
            ..Default::default()
        };
        let report = validate_filters(&filters);
        assert!(!report.is_valid);
        assert!(report
            .errors
            .iter()
            .any(|e| e.contains("min_price must not be greater than max_price")));
    }

    #[test]
    fn test_validate_filters_year_range_consistency() {
        let filters = VehicleFilters {
            min_year: Some(2024),
            max_year: Some(2020),
            ..Default::default()
        };
        assert!(!validate_filters(&filters).is_valid);
    }

    #[test]
    fn test_validate_filters_sort_membership() {
        let filters = VehicleFilters {
            sort_by: Some("horsepower".to_string()),
            sort_order: Some("sideways".to_string()),
            ..Default::default()
        };
        let report = validate_filters(&filters);
        assert_eq!(report.errors.len(), 2);
    }

    #[test]
    fn test_validate_pagination_bounds() {
        assert!(validate_pagination(Some(1), Some(1)).is_valid);
        assert!(validate_pagination(Some(3), Some(100)).is_valid);
        assert!(validate_pagination(None, None).is_valid);
        assert!(!validate_pagination(Some(0), None).is_valid);
        assert!(!validate_pagination(Some(-1), None).is_valid);
        assert!(!validate_pagination(None, Some(0)).is_valid);
        assert!(!validate_pagination(None, Some(101)).is_valid);
    }

    #[test]
    fn test_validate_date_range() {
        assert!(validate_date_range(Some("2026-09-01"), Some("2026-09-05")).is_valid);
        // inicio estrictamente antes del fin
        assert!(!validate_date_range(Some("2026-09-05"), Some("2026-09-05")).is_valid);
        assert!(!validate_date_range(Some("2026-09-06"), Some("2026-09-05")).is_valid);
        assert!(!validate_date_range(Some("not-a-date"), Some("2026-09-05")).is_valid);
        assert!(!validate_date_range(None, Some("2026-09-05")).is_valid);
        assert!(!validate_date_range(Some("2026-09-01"), None).is_valid);
    }

    #[test]
    fn test_is_positive() {
        assert!(is_positive(&5));
        assert!(!is_positive(&0));
        assert!(!is_positive(&-5));
        assert!(is_positive(&Decimal::new(1, 2)));
    }
}
