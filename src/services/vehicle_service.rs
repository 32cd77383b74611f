//! Servicio del recurso Vehicle
//!
//! Lógica de negocio sobre el repositorio: listado con filtro, orden y
//! paginación, altas/bajas/modificaciones, estadísticas agregadas y
//! actualización masiva. El servicio asume entradas ya validadas - no
//! re-valida (el gating es responsabilidad del controller).

use crate::dto::vehicle_dto::{
    CreateVehicleRequest, PaginatedVehicles, UpdateVehicleRequest, VehicleFilters,
};
use crate::models::vehicle::{
    FuelType, Transmission, Vehicle, VehicleCategory, VehicleStatistics,
};
use crate::repositories::vehicle_repository::{new_vehicle_id, VehicleRepository};
use crate::utils::errors::{not_found_error, AppError};
use chrono::Utc;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 10;

#[derive(Clone)]
pub struct VehicleService {
    repository: Arc<dyn VehicleRepository>,
}

impl VehicleService {
    pub fn new(repository: Arc<dyn VehicleRepository>) -> Self {
        Self { repository }
    }

    /// Listado con filtro, orden y paginación
    pub async fn list_vehicles(
        &self,
        filters: &VehicleFilters,
    ) -> Result<PaginatedVehicles, AppError> {
        let mut vehicles: Vec<Vehicle> = self
            .repository
            .find_all()
            .await?
            .into_iter()
            .filter(|vehicle| matches_filters(vehicle, filters))
            .collect();

        let sort_by = filters.sort_by.as_deref().unwrap_or("created_at");
        let descending = matches!(filters.sort_order.as_deref(), Some("desc"));
        // Orden estable: los empates conservan el orden natural
        vehicles.sort_by(|a, b| {
            let ordering = compare_by_field(a, b, sort_by);
            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        });

        let page = filters.page.unwrap_or(DEFAULT_PAGE);
        let limit = filters.limit.unwrap_or(DEFAULT_LIMIT);
        let total = vehicles.len();
        let total_pages = (total as i64 + limit - 1) / limit;

        // Una página más allá del final es una página vacía, no un overflow
        let offset = (page - 1)
            .checked_mul(limit)
            .and_then(|offset| usize::try_from(offset).ok())
            .unwrap_or(usize::MAX);
        let items: Vec<Vehicle> = vehicles
            .into_iter()
            .skip(offset)
            .take(limit as usize)
            .collect();

        Ok(PaginatedVehicles {
            items,
            total,
            page,
            limit,
            total_pages,
        })
    }

    /// Vehículos disponibles en el rango pedido.
    ///
    /// Sin un libro de reservas la disponibilidad es solo la bandera
    /// `is_available`; el rango de fechas se valida aguas arriba y queda
    /// como parte del contrato para un filtrado por reservas futuro.
    pub async fn list_available(&self) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = self
            .repository
            .find_all()
            .await?
            .into_iter()
            .filter(|vehicle| vehicle.is_available)
            .collect();
        Ok(vehicles)
    }

    pub async fn get_vehicle(&self, id: &str) -> Result<Vehicle, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle"))
    }

    /// Crear un vehículo: id, timestamps y defaults los pone el servicio
    pub async fn create_vehicle(
        &self,
        request: CreateVehicleRequest,
    ) -> Result<Vehicle, AppError> {
        let now = Utc::now();
        let vehicle = Vehicle {
            id: new_vehicle_id(),
            make: request.make,
            model: request.model,
            year: request.year,
            color: request.color,
            license_plate: request.license_plate,
            vin: request.vin,
            fuel_type: parse_enum::<FuelType>(&request.fuel_type)?,
            transmission: parse_enum::<Transmission>(&request.transmission)?,
            category: parse_enum::<VehicleCategory>(&request.category)?,
            price_per_day: request.price_per_day,
            mileage: request.mileage.unwrap_or(0),
            capacity: request.capacity,
            is_available: true,
            location_id: request.location_id,
            features: request.features.unwrap_or_default(),
            image_urls: request.image_urls.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        let created = self.repository.insert(vehicle).await?;
        tracing::info!("Vehicle created: {} {} ({})", created.make, created.model, created.id);
        Ok(created)
    }

    /// Update parcial: los campos ausentes conservan su valor actual.
    /// El merge corre bajo el write lock del repositorio para que dos
    /// PATCH concurrentes sobre el mismo id no se pisen.
    pub async fn update_vehicle(
        &self,
        id: &str,
        request: &UpdateVehicleRequest,
    ) -> Result<Vehicle, AppError> {
        // Los enums se parsean antes de tomar el lock
        let fuel_type = request
            .fuel_type
            .as_deref()
            .map(parse_enum::<FuelType>)
            .transpose()?;
        let transmission = request
            .transmission
            .as_deref()
            .map(parse_enum::<Transmission>)
            .transpose()?;
        let category = request
            .category
            .as_deref()
            .map(parse_enum::<VehicleCategory>)
            .transpose()?;
        let request = request.clone();

        self.repository
            .update_with(
                id,
                Box::new(move |vehicle| {
                    if let Some(make) = request.make {
                        vehicle.make = make;
                    }
                    if let Some(model) = request.model {
                        vehicle.model = model;
                    }
                    if let Some(year) = request.year {
                        vehicle.year = year;
                    }
                    if let Some(color) = request.color {
                        vehicle.color = color;
                    }
                    if let Some(license_plate) = request.license_plate {
                        vehicle.license_plate = license_plate;
                    }
                    if let Some(vin) = request.vin {
                        vehicle.vin = vin;
                    }
                    if let Some(fuel_type) = fuel_type {
                        vehicle.fuel_type = fuel_type;
                    }
                    if let Some(transmission) = transmission {
                        vehicle.transmission = transmission;
                    }
                    if let Some(category) = category {
                        vehicle.category = category;
                    }
                    if let Some(price_per_day) = request.price_per_day {
                        vehicle.price_per_day = price_per_day;
                    }
                    if let Some(mileage) = request.mileage {
                        vehicle.mileage = mileage;
                    }
                    if let Some(capacity) = request.capacity {
                        vehicle.capacity = capacity;
                    }
                    if let Some(is_available) = request.is_available {
                        vehicle.is_available = is_available;
                    }
                    if let Some(location_id) = request.location_id {
                        vehicle.location_id = Some(location_id);
                    }
                    if let Some(features) = request.features {
                        vehicle.features = features;
                    }
                    if let Some(image_urls) = request.image_urls {
                        vehicle.image_urls = image_urls;
                    }
                    vehicle.updated_at = Utc::now();
                }),
            )
            .await?
            .ok_or_else(|| not_found_error("Vehicle"))
    }

    pub async fn delete_vehicle(&self, id: &str) -> Result<(), AppError> {
        if !self.repository.delete(id).await? {
            return Err(not_found_error("Vehicle"));
        }
        tracing::info!("Vehicle deleted: {}", id);
        Ok(())
    }

    /// Estadísticas agregadas de la flota
    pub async fn statistics(&self) -> Result<VehicleStatistics, AppError> {
        let vehicles = self.repository.find_all().await?;
        let total = vehicles.len();
        let available = vehicles.iter().filter(|v| v.is_available).count();

        let (average_price_per_day, average_year) = if total == 0 {
            (Decimal::ZERO, 0.0)
        } else {
            let price_sum: Decimal = vehicles.iter().map(|v| v.price_per_day).sum();
            let year_sum: i64 = vehicles.iter().map(|v| i64::from(v.year)).sum();
            (
                price_sum / Decimal::from(total),
                year_sum as f64 / total as f64,
            )
        };

        let mut by_category: BTreeMap<String, usize> = BTreeMap::new();
        let mut by_fuel_type: BTreeMap<String, usize> = BTreeMap::new();
        for vehicle in &vehicles {
            *by_category
                .entry(vehicle.category.as_str().to_string())
                .or_insert(0) += 1;
            *by_fuel_type
                .entry(vehicle.fuel_type.as_str().to_string())
                .or_insert(0) += 1;
        }

        Ok(VehicleStatistics {
            total_vehicles: total,
            available_vehicles: available,
            unavailable_vehicles: total - available,
            average_price_per_day,
            average_year,
            by_category,
            by_fuel_type,
        })
    }

    /// Vehículos más recientes por año de fabricación, descendente
    pub async fn popular_vehicles(&self, limit: usize) -> Result<Vec<Vehicle>, AppError> {
        let mut vehicles = self.repository.find_all().await?;
        vehicles.sort_by(|a, b| b.year.cmp(&a.year));
        vehicles.truncate(limit);
        Ok(vehicles)
    }

    pub async fn toggle_availability(&self, id: &str) -> Result<Vehicle, AppError> {
        self.repository
            .update_with(
                id,
                Box::new(|vehicle| {
                    vehicle.is_available = !vehicle.is_available;
                    vehicle.updated_at = Utc::now();
                }),
            )
            .await?
            .ok_or_else(|| not_found_error("Vehicle"))
    }

    /// Update masivo: los ids que fallan se saltan silenciosamente
    pub async fn bulk_update(
        &self,
        ids: &[String],
        updates: &UpdateVehicleRequest,
    ) -> Result<Vec<Vehicle>, AppError> {
        let mut updated = Vec::with_capacity(ids.len());
        for id in ids {
            match self.update_vehicle(id, updates).await {
                Ok(vehicle) => updated.push(vehicle),
                Err(error) => {
                    tracing::debug!("Bulk update skipped vehicle {}: {}", id, error);
                }
            }
        }
        Ok(updated)
    }
}

fn parse_enum<T: FromStr<Err = String>>(value: &str) -> Result<T, AppError> {
    value.parse::<T>().map_err(AppError::BadRequest)
}

fn matches_filters(vehicle: &Vehicle, filters: &VehicleFilters) -> bool {
    if let Some(ref make) = filters.make {
        if !vehicle.make.to_lowercase().contains(&make.to_lowercase()) {
            return false;
        }
    }
    if let Some(ref model) = filters.model {
        if !vehicle.model.to_lowercase().contains(&model.to_lowercase()) {
            return false;
        }
    }
    if let Some(ref category) = filters.category {
        if vehicle.category.as_str() != category {
            return false;
        }
    }
    if let Some(ref fuel_type) = filters.fuel_type {
        if vehicle.fuel_type.as_str() != fuel_type {
            return false;
        }
    }
    if let Some(ref transmission) = filters.transmission {
        if vehicle.transmission.as_str() != transmission {
            return false;
        }
    }
    if let Some(min_price) = filters.min_price {
        if vehicle.price_per_day < min_price {
            return false;
        }
    }
    if let Some(max_price) = filters.max_price {
        if vehicle.price_per_day > max_price {
            return false;
        }
    }
    if let Some(min_year) = filters.min_year {
        if vehicle.year < min_year {
            return false;
        }
    }
    if let Some(max_year) = filters.max_year {
        if vehicle.year > max_year {
            return false;
        }
    }
    if let Some(is_available) = filters.is_available {
        if vehicle.is_available != is_available {
            return false;
        }
    }
    if let Some(ref location_id) = filters.location_id {
        if vehicle.location_id.as_deref() != Some(location_id.as_str()) {
            return false;
        }
    }
    true
}

/// Orden total sobre el campo pedido; strings comparados case-folded,
/// fechas como valores lineales de tiempo
fn compare_by_field(a: &Vehicle, b: &Vehicle, field: &str) -> Ordering {
    match field {
        "make" => a.make.to_lowercase().cmp(&b.make.to_lowercase()),
        "model" => a.model.to_lowercase().cmp(&b.model.to_lowercase()),
        "year" => a.year.cmp(&b.year),
        "price_per_day" => a.price_per_day.cmp(&b.price_per_day),
        "mileage" => a.mileage.cmp(&b.mileage),
        "capacity" => a.capacity.cmp(&b.capacity),
        "created_at" => a.created_at.cmp(&b.created_at),
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::vehicle_repository::InMemoryVehicleRepository;

    fn service() -> VehicleService {
        VehicleService::new(Arc::new(InMemoryVehicleRepository::seeded()))
    }

    fn create_request(make: &str, model: &str, year: i32, price_cents: i64) -> CreateVehicleRequest {
        CreateVehicleRequest {
            make: make.to_string(),
            model: model.to_string(),
            year,
            color: "black".to_string(),
            license_plate: "TST-0001".to_string(),
            vin: "WAUZZZ8K9AA123456".to_string(),
            fuel_type: "gasoline".to_string(),
            transmission: "manual".to_string(),
            category: "compact".to_string(),
            price_per_day: Decimal::new(price_cents, 2),
            mileage: None,
            capacity: 4,
            location_id: None,
            features: None,
            image_urls: None,
        }
    }

    #[tokio::test]
    async fn test_create_sets_defaults() {
        let service = service();
        let created = service
            .create_vehicle(create_request("Audi", "A3", 2021, 5500))
            .await
            .unwrap();

        assert!(!created.id.is_empty());
        assert!(created.is_available);
        assert_eq!(created.mileage, 0);
        assert!(created.features.is_empty());

        // El alta es observable en la siguiente lectura
        let fetched = service.get_vehicle(&created.id).await.unwrap();
        assert_eq!(fetched.make, "Audi");
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_not_found() {
        let service = service();
        let error = service.get_vehicle("does-not-exist").await.unwrap_err();
        assert!(matches!(error, AppError::NotFound(ref msg) if msg == "Vehicle not found"));
    }

    #[tokio::test]
    async fn test_list_filters_by_fuel_type() {
        let service = service();
        let filters = VehicleFilters {
            fuel_type: Some("electric".to_string()),
            ..Default::default()
        };
        let page = service.list_vehicles(&filters).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].make, "Tesla");
    }

    #[tokio::test]
    async fn test_list_sorts_strings_case_folded() {
        let service = service();
        service
            .create_vehicle(create_request("audi", "A3", 2021, 5500))
            .await
            .unwrap();
        service
            .create_vehicle(create_request("BMW", "320i", 2020, 6500))
            .await
            .unwrap();

        let filters = VehicleFilters {
            sort_by: Some("make".to_string()),
            ..Default::default()
        };
        let page = service.list_vehicles(&filters).await.unwrap();
        let makes: Vec<&str> = page.items.iter().map(|v| v.make.as_str()).collect();
        assert_eq!(makes, vec!["audi", "BMW", "Tesla", "Toyota"]);
    }

    #[tokio::test]
    async fn test_list_paginates() {
        let service = service();
        for i in 0..5 {
            service
                .create_vehicle(create_request("Make", &format!("M{}", i), 2020, 3000))
                .await
                .unwrap();
        }

        let filters = VehicleFilters {
            page: Some(2),
            limit: Some(3),
            sort_by: Some("model".to_string()),
            ..Default::default()
        };
        let page = service.list_vehicles(&filters).await.unwrap();
        assert_eq!(page.total, 7);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.page, 2);
    }

    #[tokio::test]
    async fn test_list_with_huge_page_returns_empty_page() {
        let service = service();
        let filters = VehicleFilters {
            page: Some(i64::MAX),
            limit: Some(100),
            ..Default::default()
        };
        let page = service.list_vehicles(&filters).await.unwrap();
        assert_eq!(page.total, 2);
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_toggles_do_not_lose_updates() {
        let service = service();
        let id = service.repository.find_all().await.unwrap()[0].id.clone();

        let mut handles = Vec::new();
        for _ in 0..10 {
            let service = service.clone();
            let id = id.clone();
            handles.push(tokio::spawn(async move {
                service.toggle_availability(&id).await.unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // Un número par de toggles siempre vuelve al estado inicial
        let vehicle = service.get_vehicle(&id).await.unwrap();
        assert!(vehicle.is_available);
    }

    #[tokio::test]
    async fn test_update_is_partial_and_bumps_updated_at() {
        let service = service();
        let created = service
            .create_vehicle(create_request("Audi", "A3", 2021, 5500))
            .await
            .unwrap();

        let mut updates = UpdateVehicleRequest::empty();
        updates.color = Some("red".to_string());
        let updated = service.update_vehicle(&created.id, &updates).await.unwrap();

        assert_eq!(updated.color, "red");
        assert_eq!(updated.make, "Audi");
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let service = service();
        let created = service
            .create_vehicle(create_request("Audi", "A3", 2021, 5500))
            .await
            .unwrap();

        service.delete_vehicle(&created.id).await.unwrap();
        assert!(service.get_vehicle(&created.id).await.is_err());
        assert!(service.delete_vehicle(&created.id).await.is_err());
    }

    #[tokio::test]
    async fn test_statistics_over_seed_data() {
        let service = service();
        let stats = service.statistics().await.unwrap();

        assert_eq!(stats.total_vehicles, 2);
        assert_eq!(stats.available_vehicles, 2);
        assert_eq!(stats.unavailable_vehicles, 0);
        // (45.00 + 89.99) / 2
        assert_eq!(stats.average_price_per_day, Decimal::new(67495, 3));
        assert_eq!(stats.by_fuel_type.get("electric"), Some(&1));
        assert_eq!(stats.by_category.get("economy"), Some(&1));
    }

    #[tokio::test]
    async fn test_statistics_empty_fleet() {
        let service = VehicleService::new(Arc::new(InMemoryVehicleRepository::new()));
        let stats = service.statistics().await.unwrap();
        assert_eq!(stats.total_vehicles, 0);
        assert_eq!(stats.average_price_per_day, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_popular_orders_by_year_descending() {
        let service = service();
        service
            .create_vehicle(create_request("Ford", "Model T", 1927, 1000))
            .await
            .unwrap();

        let popular = service.popular_vehicles(2).await.unwrap();
        assert_eq!(popular.len(), 2);
        assert_eq!(popular[0].year, 2023);
        assert_eq!(popular[1].year, 2022);
    }

    #[tokio::test]
    async fn test_toggle_availability_flips_flag() {
        let service = service();
        let vehicle = &service.repository.find_all().await.unwrap()[0];
        assert!(vehicle.is_available);

        let toggled = service.toggle_availability(&vehicle.id).await.unwrap();
        assert!(!toggled.is_available);

        let toggled_back = service.toggle_availability(&vehicle.id).await.unwrap();
        assert!(toggled_back.is_available);
    }

    #[tokio::test]
    async fn test_bulk_update_skips_failing_ids() {
        let service = service();
        let all = service.repository.find_all().await.unwrap();
        let ids = vec![
            all[0].id.clone(),
            "does-not-exist".to_string(),
            all[1].id.clone(),
        ];

        let mut updates = UpdateVehicleRequest::empty();
        updates.is_available = Some(false);
        let updated = service.bulk_update(&ids, &updates).await.unwrap();

        assert_eq!(updated.len(), 2);
        assert!(updated.iter().all(|v| !v.is_available));
    }

    #[tokio::test]
    async fn test_list_available_filters_on_flag() {
        let service = service();
        let all = service.repository.find_all().await.unwrap();
        service.toggle_availability(&all[0].id).await.unwrap();

        let available = service.list_available().await.unwrap();
        assert_eq!(available.len(), 1);
    }
}
