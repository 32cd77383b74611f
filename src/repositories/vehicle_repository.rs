//! Repositorio del recurso Vehicle
//!
//! Abstracción de persistencia (trait) con una implementación en memoria.
//! El handle se comparte via `Arc` entre requests; el `RwLock` serializa
//! las escrituras sobre el mapa.

use crate::models::vehicle::{FuelType, Transmission, Vehicle, VehicleCategory};
use crate::utils::errors::AppError;
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Mutación aplicada a un registro bajo el write lock
pub type VehicleMutation = Box<dyn FnOnce(&mut Vehicle) + Send>;

/// Operaciones de almacenamiento sobre vehículos
#[async_trait]
pub trait VehicleRepository: Send + Sync {
    async fn insert(&self, vehicle: Vehicle) -> Result<Vehicle, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Vehicle>, AppError>;
    async fn find_all(&self) -> Result<Vec<Vehicle>, AppError>;
    /// Aplica `mutate` sobre el registro sin soltar el lock entre la
    /// lectura y la escritura. `None` si el id no existe.
    async fn update_with(
        &self,
        id: &str,
        mutate: VehicleMutation,
    ) -> Result<Option<Vehicle>, AppError>;
    /// `true` si el registro existía y fue eliminado
    async fn delete(&self, id: &str) -> Result<bool, AppError>;
}

/// Implementación en memoria del repositorio
pub struct InMemoryVehicleRepository {
    vehicles: RwLock<HashMap<String, Vehicle>>,
}

impl InMemoryVehicleRepository {
    pub fn new() -> Self {
        Self {
            vehicles: RwLock::new(HashMap::new()),
        }
    }

    /// Repositorio con los dos registros de ejemplo de la flota
    pub fn seeded() -> Self {
        let vehicles = seed_vehicles()
            .into_iter()
            .map(|vehicle| (vehicle.id.clone(), vehicle))
            .collect();
        Self {
            vehicles: RwLock::new(vehicles),
        }
    }

    pub fn shared_seeded() -> Arc<dyn VehicleRepository> {
        Arc::new(Self::seeded())
    }
}

impl Default for InMemoryVehicleRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VehicleRepository for InMemoryVehicleRepository {
    async fn insert(&self, vehicle: Vehicle) -> Result<Vehicle, AppError> {
        let mut vehicles = self.vehicles.write().await;
        vehicles.insert(vehicle.id.clone(), vehicle.clone());
        Ok(vehicle)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Vehicle>, AppError> {
        let vehicles = self.vehicles.read().await;
        Ok(vehicles.get(id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = self.vehicles.read().await;
        let mut all: Vec<Vehicle> = vehicles.values().cloned().collect();
        // Orden estable para que los listados no dependan del orden del mapa
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(all)
    }

    async fn update_with(
        &self,
        id: &str,
        mutate: VehicleMutation,
    ) -> Result<Option<Vehicle>, AppError> {
        let mut vehicles = self.vehicles.write().await;
        match vehicles.get_mut(id) {
            Some(vehicle) => {
                mutate(vehicle);
                Ok(Some(vehicle.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let mut vehicles = self.vehicles.write().await;
        Ok(vehicles.remove(id).is_some())
    }
}

/// Los dos vehículos iniciales de la flota
fn seed_vehicles() -> Vec<Vehicle> {
    let now = Utc::now();
    vec![
        Vehicle {
            id: "7c9e6679-7425-40de-944b-e07fc1f90ae7".to_string(),
            make: "Toyota".to_string(),
            model: "Corolla".to_string(),
            year: 2022,
            color: "silver".to_string(),
            license_plate: "FLT-0001".to_string(),
            vin: "JTDBU4EE9A9123456".to_string(),
            fuel_type: FuelType::Gasoline,
            transmission: Transmission::Automatic,
            category: VehicleCategory::Economy,
            price_per_day: Decimal::new(4500, 2),
            mileage: 24_500,
            capacity: 5,
            is_available: true,
            location_id: Some("loc-downtown".to_string()),
            features: vec!["bluetooth".to_string(), "backup-camera".to_string()],
            image_urls: Vec::new(),
            created_at: now,
            updated_at: now,
        },
        Vehicle {
            id: "9b2f8c44-1d3a-4f6e-8a5b-2c7d9e0f1a3b".to_string(),
            make: "Tesla".to_string(),
            model: "Model 3".to_string(),
            year: 2023,
            color: "white".to_string(),
            license_plate: "FLT-0002".to_string(),
            vin: "5YJ3E1EA0KF123456".to_string(),
            fuel_type: FuelType::Electric,
            transmission: Transmission::Automatic,
            category: VehicleCategory::MidSize,
            price_per_day: Decimal::new(8999, 2),
            mileage: 8_200,
            capacity: 5,
            is_available: true,
            location_id: Some("loc-airport".to_string()),
            features: vec!["autopilot".to_string(), "premium-audio".to_string()],
            image_urls: Vec::new(),
            created_at: now,
            updated_at: now,
        },
    ]
}

/// Generar un identificador opaco para un vehículo nuevo
pub fn new_vehicle_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seeded_repository_has_two_vehicles() {
        let repository = InMemoryVehicleRepository::seeded();
        let all = repository.find_all().await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_insert_then_find() {
        let repository = InMemoryVehicleRepository::seeded();
        let mut vehicle = seed_vehicles().remove(0);
        vehicle.id = new_vehicle_id();
        vehicle.license_plate = "FLT-0003".to_string();

        let inserted = repository.insert(vehicle.clone()).await.unwrap();
        assert_eq!(inserted.id, vehicle.id);

        let found = repository.find_by_id(&vehicle.id).await.unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().license_plate, "FLT-0003");
    }

    #[tokio::test]
    async fn test_update_with_missing_returns_none() {
        let repository = InMemoryVehicleRepository::new();
        let updated = repository
            .update_with("missing", Box::new(|vehicle| vehicle.mileage = 1))
            .await
            .unwrap();
        assert!(updated.is_none());
    }

    #[tokio::test]
    async fn test_update_with_applies_mutation() {
        let repository = InMemoryVehicleRepository::seeded();
        let id = repository.find_all().await.unwrap()[0].id.clone();

        let updated = repository
            .update_with(&id, Box::new(|vehicle| vehicle.mileage += 100))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.mileage, 24_600);

        let fetched = repository.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(fetched.mileage, 24_600);
    }

    #[tokio::test]
    async fn test_delete_is_observable() {
        let repository = InMemoryVehicleRepository::seeded();
        let all = repository.find_all().await.unwrap();
        let id = all[0].id.clone();

        assert!(repository.delete(&id).await.unwrap());
        assert!(!repository.delete(&id).await.unwrap());
        assert!(repository.find_by_id(&id).await.unwrap().is_none());
    }
}
