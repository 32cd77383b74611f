//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use crate::config::environment::EnvironmentConfig;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::vehicle_service::VehicleService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub vehicle_service: VehicleService,
}

impl AppState {
    pub fn new(config: EnvironmentConfig, repository: Arc<dyn VehicleRepository>) -> Self {
        Self {
            config,
            vehicle_service: VehicleService::new(repository),
        }
    }
}
