//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación.

pub mod vehicle_service;
