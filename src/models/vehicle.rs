//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle, sus enums tipados y el modelo
//! de estadísticas agregadas de la flota.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Tipo de combustible - valores serializados en minúsculas
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    Gasoline,
    Diesel,
    Electric,
    Hybrid,
}

impl FuelType {
    pub const ALLOWED: &'static [&'static str] = &["gasoline", "diesel", "electric", "hybrid"];

    pub fn as_str(&self) -> &'static str {
        match self {
            FuelType::Gasoline => "gasoline",
            FuelType::Diesel => "diesel",
            FuelType::Electric => "electric",
            FuelType::Hybrid => "hybrid",
        }
    }
}

impl FromStr for FuelType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "gasoline" => Ok(FuelType::Gasoline),
            "diesel" => Ok(FuelType::Diesel),
            "electric" => Ok(FuelType::Electric),
            "hybrid" => Ok(FuelType::Hybrid),
            other => Err(format!("invalid fuel type '{}'", other)),
        }
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tipo de transmisión
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Transmission {
    Manual,
    Automatic,
}

impl Transmission {
    pub const ALLOWED: &'static [&'static str] = &["manual", "automatic"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Transmission::Manual => "manual",
            Transmission::Automatic => "automatic",
        }
    }
}

impl FromStr for Transmission {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "manual" => Ok(Transmission::Manual),
            "automatic" => Ok(Transmission::Automatic),
            other => Err(format!("invalid transmission '{}'", other)),
        }
    }
}

impl fmt::Display for Transmission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Categoría del vehículo para tarificación
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum VehicleCategory {
    Economy,
    Compact,
    #[serde(rename = "mid-size")]
    MidSize,
    Luxury,
    Suv,
    Truck,
}

impl VehicleCategory {
    pub const ALLOWED: &'static [&'static str] =
        &["economy", "compact", "mid-size", "luxury", "suv", "truck"];

    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleCategory::Economy => "economy",
            VehicleCategory::Compact => "compact",
            VehicleCategory::MidSize => "mid-size",
            VehicleCategory::Luxury => "luxury",
            VehicleCategory::Suv => "suv",
            VehicleCategory::Truck => "truck",
        }
    }
}

impl FromStr for VehicleCategory {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "economy" => Ok(VehicleCategory::Economy),
            "compact" => Ok(VehicleCategory::Compact),
            "mid-size" => Ok(VehicleCategory::MidSize),
            "luxury" => Ok(VehicleCategory::Luxury),
            "suv" => Ok(VehicleCategory::Suv),
            "truck" => Ok(VehicleCategory::Truck),
            other => Err(format!("invalid category '{}'", other)),
        }
    }
}

impl fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vehicle principal de la flota
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub color: String,
    pub license_plate: String,
    pub vin: String,
    pub fuel_type: FuelType,
    pub transmission: Transmission,
    pub category: VehicleCategory,
    pub price_per_day: Decimal,
    pub mileage: i64,
    pub capacity: i32,
    pub is_available: bool,
    pub location_id: Option<String>,
    pub features: Vec<String>,
    pub image_urls: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Estadísticas agregadas de la flota
#[derive(Debug, Clone, Serialize)]
pub struct VehicleStatistics {
    pub total_vehicles: usize,
    pub available_vehicles: usize,
    pub unavailable_vehicles: usize,
    pub average_price_per_day: Decimal,
    pub average_year: f64,
    pub by_category: BTreeMap<String, usize>,
    pub by_fuel_type: BTreeMap<String, usize>,
}
