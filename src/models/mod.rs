//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos de la flota.

pub mod vehicle;
