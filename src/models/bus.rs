//! Modelo de Bus

use serde::Serialize;
use sqlx::FromRow;

/// Capacidad por defecto de la tabla buses
pub const DEFAULT_BUS_CAPACITY: i32 = 36;

/// Bus - mapea a la tabla buses. La capacidad no cambia mientras haya viajes que lo usen.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Bus {
    pub id: i32,
    pub number_plate: String,
    pub manufacturer: String,
    pub model: String,
    pub year: String,
    pub capacity: i32,
}

#[derive(Debug, Clone)]
pub struct NewBus {
    pub number_plate: String,
    pub manufacturer: String,
    pub model: String,
    pub year: String,
    pub capacity: i32,
}

impl NewBus {
    /// Bus de ejemplo que se inserta en el seed
    pub fn sample() -> Self {
        Self {
            number_plate: "KCA 123A".to_string(),
            manufacturer: "Toyota".to_string(),
            model: "Coaster".to_string(),
            year: "2020".to_string(),
            capacity: DEFAULT_BUS_CAPACITY,
        }
    }
}
