//! Modelo de Trip
//!
//! Un viaje programado sobre un bus. El estado solo avanza de `active`
//! a `cancelled`; los viajes nunca se borran.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// Estado del viaje - se guarda como texto en trips.status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    Active,
    Cancelled,
}

impl TripStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Active => "active",
            TripStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trip - mapea a la tabla trips
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Trip {
    pub id: i32,
    pub bus_id: i32,
    pub origin: String,
    pub destination: String,
    pub trip_date: NaiveDate,
    pub fare: f64,
    pub status: String,
}

impl Trip {
    /// Cualquier valor distinto de "cancelled" cuenta como activo
    pub fn status(&self) -> TripStatus {
        if self.status == TripStatus::Cancelled.as_str() {
            TripStatus::Cancelled
        } else {
            TripStatus::Active
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.status() == TripStatus::Cancelled
    }
}

#[derive(Debug, Clone)]
pub struct NewTrip {
    pub bus_id: i32,
    pub origin: String,
    pub destination: String,
    pub trip_date: NaiveDate,
    pub fare: f64,
}

/// Filtros para el listado de viajes (comparación sin mayúsculas)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TripFilters {
    pub origin: Option<String>,
    pub destination: Option<String>,
}

impl TripFilters {
    pub fn matches(&self, trip: &Trip) -> bool {
        let eq = |filter: &Option<String>, value: &str| {
            filter
                .as_deref()
                .map_or(true, |f| f.to_lowercase() == value.to_lowercase())
        };
        eq(&self.origin, &trip.origin) && eq(&self.destination, &trip.destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trip(status: &str) -> Trip {
        Trip {
            id: 1,
            bus_id: 1,
            origin: "Nairobi".to_string(),
            destination: "Mombasa".to_string(),
            trip_date: NaiveDate::from_ymd_opt(2026, 12, 1).unwrap(),
            fare: 1500.0,
            status: status.to_string(),
        }
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!(trip("active").status(), TripStatus::Active);
        assert!(trip("cancelled").is_cancelled());
    }

    #[test]
    fn test_filters_are_case_insensitive() {
        let filters = TripFilters {
            origin: Some("nairobi".to_string()),
            destination: None,
        };
        assert!(filters.matches(&trip("active")));

        let filters = TripFilters {
            origin: None,
            destination: Some("Kisumu".to_string()),
        };
        assert!(!filters.matches(&trip("active")));
    }
}
