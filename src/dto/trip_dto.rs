use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::Trip;

// Request para crear un viaje
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTripRequest {
    #[validate(range(min = 1))]
    pub bus_id: Option<i32>,

    #[validate(length(max = 100))]
    pub origin: Option<String>,

    #[validate(length(max = 100))]
    pub destination: Option<String>,

    // YYYY-MM-DD
    pub trip_date: Option<String>,

    #[validate(range(min = 0.0))]
    pub fare: Option<f64>,
}

// Response de viaje
#[derive(Debug, Serialize)]
pub struct TripResponse {
    pub trip_id: i32,
    pub bus_id: i32,
    pub origin: String,
    pub destination: String,
    pub trip_date: NaiveDate,
    pub fare: f64,
    pub status: String,
}

impl From<Trip> for TripResponse {
    fn from(trip: Trip) -> Self {
        Self {
            trip_id: trip.id,
            bus_id: trip.bus_id,
            origin: trip.origin,
            destination: trip.destination,
            trip_date: trip.trip_date,
            fare: trip.fare,
            status: trip.status,
        }
    }
}
