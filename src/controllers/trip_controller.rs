use chrono::NaiveDate;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

use crate::dto::auth_dto::required;
use crate::dto::trip_dto::{CreateTripRequest, TripResponse};
use crate::models::{NewTrip, TripFilters};
use crate::repositories::{BusRepository, TripRepository};
use crate::services::seat_allocator::SeatAllocator;
use crate::utils::errors::AppError;

const TRIP_FIELDS_REQUIRED: &str =
    "All fields are required (bus_id, origin, destination, trip_date, fare)";

pub struct TripController {
    trips: Arc<dyn TripRepository>,
    buses: Arc<dyn BusRepository>,
    allocator: SeatAllocator,
}

impl TripController {
    pub fn new(
        trips: Arc<dyn TripRepository>,
        buses: Arc<dyn BusRepository>,
        allocator: SeatAllocator,
    ) -> Self {
        Self {
            trips,
            buses,
            allocator,
        }
    }

    pub async fn create(&self, request: CreateTripRequest) -> Result<TripResponse, AppError> {
        let (Some(bus_id), Some(origin), Some(destination), Some(trip_date), Some(fare)) = (
            request.bus_id,
            required(&request.origin),
            required(&request.destination),
            required(&request.trip_date),
            request.fare,
        ) else {
            return Err(AppError::BadRequest(TRIP_FIELDS_REQUIRED.to_string()));
        };

        request.validate()?;

        let trip_date = NaiveDate::parse_from_str(trip_date, "%Y-%m-%d").map_err(|_| {
            AppError::BadRequest("trip_date must be a valid date (YYYY-MM-DD)".to_string())
        })?;

        // Verificar que el bus existe
        if self.buses.find_by_id(bus_id).await?.is_none() {
            return Err(AppError::NotFound("Bus not found".to_string()));
        }

        let trip = self
            .trips
            .create(NewTrip {
                bus_id,
                origin: origin.to_string(),
                destination: destination.to_string(),
                trip_date,
                fare,
            })
            .await?;

        info!(
            "🚌 Trip {} creado: {} → {} ({})",
            trip.id, trip.origin, trip.destination, trip.trip_date
        );

        Ok(trip.into())
    }

    pub async fn list(&self, filters: TripFilters) -> Result<Vec<TripResponse>, AppError> {
        let trips = self.trips.list(&filters).await?;
        Ok(trips.into_iter().map(TripResponse::from).collect())
    }

    pub async fn cancel(&self, trip_id: i32) -> Result<(), AppError> {
        self.allocator.cancel_trip(trip_id).await?;
        Ok(())
    }
}
