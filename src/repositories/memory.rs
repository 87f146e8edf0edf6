//! Store en memoria
//!
//! Implementa todos los repositorios sobre unas tablas protegidas por un
//! único mutex. Cada operación toma el lock una sola vez, así que el insert
//! de bookings evalúa las restricciones de unicidad y el estado del viaje de
//! forma atómica, igual que las restricciones de PostgreSQL.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::models::{
    Booking, BookingDetails, Bus, NewBooking, NewBus, NewTrip, NewUser, Trip, TripFilters,
    TripStatus, User,
};
use crate::repositories::{
    BookingRepository, BusRepository, InsertBookingError, TripRepository, UserRepository,
};
use crate::utils::errors::{AppError, AppResult};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    buses: Vec<Bus>,
    trips: Vec<Trip>,
    bookings: Vec<Booking>,
    next_user_id: i32,
    next_bus_id: i32,
    next_trip_id: i32,
    next_booking_id: i32,
}

/// Secuencia estilo SERIAL: empieza en 1 y nunca reutiliza ids
fn next_id(counter: &mut i32) -> i32 {
    *counter += 1;
    *counter
}

impl Tables {
    fn details(&self, booking: &Booking) -> Option<BookingDetails> {
        let trip = self.trips.iter().find(|t| t.id == booking.trip_id)?;
        let user = self.users.iter().find(|u| u.id == booking.user_id)?;

        Some(BookingDetails {
            booking_id: booking.id,
            user_id: booking.user_id,
            trip_id: booking.trip_id,
            bus_id: trip.bus_id,
            origin: trip.origin.clone(),
            destination: trip.destination.clone(),
            trip_date: trip.trip_date,
            fare: trip.fare,
            seat_number: booking.seat_number,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            created_on: booking.created_on,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: NewUser) -> AppResult<User> {
        let mut tables = self.tables.lock().await;

        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("User with this email already exists".to_string()));
        }

        let user = User {
            id: next_id(&mut tables.next_user_id),
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            password: user.password,
            is_admin: user.is_admin,
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());

        Ok(user)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl BusRepository for InMemoryStore {
    async fn create(&self, bus: NewBus) -> AppResult<Bus> {
        let mut tables = self.tables.lock().await;

        if tables.buses.iter().any(|b| b.number_plate == bus.number_plate) {
            return Err(AppError::Conflict(format!(
                "Bus with number plate '{}' already exists",
                bus.number_plate
            )));
        }
        // CHECK (capacity > 0)
        if bus.capacity < 1 {
            return Err(AppError::BadRequest("Bus capacity must be positive".to_string()));
        }

        let bus = Bus {
            id: next_id(&mut tables.next_bus_id),
            number_plate: bus.number_plate,
            manufacturer: bus.manufacturer,
            model: bus.model,
            year: bus.year,
            capacity: bus.capacity,
        };
        tables.buses.push(bus.clone());

        Ok(bus)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Bus>> {
        let tables = self.tables.lock().await;
        Ok(tables.buses.iter().find(|b| b.id == id).cloned())
    }

    async fn capacity(&self, id: i32) -> AppResult<Option<i32>> {
        let tables = self.tables.lock().await;
        Ok(tables.buses.iter().find(|b| b.id == id).map(|b| b.capacity))
    }
}

#[async_trait]
impl TripRepository for InMemoryStore {
    async fn create(&self, trip: NewTrip) -> AppResult<Trip> {
        let mut tables = self.tables.lock().await;

        // FOREIGN KEY (bus_id)
        if !tables.buses.iter().any(|b| b.id == trip.bus_id) {
            return Err(AppError::NotFound("Bus not found".to_string()));
        }

        let trip = Trip {
            id: next_id(&mut tables.next_trip_id),
            bus_id: trip.bus_id,
            origin: trip.origin,
            destination: trip.destination,
            trip_date: trip.trip_date,
            fare: trip.fare,
            status: TripStatus::Active.as_str().to_string(),
        };
        tables.trips.push(trip.clone());

        Ok(trip)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Trip>> {
        let tables = self.tables.lock().await;
        Ok(tables.trips.iter().find(|t| t.id == id).cloned())
    }

    async fn list(&self, filters: &TripFilters) -> AppResult<Vec<Trip>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .trips
            .iter()
            .filter(|t| filters.matches(t))
            .cloned()
            .collect())
    }

    async fn cancel(&self, id: i32) -> AppResult<bool> {
        let mut tables = self.tables.lock().await;

        match tables.trips.iter_mut().find(|t| t.id == id) {
            Some(trip) if !trip.is_cancelled() => {
                trip.status = TripStatus::Cancelled.as_str().to_string();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl BookingRepository for InMemoryStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Booking>> {
        let tables = self.tables.lock().await;
        Ok(tables.bookings.iter().find(|b| b.id == id).cloned())
    }

    async fn find_by_trip_and_user(&self, trip_id: i32, user_id: i32) -> AppResult<Option<Booking>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .bookings
            .iter()
            .find(|b| b.trip_id == trip_id && b.user_id == user_id)
            .cloned())
    }

    async fn count_for_trip(&self, trip_id: i32) -> AppResult<i64> {
        let tables = self.tables.lock().await;
        Ok(tables.bookings.iter().filter(|b| b.trip_id == trip_id).count() as i64)
    }

    async fn seat_taken(&self, trip_id: i32, seat_number: i32) -> AppResult<bool> {
        let tables = self.tables.lock().await;
        Ok(tables
            .bookings
            .iter()
            .any(|b| b.trip_id == trip_id && b.seat_number == seat_number))
    }

    async fn insert(&self, booking: NewBooking) -> Result<Booking, InsertBookingError> {
        let mut tables = self.tables.lock().await;

        let trip_active = tables
            .trips
            .iter()
            .any(|t| t.id == booking.trip_id && !t.is_cancelled());
        if !trip_active {
            return Err(InsertBookingError::TripNotActive);
        }

        // Mismo orden de evaluación que las restricciones UNIQUE de la tabla
        let on_trip = || tables.bookings.iter().filter(|b| b.trip_id == booking.trip_id);
        if on_trip().any(|b| b.user_id == booking.user_id) {
            return Err(InsertBookingError::DuplicateUser);
        }
        if on_trip().any(|b| b.seat_number == booking.seat_number) {
            return Err(InsertBookingError::SeatTaken);
        }

        let booking = Booking {
            id: next_id(&mut tables.next_booking_id),
            trip_id: booking.trip_id,
            user_id: booking.user_id,
            seat_number: booking.seat_number,
            created_on: Utc::now(),
        };
        tables.bookings.push(booking.clone());

        Ok(booking)
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let mut tables = self.tables.lock().await;
        let before = tables.bookings.len();
        tables.bookings.retain(|b| b.id != id);
        Ok(tables.bookings.len() < before)
    }

    async fn find_details(&self, id: i32) -> AppResult<Option<BookingDetails>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .bookings
            .iter()
            .find(|b| b.id == id)
            .and_then(|b| tables.details(b)))
    }

    async fn list_details(&self, user_id: Option<i32>) -> AppResult<Vec<BookingDetails>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .bookings
            .iter()
            .filter(|b| user_id.map_or(true, |id| b.user_id == id))
            .filter_map(|b| tables.details(b))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    async fn store_with_trip() -> (InMemoryStore, Trip) {
        let store = InMemoryStore::new();
        let bus = BusRepository::create(&store, NewBus::sample()).await.unwrap();
        let trip = TripRepository::create(
            &store,
            NewTrip {
                bus_id: bus.id,
                origin: "Nairobi".to_string(),
                destination: "Mombasa".to_string(),
                trip_date: NaiveDate::from_ymd_opt(2026, 12, 24).unwrap(),
                fare: 1500.0,
            },
        )
        .await
        .unwrap();
        (store, trip)
    }

    fn new_booking(trip_id: i32, user_id: i32, seat_number: i32) -> NewBooking {
        NewBooking {
            trip_id,
            user_id,
            seat_number,
        }
    }

    #[tokio::test]
    async fn test_insert_enforces_trip_user_uniqueness() {
        let (store, trip) = store_with_trip().await;

        store.insert(new_booking(trip.id, 1, 1)).await.unwrap();
        let err = store.insert(new_booking(trip.id, 1, 2)).await.unwrap_err();

        assert!(matches!(err, InsertBookingError::DuplicateUser));
    }

    #[tokio::test]
    async fn test_insert_enforces_trip_seat_uniqueness() {
        let (store, trip) = store_with_trip().await;

        store.insert(new_booking(trip.id, 1, 4)).await.unwrap();
        let err = store.insert(new_booking(trip.id, 2, 4)).await.unwrap_err();

        assert!(matches!(err, InsertBookingError::SeatTaken));
        assert_eq!(store.count_for_trip(trip.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_insert_rejects_cancelled_trip() {
        let (store, trip) = store_with_trip().await;

        assert!(store.cancel(trip.id).await.unwrap());
        assert!(!store.cancel(trip.id).await.unwrap());

        let err = store.insert(new_booking(trip.id, 1, 1)).await.unwrap_err();
        assert!(matches!(err, InsertBookingError::TripNotActive));
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let (store, trip) = store_with_trip().await;

        let first = store.insert(new_booking(trip.id, 1, 1)).await.unwrap();
        assert!(store.delete(first.id).await.unwrap());
        assert!(!store.delete(first.id).await.unwrap());

        let second = store.insert(new_booking(trip.id, 1, 1)).await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = InMemoryStore::new();
        let user = NewUser {
            email: "ada@example.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            password: "hash".to_string(),
            is_admin: false,
        };

        UserRepository::create(&store, user.clone()).await.unwrap();
        let err = UserRepository::create(&store, user).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
