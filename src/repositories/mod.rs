//! Repositorios de persistencia
//!
//! Cada recurso expone un trait de acceso a datos con dos implementaciones:
//! PostgreSQL (producción) y memoria (desarrollo y tests). Ambas imponen las
//! mismas restricciones de unicidad sobre bookings en el momento del insert.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    Booking, BookingDetails, Bus, NewBooking, NewBus, NewTrip, NewUser, Trip, TripFilters, User,
};
use crate::utils::errors::{AppError, AppResult};

pub mod booking_repository;
pub mod bus_repository;
pub mod memory;
pub mod trip_repository;
pub mod user_repository;

pub use booking_repository::PgBookingRepository;
pub use bus_repository::PgBusRepository;
pub use memory::InMemoryStore;
pub use trip_repository::PgTripRepository;
pub use user_repository::PgUserRepository;

/// Nombres de las restricciones únicas de la tabla bookings
pub const BOOKING_TRIP_USER_CONSTRAINT: &str = "bookings_trip_id_user_id_key";
pub const BOOKING_TRIP_SEAT_CONSTRAINT: &str = "bookings_trip_id_seat_number_key";
pub const USER_EMAIL_CONSTRAINT: &str = "users_email_key";
pub const BUS_PLATE_CONSTRAINT: &str = "buses_number_plate_key";

/// Resultado fallido de un insert de booking
#[derive(Debug, Error)]
pub enum InsertBookingError {
    #[error("user already holds a booking on this trip")]
    DuplicateUser,

    #[error("seat already booked on this trip")]
    SeatTaken,

    #[error("trip missing or not active")]
    TripNotActive,

    #[error(transparent)]
    Store(#[from] AppError),
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Falla con `Conflict` si el email ya existe
    async fn create(&self, user: NewUser) -> AppResult<User>;
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
}

#[async_trait]
pub trait BusRepository: Send + Sync {
    /// Falla con `Conflict` si la matrícula ya existe
    async fn create(&self, bus: NewBus) -> AppResult<Bus>;
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Bus>>;
    async fn capacity(&self, id: i32) -> AppResult<Option<i32>>;
}

#[async_trait]
pub trait TripRepository: Send + Sync {
    async fn create(&self, trip: NewTrip) -> AppResult<Trip>;
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Trip>>;
    async fn list(&self, filters: &TripFilters) -> AppResult<Vec<Trip>>;
    /// Pasa el viaje de active a cancelled. Devuelve `false` si no estaba activo.
    async fn cancel(&self, id: i32) -> AppResult<bool>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Booking>>;
    async fn find_by_trip_and_user(&self, trip_id: i32, user_id: i32) -> AppResult<Option<Booking>>;
    async fn count_for_trip(&self, trip_id: i32) -> AppResult<i64>;
    async fn seat_taken(&self, trip_id: i32, seat_number: i32) -> AppResult<bool>;

    /// Insert atómico: las restricciones (trip, user) y (trip, seat) y el
    /// estado activo del viaje se evalúan junto con la escritura.
    async fn insert(&self, booking: NewBooking) -> Result<Booking, InsertBookingError>;

    /// Devuelve `false` si no existía
    async fn delete(&self, id: i32) -> AppResult<bool>;
    async fn find_details(&self, id: i32) -> AppResult<Option<BookingDetails>>;
    /// `None` lista todos los bookings; `Some(user_id)` solo los de ese usuario
    async fn list_details(&self, user_id: Option<i32>) -> AppResult<Vec<BookingDetails>>;
}

/// Nombre de la restricción violada, si el error es de base de datos
pub(crate) fn violated_constraint(error: &sqlx::Error) -> Option<String> {
    match error {
        sqlx::Error::Database(db_err) => db_err.constraint().map(str::to_owned),
        _ => None,
    }
}
