//! Modelo de Booking
//!
//! Una reserva ocupa un asiento de un viaje para un usuario. Invariantes
//! que garantiza el store al insertar:
//! - un único booking por (trip_id, user_id)
//! - un único booking por (trip_id, seat_number)

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Booking - mapea a la tabla bookings
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Booking {
    pub id: i32,
    pub trip_id: i32,
    pub user_id: i32,
    pub seat_number: i32,
    pub created_on: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewBooking {
    pub trip_id: i32,
    pub user_id: i32,
    pub seat_number: i32,
}

/// Booking con los datos del viaje y del pasajero (join de lectura)
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BookingDetails {
    pub booking_id: i32,
    pub user_id: i32,
    pub trip_id: i32,
    pub bus_id: i32,
    pub origin: String,
    pub destination: String,
    pub trip_date: NaiveDate,
    pub fare: f64,
    pub seat_number: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_on: DateTime<Utc>,
}
