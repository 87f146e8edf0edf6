//! Asignación de asientos
//!
//! Decide si un usuario puede reservar un viaje y qué asiento ocupa.
//! Las comprobaciones previas (duplicado, capacidad, asiento ocupado) son
//! optimistas: leen el estado actual sin bloquearlo. La respuesta definitiva
//! la da el insert del repositorio, que evalúa las restricciones únicas
//! (trip, user) y (trip, seat) de forma atómica; una violación se traduce
//! aquí a `DuplicateBooking` o `SeatTaken`.

use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::middleware::auth::AuthenticatedUser;
use crate::models::{BookingDetails, NewBooking};
use crate::repositories::{BookingRepository, BusRepository, InsertBookingError, TripRepository};
use crate::utils::errors::{AppError, INTERNAL_ERROR_MESSAGE};

/// Resultado tipado de las operaciones de reserva
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("trip_id is required")]
    MissingTripId,

    #[error("Trip not found")]
    TripNotFound,

    #[error("Trip has been cancelled")]
    TripCancelled,

    #[error("Trip is already cancelled")]
    TripAlreadyCancelled,

    #[error("You have already booked this trip")]
    DuplicateBooking,

    #[error("No seats available on this trip")]
    SeatOutOfRange,

    #[error("Seat {0} is already taken")]
    SeatTaken(i32),

    #[error("Booking not found")]
    BookingNotFound,

    #[error("You can only delete your own bookings")]
    Forbidden,

    #[error("store failure: {0}")]
    Store(#[from] AppError),
}

impl From<BookingError> for AppError {
    fn from(error: BookingError) -> Self {
        let message = error.to_string();
        match error {
            BookingError::MissingTripId
            | BookingError::TripCancelled
            | BookingError::TripAlreadyCancelled
            | BookingError::SeatOutOfRange => AppError::BadRequest(message),
            BookingError::TripNotFound | BookingError::BookingNotFound => AppError::NotFound(message),
            BookingError::DuplicateBooking | BookingError::SeatTaken(_) => AppError::Conflict(message),
            BookingError::Forbidden => AppError::Forbidden(message),
            BookingError::Store(inner) => inner,
        }
    }
}

/// Resultado de una reserva confirmada
#[derive(Debug, Clone)]
pub struct Allocation {
    pub details: BookingDetails,
    pub auto_assigned: bool,
}

#[derive(Clone)]
pub struct SeatAllocator {
    trips: Arc<dyn TripRepository>,
    buses: Arc<dyn BusRepository>,
    bookings: Arc<dyn BookingRepository>,
}

impl SeatAllocator {
    pub fn new(
        trips: Arc<dyn TripRepository>,
        buses: Arc<dyn BusRepository>,
        bookings: Arc<dyn BookingRepository>,
    ) -> Self {
        Self {
            trips,
            buses,
            bookings,
        }
    }

    /// Reserva un asiento en `trip_id` para `user_id`.
    ///
    /// Sin `requested_seat` (o con `Some(0)`) el asiento es `bookings
    /// existentes + 1`. Ese valor puede coincidir con un asiento ocupado
    /// cuando hubo borrados, por eso el asiento resuelto siempre se vuelve a
    /// comprobar.
    pub async fn allocate(
        &self,
        trip_id: i32,
        user_id: i32,
        requested_seat: Option<i32>,
    ) -> Result<Allocation, BookingError> {
        let trip = self
            .trips
            .find_by_id(trip_id)
            .await?
            .ok_or(BookingError::TripNotFound)?;

        if trip.is_cancelled() {
            return Err(BookingError::TripCancelled);
        }

        if self
            .bookings
            .find_by_trip_and_user(trip_id, user_id)
            .await?
            .is_some()
        {
            return Err(BookingError::DuplicateBooking);
        }

        let capacity = self.buses.capacity(trip.bus_id).await?.ok_or_else(|| {
            AppError::Internal(format!("Bus {} of trip {} not found", trip.bus_id, trip_id))
        })?;

        let (seat_number, auto_assigned) = match requested_seat.filter(|&seat| seat != 0) {
            Some(seat) => (seat, false),
            None => {
                let booked = self.bookings.count_for_trip(trip_id).await?;
                (seat_after(booked), true)
            }
        };

        if seat_number < 1 || seat_number > capacity {
            return Err(BookingError::SeatOutOfRange);
        }

        if self.bookings.seat_taken(trip_id, seat_number).await? {
            return Err(BookingError::SeatTaken(seat_number));
        }

        let booking = self
            .bookings
            .insert(NewBooking {
                trip_id,
                user_id,
                seat_number,
            })
            .await
            .map_err(|e| match e {
                InsertBookingError::DuplicateUser => BookingError::DuplicateBooking,
                InsertBookingError::SeatTaken => BookingError::SeatTaken(seat_number),
                InsertBookingError::TripNotActive => BookingError::TripCancelled,
                InsertBookingError::Store(inner) => BookingError::Store(inner),
            })
            .map_err(|e| {
                warn!("⚠️ Insert de booking rechazado (trip {}, user {}): {}", trip_id, user_id, e);
                e
            })?;

        info!(
            "🎫 Booking {} creado: trip {}, user {}, asiento {}{}",
            booking.id,
            trip_id,
            user_id,
            seat_number,
            if auto_assigned { " (auto)" } else { "" }
        );

        let details = self
            .bookings
            .find_details(booking.id)
            .await?
            .ok_or_else(|| AppError::Internal(INTERNAL_ERROR_MESSAGE.to_string()))?;

        Ok(Allocation {
            details,
            auto_assigned,
        })
    }

    /// Borra un booking. Solo el dueño o un administrador pueden hacerlo.
    pub async fn remove(
        &self,
        booking_id: i32,
        requester: &AuthenticatedUser,
    ) -> Result<(), BookingError> {
        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or(BookingError::BookingNotFound)?;

        if booking.user_id != requester.user_id && !requester.is_admin {
            return Err(BookingError::Forbidden);
        }

        // Un borrado concurrente pudo ganar entre la lectura y el delete
        if !self.bookings.delete(booking_id).await? {
            return Err(BookingError::BookingNotFound);
        }

        info!(
            "🗑️ Booking {} borrado por user {} (admin: {})",
            booking_id, requester.user_id, requester.is_admin
        );
        Ok(())
    }

    /// Cancela un viaje activo. Los bookings existentes no se tocan; solo se
    /// bloquean las reservas nuevas.
    pub async fn cancel_trip(&self, trip_id: i32) -> Result<(), BookingError> {
        let trip = self
            .trips
            .find_by_id(trip_id)
            .await?
            .ok_or(BookingError::TripNotFound)?;

        if trip.is_cancelled() || !self.trips.cancel(trip_id).await? {
            return Err(BookingError::TripAlreadyCancelled);
        }

        info!("🚫 Trip {} cancelado", trip_id);
        Ok(())
    }
}

/// Asiento auto-asignado a partir del número de bookings del viaje
fn seat_after(booked: i64) -> i32 {
    i32::try_from(booked.saturating_add(1)).unwrap_or(i32::MAX)
}
