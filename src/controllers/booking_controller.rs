use std::sync::Arc;

use crate::dto::booking_dto::CreateBookingRequest;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::BookingDetails;
use crate::repositories::BookingRepository;
use crate::services::seat_allocator::{BookingError, SeatAllocator};
use crate::utils::errors::AppError;

pub struct BookingController {
    bookings: Arc<dyn BookingRepository>,
    allocator: SeatAllocator,
}

impl BookingController {
    pub fn new(bookings: Arc<dyn BookingRepository>, allocator: SeatAllocator) -> Self {
        Self {
            bookings,
            allocator,
        }
    }

    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        request: CreateBookingRequest,
    ) -> Result<BookingDetails, AppError> {
        let trip_id = request.trip_id().ok_or(BookingError::MissingTripId)?;

        let allocation = self
            .allocator
            .allocate(trip_id, user.user_id, request.seat_number)
            .await?;

        Ok(allocation.details)
    }

    /// Un admin ve todos los bookings; un usuario normal solo los suyos
    pub async fn list(&self, user: &AuthenticatedUser) -> Result<Vec<BookingDetails>, AppError> {
        let owner = if user.is_admin { None } else { Some(user.user_id) };
        self.bookings.list_details(owner).await
    }

    pub async fn delete(&self, user: &AuthenticatedUser, booking_id: i32) -> Result<(), AppError> {
        self.allocator.remove(booking_id, user).await?;
        Ok(())
    }
}
