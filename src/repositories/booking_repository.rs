use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::{Booking, BookingDetails, NewBooking};
use crate::repositories::{
    violated_constraint, BookingRepository, InsertBookingError, BOOKING_TRIP_SEAT_CONSTRAINT,
    BOOKING_TRIP_USER_CONSTRAINT,
};
use crate::utils::errors::{AppError, AppResult};

const DETAILS_SELECT: &str = r#"
    SELECT b.id AS booking_id, b.user_id, b.trip_id, t.bus_id,
           t.origin, t.destination, t.trip_date, t.fare,
           b.seat_number, u.first_name, u.last_name, u.email, b.created_on
    FROM bookings b
    JOIN trips t ON b.trip_id = t.id
    JOIN users u ON b.user_id = u.id
"#;

pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(booking)
    }

    async fn find_by_trip_and_user(&self, trip_id: i32, user_id: i32) -> AppResult<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE trip_id = $1 AND user_id = $2",
        )
        .bind(trip_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    async fn count_for_trip(&self, trip_id: i32) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM bookings WHERE trip_id = $1")
            .bind(trip_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn seat_taken(&self, trip_id: i32, seat_number: i32) -> AppResult<bool> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM bookings WHERE trip_id = $1 AND seat_number = $2)",
        )
        .bind(trip_id)
        .bind(seat_number)
        .fetch_one(&self.pool)
        .await?;

        Ok(taken)
    }

    async fn insert(&self, booking: NewBooking) -> Result<Booking, InsertBookingError> {
        // El insert es el punto de serialización: las restricciones UNIQUE
        // deciden entre requests concurrentes y el FOR SHARE bloquea una
        // cancelación del viaje hasta que esta transacción termine.
        let inserted = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (trip_id, user_id, seat_number)
            SELECT $1, $2, $3
            WHERE EXISTS (
                SELECT 1 FROM trips WHERE id = $1 AND status = 'active' FOR SHARE
            )
            RETURNING *
            "#,
        )
        .bind(booking.trip_id)
        .bind(booking.user_id)
        .bind(booking.seat_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match violated_constraint(&e).as_deref() {
            Some(BOOKING_TRIP_USER_CONSTRAINT) => InsertBookingError::DuplicateUser,
            Some(BOOKING_TRIP_SEAT_CONSTRAINT) => InsertBookingError::SeatTaken,
            _ => InsertBookingError::Store(AppError::Database(e)),
        })?;

        inserted.ok_or(InsertBookingError::TripNotActive)
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_details(&self, id: i32) -> AppResult<Option<BookingDetails>> {
        let query = format!("{} WHERE b.id = $1", DETAILS_SELECT);
        let details = sqlx::query_as::<_, BookingDetails>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(details)
    }

    async fn list_details(&self, user_id: Option<i32>) -> AppResult<Vec<BookingDetails>> {
        let query = format!(
            "{} WHERE ($1::int4 IS NULL OR b.user_id = $1) ORDER BY b.id",
            DETAILS_SELECT
        );
        let details = sqlx::query_as::<_, BookingDetails>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(details)
    }
}
