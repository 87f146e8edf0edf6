use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::{NewTrip, Trip, TripFilters, TripStatus};
use crate::repositories::TripRepository;
use crate::utils::errors::AppResult;

pub struct PgTripRepository {
    pool: PgPool,
}

impl PgTripRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TripRepository for PgTripRepository {
    async fn create(&self, trip: NewTrip) -> AppResult<Trip> {
        let trip = sqlx::query_as::<_, Trip>(
            r#"
            INSERT INTO trips (bus_id, origin, destination, trip_date, fare, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(trip.bus_id)
        .bind(&trip.origin)
        .bind(&trip.destination)
        .bind(trip.trip_date)
        .bind(trip.fare)
        .bind(TripStatus::Active.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(trip)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Trip>> {
        let trip = sqlx::query_as::<_, Trip>("SELECT * FROM trips WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(trip)
    }

    async fn list(&self, filters: &TripFilters) -> AppResult<Vec<Trip>> {
        let trips = sqlx::query_as::<_, Trip>(
            r#"
            SELECT * FROM trips
            WHERE ($1::text IS NULL OR origin ILIKE $1)
              AND ($2::text IS NULL OR destination ILIKE $2)
            ORDER BY id
            "#,
        )
        .bind(filters.origin.as_deref())
        .bind(filters.destination.as_deref())
        .fetch_all(&self.pool)
        .await?;

        Ok(trips)
    }

    async fn cancel(&self, id: i32) -> AppResult<bool> {
        // Update condicional: de dos cancelaciones concurrentes solo una afecta la fila
        let result = sqlx::query("UPDATE trips SET status = $1 WHERE id = $2 AND status = $3")
            .bind(TripStatus::Cancelled.as_str())
            .bind(id)
            .bind(TripStatus::Active.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }
}
