use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::{Bus, NewBus};
use crate::repositories::{violated_constraint, BusRepository, BUS_PLATE_CONSTRAINT};
use crate::utils::errors::{AppError, AppResult};

pub struct PgBusRepository {
    pool: PgPool,
}

impl PgBusRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BusRepository for PgBusRepository {
    async fn create(&self, bus: NewBus) -> AppResult<Bus> {
        sqlx::query_as::<_, Bus>(
            r#"
            INSERT INTO buses (number_plate, manufacturer, model, year, capacity)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&bus.number_plate)
        .bind(&bus.manufacturer)
        .bind(&bus.model)
        .bind(&bus.year)
        .bind(bus.capacity)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match violated_constraint(&e).as_deref() {
            Some(BUS_PLATE_CONSTRAINT) => AppError::Conflict(format!(
                "Bus with number plate '{}' already exists",
                bus.number_plate
            )),
            _ => AppError::Database(e),
        })
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Bus>> {
        let bus = sqlx::query_as::<_, Bus>("SELECT * FROM buses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(bus)
    }

    async fn capacity(&self, id: i32) -> AppResult<Option<i32>> {
        let capacity = sqlx::query_scalar::<_, i32>("SELECT capacity FROM buses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(capacity)
    }
}
