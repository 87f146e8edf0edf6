//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use sqlx::PgPool;
use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::{
    BookingRepository, BusRepository, InMemoryStore, PgBookingRepository, PgBusRepository,
    PgTripRepository, PgUserRepository, TripRepository, UserRepository,
};
use crate::services::seat_allocator::SeatAllocator;
use crate::utils::jwt::JwtConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub users: Arc<dyn UserRepository>,
    pub buses: Arc<dyn BusRepository>,
    pub trips: Arc<dyn TripRepository>,
    pub bookings: Arc<dyn BookingRepository>,
}

impl AppState {
    /// Estado respaldado por PostgreSQL
    pub fn postgres(pool: PgPool, config: EnvironmentConfig) -> Self {
        Self {
            config,
            users: Arc::new(PgUserRepository::new(pool.clone())),
            buses: Arc::new(PgBusRepository::new(pool.clone())),
            trips: Arc::new(PgTripRepository::new(pool.clone())),
            bookings: Arc::new(PgBookingRepository::new(pool)),
        }
    }

    /// Estado respaldado por el store en memoria
    pub fn in_memory(store: InMemoryStore, config: EnvironmentConfig) -> Self {
        let store = Arc::new(store);
        Self {
            config,
            users: store.clone(),
            buses: store.clone(),
            trips: store.clone(),
            bookings: store,
        }
    }

    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig::from(&self.config)
    }

    pub fn seat_allocator(&self) -> SeatAllocator {
        SeatAllocator::new(self.trips.clone(), self.buses.clone(), self.bookings.clone())
    }
}
