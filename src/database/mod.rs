//! Módulo de base de datos
//!
//! Maneja la conexión con PostgreSQL, el schema y los datos iniciales

pub mod connection;
pub mod schema;
pub mod seed;

pub use connection::create_pool;
