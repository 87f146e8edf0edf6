//! WayFarer - API de reservas de viajes en bus
//!
//! Registro/login con JWT, gestión de viajes por administradores y reserva
//! de asientos con garantías de unicidad bajo concurrencia.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::create_app;
pub use state::AppState;
