//! DTOs de la API
//!
//! Cuerpos de request/response de cada recurso y el sobre `{status, data}`.

pub mod api_response;
pub mod auth_dto;
pub mod booking_dto;
pub mod trip_dto;

pub use api_response::{ApiResponse, MessageResponse};
