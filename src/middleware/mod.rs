//! Middleware del sistema
//!
//! Autenticación JWT, control de acceso de administradores y CORS.

pub mod auth;
pub mod cors;

pub use auth::*;
pub use cors::*;
