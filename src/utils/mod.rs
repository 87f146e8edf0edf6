//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, JWT
//! y hashing de contraseñas.

pub mod errors;
pub mod jwt;
pub mod password;
