//! Hash y verificación de contraseñas con bcrypt

use bcrypt::{hash, verify};

use crate::utils::errors::AppError;

/// Coste de bcrypt; el mismo que el valor por defecto de la librería original
pub const HASH_COST: u32 = 10;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, HASH_COST).map_err(|e| AppError::Hash(format!("Error hashing password: {}", e)))
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    verify(password, password_hash)
        .map_err(|e| AppError::Hash(format!("Error verifying password: {}", e)))
}
