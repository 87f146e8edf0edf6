//! Modelo de User
//!
//! Usuarios registrados, tanto viajeros como administradores.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// User - mapea a la tabla users
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// Datos para insertar un usuario; `password` ya viene hasheado
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub is_admin: bool,
}
