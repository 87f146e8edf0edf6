use serde::{Deserialize, Serialize};
use validator::Validate;

// Request de registro; los campos son opcionales para poder
// responder con el mensaje de "campos requeridos"
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email, length(max = 100))]
    pub email: Option<String>,

    #[validate(length(max = 50))]
    pub first_name: Option<String>,

    #[validate(length(max = 50))]
    pub last_name: Option<String>,

    #[validate(length(max = 200))]
    pub password: Option<String>,
}

// Request de login
#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

// Respuesta de signup/signin
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user_id: i32,
    pub is_admin: bool,
    pub token: String,
}

/// Devuelve el valor recortado si no está vacío
pub fn required(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
