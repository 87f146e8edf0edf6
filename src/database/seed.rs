//! Datos iniciales: usuario administrador y un bus de ejemplo.
//! Idempotente: si ya existen, no se insertan de nuevo.

use tracing::info;

use crate::models::{NewBus, NewUser};
use crate::state::AppState;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::password::hash_password;

pub async fn seed(state: &AppState) -> AppResult<()> {
    let admin = NewUser {
        email: state.config.admin_email.clone(),
        first_name: "Admin".to_string(),
        last_name: "User".to_string(),
        password: hash_password(&state.config.admin_password)?,
        is_admin: true,
    };

    match state.users.create(admin).await {
        Ok(user) => info!("👑 Admin creado: {}", user.email),
        Err(AppError::Conflict(_)) => info!("👑 Admin ya existente: {}", state.config.admin_email),
        Err(e) => return Err(e),
    }

    match state.buses.create(NewBus::sample()).await {
        Ok(bus) => info!("🚌 Bus de ejemplo creado: {} (id {})", bus.number_plate, bus.id),
        Err(AppError::Conflict(_)) => info!("🚌 Bus de ejemplo ya existente"),
        Err(e) => return Err(e),
    }

    Ok(())
}
