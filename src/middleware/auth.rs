//! Middleware de autenticación JWT
//!
//! Este módulo maneja la extracción y verificación del token y la
//! inyección del usuario autenticado en las requests.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
    Extension,
};

use crate::{
    state::AppState,
    utils::{
        errors::AppError,
        jwt::{extract_token_from_header, verify_token},
    },
};

/// Usuario autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub email: String,
    pub is_admin: bool,
}

/// Middleware de autenticación JWT
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Extraer token del header Authorization
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(extract_token_from_header)
        .ok_or_else(|| AppError::Unauthorized("No token provided. Please sign in.".to_string()))?;

    let claims = verify_token(token, &state.jwt_config()).map_err(|e| {
        tracing::debug!("🔒 Token rechazado: {}", e);
        AppError::Unauthorized("Invalid or expired token. Please sign in again.".to_string())
    })?;

    let authenticated_user = AuthenticatedUser {
        user_id: claims.sub,
        email: claims.email,
        is_admin: claims.is_admin,
    };

    // Inyectar usuario autenticado en las extensions
    request.extensions_mut().insert(authenticated_user);

    Ok(next.run(request).await)
}

/// Middleware para verificar permisos de admin; va después de `auth_middleware`
pub async fn admin_only_middleware(
    Extension(user): Extension<AuthenticatedUser>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !user.is_admin {
        return Err(AppError::Forbidden("Access denied. Admin only.".to_string()));
    }

    Ok(next.run(request).await)
}
