use std::sync::Arc;
use tracing::info;
use validator::Validate;

use crate::dto::auth_dto::{required, AuthResponse, SigninRequest, SignupRequest};
use crate::models::NewUser;
use crate::repositories::UserRepository;
use crate::utils::errors::AppError;
use crate::utils::jwt::{generate_token, JwtConfig};
use crate::utils::password::{hash_password, verify_password};

pub struct AuthController {
    users: Arc<dyn UserRepository>,
    jwt: JwtConfig,
}

impl AuthController {
    pub fn new(users: Arc<dyn UserRepository>, jwt: JwtConfig) -> Self {
        Self { users, jwt }
    }

    pub async fn signup(&self, request: SignupRequest) -> Result<AuthResponse, AppError> {
        // Validar campos requeridos
        let (Some(email), Some(first_name), Some(last_name), Some(password)) = (
            required(&request.email),
            required(&request.first_name),
            required(&request.last_name),
            required(&request.password),
        ) else {
            return Err(AppError::BadRequest(
                "All fields are required (email, first_name, last_name, password)".to_string(),
            ));
        };

        request.validate()?;

        // Verificar que el email no exista; el índice único cubre la carrera
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AppError::Conflict("User with this email already exists".to_string()));
        }

        let user = self
            .users
            .create(NewUser {
                email: email.to_string(),
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                password: hash_password(password)?,
                is_admin: false,
            })
            .await?;

        info!("👤 Usuario {} registrado ({})", user.id, user.email);

        let token = generate_token(user.id, &user.email, user.is_admin, &self.jwt)?;
        Ok(AuthResponse {
            user_id: user.id,
            is_admin: user.is_admin,
            token,
        })
    }

    pub async fn signin(&self, request: SigninRequest) -> Result<AuthResponse, AppError> {
        let (Some(email), Some(password)) = (required(&request.email), required(&request.password))
        else {
            return Err(AppError::BadRequest("Email and password are required".to_string()));
        };

        let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

        let user = self.users.find_by_email(email).await?.ok_or_else(invalid)?;

        if !verify_password(password, &user.password)? {
            return Err(invalid());
        }

        let token = generate_token(user.id, &user.email, user.is_admin, &self.jwt)?;
        Ok(AuthResponse {
            user_id: user.id,
            is_admin: user.is_admin,
            token,
        })
    }
}
