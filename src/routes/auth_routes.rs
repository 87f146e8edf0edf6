use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};

use crate::controllers::auth_controller::AuthController;
use crate::dto::auth_dto::{AuthResponse, SigninRequest, SignupRequest};
use crate::dto::ApiResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
}

async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), AppError> {
    let Json(request) = payload?;
    let controller = AuthController::new(state.users.clone(), state.jwt_config());
    let response = controller.signup(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))))
}

async fn signin(
    State(state): State<AppState>,
    payload: Result<Json<SigninRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<AuthResponse>>, AppError> {
    let Json(request) = payload?;
    let controller = AuthController::new(state.users.clone(), state.jwt_config());
    let response = controller.signin(request).await?;
    Ok(Json(ApiResponse::success(response)))
}
