use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    middleware,
    routing::{delete, get},
    Extension, Json, Router,
};

use crate::controllers::booking_controller::BookingController;
use crate::dto::booking_dto::CreateBookingRequest;
use crate::dto::{ApiResponse, MessageResponse};
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::models::BookingDetails;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_booking_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_bookings).post(create_booking))
        .route("/:id", delete(delete_booking))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

fn controller(state: &AppState) -> BookingController {
    BookingController::new(state.bookings.clone(), state.seat_allocator())
}

async fn create_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    payload: Result<Json<CreateBookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<BookingDetails>>), AppError> {
    let Json(request) = payload?;
    let response = controller(&state).create(&user, request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))))
}

async fn list_bookings(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<BookingDetails>>>, AppError> {
    let response = controller(&state).list(&user).await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn delete_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    controller(&state).delete(&user, id).await?;
    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Booking deleted successfully",
    ))))
}
