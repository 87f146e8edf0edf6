use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    middleware,
    routing::{get, patch, post},
    Json, Router,
};

use crate::controllers::trip_controller::TripController;
use crate::dto::trip_dto::{CreateTripRequest, TripResponse};
use crate::dto::{ApiResponse, MessageResponse};
use crate::middleware::auth::{admin_only_middleware, auth_middleware};
use crate::models::TripFilters;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// GET para cualquier usuario autenticado; POST y PATCH solo admin
pub fn create_trip_router(state: AppState) -> Router<AppState> {
    let admin_only = || middleware::from_fn(admin_only_middleware);

    Router::new()
        .route(
            "/",
            get(list_trips).merge(post(create_trip).route_layer(admin_only())),
        )
        .route("/:id", patch(cancel_trip).route_layer(admin_only()))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

fn controller(state: &AppState) -> TripController {
    TripController::new(state.trips.clone(), state.buses.clone(), state.seat_allocator())
}

async fn create_trip(
    State(state): State<AppState>,
    payload: Result<Json<CreateTripRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<TripResponse>>), AppError> {
    let Json(request) = payload?;
    let response = controller(&state).create(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))))
}

async fn list_trips(
    State(state): State<AppState>,
    Query(filters): Query<TripFilters>,
) -> Result<Json<ApiResponse<Vec<TripResponse>>>, AppError> {
    let response = controller(&state).list(filters).await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn cancel_trip(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    controller(&state).cancel(id).await?;
    Ok(Json(ApiResponse::success(MessageResponse::new(
        "Trip cancelled successfully",
    ))))
}
