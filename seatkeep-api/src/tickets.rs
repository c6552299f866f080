use axum::{
    extract::State,
    middleware,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use seatkeep_core::Hold;
use seatkeep_shared::Masked;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::extract::{ApiPath, ApiQuery};
use crate::middleware::{customer_middleware, Customer};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RequestSeatsQuery {
    #[serde(alias = "numSeats")]
    pub num_seats: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReserveResponse {
    pub hold_id: u32,
    pub confirmation_code: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CancelResponse {
    pub hold_id: u32,
    pub cancelled: bool,
}

pub fn routes() -> Router<AppState> {
    let customer_routes = Router::new()
        .route("/tickets/request", get(request_seats))
        .route("/tickets/{id}", get(get_hold))
        .route("/tickets/{id}/reserve", post(reserve_seats))
        .route("/tickets/{id}/cancel", delete(cancel_seats))
        .route_layer(middleware::from_fn(customer_middleware));

    Router::new()
        .route("/tickets/map", get(seat_map))
        .merge(customer_routes)
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /tickets/map
/// Open seat count followed by the seat map
async fn seat_map(State(state): State<AppState>) -> String {
    let available = state.tickets.num_seats_available();
    let map = state.tickets.seat_map();
    format!("Seats Available: {}\n\n{}", available, map)
}

/// GET /tickets/request?num_seats=N
/// Find and hold the best available block
async fn request_seats(
    State(state): State<AppState>,
    Extension(customer): Extension<Customer>,
    ApiQuery(query): ApiQuery<RequestSeatsQuery>,
) -> Result<Json<Hold>, AppError> {
    tracing::debug!(
        "Seat request from {} for {} seats",
        Masked(customer.email.as_str()),
        query.num_seats
    );
    let hold = state.tickets.find_and_hold_seats(query.num_seats, &customer.email)?;
    Ok(Json(hold))
}

/// POST /tickets/{id}/reserve
/// Promote a hold to a reservation
async fn reserve_seats(
    State(state): State<AppState>,
    Extension(customer): Extension<Customer>,
    ApiPath(hold_id): ApiPath<u32>,
) -> Result<Json<ReserveResponse>, AppError> {
    let confirmation_code = state.tickets.reserve_seats(hold_id, &customer.email)?;
    Ok(Json(ReserveResponse {
        hold_id,
        confirmation_code,
    }))
}

/// DELETE /tickets/{id}/cancel
/// A failed cancellation is reported in the body, not as an error status
async fn cancel_seats(
    State(state): State<AppState>,
    Extension(customer): Extension<Customer>,
    ApiPath(hold_id): ApiPath<u32>,
) -> Json<CancelResponse> {
    let cancelled = state.tickets.cancel_seat_hold(hold_id, &customer.email);
    Json(CancelResponse { hold_id, cancelled })
}

/// GET /tickets/{id}
async fn get_hold(
    State(state): State<AppState>,
    Extension(customer): Extension<Customer>,
    ApiPath(hold_id): ApiPath<u32>,
) -> Result<Json<Hold>, AppError> {
    let hold = state.tickets.get_hold(hold_id, &customer.email)?;
    Ok(Json(hold))
}
