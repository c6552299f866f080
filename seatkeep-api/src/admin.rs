use axum::{extract::State, routing::get, Json, Router};
use seatkeep_core::{Hold, Reservation};
use std::collections::HashMap;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/holds", get(show_holds))
        .route("/admin/reservations", get(show_reservations))
}

/// GET /admin/holds
/// Snapshot of live holds keyed by id
async fn show_holds(State(state): State<AppState>) -> Json<HashMap<u32, Hold>> {
    Json(state.tickets.get_holds())
}

/// GET /admin/reservations
/// Snapshot of reservations keyed by confirmation code
async fn show_reservations(State(state): State<AppState>) -> Json<HashMap<String, Reservation>> {
    Json(state.tickets.get_reservations())
}
