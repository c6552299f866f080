pub mod models;

pub use models::{Hold, Reservation, SeatRange, SeatState};

/// Failures surfaced by the ticketing engine. None of these leave a partial
/// mutation behind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TicketError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("No consecutive seats available for [{requested}] seats")]
    NoAvailability { requested: i32 },
    // Deliberately identical for an unknown id and an email mismatch.
    #[error("No seat hold was found for id [{hold_id}] and the supplied email")]
    HoldNotFound { hold_id: u32 },
}

pub type TicketResult<T> = Result<T, TicketError>;
