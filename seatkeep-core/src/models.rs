use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// State of a single seat in the venue
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatState {
    #[default]
    Open,
    Held,
    Reserved,
}

impl SeatState {
    /// Single character used by the seat map
    pub fn abbreviation(self) -> char {
        match self {
            SeatState::Open => 'O',
            SeatState::Held => 'H',
            SeatState::Reserved => 'R',
        }
    }
}

/// Inclusive run of adjacent seats within one row
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "RawSeatRange")]
pub struct SeatRange {
    row: usize,
    first_seat: usize,
    last_seat: usize,
}

#[derive(Deserialize)]
struct RawSeatRange {
    row: usize,
    first_seat: usize,
    last_seat: usize,
}

impl From<RawSeatRange> for SeatRange {
    fn from(raw: RawSeatRange) -> Self {
        SeatRange::new(raw.row, raw.first_seat, raw.last_seat)
    }
}

impl SeatRange {
    /// The two endpoints may be given in either order; the lower one always
    /// becomes `first_seat`.
    pub fn new(row: usize, first_seat: usize, last_seat: usize) -> Self {
        Self {
            row,
            first_seat: first_seat.min(last_seat),
            last_seat: first_seat.max(last_seat),
        }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn first_seat(&self) -> usize {
        self.first_seat
    }

    pub fn last_seat(&self) -> usize {
        self.last_seat
    }

    /// Number of seats covered
    pub fn len(&self) -> usize {
        self.last_seat - self.first_seat + 1
    }

    /// Seat indices covered, in order
    pub fn seats(&self) -> std::ops::RangeInclusive<usize> {
        self.first_seat..=self.last_seat
    }
}

/// Temporary claim on a block of seats, pending confirmation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Hold {
    pub id: u32,
    pub customer_email: String,
    pub seats: SeatRange,
    pub created_at: DateTime<Utc>,
}

impl Hold {
    pub fn new(id: u32, customer_email: String, seats: SeatRange) -> Self {
        Self {
            id,
            customer_email,
            seats,
            created_at: Utc::now(),
        }
    }

    /// Emails compare case-insensitively
    pub fn belongs_to(&self, customer_email: &str) -> bool {
        self.customer_email.to_lowercase() == customer_email.to_lowercase()
    }

    pub fn is_expired(&self, cutoff: DateTime<Utc>) -> bool {
        self.created_at < cutoff
    }
}

/// Permanent claim created by promoting a hold
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reservation {
    pub confirmation_code: String,
    pub customer_email: String,
    pub seats: SeatRange,
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    /// Promote a hold, minting a fresh confirmation code
    pub fn from_hold(hold: Hold) -> Self {
        Self {
            confirmation_code: Uuid::new_v4().to_string(),
            customer_email: hold.customer_email,
            seats: hold.seats,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_seat_range_geometry() {
        let range = SeatRange::new(2, 16, 17);
        assert_eq!(range.len(), 2);
        assert_eq!(range.seats().collect::<Vec<_>>(), vec![16, 17]);
        assert_eq!(range, SeatRange::new(2, 16, 17));
    }

    #[test]
    fn test_reversed_endpoints_are_ordered() {
        let range = SeatRange::new(1, 9, 4);
        assert_eq!(range.first_seat(), 4);
        assert_eq!(range.last_seat(), 9);
        assert_eq!(range.len(), 6);
        assert_eq!(range, SeatRange::new(1, 4, 9));
    }

    #[test]
    fn test_deserialized_range_is_ordered() {
        let range: SeatRange =
            serde_json::from_str(r#"{"row":0,"first_seat":17,"last_seat":16}"#).unwrap();
        assert_eq!(range, SeatRange::new(0, 16, 17));
        assert_eq!(range.len(), 2);
    }

    #[test]
    fn test_hold_email_match_ignores_case() {
        let hold = Hold::new(7, "Test@Email.com".to_string(), SeatRange::new(0, 1, 1));
        assert!(hold.belongs_to("test@email.com"));
        assert!(!hold.belongs_to("other@email.com"));
    }

    #[test]
    fn test_hold_expiry_is_strict() {
        let hold = Hold::new(7, "a@b.c".to_string(), SeatRange::new(0, 1, 1));
        assert!(!hold.is_expired(hold.created_at));
        assert!(hold.is_expired(hold.created_at + Duration::milliseconds(1)));
    }

    #[test]
    fn test_reservation_code_is_uuid_text() {
        let hold = Hold::new(7, "a@b.c".to_string(), SeatRange::new(0, 1, 3));
        let reservation = Reservation::from_hold(hold);
        assert_eq!(reservation.confirmation_code.len(), 36);
        assert!(Uuid::parse_str(&reservation.confirmation_code).is_ok());
        assert_eq!(reservation.seats, SeatRange::new(0, 1, 3));
    }

    #[test]
    fn test_seat_state_serializes_screaming() {
        assert_eq!(serde_json::to_string(&SeatState::Reserved).unwrap(), "\"RESERVED\"");
        assert_eq!(SeatState::default(), SeatState::Open);
    }
}
