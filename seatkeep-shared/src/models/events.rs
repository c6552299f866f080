use chrono::Utc;

/// What happened to a hold.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatEventKind {
    Held,
    Reserved,
    Cancelled,
    Expired,
}

/// Published on the engine's broadcast channel after each hold transition.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct SeatEvent {
    pub kind: SeatEventKind,
    pub hold_id: u32,
    pub row: usize,
    pub first_seat: usize,
    pub last_seat: usize,
    pub timestamp: i64,
}

impl SeatEvent {
    pub fn now(kind: SeatEventKind, hold_id: u32, row: usize, first_seat: usize, last_seat: usize) -> Self {
        Self {
            kind,
            hold_id,
            row,
            first_seat,
            last_seat,
            timestamp: Utc::now().timestamp(),
        }
    }
}
