use seatkeep_core::Reservation;
use std::collections::HashMap;

/// Confirmed reservations keyed by confirmation code. Append only.
#[derive(Debug, Default, Clone)]
pub struct ReservationStore {
    reservations: HashMap<String, Reservation>,
}

impl ReservationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, reservation: Reservation) {
        self.reservations
            .insert(reservation.confirmation_code.clone(), reservation);
    }

    pub fn snapshot(&self) -> HashMap<String, Reservation> {
        self.reservations.clone()
    }
}
