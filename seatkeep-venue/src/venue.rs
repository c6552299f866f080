use seatkeep_core::{SeatRange, SeatState, TicketError, TicketResult};
use std::fmt::Write;

/// Rectangular grid of seat states, fixed for the life of the process.
///
/// The grid is the ground truth for seat availability. Callers own
/// synchronization; nothing here locks.
#[derive(Debug, Clone)]
pub struct Venue {
    rows: Vec<Vec<SeatState>>,
    seats_per_row: usize,
}

impl Venue {
    /// Every seat starts `Open`
    pub fn new(rows: usize, seats_per_row: usize) -> TicketResult<Self> {
        if rows == 0 || seats_per_row == 0 {
            return Err(TicketError::InvalidRequest(format!(
                "Venue must have at least one row and one seat per row, got {}x{}",
                rows, seats_per_row
            )));
        }

        Ok(Self {
            rows: vec![vec![SeatState::Open; seats_per_row]; rows],
            seats_per_row,
        })
    }

    pub fn seats_per_row(&self) -> usize {
        self.seats_per_row
    }

    pub fn rows(&self) -> impl Iterator<Item = &[SeatState]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Count of seats currently `Open`
    pub fn num_seats_available(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|state| **state == SeatState::Open)
            .count()
    }

    /// Overwrite every seat in `range` with `state`.
    ///
    /// A range that falls outside the grid is rejected before any seat
    /// changes.
    pub fn mark(&mut self, range: &SeatRange, state: SeatState) -> TicketResult<()> {
        let row = self
            .rows
            .get_mut(range.row())
            .filter(|row| range.last_seat() < row.len())
            .ok_or_else(|| {
                TicketError::InvalidRequest(format!(
                    "Seats {}..={} in row {} are outside the venue",
                    range.first_seat(),
                    range.last_seat(),
                    range.row()
                ))
            })?;

        row[range.seats()].fill(state);
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn state(&self, row: usize, seat: usize) -> Option<SeatState> {
        self.rows.get(row).and_then(|r| r.get(seat)).copied()
    }

    #[cfg(test)]
    pub(crate) fn all_in_state(&self, range: &SeatRange, state: SeatState) -> bool {
        range
            .seats()
            .all(|seat| self.state(range.row(), seat) == Some(state))
    }

    /// Tab separated seat map: a header of column indices, then one line per
    /// row with each seat's abbreviation.
    pub fn seat_map(&self) -> String {
        let mut map = String::from("row\t");
        for seat in 0..self.seats_per_row {
            let _ = write!(map, "{}\t", seat);
        }
        map.push('\n');

        for (index, row) in self.rows.iter().enumerate() {
            let _ = write!(map, "{}:\t", index);
            for state in row {
                map.push(state.abbreviation());
                map.push('\t');
            }
            map.push('\n');
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_venue_is_all_open() {
        let venue = Venue::new(9, 33).unwrap();
        assert_eq!(venue.num_seats_available(), 297);
        assert!(venue.rows().flatten().all(|s| *s == SeatState::Open));
    }

    #[test]
    fn test_empty_dimensions_rejected() {
        assert!(matches!(Venue::new(0, 10), Err(TicketError::InvalidRequest(_))));
        assert!(matches!(Venue::new(10, 0), Err(TicketError::InvalidRequest(_))));
    }

    #[test]
    fn test_mark_and_count() {
        let mut venue = Venue::new(2, 5).unwrap();
        let range = SeatRange::new(1, 1, 3);
        venue.mark(&range, SeatState::Held).unwrap();

        assert_eq!(venue.num_seats_available(), 7);
        assert!(venue.all_in_state(&range, SeatState::Held));
        assert_eq!(venue.state(1, 0), Some(SeatState::Open));
        assert_eq!(venue.state(5, 0), None);

        venue.mark(&range, SeatState::Open).unwrap();
        assert_eq!(venue.num_seats_available(), 10);
    }

    #[test]
    fn test_mark_outside_grid_rejected_without_mutation() {
        let mut venue = Venue::new(2, 5).unwrap();
        let before = venue.seat_map();

        let past_last_seat = venue.mark(&SeatRange::new(0, 3, 5), SeatState::Held);
        assert!(matches!(past_last_seat, Err(TicketError::InvalidRequest(_))));
        let past_last_row = venue.mark(&SeatRange::new(2, 0, 1), SeatState::Reserved);
        assert!(matches!(past_last_row, Err(TicketError::InvalidRequest(_))));

        assert_eq!(venue.seat_map(), before);
        assert_eq!(venue.num_seats_available(), 10);
    }

    #[test]
    fn test_seat_map_layout() {
        let mut venue = Venue::new(2, 3).unwrap();
        venue.mark(&SeatRange::new(0, 0, 0), SeatState::Held).unwrap();
        venue.mark(&SeatRange::new(1, 2, 2), SeatState::Reserved).unwrap();

        let expected = "row\t0\t1\t2\t\n0:\tH\tO\tO\t\n1:\tO\tO\tR\t\n";
        assert_eq!(venue.seat_map(), expected);
    }
}
