use crate::venue::Venue;
use seatkeep_core::{SeatRange, SeatState, TicketError, TicketResult};
use tracing::trace;

/// Find the best block of `num_seats` adjacent open seats.
///
/// Rows are scanned from the front (row 0). The first row with any fitting
/// block wins and later rows are never considered. Within that row the block
/// whose first seat is closest to the row's middle (`seats_per_row / 2`) is
/// chosen; on a tie the lower seat index wins.
pub fn find_best_contiguous_block(venue: &Venue, num_seats: usize) -> Option<SeatRange> {
    if num_seats == 0 || num_seats > venue.seats_per_row() {
        return None;
    }

    let middle = venue.seats_per_row() / 2;

    for (row_index, row) in venue.rows().enumerate() {
        let candidates = candidate_starts(row, num_seats);
        let best = candidates
            .into_iter()
            .min_by_key(|start| start.abs_diff(middle));

        if let Some(first_seat) = best {
            trace!(row = row_index, first_seat, num_seats, "Best block found");
            return Some(SeatRange::new(row_index, first_seat, first_seat + num_seats - 1));
        }
    }

    None
}

/// Start indices of every run of `num_seats` open seats in a row, ascending.
fn candidate_starts(row: &[SeatState], num_seats: usize) -> Vec<usize> {
    let mut starts = Vec::new();
    let mut open_run = 0;

    for (seat, state) in row.iter().enumerate() {
        if *state == SeatState::Open {
            open_run += 1;
            if open_run >= num_seats {
                starts.push(seat + 1 - num_seats);
            }
        } else {
            open_run = 0;
        }
    }

    starts
}

/// Search for the best block and mark it `Held` in one step.
///
/// The caller must hold exclusive access to the venue for the whole call so
/// that no other operation observes the block between search and marking.
pub fn hold_best_seats(venue: &mut Venue, num_seats: i32) -> TicketResult<SeatRange> {
    if num_seats < 1 {
        return Err(TicketError::InvalidRequest(format!(
            "Number of seats must be at least one, got [{}]",
            num_seats
        )));
    }

    let range = usize::try_from(num_seats)
        .ok()
        .and_then(|n| find_best_contiguous_block(venue, n))
        .ok_or(TicketError::NoAvailability { requested: num_seats })?;

    venue.mark(&range, SeatState::Held)?;
    Ok(range)
}
