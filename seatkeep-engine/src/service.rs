use chrono::{DateTime, Utc};
use seatkeep_core::{Hold, Reservation, SeatState, TicketError, TicketResult};
use seatkeep_shared::{Masked, SeatEvent, SeatEventKind};
use seatkeep_store::{HoldRegistry, ReservationStore, Settings};
use seatkeep_venue::{hold_best_seats, Venue};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;
use tracing::{debug, error, info, trace, warn};

use crate::expiry::{HoldSweeper, SweeperHandle};

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Holds and reservations, guarded together by one lock
struct Books {
    holds: HoldRegistry,
    reservations: ReservationStore,
}

/// Seat allocation and hold lifecycle engine.
///
/// Two locks protect the shared state: `books` (hold registry plus
/// reservations) and `venue` (the seat grid). Any operation that needs both
/// takes `books` first, then `venue`. Critical sections only scan arrays and
/// maps; events are published after both locks are released.
pub struct TicketService {
    books: Mutex<Books>,
    venue: Mutex<Venue>,
    hold_timeout: chrono::Duration,
    events: broadcast::Sender<SeatEvent>,
    sweeper: Mutex<Option<SweeperHandle>>,
}

impl TicketService {
    /// Build an engine with no background sweeper. Expiry only happens when
    /// [`TicketService::expire_holds`] is called.
    pub fn new(settings: &Settings) -> TicketResult<Self> {
        Self::with_hold_registry(settings, HoldRegistry::new())
    }

    fn with_hold_registry(settings: &Settings, holds: HoldRegistry) -> TicketResult<Self> {
        let venue = Venue::new(settings.venue.rows, settings.venue.seats_per_row)?;
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Ok(Self {
            books: Mutex::new(Books {
                holds,
                reservations: ReservationStore::new(),
            }),
            venue: Mutex::new(venue),
            hold_timeout: settings.hold_timeout(),
            events,
            sweeper: Mutex::new(None),
        })
    }

    /// Build an engine and start its expiry sweeper.
    ///
    /// Must be called from within a tokio runtime. The sweeper runs until
    /// [`TicketService::shutdown`] is called or the engine is dropped.
    pub fn start(settings: &Settings) -> TicketResult<Arc<Self>> {
        let service = Arc::new(Self::new(settings)?);
        let handle = HoldSweeper::new(Arc::downgrade(&service), settings.sweep_interval()).spawn();
        *lock(&service.sweeper) = Some(handle);

        info!(
            rows = settings.venue.rows,
            seats_per_row = settings.venue.seats_per_row,
            hold_timeout_secs = settings.holds.timeout_seconds,
            "Ticket service started"
        );
        Ok(service)
    }

    /// Stop the background sweeper, if one is running
    pub fn shutdown(&self) {
        if let Some(handle) = lock(&self.sweeper).take() {
            handle.stop();
            info!("Ticket service sweeper stopped");
        }
    }

    /// Receive an event for every hold transition from now on
    pub fn subscribe(&self) -> broadcast::Receiver<SeatEvent> {
        self.events.subscribe()
    }

    pub fn num_seats_available(&self) -> usize {
        lock(&self.venue).num_seats_available()
    }

    pub fn seat_map(&self) -> String {
        lock(&self.venue).seat_map()
    }

    /// Hold the best block of `num_seats` seats for `customer_email`.
    ///
    /// Seat selection, marking and registration happen under both locks so
    /// the grid never shows held seats without a matching hold.
    pub fn find_and_hold_seats(&self, num_seats: i32, customer_email: &str) -> TicketResult<Hold> {
        let (hold, live_holds) = {
            let mut books = lock(&self.books);
            let seats = {
                let mut venue = lock(&self.venue);
                hold_best_seats(&mut venue, num_seats)
            };
            let seats = match seats {
                Ok(seats) => seats,
                Err(e) => {
                    debug!(num_seats, error = %e, "Seat hold rejected");
                    return Err(e);
                }
            };
            let hold = books.holds.create(customer_email.to_string(), seats);
            (hold, books.holds.len())
        };

        info!(
            hold_id = hold.id,
            customer = %Masked(customer_email),
            row = hold.seats.row(),
            first_seat = hold.seats.first_seat(),
            last_seat = hold.seats.last_seat(),
            live_holds,
            "Seats held"
        );
        self.publish(SeatEventKind::Held, &hold);
        Ok(hold)
    }

    /// Promote a hold into a permanent reservation.
    ///
    /// Fails with `HoldNotFound` when the id is unknown or the email does not
    /// match; the two cases are indistinguishable to the caller.
    pub fn promote(&self, hold_id: u32, customer_email: &str) -> TicketResult<Reservation> {
        let (hold, reservation) = {
            let mut books = lock(&self.books);
            let Some(seats) = books.holds.find_owned(hold_id, customer_email).map(|h| h.seats) else {
                warn!(hold_id, customer = %Masked(customer_email), "Reservation rejected, no matching hold");
                return Err(TicketError::HoldNotFound { hold_id });
            };

            lock(&self.venue).mark(&seats, SeatState::Reserved)?;
            let Some(hold) = books.holds.remove_owned(hold_id, customer_email) else {
                return Err(TicketError::HoldNotFound { hold_id });
            };

            let reservation = Reservation::from_hold(hold.clone());
            books.reservations.insert(reservation.clone());
            (hold, reservation)
        };

        info!(
            hold_id,
            confirmation_code = %reservation.confirmation_code,
            seats = reservation.seats.len(),
            "Hold promoted to reservation"
        );
        self.publish(SeatEventKind::Reserved, &hold);
        Ok(reservation)
    }

    /// Reserve the seats of a hold, returning the confirmation code
    pub fn reserve_seats(&self, hold_id: u32, customer_email: &str) -> TicketResult<String> {
        self.promote(hold_id, customer_email)
            .map(|reservation| reservation.confirmation_code)
    }

    /// Cancel a hold and return its seats to the venue.
    ///
    /// Returns `false`, changing nothing, when no hold matches the id and
    /// email.
    pub fn cancel_seat_hold(&self, hold_id: u32, customer_email: &str) -> bool {
        let cancelled = {
            let mut books = lock(&self.books);
            let seats = books.holds.find_owned(hold_id, customer_email).map(|h| h.seats);
            match seats.map(|seats| lock(&self.venue).mark(&seats, SeatState::Open)) {
                Some(Ok(())) => books.holds.remove_owned(hold_id, customer_email),
                Some(Err(e)) => {
                    error!(hold_id, error = %e, "Hold seats could not be released");
                    None
                }
                None => None,
            }
        };

        match cancelled {
            Some(hold) => {
                debug!(hold_id, "Hold cancelled");
                self.publish(SeatEventKind::Cancelled, &hold);
                true
            }
            None => {
                debug!(hold_id, "Cancellation found no matching hold");
                false
            }
        }
    }

    /// Read a hold without changing it
    pub fn get_hold(&self, hold_id: u32, customer_email: &str) -> TicketResult<Hold> {
        lock(&self.books)
            .holds
            .find_owned(hold_id, customer_email)
            .cloned()
            .ok_or(TicketError::HoldNotFound { hold_id })
    }

    /// Snapshot of every live hold
    pub fn get_holds(&self) -> HashMap<u32, Hold> {
        lock(&self.books).holds.snapshot()
    }

    /// Snapshot of every reservation
    pub fn get_reservations(&self) -> HashMap<String, Reservation> {
        lock(&self.books).reservations.snapshot()
    }

    /// Expire every hold older than the configured timeout
    pub fn expire_holds(&self) -> Vec<Hold> {
        match Utc::now().checked_sub_signed(self.hold_timeout) {
            Some(cutoff) => self.expire_holds_before(cutoff),
            None => Vec::new(),
        }
    }

    /// Release every hold created strictly before `cutoff`, in one critical
    /// section. Emails are not checked.
    pub fn expire_holds_before(&self, cutoff: DateTime<Utc>) -> Vec<Hold> {
        let expired = {
            let mut books = lock(&self.books);
            if books.holds.is_empty() {
                return Vec::new();
            }
            let expired = books.holds.drain_expired(cutoff);
            if !expired.is_empty() {
                let mut venue = lock(&self.venue);
                for hold in &expired {
                    if let Err(e) = venue.mark(&hold.seats, SeatState::Open) {
                        error!(hold_id = hold.id, error = %e, "Expired hold seats could not be released");
                    }
                }
            }
            expired
        };

        if expired.is_empty() {
            trace!("Sweep found no expired holds");
        } else {
            info!(count = expired.len(), %cutoff, "Expired holds released");
            for hold in &expired {
                self.publish(SeatEventKind::Expired, hold);
            }
        }
        expired
    }

    fn publish(&self, kind: SeatEventKind, hold: &Hold) {
        // No subscribers is fine
        let _ = self.events.send(SeatEvent::now(
            kind,
            hold.id,
            hold.seats.row(),
            hold.seats.first_seat(),
            hold.seats.last_seat(),
        ));
    }
}

impl Drop for TicketService {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Every critical section validates before it mutates, so data behind a
/// poisoned lock is still consistent.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
