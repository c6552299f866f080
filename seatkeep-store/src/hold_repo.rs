use chrono::{DateTime, Utc};
use rand::Rng;
use seatkeep_core::{Hold, SeatRange};
use std::collections::HashMap;
use tracing::debug;

/// Smallest and largest hold id handed out
pub const MIN_HOLD_ID: u32 = 1;
pub const MAX_HOLD_ID: u32 = 9_999_999;

type IdGenerator = Box<dyn FnMut() -> u32 + Send>;

/// Live holds keyed by id.
///
/// Purely a data structure: the engine wraps it in a lock together with the
/// reservation store.
pub struct HoldRegistry {
    holds: HashMap<u32, Hold>,
    next_id: IdGenerator,
}

impl HoldRegistry {
    pub fn new() -> Self {
        Self::with_id_generator(|| rand::thread_rng().gen_range(MIN_HOLD_ID..=MAX_HOLD_ID))
    }

    /// Use a custom id source instead of the random one
    pub fn with_id_generator<F>(generator: F) -> Self
    where
        F: FnMut() -> u32 + Send + 'static,
    {
        Self {
            holds: HashMap::new(),
            next_id: Box::new(generator),
        }
    }

    /// Register a hold for `seats` under a fresh id.
    ///
    /// Ids are random; a draw that collides with a live hold is discarded and
    /// redrawn so an existing hold is never overwritten. The id space is far
    /// larger than any venue, so this terminates quickly.
    pub fn create(&mut self, customer_email: String, seats: SeatRange) -> Hold {
        let id = loop {
            let candidate = (self.next_id)();
            if !self.holds.contains_key(&candidate) {
                break candidate;
            }
            debug!(hold_id = candidate, "Hold id collision, drawing again");
        };

        let hold = Hold::new(id, customer_email, seats);
        self.holds.insert(id, hold.clone());
        hold
    }

    /// Hold `hold_id`, only if it belongs to `customer_email`
    pub fn find_owned(&self, hold_id: u32, customer_email: &str) -> Option<&Hold> {
        self.holds
            .get(&hold_id)
            .filter(|hold| hold.belongs_to(customer_email))
    }

    /// Remove and return hold `hold_id`, only if it belongs to `customer_email`
    pub fn remove_owned(&mut self, hold_id: u32, customer_email: &str) -> Option<Hold> {
        self.find_owned(hold_id, customer_email)?;
        self.holds.remove(&hold_id)
    }

    /// Remove and return every hold created strictly before `cutoff`
    pub fn drain_expired(&mut self, cutoff: DateTime<Utc>) -> Vec<Hold> {
        let expired: Vec<u32> = self
            .holds
            .values()
            .filter(|hold| hold.is_expired(cutoff))
            .map(|hold| hold.id)
            .collect();

        expired
            .into_iter()
            .filter_map(|id| self.holds.remove(&id))
            .collect()
    }

    pub fn snapshot(&self) -> HashMap<u32, Hold> {
        self.holds.clone()
    }

    pub fn len(&self) -> usize {
        self.holds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holds.is_empty()
    }
}

impl Default for HoldRegistry {
    fn default() -> Self {
        Self::new()
    }
}
