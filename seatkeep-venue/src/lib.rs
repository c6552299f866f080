pub mod allocator;
pub mod venue;

pub use allocator::{find_best_contiguous_block, hold_best_seats};
pub use venue::Venue;
