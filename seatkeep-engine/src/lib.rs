pub mod expiry;
pub mod service;

pub use expiry::{HoldSweeper, SweeperHandle};
pub use service::TicketService;
