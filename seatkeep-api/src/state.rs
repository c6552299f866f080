use std::sync::Arc;
use seatkeep_engine::TicketService;

#[derive(Clone)]
pub struct AppState {
    pub tickets: Arc<TicketService>,
}

impl AppState {
    pub fn new(tickets: Arc<TicketService>) -> Self {
        Self { tickets }
    }
}
