pub mod app_config;
pub mod hold_repo;
pub mod reservation_repo;

pub use app_config::Settings;
pub use hold_repo::HoldRegistry;
pub use reservation_repo::ReservationStore;
