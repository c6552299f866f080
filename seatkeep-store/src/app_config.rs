use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};
use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server: ServerConfig,
    pub venue: VenueConfig,
    pub holds: HoldConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct VenueConfig {
    pub rows: usize,
    pub seats_per_row: usize,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct HoldConfig {
    pub timeout_seconds: u64,
    pub sweep_interval_millis: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig { port: 8080 },
            venue: VenueConfig {
                rows: 9,
                seats_per_row: 33,
            },
            holds: HoldConfig {
                timeout_seconds: 60,
                sweep_interval_millis: 1000,
            },
        }
    }
}

impl Settings {
    /// Layered load: built-in defaults, then `config/default`,
    /// `config/{RUN_MODE}` and `config/local` when present, then `SEATKEEP_*`
    /// environment variables (`SEATKEEP_VENUE__ROWS=12`).
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(Self::environment());

        Self::build(builder)
    }

    /// `SEATKEEP_` followed by the key path, with `__` between nested keys
    pub fn environment() -> config::Environment {
        config::Environment::with_prefix("SEATKEEP")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    /// Apply defaults underneath `builder`'s sources, deserialize and validate
    pub fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let settings: Self = builder
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default("venue.rows", defaults.venue.rows as i64)?
            .set_default("venue.seats_per_row", defaults.venue.seats_per_row as i64)?
            .set_default("holds.timeout_seconds", defaults.holds.timeout_seconds as i64)?
            .set_default("holds.sweep_interval_millis", defaults.holds.sweep_interval_millis as i64)?
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.venue.rows == 0 || self.venue.seats_per_row == 0 {
            return Err(ConfigError::Message(
                "venue.rows and venue.seats_per_row must be positive".to_string(),
            ));
        }
        if self.holds.sweep_interval_millis == 0 {
            return Err(ConfigError::Message(
                "holds.sweep_interval_millis must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// How long a hold lives before the sweeper may reclaim it
    pub fn hold_timeout(&self) -> chrono::Duration {
        i64::try_from(self.holds.timeout_seconds)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.holds.sweep_interval_millis)
    }
}
