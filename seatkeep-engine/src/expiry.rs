//! Background reclamation of abandoned holds.

use std::sync::Weak;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use crate::service::TicketService;

/// Periodic task that releases holds older than the engine's hold timeout.
///
/// The first sweep runs immediately, then once per `interval`. A hold can
/// outlive its timeout by up to one interval.
pub struct HoldSweeper {
    service: Weak<TicketService>,
    interval: Duration,
}

impl HoldSweeper {
    pub fn new(service: Weak<TicketService>, interval: Duration) -> Self {
        Self { service, interval }
    }

    /// Spawn the sweep loop on the current tokio runtime
    pub fn spawn(self) -> SweeperHandle {
        let (shutdown, cancel) = watch::channel(false);
        let task = tokio::spawn(self.run(cancel));
        SweeperHandle { shutdown, task }
    }

    /// Sweep until cancelled or until the engine is gone
    pub async fn run(self, mut cancel: watch::Receiver<bool>) {
        info!("Hold sweeper started, interval={}ms", self.interval.as_millis());

        let mut interval = time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let Some(service) = self.service.upgrade() else {
                        debug!("Ticket service dropped, hold sweeper exiting");
                        break;
                    };
                    service.expire_holds();
                }
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        info!("Hold sweeper shutting down");
                        break;
                    }
                }
            }
        }
    }
}

/// Owns the running sweep task. Dropping the handle stops the task.
pub struct SweeperHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Ask the loop to exit after its current sweep
    pub fn stop(&self) {
        let _ = self.shutdown.send(true);
    }

    #[cfg(test)]
    fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
        self.task.abort();
    }
}
