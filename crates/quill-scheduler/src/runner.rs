use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use crate::service::SchedulingService;

/// Periodic trigger for the publisher.
///
/// Runs `publisher_tick` on a fixed cadence until `shutdown` broadcasts
/// `true`. The tick is awaited inline in the loop body, so a slow pass
/// delays the next one; two passes never run concurrently from the same
/// runner. A store failure is logged and the loop waits for the next tick.
pub struct PublisherRunner {
    service: Arc<SchedulingService>,
    interval: Duration,
}

impl PublisherRunner {
    pub fn new(service: Arc<SchedulingService>, interval: Duration) -> Self {
        Self { service, interval }
    }

    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(interval_ms = self.interval.as_millis() as u64, "publisher runner started");

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.service.publisher_tick().await {
                        Ok(0) => debug!("publisher tick: nothing due"),
                        Ok(n) => info!(posted = n, "publisher tick: published post(s)"),
                        Err(e) => error!("publisher tick failed: {e}"),
                    }
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("publisher runner shutting down");
                        break;
                    }
                }
            }
        }
    }
}
