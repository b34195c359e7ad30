//! Upload and classification counters.
//!
use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use tokio::{task::JoinHandle, time::interval};

pub static METER: Meter = Meter::new();

const LOG_INTERVAL_SECS: u64 = 10;

#[derive(Default)]
pub struct Meter {
    uploads: AtomicU64,
    classified: AtomicU64,
}

impl Meter {
    pub const fn new() -> Meter {
        Meter {
            uploads: AtomicU64::new(0),
            classified: AtomicU64::new(0),
        }
    }

    pub fn tick_upload(&self) {
        self.uploads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn tick_classified(&self) {
        self.classified.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_reset_uploads(&self) -> u64 {
        self.uploads.swap(0, Ordering::Relaxed)
    }

    pub fn get_reset_classified(&self) -> u64 {
        self.classified.swap(0, Ordering::Relaxed)
    }
}

/// Periodically log how many uploads were handled.
pub fn spawn_meter_logger() -> JoinHandle<()> {
    tokio::spawn(async {
        let mut log_interval = interval(Duration::from_secs(LOG_INTERVAL_SECS));
        log_interval.tick().await;

        loop {
            log_interval.tick().await;

            let uploads = METER.get_reset_uploads();
            let classified = METER.get_reset_classified();

            if uploads > 0 {
                log::info!(
                    "Handled {} uploads in the last {}s, {} classified with a prediction",
                    uploads,
                    LOG_INTERVAL_SECS,
                    classified
                );
            }
        }
    })
}
