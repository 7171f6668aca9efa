//! Drives a [`Driver`] from the wall clock on a background thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::kernel::Driver;

pub fn lock(driver: &Mutex<Driver>) -> MutexGuard<'_, Driver> {
    driver.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Advances simulated time to match elapsed real time, one simulated
/// millisecond per real millisecond. The thread stops when this is dropped.
pub struct RealtimeClock {
    should_terminate: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl RealtimeClock {
    pub fn spawn(driver: Arc<Mutex<Driver>>, resolution: Duration) -> RealtimeClock {
        let should_terminate = Arc::new(AtomicBool::new(false));
        let should_terminate_clone = should_terminate.clone();

        let handle = thread::spawn(move || {
            let origin = Instant::now();
            let base = lock(&driver).now();

            while !should_terminate_clone.load(Ordering::Relaxed) {
                let elapsed = u64::try_from(origin.elapsed().as_millis()).unwrap_or(u64::MAX);
                lock(&driver).advance_to(base.saturating_add(elapsed));
                thread::sleep(resolution);
            }
        });

        RealtimeClock {
            should_terminate,
            handle: Some(handle),
        }
    }

    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.should_terminate.store(true, Ordering::Relaxed);

        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("realtime clock thread panicked");
            }
        }
    }
}

impl Drop for RealtimeClock {
    fn drop(&mut self) {
        self.shutdown();
    }
}
