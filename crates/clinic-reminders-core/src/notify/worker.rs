//! Background worker running the daily reminder check.
//!
//! Runs the check once immediately, then on a fixed period. Each tick
//! reloads the collection from the store, which stays the sole source of
//! truth across restarts.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use chrono::Local;
use tokio::sync::watch;

use super::ReminderTrigger;
use crate::store::Store;

/// Fixed period between reminder checks.
pub const CHECK_PERIOD: Duration = Duration::from_secs(24 * 60 * 60);

/// Run the reminder check loop until `shutdown` flips.
///
/// Ticks never overlap; shutdown means "stop rescheduling", the tick in
/// progress always completes. Store errors skip the tick instead of
/// killing the loop.
pub async fn run(
    store: Arc<Mutex<Store>>,
    mut trigger: ReminderTrigger,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    log::info!("reminder worker started (period: {:?})", period);
    loop {
        match load_and_tick(&store, &mut trigger) {
            Ok(due) => {
                if due > 0 {
                    log::info!("reminder check complete: {} due", due);
                }
            }
            Err(e) => log::error!("reminder check skipped: {}", e),
        }

        tokio::select! {
            _ = tokio::time::sleep(period) => {}
            _ = shutdown.changed() => {
                log::info!("reminder worker stopping");
                break;
            }
        }
    }
}

fn load_and_tick(store: &Arc<Mutex<Store>>, trigger: &mut ReminderTrigger) -> Result<usize, String> {
    let patients = store
        .lock()
        .map_err(|e| format!("store lock poisoned: {}", e))?
        .load_patients()
        .map_err(|e| format!("failed to load patients: {}", e))?;

    Ok(trigger.tick(&patients, Local::now().date_naive()))
}

/// Handle to a running reminder worker.
pub struct WorkerHandle {
    shutdown: watch::Sender<bool>,
    thread: Option<thread::JoinHandle<()>>,
}

impl WorkerHandle {
    /// Spawn the worker on a dedicated thread with its own runtime.
    ///
    /// The core is embedded behind FFI and cannot assume a host async
    /// runtime, so the loop gets a current-thread runtime of its own.
    pub fn spawn(
        store: Arc<Mutex<Store>>,
        trigger: ReminderTrigger,
        period: Duration,
    ) -> std::io::Result<Self> {
        let (shutdown, shutdown_rx) = watch::channel(false);
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()?;
        let thread = thread::Builder::new()
            .name("reminder-worker".into())
            .spawn(move || runtime.block_on(run(store, trigger, period, shutdown_rx)))?;

        Ok(Self {
            shutdown,
            thread: Some(thread),
        })
    }

    /// Stop rescheduling and wait for the worker thread to exit.
    pub fn stop(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}
