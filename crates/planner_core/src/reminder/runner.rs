//! Long-lived reminder timer.
//!
//! # Responsibility
//! - Drive the engine on a fixed cadence from one background thread.
//! - Read the latest activity snapshot through shared indirection at tick
//!   time, so data changes never restart the timer.
//!
//! # Invariants
//! - The first scan happens immediately on start.
//! - Stopping the handle cancels the timer synchronously; dropping it does
//!   the same.

use super::engine::ReminderEngine;
use crate::notify::sink::NotificationSink;
use crate::store::SharedSnapshot;
use log::info;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Starts and owns the recurring scan thread.
pub struct ReminderRunner;

impl ReminderRunner {
    /// Spawns the scan loop: one immediate scan, then one per `interval`
    /// until the returned handle stops it.
    pub fn start(
        engine: ReminderEngine,
        snapshot: SharedSnapshot,
        sink: Arc<dyn NotificationSink>,
        interval: Duration,
    ) -> ReminderHandle {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let join = std::thread::spawn(move || {
            info!(
                "event=runner_start module=reminder status=ok interval_ms={}",
                interval.as_millis()
            );
            loop {
                let activities = snapshot.read();
                engine.scan(&activities, sink.as_ref());

                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            info!("event=runner_stop module=reminder status=ok");
        });

        ReminderHandle {
            stop_tx,
            join: Some(join),
        }
    }
}

/// Cancelable handle to the scan thread.
pub struct ReminderHandle {
    stop_tx: Sender<()>,
    join: Option<JoinHandle<()>>,
}

impl ReminderHandle {
    /// Stops the timer and waits for the in-flight tick to finish.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let _ = self.stop_tx.send(());
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

impl Drop for ReminderHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
