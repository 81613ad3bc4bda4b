//! Periodic caller that feeds `tick()` to a shared [`FocusStore`].
//!
//! The driver owns a tokio task. It must be spawned when the timer enters
//! `Running`; it stops on its own as soon as the timer leaves `Running`,
//! on `stop()`, and when dropped, so no tick can reach the store after the
//! owning view is gone.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::storage::KvStore;
use crate::store::FocusStore;

pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

pub struct TickDriver {
    handle: Option<JoinHandle<()>>,
}

impl TickDriver {
    /// Spawn on the current tokio runtime. The first tick fires one
    /// `period` after the call.
    pub fn spawn<S>(store: Arc<Mutex<FocusStore<S>>>, period: Duration) -> Self
    where
        S: KvStore + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let Ok(mut guard) = store.lock() else {
                    tracing::warn!("focus store lock poisoned, stopping tick driver");
                    break;
                };
                guard.tick();
                if !guard.engine().is_running() {
                    tracing::debug!(state = ?guard.engine().timer_state(), "tick driver stopped");
                    break;
                }
            }
        });
        Self {
            handle: Some(handle),
        }
    }

    /// Cancel the periodic task. Idempotent.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Whether the task is still ticking.
    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Wait until the driver stops by itself (timer left `Running`).
    pub async fn finished(mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for TickDriver {
    fn drop(&mut self) {
        self.stop();
    }
}
