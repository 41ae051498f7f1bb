use std::sync::atomic::{AtomicBool, Ordering};
use tokio::signal;
use tokio::sync::Notify;

pub struct ShutdownManager {
    shutdown: AtomicBool,
    notify: Notify,
}

impl ShutdownManager {
    pub fn new() -> Self {
        Self {
            shutdown: AtomicBool::new(false),
            notify: Notify::new(),
        }
    }

    /// Resolves on Ctrl-C, SIGTERM, or [`signal_shutdown`](Self::signal_shutdown).
    pub async fn wait_for_shutdown(&self) {
        if self.is_shutting_down() {
            return;
        }

        #[cfg(unix)]
        {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    tokio::select! {
                        _ = signal::ctrl_c() => {},
                        _ = sigterm.recv() => {},
                        _ = self.notify.notified() => {},
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "SIGTERM handler unavailable");
                    tokio::select! {
                        _ = signal::ctrl_c() => {},
                        _ = self.notify.notified() => {},
                    }
                }
            }
        }

        #[cfg(not(unix))]
        {
            tokio::select! {
                _ = signal::ctrl_c() => {},
                _ = self.notify.notified() => {},
            }
        }

        self.shutdown.store(true, Ordering::SeqCst);
        tracing::info!("Shutting down gracefully...");
    }

    pub fn signal_shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
        // notify_one keeps a permit if the waiter has not registered yet
        self.notify.notify_one();
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }
}

impl Default for ShutdownManager {
    fn default() -> Self {
        Self::new()
    }
}
