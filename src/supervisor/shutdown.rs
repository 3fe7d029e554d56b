// src/supervisor/shutdown.rs

//! Stop channel for the restart loop.

use std::sync::Arc;

use tokio::sync::watch;

/// Create a connected stop handle / signal pair.
pub fn channel() -> (ShutdownHandle, ShutdownSignal) {
    let (tx, rx) = watch::channel(false);
    (
        ShutdownHandle { tx: Arc::new(tx) },
        ShutdownSignal { rx },
    )
}

/// Requests that the supervisor stop. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownHandle {
    /// Ask the supervisor to stop. Idempotent.
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }
}

/// Receiving side, owned by the supervisor.
///
/// If every [`ShutdownHandle`] is dropped without calling `stop`, the
/// signal never fires and the supervisor runs until the process is killed.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// A signal with no handle; the loop only ends when the process dies.
    pub fn never() -> Self {
        let (_handle, signal) = channel();
        signal
    }

    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once a stop has been requested.
    pub async fn stopped(&mut self) {
        let requested = self.rx.wait_for(|stop| *stop).await.is_ok();
        if !requested {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn stop_wakes_waiter() {
        let (handle, mut signal) = channel();
        assert!(!signal.is_stopped());

        let waiter = tokio::spawn(async move {
            signal.stopped().await;
            signal.is_stopped()
        });

        handle.stop();
        let stopped = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should wake")
            .unwrap();
        assert!(stopped);
    }

    #[tokio::test]
    async fn dropped_handle_never_fires() {
        let mut signal = ShutdownSignal::never();
        let res = tokio::time::timeout(Duration::from_millis(50), signal.stopped()).await;
        assert!(res.is_err());
        assert!(!signal.is_stopped());
    }

    #[tokio::test]
    async fn stop_before_wait_is_observed() {
        let (handle, mut signal) = channel();
        handle.stop();
        handle.stop();
        tokio::time::timeout(Duration::from_millis(50), signal.stopped())
            .await
            .expect("already-stopped signal resolves immediately");
    }
}
