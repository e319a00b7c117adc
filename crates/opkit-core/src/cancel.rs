//! Per-invocation cancellation.
//!
//! One [`CancelHandle`] is scoped to one invocation, including every page of
//! a paginated call. The invoker races the in-flight remote call against the
//! token, so firing the handle drops the network future rather than merely
//! preventing the next page from being scheduled.

use std::sync::Arc;

use tokio::sync::watch;

/// Caller-side handle that aborts an invocation.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Create a handle and its paired token.
    #[must_use]
    pub fn new() -> (Self, CancelToken) {
        let (tx, rx) = watch::channel(false);
        (
            Self { tx },
            CancelToken {
                rx,
                _keepalive: None,
            },
        )
    }

    /// Fire the cancellation signal.
    pub fn cancel(&self) {
        // Receivers may already be gone when the invocation finished first.
        let _ = self.tx.send(true);
    }
}

/// Pipeline-side cancellation token.
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
    // Keeps the sender of a `never` token alive so the channel stays open.
    _keepalive: Option<Arc<watch::Sender<bool>>>,
}

impl CancelToken {
    /// A token that can never fire, for callers without a cancel handle.
    #[must_use]
    pub fn never() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            rx,
            _keepalive: Some(Arc::new(tx)),
        }
    }

    /// Whether the handle has fired.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve when the handle fires. Never resolves if the handle is
    /// dropped without firing.
    pub async fn cancelled(&mut self) {
        loop {
            if *self.rx.borrow() {
                return;
            }
            if self.rx.changed().await.is_err() {
                // Handle dropped without cancelling.
                std::future::pending::<()>().await;
            }
        }
    }
}
