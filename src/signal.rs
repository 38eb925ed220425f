//! Per-key one-shot broadcast signal.
//!
//! A `Signal` tells every task waiting on one key that its value has been
//! written. It is built on a `tokio::sync::watch` channel carrying a single
//! `bool`: firing flips it to `true`, and all receivers see the same flip.
//! Firing an already-fired signal is a plain overwrite of `true` with `true`,
//! so it can never fault, and a fired signal stays fired.

use tokio::sync::watch;

pub struct Signal {
    tx: watch::Sender<bool>,
}

impl Signal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Wakes every current waiter. Idempotent.
    pub fn fire(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_fired(&self) -> bool {
        *self.tx.borrow()
    }

    /// Hands out a waiter handle. Must be called before the caller releases
    /// whatever lock guards this signal, so a concurrent `fire` cannot slip
    /// between the subscription and the wait.
    pub fn subscribe(&self) -> SignalWaiter {
        SignalWaiter {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for Signal {
    fn default() -> Self {
        Self::new()
    }
}

/// One waiter's handle on a [`Signal`]. Each waiter owns its own receiver,
/// so dropping one (e.g. on timeout) does not disturb the others.
pub struct SignalWaiter {
    rx: watch::Receiver<bool>,
}

impl SignalWaiter {
    /// Resolves once the signal has fired. Returns immediately if it already
    /// has.
    pub async fn fired(&mut self) {
        // wait_for only errors when the sender is gone, and the map keeps
        // every sender alive for its own lifetime. Park so the caller's
        // deadline still fires if that ever stops holding.
        if self.rx.wait_for(|fired| *fired).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn fire_releases_waiter() {
        let signal = Signal::new();
        let mut waiter = signal.subscribe();

        assert!(!signal.is_fired());
        signal.fire();
        assert!(signal.is_fired());

        waiter.fired().await;
    }

    #[tokio::test]
    async fn fire_twice_is_harmless() {
        let signal = Signal::new();
        signal.fire();
        signal.fire();
        assert!(signal.is_fired());

        let mut waiter = signal.subscribe();
        waiter.fired().await;
    }

    #[tokio::test]
    async fn all_waiters_released_by_one_fire() {
        let signal = Signal::new();
        let mut a = signal.subscribe();
        let mut b = signal.subscribe();

        let pending = tokio::time::timeout(Duration::from_millis(10), a.fired()).await;
        assert!(pending.is_err());

        signal.fire();
        a.fired().await;
        b.fired().await;
    }
}
