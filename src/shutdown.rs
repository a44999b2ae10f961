use std::sync::Arc;

use tokio::sync::watch;

/// One-shot shutdown signal: triggered at most once, waitable any
/// number of times, including by waiters that subscribe after the
/// trigger has already fired.
///
/// Cloning is cheap; all clones observe the same signal.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Fire the signal.
    ///
    /// **Returns**
    /// - `true` on the call that actually fired it.
    /// - `false` on any later call; firing twice is a no-op and never
    ///   panics or blocks.
    pub fn trigger(&self) -> bool {
        !self.tx.send_replace(true)
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Wait until the signal fires. Completes immediately if it already
    /// has.
    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives inside `self`, so `changed` cannot fail
        // while we are borrowed from it.
        while !*rx.borrow_and_update() {
            if rx.changed().await.is_err() {
                return;
            }
        }
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn trigger_is_one_shot() {
        let signal = ShutdownSignal::new();
        assert!(!signal.is_triggered());
        assert!(signal.trigger());
        assert!(!signal.trigger());
        assert!(signal.is_triggered());
    }

    #[tokio::test]
    async fn wait_completes_for_late_waiters() {
        let signal = ShutdownSignal::new();
        signal.trigger();
        // Subscribed after the trigger; must not hang.
        tokio::time::timeout(Duration::from_secs(1), signal.wait())
            .await
            .expect("late waiter should observe the fired signal");
    }

    #[tokio::test]
    async fn wakes_multiple_pending_waiters() {
        let signal = ShutdownSignal::new();
        let mut tasks = Vec::new();
        for _ in 0..4 {
            let signal = signal.clone();
            tasks.push(tokio::spawn(async move { signal.wait().await }));
        }

        signal.trigger();
        for task in tasks {
            tokio::time::timeout(Duration::from_secs(1), task)
                .await
                .expect("waiter should wake after trigger")
                .expect("waiter task should not panic");
        }
    }
}
