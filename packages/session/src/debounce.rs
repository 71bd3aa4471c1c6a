//! Trailing-edge debouncing on the tokio runtime.

use std::{
    fmt,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use tokio::task::JoinHandle;

type Action<T> = Arc<dyn Fn(T) + Send + Sync>;

/// Runs an action once no new value has been scheduled for `delay`.
///
/// Each [`schedule`](Self::schedule) aborts the pending run, so only the
/// last value in a burst reaches the action. Dropping the debouncer aborts
/// anything still pending.
pub struct Debouncer<T> {
    delay: Duration,
    action: Action<T>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<T> fmt::Debug for Debouncer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay", &self.delay)
            .field("pending", &self.is_pending())
            .finish_non_exhaustive()
    }
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(delay: Duration, action: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self {
            delay,
            action: Arc::new(action),
            pending: Mutex::new(None),
        }
    }

    /// Schedules `value`, replacing whatever was pending.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&self, value: T) {
        let action = Arc::clone(&self.action);
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action(value);
        });

        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.replace(handle) {
            previous.abort();
        }
    }
}

impl<T> Debouncer<T> {
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Drops the pending value, if any.
    pub fn cancel(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = pending.take() {
            handle.abort();
        }
    }

    /// Whether a scheduled value has not run yet.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<u32>>>, impl Fn(u32) + Send + Sync + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |value| sink.lock().unwrap().push(value))
    }

    async fn settle(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        tokio::task::yield_now().await;
    }

    #[tokio::test(start_paused = true)]
    async fn only_last_value_in_burst_runs() {
        let (seen, action) = recorder();
        let debouncer = Debouncer::new(Duration::from_millis(150), action);

        debouncer.schedule(1);
        settle(100).await;
        debouncer.schedule(2);
        settle(100).await;
        debouncer.schedule(3);

        assert!(seen.lock().unwrap().is_empty());
        assert!(debouncer.is_pending());

        settle(151).await;
        assert_eq!(*seen.lock().unwrap(), vec![3]);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_pending_value() {
        let (seen, action) = recorder();
        let debouncer = Debouncer::new(Duration::from_millis(50), action);

        debouncer.schedule(7);
        debouncer.cancel();
        settle(100).await;

        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn drop_aborts_pending_value() {
        let (seen, action) = recorder();
        {
            let debouncer = Debouncer::new(Duration::from_millis(50), action);
            debouncer.schedule(9);
        }
        settle(100).await;

        assert!(seen.lock().unwrap().is_empty());
    }
}
