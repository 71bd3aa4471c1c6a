//! Debounced price range filter.
//!
//! The slider value updates immediately while the committed range only
//! changes after the user stops dragging.

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use sydney_property_analytics::filters::PriceRange;

use crate::Debouncer;

/// Quiet period before a slider change is committed.
pub const PRICE_RANGE_DEBOUNCE: Duration = Duration::from_millis(150);

/// Local slider state plus the last range handed to the commit callback.
#[derive(Debug)]
pub struct PriceRangeControl {
    local: PriceRange,
    last_sent: Arc<Mutex<PriceRange>>,
    debouncer: Debouncer<PriceRange>,
}

impl PriceRangeControl {
    /// `on_commit` receives each range that survives the debounce.
    pub fn new(initial: PriceRange, on_commit: impl Fn(PriceRange) + Send + Sync + 'static) -> Self {
        Self::with_delay(initial, PRICE_RANGE_DEBOUNCE, on_commit)
    }

    pub fn with_delay(
        initial: PriceRange,
        delay: Duration,
        on_commit: impl Fn(PriceRange) + Send + Sync + 'static,
    ) -> Self {
        let last_sent = Arc::new(Mutex::new(initial));
        let sent = Arc::clone(&last_sent);
        let debouncer = Debouncer::new(delay, move |range: PriceRange| {
            *sent.lock().unwrap_or_else(PoisonError::into_inner) = range;
            log::debug!("Committing price range {}..{}", range.min, range.max);
            on_commit(range);
        });

        Self {
            local: initial,
            last_sent,
            debouncer,
        }
    }

    /// Range currently shown on the slider.
    #[must_use]
    pub const fn local(&self) -> PriceRange {
        self.local
    }

    /// Range most recently committed or pushed in from outside.
    #[must_use]
    pub fn last_sent(&self) -> PriceRange {
        *self.last_sent.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether a slider change is waiting to be committed.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Records a slider movement. Moving back to the last committed range
    /// cancels the pending commit.
    ///
    /// Must be called from within a tokio runtime.
    pub fn set_local(&mut self, range: PriceRange) {
        self.local = range;
        if range == self.last_sent() {
            self.debouncer.cancel();
            return;
        }
        self.debouncer.schedule(range);
    }

    /// Applies a range set elsewhere, such as a filter reset. Ranges equal to
    /// the last one sent are echoes of our own commits and are ignored.
    pub fn sync_external(&mut self, range: PriceRange) {
        let mut last_sent = self.last_sent.lock().unwrap_or_else(PoisonError::into_inner);
        if range == *last_sent {
            return;
        }
        *last_sent = range;
        drop(last_sent);

        self.local = range;
        self.debouncer.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn control() -> (PriceRangeControl, Arc<Mutex<Vec<PriceRange>>>) {
        let commits = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&commits);
        let control = PriceRangeControl::new(PriceRange::default(), move |range| {
            sink.lock().unwrap().push(range);
        });
        (control, commits)
    }

    async fn settle(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        tokio::task::yield_now().await;
    }

    #[tokio::test(start_paused = true)]
    async fn commits_last_value_after_quiet_period() {
        let (mut control, commits) = control();

        control.set_local(PriceRange::new(500_000.0, 35_000_000.0));
        settle(50).await;
        control.set_local(PriceRange::new(750_000.0, 35_000_000.0));
        assert_eq!(control.local(), PriceRange::new(750_000.0, 35_000_000.0));

        settle(100).await;
        assert!(commits.lock().unwrap().is_empty());

        settle(60).await;
        assert_eq!(
            *commits.lock().unwrap(),
            vec![PriceRange::new(750_000.0, 35_000_000.0)]
        );
        assert_eq!(control.last_sent(), PriceRange::new(750_000.0, 35_000_000.0));
    }

    #[tokio::test(start_paused = true)]
    async fn returning_to_last_sent_cancels_commit() {
        let (mut control, commits) = control();

        control.set_local(PriceRange::new(1.0, 2.0));
        control.set_local(PriceRange::default());
        assert!(!control.is_pending());

        settle(200).await;
        assert!(commits.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn external_change_replaces_local_without_commit() {
        let (mut control, commits) = control();

        control.set_local(PriceRange::new(1.0, 2.0));
        control.sync_external(PriceRange::new(0.0, 1_000_000.0));

        assert_eq!(control.local(), PriceRange::new(0.0, 1_000_000.0));
        assert_eq!(control.last_sent(), PriceRange::new(0.0, 1_000_000.0));

        settle(200).await;
        assert!(commits.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn echo_of_own_commit_is_ignored() {
        let (mut control, commits) = control();

        control.set_local(PriceRange::new(100.0, 200.0));
        settle(151).await;
        control.set_local(PriceRange::new(100.0, 300.0));
        control.sync_external(PriceRange::new(100.0, 200.0));

        assert_eq!(control.local(), PriceRange::new(100.0, 300.0));
        settle(151).await;
        assert_eq!(commits.lock().unwrap().len(), 2);
    }
}
