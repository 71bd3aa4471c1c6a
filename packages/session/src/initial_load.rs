//! Tracks when the dashboard's first render has everything it needs.

use std::{sync::Arc, time::Duration};

use tokio::sync::watch;

use crate::Debouncer;

/// Settle time after both data sets arrive before leaving the initial load.
pub const INITIAL_LOAD_SETTLE: Duration = Duration::from_millis(100);

/// Flips from "initial load" to "loaded" once suburb summaries and boundary
/// data are both present and have stayed present for
/// [`INITIAL_LOAD_SETTLE`]. The transition happens once.
#[derive(Debug)]
pub struct InitialLoadGate {
    loaded: Arc<watch::Sender<bool>>,
    summaries_ready: bool,
    boundaries_ready: bool,
    timer: Debouncer<()>,
}

impl Default for InitialLoadGate {
    fn default() -> Self {
        Self::new()
    }
}

impl InitialLoadGate {
    #[must_use]
    pub fn new() -> Self {
        let loaded = Arc::new(watch::Sender::new(false));
        let flag = Arc::clone(&loaded);
        let timer = Debouncer::new(INITIAL_LOAD_SETTLE, move |()| {
            if !flag.send_replace(true) {
                log::debug!("Initial load complete");
            }
        });

        Self {
            loaded,
            summaries_ready: false,
            boundaries_ready: false,
            timer,
        }
    }

    /// Reports how many suburb summaries are loaded. Zero counts as absent.
    pub fn set_summary_count(&mut self, count: usize) {
        self.summaries_ready = count > 0;
        self.rearm();
    }

    /// Reports whether boundary data is loaded.
    pub fn set_boundaries_loaded(&mut self, loaded: bool) {
        self.boundaries_ready = loaded;
        self.rearm();
    }

    fn rearm(&self) {
        self.timer.cancel();
        if self.is_initial_load() && self.summaries_ready && self.boundaries_ready {
            self.timer.schedule(());
        }
    }

    #[must_use]
    pub fn is_initial_load(&self) -> bool {
        !*self.loaded.borrow()
    }

    /// Resolves once the initial load has completed.
    pub async fn wait_loaded(&self) {
        let mut rx = self.loaded.subscribe();
        rx.wait_for(|loaded| *loaded).await.ok();
    }
}
