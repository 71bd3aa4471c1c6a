//! Chart settings shared across a session.
//!
//! When sync is enabled every chart reads and writes the global time period
//! and smoothing flag. When it is disabled each chart keeps its own values,
//! starting from whatever the globals were at the moment sync was turned
//! off.

use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use sydney_property_analytics_models::TimePeriod;

/// Global chart settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSettings {
    /// Whether charts follow the global settings. Off by default.
    pub sync_enabled: bool,
    /// Defaults to [`TimePeriod::Max`].
    pub global_time_period: TimePeriod,
    pub global_use_smoothed: bool,
}

#[derive(Debug, Default)]
struct StoreState {
    settings: ChartSettings,
    /// Incremented every time sync is switched off.
    detach_epoch: u64,
    /// Globals captured when sync was last switched off.
    detached: ChartSettings,
}

/// Shared handle to the session's [`ChartSettings`]. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct ChartSettingsStore {
    state: Arc<RwLock<StoreState>>,
}

impl ChartSettingsStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read<R>(&self, f: impl FnOnce(&StoreState) -> R) -> R {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    fn write(&self, f: impl FnOnce(&mut StoreState)) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut state);
    }

    /// Current settings.
    #[must_use]
    pub fn snapshot(&self) -> ChartSettings {
        self.read(|s| s.settings)
    }

    #[must_use]
    pub fn sync_enabled(&self) -> bool {
        self.read(|s| s.settings.sync_enabled)
    }

    pub fn set_sync_enabled(&self, enabled: bool) {
        self.write(|s| {
            if s.settings.sync_enabled && !enabled {
                s.detach_epoch += 1;
                s.detached = s.settings;
            }
            s.settings.sync_enabled = enabled;
        });
        log::debug!("Chart sync {}", if enabled { "enabled" } else { "disabled" });
    }

    pub fn set_global_time_period(&self, period: TimePeriod) {
        self.write(|s| s.settings.global_time_period = period);
    }

    pub fn set_global_use_smoothed(&self, enabled: bool) {
        self.write(|s| s.settings.global_use_smoothed = enabled);
    }

    fn detach_epoch(&self) -> u64 {
        self.read(|s| s.detach_epoch)
    }
}

/// Charts with their own default time period.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChartKind {
    /// Multi-suburb price or sales lines.
    TimeSeries,
    /// Quarterly sales bars.
    SalesPerQuarter,
    /// Sales growth bars per suburb.
    SalesGrowth,
}

impl ChartKind {
    /// Time period a chart starts with when not synced.
    #[must_use]
    pub const fn default_time_period(self) -> TimePeriod {
        match self {
            Self::TimeSeries => TimePeriod::Max,
            Self::SalesPerQuarter => TimePeriod::OneYear,
            Self::SalesGrowth => TimePeriod::FiveYears,
        }
    }
}

/// Which state absorbed a settings change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingOwner {
    /// The caller controls this value; nothing was stored.
    External,
    /// Written to the shared store.
    Global,
    /// Written to the chart's own state.
    Local,
}

/// One chart's view of the settings.
#[derive(Debug, Clone)]
pub struct ChartControls {
    store: ChartSettingsStore,
    local_time_period: TimePeriod,
    local_use_smoothed: bool,
    external_use_smoothed: Option<bool>,
    seen_epoch: u64,
}

impl ChartControls {
    #[must_use]
    pub fn new(store: ChartSettingsStore, kind: ChartKind) -> Self {
        let seen_epoch = store.detach_epoch();
        Self {
            store,
            local_time_period: kind.default_time_period(),
            local_use_smoothed: false,
            external_use_smoothed: None,
            seen_epoch,
        }
    }

    /// Hands control of the smoothing flag to the caller. While set, the
    /// external value wins over both global and local state.
    #[must_use]
    pub const fn with_external_smoothing(mut self, use_smoothed: bool) -> Self {
        self.external_use_smoothed = Some(use_smoothed);
        self
    }

    /// Updates the externally controlled smoothing value, or releases
    /// control with `None`.
    pub const fn set_external_smoothing(&mut self, use_smoothed: Option<bool>) {
        self.external_use_smoothed = use_smoothed;
    }

    /// Local values, taking the detached globals if sync was switched off
    /// since this chart last wrote.
    fn locals(&self) -> (TimePeriod, bool) {
        let epoch = self.store.detach_epoch();
        if epoch == self.seen_epoch {
            return (self.local_time_period, self.local_use_smoothed);
        }
        let detached = self.store.read(|s| s.detached);
        (detached.global_time_period, detached.global_use_smoothed)
    }

    fn materialize_locals(&mut self) {
        let (period, smoothed) = self.locals();
        self.local_time_period = period;
        self.local_use_smoothed = smoothed;
        self.seen_epoch = self.store.detach_epoch();
    }

    /// Effective time period.
    #[must_use]
    pub fn time_period(&self) -> TimePeriod {
        let settings = self.store.snapshot();
        if settings.sync_enabled {
            settings.global_time_period
        } else {
            self.locals().0
        }
    }

    /// Effective smoothing flag.
    #[must_use]
    pub fn use_smoothed(&self) -> bool {
        if let Some(external) = self.external_use_smoothed {
            return external;
        }
        let settings = self.store.snapshot();
        if settings.sync_enabled {
            settings.global_use_smoothed
        } else {
            self.locals().1
        }
    }

    /// Changes the time period for this chart, or for every chart when
    /// synced.
    pub fn set_time_period(&mut self, period: TimePeriod) -> SettingOwner {
        if self.store.sync_enabled() {
            self.store.set_global_time_period(period);
            return SettingOwner::Global;
        }
        self.materialize_locals();
        self.local_time_period = period;
        SettingOwner::Local
    }

    /// Changes the smoothing flag. Externally controlled charts store
    /// nothing and report [`SettingOwner::External`] so the caller can
    /// apply the change itself.
    pub fn set_use_smoothed(&mut self, enabled: bool) -> SettingOwner {
        if self.external_use_smoothed.is_some() {
            return SettingOwner::External;
        }
        if self.store.sync_enabled() {
            self.store.set_global_use_smoothed(enabled);
            return SettingOwner::Global;
        }
        self.materialize_locals();
        self.local_use_smoothed = enabled;
        SettingOwner::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_defaults() {
        let store = ChartSettingsStore::new();
        assert_eq!(
            store.snapshot(),
            ChartSettings {
                sync_enabled: false,
                global_time_period: TimePeriod::Max,
                global_use_smoothed: false,
            }
        );
    }

    #[test]
    fn unsynced_charts_are_independent() {
        let store = ChartSettingsStore::new();
        let mut sales = ChartControls::new(store.clone(), ChartKind::SalesPerQuarter);
        let growth = ChartControls::new(store.clone(), ChartKind::SalesGrowth);

        assert_eq!(sales.time_period(), TimePeriod::OneYear);
        assert_eq!(growth.time_period(), TimePeriod::FiveYears);

        assert_eq!(sales.set_time_period(TimePeriod::ThreeYears), SettingOwner::Local);
        assert_eq!(sales.time_period(), TimePeriod::ThreeYears);
        assert_eq!(growth.time_period(), TimePeriod::FiveYears);
        assert_eq!(store.snapshot().global_time_period, TimePeriod::Max);
    }

    #[test]
    fn synced_charts_share_globals() {
        let store = ChartSettingsStore::new();
        let mut a = ChartControls::new(store.clone(), ChartKind::TimeSeries);
        let b = ChartControls::new(store.clone(), ChartKind::SalesGrowth);

        store.set_sync_enabled(true);
        assert_eq!(b.time_period(), TimePeriod::Max);

        assert_eq!(a.set_time_period(TimePeriod::OneYear), SettingOwner::Global);
        assert_eq!(a.set_use_smoothed(true), SettingOwner::Global);
        assert_eq!(b.time_period(), TimePeriod::OneYear);
        assert!(b.use_smoothed());
    }

    #[test]
    fn disabling_sync_keeps_last_global_values() {
        let store = ChartSettingsStore::new();
        let mut chart = ChartControls::new(store.clone(), ChartKind::SalesGrowth);

        store.set_sync_enabled(true);
        store.set_global_time_period(TimePeriod::ThreeYears);
        store.set_sync_enabled(false);
        store.set_global_time_period(TimePeriod::OneYear);

        assert_eq!(chart.time_period(), TimePeriod::ThreeYears);

        chart.set_use_smoothed(true);
        assert_eq!(chart.time_period(), TimePeriod::ThreeYears);
        assert!(chart.use_smoothed());

        let fresh = ChartControls::new(store, ChartKind::SalesGrowth);
        assert_eq!(fresh.time_period(), TimePeriod::FiveYears);
    }

    #[test]
    fn external_smoothing_wins() {
        let store = ChartSettingsStore::new();
        store.set_sync_enabled(true);
        store.set_global_use_smoothed(true);

        let mut chart =
            ChartControls::new(store.clone(), ChartKind::TimeSeries).with_external_smoothing(false);
        assert!(!chart.use_smoothed());
        assert_eq!(chart.set_use_smoothed(true), SettingOwner::External);
        assert!(!chart.use_smoothed());
        assert!(store.snapshot().global_use_smoothed);

        chart.set_external_smoothing(None);
        assert!(chart.use_smoothed());
    }

    #[test]
    fn chart_kind_names() {
        assert_eq!(ChartKind::SalesPerQuarter.to_string(), "sales_per_quarter");
        assert_eq!("time_series".parse::<ChartKind>().unwrap(), ChartKind::TimeSeries);
    }
}
