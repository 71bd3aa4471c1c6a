#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dashboard session state.
//!
//! The chart settings store shared by every chart, the per-chart controls
//! that decide whether a chart follows it, and the timers behind debounced
//! price filtering and the initial-load transition. Timers run on the
//! ambient tokio runtime.

pub mod debounce;
pub mod initial_load;
pub mod price_range;
pub mod results;
pub mod settings;

pub use debounce::Debouncer;
pub use initial_load::InitialLoadGate;
pub use price_range::PriceRangeControl;
pub use results::ResultsWindow;
pub use settings::{ChartControls, ChartKind, ChartSettings, ChartSettingsStore, SettingOwner};
