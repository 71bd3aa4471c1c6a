#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Derived metrics for suburb property analytics.
//!
//! Everything here is a pure function over records already fetched from
//! the backend: combining house and unit analytics, merging quarterly
//! series, growth calculations over quarter windows, summary rollups and
//! the reshaping of series into chart rows. Functions that depend on "now"
//! read the wall-clock quarter and have an `_at` variant taking it
//! explicitly.

pub mod aggregate;
pub mod chart;
pub mod filters;
pub mod format;
pub mod growth;
pub mod guards;
pub mod merge;
pub mod quarter;
pub mod summary;

pub use aggregate::aggregate_analytics;
pub use merge::{combine_quarterly, merge_quarterly_data};
pub use summary::summarize_by_suburb;
