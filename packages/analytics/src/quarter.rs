//! Quarter labels, period cutoffs and range checks.
//!
//! "Current" always means the wall-clock quarter at call time. Each
//! function that depends on it has an `_at` variant taking the current
//! quarter explicitly.

use std::sync::LazyLock;

use chrono::{Datelike as _, Local, NaiveDate};
use regex::Regex;
use sydney_property_analytics_models::{QuarterDate, TimePeriod};

/// First year shown for [`TimePeriod::Max`] unless a caller overrides it.
pub const DEFAULT_START_YEAR: i32 = 2000;

static QUARTER_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Q([0-9])[[:space:]]+([0-9]+)$").expect("valid regex"));

/// Returns the quarter containing `date`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn quarter_of(date: NaiveDate) -> QuarterDate {
    QuarterDate::new(date.year(), (date.month0() / 3 + 1) as u8)
}

/// Returns the quarter containing today's local date.
#[must_use]
pub fn current_quarter() -> QuarterDate {
    quarter_of(Local::now().date_naive())
}

/// Computes the earliest quarter included by `period`.
///
/// `1yr`/`3yr`/`5yr` go back that many years from the current quarter,
/// keeping the quarter number; `max` starts at Q1 of `default_start_year`.
#[must_use]
pub fn calculate_cutoff_date(period: TimePeriod, default_start_year: i32) -> QuarterDate {
    calculate_cutoff_date_at(period, default_start_year, current_quarter())
}

/// [`calculate_cutoff_date`] relative to an explicit current quarter.
#[must_use]
pub const fn calculate_cutoff_date_at(
    period: TimePeriod,
    default_start_year: i32,
    current: QuarterDate,
) -> QuarterDate {
    match period.years() {
        Some(years) => QuarterDate::new(current.year - years, current.quarter),
        None => QuarterDate::new(default_start_year, 1),
    }
}

/// Returns whether a quarter falls inside the window starting at `cutoff`.
///
/// [`TimePeriod::Max`] includes everything.
#[must_use]
pub fn is_quarter_in_range(
    year: i32,
    quarter: u8,
    cutoff: QuarterDate,
    period: TimePeriod,
) -> bool {
    if period == TimePeriod::Max {
        return true;
    }
    year > cutoff.year || (year == cutoff.year && quarter >= cutoff.quarter)
}

/// Formats a quarter as `"Q{quarter} {year}"`.
#[must_use]
pub fn format_quarter_string(year: i32, quarter: u8) -> String {
    format!("Q{quarter} {year}")
}

/// Parses a label produced by [`format_quarter_string`].
///
/// Returns `None` when the label does not match the pattern, the quarter
/// is outside 1-4, or the year does not fit.
#[must_use]
pub fn parse_quarter_string(label: &str) -> Option<QuarterDate> {
    let captures = QUARTER_LABEL_RE.captures(label)?;
    let quarter: u8 = captures[1].parse().ok()?;
    let year: i32 = captures[2].parse().ok()?;

    if !(1..=4).contains(&quarter) {
        return None;
    }

    Some(QuarterDate::new(year, quarter))
}

/// Sorts quarter labels chronologically.
///
/// Unparseable labels sort first, keeping their relative order.
#[must_use]
pub fn sort_quarters(labels: &[String]) -> Vec<String> {
    let mut sorted = labels.to_vec();
    sorted.sort_by_cached_key(|label| parse_quarter_string(label));
    sorted
}

/// Keeps the labels inside the window starting at `cutoff`.
///
/// Unparseable labels are dropped unless `period` is `max`.
#[must_use]
pub fn filter_quarters_by_date_range(
    labels: &[String],
    cutoff: QuarterDate,
    period: TimePeriod,
) -> Vec<String> {
    if period == TimePeriod::Max {
        return labels.to_vec();
    }

    labels
        .iter()
        .filter(|label| {
            parse_quarter_string(label)
                .is_some_and(|q| is_quarter_in_range(q.year, q.quarter, cutoff, period))
        })
        .cloned()
        .collect()
}
