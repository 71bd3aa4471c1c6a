//! Median price colour buckets for the suburb map.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Price band a suburb falls into.
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
pub enum PriceBucket {
    /// No price available.
    NoData,
    /// Up to $1M.
    Affordable,
    /// Above $1M.
    Moderate,
    /// Above $1.5M.
    Expensive,
    /// Above $2M.
    Premium,
}

impl PriceBucket {
    /// Buckets a median price. Thresholds are exclusive.
    #[must_use]
    pub fn of(price: Option<f64>) -> Self {
        match price {
            None => Self::NoData,
            Some(p) if p > 2_000_000.0 => Self::Premium,
            Some(p) if p > 1_500_000.0 => Self::Expensive,
            Some(p) if p > 1_000_000.0 => Self::Moderate,
            Some(_) => Self::Affordable,
        }
    }

    /// Hex fill colour.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::NoData => "#e5e7eb",
            Self::Affordable => "#10b981",
            Self::Moderate => "#fbbf24",
            Self::Expensive => "#f97316",
            Self::Premium => "#dc2626",
        }
    }
}

/// Hex fill colour for a median price.
#[must_use]
pub fn price_color(price: Option<f64>) -> &'static str {
    PriceBucket::of(price).color()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_thresholds_are_exclusive() {
        assert_eq!(price_color(None), "#e5e7eb");
        assert_eq!(price_color(Some(2_000_001.0)), "#dc2626");
        assert_eq!(price_color(Some(2_000_000.0)), "#f97316");
        assert_eq!(price_color(Some(1_500_000.0)), "#fbbf24");
        assert_eq!(price_color(Some(1_000_000.0)), "#10b981");
        assert_eq!(price_color(Some(0.0)), "#10b981");
    }

    #[test]
    fn bucket_names() {
        assert_eq!(PriceBucket::of(Some(3e6)).to_string(), "premium");
        assert_eq!("no_data".parse::<PriceBucket>().unwrap(), PriceBucket::NoData);
    }
}
