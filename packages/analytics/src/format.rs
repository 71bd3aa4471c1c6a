//! Display formatting for prices, percentages and sales counts.

use crate::guards::number;

/// Options for [`format_price_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceFormat {
    /// Decimal places for millions (`$1.25M`).
    pub decimals: usize,
    /// Render missing values as `"N/A"` instead of `"$0"`.
    pub show_na: bool,
}

impl Default for PriceFormat {
    fn default() -> Self {
        Self {
            decimals: 2,
            show_na: true,
        }
    }
}

/// Options for [`format_percentage_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PercentageFormat {
    pub decimals: usize,
    /// Prefix non-negative values with `+`.
    pub show_sign: bool,
    /// Render missing values as `"N/A"` instead of `"0%"`.
    pub show_na: bool,
}

impl Default for PercentageFormat {
    fn default() -> Self {
        Self {
            decimals: 1,
            show_sign: true,
            show_na: true,
        }
    }
}

/// Formats a price with default options (`$1.25M`, `$850K`, `$900`).
#[must_use]
pub fn format_price(price: Option<f64>) -> String {
    format_price_with(price, PriceFormat::default())
}

/// Formats a price as millions, thousands or whole dollars.
#[must_use]
pub fn format_price_with(price: Option<f64>, options: PriceFormat) -> String {
    let Some(price) = number(price) else {
        return if options.show_na { "N/A" } else { "$0" }.to_string();
    };

    if price >= 1_000_000.0 {
        format!("${:.*}M", options.decimals, price / 1_000_000.0)
    } else if price >= 1_000.0 {
        format!("${:.0}K", price / 1_000.0)
    } else {
        format!("${price:.0}")
    }
}

/// Formats a percentage with default options (`+5.2%`).
#[must_use]
pub fn format_percentage(value: Option<f64>) -> String {
    format_percentage_with(value, PercentageFormat::default())
}

/// Formats a percentage with a configurable sign and precision.
#[must_use]
pub fn format_percentage_with(value: Option<f64>, options: PercentageFormat) -> String {
    let Some(value) = number(value) else {
        return if options.show_na { "N/A" } else { "0%" }.to_string();
    };

    let sign = if options.show_sign && value >= 0.0 { "+" } else { "" };
    format!("{sign}{value:.*}%", options.decimals)
}

/// Formats a count with thousands separators (`12,345`). Fractions keep
/// up to three digits.
#[must_use]
pub fn format_sales(value: Option<f64>) -> String {
    let Some(value) = number(value) else {
        return "N/A".to_string();
    };

    let rounded = format!("{:.3}", value.abs());
    let (whole, fraction) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');

    let mut out = String::new();
    if value < 0.0 && rounded.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    out.push_str(&group_thousands(whole));
    if !fraction.is_empty() {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

/// Formats a day count such as contract-to-settlement days (`42 days`).
#[must_use]
pub fn format_days(value: Option<f64>) -> String {
    number(value).map_or_else(|| "N/A".to_string(), |days| format!("{days:.0} days"))
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_prices_by_magnitude() {
        assert_eq!(format_price(Some(1_250_000.0)), "$1.25M");
        assert_eq!(format_price(Some(850_400.0)), "$850K");
        assert_eq!(format_price(Some(999.0)), "$999");
        assert_eq!(format_price(None), "N/A");
        assert_eq!(
            format_price_with(None, PriceFormat { decimals: 2, show_na: false }),
            "$0"
        );
        assert_eq!(
            format_price_with(Some(3_400_000.0), PriceFormat { decimals: 1, show_na: true }),
            "$3.4M"
        );
    }

    #[test]
    fn formats_percentages() {
        assert_eq!(format_percentage(Some(5.26)), "+5.3%");
        assert_eq!(format_percentage(Some(-2.0)), "-2.0%");
        assert_eq!(format_percentage(Some(0.0)), "+0.0%");
        assert_eq!(format_percentage(None), "N/A");
        assert_eq!(
            format_percentage_with(
                Some(12.345),
                PercentageFormat { decimals: 2, show_sign: false, show_na: true }
            ),
            "12.35%"
        );
        assert_eq!(
            format_percentage_with(
                None,
                PercentageFormat { decimals: 1, show_sign: true, show_na: false }
            ),
            "0%"
        );
    }

    #[test]
    fn formats_sales_with_separators() {
        assert_eq!(format_sales(Some(0.0)), "0");
        assert_eq!(format_sales(Some(999.0)), "999");
        assert_eq!(format_sales(Some(1_000.0)), "1,000");
        assert_eq!(format_sales(Some(1_234_567.0)), "1,234,567");
        assert_eq!(format_sales(Some(1_234.5)), "1,234.5");
        assert_eq!(format_sales(Some(-4_200.0)), "-4,200");
        assert_eq!(format_sales(None), "N/A");
    }

    #[test]
    fn formats_days_rounded() {
        assert_eq!(format_days(Some(42.0)), "42 days");
        assert_eq!(format_days(Some(41.6)), "42 days");
        assert_eq!(format_days(Some(0.2)), "0 days");
        assert_eq!(format_days(None), "N/A");
        assert_eq!(format_days(Some(f64::NAN)), "N/A");
    }
}
