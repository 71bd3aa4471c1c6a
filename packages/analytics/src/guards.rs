//! Numeric validity predicates shared by formatting, filtering and charts.
//!
//! Non-finite values (`NaN`, infinities) are never valid.

/// Returns the value if it is present and finite.
#[must_use]
pub fn number(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Returns whether the value is present and finite.
#[must_use]
pub fn is_number(value: Option<f64>) -> bool {
    number(value).is_some()
}

/// Returns whether the value is a usable price (finite, non-negative).
#[must_use]
pub fn is_valid_price(value: Option<f64>) -> bool {
    number(value).is_some_and(|v| v >= 0.0)
}

/// Returns whether the value is a usable sales count.
#[must_use]
pub fn is_valid_sales(value: Option<f64>) -> bool {
    number(value).is_some_and(|v| v >= 0.0)
}

/// Returns whether the value is a usable percentage. Negative values are
/// valid.
#[must_use]
pub fn is_valid_percentage(value: Option<f64>) -> bool {
    is_number(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_missing_and_non_finite() {
        assert!(!is_number(None));
        assert!(!is_number(Some(f64::NAN)));
        assert!(!is_valid_price(Some(f64::INFINITY)));
        assert!(is_number(Some(0.0)));
    }

    #[test]
    fn prices_and_sales_must_be_non_negative() {
        assert!(is_valid_price(Some(0.0)));
        assert!(is_valid_price(Some(1_250_000.0)));
        assert!(!is_valid_price(Some(-1.0)));
        assert!(is_valid_sales(Some(12.0)));
        assert!(!is_valid_sales(Some(-3.0)));
    }

    #[test]
    fn percentages_may_be_negative() {
        assert!(is_valid_percentage(Some(-12.5)));
        assert!(!is_valid_percentage(None));
    }
}
