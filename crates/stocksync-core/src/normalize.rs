//! Supplier price string normalization.

/// Reduces a human-formatted price to its whole-unit digits.
///
/// Everything from the first `.` onward is dropped (truncation, not
/// rounding), then every non-ASCII-digit character is removed, which strips
/// thousands separators, currency symbols and whitespace.
///
/// An empty result means "no price" and is not an error; callers decide
/// whether to skip the record.
///
/// ```
/// use stocksync_core::normalize_price;
///
/// assert_eq!(normalize_price("5'990.00 руб."), "5990");
/// assert_eq!(normalize_price("нет в наличии"), "");
/// ```
#[must_use]
pub fn normalize_price(raw: &str) -> String {
    let whole = raw.split('.').next().unwrap_or_default();
    whole.chars().filter(char::is_ascii_digit).collect()
}
