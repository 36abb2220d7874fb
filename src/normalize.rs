//! Price and seat normalization.
//!
//! Dataset prices arrive as free-form strings: `"$12,000"`, `"€ 8.500"`,
//! `"$10,000-$20,000"`. These helpers turn them into model features. A parse
//! failure is an ordinary `Err`, never a panic.

use thiserror::Error;

/// Currency symbols stripped before parsing.
const CURRENCY_SYMBOLS: &[char] = &[
    '$', '€', '£', '¥', '₹', '₩', '₽', '₺', '₱', '₫', '₦', '₪', '฿', '₴', '₡',
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("value is empty")]
    Empty,

    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("'{0}' is not a valid low-high range")]
    MalformedRange(String),
}

/// Parse a price string into a single comparable value.
///
/// Strips currency symbols, commas, and whitespace. A single dash between two
/// numbers is read as a range and the midpoint is returned.
pub fn normalize_price(raw: &str) -> Result<f64, NormalizeError> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',' && !CURRENCY_SYMBOLS.contains(c))
        .map(|c| if matches!(c, '–' | '—') { '-' } else { c })
        .collect();

    if cleaned.is_empty() {
        return Err(NormalizeError::Empty);
    }
    // Plain numbers first: `1e-3` carries a dash that is not a separator.
    if let Some(value) = parse_finite(&cleaned) {
        return Ok(value);
    }

    // A leading dash is a sign, not a separator.
    let (sign, body) = match cleaned.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", cleaned.as_str()),
    };

    match body.split_once('-') {
        Some((low, high)) => {
            if low.is_empty() || high.is_empty() || high.contains('-') {
                return Err(NormalizeError::MalformedRange(raw.trim().to_string()));
            }
            let low = parse_finite(&format!("{sign}{low}"))
                .ok_or_else(|| NormalizeError::MalformedRange(raw.trim().to_string()))?;
            let high = parse_finite(high)
                .ok_or_else(|| NormalizeError::MalformedRange(raw.trim().to_string()))?;
            Ok((low + high) / 2.0)
        }
        None => Err(NormalizeError::NotANumber(raw.trim().to_string())),
    }
}

/// Parse a seat count. Plain float parse of the trimmed input.
pub fn normalize_seats(raw: &str) -> Result<f64, NormalizeError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(NormalizeError::Empty);
    }
    parse_finite(trimmed).ok_or_else(|| NormalizeError::NotANumber(trimmed.to_string()))
}

// `f64::from_str` accepts "inf" and "NaN"; neither is a usable feature.
fn parse_finite(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}
