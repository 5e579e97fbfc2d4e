//! Numeric conversion and formatting helpers centralizing safe casts.

use num_traits::cast::cast;

/// Convert a count to f64, returning 0.0 if it cannot be represented.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

/// Convert i64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn i64_to_f64(value: i64) -> f64 {
    cast::<i64, f64>(value).unwrap_or(0.0)
}

/// Percentage of `part` in `whole`, 0.0 when `whole` is zero.
#[must_use]
pub fn ratio_pct(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    usize_to_f64(part) / usize_to_f64(whole) * 100.0
}

/// Mean of the values, 0.0 for an empty slice.
#[must_use]
pub fn mean_i64(values: &[i64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().copied().map(i64_to_f64).sum::<f64>() / usize_to_f64(values.len())
}

/// Digits of `value.abs()` grouped with commas, e.g. `1234567` -> `1,234,567`.
#[must_use]
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Signed dollar label: `+$1,234` or `-$56`.
#[must_use]
pub fn signed_dollars(value: i64) -> String {
    let sign = if value >= 0 { '+' } else { '-' };
    format!("{sign}${}", group_thousands(value))
}
