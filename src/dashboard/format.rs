//! Number formatting shared by the stat cards and feed cards.
//!
//! Rounding is half away from zero throughout (`8512.5 → 8513`), applied to
//! the value before it is printed so that the printed digits never depend on
//! the formatter's own tie-breaking.

#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

/// Round `value` to `decimals` places, ties away from zero.
#[must_use]
pub fn round_half_away(value: f64, decimals: u32) -> f64 {
    let scale = 10_f64.powi(decimals as i32);
    (value * scale).round() / scale
}

/// Fixed number of decimals, e.g. `fixed(340.5, 1) == "340.5"`.
#[must_use]
pub fn fixed(value: f64, decimals: usize) -> String {
    let rounded = round_half_away(value, decimals as u32);
    format!("{:.*}", decimals, normalize_zero(rounded))
}

/// Shortest decimal form: `4.0 → "4"`, `2.5 → "2.5"`.
#[must_use]
pub fn shortest(value: f64) -> String {
    normalize_zero(value).to_string()
}

/// `1234567 → "1,234,567"`.
#[must_use]
pub fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `-0.0` prints as `-0`; the dashboard never wants that.
fn normalize_zero(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}
