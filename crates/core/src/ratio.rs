//! Rounding and zero-guarded ratio helpers used by every derived metric.

/// Round `value` to `places` decimal places (half away from zero).
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// `part / whole * 100`, rounded to one decimal. A zero `whole` yields 0.
pub fn percent_of(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    round_to(part / whole * 100.0, 1)
}

/// `numerator / denominator`, rounded to two decimals. A zero denominator yields 0.
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    round_to(numerator / denominator, 2)
}
