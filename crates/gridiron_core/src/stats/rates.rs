//! Derived rates and averages.
//!
//! Every ratio here is computed from current aggregate totals only and
//! yields 0 (never NaN or infinity) when the denominator is 0.

/// `numerator / denominator`, or 0 when the denominator is not positive.
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Percentage form of [`ratio`].
pub fn pct(numerator: f64, denominator: f64) -> f64 {
    ratio(numerator, denominator) * 100.0
}

/// Bounded four-factor passer rating.
///
/// Each factor is clamped to [0, 2.375]; the rating is defined only when
/// at least one pass was attempted and is 0 otherwise.
pub fn passer_rating(
    completions: u32,
    attempts: u32,
    yards: i32,
    touchdowns: u32,
    interceptions: u32,
) -> f64 {
    if attempts == 0 {
        return 0.0;
    }
    let att = attempts as f64;
    let a = ((completions as f64 / att - 0.3) * 5.0).clamp(0.0, 2.375);
    let b = ((yards as f64 / att - 3.0) * 0.25).clamp(0.0, 2.375);
    let c = (touchdowns as f64 / att * 20.0).clamp(0.0, 2.375);
    let d = (2.375 - interceptions as f64 / att * 25.0).clamp(0.0, 2.375);
    (a + b + c + d) / 6.0 * 100.0
}
