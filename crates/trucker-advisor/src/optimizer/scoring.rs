use super::stats::TrailerStats;

/// Convex combination of normalized value and coverage.
///
/// `scoring_balance` 0 scores on value only, 100 on coverage only. Values
/// outside 0..=100 are not clamped and extrapolate linearly.
pub fn base_score(trailer: &TrailerStats, scoring_balance: i32) -> f64 {
    let balance = f64::from(scoring_balance);
    let value_weight = (100.0 - balance) / 100.0;
    let coverage_weight = balance / 100.0;
    value_weight * trailer.normalized_value + coverage_weight * trailer.coverage
}

/// Per-pick decay base for a trailer.
///
/// At strength 0 every trailer keeps a factor of 1.0. At strength 100 the
/// factor runs from 0.5 for zero coverage up to 1.0 for full coverage, so
/// broadly useful trailers lose priority more slowly.
pub fn decay_factor(trailer: &TrailerStats, diminishing_factor: i32) -> f64 {
    let strength = f64::from(diminishing_factor) / 100.0;
    let min_factor = 1.0 - 0.5 * strength;
    let coverage_bonus = trailer.coverage * 0.5 * strength;
    min_factor + coverage_bonus
}

/// Score of a trailer that has already been picked `picks` times.
pub fn effective_score(base: f64, factor: f64, picks: u32) -> f64 {
    base * factor.powf(f64::from(picks))
}
