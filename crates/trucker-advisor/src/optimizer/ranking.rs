use super::views::LocationRanking;
use super::{optimize_location, round_half_up, OptimizationOptions};
use crate::reference::{Location, ReferenceIndex};
use std::cmp::Ordering;
use tracing::debug;

/// Profitability entry for one location, or `None` when it offers no jobs.
///
/// Each call only reads the shared index, so callers may evaluate locations
/// on separate threads and merge the results with [`sort_rankings`].
pub fn location_ranking(
    index: &ReferenceIndex,
    location: &Location,
    options: &OptimizationOptions,
) -> Option<LocationRanking> {
    let result = optimize_location(index, location.id, options);
    if result.total_cargo_instances == 0 {
        return None;
    }

    let jobs = result.total_cargo_instances;
    let value = result.total_value;
    // geometric mean of job count and total value
    let score = (jobs as f64 * value).sqrt();
    let avg_value_per_job = value / jobs as f64;

    Some(LocationRanking {
        id: location.id,
        name: location.name.clone(),
        country: location.country.clone(),
        depot_count: result.total_depots,
        jobs,
        total_value: round_half_up(value),
        avg_value_per_job: round_half_up(avg_value_per_job * 100.0) / 100.0,
        score: round_half_up(score * 10.0) / 10.0,
    })
}

/// Highest score first; equal scores keep their existing order.
pub fn sort_rankings(rankings: &mut [LocationRanking]) {
    rankings.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
}

/// Rank every location of the snapshot, skipping locations without jobs.
pub fn rank_locations(
    index: &ReferenceIndex,
    options: &OptimizationOptions,
) -> Vec<LocationRanking> {
    let mut rankings: Vec<LocationRanking> = index
        .locations()
        .iter()
        .filter_map(|location| location_ranking(index, location, options))
        .collect();
    sort_rankings(&mut rankings);

    debug!(
        ranked = rankings.len(),
        skipped = index.locations().len() - rankings.len(),
        "locations ranked"
    );
    rankings
}
