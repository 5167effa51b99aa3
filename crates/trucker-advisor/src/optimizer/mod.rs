mod pool;
mod ranking;
mod scoring;
mod selection;
mod stats;
pub mod views;

pub use pool::{cargo_pool, CargoPoolEntry};
pub use ranking::{location_ranking, rank_locations, sort_rankings};
pub use scoring::{base_score, decay_factor, effective_score};
pub use selection::{recommendations, select_trailers, Pick};
pub use stats::{trailer_statistics, PoolStatistics, TrailerStats};
pub use views::{LocationRanking, OptimizationResult, TrailerRecommendation};

use crate::reference::{LocationId, ReferenceIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// User-tunable knobs for one optimization run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptimizationOptions {
    /// 0 favours high-value jobs, 100 favours job variety.
    pub scoring_balance: i32,
    /// Garage slots to fill.
    pub max_trailers: u32,
    /// 0 allows unlimited duplicates, 100 pushes hardest towards variety.
    pub diminishing_factor: i32,
}

impl OptimizationOptions {
    pub const DEFAULT_SCORING_BALANCE: i32 = 50;
    pub const DEFAULT_MAX_TRAILERS: u32 = 10;
    pub const DEFAULT_DIMINISHING_FACTOR: i32 = 50;
    /// Largest garage accepted from configuration or callers.
    pub const MAX_TRAILERS_LIMIT: u32 = 500;
}

impl Default for OptimizationOptions {
    fn default() -> Self {
        Self {
            scoring_balance: Self::DEFAULT_SCORING_BALANCE,
            max_trailers: Self::DEFAULT_MAX_TRAILERS,
            diminishing_factor: Self::DEFAULT_DIMINISHING_FACTOR,
        }
    }
}

/// Recommend a trailer set for the garage at `location`.
///
/// Locations without any qualifying trailer (no company links, an empty cargo
/// pool, or nothing an ownable trailer can haul) yield an all-zero result.
pub fn optimize_location(
    index: &ReferenceIndex,
    location: LocationId,
    options: &OptimizationOptions,
) -> OptimizationResult {
    let pool = cargo_pool(index, location);
    let stats = trailer_statistics(index, &pool);

    if stats.is_empty() {
        return OptimizationResult::empty(location, *options);
    }

    let base_scores: Vec<f64> = stats
        .candidates
        .iter()
        .map(|trailer| base_score(trailer, options.scoring_balance))
        .collect();
    let picks = select_trailers(&stats.candidates, &base_scores, options);

    OptimizationResult {
        location_id: location,
        total_depots: total_depots(index, location),
        total_cargo_instances: stats.total_instances,
        total_value: round_half_up(stats.total_value * 100.0) / 100.0,
        recommendations: recommendations(&stats.candidates, &base_scores, &picks),
        options: *options,
    }
}

/// Depot instances at a location, counting each company once (last link wins).
fn total_depots(index: &ReferenceIndex, location: LocationId) -> u64 {
    let per_company: HashMap<_, _> = index
        .location_companies(location)
        .iter()
        .map(|link| (link.company_id, link.count))
        .collect();
    per_company.values().map(|&count| u64::from(count)).sum()
}

/// Round to the nearest integer, halves toward positive infinity
/// (unlike `f64::round`, -2.5 becomes -2).
pub(crate) fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_sends_halves_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-2.6), -3.0);
        assert_eq!(round_half_up(0.49), 0.0);
    }

    #[test]
    fn options_fill_missing_fields_with_defaults() {
        let options: OptimizationOptions =
            serde_json::from_str(r#"{"maxTrailers":3}"#).expect("options parse");
        assert_eq!(options.max_trailers, 3);
        assert_eq!(options.scoring_balance, 50);
        assert_eq!(options.diminishing_factor, 50);
    }
}
