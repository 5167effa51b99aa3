use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use trucker_advisor::error::AppError;
use trucker_advisor::optimizer::{rank_locations, LocationRanking, OptimizationOptions};
use trucker_advisor::reference::{LocationId, ReferenceData, ReferenceIndex, SnapshotInfo};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) index: Arc<ReferenceIndex>,
    pub(crate) snapshot: Arc<SnapshotInfo>,
    pub(crate) defaults: OptimizationOptions,
}

/// Read the snapshot in `dir` and build the shared index.
pub(crate) fn load_snapshot(dir: &Path) -> Result<(Arc<ReferenceIndex>, SnapshotInfo), AppError> {
    let data = ReferenceData::from_dir(dir)?;
    let snapshot = SnapshotInfo::describe(&data, dir);
    Ok((Arc::new(data.index()), snapshot))
}

/// Overlay caller-supplied options on the configured defaults.
pub(crate) fn resolve_options(
    defaults: OptimizationOptions,
    max_trailers: Option<u32>,
    scoring_balance: Option<i32>,
    diminishing_factor: Option<i32>,
) -> Result<OptimizationOptions, AppError> {
    let options = OptimizationOptions {
        scoring_balance: scoring_balance.unwrap_or(defaults.scoring_balance),
        max_trailers: max_trailers.unwrap_or(defaults.max_trailers),
        diminishing_factor: diminishing_factor.unwrap_or(defaults.diminishing_factor),
    };

    let limit = OptimizationOptions::MAX_TRAILERS_LIMIT;
    if !(1..=limit).contains(&options.max_trailers) {
        return Err(AppError::InvalidRequest(format!(
            "max trailers must be between 1 and {limit}, got {}",
            options.max_trailers
        )));
    }

    Ok(options)
}

/// Where a location places among every ranked location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct RankPosition {
    pub(crate) rank: usize,
    pub(crate) total: usize,
}

/// `None` when the location offers no jobs and so is not ranked.
pub(crate) fn rank_position(
    index: &ReferenceIndex,
    location: LocationId,
    options: &OptimizationOptions,
) -> Option<RankPosition> {
    let rankings = rank_locations(index, options);
    rankings
        .iter()
        .position(|entry| entry.id == location)
        .map(|position| RankPosition {
            rank: position + 1,
            total: rankings.len(),
        })
}

/// Ranking entry annotated with its position in the full ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct RankedLocation {
    pub(crate) rank: usize,
    #[serde(flatten)]
    pub(crate) ranking: LocationRanking,
}

/// Presentation-side narrowing of a ranking list.
#[derive(Debug, Clone, Default)]
pub(crate) struct RankingFilter {
    /// Case-insensitive country names; empty keeps every country.
    pub(crate) countries: Vec<String>,
    /// Case-insensitive substring of the location or country name.
    pub(crate) search: Option<String>,
    pub(crate) limit: Option<usize>,
}

impl RankingFilter {
    pub(crate) fn apply(&self, rankings: Vec<LocationRanking>) -> Vec<RankedLocation> {
        let search = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|needle| !needle.is_empty())
            .map(str::to_lowercase);

        rankings
            .into_iter()
            .enumerate()
            .map(|(position, ranking)| RankedLocation {
                rank: position + 1,
                ranking,
            })
            .filter(|entry| self.matches_country(&entry.ranking.country))
            .filter(|entry| match &search {
                Some(needle) => {
                    entry.ranking.name.to_lowercase().contains(needle)
                        || entry.ranking.country.to_lowercase().contains(needle)
                }
                None => true,
            })
            .take(self.limit.unwrap_or(usize::MAX))
            .collect()
    }

    fn matches_country(&self, country: &str) -> bool {
        self.countries.is_empty()
            || self
                .countries
                .iter()
                .any(|wanted| wanted.trim().eq_ignore_ascii_case(country))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranking(id: u32, name: &str, country: &str, score: f64) -> LocationRanking {
        LocationRanking {
            id: LocationId(id),
            name: name.to_string(),
            country: country.to_string(),
            depot_count: 1,
            jobs: 1,
            total_value: 1.0,
            avg_value_per_job: 1.0,
            score,
        }
    }

    fn sample() -> Vec<LocationRanking> {
        vec![
            ranking(1, "Berlin", "Germany", 30.0),
            ranking(2, "Paris", "France", 20.0),
            ranking(3, "Hamburg", "Germany", 10.0),
        ]
    }

    #[test]
    fn filters_keep_unfiltered_rank() {
        let filter = RankingFilter {
            countries: vec!["germany".to_string()],
            ..RankingFilter::default()
        };
        let ranked = filter.apply(sample());
        let ranks: Vec<_> = ranked.iter().map(|entry| entry.rank).collect();
        assert_eq!(ranks, vec![1, 3]);
    }

    #[test]
    fn search_matches_name_or_country() {
        let filter = RankingFilter {
            search: Some(" FRAN ".to_string()),
            ..RankingFilter::default()
        };
        let ranked = filter.apply(sample());
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].ranking.name, "Paris");
        assert_eq!(ranked[0].rank, 2);

        let blank = RankingFilter {
            search: Some("  ".to_string()),
            limit: Some(2),
            ..RankingFilter::default()
        };
        assert_eq!(blank.apply(sample()).len(), 2);
    }

    #[test]
    fn rank_position_counts_only_ranked_locations() {
        let fixture = concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../../crates/trucker-advisor/tests/fixtures/europe"
        );
        let (index, _) = load_snapshot(Path::new(fixture)).expect("fixture loads");
        let options = OptimizationOptions::default();

        assert_eq!(
            rank_position(&index, LocationId(2), &options),
            Some(RankPosition { rank: 2, total: 2 })
        );
        assert_eq!(rank_position(&index, LocationId(3), &options), None);
    }

    #[test]
    fn options_fall_back_to_defaults() {
        let defaults = OptimizationOptions::default();
        let options = resolve_options(defaults, None, Some(80), None).expect("options resolve");
        assert_eq!(options.scoring_balance, 80);
        assert_eq!(options.max_trailers, 10);
        assert_eq!(options.diminishing_factor, 50);
    }

    #[test]
    fn rejects_empty_or_oversized_garages() {
        let defaults = OptimizationOptions::default();
        assert!(matches!(
            resolve_options(defaults, Some(0), None, None),
            Err(AppError::InvalidRequest(_))
        ));
        let limit = OptimizationOptions::MAX_TRAILERS_LIMIT;
        assert!(resolve_options(defaults, Some(limit + 1), None, None).is_err());
        assert!(resolve_options(defaults, Some(limit), None, None).is_ok());
    }
}
