use super::pool::CargoPoolEntry;
use crate::reference::{ReferenceIndex, TrailerId};
use std::collections::HashSet;

const TOP_CARGO_LIMIT: usize = 5;

/// Coverage and value figures for one candidate trailer at one location.
#[derive(Debug, Clone, PartialEq)]
pub struct TrailerStats {
    pub id: TrailerId,
    pub name: String,
    pub job_count: u64,
    pub total_value: f64,
    pub avg_value: f64,
    /// Share of the location's cargo instances this trailer can haul, 0..=1.
    pub coverage: f64,
    /// `avg_value` relative to the best candidate, floored divisor of 1.
    pub normalized_value: f64,
    pub top_cargoes: Vec<String>,
}

/// Candidate trailers plus pool totals for one location.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoolStatistics {
    pub candidates: Vec<TrailerStats>,
    pub total_instances: u64,
    pub total_value: f64,
}

impl PoolStatistics {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Aggregate the pool per ownable trailer, in trailer table order.
///
/// Trailers that cannot haul anything in the pool are left out entirely.
pub fn trailer_statistics(index: &ReferenceIndex, pool: &[CargoPoolEntry]) -> PoolStatistics {
    let total_instances: u64 = pool.iter().map(|entry| u64::from(entry.depot_count)).sum();
    let total_value: f64 = pool.iter().map(CargoPoolEntry::contribution).sum();

    if total_instances == 0 {
        return PoolStatistics::default();
    }

    let mut candidates = Vec::new();
    for trailer in index.ownable_trailers() {
        let mut job_count = 0u64;
        let mut trailer_value = 0.0;
        let mut contributions: Vec<(&str, f64)> = Vec::new();

        for entry in pool {
            if !index.trailer_hauls(trailer.id, entry.cargo_id) {
                continue;
            }
            let contribution = entry.contribution();
            job_count += u64::from(entry.depot_count);
            trailer_value += contribution;
            contributions.push((entry.cargo_name.as_str(), contribution));
        }

        if job_count == 0 {
            continue;
        }

        candidates.push(TrailerStats {
            id: trailer.id,
            name: trailer.name.clone(),
            job_count,
            total_value: trailer_value,
            avg_value: trailer_value / job_count as f64,
            coverage: job_count as f64 / total_instances as f64,
            normalized_value: 0.0,
            top_cargoes: top_cargoes(contributions),
        });
    }

    let max_avg_value = candidates
        .iter()
        .map(|stats| stats.avg_value)
        .fold(1.0_f64, f64::max);
    for stats in &mut candidates {
        stats.normalized_value = stats.avg_value / max_avg_value;
    }

    PoolStatistics {
        candidates,
        total_instances,
        total_value,
    }
}

fn top_cargoes(mut contributions: Vec<(&str, f64)>) -> Vec<String> {
    // stable: equal contributions keep pool order
    contributions.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut seen = HashSet::new();
    contributions
        .into_iter()
        .filter(|(name, _)| seen.insert(*name))
        .take(TOP_CARGO_LIMIT)
        .map(|(name, _)| name.to_string())
        .collect()
}
