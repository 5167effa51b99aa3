use super::OptimizationOptions;
use crate::reference::{LocationId, TrailerId};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrailerRecommendation {
    pub trailer_id: TrailerId,
    pub trailer_name: String,
    pub count: u32,
    pub coverage_pct: f64,
    pub avg_value: f64,
    /// Round-zero score, before any duplicate decay.
    pub score: f64,
    pub top_cargoes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    pub location_id: LocationId,
    pub total_depots: u64,
    pub total_cargo_instances: u64,
    pub total_value: f64,
    pub recommendations: Vec<TrailerRecommendation>,
    pub options: OptimizationOptions,
}

impl OptimizationResult {
    pub fn empty(location_id: LocationId, options: OptimizationOptions) -> Self {
        Self {
            location_id,
            total_depots: 0,
            total_cargo_instances: 0,
            total_value: 0.0,
            recommendations: Vec::new(),
            options,
        }
    }

    pub fn trailers_assigned(&self) -> u32 {
        self.recommendations.iter().map(|rec| rec.count).sum()
    }

    /// Distinct trailer types in the plan.
    pub fn trailer_types(&self) -> usize {
        self.recommendations.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRanking {
    pub id: LocationId,
    pub name: String,
    pub country: String,
    pub depot_count: u64,
    pub jobs: u64,
    pub total_value: f64,
    pub avg_value_per_job: f64,
    pub score: f64,
}
