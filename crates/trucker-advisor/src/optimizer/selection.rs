use super::scoring::{decay_factor, effective_score};
use super::stats::TrailerStats;
use super::views::TrailerRecommendation;
use super::{round_half_up, OptimizationOptions};
use std::cmp::Ordering;

/// Number of garage slots given to one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pick {
    /// Position in the candidate slice.
    pub candidate: usize,
    pub count: u32,
}

/// Greedy slot allocation with diminishing returns.
///
/// Each round picks the candidate with the highest
/// `base × factor^times_already_picked`; on ties the earliest candidate wins.
/// Stops after `max_trailers` rounds or once the best effective score is not
/// positive. Picks are returned in the order each candidate was first chosen.
pub fn select_trailers(
    candidates: &[TrailerStats],
    base_scores: &[f64],
    options: &OptimizationOptions,
) -> Vec<Pick> {
    let factors: Vec<f64> = candidates
        .iter()
        .map(|trailer| decay_factor(trailer, options.diminishing_factor))
        .collect();
    let mut counts = vec![0u32; candidates.len()];
    let mut first_picked = Vec::new();

    for _ in 0..options.max_trailers {
        let mut best: Option<(usize, f64)> = None;
        for (position, (&base, &factor)) in base_scores.iter().zip(&factors).enumerate() {
            let effective = effective_score(base, factor, counts[position]);
            if best.map_or(true, |(_, best_score)| effective > best_score) {
                best = Some((position, effective));
            }
        }

        let Some((winner, best_score)) = best else {
            break;
        };
        if best_score <= 0.0 {
            break;
        }

        if counts[winner] == 0 {
            first_picked.push(winner);
        }
        counts[winner] += 1;
    }

    first_picked
        .into_iter()
        .map(|candidate| Pick {
            candidate,
            count: counts[candidate],
        })
        .collect()
}

/// Recommendation records for the picks, most slots first, then best score.
pub fn recommendations(
    candidates: &[TrailerStats],
    base_scores: &[f64],
    picks: &[Pick],
) -> Vec<TrailerRecommendation> {
    let mut recommendations: Vec<TrailerRecommendation> = picks
        .iter()
        .map(|pick| {
            let trailer = &candidates[pick.candidate];
            TrailerRecommendation {
                trailer_id: trailer.id,
                trailer_name: trailer.name.clone(),
                count: pick.count,
                coverage_pct: round_half_up(trailer.coverage * 1000.0) / 10.0,
                avg_value: round_half_up(trailer.avg_value * 100.0) / 100.0,
                score: round_half_up(base_scores[pick.candidate] * 1000.0) / 1000.0,
                top_cargoes: trailer.top_cargoes.clone(),
            }
        })
        .collect();

    recommendations.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal))
    });
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::TrailerId;

    fn candidate(id: u32, coverage: f64) -> TrailerStats {
        TrailerStats {
            id: TrailerId(id),
            name: format!("trailer-{id}"),
            job_count: 1,
            total_value: 1.0,
            avg_value: 1.0,
            coverage,
            normalized_value: 1.0,
            top_cargoes: Vec::new(),
        }
    }

    fn options(max_trailers: u32, diminishing_factor: i32) -> OptimizationOptions {
        OptimizationOptions {
            scoring_balance: 50,
            max_trailers,
            diminishing_factor,
        }
    }

    #[test]
    fn single_candidate_takes_every_slot() {
        let picks = select_trailers(&[candidate(1, 0.4)], &[0.7], &options(10, 100));
        assert_eq!(
            picks,
            vec![Pick {
                candidate: 0,
                count: 10
            }]
        );
    }

    #[test]
    fn no_decay_lets_the_dominant_trailer_take_all() {
        let candidates = [candidate(1, 0.9), candidate(2, 0.1)];
        let picks = select_trailers(&candidates, &[0.9, 0.5], &options(6, 0));
        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0].count, 6);
    }

    #[test]
    fn strong_decay_spreads_comparable_trailers() {
        let candidates = [candidate(1, 0.5), candidate(2, 0.5)];
        let picks = select_trailers(&candidates, &[0.6, 0.55], &options(4, 100));
        assert_eq!(picks.len(), 2);
        assert_eq!(picks.iter().map(|pick| pick.count).sum::<u32>(), 4);
    }

    #[test]
    fn ties_go_to_the_first_candidate() {
        let candidates = [candidate(1, 0.0), candidate(2, 0.0)];
        let picks = select_trailers(&candidates, &[0.5, 0.5], &options(1, 50));
        assert_eq!(picks[0].candidate, 0);

        // factor 0.75: 0.5/0.5 -> first, 0.375/0.5 -> second, 0.375/0.375 -> first
        let picks = select_trailers(&candidates, &[0.5, 0.5], &options(3, 50));
        assert_eq!(
            picks,
            vec![
                Pick {
                    candidate: 0,
                    count: 2
                },
                Pick {
                    candidate: 1,
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn non_positive_scores_stop_selection() {
        let candidates = [candidate(1, 0.2)];
        assert!(select_trailers(&candidates, &[0.0], &options(5, 50)).is_empty());
        assert!(select_trailers(&candidates, &[-0.3], &options(5, 50)).is_empty());
        assert!(select_trailers(&[], &[], &options(5, 50)).is_empty());
    }

    #[test]
    fn recommendations_sort_by_count_then_score() {
        let candidates = [candidate(1, 0.25), candidate(2, 0.5), candidate(3, 0.125)];
        let scores = [0.4, 0.9, 0.95];
        let picks = [
            Pick {
                candidate: 0,
                count: 1,
            },
            Pick {
                candidate: 1,
                count: 3,
            },
            Pick {
                candidate: 2,
                count: 1,
            },
        ];

        let recs = recommendations(&candidates, &scores, &picks);
        let order: Vec<_> = recs.iter().map(|rec| rec.trailer_id).collect();
        assert_eq!(order, vec![TrailerId(2), TrailerId(3), TrailerId(1)]);
        assert_eq!(recs[0].coverage_pct, 50.0);
        assert_eq!(recs[1].coverage_pct, 12.5);
        assert_eq!(recs[0].score, 0.9);
    }
}
