use crate::cli::{RankingsArgs, RecommendArgs, SnapshotArgs, TuningArgs};
use crate::infra::{
    load_snapshot, rank_position, resolve_options, RankPosition, RankedLocation, RankingFilter,
};
use serde::Serialize;
use std::sync::Arc;
use trucker_advisor::config::AppConfig;
use trucker_advisor::error::AppError;
use trucker_advisor::optimizer::{
    optimize_location, rank_locations, OptimizationOptions, OptimizationResult,
};
use trucker_advisor::reference::{Location, LocationId, ReferenceIndex, SnapshotInfo};

struct Snapshot {
    index: Arc<ReferenceIndex>,
    info: SnapshotInfo,
    defaults: OptimizationOptions,
}

fn open_snapshot(args: &SnapshotArgs) -> Result<Snapshot, AppError> {
    let config = AppConfig::load()?;
    let data_dir = args.data_dir.clone().unwrap_or(config.advisor.data_dir);
    let (index, info) = load_snapshot(&data_dir)?;

    Ok(Snapshot {
        index,
        info,
        defaults: config.advisor.defaults,
    })
}

fn options_from(
    tuning: &TuningArgs,
    defaults: OptimizationOptions,
) -> Result<OptimizationOptions, AppError> {
    resolve_options(
        defaults,
        tuning.max_trailers,
        tuning.scoring_balance,
        tuning.diminishing_factor,
    )
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value).map_err(std::io::Error::from)?;
    println!("{rendered}");
    Ok(())
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

pub(crate) fn run_locations(args: SnapshotArgs) -> Result<(), AppError> {
    let snapshot = open_snapshot(&args)?;
    print_lines(&render_locations(&snapshot.info, snapshot.index.locations()));
    Ok(())
}

pub(crate) fn run_recommend(args: RecommendArgs) -> Result<(), AppError> {
    let snapshot = open_snapshot(&args.snapshot)?;
    let options = options_from(&args.tuning, snapshot.defaults)?;

    let id = LocationId(args.location);
    let location = snapshot
        .index
        .location(id)
        .ok_or(AppError::LocationNotFound(id))?;
    let result = optimize_location(&snapshot.index, id, &options);

    if args.json {
        print_json(&result)
    } else {
        let rank = rank_position(&snapshot.index, id, &options);
        print_lines(&render_recommendation(location, &result, rank));
        Ok(())
    }
}

pub(crate) fn run_rankings(args: RankingsArgs) -> Result<(), AppError> {
    let snapshot = open_snapshot(&args.snapshot)?;
    let options = options_from(&args.tuning, snapshot.defaults)?;

    let filter = RankingFilter {
        countries: args.country,
        search: args.search,
        limit: args.limit,
    };
    let ranked = filter.apply(rank_locations(&snapshot.index, &options));

    if args.json {
        print_json(&ranked)
    } else {
        print_lines(&render_rankings(&ranked));
        Ok(())
    }
}

pub(crate) fn render_locations(info: &SnapshotInfo, locations: &[Location]) -> Vec<String> {
    let mut sorted: Vec<&Location> = locations.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));

    let mut lines = vec![
        format!(
            "Reference snapshot {} (loaded {})",
            info.source.display(),
            info.loaded_at.format("%Y-%m-%d %H:%M UTC")
        ),
        format!(
            "{} locations | {} companies | {} cargo types | {} trailers",
            info.locations, info.companies, info.cargo, info.trailers
        ),
    ];
    lines.extend(sorted.into_iter().map(|location| {
        format!(
            "  {:>5}  {} ({})",
            location.id.0, location.name, location.country
        )
    }));
    lines
}

pub(crate) fn render_recommendation(
    location: &Location,
    result: &OptimizationResult,
    rank: Option<RankPosition>,
) -> Vec<String> {
    let rank_label = match rank {
        Some(position) => format!("#{} of {}", position.rank, position.total),
        None => "unranked".to_string(),
    };

    let mut lines = vec![
        format!(
            "Garage plan for {} ({}) | rank {}",
            location.name, location.country, rank_label
        ),
        format!(
            "- {} depots | {} cargo instances | total value {:.2}",
            result.total_depots, result.total_cargo_instances, result.total_value
        ),
        format!(
            "- options: balance {} | max trailers {} | diminishing {}",
            result.options.scoring_balance,
            result.options.max_trailers,
            result.options.diminishing_factor
        ),
    ];

    if result.recommendations.is_empty() {
        lines.push("No ownable trailer can haul cargo at this location.".to_string());
        return lines;
    }

    lines.push(format!(
        "Recommended trailers ({} of {} slots, {} types):",
        result.trailers_assigned(),
        result.options.max_trailers,
        result.trailer_types()
    ));
    for rec in &result.recommendations {
        lines.push(format!(
            "  {}x {} | {:.1}% coverage | avg value {:.2} | score {:.3}",
            rec.count, rec.trailer_name, rec.coverage_pct, rec.avg_value, rec.score
        ));
        if !rec.top_cargoes.is_empty() {
            lines.push(format!("     top cargo: {}", rec.top_cargoes.join(", ")));
        }
    }
    lines
}

pub(crate) fn render_rankings(ranked: &[RankedLocation]) -> Vec<String> {
    if ranked.is_empty() {
        return vec!["No locations match.".to_string()];
    }

    ranked
        .iter()
        .map(|entry| {
            let ranking = &entry.ranking;
            format!(
                "{:>4}. {} ({}) | score {:.1} | {} jobs | {} depots | value {:.0} | {:.2}/job",
                entry.rank,
                ranking.name,
                ranking.country,
                ranking.score,
                ranking.jobs,
                ranking.depot_count,
                ranking.total_value,
                ranking.avg_value_per_job
            )
        })
        .collect()
}
