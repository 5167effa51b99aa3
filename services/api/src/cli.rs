use crate::report::{run_locations, run_rankings, run_recommend};
use crate::server;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use trucker_advisor::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Trucker Advisor",
    about = "Recommend garage trailers and rank garage locations for trucking simulators",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// List the locations of the reference snapshot
    Locations(SnapshotArgs),
    /// Recommend a trailer set for the garage at one location
    Recommend(RecommendArgs),
    /// Rank every location by job volume and value
    Rankings(RankingsArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    #[command(flatten)]
    pub(crate) snapshot: SnapshotArgs,
}

#[derive(Args, Debug, Default)]
pub(crate) struct SnapshotArgs {
    /// Override the configured reference data directory
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct TuningArgs {
    /// Garage slots to fill
    #[arg(long)]
    pub(crate) max_trailers: Option<u32>,
    /// 0 favours high-value jobs, 100 favours job variety
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) scoring_balance: Option<i32>,
    /// 0 allows unlimited duplicates, 100 pushes hardest towards variety
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) diminishing_factor: Option<i32>,
}

#[derive(Args, Debug)]
pub(crate) struct RecommendArgs {
    /// Location id to optimise
    #[arg(long)]
    pub(crate) location: u32,
    #[command(flatten)]
    pub(crate) tuning: TuningArgs,
    #[command(flatten)]
    pub(crate) snapshot: SnapshotArgs,
    /// Print the result as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct RankingsArgs {
    /// Only show these countries (repeatable)
    #[arg(long)]
    pub(crate) country: Vec<String>,
    /// Case-insensitive text matched against location and country names
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Show at most this many entries
    #[arg(long)]
    pub(crate) limit: Option<usize>,
    #[command(flatten)]
    pub(crate) tuning: TuningArgs,
    #[command(flatten)]
    pub(crate) snapshot: SnapshotArgs,
    /// Print the ranking as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Locations(args) => run_locations(args),
        Command::Recommend(args) => run_recommend(args),
        Command::Rankings(args) => run_rankings(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["trucker-advisor-api"]).expect("empty args parse");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_recommend_flags() {
        let cli = Cli::try_parse_from([
            "trucker-advisor-api",
            "recommend",
            "--location",
            "7",
            "--max-trailers",
            "4",
            "--scoring-balance",
            "-20",
            "--json",
        ])
        .expect("recommend args parse");

        let Some(Command::Recommend(args)) = cli.command else {
            panic!("expected recommend command");
        };
        assert_eq!(args.location, 7);
        assert_eq!(args.tuning.max_trailers, Some(4));
        assert_eq!(args.tuning.scoring_balance, Some(-20));
        assert!(args.json);
        assert!(args.snapshot.data_dir.is_none());
    }

    #[test]
    fn rankings_accept_repeated_countries() {
        let cli = Cli::try_parse_from([
            "trucker-advisor-api",
            "rankings",
            "--country",
            "Germany",
            "--country",
            "France",
            "--data-dir",
            "/srv/snapshot",
        ])
        .expect("rankings args parse");

        let Some(Command::Rankings(args)) = cli.command else {
            panic!("expected rankings command");
        };
        assert_eq!(args.country, vec!["Germany", "France"]);
        assert_eq!(args.snapshot.data_dir, Some(PathBuf::from("/srv/snapshot")));
    }
}
