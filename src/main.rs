use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use f1_standings::api::{build_router, state::AppState};
use f1_standings::calculate::{
    compute_driver_standings_with_teams, compute_progressive_standings, compute_standings,
    driver_team_assignments_at_round, position_history,
};
use f1_standings::config::AppConfig;
use f1_standings::fetch::ResultsProvider;
use f1_standings::ingest::import_season;
use f1_standings::models::{is_valid_season, SeasonSelection, StandingMode};
use f1_standings::selection::resolve_season;
use f1_standings::storage::{
    read_season_results, write_progressive_report, write_selected_season, StorageConfig,
};

#[derive(Parser)]
#[command(name = "f1-standings")]
#[command(about = "Formula 1 championship standings with progressive rounds and team attribution")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Season to work on (overrides the saved selection)
    #[arg(long)]
    season: Option<i32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a season from the results provider into the local store
    Import,

    /// Print championship standings
    Standings {
        /// Standings after this round (0 = season total)
        #[arg(long, default_value = "0")]
        round: u32,

        /// Championship type: driver or constructor
        #[arg(long = "type", default_value = "driver")]
        mode: StandingMode,
    },

    /// Print each driver's team
    Teams {
        /// Team as of this round (0 = latest)
        #[arg(long, default_value = "0")]
        round: u32,
    },

    /// Print a competitor's championship position after each round
    History {
        /// Championship type: driver or constructor
        #[arg(long = "type", default_value = "driver")]
        mode: StandingMode,

        /// Driver or constructor id
        #[arg(long)]
        id: String,
    },

    /// Write per-round standings reports to the derived directory
    Export,

    /// Show or change the selected season
    Season {
        #[command(subcommand)]
        action: SeasonAction,
    },

    /// Start the API server
    Serve {
        /// Bind address (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides the config file)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Subcommand)]
enum SeasonAction {
    /// Show the selected season and where it came from
    Show,
    /// Save a season as the selection
    Set { year: i32 },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(year) = cli.season {
        if !is_valid_season(year) {
            bail!("--season {} is not a championship season", year);
        }
    }

    let config = AppConfig::load_or_default(Path::new(&cli.config))
        .with_context(|| format!("Failed to load config from {}", cli.config))?;

    // Initialize tracing
    let log_level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting f1-standings v{}", env!("CARGO_PKG_VERSION"));

    let data_dir = cli
        .data_dir
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| config.data_dir.clone());
    let storage = StorageConfig::new(data_dir);
    let provider =
        ResultsProvider::from_config(&config.provider).context("Failed to create provider")?;

    match cli.command {
        Commands::Import => {
            let season = require_season(cli.season, &storage, &config, &provider).await?;
            let summary = import_season(&provider, &storage, season.year).await?;

            println!("\n=== Import Results ===");
            println!("Season:   {}", summary.season);
            println!("Results:  {}", summary.results);
            println!("Rounds:   {}", summary.rounds);
        }
        Commands::Standings { round, mode } => {
            let season = require_season(cli.season, &storage, &config, &provider).await?;
            let results = read_season_results(&storage, season.year)?;

            match mode {
                StandingMode::Driver => {
                    let standings = compute_driver_standings_with_teams(&results, round)?;
                    if standings.is_empty() {
                        println!("No data for season {}", season.year);
                        return Ok(());
                    }
                    println!("{}", standings_title(season.year, round, mode));
                    println!(
                        "{:>3}  {:<20} {:<16} {:>7} {:>4} {:>5}",
                        "Pos", "Driver", "Team", "Points", "Wins", "Races"
                    );
                    for s in &standings {
                        let team = s
                            .constructor_id
                            .as_ref()
                            .map(|c| c.as_str())
                            .unwrap_or("-");
                        println!(
                            "{:>3}  {:<20} {:<16} {:>7.1} {:>4} {:>5}",
                            s.entry.position,
                            s.entry.competitor_id,
                            team,
                            s.entry.points,
                            s.entry.wins,
                            s.entry.races
                        );
                    }
                }
                StandingMode::Constructor => {
                    let standings = compute_standings(&results, round, mode)?;
                    if standings.is_empty() {
                        println!("No data for season {}", season.year);
                        return Ok(());
                    }
                    println!("{}", standings_title(season.year, round, mode));
                    println!(
                        "{:>3}  {:<20} {:>7} {:>4} {:>5}",
                        "Pos", "Constructor", "Points", "Wins", "Races"
                    );
                    for e in &standings {
                        println!(
                            "{:>3}  {:<20} {:>7.1} {:>4} {:>5}",
                            e.position, e.competitor_id, e.points, e.wins, e.races
                        );
                    }
                }
            }
        }
        Commands::Teams { round } => {
            let season = require_season(cli.season, &storage, &config, &provider).await?;
            let results = read_season_results(&storage, season.year)?;
            let teams = driver_team_assignments_at_round(&results, round)?;

            if teams.is_empty() {
                println!("No data for season {}", season.year);
                return Ok(());
            }
            for (driver, constructor) in &teams {
                println!("{:<20} {}", driver, constructor);
            }
        }
        Commands::History { mode, id } => {
            let season = require_season(cli.season, &storage, &config, &provider).await?;
            let results = read_season_results(&storage, season.year)?;
            let history = position_history(&results, mode, &id)?;

            if history.is_empty() {
                println!("No data for {} '{}' in season {}", mode, id, season.year);
                return Ok(());
            }
            println!("{:>5} {:>4} {:>7} {:>4}", "Round", "Pos", "Points", "Wins");
            for point in &history {
                println!(
                    "{:>5} {:>4} {:>7.1} {:>4}",
                    point.round, point.position, point.points, point.wins
                );
            }
        }
        Commands::Export => {
            let season = require_season(cli.season, &storage, &config, &provider).await?;
            let results = read_season_results(&storage, season.year)?;

            for mode in [StandingMode::Driver, StandingMode::Constructor] {
                let tables = compute_progressive_standings(&results, mode)?;
                let path = write_progressive_report(&storage, season.year, mode, &tables)?;
                println!("Wrote {} {} rounds to {}", tables.len(), mode, path.display());
            }
        }
        Commands::Season { action } => match action {
            SeasonAction::Show => {
                match resolve_season(cli.season, &storage, &config, Some(&provider)).await? {
                    Some(selection) => println!(
                        "Season {} (from {:?})",
                        selection.year, selection.source
                    ),
                    None => println!("No season selected"),
                }
            }
            SeasonAction::Set { year } => {
                if !is_valid_season(year) {
                    bail!("{} is not a championship season", year);
                }
                write_selected_season(&storage, year)?;
                println!("Selected season {}", year);
            }
        },
        Commands::Serve { host, port } => {
            let selection = resolve_season(cli.season, &storage, &config, Some(&provider)).await?;
            match &selection {
                Some(s) => tracing::info!("Default season {} ({:?})", s.year, s.source),
                None => tracing::warn!("No default season; requests must pass ?season="),
            }

            let state = AppState::new(storage, selection);
            let app = build_router(state, &config.server.cors_origin);
            let addr = format!(
                "{}:{}",
                host.unwrap_or_else(|| config.server.host.clone()),
                port.unwrap_or(config.server.port)
            );
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to bind {}", addr))?;
            tracing::info!("API: http://{}/api/v1", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}

/// Resolve the working season or fail with a hint.
async fn require_season(
    explicit: Option<i32>,
    storage: &StorageConfig,
    config: &AppConfig,
    provider: &ResultsProvider,
) -> Result<SeasonSelection> {
    match resolve_season(explicit, storage, config, Some(provider)).await? {
        Some(selection) => Ok(selection),
        None => bail!("No season selected. Pass --season or run `f1-standings season set <year>`"),
    }
}

fn standings_title(season: i32, round: u32, mode: StandingMode) -> String {
    if round == 0 {
        format!("{} {} standings (season total)", season, mode)
    } else {
        format!("{} {} standings after round {}", season, mode, round)
    }
}
