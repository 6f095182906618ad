// Rotolab entry point.
//
// Thin CLI over the ingestion and minute-reallocation engine. Each command
// loads the session database, performs one operation, and prints a report;
// all state between invocations lives in the store.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::info;

use rotolab::aggregate;
use rotolab::config;
use rotolab::ingest;
use rotolab::minutes;
use rotolab::model::{format_stat, DataSource};
use rotolab::scaling;
use rotolab::store::{Database, FileStatus};

#[derive(Parser)]
#[command(name = "rotolab")]
#[command(about = "NBA projection ingestion and minute reallocation", long_about = None)]
struct Cli {
    /// Projection source to operate on (ETR or UA). Defaults to the last
    /// ingested source, then the configured default.
    #[arg(long, global = true)]
    source: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest a projections CSV, replacing the source's player list
    Ingest { file: PathBuf },
    /// Show totals, deltas, and minute validation for one team
    Team {
        /// Canonical team name or abbreviation. Defaults to the last team
        /// viewed.
        name: Option<String>,
    },
    /// Propose new minutes for a player, rescaling their stats on success
    Adjust {
        player: String,
        minutes: f64,
        /// Disambiguates when two teams carry a player with the same name
        #[arg(long)]
        team: Option<String>,
    },
    /// Print a greedy minute redistribution toward a target total
    Suggest {
        team: String,
        #[arg(long, default_value_t = minutes::TEAM_MINUTE_LIMIT)]
        target: f64,
    },
    /// Show per-source upload status and session selections
    Status,
    /// Wipe all ingested players and session state
    Clear,
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = config::load_config().context("failed to load configuration")?;

    let db_path = config.db_path()?;
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let db = Database::open(&db_path.to_string_lossy()).context("failed to open session store")?;

    let source = resolve_source(&cli, &config, &db)?;

    match cli.command {
        Commands::Ingest { file } => cmd_ingest(&db, &file, source),
        Commands::Team { name } => cmd_team(&db, name, source),
        Commands::Adjust {
            player,
            minutes,
            team,
        } => cmd_adjust(&db, &player, minutes, team.as_deref(), source),
        Commands::Suggest { team, target } => cmd_suggest(&db, &team, target, source),
        Commands::Status => cmd_status(&db),
        Commands::Clear => {
            db.clear_session()?;
            println!("Session cleared.");
            Ok(())
        }
    }
}

/// Precedence: explicit --source flag, then the store's active source, then
/// the configured default.
fn resolve_source(cli: &Cli, config: &config::Config, db: &Database) -> anyhow::Result<DataSource> {
    if let Some(raw) = &cli.source {
        return raw.parse::<DataSource>().map_err(anyhow::Error::msg);
    }
    if let Some(active) = db.active_source()? {
        return Ok(active);
    }
    Ok(config.default_source())
}

fn cmd_ingest(db: &Database, file: &std::path::Path, source: DataSource) -> anyhow::Result<()> {
    info!("ingesting {} as {source}", file.display());
    let result = ingest::ingest_path(file, source)?;

    db.replace_players(source, &result.players)?;
    db.set_active_source(source)?;
    db.set_file_status(
        source,
        &FileStatus {
            last_update: result.loaded_at,
            players: result.players.len(),
            row_errors: result.errors.len(),
        },
    )?;

    println!(
        "Ingested {} players from {} ({source})",
        result.players.len(),
        file.display()
    );
    for error in &result.errors {
        println!("  warning: {error}");
    }
    Ok(())
}

fn cmd_team(db: &Database, name: Option<String>, source: DataSource) -> anyhow::Result<()> {
    let players = db.load_players(source)?;
    if players.is_empty() {
        bail!("no players ingested for {source}; run `rotolab ingest` first");
    }

    let team = match name {
        // Accept abbreviations on the command line the same way the CSVs do.
        Some(raw) => ingest::schema::normalize_team_name(&raw),
        None => db
            .selected_team()?
            .context("no team selected; pass a team name")?,
    };

    let team_players: Vec<_> = players
        .iter()
        .filter(|p| p.team == team)
        .cloned()
        .collect();
    if team_players.is_empty() {
        bail!("no players found for team '{team}' in {source}");
    }
    db.set_selected_team(&team)?;

    println!("{team} ({source}, {} players)", team_players.len());
    println!();
    println!(
        "{:<24} {:>3}  {:>5}  {:>5} {:>5} {:>5} {:>5} {:>5} {:>5} {:>5}",
        "Player", "Pos", "Min", "Pts", "Reb", "Ast", "Stl", "Blk", "TO", "3PM"
    );
    for p in &team_players {
        println!(
            "{:<24} {:>3}  {:>5}  {:>5} {:>5} {:>5} {:>5} {:>5} {:>5} {:>5}",
            p.name,
            p.position,
            format_stat(p.minutes),
            format_stat(p.stats.points),
            format_stat(p.stats.rebounds),
            format_stat(p.stats.assists),
            format_stat(p.stats.steals),
            format_stat(p.stats.blocks),
            format_stat(p.stats.turnovers),
            format_stat(p.stats.three_pointers),
        );
    }

    let totals = aggregate::team_totals(&team_players);
    let baseline = aggregate::team_original_totals(&team_players);
    let deltas = aggregate::stat_differences(&totals, &baseline);
    let minutes_summary = aggregate::team_minutes(&team_players);

    println!();
    println!(
        "Totals:   {} pts, {} reb, {} ast, {} stl, {} blk, {} to, {} 3pm",
        format_stat(totals.points),
        format_stat(totals.rebounds),
        format_stat(totals.assists),
        format_stat(totals.steals),
        format_stat(totals.blocks),
        format_stat(totals.turnovers),
        format_stat(totals.three_pointers),
    );
    println!(
        "vs base:  {:+} pts, {:+} reb, {:+} ast ({:+} min)",
        rotolab::model::round_stat(deltas.points),
        rotolab::model::round_stat(deltas.rebounds),
        rotolab::model::round_stat(deltas.assists),
        minutes_summary.difference,
    );

    let validation = minutes::validate_team_minutes(&players, &team);
    if validation.is_valid {
        println!("Minutes:  {} / 240 (balanced)", validation.total_minutes);
    } else {
        println!(
            "Minutes:  {} / 240 ({:+} to budget)",
            validation.total_minutes, validation.minutes_difference
        );
        for error in &validation.errors {
            println!("  {error}");
        }
    }
    Ok(())
}

fn cmd_adjust(
    db: &Database,
    player_name: &str,
    new_minutes: f64,
    team_filter: Option<&str>,
    source: DataSource,
) -> anyhow::Result<()> {
    let mut players = db.load_players(source)?;
    let team_filter = team_filter.map(ingest::schema::normalize_team_name);
    let index = players
        .iter()
        .position(|p| {
            p.name == player_name
                && team_filter.as_deref().is_none_or(|team| p.team == team)
        })
        .with_context(|| format!("player '{player_name}' not found in {source}"))?;

    let team = players[index].team.clone();
    let team_total = aggregate::team_total_minutes(&players, &team);
    let check = minutes::validate_adjustment(players[index].minutes, new_minutes, team_total);
    if !check.is_valid {
        // Advisory rejection: stored state is untouched.
        bail!(
            "adjustment rejected: {}",
            check.error.unwrap_or_else(|| "invalid adjustment".into())
        );
    }

    scaling::apply_minutes(&mut players[index], new_minutes);
    db.update_player(source, &players[index])?;

    let p = &players[index];
    println!(
        "{}: {} min -> {} pts, {} reb, {} ast ({:+.1} min vs ingest)",
        p.name,
        format_stat(p.minutes),
        format_stat(p.stats.points),
        format_stat(p.stats.rebounds),
        format_stat(p.stats.assists),
        p.minutes_delta(),
    );

    let validation = minutes::validate_team_minutes(&players, &team);
    if !validation.is_valid {
        println!(
            "note: {team} now at {} / 240 minutes",
            validation.total_minutes
        );
    }
    Ok(())
}

fn cmd_suggest(db: &Database, team: &str, target: f64, source: DataSource) -> anyhow::Result<()> {
    let players = db.load_players(source)?;
    let team = ingest::schema::normalize_team_name(team);
    let current = aggregate::team_total_minutes(&players, &team);
    let suggestions = minutes::suggest_minute_distribution(&players, target, &team);

    if suggestions.is_empty() {
        println!("{team} already at {current} minutes; nothing to redistribute.");
        return Ok(());
    }

    println!("{team}: {current} -> {target} minutes");
    let mut names: Vec<_> = suggestions.keys().collect();
    names.sort();
    for name in names {
        let proposed = suggestions[name];
        let current_minutes = players
            .iter()
            .find(|p| &p.name == name)
            .map(|p| p.minutes)
            .unwrap_or(0.0);
        println!(
            "  {name}: {} -> {}",
            format_stat(current_minutes),
            format_stat(proposed)
        );
    }
    Ok(())
}

fn cmd_status(db: &Database) -> anyhow::Result<()> {
    for source in [DataSource::Etr, DataSource::Ua] {
        match db.file_status(source)? {
            Some(status) => println!(
                "{source}: {} players, {} row errors, updated {}",
                status.players,
                status.row_errors,
                status.last_update.format("%Y-%m-%d %H:%M:%S UTC"),
            ),
            None => println!("{source}: nothing ingested"),
        }
    }
    if let Some(active) = db.active_source()? {
        println!("Active source: {active}");
    }
    if let Some(team) = db.selected_team()? {
        println!("Selected team: {team}");
    }
    Ok(())
}

/// Initialize tracing to stderr so reports on stdout stay clean.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rotolab=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
