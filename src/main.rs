use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use topmatchnba::{
    load_scoreboard, rate_day, read_report, report_path, write_report, DirectorySource,
    RankedGame, RatingEngine, RatingModel,
};

#[derive(Parser)]
#[command(
    name = "topmatchnba",
    version,
    about = "Rank a day's NBA games by how worth watching they were"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Merge the scoreboard, count lead changes, rate and write the report
    Rate {
        /// Game date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,

        /// Scoreboard document saved by the collector
        #[arg(long)]
        scoreboard: PathBuf,

        /// Directory with one <game_id>.json play-by-play document per game
        #[arg(long)]
        playbyplay_dir: PathBuf,

        /// Where reports are written
        #[arg(long, env = "TOPMATCHNBA_DATA_DIR", default_value = "data")]
        out_dir: PathBuf,

        /// Threshold tables: rating (max 32) or punctuation (cap 20)
        #[arg(long, env = "TOPMATCHNBA_MODEL", default_value_t = RatingModel::Rating)]
        model: RatingModel,
    },

    /// Print the ranking stored for a date
    Show {
        /// Game date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,

        #[arg(long, env = "TOPMATCHNBA_DATA_DIR", default_value = "data")]
        out_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();

    match cli.command {
        Command::Rate {
            date,
            scoreboard,
            playbyplay_dir,
            out_dir,
            model,
        } => run_rate(date, &scoreboard, &playbyplay_dir, &out_dir, model)?,
        Command::Show { date, out_dir } => run_show(date, &out_dir)?,
    }

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn run_rate(
    date: NaiveDate,
    scoreboard_path: &Path,
    playbyplay_dir: &Path,
    out_dir: &Path,
    model: RatingModel,
) -> Result<()> {
    println!("🏀 topmatchnba - Rating games for {}", date);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // 1. Load scoreboard
    println!("\n📂 Loading scoreboard...");
    let scoreboard = load_scoreboard(scoreboard_path)?;

    // 2. Merge, count lead changes, rate, rank
    println!("\n⚙️  Rating with the {} model...", model);
    let source = DirectorySource::new(playbyplay_dir);
    let engine = RatingEngine::with_model(model);
    let games = rate_day(&scoreboard, &source, &engine)
        .with_context(|| format!("Failed to rate games for {}", date))?;
    println!("✓ Rated {} games", games.len());

    // 3. Write report
    println!("\n💾 Writing report...");
    let path = write_report(out_dir, date, &games)?;
    info!(path = %path.display(), games = games.len(), "report written");
    println!("✓ Saved {}", path.display());

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    let records: Vec<RankedGame> = games.iter().map(RankedGame::from).collect();
    print_ranking(&records);

    Ok(())
}

fn run_show(date: NaiveDate, out_dir: &Path) -> Result<()> {
    let path = report_path(out_dir, date);

    if !path.exists() {
        eprintln!("❌ No report for {} at {}", date, path.display());
        eprintln!("   Run: topmatchnba rate --date {} ...", date);
        std::process::exit(1);
    }

    let records = read_report(&path)?;
    println!("🏀 topmatchnba - {}\n", date);
    print_ranking(&records);

    Ok(())
}

fn print_ranking(records: &[RankedGame]) {
    if records.is_empty() {
        println!("No games.");
        return;
    }

    for (rank, record) in records.iter().enumerate() {
        println!("{:>2}. {}", rank + 1, record.summary());
    }
}
