use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;

use pulse_sessions_lib::commands::{analytics, sessions};
use pulse_sessions_lib::db::{self, AppState};
use pulse_sessions_lib::{logging, DatabaseConfig, SessionDetectionConfig};

#[derive(Debug, Parser)]
#[command(name = "pulse-sessions", about = "Detect workout sessions from heart-rate telemetry")]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
  /// List sessions detected between two dates (inclusive)
  Sessions {
    #[arg(long)]
    from: NaiveDate,
    #[arg(long)]
    to: NaiveDate,
    /// Persist the detected sessions
    #[arg(long)]
    store: bool,
  },
  /// Zone minutes for the week starting at the given date
  Weekly {
    #[arg(long)]
    week_start: NaiveDate,
  },
  /// Daily TRIMP totals between two dates (inclusive)
  Trend {
    #[arg(long)]
    from: NaiveDate,
    #[arg(long)]
    to: NaiveDate,
  },
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  // Load environment variables from .env file
  dotenvy::dotenv().ok();
  logging::init_logging();

  let cli = Cli::parse();
  let config = SessionDetectionConfig::from_env();
  config.validate()?;

  let pool = db::initialize_db(&DatabaseConfig::from_env()?).await?;
  let state = AppState { db: pool };

  match cli.command {
    Command::Sessions { from, to, store } => {
      if store {
        print_json(&sessions::sync_workout_sessions(&state, from, to, &config).await?)?;
      } else {
        print_json(&sessions::get_workout_sessions(&state, from, to, &config).await?)?;
      }
    }
    Command::Weekly { week_start } => {
      print_json(&analytics::get_weekly_zone_breakdown(&state, week_start, &config).await?)?;
    }
    Command::Trend { from, to } => {
      print_json(&analytics::get_training_load_trend(&state, from, to, &config).await?)?;
    }
  }

  state.db.close().await;
  Ok(())
}
