use chrono::Utc;
use clap::Subcommand;
use circuitroom_core::stats::recent_sessions;
use circuitroom_core::{
    Config, Database, HistorySummary, ParticipantRoster, SessionBuilder, StreakScorer,
};

use super::{print_json, CliResult};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Per-person streaks and points, highest first
    Leaderboard,
    /// Totals over all completed sessions
    Summary,
    /// Most recent completed sessions
    Recent {
        #[arg(long, default_value = "5")]
        limit: usize,
    },
}

pub fn run(action: StatsAction) -> CliResult {
    let config = Config::load()?;
    let db = Database::open()?;
    let roster = ParticipantRoster::load(&config.owner_id, &db)?;
    let mut builder = SessionBuilder::new(db, config.owner_id.clone(), config.session);
    let history = builder.load_history()?;

    match action {
        StatsAction::Leaderboard => {
            let scorer = StreakScorer::new(config.streaks.clone());
            print_json(&scorer.leaderboard(roster.people(), history, Utc::now()))?;
        }
        StatsAction::Summary => {
            print_json(&HistorySummary::from_sessions(history))?;
        }
        StatsAction::Recent { limit } => {
            print_json(&recent_sessions(history, limit))?;
        }
    }
    Ok(())
}
