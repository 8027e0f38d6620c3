use std::time::Duration;

use clap::Subcommand;
use circuitroom_core::live::{Completion, SystemClock};
use circuitroom_core::physics;
use circuitroom_core::storage::Database;
use circuitroom_core::{
    Config, Event, ExerciseLibrary, LiveEngine, ParticipantRoster, SessionBuilder, SessionDraft,
};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;

use super::{print_json, rng, CliResult};
use crate::console::console_cues;

const DRAFT_KEY: &str = "session_draft";
const TICK_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Subcommand)]
pub enum SessionAction {
    /// Compose a fresh draft from the library
    Compose {
        /// Number of slots to aim for (default from config)
        #[arg(long)]
        target: Option<usize>,
        /// Seed for a reproducible draft
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Re-arrange the current draft
    Shuffle {
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print the current draft with physics estimates
    Show,
    /// Append an exercise to the draft
    Add {
        /// Exercise id
        exercise_id: String,
    },
    /// Remove a slot from the draft
    RemoveSlot {
        slot_id: String,
    },
    /// Move a slot to another position
    Move {
        from: usize,
        to: usize,
    },
    /// Empty the draft
    Clear,
    /// Run the draft live. Type p (pause/resume), s (skip) or q (finish) + Enter
    Run {
        /// Participant ids, comma separated
        #[arg(long, value_delimiter = ',')]
        participants: Vec<String>,
        /// Seed for extreme round placement
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DraftView<'a> {
    slots: &'a [circuitroom_core::SessionSlot],
    estimated_duration_sec: u64,
    physics: physics::PhysicsResult,
}

fn load_draft(db: &Database) -> Result<SessionDraft, Box<dyn std::error::Error>> {
    match db.kv_get(DRAFT_KEY)? {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => Ok(SessionDraft::new()),
    }
}

fn save_draft(db: &Database, draft: &SessionDraft) -> CliResult {
    db.kv_set(DRAFT_KEY, &serde_json::to_string(draft)?)?;
    Ok(())
}

fn print_draft(draft: &SessionDraft, config: &Config) -> CliResult {
    let settings = config.session;
    let exercises: Vec<_> = draft
        .exercises()
        .iter()
        .enumerate()
        .map(|(i, e)| {
            circuitroom_core::SessionExercise::snapshot(e, i, settings.exercise_duration_sec, false)
        })
        .collect();
    let work: u64 = exercises.iter().map(|e| u64::from(e.duration_sec)).sum();
    let rests = u64::from(settings.rest_duration_sec) * exercises.len().saturating_sub(1) as u64;
    print_json(&DraftView {
        slots: draft.slots(),
        estimated_duration_sec: work + rests,
        physics: physics::calculate(&exercises),
    })
}

pub fn run(action: SessionAction) -> CliResult {
    let config = Config::load()?;
    let db = Database::open()?;
    let library = ExerciseLibrary::load(&config.owner_id, &db)?;
    let mut draft = load_draft(&db)?;
    draft.sync_with_library(library.list());

    match action {
        SessionAction::Compose { target, seed } => {
            let target = target.unwrap_or(config.composer.target_exercise_count);
            draft.smart_fill(library.list(), target, &mut rng(seed));
            save_draft(&db, &draft)?;
            print_draft(&draft, &config)?;
        }
        SessionAction::Shuffle { seed } => {
            draft.shuffle(&mut rng(seed));
            save_draft(&db, &draft)?;
            print_draft(&draft, &config)?;
        }
        SessionAction::Show => {
            print_draft(&draft, &config)?;
        }
        SessionAction::Add { exercise_id } => {
            let exercise = library
                .get(&exercise_id)
                .ok_or_else(|| format!("exercise not found: {exercise_id}"))?;
            let slot_id = draft.add(exercise.clone());
            save_draft(&db, &draft)?;
            println!("{slot_id}");
        }
        SessionAction::RemoveSlot { slot_id } => {
            if !draft.remove(&slot_id) {
                return Err(format!("slot not found: {slot_id}").into());
            }
            save_draft(&db, &draft)?;
            println!("removed {slot_id}");
        }
        SessionAction::Move { from, to } => {
            draft.move_slot(from, to)?;
            save_draft(&db, &draft)?;
            print_draft(&draft, &config)?;
        }
        SessionAction::Clear => {
            draft.clear();
            save_draft(&db, &draft)?;
            println!("draft cleared");
        }
        SessionAction::Run { participants, seed } => {
            run_live(db, &config, &draft, &participants, seed)?;
        }
    }
    Ok(())
}

fn run_live(
    db: Database,
    config: &Config,
    draft: &SessionDraft,
    participants: &[String],
    seed: Option<u64>,
) -> CliResult {
    if draft.is_empty() {
        return Err("the draft is empty; run `session compose` first".into());
    }

    let mut roster = ParticipantRoster::load(&config.owner_id, &db)?;
    for id in participants {
        roster.select(id)?;
    }
    let (ids, names) = roster.selected();

    let mut builder = SessionBuilder::new(db, config.owner_id.clone(), config.session);
    let session = builder.create_session(ids, names, &draft.exercises(), &mut rng(seed))?;
    let mut engine = LiveEngine::new(&session, config.cues.clone(), console_cues(), SystemClock)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let completion = runtime.block_on(drive(&mut engine))?;

    if let Some(done) = builder.complete_session(completion.elapsed_secs) {
        print_json(&done)?;
    }
    Ok(())
}

/// Tick the engine until it finishes, handling keyboard commands and Ctrl+C.
async fn drive(
    engine: &mut LiveEngine<SystemClock>,
) -> Result<Completion, Box<dyn std::error::Error>> {
    let mut ticker = tokio::time::interval(TICK_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    emit(engine.start())?;
    while engine.needs_tick() {
        tokio::select! {
            _ = ticker.tick() => emit(engine.tick())?,
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => emit(command(engine, line.trim()))?,
                Ok(None) => stdin_open = false,
                Err(e) => {
                    tracing::warn!("stdin closed: {e}");
                    stdin_open = false;
                }
            },
            _ = tokio::signal::ctrl_c() => emit(engine.finish())?,
        }
    }

    engine
        .completion()
        .ok_or_else(|| "live session ended without finishing".into())
}

fn command(engine: &mut LiveEngine<SystemClock>, input: &str) -> Option<Event> {
    match input {
        "p" | "pause" | "resume" => engine.toggle_pause(),
        "s" | "skip" => engine.skip(),
        "q" | "quit" | "finish" => engine.finish(),
        "" => Some(engine.snapshot()),
        other => {
            eprintln!("unknown command: {other} (p = pause/resume, s = skip, q = finish)");
            None
        }
    }
}

fn emit(event: Option<Event>) -> CliResult {
    if let Some(event) = event {
        println!("{}", serde_json::to_string(&event)?);
    }
    Ok(())
}
