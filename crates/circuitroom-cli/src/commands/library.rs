use clap::Subcommand;
use circuitroom_core::library::default_exercises;
use circuitroom_core::{Config, Database, ExerciseDraft, ExerciseLibrary};

use super::{print_json, CliResult};

#[derive(Subcommand)]
pub enum LibraryAction {
    /// List exercises as JSON (seeds the defaults on first use)
    List,
    /// Add an exercise
    Add {
        /// Display name
        name: String,
        /// Range of motion per rep in cm
        #[arg(long)]
        rom: f64,
        /// Reps in 40 seconds
        #[arg(long)]
        reps: f64,
        /// Dumbbells used (1 or 2)
        #[arg(long, default_value = "2")]
        dumbbells: u8,
        /// Vertical fraction of the movement (0..1)
        #[arg(long)]
        vertical: f64,
        /// Performed on the floor
        #[arg(long)]
        floor: bool,
    },
    /// Remove an exercise by id
    Remove {
        id: String,
    },
    /// Add any built-in exercise that is missing (matched by name)
    Seed,
}

pub fn run(action: LibraryAction) -> CliResult {
    let config = Config::load()?;
    let db = Database::open()?;
    let mut library = ExerciseLibrary::load(&config.owner_id, &db)?;

    match action {
        LibraryAction::List => {
            print_json(library.list())?;
        }
        LibraryAction::Add {
            name,
            rom,
            reps,
            dumbbells,
            vertical,
            floor,
        } => {
            let exercise = library.add(ExerciseDraft {
                name,
                rom_cm: rom,
                reps_per_40s: reps,
                dumbbells_used: dumbbells,
                vertical_factor: vertical,
                is_floor: floor,
            })?;
            print_json(&exercise)?;
        }
        LibraryAction::Remove { id } => {
            if !library.remove(&id) {
                return Err(format!("exercise not found: {id}").into());
            }
            println!("removed {id}");
        }
        LibraryAction::Seed => {
            let mut added = 0;
            for draft in default_exercises() {
                if library.list().iter().all(|e| e.name != draft.name) {
                    library.add(draft)?;
                    added += 1;
                }
            }
            println!("added {added} exercises");
        }
    }

    library.flush(&db);
    if library.pending_writes() > 0 {
        tracing::warn!(pending = library.pending_writes(), "some library changes were not saved");
    }
    Ok(())
}
