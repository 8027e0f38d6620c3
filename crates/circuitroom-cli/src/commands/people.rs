use clap::Subcommand;
use circuitroom_core::{Config, Database, ParticipantRoster};

use super::{print_json, CliResult};

#[derive(Subcommand)]
pub enum PeopleAction {
    /// List people as JSON, oldest first
    List,
    /// Add a person
    Add {
        /// Display name
        name: String,
        #[arg(long)]
        nickname: Option<String>,
    },
    /// Remove a person by id
    Remove {
        id: String,
    },
}

pub fn run(action: PeopleAction) -> CliResult {
    let config = Config::load()?;
    let db = Database::open()?;
    let mut roster = ParticipantRoster::load(&config.owner_id, &db)?;

    match action {
        PeopleAction::List => {
            print_json(roster.people())?;
        }
        PeopleAction::Add { name, nickname } => {
            let person = roster.add(&name, nickname.as_deref())?;
            print_json(&person)?;
        }
        PeopleAction::Remove { id } => {
            if !roster.remove(&id) {
                return Err(format!("person not found: {id}").into());
            }
            println!("removed {id}");
        }
    }

    roster.flush(&db);
    if roster.pending_writes() > 0 {
        tracing::warn!(pending = roster.pending_writes(), "some roster changes were not saved");
    }
    Ok(())
}
