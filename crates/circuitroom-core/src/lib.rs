//! # Circuitroom Core Library
//!
//! This library provides the core logic for Circuitroom, a dumbbell circuit
//! training companion. It follows the same CLI-first layout as its sibling
//! binary: every operation is available from `circuitroom-cli`, and any GUI is
//! a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Composition**: picks exercises from the library, repeats them, keeps
//!   identical exercises apart and groups floor work into one block
//! - **Sessions**: snapshots a composed list into an immutable session record
//!   with extreme rounds and physics totals, completed exactly once
//! - **Live Engine**: a wall-clock-based state machine that requires the caller
//!   to periodically invoke `tick()`; voice, beeps and music ducking are
//!   pluggable collaborators
//! - **Storage**: SQLite document store with an eventual-persistence outbox,
//!   and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`SessionDraft`]: editable slot list fed by the composer
//! - [`SessionBuilder`]: session creation, completion latch, history
//! - [`LiveEngine`]: countdown, exercise and rest timeline
//! - [`StreakScorer`]: per-person streaks, points and the leaderboard
//! - [`Database`]: document persistence
//! - [`Config`]: application configuration management

pub mod compose;
pub mod error;
pub mod events;
pub mod library;
pub mod live;
pub mod physics;
pub mod roster;
pub mod session;
pub mod stats;
pub mod storage;

pub use compose::{build_smart_session, SessionDraft, SessionSlot};
pub use error::{ConfigError, CoreError, CueError, DatabaseError, StoreError, ValidationError};
pub use events::Event;
pub use library::{Exercise, ExerciseDraft, ExerciseLibrary};
pub use live::{Clock, Cues, LiveEngine, Phase, SystemClock, VirtualClock};
pub use physics::PhysicsResult;
pub use roster::{ParticipantRoster, Person};
pub use session::{Session, SessionBuilder, SessionExercise, SessionSettings};
pub use stats::{HistorySummary, PersonStats, StreakScorer};
pub use storage::{Config, Database, MemoryStore, Outbox, Store};
