mod builder;
mod model;

pub use builder::{SessionBuilder, SESSIONS_COLLECTION};
pub use model::{Session, SessionExercise, SessionSettings};
