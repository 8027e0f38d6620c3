//! Running a session: the phase timeline and its audio cues.

mod clock;
mod cues;
mod engine;

pub use clock::{Clock, SystemClock, TimerHandle, TimerQueue, VirtualClock};
pub use cues::{Announcer, Beep, Beeper, CueLog, CueRecord, Cues, Ducking, Silent, Utterance};
pub use engine::{Completion, LiveEngine, Phase};
