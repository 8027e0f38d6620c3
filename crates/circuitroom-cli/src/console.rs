//! Terminal stand-ins for the voice and beeper.
//!
//! Cues go to stderr so the event stream on stdout stays machine readable.

use circuitroom_core::live::{Announcer, Beeper, Cues, Silent, Utterance};
use circuitroom_core::CueError;

pub struct ConsoleVoice;

impl Announcer for ConsoleVoice {
    fn speak(&mut self, text: &str) -> Result<Utterance, CueError> {
        eprintln!("say: {text}");
        Ok(Utterance::Finished)
    }
}

pub struct ConsoleBeeper;

impl Beeper for ConsoleBeeper {
    fn countdown_cue(&mut self) -> Result<(), CueError> {
        eprintln!("beep: countdown");
        Ok(())
    }

    fn go_cue(&mut self) -> Result<(), CueError> {
        eprintln!("beep: go");
        Ok(())
    }

    fn end_cue(&mut self) -> Result<(), CueError> {
        eprintln!("beep: end");
        Ok(())
    }
}

/// Console voice and beeps; there is no music to duck.
pub fn console_cues() -> Cues {
    Cues::new(Box::new(ConsoleVoice), Box::new(ConsoleBeeper), Box::new(Silent))
}
