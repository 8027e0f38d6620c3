//! Audio collaborators: voice, beeps, background-music ducking.
//!
//! All calls are fire-and-forget. A failing collaborator is logged and the
//! engine's timeline carries on.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::CueError;

/// Whether an announcement is still being spoken when `speak` returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Utterance {
    Finished,
    /// The caller reports the end through `LiveEngine::speech_finished`.
    Pending,
}

pub trait Announcer {
    fn speak(&mut self, text: &str) -> Result<Utterance, CueError>;

    /// Cut off anything being spoken.
    fn stop(&mut self) -> Result<(), CueError> {
        Ok(())
    }
}

pub trait Beeper {
    fn countdown_cue(&mut self) -> Result<(), CueError>;
    fn go_cue(&mut self) -> Result<(), CueError>;
    fn end_cue(&mut self) -> Result<(), CueError>;
}

pub trait Ducking {
    fn duck(&mut self) -> Result<(), CueError>;
    fn unduck(&mut self) -> Result<(), CueError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Beep {
    Countdown,
    Go,
    End,
}

/// Does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Announcer for Silent {
    fn speak(&mut self, _text: &str) -> Result<Utterance, CueError> {
        Ok(Utterance::Finished)
    }
}

impl Beeper for Silent {
    fn countdown_cue(&mut self) -> Result<(), CueError> {
        Ok(())
    }
    fn go_cue(&mut self) -> Result<(), CueError> {
        Ok(())
    }
    fn end_cue(&mut self) -> Result<(), CueError> {
        Ok(())
    }
}

impl Ducking for Silent {
    fn duck(&mut self) -> Result<(), CueError> {
        Ok(())
    }
    fn unduck(&mut self) -> Result<(), CueError> {
        Ok(())
    }
}

/// One recorded collaborator call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cue", content = "text", rename_all = "snake_case")]
pub enum CueRecord {
    Speak(String),
    StopSpeech,
    Beep(Beep),
    Duck,
    Unduck,
}

/// Collaborator that records every call into a shared log. Clones share the log.
#[derive(Debug, Clone, Default)]
pub struct CueLog {
    records: Rc<RefCell<Vec<CueRecord>>>,
}

impl CueLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<CueRecord> {
        self.records.borrow().clone()
    }

    /// Texts passed to `speak`, in order.
    pub fn spoken(&self) -> Vec<String> {
        self.records
            .borrow()
            .iter()
            .filter_map(|r| match r {
                CueRecord::Speak(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn beeps(&self) -> Vec<Beep> {
        self.records
            .borrow()
            .iter()
            .filter_map(|r| match r {
                CueRecord::Beep(b) => Some(*b),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.records.borrow_mut().clear();
    }

    fn push(&self, record: CueRecord) {
        self.records.borrow_mut().push(record);
    }
}

impl Announcer for CueLog {
    fn speak(&mut self, text: &str) -> Result<Utterance, CueError> {
        self.push(CueRecord::Speak(text.to_string()));
        Ok(Utterance::Finished)
    }

    fn stop(&mut self) -> Result<(), CueError> {
        self.push(CueRecord::StopSpeech);
        Ok(())
    }
}

impl Beeper for CueLog {
    fn countdown_cue(&mut self) -> Result<(), CueError> {
        self.push(CueRecord::Beep(Beep::Countdown));
        Ok(())
    }
    fn go_cue(&mut self) -> Result<(), CueError> {
        self.push(CueRecord::Beep(Beep::Go));
        Ok(())
    }
    fn end_cue(&mut self) -> Result<(), CueError> {
        self.push(CueRecord::Beep(Beep::End));
        Ok(())
    }
}

impl Ducking for CueLog {
    fn duck(&mut self) -> Result<(), CueError> {
        self.push(CueRecord::Duck);
        Ok(())
    }
    fn unduck(&mut self) -> Result<(), CueError> {
        self.push(CueRecord::Unduck);
        Ok(())
    }
}

/// The engine's view of its collaborators.
///
/// Ducking is reference counted: pause and every in-flight announcement hold
/// the music down, and it comes back up when the last hold is released.
pub struct Cues {
    announcer: Box<dyn Announcer>,
    beeper: Box<dyn Beeper>,
    ducking: Box<dyn Ducking>,
    duck_holds: u32,
}

impl Cues {
    pub fn new(
        announcer: Box<dyn Announcer>,
        beeper: Box<dyn Beeper>,
        ducking: Box<dyn Ducking>,
    ) -> Self {
        Self {
            announcer,
            beeper,
            ducking,
            duck_holds: 0,
        }
    }

    pub fn silent() -> Self {
        Self::new(Box::new(Silent), Box::new(Silent), Box::new(Silent))
    }

    /// All three roles backed by one recording log.
    pub fn recording(log: &CueLog) -> Self {
        Self::new(
            Box::new(log.clone()),
            Box::new(log.clone()),
            Box::new(log.clone()),
        )
    }

    pub fn duck_holds(&self) -> u32 {
        self.duck_holds
    }

    pub(crate) fn speak(&mut self, text: &str) {
        self.hold();
        match self.announcer.speak(text) {
            Ok(Utterance::Pending) => {}
            Ok(Utterance::Finished) => self.release(),
            Err(e) => {
                tracing::warn!("{e}");
                self.release();
            }
        }
    }

    pub(crate) fn speech_finished(&mut self) {
        self.release();
    }

    pub(crate) fn beep(&mut self, beep: Beep) {
        let result = match beep {
            Beep::Countdown => self.beeper.countdown_cue(),
            Beep::Go => self.beeper.go_cue(),
            Beep::End => self.beeper.end_cue(),
        };
        if let Err(e) = result {
            tracing::warn!("{e}");
        }
    }

    pub(crate) fn hold(&mut self) {
        if self.duck_holds == 0 {
            if let Err(e) = self.ducking.duck() {
                tracing::warn!("{e}");
            }
        }
        self.duck_holds += 1;
    }

    pub(crate) fn release(&mut self) {
        if self.duck_holds == 0 {
            return;
        }
        self.duck_holds -= 1;
        if self.duck_holds == 0 {
            if let Err(e) = self.ducking.unduck() {
                tracing::warn!("{e}");
            }
        }
    }

    /// Stop speech and drop every hold.
    pub(crate) fn stop_all(&mut self) {
        if let Err(e) = self.announcer.stop() {
            tracing::warn!("{e}");
        }
        if self.duck_holds > 0 {
            self.duck_holds = 0;
            if let Err(e) = self.ducking.unduck() {
                tracing::warn!("{e}");
            }
        }
    }
}

impl std::fmt::Debug for Cues {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cues")
            .field("duck_holds", &self.duck_holds)
            .finish_non_exhaustive()
    }
}
