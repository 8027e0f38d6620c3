//! Live session engine.
//!
//! A wall-clock-based state machine with no internal thread. The driver calls
//! `tick()` a few times per second; every phase keeps an absolute deadline, so
//! late or irregular ticks never stretch a phase.
//!
//! ## Phase Transitions
//!
//! ```text
//! Countdown -> Exercise -> (Rest -> Exercise)* -> Finished
//! ```
//!
//! Pausing freezes the remaining seconds; resuming re-arms the deadline from
//! the frozen value. Skip ends the current exercise early and manual finish
//! ends the run from any phase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::clock::{Clock, SystemClock, TimerQueue};
use super::cues::{Beep, Cues};
use crate::error::ValidationError;
use crate::events::Event;
use crate::session::{Session, SessionExercise};
use crate::storage::CueConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Countdown,
    Exercise,
    Rest,
    Finished,
}

/// Outcome of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    /// Seconds from the first go cue to the finish, rounded.
    pub elapsed_secs: u64,
    /// False when the run was ended manually.
    pub completed_all: bool,
}

pub struct LiveEngine<C: Clock = SystemClock> {
    clock: C,
    exercises: Vec<SessionExercise>,
    rest_duration_sec: u32,
    cue_config: CueConfig,
    cues: Cues,
    phase: Phase,
    started: bool,
    index: usize,
    /// Absolute end of the current phase (epoch milliseconds). Stale while paused.
    deadline_ms: u64,
    time_left: u32,
    phase_total: u32,
    /// Last countdown number that got a cue.
    countdown_cued: u32,
    /// Remaining seconds captured at pause.
    frozen: Option<u32>,
    session_start_ms: u64,
    /// Delayed announcements.
    delayed: TimerQueue<String>,
    completion: Option<Completion>,
}

impl<C: Clock> LiveEngine<C> {
    /// Create an engine for `session`. It stays idle until [`start`](Self::start).
    pub fn new(
        session: &Session,
        cue_config: CueConfig,
        cues: Cues,
        clock: C,
    ) -> Result<Self, ValidationError> {
        if session.exercises.is_empty() {
            return Err(ValidationError::EmptyCollection("session exercises".into()));
        }
        let now = clock.now_ms();
        Ok(Self {
            exercises: session.exercises.clone(),
            rest_duration_sec: session.settings.rest_duration_sec,
            time_left: cue_config.countdown_secs,
            phase_total: cue_config.countdown_secs,
            countdown_cued: cue_config.countdown_secs,
            cue_config,
            cues,
            phase: Phase::Countdown,
            started: false,
            index: 0,
            deadline_ms: now,
            frozen: None,
            session_start_ms: now,
            delayed: TimerQueue::new(),
            completion: None,
            clock,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Whole seconds left in the current phase, rounded up.
    pub fn time_left_secs(&self) -> u32 {
        self.time_left
    }

    pub fn is_paused(&self) -> bool {
        self.frozen.is_some()
    }

    pub fn is_finished(&self) -> bool {
        self.completion.is_some()
    }

    pub fn completion(&self) -> Option<Completion> {
        self.completion
    }

    pub fn current_exercise(&self) -> Option<&SessionExercise> {
        self.exercises.get(self.index)
    }

    pub fn next_exercise(&self) -> Option<&SessionExercise> {
        self.exercises.get(self.index + 1)
    }

    pub fn exercises(&self) -> &[SessionExercise] {
        &self.exercises
    }

    pub fn cues(&self) -> &Cues {
        &self.cues
    }

    /// Whether the driver should keep ticking.
    pub fn needs_tick(&self) -> bool {
        self.started && self.completion.is_none()
    }

    /// 0.0 .. 100.0 through the exercise list.
    pub fn progress_pct(&self) -> f64 {
        match self.phase {
            Phase::Countdown => 0.0,
            Phase::Finished => 100.0,
            Phase::Exercise | Phase::Rest => {
                (self.index + 1) as f64 / self.exercises.len() as f64 * 100.0
            }
        }
    }

    pub fn snapshot(&self) -> Event {
        let current = self.current_exercise();
        Event::StateSnapshot {
            phase: self.phase,
            paused: self.is_paused(),
            index: self.index,
            exercise_name: current.map(|e| e.name.clone()).unwrap_or_default(),
            is_extreme: current.is_some_and(|e| e.is_extreme),
            time_left_secs: self.time_left,
            total_secs: self.phase_total,
            next_exercise: self.next_exercise().map(|e| e.name.clone()),
            progress_pct: self.progress_pct(),
            at: at(self.clock.now_ms()),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin the pre-start countdown.
    pub fn start(&mut self) -> Option<Event> {
        if self.started {
            return None;
        }
        self.started = true;
        let now = self.clock.now_ms();
        self.session_start_ms = now;

        let secs = self.cue_config.countdown_secs;
        if secs == 0 {
            return Some(self.begin_exercises(now));
        }
        self.enter(Phase::Countdown, secs, now);
        self.countdown_cued = secs;
        self.cues.beep(Beep::Countdown);
        tracing::debug!(secs, "countdown started");
        Some(Event::CountdownStarted { secs, at: at(now) })
    }

    /// Advance against the clock. Fires due announcements even while paused.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.needs_tick() {
            return None;
        }
        let now = self.clock.now_ms();
        for text in self.delayed.take_due(now) {
            self.cues.speak(&text);
        }
        if self.frozen.is_some() {
            return None;
        }

        let remaining = secs_until(self.deadline_ms, now);
        match self.phase {
            Phase::Countdown => {
                if remaining == 0 {
                    return Some(self.begin_exercises(now));
                }
                self.time_left = remaining;
                if remaining < self.countdown_cued {
                    self.countdown_cued = remaining;
                    self.cues.beep(Beep::Countdown);
                    return Some(Event::CountdownTick {
                        remaining_secs: remaining,
                        at: at(now),
                    });
                }
                None
            }
            Phase::Exercise => {
                self.time_left = remaining;
                (remaining == 0).then(|| self.end_exercise(now))
            }
            Phase::Rest => {
                self.time_left = remaining;
                (remaining == 0).then(|| self.end_rest(now))
            }
            Phase::Finished => None,
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.needs_tick() || self.frozen.is_some() {
            return None;
        }
        let now = self.clock.now_ms();
        let remaining = secs_until(self.deadline_ms, now);
        self.frozen = Some(remaining);
        self.time_left = remaining;
        self.cues.hold();
        tracing::debug!(remaining, phase = ?self.phase, "paused");
        Some(Event::Paused {
            remaining_secs: remaining,
            at: at(now),
        })
    }

    pub fn resume(&mut self) -> Option<Event> {
        let remaining = self.frozen.take()?;
        let now = self.clock.now_ms();
        self.deadline_ms = now.saturating_add(u64::from(remaining) * 1000);
        self.time_left = remaining;
        self.cues.release();
        tracing::debug!(remaining, "resumed");
        Some(Event::Resumed {
            remaining_secs: remaining,
            at: at(now),
        })
    }

    pub fn toggle_pause(&mut self) -> Option<Event> {
        if self.is_paused() {
            self.resume()
        } else {
            self.pause()
        }
    }

    /// End the current exercise now. Only valid during an exercise.
    pub fn skip(&mut self) -> Option<Event> {
        if self.phase != Phase::Exercise || self.completion.is_some() {
            return None;
        }
        let now = self.clock.now_ms();
        tracing::debug!(index = self.index, "exercise skipped");
        Some(self.end_exercise(now))
    }

    /// End the run early. Cuts speech off and releases all ducking.
    pub fn finish(&mut self) -> Option<Event> {
        if self.completion.is_some() {
            return None;
        }
        let now = self.clock.now_ms();
        self.cues.stop_all();
        Some(self.complete(now, false))
    }

    /// Report that a pending announcement has finished playing.
    pub fn speech_finished(&mut self) {
        self.cues.speech_finished();
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn begin_exercises(&mut self, now: u64) -> Event {
        self.cues.beep(Beep::Go);
        self.session_start_ms = now;
        self.index = 0;
        let duration = self.exercises[0].duration_sec;
        self.enter(Phase::Exercise, duration, now);
        self.announce(0, false, now);
        self.phase_event(Phase::Exercise, 0, now)
    }

    fn end_exercise(&mut self, now: u64) -> Event {
        self.cues.beep(Beep::End);
        let next = self.index + 1;
        if next >= self.exercises.len() {
            let event = self.complete(now, true);
            self.cues.speak(&self.cue_config.phrases.finished);
            return event;
        }
        self.enter(Phase::Rest, self.rest_duration_sec, now);
        self.announce(next, true, now);
        self.phase_event(Phase::Rest, next, now)
    }

    fn end_rest(&mut self, now: u64) -> Event {
        self.cues.beep(Beep::Go);
        self.index += 1;
        let duration = self.exercises[self.index].duration_sec;
        self.enter(Phase::Exercise, duration, now);
        self.phase_event(Phase::Exercise, self.index, now)
    }

    fn enter(&mut self, phase: Phase, duration_sec: u32, now: u64) {
        self.phase = phase;
        self.phase_total = duration_sec;
        self.time_left = duration_sec;
        match self.frozen.as_mut() {
            Some(frozen) => *frozen = duration_sec,
            None => self.deadline_ms = now.saturating_add(u64::from(duration_sec) * 1000),
        }
    }

    /// Extreme rounds are announced in two stages: the phrase now, the name
    /// after a short delay.
    fn announce(&mut self, index: usize, upcoming: bool, now: u64) {
        let exercise = &self.exercises[index];
        if exercise.is_extreme {
            self.cues.speak(&self.cue_config.phrases.extreme);
            self.delayed.schedule(
                now.saturating_add(self.cue_config.extreme_name_delay_ms),
                exercise.name.clone(),
            );
        } else if upcoming {
            let text = format!("{}{}", self.cue_config.phrases.next_prefix, exercise.name);
            self.cues.speak(&text);
        } else {
            self.cues.speak(&exercise.name);
        }
    }

    fn complete(&mut self, now: u64, completed_all: bool) -> Event {
        self.delayed.cancel_all();
        if self.frozen.take().is_some() {
            self.cues.release();
        }
        self.phase = Phase::Finished;
        self.time_left = 0;

        let elapsed_secs = (now.saturating_sub(self.session_start_ms) + 500) / 1000;
        self.completion = Some(Completion {
            elapsed_secs,
            completed_all,
        });
        tracing::info!(elapsed_secs, completed_all, "live session finished");
        Event::SessionFinished {
            elapsed_secs,
            completed_all,
            at: at(now),
        }
    }

    fn phase_event(&self, phase: Phase, index: usize, now: u64) -> Event {
        let exercise = &self.exercises[index];
        Event::PhaseStarted {
            phase,
            index,
            exercise_name: exercise.name.clone(),
            is_extreme: exercise.is_extreme,
            duration_secs: self.phase_total,
            at: at(now),
        }
    }
}

impl<C: Clock> std::fmt::Debug for LiveEngine<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveEngine")
            .field("phase", &self.phase)
            .field("index", &self.index)
            .field("time_left", &self.time_left)
            .field("paused", &self.is_paused())
            .field("completion", &self.completion)
            .finish_non_exhaustive()
    }
}

fn secs_until(deadline_ms: u64, now_ms: u64) -> u32 {
    deadline_ms.saturating_sub(now_ms).div_ceil(1000) as u32
}

fn at(now_ms: u64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(now_ms as i64).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CueError;
    use crate::live::clock::VirtualClock;
    use crate::live::cues::{Announcer, Beeper, CueLog, CueRecord, Ducking, Utterance};
    use crate::session::SessionSettings;

    const START_MS: u64 = 1_700_000_000_000;

    fn session(items: &[(&str, u32, bool)]) -> Session {
        let exercises = items
            .iter()
            .enumerate()
            .map(|(i, (name, duration_sec, is_extreme))| SessionExercise {
                exercise_id: format!("ex-{i}"),
                name: (*name).to_string(),
                duration_sec: *duration_sec,
                is_extreme: *is_extreme,
                order: i,
                rom_cm: 40.0,
                reps_per_40s: 12.0,
                dumbbells_used: 2,
                vertical_factor: 0.5,
            })
            .collect();
        Session {
            id: "s1".into(),
            date: DateTime::from_timestamp_millis(START_MS as i64).unwrap(),
            participants: vec![],
            participant_names: vec![],
            exercises,
            settings: SessionSettings::default(),
            completed: false,
            total_duration_sec: 0,
            total_meters: 0.0,
            total_work_kj: 0.0,
        }
    }

    fn engine(items: &[(&str, u32, bool)]) -> (LiveEngine<VirtualClock>, VirtualClock, CueLog) {
        let clock = VirtualClock::new(START_MS);
        let log = CueLog::new();
        let engine = LiveEngine::new(
            &session(items),
            CueConfig::default(),
            Cues::recording(&log),
            clock.clone(),
        )
        .unwrap();
        (engine, clock, log)
    }

    /// Start and run through the countdown into the first exercise.
    fn started(items: &[(&str, u32, bool)]) -> (LiveEngine<VirtualClock>, VirtualClock, CueLog) {
        let (mut e, clock, log) = engine(items);
        e.start();
        clock.advance_secs(3);
        e.tick();
        (e, clock, log)
    }

    #[test]
    fn countdown_then_first_exercise() {
        let (mut e, clock, log) = engine(&[("Curls", 40, false), ("Rows", 40, false)]);
        assert!(matches!(e.start(), Some(Event::CountdownStarted { secs: 3, .. })));
        assert!(e.start().is_none());

        clock.advance_secs(1);
        assert!(matches!(
            e.tick(),
            Some(Event::CountdownTick { remaining_secs: 2, .. })
        ));
        assert!(e.tick().is_none());
        clock.advance_secs(1);
        assert!(e.tick().is_some());
        clock.advance_secs(1);

        match e.tick() {
            Some(Event::PhaseStarted {
                phase,
                index,
                duration_secs,
                ..
            }) => {
                assert_eq!(phase, Phase::Exercise);
                assert_eq!(index, 0);
                assert_eq!(duration_secs, 40);
            }
            other => panic!("expected PhaseStarted, got {other:?}"),
        }
        assert_eq!(e.time_left_secs(), 40);
        assert_eq!(
            log.beeps(),
            vec![Beep::Countdown, Beep::Countdown, Beep::Countdown, Beep::Go]
        );
        assert_eq!(log.spoken(), vec!["Curls".to_string()]);
    }

    #[test]
    fn skip_moves_to_rest_then_finishes() {
        let (mut e, clock, log) = started(&[("Curls", 40, false), ("Rows", 40, false)]);

        assert!(matches!(
            e.skip(),
            Some(Event::PhaseStarted { phase: Phase::Rest, index: 1, .. })
        ));
        assert_eq!(e.phase(), Phase::Rest);
        assert_eq!(e.time_left_secs(), 5);
        assert_eq!(e.index(), 0);
        assert!(log.spoken().contains(&"Nächste Übung: Rows".to_string()));
        assert!(e.skip().is_none());

        clock.advance_secs(5);
        assert!(matches!(
            e.tick(),
            Some(Event::PhaseStarted { phase: Phase::Exercise, index: 1, .. })
        ));

        clock.advance_secs(12);
        match e.skip() {
            Some(Event::SessionFinished {
                elapsed_secs,
                completed_all,
                ..
            }) => {
                assert_eq!(elapsed_secs, 17);
                assert!(completed_all);
            }
            other => panic!("expected SessionFinished, got {other:?}"),
        }
        assert_eq!(e.phase(), Phase::Finished);
        assert_eq!(log.spoken().last().map(String::as_str), Some("Fertig! Gute Arbeit!"));
        assert!(e.tick().is_none());
        assert!(e.finish().is_none());
    }

    #[test]
    fn runs_to_completion_on_ticks_alone() {
        let (mut e, clock, _log) = started(&[("Curls", 10, false), ("Rows", 10, false)]);
        let mut finished = 0;
        for _ in 0..(4 * 40) {
            clock.advance_ms(250);
            if let Some(Event::SessionFinished { elapsed_secs, .. }) = e.tick() {
                finished += 1;
                assert_eq!(elapsed_secs, 25);
            }
        }
        assert_eq!(finished, 1);
        assert!(!e.needs_tick());
    }

    #[test]
    fn pause_and_resume_preserve_remaining() {
        let (mut e, clock, _log) = started(&[("Curls", 40, false), ("Rows", 40, false)]);
        clock.advance_ms(10_400);
        e.tick();
        assert_eq!(e.time_left_secs(), 30);

        assert!(matches!(e.pause(), Some(Event::Paused { remaining_secs: 30, .. })));
        assert!(e.pause().is_none());
        clock.advance_secs(100);
        assert!(e.tick().is_none());
        assert_eq!(e.time_left_secs(), 30);

        assert!(matches!(e.resume(), Some(Event::Resumed { remaining_secs: 30, .. })));
        assert!(e.resume().is_none());
        assert_eq!(e.time_left_secs(), 30);

        clock.advance_secs(30);
        assert!(matches!(
            e.tick(),
            Some(Event::PhaseStarted { phase: Phase::Rest, .. })
        ));
    }

    #[test]
    fn skip_while_paused_stays_paused() {
        let (mut e, clock, _log) = started(&[("Curls", 40, false), ("Rows", 40, false)]);
        e.pause();
        e.skip();
        assert_eq!(e.phase(), Phase::Rest);
        assert!(e.is_paused());

        clock.advance_secs(60);
        assert!(e.tick().is_none());
        assert!(matches!(e.resume(), Some(Event::Resumed { remaining_secs: 5, .. })));
    }

    #[test]
    fn late_ticks_follow_the_wall_clock() {
        let (mut e, clock, _log) = started(&[("Curls", 40, false), ("Rows", 40, false)]);
        clock.advance_ms(17_300);
        assert!(e.tick().is_none());
        assert_eq!(e.time_left_secs(), 23);

        clock.advance_secs(30);
        assert!(matches!(
            e.tick(),
            Some(Event::PhaseStarted { phase: Phase::Rest, .. })
        ));
    }

    #[test]
    fn extreme_is_announced_in_two_stages() {
        let (mut e, clock, log) = started(&[("Burpees", 60, true), ("Rows", 40, false)]);
        assert_eq!(log.spoken(), vec!["Extreme!".to_string()]);

        clock.advance_ms(1_000);
        e.tick();
        assert_eq!(log.spoken().len(), 1);

        clock.advance_ms(200);
        e.tick();
        assert_eq!(log.spoken(), vec!["Extreme!".to_string(), "Burpees".to_string()]);
    }

    #[test]
    fn delayed_name_fires_while_paused() {
        let (mut e, clock, log) = started(&[("Curls", 40, false), ("Burpees", 60, true)]);
        e.skip();
        e.pause();
        clock.advance_ms(1_200);
        e.tick();
        assert_eq!(
            log.spoken(),
            vec!["Curls".to_string(), "Extreme!".to_string(), "Burpees".to_string()]
        );
    }

    #[test]
    fn finish_cancels_pending_announcements() {
        let (mut e, clock, log) = started(&[("Burpees", 60, true)]);
        clock.advance_secs(10);
        match e.finish() {
            Some(Event::SessionFinished {
                elapsed_secs,
                completed_all,
                ..
            }) => {
                assert_eq!(elapsed_secs, 10);
                assert!(!completed_all);
            }
            other => panic!("expected SessionFinished, got {other:?}"),
        }
        assert!(e.finish().is_none());
        clock.advance_secs(5);
        e.tick();
        assert_eq!(log.spoken(), vec!["Extreme!".to_string()]);
        assert!(log.records().contains(&CueRecord::StopSpeech));
    }

    #[test]
    fn pause_ducks_until_resume() {
        let (mut e, _clock, log) = started(&[("Curls", 40, false)]);
        log.clear();
        e.pause();
        assert_eq!(e.cues().duck_holds(), 1);
        e.resume();
        assert_eq!(e.cues().duck_holds(), 0);
        assert_eq!(log.records(), vec![CueRecord::Duck, CueRecord::Unduck]);
    }

    #[test]
    fn finish_while_paused_releases_ducking() {
        let (mut e, _clock, _log) = started(&[("Curls", 40, false)]);
        e.pause();
        e.finish();
        assert_eq!(e.cues().duck_holds(), 0);
        assert!(!e.is_paused());
    }

    struct Failing;

    impl Announcer for Failing {
        fn speak(&mut self, _text: &str) -> Result<Utterance, CueError> {
            Err(CueError::new("announcer", "speech engine unavailable"))
        }
    }

    impl Beeper for Failing {
        fn countdown_cue(&mut self) -> Result<(), CueError> {
            Err(CueError::new("beeper", "no audio output"))
        }
        fn go_cue(&mut self) -> Result<(), CueError> {
            Err(CueError::new("beeper", "no audio output"))
        }
        fn end_cue(&mut self) -> Result<(), CueError> {
            Err(CueError::new("beeper", "no audio output"))
        }
    }

    impl Ducking for Failing {
        fn duck(&mut self) -> Result<(), CueError> {
            Err(CueError::new("ducking", "no music player"))
        }
        fn unduck(&mut self) -> Result<(), CueError> {
            Err(CueError::new("ducking", "no music player"))
        }
    }

    #[test]
    fn failing_cues_do_not_interrupt_the_timeline() {
        let clock = VirtualClock::new(START_MS);
        let cues = Cues::new(Box::new(Failing), Box::new(Failing), Box::new(Failing));
        let mut e = LiveEngine::new(
            &session(&[("Burpees", 10, true), ("Rows", 10, false)]),
            CueConfig::default(),
            cues,
            clock.clone(),
        )
        .unwrap();

        e.start();
        e.pause();
        e.resume();
        for _ in 0..40 {
            clock.advance_secs(1);
            e.tick();
        }
        assert_eq!(
            e.completion(),
            Some(Completion {
                elapsed_secs: 25,
                completed_all: true
            })
        );
    }

    #[test]
    fn snapshot_reports_progress() {
        let (mut e, _clock, _log) = started(&[("Curls", 40, false), ("Rows", 40, false)]);
        e.pause();
        match e.snapshot() {
            Event::StateSnapshot {
                phase,
                paused,
                exercise_name,
                next_exercise,
                progress_pct,
                time_left_secs,
                ..
            } => {
                assert_eq!(phase, Phase::Exercise);
                assert!(paused);
                assert_eq!(exercise_name, "Curls");
                assert_eq!(next_exercise.as_deref(), Some("Rows"));
                assert_eq!(progress_pct, 50.0);
                assert_eq!(time_left_secs, 40);
            }
            other => panic!("expected StateSnapshot, got {other:?}"),
        }
    }

    #[test]
    fn zero_countdown_starts_immediately() {
        let clock = VirtualClock::new(START_MS);
        let config = CueConfig {
            countdown_secs: 0,
            ..CueConfig::default()
        };
        let mut e = LiveEngine::new(
            &session(&[("Curls", 40, false)]),
            config,
            Cues::silent(),
            clock,
        )
        .unwrap();
        assert!(matches!(
            e.start(),
            Some(Event::PhaseStarted { phase: Phase::Exercise, .. })
        ));
    }

    #[test]
    fn pause_between_countdown_ticks_keeps_every_cue() {
        let (mut e, clock, log) = engine(&[("Curls", 40, false)]);
        e.start();
        clock.advance_ms(1_200);
        assert!(matches!(e.pause(), Some(Event::Paused { remaining_secs: 2, .. })));
        clock.advance_secs(10);
        e.resume();

        assert!(matches!(
            e.tick(),
            Some(Event::CountdownTick { remaining_secs: 2, .. })
        ));
        clock.advance_secs(1);
        assert!(matches!(
            e.tick(),
            Some(Event::CountdownTick { remaining_secs: 1, .. })
        ));
        clock.advance_secs(1);
        assert!(matches!(e.tick(), Some(Event::PhaseStarted { .. })));
        assert_eq!(
            log.beeps(),
            vec![Beep::Countdown, Beep::Countdown, Beep::Countdown, Beep::Go]
        );
    }

    #[test]
    fn huge_name_delay_never_fires_early() {
        let clock = VirtualClock::new(START_MS);
        let log = CueLog::new();
        let cue_config = CueConfig {
            extreme_name_delay_ms: u64::MAX,
            ..CueConfig::default()
        };
        let mut e = LiveEngine::new(
            &session(&[("Burpees", 60, true)]),
            cue_config,
            Cues::recording(&log),
            clock.clone(),
        )
        .unwrap();
        e.start();
        clock.advance_secs(3);
        e.tick();
        clock.advance_secs(30);
        e.tick();
        assert_eq!(log.spoken(), vec!["Extreme!".to_string()]);
    }

    #[test]
    fn empty_session_is_rejected() {
        let result = LiveEngine::new(
            &session(&[]),
            CueConfig::default(),
            Cues::silent(),
            VirtualClock::new(0),
        );
        assert!(matches!(result, Err(ValidationError::EmptyCollection(_))));
    }
}
