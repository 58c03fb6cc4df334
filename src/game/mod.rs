//! Game core: letter spawning, tapping and round control.
//!
//! Everything here is plain Rust driven by an explicit millisecond clock, so it
//! runs the same under `cargo test` as inside the browser loop. The browser
//! side (`crate::web`) only feeds `performance.now()` and clicks in and turns
//! the emitted [`GameEvent`]s into sounds.
//!
//! Lifecycle of a round:
//! 1. `start` shuffles the letter multiset and arms the spawn cadence.
//! 2. Every cadence tick appends one letter and arms its expiry timer
//!    (`fall_duration + grace`).
//! 3. The first tick that finds the sequence empty cancels the cadence and arms
//!    the round advance (`repeat_delay`).
//! 4. The advance bumps the round counter and goes back to step 1.
//!
//! `stop` cancels the cadence and the pending advance. Letters already in
//! flight keep their timers and leave on their own.

use std::collections::HashMap;

pub mod letter;
pub mod scheduler;
pub mod spawner;
pub mod store;

pub use letter::{LetterId, LetterToken, Symbol, Timing, TimingPolicy};
pub use scheduler::{Scheduler, TimerId};
pub use spawner::Spawner;
pub use store::LetterStore;

use crate::config::GameConfig;
use crate::error::ConfigError;
use crate::rng::GameRng;

/// Sound the presentation layer should play.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundCue {
    Pop { variant: usize },
    Nice,
    Oops,
    MusicOn,
    MusicOff,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemovalReason {
    Popped,
    Expired,
}

/// Observable outcome of a session step, in the order it happened.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    RoundStarted { round: u32 },
    RoundExhausted { round: u32 },
    Stopped,
    Spawned { id: LetterId, symbol: Symbol },
    Popped { id: LetterId, symbol: Symbol },
    Removed { id: LetterId, reason: RemovalReason },
    Sound(SoundCue),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapOutcome {
    Popped(Symbol),
    /// Unknown id, or the letter is already popping.
    Ignored,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum TimerEvent {
    SpawnTick,
    AdvanceRound { from: u32 },
    Remove { id: LetterId, reason: RemovalReason },
}

/// Removal timers still armed for one letter.
#[derive(Default)]
struct LetterTimers {
    expiry: Option<TimerId>,
    pop: Option<TimerId>,
}

/// Session state and the single timer table behind it.
pub struct GameSession {
    config: GameConfig,
    rng: GameRng,
    scheduler: Scheduler<TimerEvent>,
    letters: LetterStore,
    running: bool,
    current_round: u32,
    music_playing: bool,
    spawner: Option<Spawner>,
    spawn_timer: Option<TimerId>,
    advance_timer: Option<TimerId>,
    letter_timers: HashMap<LetterId, LetterTimers>,
    next_letter_id: u64,
}

impl GameSession {
    /// Validates `config` and builds an idle session whose clock starts at `now`.
    pub fn new(config: GameConfig, now: f64) -> Result<Self, ConfigError> {
        let config = config.validate()?;
        let rng = GameRng::from_seed_option(config.seed);
        Ok(Self {
            config,
            rng,
            scheduler: Scheduler::new(now),
            letters: LetterStore::new(),
            running: false,
            current_round: 0,
            music_playing: false,
            spawner: None,
            spawn_timer: None,
            advance_timer: None,
            letter_timers: HashMap::new(),
            next_letter_id: 0,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn is_music_playing(&self) -> bool {
        self.music_playing
    }

    pub fn letters(&self) -> &LetterStore {
        &self.letters
    }

    pub fn now(&self) -> f64 {
        self.scheduler.now()
    }

    /// Total letters created since the session was built.
    pub fn letters_spawned(&self) -> u64 {
        self.next_letter_id
    }

    /// Letters still to come in the current round.
    pub fn letters_remaining_in_round(&self) -> usize {
        self.spawner.as_ref().map_or(0, Spawner::remaining)
    }

    /// Armed timers of any kind.
    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    /// Idle → Running(1). Ignored while already running.
    pub fn start(&mut self, now: f64, out: &mut Vec<GameEvent>) {
        self.advance(now, out);
        if self.running {
            return;
        }
        self.running = true;
        log::info!("game started");
        self.begin_round(1, out);
    }

    /// Running → Idle, cancelling the spawn cadence and any pending advance.
    pub fn stop(&mut self, now: f64, out: &mut Vec<GameEvent>) {
        self.advance(now, out);
        if !self.running {
            return;
        }
        self.running = false;
        self.cancel_round_timers();
        self.spawner = None;
        log::info!("game stopped in round {}", self.current_round);
        out.push(GameEvent::Stopped);
    }

    /// The start / end button.
    pub fn toggle_running(&mut self, now: f64, out: &mut Vec<GameEvent>) {
        if self.running {
            self.stop(now, out);
        } else {
            self.start(now, out);
        }
    }

    /// Flips the background track flag. Letters and rounds are unaffected.
    pub fn toggle_music(&mut self, out: &mut Vec<GameEvent>) -> bool {
        self.music_playing = !self.music_playing;
        let cue = if self.music_playing { SoundCue::MusicOn } else { SoundCue::MusicOff };
        out.push(GameEvent::Sound(cue));
        self.music_playing
    }

    /// Player tapped letter `id` at `now`.
    pub fn tap(&mut self, id: LetterId, now: f64, out: &mut Vec<GameEvent>) -> TapOutcome {
        self.advance(now, out);
        let symbol = match self.letters.get(id) {
            Some(letter) if !letter.is_popped() => letter.symbol,
            _ => return TapOutcome::Ignored,
        };

        self.letters = std::mem::take(&mut self.letters).popped(id, self.scheduler.now());
        out.push(GameEvent::Popped { id, symbol });

        let variant = self.rng.index(self.config.pop_variants);
        out.push(GameEvent::Sound(SoundCue::Pop { variant }));
        let cue = if symbol.is_target() { SoundCue::Nice } else { SoundCue::Oops };
        out.push(GameEvent::Sound(cue));

        let timer = self.scheduler.schedule_once(
            self.config.pop_removal_ms,
            TimerEvent::Remove { id, reason: RemovalReason::Popped },
        );
        self.letter_timers.entry(id).or_default().pop = Some(timer);
        log::debug!("{id} popped ({})", symbol.as_str());
        TapOutcome::Popped(symbol)
    }

    /// Fires every timer due up to `now`, in order.
    pub fn advance(&mut self, now: f64, out: &mut Vec<GameEvent>) {
        while let Some((_, event)) = self.scheduler.pop_due(now) {
            match event {
                TimerEvent::SpawnTick => self.on_spawn_tick(out),
                TimerEvent::AdvanceRound { from } => self.on_advance_round(from, out),
                TimerEvent::Remove { id, reason } => self.remove_letter(id, reason, out),
            }
        }
        self.scheduler.settle(now);
    }

    fn begin_round(&mut self, round: u32, out: &mut Vec<GameEvent>) {
        self.cancel_round_timers();
        self.current_round = round;
        self.spawner = Some(Spawner::new(
            self.config.total_w,
            self.config.total_z,
            round,
            &mut self.rng,
        ));
        self.spawn_timer = Some(
            self.scheduler
                .schedule_repeating(self.config.spawn_interval_ms, TimerEvent::SpawnTick),
        );
        log::info!("round {round} started");
        out.push(GameEvent::RoundStarted { round });
    }

    fn cancel_round_timers(&mut self) {
        if let Some(id) = self.spawn_timer.take() {
            self.scheduler.cancel(id);
        }
        if let Some(id) = self.advance_timer.take() {
            self.scheduler.cancel(id);
        }
    }

    fn on_spawn_tick(&mut self, out: &mut Vec<GameEvent>) {
        if !self.running {
            return;
        }
        let Some(spawner) = self.spawner.as_mut() else {
            return;
        };
        let now = self.scheduler.now();
        let id = LetterId(self.next_letter_id);
        let emitted = spawner.emit(
            id,
            self.config.max_position_percent,
            self.config.timing,
            &mut self.rng,
            now,
        );

        let Some(token) = emitted else {
            let round = spawner.round();
            if let Some(timer) = self.spawn_timer.take() {
                self.scheduler.cancel(timer);
            }
            self.advance_timer = Some(self.scheduler.schedule_once(
                self.config.repeat_delay_ms,
                TimerEvent::AdvanceRound { from: round },
            ));
            log::debug!("round {round} exhausted");
            out.push(GameEvent::RoundExhausted { round });
            return;
        };

        self.next_letter_id += 1;
        let expiry = self.scheduler.schedule_once(
            token.expiry_after_ms(self.config.expiry_grace_ms),
            TimerEvent::Remove { id, reason: RemovalReason::Expired },
        );
        self.letter_timers.insert(id, LetterTimers { expiry: Some(expiry), pop: None });
        log::debug!("{id} spawned ({}) at {:.1}%", token.symbol.as_str(), token.horizontal_position);
        out.push(GameEvent::Spawned { id, symbol: token.symbol });
        self.letters = std::mem::take(&mut self.letters).appended(token);
    }

    fn on_advance_round(&mut self, from: u32, out: &mut Vec<GameEvent>) {
        self.advance_timer = None;
        if !self.running || from != self.current_round {
            return;
        }
        self.begin_round(from + 1, out);
    }

    fn remove_letter(&mut self, id: LetterId, reason: RemovalReason, out: &mut Vec<GameEvent>) {
        if let Some(timers) = self.letter_timers.remove(&id) {
            for timer in [timers.expiry, timers.pop].into_iter().flatten() {
                self.scheduler.cancel(timer);
            }
        }
        if !self.letters.contains(id) {
            return;
        }
        self.letters = std::mem::take(&mut self.letters).without(id);
        log::debug!("{id} removed ({reason:?})");
        out.push(GameEvent::Removed { id, reason });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> GameSession {
        GameSession::new(GameConfig { seed: Some(99), ..GameConfig::default() }, 0.0).unwrap()
    }

    #[test]
    fn new_rejects_unusable_config() {
        let zero = GameConfig { spawn_interval_ms: 0.0, ..GameConfig::default() };
        assert!(matches!(
            GameSession::new(zero, 0.0),
            Err(ConfigError::InvalidSpawnInterval { .. })
        ));
        let endless = GameConfig { expiry_grace_ms: 1e300, ..GameConfig::default() };
        assert!(matches!(
            GameSession::new(endless, 0.0),
            Err(ConfigError::InvalidDuration { field: "expiry_grace_ms", .. })
        ));
    }

    #[test]
    fn new_session_is_idle() {
        let s = session();
        assert!(!s.is_running());
        assert_eq!(s.current_round(), 0);
        assert!(s.letters().is_empty());
        assert_eq!(s.pending_timers(), 0);
    }

    #[test]
    fn first_letter_arrives_one_interval_after_start() {
        let mut s = session();
        let mut out = Vec::new();
        s.start(0.0, &mut out);
        assert_eq!(out, vec![GameEvent::RoundStarted { round: 1 }]);
        s.advance(799.0, &mut out);
        assert!(s.letters().is_empty());
        s.advance(800.0, &mut out);
        assert_eq!(s.letters().len(), 1);
        assert_eq!(s.letters().iter().next().unwrap().spawned_at, 800.0);
    }

    #[test]
    fn double_start_is_ignored() {
        let mut s = session();
        let mut out = Vec::new();
        s.start(0.0, &mut out);
        s.start(100.0, &mut out);
        assert_eq!(out.len(), 1);
        // cadence and nothing else
        assert_eq!(s.pending_timers(), 1);
    }

    #[test]
    fn stale_advance_is_ignored() {
        let mut s = session();
        let mut out = Vec::new();
        s.start(0.0, &mut out);
        s.on_advance_round(7, &mut out);
        assert_eq!(s.current_round(), 1);
    }

    #[test]
    fn removal_cancels_sibling_timer() {
        let mut s = session();
        let mut out = Vec::new();
        s.start(0.0, &mut out);
        s.advance(800.0, &mut out);
        let id = s.letters().iter().next().unwrap().id;
        s.tap(id, 900.0, &mut out);
        // cadence + expiry + pop removal
        assert_eq!(s.pending_timers(), 3);
        s.advance(1_300.0, &mut out);
        assert!(s.letter_timers.is_empty());
        assert_eq!(s.pending_timers(), 1);
    }
}
