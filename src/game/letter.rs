//! Letter tokens and the timing policies that stamp them.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::rng::GameRng;

/// The two letters that can rise. W is the one the player should tap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Symbol {
    W,
    Z,
}

impl Symbol {
    pub fn as_str(self) -> &'static str {
        match self {
            Symbol::W => "W",
            Symbol::Z => "Z",
        }
    }

    pub fn is_target(self) -> bool {
        matches!(self, Symbol::W)
    }

    /// Label shown above a popped letter.
    pub fn reaction(self) -> &'static str {
        match self {
            Symbol::W => "Nice!",
            Symbol::Z => "Oops!",
        }
    }
}

/// Session-unique letter id. Never reused, even across rounds or restarts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LetterId(pub u64);

impl fmt::Display for LetterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "letter-{}", self.0)
    }
}

/// Rise animation timing, in seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timing {
    pub fall_duration: f64,
    pub entry_delay: f64,
}

/// How a fresh letter's rise timing is chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TimingPolicy {
    /// Duration in `[4, 7)` s and delay in `[0, 0.45)` s, independent of position.
    Random,
    /// Letters further right rise slower and start later.
    #[default]
    PositionDerived,
}

impl TimingPolicy {
    pub fn timing(self, horizontal_position: f64, rng: &mut GameRng) -> Timing {
        match self {
            TimingPolicy::Random => Timing {
                fall_duration: rng.range_f64(4.0, 7.0),
                entry_delay: rng.range_f64(0.0, 0.45),
            },
            TimingPolicy::PositionDerived => {
                let frac = horizontal_position / 100.0;
                Timing { fall_duration: 4.0 + frac * 1.5, entry_delay: frac * 0.5 }
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LetterToken {
    pub id: LetterId,
    pub symbol: Symbol,
    /// Percent offset across the play area.
    pub horizontal_position: f64,
    pub fall_duration: f64,
    pub entry_delay: f64,
    pub round: u32,
    pub spawned_at: f64,
    popped_at: Option<f64>,
}

impl LetterToken {
    pub fn new(
        id: LetterId,
        symbol: Symbol,
        horizontal_position: f64,
        timing: Timing,
        round: u32,
        spawned_at: f64,
    ) -> Self {
        Self {
            id,
            symbol,
            horizontal_position,
            fall_duration: timing.fall_duration,
            entry_delay: timing.entry_delay,
            round,
            spawned_at,
            popped_at: None,
        }
    }

    pub fn is_popped(&self) -> bool {
        self.popped_at.is_some()
    }

    pub fn popped_at(&self) -> Option<f64> {
        self.popped_at
    }

    /// Returns the token marked popped at `now`. An already popped token keeps
    /// its first pop time.
    pub fn into_popped(self, now: f64) -> Self {
        Self { popped_at: self.popped_at.or(Some(now)), ..self }
    }

    /// Natural expiry delay after creation, in ms.
    pub fn expiry_after_ms(&self, grace_ms: f64) -> f64 {
        self.fall_duration * 1_000.0 + grace_ms
    }

    /// Rise progress in `[0, 1]` at `now`; frozen at the pop instant once popped.
    pub fn rise_progress(&self, now: f64) -> f64 {
        let at = self.popped_at.map_or(now, |p| p.min(now));
        let elapsed_s = (at - self.spawned_at) / 1_000.0 - self.entry_delay;
        if self.fall_duration <= 0.0 {
            return 1.0;
        }
        (elapsed_s / self.fall_duration).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(popped_at: Option<f64>) -> LetterToken {
        let mut t = LetterToken::new(
            LetterId(1),
            Symbol::W,
            40.0,
            Timing { fall_duration: 4.0, entry_delay: 0.0 },
            1,
            1_000.0,
        );
        if let Some(p) = popped_at {
            t = t.into_popped(p);
        }
        t
    }

    #[test]
    fn position_derived_timing() {
        let mut rng = GameRng::seeded(1);
        let t = TimingPolicy::PositionDerived.timing(80.0, &mut rng);
        assert!((t.fall_duration - 5.2).abs() < 1e-9);
        assert!((t.entry_delay - 0.4).abs() < 1e-9);
        let t = TimingPolicy::PositionDerived.timing(0.0, &mut rng);
        assert_eq!(t, Timing { fall_duration: 4.0, entry_delay: 0.0 });
    }

    #[test]
    fn random_timing_stays_in_range() {
        let mut rng = GameRng::seeded(3);
        for _ in 0..200 {
            let t = TimingPolicy::Random.timing(10.0, &mut rng);
            assert!((4.0..7.0).contains(&t.fall_duration));
            assert!((0.0..0.45).contains(&t.entry_delay));
        }
    }

    #[test]
    fn pop_time_is_set_once() {
        let t = token(Some(1_500.0)).into_popped(2_000.0);
        assert_eq!(t.popped_at(), Some(1_500.0));
        assert!(t.is_popped());
        assert!(!token(None).is_popped());
    }

    #[test]
    fn progress_freezes_on_pop() {
        let t = token(None);
        assert_eq!(t.rise_progress(1_000.0), 0.0);
        assert!((t.rise_progress(3_000.0) - 0.5).abs() < 1e-9);
        assert_eq!(t.rise_progress(9_000.0), 1.0);
        let popped = token(Some(3_000.0));
        assert!((popped.rise_progress(4_000.0) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn id_display_and_reactions() {
        assert_eq!(LetterId(12).to_string(), "letter-12");
        assert_eq!(Symbol::W.reaction(), "Nice!");
        assert_eq!(Symbol::Z.reaction(), "Oops!");
        assert!(Symbol::W.is_target() && !Symbol::Z.is_target());
    }
}
