use super::letter::{LetterId, LetterToken, Symbol, TimingPolicy};
use crate::rng::GameRng;

/// In-place Fisher–Yates: walk backwards, swapping each slot with a uniform
/// pick from the unvisited prefix (itself included).
pub fn shuffle<T>(items: &mut [T], rng: &mut GameRng) {
    for i in (1..items.len()).rev() {
        let j = rng.index_inclusive(i);
        items.swap(i, j);
    }
}

/// The configured multiset, W letters first.
pub fn letter_multiset(total_w: u32, total_z: u32) -> Vec<Symbol> {
    let w = std::iter::repeat_n(Symbol::W, total_w as usize);
    let z = std::iter::repeat_n(Symbol::Z, total_z as usize);
    w.chain(z).collect()
}

/// Emits one round's shuffled letters, one per call.
#[derive(Debug)]
pub struct Spawner {
    sequence: Vec<Symbol>,
    cursor: usize,
    round: u32,
}

impl Spawner {
    pub fn new(total_w: u32, total_z: u32, round: u32, rng: &mut GameRng) -> Self {
        let mut sequence = letter_multiset(total_w, total_z);
        shuffle(&mut sequence, rng);
        Self { sequence, cursor: 0, round }
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    #[cfg(test)]
    pub fn sequence(&self) -> &[Symbol] {
        &self.sequence
    }

    pub fn remaining(&self) -> usize {
        self.sequence.len() - self.cursor
    }

    #[cfg(test)]
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.sequence.len()
    }

    /// Builds the next token, or `None` once the round's sequence ran out.
    pub fn emit(
        &mut self,
        id: LetterId,
        max_position_percent: f64,
        policy: TimingPolicy,
        rng: &mut GameRng,
        now: f64,
    ) -> Option<LetterToken> {
        let symbol = *self.sequence.get(self.cursor)?;
        self.cursor += 1;
        let position = rng.range_f64(0.0, max_position_percent);
        let timing = policy.timing(position, rng);
        Some(LetterToken::new(id, symbol, position, timing, self.round, now))
    }
}
