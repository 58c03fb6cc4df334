//! Tunable game constants.
//!
//! Defaults reproduce the shipped page: 5 W letters, 7 Z letters, one letter
//! every 800 ms and a 4 s pause between rounds.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::game::TimingPolicy;

pub const DEFAULT_TOTAL_W: u32 = 5;
pub const DEFAULT_TOTAL_Z: u32 = 7;
pub const DEFAULT_SPAWN_INTERVAL_MS: f64 = 800.0;
pub const DEFAULT_REPEAT_DELAY_MS: f64 = 4_000.0;
/// Length of the pop animation; a tapped letter is removed once it ends.
pub const DEFAULT_POP_REMOVAL_MS: f64 = 400.0;
/// Extra time an untapped letter stays alive after its rise finished.
pub const DEFAULT_EXPIRY_GRACE_MS: f64 = 2_000.0;
pub const DEFAULT_MAX_POSITION_PERCENT: f64 = 80.0;
/// Upper bound for every configurable delay. Longer timers would keep letters
/// alive for the whole session.
pub const MAX_DURATION_MS: f64 = 60_000.0;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    pub total_w: u32,
    pub total_z: u32,
    pub spawn_interval_ms: f64,
    pub repeat_delay_ms: f64,
    pub pop_removal_ms: f64,
    pub expiry_grace_ms: f64,
    /// Upper bound (exclusive) of the horizontal spawn position, in percent.
    pub max_position_percent: f64,
    /// Number of interchangeable pop sounds; one is picked at random per tap.
    pub pop_variants: usize,
    pub timing: TimingPolicy,
    /// Fixed RNG seed. `None` seeds from browser / OS entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            total_w: DEFAULT_TOTAL_W,
            total_z: DEFAULT_TOTAL_Z,
            spawn_interval_ms: DEFAULT_SPAWN_INTERVAL_MS,
            repeat_delay_ms: DEFAULT_REPEAT_DELAY_MS,
            pop_removal_ms: DEFAULT_POP_REMOVAL_MS,
            expiry_grace_ms: DEFAULT_EXPIRY_GRACE_MS,
            max_position_percent: DEFAULT_MAX_POSITION_PERCENT,
            pop_variants: 1,
            timing: TimingPolicy::PositionDerived,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn total_letters(&self) -> u32 {
        self.total_w + self.total_z
    }

    /// Checks the config and hands it back unchanged when usable.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.total_letters() == 0 {
            return Err(ConfigError::EmptyLetterSet);
        }
        let interval = self.spawn_interval_ms;
        if interval.is_nan() || interval <= 0.0 || interval > MAX_DURATION_MS {
            return Err(ConfigError::InvalidSpawnInterval { value: interval, max: MAX_DURATION_MS });
        }
        for (field, value) in [
            ("repeat_delay_ms", self.repeat_delay_ms),
            ("pop_removal_ms", self.pop_removal_ms),
            ("expiry_grace_ms", self.expiry_grace_ms),
        ] {
            if !(0.0..=MAX_DURATION_MS).contains(&value) {
                return Err(ConfigError::InvalidDuration { field, value, max: MAX_DURATION_MS });
            }
        }
        let max = self.max_position_percent;
        if !max.is_finite() || max <= 0.0 || max > 100.0 {
            return Err(ConfigError::PositionOutOfRange(max));
        }
        if self.pop_variants == 0 {
            return Err(ConfigError::NoPopVariants);
        }
        Ok(self)
    }

    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate().inspect_err(|e| log::warn!("rejected config: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = GameConfig::default().validate().unwrap();
        assert_eq!(cfg.total_letters(), 12);
        assert_eq!(cfg.spawn_interval_ms, 800.0);
        assert_eq!(cfg.repeat_delay_ms, 4_000.0);
    }

    #[test]
    fn rejects_empty_letter_set() {
        let cfg = GameConfig { total_w: 0, total_z: 0, ..GameConfig::default() };
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyLetterSet));
    }

    #[test]
    fn rejects_zero_and_nan_interval() {
        for bad in [0.0, -800.0, f64::NAN, f64::INFINITY, 1e300] {
            let cfg = GameConfig { spawn_interval_ms: bad, ..GameConfig::default() };
            assert!(
                matches!(cfg.validate(), Err(ConfigError::InvalidSpawnInterval { .. })),
                "interval {bad} accepted"
            );
        }
    }

    #[test]
    fn rejects_out_of_range_durations() {
        let cases: [(&str, fn(f64) -> GameConfig); 3] = [
            ("repeat_delay_ms", |v| GameConfig { repeat_delay_ms: v, ..GameConfig::default() }),
            ("pop_removal_ms", |v| GameConfig { pop_removal_ms: v, ..GameConfig::default() }),
            ("expiry_grace_ms", |v| GameConfig { expiry_grace_ms: v, ..GameConfig::default() }),
        ];
        for (name, build) in cases {
            for bad in [-10_000.0, f64::NAN, f64::INFINITY, 1e300] {
                match build(bad).validate() {
                    Err(ConfigError::InvalidDuration { field, .. }) => assert_eq!(field, name),
                    other => panic!("{name} = {bad} gave {other:?}"),
                }
            }
            assert!(build(0.0).validate().is_ok(), "{name} = 0 should be allowed");
            assert!(build(MAX_DURATION_MS).validate().is_ok());
        }
    }

    #[test]
    fn rejects_bad_position_bound() {
        let cfg = GameConfig { max_position_percent: 120.0, ..GameConfig::default() };
        assert_eq!(cfg.validate(), Err(ConfigError::PositionOutOfRange(120.0)));
    }

    #[test]
    fn rejects_missing_pop_variants() {
        let cfg = GameConfig { pop_variants: 0, ..GameConfig::default() };
        assert_eq!(cfg.validate(), Err(ConfigError::NoPopVariants));
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn partial_json_falls_back_to_defaults() {
        let cfg = GameConfig::from_json(r#"{"total_w": 2, "seed": 9}"#).unwrap();
        assert_eq!(cfg.total_w, 2);
        assert_eq!(cfg.total_z, DEFAULT_TOTAL_Z);
        assert_eq!(cfg.seed, Some(9));
    }
}
