use thiserror::Error;

/// Reasons a [`GameConfig`](crate::GameConfig) is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("letter set is empty (total_w and total_z are both 0)")]
    EmptyLetterSet,
    #[error("spawn interval must be within (0, {max}] ms, got {value}")]
    InvalidSpawnInterval { value: f64, max: f64 },
    #[error("{field} must be within [0, {max}] ms, got {value}")]
    InvalidDuration { field: &'static str, value: f64, max: f64 },
    #[error("max position percent must be within (0, 100], got {0}")]
    PositionOutOfRange(f64),
    #[error("at least one pop sound variant is required")]
    NoPopVariants,
    #[cfg(feature = "serde_json")]
    #[error("invalid config json: {0}")]
    Json(String),
}
