//! Error types for precondition violations
//!
//! Everything here indicates a caller bug: invalid constructor arguments or
//! malformed bounds handed to an operation. Invariant-guarded no-ops
//! (collecting an inactive drop, updating an inactive entity) are silent and
//! never surface as errors. Game over is a normal tick outcome, not an error.

pub type RainResult<T> = Result<T, RainError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RainError {
    #[error("droplet size must be positive, got {width}x{height}")]
    InvalidSize { width: f32, height: f32 },

    #[error("fall speed must be non-negative, got {0}")]
    NegativeSpeed(f32),

    #[error("collection bounds must have positive extent, got {width}x{height}")]
    InvalidBounds { width: f32, height: f32 },
}
