//! Configuration errors
//!
//! Only configuration can fail. Gameplay calls degrade to no-ops instead of
//! returning errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{zone} zone has non-positive width: [{start}, {end})")]
    EmptyZone {
        zone: &'static str,
        start: f32,
        end: f32,
    },
    #[error("{zone} zone [{start}, {end}) lies outside [0, 1]")]
    ZoneOutOfRange {
        zone: &'static str,
        start: f32,
        end: f32,
    },
    #[error("zones overlap or are out of order: perfect ends at {perfect_end}, good starts at {good_start}")]
    ZonesOverlap { perfect_end: f32, good_start: f32 },
    #[error("{name} must be a finite non-negative number, got {value}")]
    NegativeValue { name: &'static str, value: f32 },
    #[error("{name} must be a finite positive number, got {value}")]
    NonPositiveValue { name: &'static str, value: f32 },
    #[error("{name} minimum width {min} exceeds its initial width {initial}")]
    WidthFloorAboveInitial {
        name: &'static str,
        min: f32,
        initial: f32,
    },
    #[error("shuffled zones need {needed} of the bar but only {available} is available")]
    ShuffleDoesNotFit { needed: f32, available: f32 },
    #[error("bonus interval is inverted: min {min} shots > max {max} shots")]
    BonusIntervalInverted { min: u32, max: u32 },
    #[error("shuffle interval floor {floor} exceeds its start value {start}")]
    ShuffleIntervalInverted { start: u32, floor: u32 },
    #[error("AI needs at least one shooting spot")]
    NoAiSpots,
    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Fail unless `value` is finite and > 0
pub(crate) fn require_positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositiveValue { name, value })
    }
}

/// Fail unless `value` is finite and >= 0
pub(crate) fn require_non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NegativeValue { name, value })
    }
}
