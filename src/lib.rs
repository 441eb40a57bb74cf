//! Hoop Rush - An arcade basketball shot resolver
//!
//! Core modules:
//! - `sim`: Deterministic shot resolution (ballistics, skill zones, scoring, timers)
//! - `settings`: Data-driven game balance
//! - `error`: Configuration errors

pub mod error;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the headless host (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Gravity magnitude (m/s²)
    pub const GRAVITY: f32 = 9.81;
    /// Apex height added above the higher of start/target for every shot
    pub const ARC_HEIGHT: f32 = 1.5;
    /// Apex height used when a backboard shot is redirected into the basket
    pub const REBOUND_ARC_HEIGHT: f32 = 0.1;
    /// How far above the backboard point a too-strong shot lands
    pub const HIGH_BACKBOARD_OFFSET: f32 = 0.5;

    /// Points for a shot that finds the basket without help
    pub const BASKET_POINTS: u32 = 2;
    /// Points for a perfect swish
    pub const PERFECT_POINTS: u32 = 3;

    /// Seconds left at which the clock is flagged as running low
    pub const LOW_TIME_SECS: f32 = 10.0;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Fraction of the way `value` is from `start` to `end`, clamped to [0, 1]
#[inline]
pub fn inverse_lerp_clamped(start: f32, end: f32, value: f32) -> f32 {
    if (end - start).abs() <= f32::EPSILON {
        return 1.0;
    }
    ((value - start) / (end - start)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp(2.0, 6.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 6.0, 1.0), 6.0);
        assert_eq!(lerp(2.0, 6.0, 0.5), 4.0);
    }

    #[test]
    fn test_inverse_lerp_clamps() {
        assert_eq!(inverse_lerp_clamped(0.0, 80.0, -5.0), 0.0);
        assert_eq!(inverse_lerp_clamped(0.0, 80.0, 40.0), 0.5);
        assert_eq!(inverse_lerp_clamped(0.0, 80.0, 500.0), 1.0);
        // Degenerate range counts as fully reached
        assert_eq!(inverse_lerp_clamped(3.0, 3.0, 0.0), 1.0);
    }
}
