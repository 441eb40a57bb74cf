//! Shot attempts and their quality tiers

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::rng::RandomSource;

/// How well a shot was released
///
/// Tiers are ordered only by meaning, never compared by magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShotQuality {
    /// Clean swish, worth three points
    Perfect,
    /// Just outside the perfect zone
    NearPerfect,
    /// Banked off the backboard
    Good,
    /// Just outside the good zone, still aimed at the backboard
    NearGood,
    /// Somewhere between the zones
    Normal,
    /// Well short of the zones
    Weak,
    /// Well past the zones, sails over the backboard point
    TooStrong,
    /// No shot assigned
    None,
}

impl ShotQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShotQuality::Perfect => "Perfect",
            ShotQuality::NearPerfect => "Near Perfect",
            ShotQuality::Good => "Good",
            ShotQuality::NearGood => "Near Good",
            ShotQuality::Normal => "Normal",
            ShotQuality::Weak => "Weak",
            ShotQuality::TooStrong => "Too Strong",
            ShotQuality::None => "None",
        }
    }

    /// Preview line color (RGB) for the aim trajectory
    pub fn preview_color(&self) -> [f32; 3] {
        match self {
            ShotQuality::Perfect => [0.0, 1.0, 0.0],
            ShotQuality::NearPerfect => [0.5, 1.0, 0.5],
            ShotQuality::Good => [0.0, 0.0, 1.0],
            ShotQuality::NearGood => [0.5, 0.8, 1.0],
            ShotQuality::Normal => [1.0, 0.92, 0.016],
            _ => [1.0, 0.0, 0.0],
        }
    }

    /// Whether the shot is aimed off the backboard rather than at the rim
    pub fn aims_at_backboard(&self) -> bool {
        matches!(
            self,
            ShotQuality::Good | ShotQuality::NearGood | ShotQuality::TooStrong
        )
    }
}

/// Which player took a shot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    Opponent,
}

/// Unique id of a shot within a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShotId(pub u32);

/// Where a shot can be aimed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotTargets {
    /// Center of the basket
    pub basket: Vec3,
    /// Aim point on the backboard
    pub backboard: Vec3,
}

impl ShotTargets {
    /// Aim point for a given quality
    pub fn aim_point(&self, quality: ShotQuality, high_backboard_offset: f32) -> Vec3 {
        match quality {
            ShotQuality::Good | ShotQuality::NearGood => self.backboard,
            ShotQuality::TooStrong => self.backboard + Vec3::Y * high_backboard_offset,
            _ => self.basket,
        }
    }
}

/// A committed shot, alive until its outcome is resolved
///
/// Inside a match, `MatchStateMachine::commit_shot` and the AI cadence are
/// what create shots, and both set the quality when the shot is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shot {
    pub id: ShotId,
    pub side: Side,
    pub origin: Vec3,
    pub targets: ShotTargets,
    /// Point the velocity was solved for
    pub aim: Vec3,
    pub velocity: Vec3,
    pub quality: ShotQuality,
    /// Normalized power that produced the shot (None for AI shots)
    pub power: Option<f32>,
    pub hit_rim: bool,
    pub hit_backboard: bool,
    /// Latched once the shot has been credited
    pub scored: bool,
    /// Latched once the shot has been ruled a miss
    pub missed: bool,
}

impl Shot {
    /// Not yet scored or missed
    pub fn in_flight(&self) -> bool {
        !self.scored && !self.missed
    }
}

/// Power multiplier range and per-axis error ranges for one tier
#[derive(Debug, Clone, Copy, PartialEq)]
struct Scatter {
    power: (f32, f32),
    x: (f32, f32),
    y: (f32, f32),
    z: (f32, f32),
}

impl Scatter {
    const EXACT: Scatter = Scatter {
        power: (1.0, 1.0),
        x: (0.0, 0.0),
        y: (0.0, 0.0),
        z: (0.0, 0.0),
    };
}

fn scatter_for(quality: ShotQuality) -> Scatter {
    match quality {
        ShotQuality::Weak => Scatter {
            power: (0.65, 0.80),
            x: (-0.4, 0.4),
            y: (-0.3, -0.1),
            z: (-0.3, 0.3),
        },
        ShotQuality::Normal => Scatter {
            power: (0.88, 1.12),
            x: (-0.25, 0.25),
            y: (-0.15, 0.15),
            z: (-0.2, 0.2),
        },
        ShotQuality::NearPerfect => Scatter {
            power: (0.96, 1.04),
            x: (-0.08, 0.08),
            y: (-0.05, 0.05),
            z: (-0.06, 0.06),
        },
        ShotQuality::NearGood => Scatter {
            power: (0.98, 1.05),
            x: (-0.10, 0.10),
            y: (-0.08, 0.08),
            z: (0.0, 0.0),
        },
        ShotQuality::TooStrong => Scatter {
            power: (1.0, 1.0),
            x: (-0.15, 0.15),
            y: (0.0, 0.2),
            z: (0.0, 0.0),
        },
        ShotQuality::Perfect | ShotQuality::Good | ShotQuality::None => Scatter::EXACT,
    }
}

/// Perturb an ideal velocity according to shot quality
///
/// Perfect and Good shots fly exactly as solved. The forward (z) component is
/// never allowed to turn negative, so no shot flies away from the hoop.
pub fn apply_power_error(ideal: Vec3, quality: ShotQuality, rng: &mut dyn RandomSource) -> Vec3 {
    let scatter = scatter_for(quality);
    if scatter == Scatter::EXACT {
        return ideal;
    }

    let multiplier = rng.range(scatter.power.0, scatter.power.1);
    let error = Vec3::new(
        rng.range(scatter.x.0, scatter.x.1),
        rng.range(scatter.y.0, scatter.y.1),
        rng.range(scatter.z.0, scatter.z.1),
    );

    let mut result = ideal * multiplier + error;
    if result.z < 0.0 {
        result.z = 0.0;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::{ScriptedRolls, SessionRng};

    fn targets() -> ShotTargets {
        ShotTargets {
            basket: Vec3::new(0.0, 3.05, 6.0),
            backboard: Vec3::new(0.0, 3.6, 6.6),
        }
    }

    #[test]
    fn test_aim_points() {
        let t = targets();
        assert_eq!(t.aim_point(ShotQuality::Perfect, 0.5), t.basket);
        assert_eq!(t.aim_point(ShotQuality::Weak, 0.5), t.basket);
        assert_eq!(t.aim_point(ShotQuality::Good, 0.5), t.backboard);
        assert_eq!(t.aim_point(ShotQuality::NearGood, 0.5), t.backboard);
        assert_eq!(
            t.aim_point(ShotQuality::TooStrong, 0.5),
            t.backboard + Vec3::new(0.0, 0.5, 0.0)
        );
    }

    #[test]
    fn test_exact_tiers_untouched() {
        let mut rng = SessionRng::new(1);
        let ideal = Vec3::new(0.1, 6.0, 4.0);
        assert_eq!(apply_power_error(ideal, ShotQuality::Perfect, &mut rng), ideal);
        assert_eq!(apply_power_error(ideal, ShotQuality::Good, &mut rng), ideal);
    }

    #[test]
    fn test_weak_shot_falls_short() {
        // Every roll at the top of its range: 0.80x power, y error -0.1
        let mut rng = ScriptedRolls::new(vec![0.99999]);
        let ideal = Vec3::new(0.0, 6.0, 4.0);
        let v = apply_power_error(ideal, ShotQuality::Weak, &mut rng);
        assert!(v.y < ideal.y);
        assert!(v.z < ideal.z);
    }

    #[test]
    fn test_forward_component_never_negative() {
        let mut rng = ScriptedRolls::new(vec![0.0]);
        let ideal = Vec3::new(0.0, 6.0, 0.05);
        let v = apply_power_error(ideal, ShotQuality::Weak, &mut rng);
        assert_eq!(v.z, 0.0);
    }

    #[test]
    fn test_backboard_tiers() {
        assert!(ShotQuality::Good.aims_at_backboard());
        assert!(ShotQuality::TooStrong.aims_at_backboard());
        assert!(!ShotQuality::Perfect.aims_at_backboard());
    }
}
