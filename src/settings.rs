//! Game balance settings
//!
//! Every tunable lives here so a match can be rebalanced from a JSON file
//! without recompiling. Missing fields fall back to the defaults below.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, require_non_negative, require_positive};
use crate::sim::zones::PowerZoneLayout;

/// Match length and end-of-game rating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchRules {
    /// Practice match length (seconds)
    pub practice_duration: f32,
    /// Versus-AI match length (seconds)
    pub vs_ai_duration: f32,
    /// Rating thresholds for a match of `rating_reference_duration` seconds
    pub good_threshold: u32,
    pub great_threshold: u32,
    pub excellent_threshold: u32,
    /// Match length the rating thresholds were tuned for
    pub rating_reference_duration: f32,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            practice_duration: 60.0,
            vs_ai_duration: 60.0,
            good_threshold: 15,
            great_threshold: 30,
            excellent_threshold: 50,
            rating_reference_duration: 60.0,
        }
    }
}

/// Starting power bar zones (normalized power, half-open ranges)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneSettings {
    pub perfect_start: f32,
    pub perfect_end: f32,
    pub good_start: f32,
    pub good_end: f32,
    pub near_perfect_tolerance: f32,
    pub near_good_tolerance: f32,
}

impl Default for ZoneSettings {
    fn default() -> Self {
        Self {
            perfect_start: 0.65,
            perfect_end: 0.75,
            good_start: 0.78,
            good_end: 0.92,
            near_perfect_tolerance: 0.08,
            near_good_tolerance: 0.10,
        }
    }
}

/// How the zones move and shrink as the score climbs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShuffleSettings {
    pub enabled: bool,
    /// Points between shuffles at the start of a match
    pub interval_start: u32,
    /// Points between shuffles once the score reaches `max_difficulty_score`
    pub interval_floor: u32,
    /// Score at which intervals and widths stop shrinking
    pub max_difficulty_score: u32,
    /// Narrowest the perfect zone gets
    pub perfect_min_width: f32,
    /// Narrowest the good zone gets
    pub good_min_width: f32,
    /// Space kept between the two zones
    pub gap: f32,
    /// Lowest power a shuffled zone may start at
    pub min_zone_position: f32,
    /// Length of the slide animation (seconds)
    pub transition_secs: f32,
}

impl Default for ShuffleSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_start: 12,
            interval_floor: 5,
            max_difficulty_score: 80,
            perfect_min_width: 0.04,
            good_min_width: 0.06,
            gap: 0.03,
            min_zone_position: 0.30,
            transition_secs: 0.35,
        }
    }
}

/// Hot streak
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireballSettings {
    /// Consecutive makes needed to catch fire
    pub makes_to_activate: u32,
    /// How long the streak burns (seconds)
    pub duration: f32,
    /// Points multiplier while burning
    pub multiplier: u32,
}

impl Default for FireballSettings {
    fn default() -> Self {
        Self {
            makes_to_activate: 4,
            duration: 8.0,
            multiplier: 2,
        }
    }
}

/// Backboard bonus windows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BonusSettings {
    /// Fewest shots between bonus windows
    pub min_shots: u32,
    /// Most shots between bonus windows
    pub max_shots: u32,
    /// How long a window stays open (seconds)
    pub duration: f32,
    pub common_weight: f32,
    pub rare_weight: f32,
    pub epic_weight: f32,
    pub common_points: u32,
    pub rare_points: u32,
    pub epic_points: u32,
}

impl Default for BonusSettings {
    fn default() -> Self {
        Self {
            min_shots: 3,
            max_shots: 6,
            duration: 10.0,
            common_weight: 0.50,
            rare_weight: 0.30,
            epic_weight: 0.20,
            common_points: 4,
            rare_points: 6,
            epic_points: 8,
        }
    }
}

/// Flight model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShotSettings {
    pub gravity: f32,
    pub arc_height: f32,
    pub high_backboard_offset: f32,
    /// Apex height for a bank shot redirected off the backboard
    pub rebound_arc_height: f32,
    /// Scatter imperfect shots (off = every tier flies exactly as solved)
    pub error_injection: bool,
}

impl Default for ShotSettings {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            arc_height: ARC_HEIGHT,
            high_backboard_offset: HIGH_BACKBOARD_OFFSET,
            rebound_arc_height: REBOUND_ARC_HEIGHT,
            error_injection: true,
        }
    }
}

/// Waits between actions (seconds)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    /// Player gets a new ball this long after shooting
    pub auto_reset_delay: f32,
    /// Holding the aim this long fires the shot automatically
    pub auto_shoot_delay: f32,
    /// AI wait before releasing
    pub ai_shoot_delay: f32,
    /// AI wait after releasing before it moves and reloads
    pub ai_reset_delay: f32,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            auto_reset_delay: 2.0,
            auto_shoot_delay: 1.0,
            ai_shoot_delay: 2.0,
            ai_reset_delay: 2.0,
        }
    }
}

/// Court geometry (meters, y up, z toward the hoop)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourtSettings {
    pub basket: Vec3,
    pub backboard: Vec3,
    pub player_spot: Vec3,
    pub ai_spots: Vec<Vec3>,
    /// AI never picks a spot closer than this to the player
    pub ai_min_separation: f32,
    /// Backboard aim shifts by this fraction of the AI's lateral offset
    pub backboard_lateral_factor: f32,
    /// Cap on the backboard aim shift
    pub backboard_lateral_limit: f32,
}

impl Default for CourtSettings {
    fn default() -> Self {
        Self {
            basket: Vec3::new(0.0, 3.05, 6.0),
            backboard: Vec3::new(0.0, 3.6, 6.55),
            player_spot: Vec3::new(0.0, 1.8, 0.0),
            ai_spots: vec![
                Vec3::new(-2.5, 1.8, 1.0),
                Vec3::new(2.5, 1.8, 1.0),
                Vec3::new(-1.5, 1.8, -0.6),
                Vec3::new(1.5, 1.8, -0.6),
                Vec3::new(0.0, 1.8, -1.6),
            ],
            ai_min_separation: 1.5,
            backboard_lateral_factor: 0.3,
            backboard_lateral_limit: 0.3,
        }
    }
}

/// All game balance settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub match_rules: MatchRules,
    pub zones: ZoneSettings,
    pub shuffle: ShuffleSettings,
    pub fireball: FireballSettings,
    pub bonus: BonusSettings,
    pub shot: ShotSettings,
    pub timing: TimingSettings,
    pub court: CourtSettings,
}

impl Settings {
    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load and validate a settings file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Reject settings that would break classification or timers
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rules = &self.match_rules;
        require_positive("practice_duration", rules.practice_duration)?;
        require_positive("vs_ai_duration", rules.vs_ai_duration)?;
        require_positive("rating_reference_duration", rules.rating_reference_duration)?;

        PowerZoneLayout::from_settings(&self.zones)?;
        self.validate_shuffle()?;

        require_positive("fireball.duration", self.fireball.duration)?;
        require_positive("fireball.makes_to_activate", self.fireball.makes_to_activate as f32)?;
        require_positive("fireball.multiplier", self.fireball.multiplier as f32)?;

        let bonus = &self.bonus;
        if bonus.min_shots > bonus.max_shots {
            return Err(ConfigError::BonusIntervalInverted {
                min: bonus.min_shots,
                max: bonus.max_shots,
            });
        }
        require_positive("bonus.min_shots", bonus.min_shots as f32)?;
        require_positive("bonus.duration", bonus.duration)?;
        require_non_negative("bonus.common_weight", bonus.common_weight)?;
        require_non_negative("bonus.rare_weight", bonus.rare_weight)?;
        require_non_negative("bonus.epic_weight", bonus.epic_weight)?;
        require_positive(
            "bonus total weight",
            bonus.common_weight + bonus.rare_weight + bonus.epic_weight,
        )?;

        require_positive("shot.gravity", self.shot.gravity)?;
        require_non_negative("shot.arc_height", self.shot.arc_height)?;
        require_non_negative("shot.high_backboard_offset", self.shot.high_backboard_offset)?;
        require_non_negative("shot.rebound_arc_height", self.shot.rebound_arc_height)?;

        let timing = &self.timing;
        require_positive("timing.auto_reset_delay", timing.auto_reset_delay)?;
        require_positive("timing.auto_shoot_delay", timing.auto_shoot_delay)?;
        require_positive("timing.ai_shoot_delay", timing.ai_shoot_delay)?;
        require_positive("timing.ai_reset_delay", timing.ai_reset_delay)?;

        if self.court.ai_spots.is_empty() {
            return Err(ConfigError::NoAiSpots);
        }
        require_non_negative("court.ai_min_separation", self.court.ai_min_separation)?;
        require_non_negative("court.backboard_lateral_limit", self.court.backboard_lateral_limit)?;

        Ok(())
    }

    fn validate_shuffle(&self) -> Result<(), ConfigError> {
        let shuffle = &self.shuffle;
        let zones = &self.zones;
        if shuffle.interval_floor > shuffle.interval_start {
            return Err(ConfigError::ShuffleIntervalInverted {
                start: shuffle.interval_start,
                floor: shuffle.interval_floor,
            });
        }
        require_positive("shuffle.interval_floor", shuffle.interval_floor as f32)?;
        require_positive("shuffle.perfect_min_width", shuffle.perfect_min_width)?;
        require_positive("shuffle.good_min_width", shuffle.good_min_width)?;
        require_non_negative("shuffle.gap", shuffle.gap)?;
        require_non_negative("shuffle.min_zone_position", shuffle.min_zone_position)?;
        require_non_negative("shuffle.transition_secs", shuffle.transition_secs)?;

        let perfect_width = zones.perfect_end - zones.perfect_start;
        let good_width = zones.good_end - zones.good_start;
        if shuffle.perfect_min_width > perfect_width {
            return Err(ConfigError::WidthFloorAboveInitial {
                name: "perfect",
                min: shuffle.perfect_min_width,
                initial: perfect_width,
            });
        }
        if shuffle.good_min_width > good_width {
            return Err(ConfigError::WidthFloorAboveInitial {
                name: "good",
                min: shuffle.good_min_width,
                initial: good_width,
            });
        }

        // Widest shuffle happens at score zero
        let needed = perfect_width + shuffle.gap + good_width;
        let available = 1.0 - shuffle.min_zone_position;
        if needed > available {
            return Err(ConfigError::ShuffleDoesNotFit { needed, available });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        Settings::default().validate().unwrap();
    }

    #[test]
    fn test_json_round_trip_keeps_values() {
        let mut settings = Settings::default();
        settings.fireball.makes_to_activate = 3;
        settings.court.ai_spots.truncate(2);

        let json = settings.to_json().unwrap();
        let loaded = Settings::from_json(&json).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let loaded = Settings::from_json(r#"{ "fireball": { "duration": 5.0 } }"#).unwrap();
        assert_eq!(loaded.fireball.duration, 5.0);
        assert_eq!(loaded.fireball.makes_to_activate, 4);
        assert_eq!(loaded.zones, ZoneSettings::default());
    }

    #[test]
    fn test_bad_json_is_config_error() {
        assert!(matches!(
            Settings::from_json("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_rejects_inverted_bonus_interval() {
        let mut settings = Settings::default();
        settings.bonus.min_shots = 8;
        settings.bonus.max_shots = 4;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::BonusIntervalInverted { min: 8, max: 4 })
        ));
    }

    #[test]
    fn test_rejects_overlapping_zones() {
        let mut settings = Settings::default();
        settings.zones.good_start = 0.70;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::ZonesOverlap { .. })
        ));
    }

    #[test]
    fn test_rejects_min_width_above_initial() {
        let mut settings = Settings::default();
        settings.shuffle.perfect_min_width = 0.5;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::WidthFloorAboveInitial { name: "perfect", .. })
        ));
    }

    #[test]
    fn test_rejects_shuffle_that_cannot_fit() {
        let mut settings = Settings::default();
        settings.shuffle.min_zone_position = 0.8;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::ShuffleDoesNotFit { .. })
        ));
    }

    #[test]
    fn test_rejects_zero_gravity() {
        let mut settings = Settings::default();
        settings.shot.gravity = 0.0;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::NonPositiveValue { name: "shot.gravity", .. })
        ));
    }

    #[test]
    fn test_rejects_empty_ai_spots() {
        let mut settings = Settings::default();
        settings.court.ai_spots.clear();
        assert!(matches!(settings.validate(), Err(ConfigError::NoAiSpots)));
    }
}
