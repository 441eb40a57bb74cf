//! Computer opponent
//!
//! The AI never aims. It rolls once per shot and reads its shot tier off a
//! cumulative probability table picked by difficulty. While a bonus window is
//! open, bank-shot bands are checked ahead of the normal table; on Hard the AI
//! also gets a sharper table while the player is on fire.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::rng::RandomSource;
use super::shot::ShotQuality;

/// AI skill level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "med" | "medium" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// Rolls below `upper` (and above the previous band) give `quality`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityBand {
    pub upper: f32,
    pub quality: ShotQuality,
}

const fn band(upper: f32, quality: ShotQuality) -> QualityBand {
    QualityBand { upper, quality }
}

use ShotQuality::{Good, NearGood, NearPerfect, Normal, Perfect, Weak};

const EASY: &[QualityBand] = &[
    band(0.15, Perfect),
    band(0.30, NearPerfect),
    band(0.55, Normal),
    band(1.0, Weak),
];

const NORMAL: &[QualityBand] = &[
    band(0.40, Perfect),
    band(0.62, NearPerfect),
    band(0.82, Normal),
    band(1.0, Weak),
];

const HARD: &[QualityBand] = &[
    band(0.55, Perfect),
    band(0.73, Good),
    band(0.90, NearPerfect),
    band(1.0, Normal),
];

const HARD_FIREBALL: &[QualityBand] = &[
    band(0.70, Perfect),
    band(0.88, Good),
    band(0.97, NearPerfect),
    band(1.0, Normal),
];

const BONUS_EASY: &[QualityBand] = &[band(0.10, Good), band(0.22, NearGood)];
const BONUS_NORMAL: &[QualityBand] = &[band(0.40, Good), band(0.58, NearGood)];
const BONUS_HARD: &[QualityBand] = &[band(0.82, Good), band(0.88, NearGood)];

/// Full table for a difficulty; its last band always ends at 1.0
pub fn base_table(difficulty: Difficulty, fireball_active: bool) -> &'static [QualityBand] {
    match difficulty {
        Difficulty::Easy => EASY,
        Difficulty::Normal => NORMAL,
        Difficulty::Hard if fireball_active => HARD_FIREBALL,
        Difficulty::Hard => HARD,
    }
}

/// Bank-shot bands layered ahead of the base table during a bonus window
pub fn bonus_table(difficulty: Difficulty) -> &'static [QualityBand] {
    match difficulty {
        Difficulty::Easy => BONUS_EASY,
        Difficulty::Normal => BONUS_NORMAL,
        Difficulty::Hard => BONUS_HARD,
    }
}

fn scan(bands: &[QualityBand], roll: f32) -> Option<ShotQuality> {
    bands.iter().find(|b| roll < b.upper).map(|b| b.quality)
}

/// Pick the AI's shot tier from one uniform roll in [0, 1)
pub fn decide(
    difficulty: Difficulty,
    bonus_active: bool,
    fireball_active: bool,
    roll: f32,
) -> ShotQuality {
    if bonus_active {
        if let Some(quality) = scan(bonus_table(difficulty), roll) {
            return quality;
        }
    }

    let table = base_table(difficulty, fireball_active);
    scan(table, roll).unwrap_or(table[table.len() - 1].quality)
}

/// Choose where the AI shoots from next, keeping clear of the player
///
/// Tries a handful of random spots; if none is far enough away, takes one
/// more random pick regardless.
pub fn pick_spot(
    spots: &[Vec3],
    player: Vec3,
    min_separation: f32,
    rng: &mut dyn RandomSource,
) -> Option<Vec3> {
    const ATTEMPTS: usize = 5;

    if spots.is_empty() {
        return None;
    }
    let mut random_spot = || spots[rng.range_inclusive(0, spots.len() as u32 - 1) as usize];

    for _ in 0..ATTEMPTS {
        let candidate = random_spot();
        if candidate.distance(player) > min_separation {
            return Some(candidate);
        }
    }
    Some(random_spot())
}

/// Backboard aim point for a shooter standing at `spot`
///
/// Slides the aim sideways toward the shooter's side of the court.
pub fn backboard_target(backboard: Vec3, basket: Vec3, spot: Vec3, factor: f32, limit: f32) -> Vec3 {
    let lateral = ((spot.x - basket.x) * factor).clamp(-limit, limit);
    backboard + Vec3::X * lateral
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::{ScriptedRolls, SessionRng};

    const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    #[test]
    fn test_reference_rolls() {
        assert_eq!(decide(Difficulty::Hard, false, true, 0.0), Perfect);
        assert_eq!(decide(Difficulty::Easy, false, false, 0.99), Weak);
        assert_eq!(decide(Difficulty::Normal, false, false, 0.50), NearPerfect);
        assert_eq!(decide(Difficulty::Hard, false, false, 0.60), Good);
        assert_eq!(decide(Difficulty::Hard, false, false, 0.95), Normal);
        assert_eq!(decide(Difficulty::Hard, false, true, 0.98), Normal);
    }

    #[test]
    fn test_band_edges_are_exclusive() {
        assert_eq!(decide(Difficulty::Easy, false, false, 0.15), NearPerfect);
        assert_eq!(decide(Difficulty::Normal, false, false, 0.82), Weak);
        assert_eq!(decide(Difficulty::Hard, false, false, 0.55), Good);
        assert_eq!(decide(Difficulty::Hard, false, true, 0.70), Good);
    }

    #[test]
    fn test_bonus_bands_come_first() {
        assert_eq!(decide(Difficulty::Easy, true, false, 0.05), Good);
        assert_eq!(decide(Difficulty::Easy, true, false, 0.15), NearGood);
        // Past the bonus bands the base table applies to the same roll
        assert_eq!(decide(Difficulty::Easy, true, false, 0.25), NearPerfect);
        assert_eq!(decide(Difficulty::Normal, true, false, 0.45), NearGood);
        assert_eq!(decide(Difficulty::Normal, true, false, 0.60), NearPerfect);
        assert_eq!(decide(Difficulty::Hard, true, false, 0.85), NearGood);
        assert_eq!(decide(Difficulty::Hard, true, true, 0.90), NearPerfect);
        assert_eq!(decide(Difficulty::Hard, true, false, 0.89), NearPerfect);
        assert_eq!(decide(Difficulty::Hard, true, false, 0.95), Normal);
    }

    #[test]
    fn test_fireball_only_changes_hard() {
        for roll in [0.1, 0.35, 0.6, 0.9] {
            assert_eq!(
                decide(Difficulty::Easy, false, true, roll),
                decide(Difficulty::Easy, false, false, roll)
            );
            assert_eq!(
                decide(Difficulty::Normal, false, true, roll),
                decide(Difficulty::Normal, false, false, roll)
            );
        }
        assert_ne!(
            decide(Difficulty::Hard, false, true, 0.6),
            decide(Difficulty::Hard, false, false, 0.6)
        );
    }

    #[test]
    fn test_tables_partition_unit_interval() {
        for difficulty in ALL {
            for fireball in [false, true] {
                let table = base_table(difficulty, fireball);
                let mut previous = 0.0;
                for b in table {
                    assert!(b.upper > previous, "{:?} band {:?} overlaps", difficulty, b);
                    previous = b.upper;
                }
                assert_eq!(previous, 1.0);
            }
            let mut previous = 0.0;
            for b in bonus_table(difficulty) {
                assert!(b.upper > previous);
                assert!(b.upper < 1.0);
                previous = b.upper;
            }
        }
    }

    #[test]
    fn test_every_roll_gets_a_tier() {
        for difficulty in ALL {
            for bonus in [false, true] {
                for fireball in [false, true] {
                    for i in 0..1000 {
                        let roll = i as f32 / 1000.0;
                        let q = decide(difficulty, bonus, fireball, roll);
                        assert_ne!(q, ShotQuality::None);
                    }
                }
            }
        }
        // Out-of-range roll still resolves to the last band
        assert_eq!(decide(Difficulty::Easy, false, false, 1.0), Weak);
    }

    #[test]
    fn test_hard_distribution() {
        let mut rng = SessionRng::new(77);
        let trials = 20_000;
        let perfect = (0..trials)
            .filter(|_| decide(Difficulty::Hard, false, false, rng.roll()) == Perfect)
            .count();
        let share = perfect as f32 / trials as f32;
        assert!((share - 0.55).abs() < 0.02, "share {share}");
    }

    #[test]
    fn test_difficulty_from_str() {
        assert_eq!(Difficulty::from_str("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_str("easy"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::from_str("insane"), None);
        assert_eq!(Difficulty::Normal.as_str(), "Normal");
    }

    #[test]
    fn test_pick_spot_avoids_player() {
        let spots = [Vec3::new(0.0, 0.0, 0.5), Vec3::new(3.0, 0.0, 0.0)];
        // First roll lands on the close spot, second on the far one
        let mut rng = ScriptedRolls::new(vec![0.1, 0.9]);
        let spot = pick_spot(&spots, Vec3::ZERO, 1.5, &mut rng).unwrap();
        assert_eq!(spot, spots[1]);
    }

    #[test]
    fn test_pick_spot_gives_up_after_attempts() {
        let spots = [Vec3::new(0.2, 0.0, 0.0)];
        let mut rng = SessionRng::new(1);
        assert_eq!(pick_spot(&spots, Vec3::ZERO, 1.5, &mut rng), Some(spots[0]));
        assert_eq!(pick_spot(&[], Vec3::ZERO, 1.5, &mut rng), None);
    }

    #[test]
    fn test_backboard_target_shift() {
        let backboard = Vec3::new(0.0, 3.6, 6.55);
        let basket = Vec3::new(0.0, 3.05, 6.0);
        let near = backboard_target(backboard, basket, Vec3::new(0.5, 1.8, 0.0), 0.3, 0.3);
        assert!((near.x - 0.15).abs() < 1e-6);
        let far = backboard_target(backboard, basket, Vec3::new(-4.0, 1.8, 0.0), 0.3, 0.3);
        assert!((far.x + 0.3).abs() < 1e-6);
        assert_eq!(far.y, backboard.y);
    }
}
