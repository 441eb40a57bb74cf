//! Turning a made basket into points

use std::fmt;

use serde::{Deserialize, Serialize};

use super::bonus::{BonusRarity, BonusWindow};
use super::shot::ShotQuality;
use crate::consts::{BASKET_POINTS, PERFECT_POINTS};

/// What the scoreboard calls a make
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreLabel {
    Perfect,
    Backboard,
    BackboardBonus { rarity: BonusRarity, points: u32 },
    Basket,
}

impl fmt::Display for ScoreLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreLabel::Perfect => write!(f, "Perfect"),
            ScoreLabel::Backboard => write!(f, "Backboard"),
            ScoreLabel::BackboardBonus { points, .. } => write!(f, "Backboard +{}", points),
            ScoreLabel::Basket => write!(f, "Basket"),
        }
    }
}

/// Points earned by one make, before any streak multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEvent {
    pub points: u32,
    /// The open bonus window was spent on this make
    pub consumed_bonus: bool,
    pub label: ScoreLabel,
}

/// Score a make
///
/// A perfect shot is worth three no matter what it touched. Otherwise a
/// backboard contact is worth two plus any open bonus window, and anything
/// else is a plain two.
pub fn resolve(
    quality: ShotQuality,
    _hit_rim: bool,
    hit_backboard: bool,
    bonus: Option<&BonusWindow>,
) -> ScoreEvent {
    if quality == ShotQuality::Perfect {
        return ScoreEvent {
            points: PERFECT_POINTS,
            consumed_bonus: false,
            label: ScoreLabel::Perfect,
        };
    }

    if hit_backboard {
        return match bonus {
            Some(window) => ScoreEvent {
                points: BASKET_POINTS.saturating_add(window.points),
                consumed_bonus: true,
                label: ScoreLabel::BackboardBonus {
                    rarity: window.rarity,
                    points: window.points,
                },
            },
            None => ScoreEvent {
                points: BASKET_POINTS,
                consumed_bonus: false,
                label: ScoreLabel::Backboard,
            },
        };
    }

    ScoreEvent {
        points: BASKET_POINTS,
        consumed_bonus: false,
        label: ScoreLabel::Basket,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::BonusSettings;

    fn common_window() -> BonusWindow {
        BonusWindow::new(BonusRarity::Common, &BonusSettings::default())
    }

    #[test]
    fn test_perfect_ignores_contacts_and_bonus() {
        let window = common_window();
        let event = resolve(ShotQuality::Perfect, true, true, Some(&window));
        assert_eq!(event.points, 3);
        assert!(!event.consumed_bonus);
        assert_eq!(event.label, ScoreLabel::Perfect);
    }

    #[test]
    fn test_backboard_with_bonus() {
        let window = common_window();
        let event = resolve(ShotQuality::Good, false, true, Some(&window));
        assert_eq!(event.points, 6);
        assert!(event.consumed_bonus);
        assert_eq!(event.label.to_string(), "Backboard +4");
    }

    #[test]
    fn test_backboard_without_bonus() {
        let event = resolve(ShotQuality::Good, false, true, None);
        assert_eq!(event.points, 2);
        assert!(!event.consumed_bonus);
        assert_eq!(event.label, ScoreLabel::Backboard);
    }

    #[test]
    fn test_plain_basket() {
        let window = common_window();
        let event = resolve(ShotQuality::Normal, true, false, Some(&window));
        assert_eq!(event.points, 2);
        assert!(!event.consumed_bonus);
        assert_eq!(event.label.to_string(), "Basket");
    }
}
