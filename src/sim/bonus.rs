//! Backboard bonus windows
//!
//! Every few shots a bonus lights up on the backboard. The next bank shot to
//! go in collects it; otherwise it fades when its timer runs out. Only one
//! window is ever open.

use serde::{Deserialize, Serialize};

use super::rng::RandomSource;
use crate::settings::BonusSettings;

/// Bonus tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BonusRarity {
    Common,
    Rare,
    Epic,
}

impl BonusRarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            BonusRarity::Common => "Common",
            BonusRarity::Rare => "Rare",
            BonusRarity::Epic => "Epic",
        }
    }

    /// Backboard text color (RGB)
    pub fn color(&self) -> [f32; 3] {
        match self {
            BonusRarity::Common => [0.9, 0.9, 0.2],
            BonusRarity::Rare => [0.4, 0.4, 1.0],
            BonusRarity::Epic => [0.8, 0.2, 1.0],
        }
    }

    pub fn points(&self, settings: &BonusSettings) -> u32 {
        match self {
            BonusRarity::Common => settings.common_points,
            BonusRarity::Rare => settings.rare_points,
            BonusRarity::Epic => settings.epic_points,
        }
    }

    /// Weighted pick from a single roll in [0, 1)
    pub fn from_roll(roll: f32, settings: &BonusSettings) -> Self {
        let total = settings.common_weight + settings.rare_weight + settings.epic_weight;
        let scaled = roll * total;
        if scaled < settings.common_weight {
            BonusRarity::Common
        } else if scaled < settings.common_weight + settings.rare_weight {
            BonusRarity::Rare
        } else {
            BonusRarity::Epic
        }
    }
}

/// An open bonus window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BonusWindow {
    pub rarity: BonusRarity,
    pub points: u32,
    /// Seconds until it fades
    pub remaining: f32,
}

impl BonusWindow {
    pub fn new(rarity: BonusRarity, settings: &BonusSettings) -> Self {
        Self {
            rarity,
            points: rarity.points(settings),
            remaining: settings.duration,
        }
    }

    pub fn label(&self) -> String {
        format!("+{}", self.points)
    }
}

/// Decides when bonus windows open and tracks the open one
#[derive(Debug, Clone, Serialize)]
pub struct BonusScheduler {
    active: Option<BonusWindow>,
    /// Shots fired this match (both sides)
    shots_seen: u32,
    /// Shot count at which the next window opens
    next_at: u32,
    settings: BonusSettings,
}

impl BonusScheduler {
    pub fn new(settings: &BonusSettings, rng: &mut dyn RandomSource) -> Self {
        let next_at = rng.range_inclusive(settings.min_shots, settings.max_shots);
        Self {
            active: None,
            shots_seen: 0,
            next_at,
            settings: settings.clone(),
        }
    }

    pub fn active(&self) -> Option<&BonusWindow> {
        self.active.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn shots_seen(&self) -> u32 {
        self.shots_seen
    }

    pub fn next_at(&self) -> u32 {
        self.next_at
    }

    /// Count a shot; opens and returns a window once the threshold is reached
    ///
    /// The next threshold is drawn the moment a window opens. While one is
    /// open, reaching the threshold waits until it closes.
    pub fn on_shot_fired(&mut self, rng: &mut dyn RandomSource) -> Option<BonusWindow> {
        self.shots_seen += 1;
        if self.active.is_some() || self.shots_seen < self.next_at {
            return None;
        }

        let rarity = BonusRarity::from_roll(rng.roll(), &self.settings);
        let window = BonusWindow::new(rarity, &self.settings);
        self.active = Some(window);
        self.next_at =
            self.shots_seen + rng.range_inclusive(self.settings.min_shots, self.settings.max_shots);

        log::info!(
            "Bonus window opened: {} {} (next after shot {})",
            rarity.as_str(),
            window.label(),
            self.next_at
        );
        Some(window)
    }

    /// Spend the open window on a backboard make
    pub fn consume(&mut self) -> Option<BonusWindow> {
        let window = self.active.take()?;
        log::info!("Bonus window collected: {}", window.label());
        Some(window)
    }

    /// Run down the open window; returns it if it just expired
    pub fn advance(&mut self, dt: f32) -> Option<BonusWindow> {
        let window = self.active.as_mut()?;
        window.remaining -= dt;
        if window.remaining > 0.0 {
            return None;
        }
        let expired = self.active.take();
        log::info!("Bonus window expired");
        expired
    }

    pub fn reset(&mut self, rng: &mut dyn RandomSource) {
        self.active = None;
        self.shots_seen = 0;
        self.next_at = rng.range_inclusive(self.settings.min_shots, self.settings.max_shots);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::{ScriptedRolls, SessionRng};

    #[test]
    fn test_rarity_weights() {
        let settings = BonusSettings::default();
        assert_eq!(BonusRarity::from_roll(0.0, &settings), BonusRarity::Common);
        assert_eq!(BonusRarity::from_roll(0.49, &settings), BonusRarity::Common);
        assert_eq!(BonusRarity::from_roll(0.5, &settings), BonusRarity::Rare);
        assert_eq!(BonusRarity::from_roll(0.79, &settings), BonusRarity::Rare);
        assert_eq!(BonusRarity::from_roll(0.81, &settings), BonusRarity::Epic);
    }

    #[test]
    fn test_rarity_points() {
        let settings = BonusSettings::default();
        assert_eq!(BonusWindow::new(BonusRarity::Common, &settings).points, 4);
        assert_eq!(BonusWindow::new(BonusRarity::Rare, &settings).points, 6);
        assert_eq!(BonusWindow::new(BonusRarity::Epic, &settings).label(), "+8");
    }

    #[test]
    fn test_rarity_distribution_converges() {
        let settings = BonusSettings::default();
        let mut rng = SessionRng::new(2024);
        let trials = 20_000;
        let mut counts = [0u32; 3];
        for _ in 0..trials {
            match BonusRarity::from_roll(rng.roll(), &settings) {
                BonusRarity::Common => counts[0] += 1,
                BonusRarity::Rare => counts[1] += 1,
                BonusRarity::Epic => counts[2] += 1,
            }
        }
        let share = |c: u32| c as f32 / trials as f32;
        assert!((share(counts[0]) - 0.50).abs() < 0.02);
        assert!((share(counts[1]) - 0.30).abs() < 0.02);
        assert!((share(counts[2]) - 0.20).abs() < 0.02);
    }

    #[test]
    fn test_opens_at_threshold_and_reschedules() {
        let settings = BonusSettings::default();
        // First draw hits min_shots, rarity roll 0.0 = Common, reschedule at max
        let mut rng = ScriptedRolls::new(vec![0.0, 0.0, 0.9999]);
        let mut bonus = BonusScheduler::new(&settings, &mut rng);
        assert_eq!(bonus.next_at(), settings.min_shots);

        for _ in 1..settings.min_shots {
            assert!(bonus.on_shot_fired(&mut rng).is_none());
        }
        let window = bonus.on_shot_fired(&mut rng).unwrap();
        assert_eq!(window.rarity, BonusRarity::Common);
        assert_eq!(bonus.next_at(), settings.min_shots + settings.max_shots);
    }

    #[test]
    fn test_never_two_windows() {
        let settings = BonusSettings {
            min_shots: 1,
            max_shots: 1,
            ..BonusSettings::default()
        };
        let mut rng = SessionRng::new(8);
        let mut bonus = BonusScheduler::new(&settings, &mut rng);

        assert!(bonus.on_shot_fired(&mut rng).is_some());
        // Threshold reached again while open: no second window
        for _ in 0..5 {
            assert!(bonus.on_shot_fired(&mut rng).is_none());
            assert!(bonus.is_active());
        }
        bonus.consume().unwrap();
        // Overdue threshold fires on the next shot
        assert!(bonus.on_shot_fired(&mut rng).is_some());
    }

    #[test]
    fn test_consume_clears_and_keeps_schedule() {
        let settings = BonusSettings::default();
        let mut rng = SessionRng::new(31);
        let mut bonus = BonusScheduler::new(&settings, &mut rng);
        while bonus.on_shot_fired(&mut rng).is_none() {}
        let scheduled = bonus.next_at();
        assert!(scheduled > bonus.shots_seen());

        assert!(bonus.consume().is_some());
        assert!(!bonus.is_active());
        assert_eq!(bonus.next_at(), scheduled);
        assert!(bonus.consume().is_none());
    }

    #[test]
    fn test_window_expires() {
        let settings = BonusSettings::default();
        let mut rng = ScriptedRolls::new(vec![0.0]);
        let mut bonus = BonusScheduler::new(&settings, &mut rng);
        while bonus.on_shot_fired(&mut rng).is_none() {}

        assert!(bonus.advance(settings.duration - 0.5).is_none());
        assert!(bonus.is_active());
        assert!(bonus.advance(0.5).is_some());
        assert!(!bonus.is_active());
        assert!(bonus.advance(1.0).is_none());
    }
}
