//! Fireball hot streak
//!
//! Enough consecutive makes set the shooter on fire: points are multiplied
//! until the timer runs out or a shot misses.

use serde::Serialize;

use crate::settings::FireballSettings;

/// What a make or miss did to the streak
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakChange {
    /// Nothing changed (already burning, or a miss with no streak)
    Unchanged,
    /// Counter moved; carries the new count
    Progress(u32),
    /// Just caught fire
    Activated,
    /// Fire went out
    Deactivated,
}

#[derive(Debug, Clone, Serialize)]
pub struct FireballState {
    consecutive: u32,
    active: bool,
    remaining: f32,
    settings: FireballSettings,
}

impl FireballState {
    pub fn new(settings: &FireballSettings) -> Self {
        Self {
            consecutive: 0,
            active: false,
            remaining: 0.0,
            settings: settings.clone(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn consecutive(&self) -> u32 {
        self.consecutive
    }

    pub fn threshold(&self) -> u32 {
        self.settings.makes_to_activate
    }

    /// Seconds of fire left (zero when not burning)
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Bar fill for the UI: streak progress while building, time left while burning
    pub fn progress(&self) -> f32 {
        if self.active {
            (self.remaining / self.settings.duration).clamp(0.0, 1.0)
        } else {
            self.consecutive as f32 / self.settings.makes_to_activate as f32
        }
    }

    /// Points after the streak multiplier
    pub fn apply_multiplier(&self, points: u32) -> u32 {
        if self.active {
            points.saturating_mul(self.settings.multiplier)
        } else {
            points
        }
    }

    pub fn on_make(&mut self) -> StreakChange {
        if self.active {
            return StreakChange::Unchanged;
        }

        self.consecutive += 1;
        if self.consecutive >= self.settings.makes_to_activate {
            self.consecutive = 0;
            self.active = true;
            self.remaining = self.settings.duration;
            log::info!("Fireball activated for {:.1}s", self.settings.duration);
            return StreakChange::Activated;
        }

        log::debug!(
            "Fireball streak {}/{}",
            self.consecutive,
            self.settings.makes_to_activate
        );
        StreakChange::Progress(self.consecutive)
    }

    pub fn on_miss(&mut self) -> StreakChange {
        if self.consecutive == 0 && !self.active {
            return StreakChange::Unchanged;
        }

        self.consecutive = 0;
        if self.active {
            self.deactivate();
            return StreakChange::Deactivated;
        }
        StreakChange::Progress(0)
    }

    /// Burn down the timer; returns true if the fire just went out
    pub fn advance(&mut self, dt: f32) -> bool {
        if !self.active {
            return false;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.deactivate();
            log::info!("Fireball expired");
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.consecutive = 0;
        self.active = false;
        self.remaining = 0.0;
    }

    fn deactivate(&mut self) {
        self.active = false;
        self.remaining = 0.0;
        self.consecutive = 0;
    }
}
