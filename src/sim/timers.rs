//! Named countdown timers
//!
//! Each actor wait (auto-reset, auto-shoot, AI cadence) is a named countdown
//! advanced by the match tick. Scheduling a key that is already pending
//! replaces it, so one actor never has two copies of the same wait.

use serde::{Deserialize, Serialize};

/// Which wait a countdown belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimerKey {
    /// Player gets a fresh ball
    PlayerAutoReset,
    /// Held aim fires on its own
    PlayerAutoShoot,
    /// AI releases its shot
    AiShoot,
    /// AI moves to a new spot and reloads
    AiReset,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct Countdown {
    key: TimerKey,
    remaining: f32,
}

/// Pending countdowns, kept sorted by key
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimerRegistry {
    timers: Vec<Countdown>,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the countdown for `key`
    pub fn schedule(&mut self, key: TimerKey, secs: f32) {
        let remaining = secs.max(0.0);
        match self.timers.binary_search_by_key(&key, |t| t.key) {
            Ok(i) => {
                log::debug!("Timer {:?} restarted ({:.2}s)", key, remaining);
                self.timers[i].remaining = remaining;
            }
            Err(i) => self.timers.insert(i, Countdown { key, remaining }),
        }
    }

    /// Drop a pending countdown; returns whether one was pending
    pub fn cancel(&mut self, key: TimerKey) -> bool {
        match self.timers.binary_search_by_key(&key, |t| t.key) {
            Ok(i) => {
                self.timers.remove(i);
                true
            }
            Err(_) => false,
        }
    }

    pub fn remaining(&self, key: TimerKey) -> Option<f32> {
        self.timers
            .iter()
            .find(|t| t.key == key)
            .map(|t| t.remaining)
    }

    pub fn is_pending(&self, key: TimerKey) -> bool {
        self.remaining(key).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Run every countdown down by `dt`; returns the keys that fired, in key order
    pub fn advance(&mut self, dt: f32) -> Vec<TimerKey> {
        let mut fired = Vec::new();
        self.timers.retain_mut(|t| {
            t.remaining -= dt;
            if t.remaining <= 0.0 {
                fired.push(t.key);
                false
            } else {
                true
            }
        });
        fired
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_after_delay() {
        let mut timers = TimerRegistry::new();
        timers.schedule(TimerKey::AiShoot, 2.0);
        assert!(timers.advance(1.5).is_empty());
        assert_eq!(timers.advance(0.5), vec![TimerKey::AiShoot]);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_reschedule_replaces() {
        let mut timers = TimerRegistry::new();
        timers.schedule(TimerKey::PlayerAutoReset, 2.0);
        timers.advance(1.9);
        timers.schedule(TimerKey::PlayerAutoReset, 2.0);
        assert!(timers.advance(1.0).is_empty());
        assert_eq!(timers.remaining(TimerKey::PlayerAutoReset), Some(1.0));
    }

    #[test]
    fn test_cancel() {
        let mut timers = TimerRegistry::new();
        timers.schedule(TimerKey::PlayerAutoShoot, 1.0);
        assert!(timers.cancel(TimerKey::PlayerAutoShoot));
        assert!(!timers.cancel(TimerKey::PlayerAutoShoot));
        assert!(timers.advance(5.0).is_empty());
    }

    #[test]
    fn test_fire_order_is_stable() {
        let mut timers = TimerRegistry::new();
        timers.schedule(TimerKey::AiReset, 0.5);
        timers.schedule(TimerKey::PlayerAutoReset, 1.0);
        timers.schedule(TimerKey::AiShoot, 0.1);
        assert_eq!(
            timers.advance(1.0),
            vec![TimerKey::PlayerAutoReset, TimerKey::AiShoot, TimerKey::AiReset]
        );
    }

    #[test]
    fn test_zero_delay_fires_next_advance() {
        let mut timers = TimerRegistry::new();
        timers.schedule(TimerKey::AiReset, -3.0);
        assert_eq!(timers.remaining(TimerKey::AiReset), Some(0.0));
        assert_eq!(timers.advance(0.0), vec![TimerKey::AiReset]);
    }
}
