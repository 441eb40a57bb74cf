//! Gameplay events for audio, UI and effects
//!
//! The match queues events as they happen and the host drains them once per
//! frame. Nothing in the simulation waits on a listener.

use serde::Serialize;

use super::bonus::BonusWindow;
use super::outcome::ScoreLabel;
use super::shot::{ShotId, ShotQuality, Side};
use super::state::{GameMode, MatchSummary};
use super::zones::ZoneView;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    MatchStarted {
        mode: GameMode,
        duration: f32,
    },
    ShotFired {
        id: ShotId,
        side: Side,
        quality: ShotQuality,
    },
    RimHit {
        id: ShotId,
    },
    BackboardHit {
        id: ShotId,
    },
    Scored {
        side: Side,
        /// None for points credited outside a tracked shot
        id: Option<ShotId>,
        /// Final points after any multiplier
        points: u32,
        label: Option<ScoreLabel>,
        on_fire: bool,
    },
    Missed {
        id: ShotId,
        side: Side,
    },
    BallReady {
        side: Side,
    },
    BonusSpawned {
        window: BonusWindow,
    },
    BonusConsumed {
        window: BonusWindow,
        side: Side,
    },
    BonusExpired {
        window: BonusWindow,
    },
    FireballProgress {
        consecutive: u32,
        threshold: u32,
    },
    FireballActivated {
        duration: f32,
    },
    FireballDeactivated,
    ZoneShuffleStarted {
        target: ZoneView,
    },
    ZoneShuffleCompleted {
        zones: ZoneView,
    },
    /// Clock hit zero with a ball still in the air
    FinalShotPending,
    MatchEnded {
        summary: MatchSummary,
    },
}

/// Receiver for drained events
pub trait EventSink {
    fn on_event(&mut self, event: &GameEvent);
}

impl<F: FnMut(&GameEvent)> EventSink for F {
    fn on_event(&mut self, event: &GameEvent) {
        self(event)
    }
}
