//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time advances only through `tick(dt)`
//! - Seeded RNG only
//! - Stable iteration order (shots by id, timers by key)
//! - No rendering, audio or input dependencies

pub mod ai;
pub mod ballistics;
pub mod bonus;
pub mod events;
pub mod fireball;
pub mod outcome;
pub mod rng;
pub mod shot;
pub mod state;
pub mod tick;
pub mod timers;
pub mod zones;

pub use ai::Difficulty;
pub use bonus::{BonusRarity, BonusScheduler, BonusWindow};
pub use events::{EventSink, GameEvent};
pub use fireball::{FireballState, StreakChange};
pub use outcome::{ScoreEvent, ScoreLabel};
pub use rng::{RandomSource, ScriptedRolls, SessionRng};
pub use shot::{Shot, ShotId, ShotQuality, ShotTargets, Side};
pub use state::{
    GameMode, MatchOutcome, MatchPhase, MatchState, MatchSummary, PracticeRating, VsAiResult,
};
pub use tick::{
    BonusView, Contact, FireballView, MatchStateMachine, ShotPreview, Surface, TickInput,
};
pub use timers::{TimerKey, TimerRegistry};
pub use zones::{PowerZoneLayout, ShuffleStart, ZoneBoard, ZoneRange, ZoneView, classify};
