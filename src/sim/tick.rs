//! Match state machine and fixed timestep tick
//!
//! `MatchStateMachine` is the single owner of a match. The host feeds it
//! player input and collision facts, advances it once per frame with `tick`,
//! and drains the queued events afterwards.

use glam::Vec3;
use serde::Serialize;

use super::ai::{self, Difficulty};
use super::ballistics;
use super::bonus::{BonusRarity, BonusScheduler};
use super::events::{EventSink, GameEvent};
use super::fireball::{FireballState, StreakChange};
use super::outcome::{self, ScoreEvent, ScoreLabel};
use super::rng::{RandomSource, SessionRng};
use super::shot::{Shot, ShotId, ShotQuality, ShotTargets, Side, apply_power_error};
use super::state::{GameMode, MatchPhase, MatchState, MatchSummary};
use super::timers::{TimerKey, TimerRegistry};
use super::zones::{PowerZoneLayout, ZoneBoard, ZoneView, classify};
use crate::consts::LOW_TIME_SECS;
use crate::error::ConfigError;
use crate::settings::Settings;

/// Samples in the aim preview arc
const PREVIEW_POINTS: usize = 30;
/// Seconds between preview samples
const PREVIEW_STEP: f32 = 0.05;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pick up the power bar
    pub begin_aim: bool,
    /// Current power bar reading while held
    pub aim_power: Option<f32>,
    /// Let go and shoot
    pub release: bool,
    /// Ask for a new ball
    pub reset: bool,
}

/// What the collision host saw when a shot reached the hoop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contact {
    pub hit_rim: bool,
    pub hit_backboard: bool,
    /// Ball was dropping fast enough through the hoop to count
    pub passes_velocity_gate: bool,
}

impl Contact {
    /// Clean drop through the hoop
    pub fn through_hoop() -> Self {
        Self {
            passes_velocity_gate: true,
            ..Default::default()
        }
    }
}

/// Surface a shot touched mid-flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Rim,
    Backboard,
}

/// Projected shot for the aim preview
#[derive(Debug, Clone, Serialize)]
pub struct ShotPreview {
    pub quality: ShotQuality,
    pub aim: Vec3,
    pub velocity: Vec3,
    pub path: Vec<Vec3>,
}

/// Backboard bonus as the UI shows it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BonusView {
    pub rarity: BonusRarity,
    pub label: String,
    pub color: [f32; 3],
    pub points: u32,
    pub remaining: f32,
}

/// Fireball meter as the UI shows it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FireballView {
    pub active: bool,
    /// Streak fill while building, time left while burning (0..=1)
    pub progress: f32,
    pub remaining: f32,
    pub consecutive: u32,
    pub threshold: u32,
}

#[derive(Debug, Clone, Copy)]
struct AiShooter {
    spot: Vec3,
    /// Backboard aim shifted toward the AI's side
    backboard: Vec3,
}

/// Owner of one match: clock, scores, streaks, bonuses, zones and shots
#[derive(Debug)]
pub struct MatchStateMachine {
    settings: Settings,
    state: MatchState,
    zones: ZoneBoard,
    bonus: BonusScheduler,
    fireball: FireballState,
    timers: TimerRegistry,
    rng: SessionRng,
    /// Live shots, in id order
    shots: Vec<Shot>,
    next_shot_id: u32,
    player_has_ball: bool,
    aim_power: Option<f32>,
    ai: Option<AiShooter>,
    events: Vec<GameEvent>,
}

impl MatchStateMachine {
    /// Build a match; fails only on invalid settings
    pub fn new(
        settings: Settings,
        mode: GameMode,
        difficulty: Difficulty,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;
        let zones = ZoneBoard::new(&settings.zones, &settings.shuffle)?;
        let mut rng = SessionRng::new(seed);
        let bonus = BonusScheduler::new(&settings.bonus, &mut rng);
        let duration = match mode {
            GameMode::Practice => settings.match_rules.practice_duration,
            GameMode::VsAi => settings.match_rules.vs_ai_duration,
        };

        Ok(Self {
            state: MatchState::new(mode, difficulty, duration),
            fireball: FireballState::new(&settings.fireball),
            zones,
            bonus,
            timers: TimerRegistry::new(),
            rng,
            shots: Vec::new(),
            next_shot_id: 1,
            player_has_ball: false,
            aim_power: None,
            ai: None,
            events: Vec::new(),
            settings,
        })
    }

    /// NotStarted -> Running
    pub fn start(&mut self) -> bool {
        if self.state.phase != MatchPhase::NotStarted {
            log::debug!("Start ignored in phase {:?}", self.state.phase);
            return false;
        }

        self.state.phase = MatchPhase::Running;
        self.player_has_ball = true;
        log::info!(
            "Match started: {} ({}), {:.0}s, seed {}",
            self.state.mode.as_str(),
            self.state.difficulty.as_str(),
            self.state.duration,
            self.rng.seed
        );
        self.emit(GameEvent::MatchStarted {
            mode: self.state.mode,
            duration: self.state.duration,
        });

        if self.state.mode == GameMode::VsAi {
            self.ai_reload();
        }
        true
    }

    /// Reset everything and play again with the same mode and seed
    pub fn restart(&mut self) {
        self.return_to_menu();
        self.start();
    }

    /// Drop the current match and go back to NotStarted
    ///
    /// The RNG rewinds to its seed, so the next match replays the same draws.
    /// Undrained events are kept.
    pub fn return_to_menu(&mut self) {
        self.rng.reseed();
        self.state.reset();
        self.zones.reset();
        self.fireball.reset();
        self.bonus.reset(&mut self.rng);
        self.timers.clear();
        self.shots.clear();
        self.next_shot_id = 1;
        self.player_has_ball = false;
        self.aim_power = None;
        self.ai = None;
        log::info!("Match reset");
    }

    /// Apply one frame of input, then advance
    pub fn step(&mut self, input: &TickInput, dt: f32) {
        if input.reset {
            self.request_reset();
        }
        if input.begin_aim {
            self.begin_aim();
        }
        if let Some(power) = input.aim_power {
            self.update_aim(power);
        }
        if input.release {
            self.release_aim();
        }
        self.tick(dt);
    }

    /// Advance clock, timers and animations by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        if !self.accepts_reports() {
            return;
        }
        let dt = dt.max(0.0);
        self.state.time_ticks += 1;

        if self.state.phase == MatchPhase::Running {
            self.state.remaining = (self.state.remaining - dt).max(0.0);
            if self.state.remaining <= 0.0 {
                self.on_clock_expired();
                if self.state.phase == MatchPhase::Ended {
                    return;
                }
            }
        }

        if let Some(window) = self.bonus.advance(dt) {
            self.emit(GameEvent::BonusExpired { window });
        }
        if self.fireball.advance(dt) {
            self.emit(GameEvent::FireballDeactivated);
        }
        if self.zones.advance(dt) {
            let zones = self.zones.display();
            log::debug!("Zone shuffle complete");
            self.emit(GameEvent::ZoneShuffleCompleted { zones });
        }

        for key in self.timers.advance(dt) {
            self.on_timer(key);
        }

        if self.state.phase == MatchPhase::WaitingForBall && !self.ball_in_flight() {
            self.end_match();
        }
    }

    /// Shoot at `power`, classified against the stable zone layout
    ///
    /// Returns None (and changes nothing) unless the match is running and the
    /// player holds a ball.
    pub fn commit_shot(&mut self, power: f32) -> Option<Shot> {
        if self.state.phase != MatchPhase::Running {
            log::debug!("Shot ignored: match is {:?}", self.state.phase);
            return None;
        }
        if !self.player_has_ball {
            log::debug!("Shot ignored: player has no ball");
            return None;
        }

        self.timers.cancel(TimerKey::PlayerAutoShoot);
        self.aim_power = None;

        let quality = classify(power, &self.zones.snapshot());
        let court = &self.settings.court;
        let origin = court.player_spot;
        let targets = ShotTargets {
            basket: court.basket,
            backboard: court.backboard,
        };
        let shot = self.launch(Side::Player, origin, targets, quality, Some(power));

        self.player_has_ball = false;
        self.timers
            .schedule(TimerKey::PlayerAutoReset, self.settings.timing.auto_reset_delay);
        Some(shot)
    }

    /// Where a release at `power` would go, without shooting
    pub fn preview_shot(&self, power: f32) -> ShotPreview {
        let quality = classify(power, &self.zones.snapshot());
        let court = &self.settings.court;
        let physics = &self.settings.shot;
        let targets = ShotTargets {
            basket: court.basket,
            backboard: court.backboard,
        };

        let aim = targets.aim_point(quality, physics.high_backboard_offset);
        let velocity = ballistics::solve(court.player_spot, aim, physics.arc_height, physics.gravity);
        let path = ballistics::trajectory_points(
            court.player_spot,
            velocity,
            physics.gravity,
            PREVIEW_POINTS,
            PREVIEW_STEP,
        );
        ShotPreview {
            quality,
            aim,
            velocity,
            path,
        }
    }

    /// Start holding the power bar; arms the auto-shoot countdown
    pub fn begin_aim(&mut self) -> bool {
        if self.state.phase != MatchPhase::Running || !self.player_has_ball {
            return false;
        }
        self.timers.cancel(TimerKey::PlayerAutoReset);
        self.aim_power = Some(0.0);
        self.timers
            .schedule(TimerKey::PlayerAutoShoot, self.settings.timing.auto_shoot_delay);
        true
    }

    pub fn update_aim(&mut self, power: f32) {
        if let Some(current) = self.aim_power.as_mut() {
            *current = if power.is_nan() { 0.0 } else { power.clamp(0.0, 1.0) };
        }
    }

    pub fn release_aim(&mut self) -> Option<Shot> {
        let power = self.aim_power.take()?;
        self.commit_shot(power)
    }

    /// Take a fresh ball now
    ///
    /// Cancels pending auto-reset and auto-shoot waits. A player shot still in
    /// the air is ruled a miss.
    pub fn request_reset(&mut self) -> bool {
        if !self.accepts_reports() {
            return false;
        }
        self.timers.cancel(TimerKey::PlayerAutoReset);
        self.timers.cancel(TimerKey::PlayerAutoShoot);
        self.aim_power = None;
        self.reset_player_ball();
        true
    }

    /// Record a rim or backboard touch on a shot in the air
    pub fn report_contact(&mut self, id: ShotId, surface: Surface) -> bool {
        let Some(shot) = self.shots.iter_mut().find(|s| s.id == id && s.in_flight()) else {
            log::debug!("Contact on unknown or resolved shot {:?} ignored", id);
            return false;
        };

        let event = match surface {
            Surface::Rim => {
                shot.hit_rim = true;
                GameEvent::RimHit { id }
            }
            Surface::Backboard => {
                shot.hit_backboard = true;
                GameEvent::BackboardHit { id }
            }
        };
        self.emit(event);
        true
    }

    /// New velocity for a bank shot that just touched the backboard at `point`
    ///
    /// Only Good shots are steered; everything else keeps its own flight.
    pub fn rebound_velocity(&self, id: ShotId, point: Vec3) -> Option<Vec3> {
        let shot = self.shots.iter().find(|s| s.id == id && s.in_flight())?;
        if shot.quality != ShotQuality::Good {
            return None;
        }
        let physics = &self.settings.shot;
        Some(ballistics::rebound_velocity(
            point,
            shot.targets.basket,
            physics.rebound_arc_height,
            physics.gravity,
        ))
    }

    /// The ball passed through the hoop
    ///
    /// Scores the shot once; later reports for the same shot are ignored. A
    /// contact that fails the velocity gate scores nothing but its rim and
    /// backboard flags still stick to the shot. Returns the points before the
    /// streak multiplier.
    pub fn report_collision(&mut self, id: ShotId, contact: Contact) -> Option<ScoreEvent> {
        if !self.accepts_reports() {
            return None;
        }
        let Some(shot) = self.shots.iter_mut().find(|s| s.id == id) else {
            log::debug!("Collision for unknown shot {:?} ignored", id);
            return None;
        };
        if shot.scored {
            log::debug!("Shot {:?} already scored, collision ignored", id);
            return None;
        }
        if shot.missed {
            log::debug!("Shot {:?} already ruled a miss, collision ignored", id);
            return None;
        }
        shot.hit_rim |= contact.hit_rim;
        shot.hit_backboard |= contact.hit_backboard;
        if !contact.passes_velocity_gate {
            log::debug!("Shot {:?} entered the hoop too slowly", id);
            return None;
        }

        shot.scored = true;
        let side = shot.side;
        let event = outcome::resolve(
            shot.quality,
            shot.hit_rim,
            shot.hit_backboard,
            self.bonus.active(),
        );

        if event.consumed_bonus {
            if let Some(window) = self.bonus.consume() {
                self.emit(GameEvent::BonusConsumed { window, side });
            }
        }
        self.award(side, Some(id), event.points, Some(event.label));
        Some(event)
    }

    /// The shot is not going in
    pub fn report_miss(&mut self, id: ShotId) -> bool {
        if !self.accepts_reports() {
            return false;
        }
        let Some(shot) = self.shots.iter_mut().find(|s| s.id == id && s.in_flight()) else {
            log::debug!("Miss for unknown or resolved shot {:?} ignored", id);
            return false;
        };
        shot.missed = true;
        let side = shot.side;

        log::debug!("Shot {:?} by {:?} missed", id, side);
        self.emit(GameEvent::Missed { id, side });

        if side == Side::Player {
            let threshold = self.fireball.threshold();
            match self.fireball.on_miss() {
                StreakChange::Deactivated => self.emit(GameEvent::FireballDeactivated),
                StreakChange::Progress(consecutive) => self.emit(GameEvent::FireballProgress {
                    consecutive,
                    threshold,
                }),
                _ => {}
            }
        }
        true
    }

    /// Credit `points` to a side outside any tracked shot; returns points awarded
    pub fn report_make(&mut self, side: Side, points: u32) -> u32 {
        if !self.accepts_reports() {
            return 0;
        }
        self.award(side, None, points, None)
    }

    /// Queued events, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn dispatch_events(&mut self, sink: &mut dyn EventSink) {
        for event in self.drain_events() {
            sink.on_event(&event);
        }
    }

    pub fn phase(&self) -> MatchPhase {
        self.state.phase
    }

    pub fn mode(&self) -> GameMode {
        self.state.mode
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn timers(&self) -> &TimerRegistry {
        &self.timers
    }

    pub fn remaining_time(&self) -> f32 {
        self.state.remaining
    }

    /// Whole seconds for the clock display
    pub fn display_seconds(&self) -> u32 {
        self.state.remaining.ceil() as u32
    }

    pub fn time_is_low(&self) -> bool {
        self.state.phase == MatchPhase::Running && self.state.remaining <= LOW_TIME_SECS
    }

    /// (player, opponent)
    pub fn scores(&self) -> (u32, u32) {
        (self.state.player_score, self.state.opponent_score)
    }

    pub fn bonus_view(&self) -> Option<BonusView> {
        self.bonus.active().map(|w| BonusView {
            rarity: w.rarity,
            label: w.label(),
            color: w.rarity.color(),
            points: w.points,
            remaining: w.remaining,
        })
    }

    pub fn fireball_view(&self) -> FireballView {
        FireballView {
            active: self.fireball.is_active(),
            progress: self.fireball.progress(),
            remaining: self.fireball.remaining(),
            consecutive: self.fireball.consecutive(),
            threshold: self.fireball.threshold(),
        }
    }

    /// Layout shots are classified against
    pub fn zones(&self) -> PowerZoneLayout {
        self.zones.snapshot()
    }

    /// Layout to draw, mid-shuffle included
    pub fn display_zones(&self) -> ZoneView {
        self.zones.display()
    }

    pub fn shots(&self) -> &[Shot] {
        &self.shots
    }

    pub fn shot(&self, id: ShotId) -> Option<&Shot> {
        self.shots.iter().find(|s| s.id == id)
    }

    pub fn player_has_ball(&self) -> bool {
        self.player_has_ball
    }

    pub fn aim_power(&self) -> Option<f32> {
        self.aim_power
    }

    pub fn ai_spot(&self) -> Option<Vec3> {
        self.ai.map(|a| a.spot)
    }

    pub fn ball_in_flight(&self) -> bool {
        self.shots.iter().any(Shot::in_flight)
    }

    /// Final result, once the match has ended
    pub fn summary(&self) -> Option<MatchSummary> {
        (self.state.phase == MatchPhase::Ended)
            .then(|| self.state.summary(&self.settings.match_rules))
    }

    fn accepts_reports(&self) -> bool {
        matches!(
            self.state.phase,
            MatchPhase::Running | MatchPhase::WaitingForBall
        )
    }

    fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    fn launch(
        &mut self,
        side: Side,
        origin: Vec3,
        targets: ShotTargets,
        quality: ShotQuality,
        power: Option<f32>,
    ) -> Shot {
        let physics = &self.settings.shot;
        let aim = targets.aim_point(quality, physics.high_backboard_offset);
        let ideal = ballistics::solve(origin, aim, physics.arc_height, physics.gravity);
        let velocity = if physics.error_injection {
            apply_power_error(ideal, quality, &mut self.rng)
        } else {
            ideal
        };

        let id = ShotId(self.next_shot_id);
        self.next_shot_id += 1;
        let shot = Shot {
            id,
            side,
            origin,
            targets,
            aim,
            velocity,
            quality,
            power,
            hit_rim: false,
            hit_backboard: false,
            scored: false,
            missed: false,
        };

        self.state.count_shot(side);
        log::debug!(
            "Shot {:?} by {:?}: {} (power {:?})",
            id,
            side,
            quality.as_str(),
            power
        );
        self.emit(GameEvent::ShotFired { id, side, quality });
        if let Some(window) = self.bonus.on_shot_fired(&mut self.rng) {
            self.emit(GameEvent::BonusSpawned { window });
        }

        self.shots.push(shot.clone());
        shot
    }

    /// Add points and feed the player's streak and zone shuffle
    fn award(
        &mut self,
        side: Side,
        id: Option<ShotId>,
        points: u32,
        label: Option<ScoreLabel>,
    ) -> u32 {
        let on_fire = side == Side::Player && self.fireball.is_active();
        let awarded = match side {
            Side::Player => self.fireball.apply_multiplier(points),
            Side::Opponent => points,
        };
        self.state.add_points(side, awarded);
        log::debug!(
            "{:?} scored {} ({}), total {}",
            side,
            awarded,
            label.map(|l| l.to_string()).unwrap_or_default(),
            self.state.score(side)
        );
        self.emit(GameEvent::Scored {
            side,
            id,
            points: awarded,
            label,
            on_fire,
        });

        if side == Side::Opponent {
            return awarded;
        }

        let threshold = self.fireball.threshold();
        match self.fireball.on_make() {
            StreakChange::Progress(consecutive) => self.emit(GameEvent::FireballProgress {
                consecutive,
                threshold,
            }),
            StreakChange::Activated => self.emit(GameEvent::FireballActivated {
                duration: self.settings.fireball.duration,
            }),
            _ => {}
        }

        if let Some(start) = self.zones.on_score(self.state.player_score, &mut self.rng) {
            if let Some(zones) = start.snapped {
                self.emit(GameEvent::ZoneShuffleCompleted { zones });
            }
            self.emit(GameEvent::ZoneShuffleStarted {
                target: start.target,
            });
            if start.settled {
                self.emit(GameEvent::ZoneShuffleCompleted {
                    zones: start.target,
                });
            }
        }
        awarded
    }

    fn on_timer(&mut self, key: TimerKey) {
        match key {
            TimerKey::PlayerAutoReset => self.reset_player_ball(),
            TimerKey::PlayerAutoShoot => {
                if let Some(power) = self.aim_power.take() {
                    log::debug!("Auto-shoot at power {:.3}", power);
                    self.commit_shot(power);
                }
            }
            TimerKey::AiShoot => self.ai_shoot(),
            TimerKey::AiReset => {
                self.clear_shots(Side::Opponent);
                if self.state.phase == MatchPhase::Running {
                    self.ai_reload();
                }
            }
        }
    }

    fn on_clock_expired(&mut self) {
        self.aim_power = None;
        self.timers.cancel(TimerKey::PlayerAutoShoot);
        self.timers.cancel(TimerKey::AiShoot);

        if self.ball_in_flight() {
            self.state.phase = MatchPhase::WaitingForBall;
            log::info!("Time up with a shot in the air, waiting for it to land");
            self.emit(GameEvent::FinalShotPending);
        } else {
            self.end_match();
        }
    }

    fn end_match(&mut self) {
        self.state.phase = MatchPhase::Ended;
        self.timers.clear();
        self.shots.clear();
        self.player_has_ball = false;
        self.aim_power = None;

        let summary = self.state.summary(&self.settings.match_rules);
        log::info!(
            "Match ended: player {} - opponent {} ({:?})",
            summary.player_score,
            summary.opponent_score,
            summary.outcome
        );
        self.emit(GameEvent::MatchEnded { summary });
    }

    /// Rule a side's airborne shots as misses and forget its shots
    fn clear_shots(&mut self, side: Side) {
        let pending: Vec<ShotId> = self
            .shots
            .iter()
            .filter(|s| s.side == side && s.in_flight())
            .map(|s| s.id)
            .collect();
        for id in pending {
            self.report_miss(id);
        }
        self.shots.retain(|s| s.side != side);
    }

    fn reset_player_ball(&mut self) {
        self.clear_shots(Side::Player);
        if self.state.phase == MatchPhase::Running && !self.player_has_ball {
            self.player_has_ball = true;
            self.emit(GameEvent::BallReady { side: Side::Player });
        }
    }

    fn ai_shoot(&mut self) {
        if self.state.phase != MatchPhase::Running {
            return;
        }
        let Some(shooter) = self.ai else {
            return;
        };

        let roll = self.rng.roll();
        let quality = ai::decide(
            self.state.difficulty,
            self.bonus.is_active(),
            self.fireball.is_active(),
            roll,
        );
        let targets = ShotTargets {
            basket: self.settings.court.basket,
            backboard: shooter.backboard,
        };
        self.launch(Side::Opponent, shooter.spot, targets, quality, None);
        self.timers
            .schedule(TimerKey::AiReset, self.settings.timing.ai_reset_delay);
    }

    /// Move the AI to a fresh spot and arm its next shot
    fn ai_reload(&mut self) {
        let court = &self.settings.court;
        let Some(spot) = ai::pick_spot(
            &court.ai_spots,
            court.player_spot,
            court.ai_min_separation,
            &mut self.rng,
        ) else {
            return;
        };
        let backboard = ai::backboard_target(
            court.backboard,
            court.basket,
            spot,
            court.backboard_lateral_factor,
            court.backboard_lateral_limit,
        );

        log::debug!("AI moves to ({:.2}, {:.2}, {:.2})", spot.x, spot.y, spot.z);
        self.ai = Some(AiShooter { spot, backboard });
        self.timers
            .schedule(TimerKey::AiShoot, self.settings.timing.ai_shoot_delay);
        self.emit(GameEvent::BallReady { side: Side::Opponent });
    }
}
