//! Hoop Rush headless runner
//!
//! Plays one seeded match against a toy collision host and prints the
//! summary as JSON. Usage:
//!
//! ```text
//! hoop-rush [practice|vsai] [easy|normal|hard] [seed] [settings.json]
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use hoop_rush::consts::SIM_DT;
use hoop_rush::sim::{
    Contact, Difficulty, GameEvent, GameMode, MatchPhase, MatchStateMachine, ShotId, Surface,
    TickInput, ballistics,
};
use hoop_rush::{ConfigError, Settings};

/// Horizontal distance from the hoop center that still drops in
const RIM_RADIUS: f32 = 0.23;
/// Band outside the opening that clips the rim
const RIM_THICKNESS: f32 = 0.08;
/// Ball must be falling at least this fast through the hoop
const MIN_DROP_SPEED: f32 = 1.0;
/// Half height of the backboard face
const BACKBOARD_HALF_HEIGHT: f32 = 0.6;
/// Power bar fill rate (full bar per second)
const BAR_FILL_RATE: f32 = 1.0;
/// How far the demo shooter's release wanders from the zone center
const RELEASE_SPREAD: f32 = 0.12;
/// Safety stop for the frame loop (seconds)
const MAX_SIM_SECS: f32 = 600.0;

/// A ball the host is flying along its parabola
struct Flight {
    origin: Vec3,
    velocity: Vec3,
    elapsed: f32,
    banked: bool,
}

/// Stand-in for the physics engine: flies shots and reports what they hit
struct ToyCourt {
    basket: Vec3,
    backboard: Vec3,
    gravity: f32,
    flights: BTreeMap<ShotId, Flight>,
}

impl ToyCourt {
    fn new(settings: &Settings) -> Self {
        Self {
            basket: settings.court.basket,
            backboard: settings.court.backboard,
            gravity: settings.shot.gravity,
            flights: BTreeMap::new(),
        }
    }

    fn launch(&mut self, sm: &MatchStateMachine, id: ShotId) {
        if let Some(shot) = sm.shot(id) {
            self.flights.insert(
                id,
                Flight {
                    origin: shot.origin,
                    velocity: shot.velocity,
                    elapsed: 0.0,
                    banked: false,
                },
            );
        }
    }

    fn step(&mut self, sm: &mut MatchStateMachine, dt: f32) {
        let mut landed = Vec::new();

        for (&id, flight) in self.flights.iter_mut() {
            let before = ballistics::position_at(flight.origin, flight.velocity, self.gravity, flight.elapsed);
            flight.elapsed += dt;
            let pos = ballistics::position_at(flight.origin, flight.velocity, self.gravity, flight.elapsed);
            let vertical = flight.velocity.y - self.gravity * flight.elapsed;

            if !flight.banked
                && before.z < self.backboard.z
                && pos.z >= self.backboard.z
                && (pos.y - self.backboard.y).abs() < BACKBOARD_HALF_HEIGHT
            {
                flight.banked = true;
                sm.report_contact(id, Surface::Backboard);
                let bounce = sm.rebound_velocity(id, pos).unwrap_or(Vec3::new(
                    flight.velocity.x,
                    vertical,
                    -0.5 * flight.velocity.z,
                ));
                *flight = Flight {
                    origin: pos,
                    velocity: bounce,
                    elapsed: 0.0,
                    banked: true,
                };
                continue;
            }

            if vertical < 0.0 && before.y >= self.basket.y && pos.y < self.basket.y {
                let offset = Vec3::new(pos.x - self.basket.x, 0.0, pos.z - self.basket.z).length();
                if offset < RIM_RADIUS {
                    let contact = Contact {
                        hit_rim: false,
                        hit_backboard: flight.banked,
                        passes_velocity_gate: vertical < -MIN_DROP_SPEED,
                    };
                    if sm.report_collision(id, contact).is_some() {
                        landed.push(id);
                        continue;
                    }
                } else if offset < RIM_RADIUS + RIM_THICKNESS {
                    sm.report_contact(id, Surface::Rim);
                }
            }

            if pos.y < 0.0 {
                sm.report_miss(id);
                landed.push(id);
            }
        }

        for id in landed {
            self.flights.remove(&id);
        }
    }

    fn forget(&mut self, id: ShotId) {
        self.flights.remove(&id);
    }
}

/// Demo shooter: fills the bar and lets go near the perfect zone
struct DemoShooter {
    rng: Pcg32,
    target: Option<f32>,
    held: f32,
}

impl DemoShooter {
    fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            target: None,
            held: 0.0,
        }
    }

    fn input(&mut self, sm: &MatchStateMachine) -> TickInput {
        let mut input = TickInput::default();
        if sm.phase() != MatchPhase::Running || !sm.player_has_ball() {
            self.target = None;
            return input;
        }

        match self.target {
            None => {
                let perfect = sm.zones().perfect();
                let center = (perfect.start + perfect.end) * 0.5;
                let spread = self.rng.random_range(-RELEASE_SPREAD..RELEASE_SPREAD);
                self.target = Some((center + spread).clamp(0.0, 1.0));
                self.held = 0.0;
                input.begin_aim = true;
            }
            Some(target) => {
                self.held += SIM_DT;
                let power = (self.held * BAR_FILL_RATE).min(1.0);
                input.aim_power = Some(power);
                if power >= target {
                    input.release = true;
                    self.target = None;
                }
            }
        }
        input
    }
}

fn parse_args() -> Result<(GameMode, Difficulty, u64, Settings), ConfigError> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let mode = args
        .first()
        .and_then(|s| GameMode::from_str(s))
        .unwrap_or(GameMode::VsAi);
    let difficulty = args
        .get(1)
        .and_then(|s| Difficulty::from_str(s))
        .unwrap_or_default();
    let seed = args
        .get(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xB4_5E_BA11);
    let settings = match args.get(3) {
        Some(path) => Settings::load(Path::new(path))?,
        None => Settings::default(),
    };
    Ok((mode, difficulty, seed, settings))
}

fn run() -> Result<(), ConfigError> {
    let (mode, difficulty, seed, settings) = parse_args()?;
    let mut court = ToyCourt::new(&settings);
    let mut sm = MatchStateMachine::new(settings, mode, difficulty, seed)?;
    let mut shooter = DemoShooter::new(seed.wrapping_add(1));

    sm.start();
    let mut elapsed = 0.0;
    let mut summary = None;

    while summary.is_none() && elapsed < MAX_SIM_SECS {
        let input = shooter.input(&sm);
        sm.step(&input, SIM_DT);
        court.step(&mut sm, SIM_DT);
        elapsed += SIM_DT;

        for event in sm.drain_events() {
            match &event {
                GameEvent::ShotFired { id, .. } => court.launch(&sm, *id),
                GameEvent::Missed { id, .. } => court.forget(*id),
                GameEvent::MatchEnded { summary: s } => summary = Some(*s),
                GameEvent::Scored {
                    side,
                    points,
                    label,
                    ..
                } => log::info!(
                    "{:?} +{} {}",
                    side,
                    points,
                    label.map(|l| l.to_string()).unwrap_or_default()
                ),
                _ => log::debug!("{:?}", event),
            }
        }
    }

    match summary {
        Some(summary) => println!("{}", serde_json::to_string_pretty(&summary)?),
        None => log::warn!("Match did not finish within {:.0}s", MAX_SIM_SECS),
    }
    Ok(())
}

fn main() {
    env_logger::init();
    log::info!("Hoop Rush (headless) starting...");

    if let Err(e) = run() {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
