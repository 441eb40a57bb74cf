//! Closed-form launch velocity for a lobbed shot
//!
//! Given a start point, a target point and how far the apex should rise above
//! the higher of the two, the flight splits into a rise to the apex and a fall
//! to the target. Each half is a free fall, so both durations and the vertical
//! launch speed come straight from `h = g·t²/2`.

use glam::Vec3;

/// Heights of the rising and falling halves of the flight
#[inline]
fn flight_heights(start: Vec3, target: Vec3, apex_height: f32) -> (f32, f32) {
    let peak = start.y.max(target.y) + apex_height;
    ((peak - start.y).max(0.0), (peak - target.y).max(0.0))
}

/// Time from launch until the ball arrives at `target`
pub fn flight_time(start: Vec3, target: Vec3, apex_height: f32, gravity: f32) -> f32 {
    let (rise, fall) = flight_heights(start, target, apex_height);
    (2.0 * rise / gravity).sqrt() + (2.0 * fall / gravity).sqrt()
}

/// Launch velocity that carries a ball from `start` through `target`
///
/// `gravity` is the magnitude of the downward acceleration and must be > 0.
/// Coincident horizontal positions give a purely vertical velocity, and a
/// flight with zero duration gives no horizontal component either.
pub fn solve(start: Vec3, target: Vec3, apex_height: f32, gravity: f32) -> Vec3 {
    let (rise, _) = flight_heights(start, target, apex_height);

    let displacement = target - start;
    let horizontal = Vec3::new(displacement.x, 0.0, displacement.z);
    let horizontal_distance = horizontal.length();

    let total_time = flight_time(start, target, apex_height, gravity);
    let vertical_speed = (2.0 * gravity * rise).sqrt();

    let horizontal_speed = if total_time > f32::EPSILON {
        horizontal_distance / total_time
    } else {
        0.0
    };

    horizontal.normalize_or_zero() * horizontal_speed + Vec3::Y * vertical_speed
}

/// Ball position `t` seconds after leaving `start` with `velocity`
#[inline]
pub fn position_at(start: Vec3, velocity: Vec3, gravity: f32, t: f32) -> Vec3 {
    start + velocity * t + 0.5 * Vec3::new(0.0, -gravity, 0.0) * t * t
}

/// Sample `count` points along the flight, `step` seconds apart, for the aim preview
pub fn trajectory_points(start: Vec3, velocity: Vec3, gravity: f32, count: usize, step: f32) -> Vec<Vec3> {
    (0..count)
        .map(|i| position_at(start, velocity, gravity, i as f32 * step))
        .collect()
}

/// Velocity that drops a ball from a backboard contact into the basket
///
/// Uses a flat `arc_height` so the ball falls almost straight in.
pub fn rebound_velocity(contact: Vec3, basket: Vec3, arc_height: f32, gravity: f32) -> Vec3 {
    solve(contact, basket, arc_height, gravity)
}
