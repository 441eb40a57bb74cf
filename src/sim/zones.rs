//! Power bar skill zones
//!
//! The power bar holds a perfect zone and a good zone. A release inside a zone
//! earns that tier outright; a release just outside a zone edge earns the
//! matching "near" tier. As the player scores, the zones shrink and jump to
//! new positions.
//!
//! A shuffle animates from the old layout to the new one, but classification
//! always reads the last *complete* layout. The in-between state is exposed
//! only as a `ZoneView`, which cannot be classified against.

use serde::{Deserialize, Serialize};

use super::rng::RandomSource;
use super::shot::ShotQuality;
use crate::error::{ConfigError, require_non_negative};
use crate::settings::{ShuffleSettings, ZoneSettings};
use crate::{inverse_lerp_clamped, lerp};

/// Half-open range `[start, end)` on the power bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneRange {
    pub start: f32,
    pub end: f32,
}

impl ZoneRange {
    pub const fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.end - self.start
    }

    #[inline]
    pub fn contains(&self, power: f32) -> bool {
        power >= self.start && power < self.end
    }

    /// Outside the zone but within `tolerance` of one of its edges
    pub fn is_near(&self, power: f32, tolerance: f32) -> bool {
        let distance = (power - self.start).abs().min((power - self.end).abs());
        distance <= tolerance && !self.contains(power)
    }

    fn overlaps(&self, other: &ZoneRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    fn validate(&self, zone: &'static str) -> Result<(), ConfigError> {
        if !(self.start.is_finite() && self.end.is_finite()) || self.width() <= 0.0 {
            return Err(ConfigError::EmptyZone {
                zone,
                start: self.start,
                end: self.end,
            });
        }
        if self.start < 0.0 || self.end > 1.0 {
            return Err(ConfigError::ZoneOutOfRange {
                zone,
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}

/// A validated arrangement of the two skill zones
///
/// Zones are non-empty, inside [0, 1] and disjoint. Fields are private so
/// every layout in circulation went through `new`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PowerZoneLayout {
    perfect: ZoneRange,
    good: ZoneRange,
    near_perfect_tolerance: f32,
    near_good_tolerance: f32,
}

impl PowerZoneLayout {
    pub fn new(
        perfect: ZoneRange,
        good: ZoneRange,
        near_perfect_tolerance: f32,
        near_good_tolerance: f32,
    ) -> Result<Self, ConfigError> {
        perfect.validate("perfect")?;
        good.validate("good")?;
        if perfect.overlaps(&good) {
            return Err(ConfigError::ZonesOverlap {
                perfect_end: perfect.end,
                good_start: good.start,
            });
        }
        require_non_negative("near_perfect_tolerance", near_perfect_tolerance)?;
        require_non_negative("near_good_tolerance", near_good_tolerance)?;

        Ok(Self {
            perfect,
            good,
            near_perfect_tolerance,
            near_good_tolerance,
        })
    }

    /// Build the starting layout; perfect must sit below good
    pub fn from_settings(zones: &ZoneSettings) -> Result<Self, ConfigError> {
        let perfect = ZoneRange::new(zones.perfect_start, zones.perfect_end);
        let good = ZoneRange::new(zones.good_start, zones.good_end);
        if perfect.end > good.start {
            return Err(ConfigError::ZonesOverlap {
                perfect_end: perfect.end,
                good_start: good.start,
            });
        }
        Self::new(
            perfect,
            good,
            zones.near_perfect_tolerance,
            zones.near_good_tolerance,
        )
    }

    pub fn perfect(&self) -> ZoneRange {
        self.perfect
    }

    pub fn good(&self) -> ZoneRange {
        self.good
    }

    pub fn near_perfect_tolerance(&self) -> f32 {
        self.near_perfect_tolerance
    }

    pub fn near_good_tolerance(&self) -> f32 {
        self.near_good_tolerance
    }

    /// The zone closer to zero power, with its tolerance
    fn lower(&self) -> (ZoneRange, f32) {
        if self.perfect.start <= self.good.start {
            (self.perfect, self.near_perfect_tolerance)
        } else {
            (self.good, self.near_good_tolerance)
        }
    }

    /// The zone closer to full power, with its tolerance
    fn upper(&self) -> (ZoneRange, f32) {
        if self.perfect.start <= self.good.start {
            (self.good, self.near_good_tolerance)
        } else {
            (self.perfect, self.near_perfect_tolerance)
        }
    }

    pub fn view(&self) -> ZoneView {
        ZoneView {
            perfect: self.perfect,
            good: self.good,
        }
    }
}

/// Map a normalized release power onto a shot tier
///
/// Exact zone membership always beats a near band. Out-of-range and NaN powers
/// are clamped first, so every input yields exactly one tier.
pub fn classify(power: f32, zones: &PowerZoneLayout) -> ShotQuality {
    let power = if power.is_nan() { 0.0 } else { power.clamp(0.0, 1.0) };

    if zones.perfect.contains(power) {
        return ShotQuality::Perfect;
    }
    if zones.good.contains(power) {
        return ShotQuality::Good;
    }
    if zones.perfect.is_near(power, zones.near_perfect_tolerance) {
        return ShotQuality::NearPerfect;
    }
    if zones.good.is_near(power, zones.near_good_tolerance) {
        return ShotQuality::NearGood;
    }

    let (lower, lower_tolerance) = zones.lower();
    if power < lower.start - lower_tolerance {
        return ShotQuality::Weak;
    }
    let (upper, upper_tolerance) = zones.upper();
    if power > upper.end + upper_tolerance {
        return ShotQuality::TooStrong;
    }

    ShotQuality::Normal
}

/// Render-only zone positions (may be mid-animation)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZoneView {
    pub perfect: ZoneRange,
    pub good: ZoneRange,
}

/// Score gap until the next shuffle, shrinking as the score climbs
pub fn shuffle_interval(score: u32, shuffle: &ShuffleSettings) -> u32 {
    let t = inverse_lerp_clamped(0.0, shuffle.max_difficulty_score as f32, score as f32);
    let interval = lerp(shuffle.interval_start as f32, shuffle.interval_floor as f32, t);
    (interval.round() as u32).max(1)
}

/// Zone widths (perfect, good) allowed at a given score
pub fn zone_widths(score: u32, zones: &ZoneSettings, shuffle: &ShuffleSettings) -> (f32, f32) {
    let t = inverse_lerp_clamped(0.0, shuffle.max_difficulty_score as f32, score as f32);
    (
        lerp(zones.perfect_end - zones.perfect_start, shuffle.perfect_min_width, t),
        lerp(zones.good_end - zones.good_start, shuffle.good_min_width, t),
    )
}

/// Draw a fresh layout for the given score
///
/// Picks which zone comes first, shrinks both toward their floors, and lays
/// them out back to back (separated by the gap) from a random offset.
pub fn shuffled_layout(
    current: &PowerZoneLayout,
    score: u32,
    zones: &ZoneSettings,
    shuffle: &ShuffleSettings,
    rng: &mut dyn RandomSource,
) -> Result<PowerZoneLayout, ConfigError> {
    let perfect_first = rng.roll() < 0.5;
    let (perfect_width, good_width) = zone_widths(score, zones, shuffle);

    let total = perfect_width + shuffle.gap + good_width;
    let slack = (1.0 - shuffle.min_zone_position - total).max(0.0);
    let offset = shuffle.min_zone_position + rng.roll() * slack;

    let (first_width, second_width) = if perfect_first {
        (perfect_width, good_width)
    } else {
        (good_width, perfect_width)
    };
    let first = ZoneRange::new(offset, offset + first_width);
    let second_start = first.end + shuffle.gap;
    let second = ZoneRange::new(second_start, (second_start + second_width).min(1.0));

    let (perfect, good) = if perfect_first {
        (first, second)
    } else {
        (second, first)
    };

    PowerZoneLayout::new(
        perfect,
        good,
        current.near_perfect_tolerance,
        current.near_good_tolerance,
    )
}

/// An in-progress animation between two complete layouts
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ZoneTransition {
    pub from: PowerZoneLayout,
    pub to: PowerZoneLayout,
    pub elapsed: f32,
    pub duration: f32,
}

impl ZoneTransition {
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }
}

/// What a shuffle did to the board
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShuffleStart {
    /// Layout an unfinished animation was cut short at
    pub snapped: Option<ZoneView>,
    pub target: ZoneView,
    /// No animation; the target is already the stable layout
    pub settled: bool,
}

/// The live power bar: stable layout, pending animation, and shuffle schedule
#[derive(Debug, Clone, Serialize)]
pub struct ZoneBoard {
    initial: PowerZoneLayout,
    stable: PowerZoneLayout,
    transition: Option<ZoneTransition>,
    next_shuffle_at: u32,
    zones: ZoneSettings,
    shuffle: ShuffleSettings,
}

impl ZoneBoard {
    pub fn new(zones: &ZoneSettings, shuffle: &ShuffleSettings) -> Result<Self, ConfigError> {
        let initial = PowerZoneLayout::from_settings(zones)?;
        Ok(Self {
            initial,
            stable: initial,
            transition: None,
            next_shuffle_at: shuffle_interval(0, shuffle),
            zones: zones.clone(),
            shuffle: shuffle.clone(),
        })
    }

    /// Layout used to classify shots; never mid-animation
    pub fn snapshot(&self) -> PowerZoneLayout {
        self.stable
    }

    /// Layout to draw this frame
    pub fn display(&self) -> ZoneView {
        match &self.transition {
            None => self.stable.view(),
            Some(tr) => {
                let t = tr.progress();
                let blend = |a: ZoneRange, b: ZoneRange| {
                    ZoneRange::new(lerp(a.start, b.start, t), lerp(a.end, b.end, t))
                };
                ZoneView {
                    perfect: blend(tr.from.perfect, tr.to.perfect),
                    good: blend(tr.from.good, tr.to.good),
                }
            }
        }
    }

    pub fn transition(&self) -> Option<&ZoneTransition> {
        self.transition.as_ref()
    }

    pub fn next_shuffle_at(&self) -> u32 {
        self.next_shuffle_at
    }

    /// Check the score against the shuffle threshold
    ///
    /// A shuffle landing mid-animation snaps the old one to its end first.
    pub fn on_score(&mut self, score: u32, rng: &mut dyn RandomSource) -> Option<ShuffleStart> {
        if !self.shuffle.enabled || score < self.next_shuffle_at {
            return None;
        }

        let base = self.transition.map(|tr| tr.to).unwrap_or(self.stable);
        let next_at = score.saturating_add(shuffle_interval(score, &self.shuffle));
        let target = match shuffled_layout(&base, score, &self.zones, &self.shuffle, rng) {
            Ok(layout) => layout,
            Err(e) => {
                log::warn!("Zone shuffle rejected, keeping current layout: {}", e);
                self.next_shuffle_at = next_at;
                return None;
            }
        };

        let snapped = self.transition.take().map(|tr| tr.to.view());
        self.stable = base;
        self.next_shuffle_at = next_at;
        log::info!(
            "Zones shuffling at score {}: perfect [{:.3}, {:.3}) good [{:.3}, {:.3}), next at {}",
            score,
            target.perfect.start,
            target.perfect.end,
            target.good.start,
            target.good.end,
            self.next_shuffle_at
        );

        let settled = self.shuffle.transition_secs <= 0.0;
        if settled {
            self.stable = target;
        } else {
            self.transition = Some(ZoneTransition {
                from: self.stable,
                to: target,
                elapsed: 0.0,
                duration: self.shuffle.transition_secs,
            });
        }
        Some(ShuffleStart {
            snapped,
            target: target.view(),
            settled,
        })
    }

    /// Advance the animation; returns true when it just completed
    pub fn advance(&mut self, dt: f32) -> bool {
        let Some(tr) = self.transition.as_mut() else {
            return false;
        };
        tr.elapsed += dt;
        if tr.elapsed >= tr.duration {
            self.stable = tr.to;
            self.transition = None;
            return true;
        }
        false
    }

    /// Back to the starting layout (for a replay)
    pub fn reset(&mut self) {
        self.stable = self.initial;
        self.transition = None;
        self.next_shuffle_at = shuffle_interval(0, &self.shuffle);
    }
}
