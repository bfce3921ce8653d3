//! Data-driven game balance
//!
//! Every number the simulation and carousels depend on lives here so a
//! build can be retuned from JSON without touching gameplay code.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// How a swipe segment is tested against object hit regions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SliceMode {
    /// Only the segment's end point is tested (fast swipes can tunnel)
    #[default]
    Sample,
    /// The whole segment is swept against each hit circle
    Sweep,
}

/// Session balance and field geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionTuning {
    // === Field ===
    pub field_width: f32,
    pub field_height: f32,
    pub gravity: f32,

    // === Spawning ===
    pub spawn_interval: f32,
    pub object_lifetime: f32,
    pub launch_speed_min: f32,
    pub launch_speed_max: f32,
    pub object_spin: f32,
    pub object_radius: f32,
    pub fruit_per_level: u32,
    pub bomb_level_divisor: u32,

    // === Grading ===
    pub min_success_ratio: f64,
    pub two_star_ratio: f64,
    pub three_star_ratio: f64,

    // === Slicing ===
    pub slice_mode: SliceMode,

    // === Cosmetics ===
    pub trail_fade: f32,
    pub split_half_speed: f32,
    pub split_half_fade: f32,

    /// Frame steps longer than this are clamped
    pub max_frame_dt: f32,
}

impl Default for SessionTuning {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            gravity: GRAVITY,

            spawn_interval: SPAWN_INTERVAL,
            object_lifetime: OBJECT_LIFETIME,
            launch_speed_min: LAUNCH_SPEED_MIN,
            launch_speed_max: LAUNCH_SPEED_MAX,
            object_spin: OBJECT_SPIN,
            object_radius: OBJECT_RADIUS,
            fruit_per_level: FRUIT_PER_LEVEL,
            bomb_level_divisor: BOMB_LEVEL_DIVISOR,

            min_success_ratio: MIN_SUCCESS_RATIO,
            two_star_ratio: TWO_STAR_RATIO,
            three_star_ratio: THREE_STAR_RATIO,

            slice_mode: SliceMode::Sample,

            trail_fade: TRAIL_FADE,
            split_half_speed: SPLIT_HALF_SPEED,
            split_half_fade: SPLIT_HALF_FADE,

            max_frame_dt: MAX_FRAME_DT,
        }
    }
}

impl SessionTuning {
    /// Fruit to spawn over a session at `level`
    pub fn fruit_budget(&self, level: u32) -> u32 {
        self.fruit_per_level.saturating_mul(level)
    }

    /// Bombs to spawn over a session at `level`
    pub fn bomb_budget(&self, level: u32) -> u32 {
        level / self.bomb_level_divisor.max(1)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Make the bounds the simulation clamps against consistent
    ///
    /// Non-finite values fall back to the shipped defaults, negative extents
    /// become 0 and an inverted launch speed band is swapped.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let mut tuning = self.clone();

        tuning.field_width = finite_or(self.field_width, defaults.field_width).max(0.0);
        tuning.field_height = finite_or(self.field_height, defaults.field_height).max(0.0);
        tuning.max_frame_dt = finite_or(self.max_frame_dt, defaults.max_frame_dt).max(0.0);
        tuning.spawn_interval = finite_or(self.spawn_interval, defaults.spawn_interval);
        tuning.object_lifetime = finite_or(self.object_lifetime, defaults.object_lifetime);
        tuning.gravity = finite_or(self.gravity, defaults.gravity);

        let a = finite_or(self.launch_speed_min, defaults.launch_speed_min);
        let b = finite_or(self.launch_speed_max, defaults.launch_speed_max);
        tuning.launch_speed_min = a.min(b);
        tuning.launch_speed_max = a.max(b);

        if tuning != self {
            log::warn!("Session tuning had inconsistent bounds, using {:?}", tuning);
        }
        tuning
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// Shape of the fling animation curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    #[default]
    Linear,
    EaseOut,
    EaseInOut,
}

impl Easing {
    /// Map linear progress `t` in [0, 1] onto the curve
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOut => t * t * (3.0 - 2.0 * t),
        }
    }
}

/// Feel of a horizontally paged carousel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselTuning {
    /// Distance between neighbouring slot centers
    pub slot_pitch: f32,
    /// Multiplier applied to raw pointer deltas while dragging
    pub drag_gain: f32,
    /// Release speed (units/s) above which a fling is applied
    pub fling_velocity_threshold: f32,
    /// Fling distance = release velocity × this factor
    pub fling_distance_factor: f32,
    pub fling_duration: f32,
    pub fling_easing: Easing,
    pub snap_duration: f32,
    pub snap_easing: Easing,
    /// Pointer travel below which a press counts as a tap
    pub tap_slop: f32,
    /// Vertical drop of a slot two pitches away from focus
    pub emphasis_max_drop: f32,
    /// Largest scale reduction of an unfocused slot
    pub emphasis_max_shrink: f32,
}

impl Default for CarouselTuning {
    fn default() -> Self {
        Self::levels()
    }
}

impl CarouselTuning {
    /// Level selection: snappier gain, harder fling
    pub fn levels() -> Self {
        Self {
            slot_pitch: 240.0,
            drag_gain: 1.5,
            fling_velocity_threshold: 200.0,
            fling_distance_factor: 0.3,
            fling_duration: 0.5,
            fling_easing: Easing::Linear,
            snap_duration: 0.2,
            snap_easing: Easing::Linear,
            tap_slop: 10.0,
            emphasis_max_drop: 80.0,
            emphasis_max_shrink: 0.3,
        }
    }

    /// Blade shop: 1:1 drag, softer eased fling
    pub fn shop() -> Self {
        Self {
            slot_pitch: 280.0,
            drag_gain: 1.0,
            fling_velocity_threshold: 100.0,
            fling_distance_factor: 0.5,
            fling_duration: 0.8,
            fling_easing: Easing::EaseOut,
            snap_duration: 0.3,
            snap_easing: Easing::EaseInOut,
            tap_slop: 5.0,
            emphasis_max_drop: 80.0,
            emphasis_max_shrink: 0.3,
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Replace values the carousel cannot work with
    ///
    /// The pitch must be positive; shrink is kept within `[0, 1]`;
    /// durations, slop and gain are never negative.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let mut tuning = self.clone();

        if !(self.slot_pitch.is_finite() && self.slot_pitch > 0.0) {
            tuning.slot_pitch = defaults.slot_pitch;
        }
        tuning.drag_gain = finite_or(self.drag_gain, defaults.drag_gain).max(0.0);
        tuning.fling_velocity_threshold =
            finite_or(self.fling_velocity_threshold, defaults.fling_velocity_threshold);
        tuning.fling_distance_factor =
            finite_or(self.fling_distance_factor, defaults.fling_distance_factor);
        tuning.fling_duration = finite_or(self.fling_duration, defaults.fling_duration).max(0.0);
        tuning.snap_duration = finite_or(self.snap_duration, defaults.snap_duration).max(0.0);
        tuning.tap_slop = finite_or(self.tap_slop, defaults.tap_slop).max(0.0);
        tuning.emphasis_max_drop = finite_or(self.emphasis_max_drop, defaults.emphasis_max_drop);
        tuning.emphasis_max_shrink =
            finite_or(self.emphasis_max_shrink, defaults.emphasis_max_shrink).clamp(0.0, 1.0);

        if tuning != self {
            log::warn!("Carousel tuning had invalid values, using {:?}", tuning);
        }
        tuning
    }
}
