//! Fruit Slicer - arcade slicing game engine
//!
//! Core modules:
//! - `sim`: Per-session simulation (spawning, motion, slicing, grading)
//! - `carousel`: Inertial scroll-and-snap selection views (levels, shop)
//! - `persistence`: Profile store contract and in-memory implementation
//! - `ui`: Overlay controls and navigation targets
//! - `tuning`: Data-driven game balance

pub mod carousel;
pub mod persistence;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use carousel::{Carousel, LevelSelect, Shop};
pub use persistence::{MemoryProfile, ProfileHandle, ProfileKey, ProfileStore};
pub use sim::{Session, SessionEvent, SessionState};
pub use tuning::{CarouselTuning, SessionTuning};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Nominal frame step for drivers without their own clock (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Largest frame step the session will integrate at once
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Play field (y grows upward, origin bottom-left)
    pub const FIELD_WIDTH: f32 = 750.0;
    pub const FIELD_HEIGHT: f32 = 1334.0;
    /// Downward acceleration (9.8 m/s² at 150 units per meter)
    pub const GRAVITY: f32 = 1470.0;

    /// Seconds between spawns
    pub const SPAWN_INTERVAL: f32 = 1.0;
    /// Seconds an unsliced object stays alive
    pub const OBJECT_LIFETIME: f32 = 3.0;
    /// Upward launch speed band
    pub const LAUNCH_SPEED_MIN: f32 = 1000.0;
    pub const LAUNCH_SPEED_MAX: f32 = 1500.0;
    /// Spin applied to every launched object (rad/s)
    pub const OBJECT_SPIN: f32 = 1.0;
    /// Hit-region radius of fruit and bombs
    pub const OBJECT_RADIUS: f32 = 37.5;

    /// Spawn budget per level
    pub const FRUIT_PER_LEVEL: u32 = 5;
    pub const BOMB_LEVEL_DIVISOR: u32 = 2;

    /// Grading thresholds (fraction of initial fruit cut)
    pub const MIN_SUCCESS_RATIO: f64 = 0.30;
    pub const TWO_STAR_RATIO: f64 = 0.75;
    pub const THREE_STAR_RATIO: f64 = 0.90;

    /// Cosmetic lifetimes
    pub const TRAIL_FADE: f32 = 0.3;
    pub const SPLIT_HALF_SPEED: f32 = 100.0;
    pub const SPLIT_HALF_FADE: f32 = 0.5;

    /// Level selection
    pub const LEVEL_COUNT: u32 = 50;
    pub const MAX_LEVEL_CAP: u32 = 100;
}

/// Linear interpolation between two scalars
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Closest point on segment `a..b` to `p`
#[inline]
pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}
