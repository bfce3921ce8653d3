//! Session data model
//!
//! Everything the simulation owns lives here: falling objects, swipe
//! segments, counters, the session state, and the events reported to the
//! presentation layer.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::ui::{Overlay, Scene};

/// Fruit catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FruitVariety {
    Apple,
    Cherry,
    Lemon,
    Orange,
    Plum,
    Strawberry,
}

impl FruitVariety {
    pub const ALL: [FruitVariety; 6] = [
        FruitVariety::Apple,
        FruitVariety::Cherry,
        FruitVariety::Lemon,
        FruitVariety::Orange,
        FruitVariety::Plum,
        FruitVariety::Strawberry,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FruitVariety::Apple => "apple",
            FruitVariety::Cherry => "cherry",
            FruitVariety::Lemon => "lemon",
            FruitVariety::Orange => "orange",
            FruitVariety::Plum => "plum",
            FruitVariety::Strawberry => "strawberry",
        }
    }
}

/// What a falling object is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    Fruit(FruitVariety),
    /// Never counts toward the cut ratio
    Bomb,
}

impl ObjectKind {
    pub fn is_bomb(&self) -> bool {
        matches!(self, ObjectKind::Bomb)
    }
}

/// A fruit or bomb in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingObject {
    pub id: u32,
    pub kind: ObjectKind,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Current rotation (radians, cosmetic)
    pub rotation: f32,
    pub angular_vel: f32,
    /// Hit-region radius
    pub radius: f32,
    /// Simulation time the object was launched
    pub spawn_time: f32,
    /// Seconds the object may live if never sliced
    pub lifetime: f32,
}

impl FallingObject {
    /// Simulation time at which the object is auto-removed
    #[inline]
    pub fn expires_at(&self) -> f32 {
        self.spawn_time + self.lifetime
    }

    #[inline]
    pub fn is_expired(&self, now: f32) -> bool {
        now >= self.expires_at()
    }

    /// Semi-implicit Euler step under constant downward gravity
    pub fn integrate(&mut self, dt: f32, gravity: f32) {
        self.vel.y -= gravity * dt;
        self.pos += self.vel * dt;
        self.rotation += self.angular_vel * dt;
    }

    /// Whether `point` lies inside the hit circle
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        self.pos.distance_squared(point) <= self.radius * self.radius
    }
}

/// One pointer-move worth of blade travel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwipeSegment {
    pub from: Vec2,
    pub to: Vec2,
    /// Pointer timestamp of the move that produced the segment
    pub timestamp: f64,
}

/// Spawn budgets and results for one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionCounters {
    pub remaining_fruit: u32,
    pub remaining_bombs: u32,
    /// Fruit budget at session start
    pub initial_fruit: u32,
    /// Fruit sliced so far (never exceeds `initial_fruit`)
    pub cut_fruit: u32,
    pub score: u64,
}

impl SessionCounters {
    pub fn new(fruit: u32, bombs: u32) -> Self {
        Self {
            remaining_fruit: fruit,
            remaining_bombs: bombs,
            initial_fruit: fruit,
            cut_fruit: 0,
            score: 0,
        }
    }

    /// Objects still to be spawned
    #[inline]
    pub fn remaining_spawns(&self) -> u32 {
        self.remaining_fruit.saturating_add(self.remaining_bombs)
    }

    #[inline]
    pub fn spawning_done(&self) -> bool {
        self.remaining_spawns() == 0
    }

    /// Fraction of the initial fruit sliced, 1.0 when there was none
    pub fn cut_ratio(&self) -> f64 {
        super::grading::cut_ratio(self.cut_fruit, self.initial_fruit)
    }

    /// Record a successful fruit slice
    pub fn record_cut(&mut self) {
        self.score = self.score.saturating_add(1);
        self.cut_fruit = self.cut_fruit.saturating_add(1).min(self.initial_fruit);
    }
}

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionState {
    #[default]
    Active,
    Paused,
    /// Bomb sliced or too little fruit cut
    Failed,
    /// Enough fruit cut once everything resolved
    Completed,
}

impl SessionState {
    /// No spawning, motion or slicing happens in terminal states
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Failed | SessionState::Completed)
    }
}

/// Why a session failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureCause {
    BombHit,
    TooFewCut,
}

/// Why an object left the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalCause {
    Sliced,
    Expired,
}

/// A fading blade trail drawn for one swipe segment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trail {
    pub from: Vec2,
    pub to: Vec2,
    /// Selected blade index (tint)
    pub blade: usize,
    /// 1 when fresh, 0 when gone
    pub life: f32,
}

/// Half of a sliced fruit drifting away (cosmetic)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitHalf {
    pub variety: FruitVariety,
    pub pos: Vec2,
    pub vel: Vec2,
    /// 1 when fresh, 0 when gone
    pub life: f32,
}

/// Notifications for the presentation layer, drained once per frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    Spawned {
        id: u32,
        kind: ObjectKind,
        pos: Vec2,
    },
    Removed {
        id: u32,
        cause: RemovalCause,
    },
    /// Draw two halves of a sliced fruit
    SplitEffect {
        variety: FruitVariety,
        pos: Vec2,
        half_velocities: [Vec2; 2],
    },
    SwipeTrail {
        from: Vec2,
        to: Vec2,
        blade: usize,
    },
    ScoreChanged {
        score: u64,
    },
    OverlayShown(Overlay),
    OverlayHidden,
    Navigate(Scene),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object_at(pos: Vec2) -> FallingObject {
        FallingObject {
            id: 1,
            kind: ObjectKind::Fruit(FruitVariety::Apple),
            pos,
            vel: Vec2::new(0.0, 1000.0),
            rotation: 0.0,
            angular_vel: 1.0,
            radius: 37.5,
            spawn_time: 2.0,
            lifetime: 3.0,
        }
    }

    #[test]
    fn test_expiry_time() {
        let object = object_at(Vec2::ZERO);
        assert_eq!(object.expires_at(), 5.0);
        assert!(!object.is_expired(4.99));
        assert!(object.is_expired(5.0));
    }

    #[test]
    fn test_integrate_applies_gravity() {
        let mut object = object_at(Vec2::ZERO);
        object.integrate(0.1, 1000.0);
        assert!((object.vel.y - 900.0).abs() < 1e-3);
        assert!((object.pos.y - 90.0).abs() < 1e-3);
        assert!((object.rotation - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_contains_uses_radius() {
        let object = object_at(Vec2::new(100.0, 100.0));
        assert!(object.contains(Vec2::new(130.0, 100.0)));
        assert!(!object.contains(Vec2::new(140.0, 100.0)));
    }

    #[test]
    fn test_counters_never_cut_more_than_initial() {
        let mut counters = SessionCounters::new(2, 0);
        counters.record_cut();
        counters.record_cut();
        counters.record_cut();
        assert_eq!(counters.cut_fruit, 2);
        assert_eq!(counters.score, 3);
        assert_eq!(counters.cut_ratio(), 1.0);
    }

    #[test]
    fn test_terminal_states() {
        assert!(!SessionState::Active.is_terminal());
        assert!(!SessionState::Paused.is_terminal());
        assert!(SessionState::Failed.is_terminal());
        assert!(SessionState::Completed.is_terminal());
    }
}
