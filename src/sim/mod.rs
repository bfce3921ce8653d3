//! Per-session gameplay simulation
//!
//! All gameplay logic lives here. This module must stay deterministic:
//! - Time advances only through `Session::on_simulation_step`
//! - Randomness only through an injected `SpawnSource`
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod arena;
pub mod grading;
pub mod scheduler;
pub mod session;
pub mod slice;
pub mod state;

pub use arena::Arena;
pub use grading::{Verdict, cut_ratio, grade, star_rating};
pub use scheduler::{RandomSpawns, Scheduler, SpawnPlan, SpawnSource};
pub use session::{GameCommand, Session};
pub use slice::{SliceOutcome, SliceResolver};
pub use state::{
    FailureCause, FallingObject, FruitVariety, ObjectKind, RemovalCause, SessionCounters,
    SessionEvent, SessionState, SplitHalf, SwipeSegment, Trail,
};
