//! Swipe-vs-object resolution
//!
//! All hits of a segment are gathered before anything is applied, so the
//! result does not depend on iteration order: any bomb in the segment wins
//! and discards the fruit hits; otherwise every fruit hit is sliced.

use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::state::{FallingObject, SwipeSegment};
use crate::closest_point_on_segment;
use crate::tuning::SliceMode;

/// Result of resolving one swipe segment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SliceOutcome {
    Miss,
    /// A bomb was hit; nothing was removed
    BombHit { bomb: u32 },
    /// Fruit removed from the arena, in id order
    Sliced { fruit: Vec<FallingObject> },
}

/// Whether `segment` touches `object` under `mode`
pub fn segment_hits(segment: &SwipeSegment, object: &FallingObject, mode: SliceMode) -> bool {
    match mode {
        SliceMode::Sample => object.contains(segment.to),
        SliceMode::Sweep => {
            object.contains(closest_point_on_segment(object.pos, segment.from, segment.to))
        }
    }
}

/// Ids of every live object the segment touches
pub fn hits(segment: &SwipeSegment, objects: &[FallingObject], mode: SliceMode) -> Vec<u32> {
    objects
        .iter()
        .filter(|o| segment_hits(segment, o, mode))
        .map(|o| o.id)
        .collect()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SliceResolver {
    pub mode: SliceMode,
}

impl SliceResolver {
    pub fn new(mode: SliceMode) -> Self {
        Self { mode }
    }

    /// Resolve a segment against the arena, removing sliced fruit
    pub fn resolve(&self, segment: &SwipeSegment, arena: &mut Arena) -> SliceOutcome {
        let hit_ids = hits(segment, arena.all_live(), self.mode);
        if hit_ids.is_empty() {
            return SliceOutcome::Miss;
        }

        let bomb = arena
            .all_live()
            .iter()
            .find(|o| o.kind.is_bomb() && hit_ids.contains(&o.id))
            .map(|o| o.id);
        if let Some(bomb) = bomb {
            return SliceOutcome::BombHit { bomb };
        }

        let fruit: Vec<FallingObject> = hit_ids
            .into_iter()
            .filter_map(|id| arena.remove(id))
            .collect();
        if fruit.is_empty() {
            SliceOutcome::Miss
        } else {
            SliceOutcome::Sliced { fruit }
        }
    }
}
