//! The arena: live objects and cosmetic effects
//!
//! Objects never interact with each other; the only gameplay-relevant
//! queries are hit tests and emptiness. Trails and split halves ride along
//! for the presentation layer and never affect gameplay.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::scheduler::SpawnPlan;
use super::state::{FallingObject, FruitVariety, SplitHalf, SwipeSegment, Trail};
use crate::tuning::SessionTuning;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Arena {
    /// Live objects (sorted by id)
    objects: Vec<FallingObject>,
    /// Fading blade trails
    pub trails: Vec<Trail>,
    /// Fruit halves drifting off after a slice
    pub halves: Vec<SplitHalf>,
    next_id: u32,
}

impl Arena {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Default::default()
        }
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Launch an object from the bottom edge of the field
    pub fn spawn(&mut self, plan: &SpawnPlan, tuning: &SessionTuning) -> &FallingObject {
        let id = self.next_entity_id();
        self.objects.push(FallingObject {
            id,
            kind: plan.kind,
            pos: Vec2::new(plan.x, 0.0),
            vel: Vec2::new(0.0, plan.speed),
            rotation: 0.0,
            angular_vel: tuning.object_spin,
            radius: tuning.object_radius,
            spawn_time: plan.at,
            lifetime: tuning.object_lifetime,
        });
        log::debug!("Spawned {:?} #{} at x={:.0}", plan.kind, id, plan.x);
        &self.objects[self.objects.len() - 1]
    }

    /// Advance motion of objects and cosmetics by `dt`
    pub fn integrate(&mut self, dt: f32, tuning: &SessionTuning) {
        for object in &mut self.objects {
            object.integrate(dt, tuning.gravity);
        }

        let trail_decay = dt / tuning.trail_fade.max(f32::EPSILON);
        for trail in &mut self.trails {
            trail.life -= trail_decay;
        }
        self.trails.retain(|t| t.life > 0.0);

        let half_decay = dt / tuning.split_half_fade.max(f32::EPSILON);
        for half in &mut self.halves {
            half.pos += half.vel * dt;
            half.life -= half_decay;
        }
        self.halves.retain(|h| h.life > 0.0);
    }

    /// Live objects in id order
    pub fn all_live(&self) -> &[FallingObject] {
        &self.objects
    }

    pub fn get(&self, id: u32) -> Option<&FallingObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// Remove an object; removing an unknown or already removed id is a no-op
    pub fn remove(&mut self, id: u32) -> Option<FallingObject> {
        let index = self.objects.iter().position(|o| o.id == id)?;
        Some(self.objects.remove(index))
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Ids of objects whose lifetime has run out at `now`
    pub fn expired(&self, now: f32) -> Vec<u32> {
        self.objects
            .iter()
            .filter(|o| o.is_expired(now))
            .map(|o| o.id)
            .collect()
    }

    /// Keep a fading trail for a swipe segment
    pub fn add_trail(&mut self, segment: &SwipeSegment, blade: usize) {
        self.trails.push(Trail {
            from: segment.from,
            to: segment.to,
            blade,
            life: 1.0,
        });
    }

    /// Spawn the two cosmetic halves of a sliced fruit
    ///
    /// Returns the velocities of the left and right half.
    pub fn add_split(&mut self, variety: FruitVariety, pos: Vec2, tuning: &SessionTuning) -> [Vec2; 2] {
        let speed = tuning.split_half_speed;
        let velocities = [Vec2::new(-speed, speed), Vec2::new(speed, speed)];
        for vel in velocities {
            self.halves.push(SplitHalf {
                variety,
                pos,
                vel,
                life: 1.0,
            });
        }
        velocities
    }

    /// Drop everything (session teardown)
    pub fn clear(&mut self) {
        self.objects.clear();
        self.trails.clear();
        self.halves.clear();
    }
}
