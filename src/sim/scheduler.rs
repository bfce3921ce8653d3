//! Spawn scheduling
//!
//! One spawn per interval until both budgets are spent. Randomness comes
//! from an injected `SpawnSource` so sessions replay exactly by seed.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::{FruitVariety, ObjectKind, SessionCounters};
use crate::tuning::SessionTuning;

/// Random decisions made when an object is spawned
pub trait SpawnSource {
    /// Whether the next object is a bomb (only asked while both budgets remain)
    fn pick_bomb(&mut self, bombs_left: u32, fruit_left: u32) -> bool;
    fn pick_variety(&mut self) -> FruitVariety;
    /// Horizontal launch position in `[0, field_width]`
    fn launch_x(&mut self, kind: ObjectKind, field_width: f32) -> f32;
    /// Upward launch speed in `[min, max]`
    fn launch_speed(&mut self, min: f32, max: f32) -> f32;
}

/// Seeded PCG-backed spawn source
#[derive(Debug, Clone)]
pub struct RandomSpawns {
    pub seed: u64,
    rng: Pcg32,
}

impl RandomSpawns {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl SpawnSource for RandomSpawns {
    fn pick_bomb(&mut self, bombs_left: u32, fruit_left: u32) -> bool {
        // Weighted by what remains so both budgets run out together
        let total = bombs_left.saturating_add(fruit_left);
        self.rng.random_range(1..=total) <= bombs_left
    }

    fn pick_variety(&mut self) -> FruitVariety {
        let i = self.rng.random_range(0..FruitVariety::ALL.len());
        FruitVariety::ALL[i]
    }

    fn launch_x(&mut self, _kind: ObjectKind, field_width: f32) -> f32 {
        self.rng.random_range(0.0..=field_width.max(0.0))
    }

    fn launch_speed(&mut self, min: f32, max: f32) -> f32 {
        self.rng.random_range(min.min(max)..=max.max(min))
    }
}

/// Everything needed to launch one object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPlan {
    pub kind: ObjectKind,
    pub x: f32,
    pub speed: f32,
    /// Scheduled simulation time of the spawn
    pub at: f32,
}

/// Fixed-interval spawn clock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scheduler {
    pub interval: f32,
    /// Simulation time of the next spawn
    pub next_spawn_at: f32,
}

impl Scheduler {
    pub fn new(interval: f32) -> Self {
        Self {
            interval: interval.max(f32::EPSILON),
            next_spawn_at: 0.0,
        }
    }

    /// Fire every spawn due at or before `now`
    ///
    /// Budget counters are decremented as each plan is made.
    pub fn due_spawns(
        &mut self,
        now: f32,
        counters: &mut SessionCounters,
        source: &mut dyn SpawnSource,
        tuning: &SessionTuning,
    ) -> Vec<SpawnPlan> {
        let mut plans = Vec::new();
        while !counters.spawning_done() && self.next_spawn_at <= now {
            let kind = Self::pick_kind(counters, source);
            match kind {
                ObjectKind::Bomb => counters.remaining_bombs -= 1,
                ObjectKind::Fruit(_) => counters.remaining_fruit -= 1,
            }

            let x = source
                .launch_x(kind, tuning.field_width)
                .min(tuning.field_width)
                .max(0.0);
            let speed = source
                .launch_speed(tuning.launch_speed_min, tuning.launch_speed_max)
                .min(tuning.launch_speed_max)
                .max(tuning.launch_speed_min);

            plans.push(SpawnPlan {
                kind,
                x,
                speed,
                at: self.next_spawn_at,
            });
            self.next_spawn_at += self.interval;
        }
        plans
    }

    fn pick_kind(counters: &SessionCounters, source: &mut dyn SpawnSource) -> ObjectKind {
        let bomb = match (counters.remaining_bombs, counters.remaining_fruit) {
            (0, _) => false,
            (_, 0) => true,
            (bombs, fruit) => source.pick_bomb(bombs, fruit),
        };
        if bomb {
            ObjectKind::Bomb
        } else {
            ObjectKind::Fruit(source.pick_variety())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn run_to_exhaustion(level: u32, seed: u64) -> (Vec<SpawnPlan>, SessionCounters) {
        let tuning = SessionTuning::default();
        let mut counters =
            SessionCounters::new(tuning.fruit_budget(level), tuning.bomb_budget(level));
        let mut scheduler = Scheduler::new(tuning.spawn_interval);
        let mut source = RandomSpawns::new(seed);
        let mut plans = Vec::new();
        let mut now = 0.0;
        while now < 1000.0 {
            plans.extend(scheduler.due_spawns(now, &mut counters, &mut source, &tuning));
            now += 0.25;
        }
        (plans, counters)
    }

    #[test]
    fn test_one_spawn_per_interval() {
        let tuning = SessionTuning::default();
        let mut counters = SessionCounters::new(5, 0);
        let mut scheduler = Scheduler::new(1.0);
        let mut source = RandomSpawns::new(7);

        let first = scheduler.due_spawns(0.0, &mut counters, &mut source, &tuning);
        assert_eq!(first.len(), 1);
        assert!(scheduler.due_spawns(0.99, &mut counters, &mut source, &tuning).is_empty());
        assert_eq!(scheduler.due_spawns(1.0, &mut counters, &mut source, &tuning).len(), 1);
        // A long gap catches up on every missed tick
        assert_eq!(scheduler.due_spawns(3.5, &mut counters, &mut source, &tuning).len(), 2);
        assert_eq!(counters.remaining_fruit, 1);
    }

    #[test]
    fn test_spawn_times_are_scheduled_ticks() {
        let (plans, _) = run_to_exhaustion(2, 3);
        for (i, plan) in plans.iter().enumerate() {
            assert_eq!(plan.at, i as f32);
        }
    }

    #[test]
    fn test_plans_stay_in_bounds() {
        let tuning = SessionTuning::default();
        let (plans, _) = run_to_exhaustion(6, 11);
        for plan in plans {
            assert!((0.0..=tuning.field_width).contains(&plan.x));
            assert!((tuning.launch_speed_min..=tuning.launch_speed_max).contains(&plan.speed));
        }
    }

    #[test]
    fn test_inverted_band_does_not_panic() {
        let tuning = SessionTuning {
            launch_speed_min: 1500.0,
            launch_speed_max: 1000.0,
            field_width: -10.0,
            ..SessionTuning::default()
        };
        let mut counters = SessionCounters::new(3, 0);
        let mut scheduler = Scheduler::new(1.0);
        let mut source = RandomSpawns::new(5);
        let plans = scheduler.due_spawns(2.0, &mut counters, &mut source, &tuning);
        assert_eq!(plans.len(), 3);
        for plan in plans {
            assert_eq!(plan.x, 0.0);
            assert!(plan.speed.is_finite());
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let (a, _) = run_to_exhaustion(4, 42);
        let (b, _) = run_to_exhaustion(4, 42);
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn prop_budgets_exhausted_exactly(level in 1u32..40, seed in any::<u64>()) {
            let (plans, counters) = run_to_exhaustion(level, seed);
            let bombs = plans.iter().filter(|p| p.kind.is_bomb()).count() as u32;
            let fruit = plans.len() as u32 - bombs;
            prop_assert_eq!(fruit, 5 * level);
            prop_assert_eq!(bombs, level / 2);
            prop_assert!(counters.spawning_done());
        }
    }
}
