//! Inertial scroll-and-snap carousel
//!
//! A horizontal strip of fixed-pitch slots. Slot `i` sits at
//! `i * slot_pitch`; the view is centered on `-offset`, so offset 0 focuses
//! slot 0 and offset `-(n-1) * pitch` focuses the last slot. The offset is
//! always kept within those bounds.
//!
//! A press either becomes a drag (pointer travels past the tap slop) or
//! stays a tap. Drags scroll, then fling and/or snap on release. Taps only
//! hit-test the overlay controls.

pub mod levels;
pub mod shop;

pub use levels::{LevelCard, LevelCommand, LevelSelect};
pub use shop::{BladeItem, Shop, ShopAction, ShopCommand, ShopOutcome, ShopReaction};

use glam::Vec2;

use crate::lerp;
use crate::tuning::CarouselTuning;
use crate::ui::ControlTable;

/// Presentation emphasis of one slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotEmphasis {
    /// 1 at focus, shrinking with distance
    pub scale: f32,
    /// Downward displacement, 0 at focus
    pub drop: f32,
    pub alpha: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Motion {
    Idle,
    Fling {
        from: f32,
        to: f32,
        elapsed: f32,
    },
    Snap {
        from: f32,
        to: f32,
        elapsed: f32,
        index: usize,
    },
}

/// Pointer gesture in progress
#[derive(Debug, Clone, Copy)]
struct Gesture {
    press_pos: Vec2,
    press_time: f64,
    last_pos: Vec2,
    dragging: bool,
}

#[derive(Debug, Clone)]
pub struct Carousel<C> {
    tuning: CarouselTuning,
    count: usize,
    offset: f32,
    motion: Motion,
    gesture: Option<Gesture>,
    controls: ControlTable<C>,
}

impl<C: Copy + PartialEq> Carousel<C> {
    pub fn new(count: usize, tuning: CarouselTuning, controls: ControlTable<C>) -> Self {
        Self {
            tuning: tuning.sanitized(),
            count,
            offset: 0.0,
            motion: Motion::Idle,
            gesture: None,
            controls,
        }
    }

    // === Geometry ===

    fn last_index(&self) -> usize {
        self.count.saturating_sub(1)
    }

    /// Most negative offset (last slot centered)
    pub fn min_offset(&self) -> f32 {
        -(self.last_index() as f32) * self.tuning.slot_pitch
    }

    fn clamp_offset(&self, offset: f32) -> f32 {
        offset.max(self.min_offset()).min(0.0)
    }

    fn index_for(&self, offset: f32) -> usize {
        let raw = (-offset / self.tuning.slot_pitch).round();
        (raw.max(0.0) as usize).min(self.last_index())
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Slot nearest the visual center
    pub fn focused_index(&self) -> usize {
        self.index_for(self.offset)
    }

    /// Strip coordinate currently at the visual center
    pub fn focus_position(&self) -> f32 {
        -self.offset
    }

    pub fn slot_position(&self, index: usize) -> f32 {
        index as f32 * self.tuning.slot_pitch
    }

    /// Emphasis for a slot `distance` away from the focus position
    pub fn emphasis_for_distance(&self, distance: f32) -> SlotEmphasis {
        let d = distance.abs();
        let pitch = self.tuning.slot_pitch;
        let drop = self.tuning.emphasis_max_drop * (d / (pitch * 2.0)).powi(2);
        let scale = 1.0 - (d / (pitch * 4.0)).clamp(0.0, self.tuning.emphasis_max_shrink);
        SlotEmphasis {
            scale,
            drop,
            alpha: scale,
        }
    }

    pub fn emphasis(&self, index: usize) -> SlotEmphasis {
        self.emphasis_for_distance(self.slot_position(index) - self.focus_position())
    }

    /// True while no gesture or animation is moving the strip
    pub fn is_settled(&self) -> bool {
        self.gesture.is_none() && self.motion == Motion::Idle
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_some_and(|g| g.dragging)
    }

    pub fn controls(&self) -> &ControlTable<C> {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut ControlTable<C> {
        &mut self.controls
    }

    // === Animation ===

    /// Bring `index` to the center
    pub fn scroll_to(&mut self, index: usize, animated: bool) {
        let index = index.min(self.last_index());
        let to = -(index as f32) * self.tuning.slot_pitch;
        if animated {
            self.motion = Motion::Snap {
                from: self.offset,
                to,
                elapsed: 0.0,
                index,
            };
        } else {
            self.offset = to;
            self.motion = Motion::Idle;
        }
    }

    fn begin_snap(&mut self) {
        let index = self.focused_index();
        log::debug!("Snapping to slot {}", index);
        self.scroll_to(index, true);
    }

    /// Advance animations; returns the slot the strip came to rest on
    pub fn on_frame_tick(&mut self, dt: f32) -> Option<usize> {
        match self.motion {
            Motion::Idle => None,
            Motion::Fling { from, to, elapsed } => {
                let elapsed = elapsed + dt;
                let t = progress(elapsed, self.tuning.fling_duration);
                self.offset = self.clamp_offset(lerp(from, to, self.tuning.fling_easing.apply(t)));
                if t >= 1.0 {
                    self.begin_snap();
                } else {
                    self.motion = Motion::Fling { from, to, elapsed };
                }
                None
            }
            Motion::Snap {
                from,
                to,
                elapsed,
                index,
            } => {
                let elapsed = elapsed + dt;
                let t = progress(elapsed, self.tuning.snap_duration);
                self.offset = lerp(from, to, self.tuning.snap_easing.apply(t));
                if t >= 1.0 {
                    self.offset = to;
                    self.motion = Motion::Idle;
                    Some(index)
                } else {
                    self.motion = Motion::Snap {
                        from,
                        to,
                        elapsed,
                        index,
                    };
                    None
                }
            }
        }
    }

    // === Pointer input ===

    pub fn on_pointer_down(&mut self, point: Vec2, timestamp: f64) {
        self.gesture = Some(Gesture {
            press_pos: point,
            press_time: timestamp,
            last_pos: point,
            dragging: false,
        });
    }

    pub fn on_pointer_move(&mut self, point: Vec2, _timestamp: f64) {
        let Some(mut gesture) = self.gesture else {
            return;
        };

        let delta = if gesture.dragging {
            point.x - gesture.last_pos.x
        } else if (point.x - gesture.press_pos.x).abs() > self.tuning.tap_slop {
            // Became a drag: grab the strip and apply the travel so far
            gesture.dragging = true;
            self.motion = Motion::Idle;
            point.x - gesture.press_pos.x
        } else {
            0.0
        };

        self.offset = self.clamp_offset(self.offset + delta * self.tuning.drag_gain);
        gesture.last_pos = point;
        self.gesture = Some(gesture);
    }

    /// Finish the gesture; a tap returns the control under the pointer
    pub fn on_pointer_up(&mut self, point: Vec2, timestamp: f64) -> Option<C> {
        let gesture = self.gesture.take()?;

        if !gesture.dragging {
            return self.controls.hit(point);
        }

        let elapsed = timestamp - gesture.press_time;
        let velocity = if elapsed > 0.0 {
            ((point.x - gesture.press_pos.x) as f64 / elapsed) as f32
        } else {
            0.0
        };

        if velocity.abs() > self.tuning.fling_velocity_threshold {
            let to = self.clamp_offset(self.offset + velocity * self.tuning.fling_distance_factor);
            log::debug!("Fling at {:.0}/s to offset {:.0}", velocity, to);
            self.motion = Motion::Fling {
                from: self.offset,
                to,
                elapsed: 0.0,
            };
        } else {
            self.begin_snap();
        }
        None
    }

    /// Pointer lost: drop the gesture and settle without hit-testing
    pub fn on_pointer_cancel(&mut self, _point: Vec2, _timestamp: f64) {
        if self.gesture.take().is_some() {
            self.begin_snap();
        }
    }
}

fn progress(elapsed: f32, duration: f32) -> f32 {
    if duration <= 0.0 {
        1.0
    } else {
        (elapsed / duration).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::Rect;
    use proptest::prelude::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Cmd {
        Confirm,
    }

    const DT: f32 = 1.0 / 60.0;

    fn carousel(count: usize, tuning: CarouselTuning) -> Carousel<Cmd> {
        let mut controls = ControlTable::new();
        controls.add(
            Rect::from_center(Vec2::new(375.0, 100.0), Vec2::new(300.0, 100.0)),
            Cmd::Confirm,
        );
        Carousel::new(count, tuning, controls)
    }

    fn settle(c: &mut Carousel<Cmd>) -> Option<usize> {
        let mut rested = None;
        for _ in 0..600 {
            if let Some(i) = c.on_frame_tick(DT) {
                rested = Some(i);
            }
        }
        rested
    }

    /// Slow drag from `from_x` by `dx` over a second, in small steps
    fn slow_drag(c: &mut Carousel<Cmd>, from_x: f32, dx: f32) {
        let y = 600.0;
        c.on_pointer_down(Vec2::new(from_x, y), 0.0);
        let steps = 20;
        for i in 1..=steps {
            let x = from_x + dx * i as f32 / steps as f32;
            c.on_pointer_move(Vec2::new(x, y), i as f64 * 0.05);
        }
        // Release long after so velocity stays under the threshold
        c.on_pointer_up(Vec2::new(from_x + dx, y), 100.0);
    }

    #[test]
    fn test_drag_applies_gain() {
        let mut c = carousel(10, CarouselTuning::levels());
        c.on_pointer_down(Vec2::new(400.0, 600.0), 0.0);
        c.on_pointer_move(Vec2::new(380.0, 600.0), 0.1);
        assert_eq!(c.offset(), -30.0);
        c.on_pointer_move(Vec2::new(370.0, 600.0), 0.2);
        assert_eq!(c.offset(), -45.0);
        assert!(c.is_dragging());
    }

    #[test]
    fn test_slow_release_snaps_to_nearest() {
        let mut c = carousel(10, CarouselTuning::shop());
        slow_drag(&mut c, 600.0, -400.0);
        assert_eq!(c.offset(), -400.0);
        assert_eq!(settle(&mut c), Some(1));
        assert_eq!(c.offset(), -280.0);
        assert_eq!(c.focused_index(), 1);
        assert!(c.is_settled());
    }

    #[test]
    fn test_fast_release_flings_further() {
        let mut c = carousel(20, CarouselTuning::shop());
        c.on_pointer_down(Vec2::new(600.0, 600.0), 0.0);
        c.on_pointer_move(Vec2::new(500.0, 600.0), 0.05);
        c.on_pointer_up(Vec2::new(500.0, 600.0), 0.1);
        // 1000 units/s × 0.5 = 500 extra travel
        let rested = settle(&mut c);
        assert_eq!(rested, Some(2));
        assert_eq!(c.offset(), -560.0);
    }

    #[test]
    fn test_drag_past_end_snaps_to_last() {
        let mut c = carousel(5, CarouselTuning::levels());
        c.on_pointer_down(Vec2::new(700.0, 600.0), 0.0);
        c.on_pointer_move(Vec2::new(-5000.0, 600.0), 0.5);
        c.on_pointer_up(Vec2::new(-5000.0, 600.0), 0.6);
        settle(&mut c);
        assert_eq!(c.focused_index(), 4);
        assert_eq!(c.offset(), c.min_offset());
    }

    #[test]
    fn test_tap_hits_control_without_scrolling() {
        let mut c = carousel(5, CarouselTuning::levels());
        c.scroll_to(2, false);
        c.on_pointer_down(Vec2::new(375.0, 100.0), 0.0);
        c.on_pointer_move(Vec2::new(380.0, 102.0), 0.05);
        assert_eq!(c.on_pointer_up(Vec2::new(380.0, 102.0), 0.1), Some(Cmd::Confirm));
        assert_eq!(c.offset(), -480.0);
        assert!(c.is_settled());
    }

    #[test]
    fn test_drag_over_control_is_not_a_tap() {
        let mut c = carousel(5, CarouselTuning::levels());
        c.on_pointer_down(Vec2::new(300.0, 100.0), 0.0);
        c.on_pointer_move(Vec2::new(400.0, 100.0), 0.5);
        assert_eq!(c.on_pointer_up(Vec2::new(400.0, 100.0), 1.0), None);
    }

    #[test]
    fn test_cancel_snaps_without_tap() {
        let mut c = carousel(5, CarouselTuning::levels());
        c.on_pointer_down(Vec2::new(375.0, 100.0), 0.0);
        c.on_pointer_move(Vec2::new(175.0, 100.0), 0.1);
        c.on_pointer_cancel(Vec2::new(175.0, 100.0), 0.2);
        assert!(!c.is_dragging());
        // -300 rounds to slot 1
        assert_eq!(settle(&mut c), Some(1));
        assert_eq!(c.offset(), -240.0);
    }

    #[test]
    fn test_emphasis_law() {
        let c = carousel(5, CarouselTuning::levels());
        let focus = c.emphasis(0);
        assert_eq!(focus.scale, 1.0);
        assert_eq!(focus.drop, 0.0);

        let mut last = focus;
        for i in 1..5 {
            let e = c.emphasis(i);
            assert!(e.scale <= last.scale);
            assert!(e.drop > last.drop);
            last = e;
        }
        assert!(last.scale > 0.69);
    }

    #[test]
    fn test_scroll_to_animated() {
        let mut c = carousel(8, CarouselTuning::levels());
        c.scroll_to(6, true);
        assert_eq!(c.offset(), 0.0);
        assert_eq!(settle(&mut c), Some(6));
        assert_eq!(c.focused_index(), 6);
    }

    #[test]
    fn test_scroll_to_clamps_index() {
        let mut c = carousel(3, CarouselTuning::levels());
        c.scroll_to(99, false);
        assert_eq!(c.focused_index(), 2);
    }

    proptest! {
        #[test]
        fn prop_offset_and_focus_stay_in_bounds(
            count in 1usize..60,
            moves in proptest::collection::vec(-2000.0f32..2000.0, 1..20),
            release_at in 0.01f64..3.0,
        ) {
            let mut c = carousel(count, CarouselTuning::levels());
            let mut x = 375.0;
            c.on_pointer_down(Vec2::new(x, 600.0), 0.0);
            for (i, dx) in moves.iter().enumerate() {
                x += dx;
                c.on_pointer_move(Vec2::new(x, 600.0), i as f64 * 0.01);
                prop_assert!(c.offset() <= 0.0 && c.offset() >= c.min_offset());
            }
            c.on_pointer_up(Vec2::new(x, 600.0), release_at);
            for _ in 0..300 {
                c.on_frame_tick(DT);
                prop_assert!(c.offset() <= 0.0 && c.offset() >= c.min_offset() - 1e-3);
            }
            prop_assert!(c.focused_index() < count);
            prop_assert!(c.is_settled());
        }
    }
}
