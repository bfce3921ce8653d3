//! Overlay controls and navigation
//!
//! Interactive controls are plain data: a rectangle plus the command it
//! issues. Input handlers hit-test a `ControlTable` and dispatch on the
//! returned command.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in field coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// A tappable control issuing command `C`
#[derive(Debug, Clone, PartialEq)]
pub struct Control<C> {
    pub rect: Rect,
    pub command: C,
    pub visible: bool,
}

/// Lookup table from screen regions to commands
///
/// Later entries sit on top of earlier ones.
#[derive(Debug, Clone)]
pub struct ControlTable<C> {
    controls: Vec<Control<C>>,
}

impl<C> Default for ControlTable<C> {
    fn default() -> Self {
        Self {
            controls: Vec::new(),
        }
    }
}

impl<C: Copy + PartialEq> ControlTable<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a visible control
    pub fn add(&mut self, rect: Rect, command: C) {
        self.controls.push(Control {
            rect,
            command,
            visible: true,
        });
    }

    pub fn set_visible(&mut self, command: C, visible: bool) {
        for control in self.controls.iter_mut().filter(|c| c.command == command) {
            control.visible = visible;
        }
    }

    pub fn is_visible(&self, command: C) -> bool {
        self.controls
            .iter()
            .any(|c| c.command == command && c.visible)
    }

    /// Topmost visible control under `point`
    pub fn hit(&self, point: Vec2) -> Option<C> {
        self.controls
            .iter()
            .rev()
            .find(|c| c.visible && c.rect.contains(point))
            .map(|c| c.command)
    }

    pub fn controls(&self) -> &[Control<C>] {
        &self.controls
    }
}

/// Screens the engine can ask the host to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scene {
    MainMenu,
    LevelSelect,
    Shop,
    /// Gameplay at the given level
    Game { level: u32 },
}

/// Modal overlays shown over gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Overlay {
    Pause,
    Failure { level: u32 },
    Completion {
        level: u32,
        stars: u8,
        currency_delta: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Cmd {
        Back,
        Confirm,
    }

    #[test]
    fn test_rect_contains_edges() {
        let rect = Rect::from_center(Vec2::new(50.0, 50.0), Vec2::new(20.0, 10.0));
        assert!(rect.contains(Vec2::new(40.0, 45.0)));
        assert!(rect.contains(Vec2::new(60.0, 55.0)));
        assert!(!rect.contains(Vec2::new(61.0, 50.0)));
    }

    #[test]
    fn test_hit_ignores_hidden_controls() {
        let mut table = ControlTable::new();
        table.add(Rect::from_center(Vec2::ZERO, Vec2::splat(10.0)), Cmd::Back);
        assert_eq!(table.hit(Vec2::ZERO), Some(Cmd::Back));

        table.set_visible(Cmd::Back, false);
        assert_eq!(table.hit(Vec2::ZERO), None);
        assert!(!table.is_visible(Cmd::Back));
    }

    #[test]
    fn test_topmost_control_wins() {
        let mut table = ControlTable::new();
        table.add(Rect::from_center(Vec2::ZERO, Vec2::splat(100.0)), Cmd::Back);
        table.add(Rect::from_center(Vec2::ZERO, Vec2::splat(10.0)), Cmd::Confirm);
        assert_eq!(table.hit(Vec2::ZERO), Some(Cmd::Confirm));
        assert_eq!(table.hit(Vec2::new(30.0, 0.0)), Some(Cmd::Back));
        assert_eq!(table.hit(Vec2::new(300.0, 0.0)), None);
    }
}
