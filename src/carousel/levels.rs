//! Level selection screen
//!
//! One card per level. Levels above the unlock high-water mark are locked;
//! the Play control is only shown while an unlocked card is focused.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::Carousel;
use crate::consts::LEVEL_COUNT;
use crate::persistence::{self, ProfileHandle, ProfileKey};
use crate::tuning::CarouselTuning;
use crate::ui::{ControlTable, Rect, Scene};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelCommand {
    Back,
    Play,
}

/// What a level card displays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCard {
    pub level: u32,
    pub locked: bool,
    /// Stars last earned (always 0 on locked cards)
    pub stars: u8,
}

pub struct LevelSelect {
    carousel: Carousel<LevelCommand>,
    profile: ProfileHandle,
    cards: Vec<LevelCard>,
    max_level: u32,
}

impl LevelSelect {
    /// Build the screen for a field of `field` size, focused on the highest
    /// unlocked level
    pub fn new(profile: ProfileHandle, tuning: CarouselTuning, field: Vec2) -> Self {
        let mut controls = ControlTable::new();
        controls.add(
            Rect::from_center(Vec2::new(60.0, field.y - 100.0), Vec2::new(80.0, 60.0)),
            LevelCommand::Back,
        );
        controls.add(
            Rect::from_center(Vec2::new(field.x * 0.5, 100.0), Vec2::new(317.0, 100.0)),
            LevelCommand::Play,
        );

        let mut select = Self {
            carousel: Carousel::new(LEVEL_COUNT as usize, tuning, controls),
            profile,
            cards: Vec::new(),
            max_level: 1,
        };
        select.refresh();
        select
            .carousel
            .scroll_to(select.max_level.saturating_sub(1) as usize, false);
        select.update_play_visibility();
        select
    }

    /// Re-read unlock state and stars from the profile
    pub fn refresh(&mut self) {
        let store = self.profile.borrow();
        self.max_level = persistence::max_unlocked_level(&*store);
        self.cards = (1..=LEVEL_COUNT)
            .map(|level| {
                let locked = level > self.max_level;
                LevelCard {
                    level,
                    locked,
                    stars: if locked {
                        0
                    } else {
                        persistence::level_stars(&*store, level)
                    },
                }
            })
            .collect();
        log::debug!("Level select: {} unlocked", self.max_level);
    }

    pub fn cards(&self) -> &[LevelCard] {
        &self.cards
    }

    pub fn max_unlocked_level(&self) -> u32 {
        self.max_level
    }

    /// Level of the centered card
    pub fn focused_level(&self) -> u32 {
        self.carousel.focused_index() as u32 + 1
    }

    pub fn is_focused_unlocked(&self) -> bool {
        self.focused_level() <= self.max_level
    }

    pub fn carousel(&self) -> &Carousel<LevelCommand> {
        &self.carousel
    }

    fn update_play_visibility(&mut self) {
        let visible = self.is_focused_unlocked();
        self.carousel
            .controls_mut()
            .set_visible(LevelCommand::Play, visible);
    }

    pub fn on_frame_tick(&mut self, dt: f32) {
        if let Some(index) = self.carousel.on_frame_tick(dt) {
            log::debug!("Level {} focused", index + 1);
        }
        self.update_play_visibility();
    }

    pub fn on_pointer_down(&mut self, point: Vec2, timestamp: f64) {
        self.carousel.on_pointer_down(point, timestamp);
    }

    pub fn on_pointer_move(&mut self, point: Vec2, timestamp: f64) {
        self.carousel.on_pointer_move(point, timestamp);
        self.update_play_visibility();
    }

    /// Returns the scene to navigate to, if a control was tapped
    pub fn on_pointer_up(&mut self, point: Vec2, timestamp: f64) -> Option<Scene> {
        match self.carousel.on_pointer_up(point, timestamp)? {
            LevelCommand::Back => Some(Scene::MainMenu),
            LevelCommand::Play => self.play(),
        }
    }

    pub fn on_pointer_cancel(&mut self, point: Vec2, timestamp: f64) {
        self.carousel.on_pointer_cancel(point, timestamp);
    }

    /// Store the focused level as selected and start it
    pub fn play(&mut self) -> Option<Scene> {
        if !self.is_focused_unlocked() {
            return None;
        }
        let level = self.focused_level();
        self.profile
            .borrow_mut()
            .set_int(ProfileKey::SelectedLevel, level as i64);
        log::info!("Starting level {}", level);
        Some(Scene::Game { level })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};
    use crate::persistence::{MemoryProfile, ProfileStore, shared};

    const FIELD: Vec2 = Vec2::new(FIELD_WIDTH, FIELD_HEIGHT);
    const PLAY: Vec2 = Vec2::new(FIELD_WIDTH * 0.5, 100.0);
    const BACK: Vec2 = Vec2::new(60.0, FIELD_HEIGHT - 100.0);

    fn select_with(max_level: i64, stars: &[(u32, i64)]) -> (LevelSelect, ProfileHandle) {
        let profile = shared(MemoryProfile::new());
        {
            let mut store = profile.borrow_mut();
            store.set_int(ProfileKey::MaxLevel, max_level);
            for &(level, s) in stars {
                store.set_int(ProfileKey::LevelStars(level), s);
            }
        }
        (
            LevelSelect::new(profile.clone(), CarouselTuning::levels(), FIELD),
            profile,
        )
    }

    fn tap(select: &mut LevelSelect, point: Vec2) -> Option<Scene> {
        select.on_pointer_down(point, 0.0);
        select.on_pointer_up(point, 0.05)
    }

    #[test]
    fn test_cards_reflect_profile() {
        let (select, _) = select_with(3, &[(1, 3), (2, 1), (4, 2)]);
        let cards = select.cards();
        assert_eq!(cards.len(), 50);
        assert_eq!(cards[0], LevelCard { level: 1, locked: false, stars: 3 });
        assert_eq!(cards[1].stars, 1);
        assert!(!cards[2].locked);
        // Stars on a locked card are not shown
        assert_eq!(cards[3], LevelCard { level: 4, locked: true, stars: 0 });
    }

    #[test]
    fn test_fresh_profile_focuses_level_one() {
        let (select, _) = select_with(0, &[]);
        assert_eq!(select.max_unlocked_level(), 1);
        assert_eq!(select.focused_level(), 1);
        assert!(select.carousel().controls().is_visible(LevelCommand::Play));
    }

    #[test]
    fn test_focus_starts_on_max_unlocked() {
        let (select, _) = select_with(7, &[]);
        assert_eq!(select.focused_level(), 7);
    }

    #[test]
    fn test_play_stores_selection() {
        let (mut select, profile) = select_with(4, &[]);
        assert_eq!(tap(&mut select, PLAY), Some(Scene::Game { level: 4 }));
        assert_eq!(profile.borrow().get_int(ProfileKey::SelectedLevel), 4);
    }

    #[test]
    fn test_locked_focus_hides_play() {
        let (mut select, profile) = select_with(2, &[]);
        // Drag one pitch left onto level 3
        select.on_pointer_down(Vec2::new(500.0, 600.0), 0.0);
        select.on_pointer_move(Vec2::new(340.0, 600.0), 1.0);
        select.on_pointer_up(Vec2::new(340.0, 600.0), 10.0);
        for _ in 0..60 {
            select.on_frame_tick(1.0 / 60.0);
        }
        assert_eq!(select.focused_level(), 3);
        assert!(!select.carousel().controls().is_visible(LevelCommand::Play));
        assert_eq!(tap(&mut select, PLAY), None);
        assert_eq!(profile.borrow().get_int(ProfileKey::SelectedLevel), 0);
    }

    #[test]
    fn test_back_returns_to_menu() {
        let (mut select, _) = select_with(1, &[]);
        assert_eq!(tap(&mut select, BACK), Some(Scene::MainMenu));
    }

    #[test]
    fn test_refresh_picks_up_new_unlocks() {
        let (mut select, profile) = select_with(1, &[]);
        assert!(select.cards()[1].locked);
        persistence::record_completion(&mut *profile.borrow_mut(), 1, 2, 5);
        select.refresh();
        assert!(!select.cards()[1].locked);
        assert_eq!(select.cards()[0].stars, 2);
    }
}
