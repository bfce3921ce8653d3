//! Blade shop
//!
//! One card per blade. The action control under the strip buys the focused
//! blade, selects it if already owned, and is hidden when it is already the
//! blade in use.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::Carousel;
use crate::persistence::{self, ProfileHandle, ProfileKey};
use crate::tuning::CarouselTuning;
use crate::ui::{ControlTable, Rect, Scene};

/// Blade names and prices, by blade index
pub const BLADE_CATALOG: [(&str, u64); 6] = [
    ("white", 0),
    ("black", 100),
    ("red", 250),
    ("green", 500),
    ("blue", 1000),
    ("purple", 1000),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopCommand {
    Back,
    BuyOrSelect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BladeItem {
    pub name: &'static str,
    pub price: u64,
    pub owned: bool,
    pub selected: bool,
}

/// What the action control offers for the focused blade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShopAction {
    /// Owned and in use
    Hidden,
    Select,
    Buy { price: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShopOutcome {
    Selected { index: usize },
    Purchased { index: usize, price: u64 },
    NotEnoughCurrency { price: u64, balance: u64 },
    AlreadySelected,
}

/// Result of a tap on the shop screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopReaction {
    Navigate(Scene),
    Outcome(ShopOutcome),
}

pub struct Shop {
    carousel: Carousel<ShopCommand>,
    profile: ProfileHandle,
    items: Vec<BladeItem>,
}

impl Shop {
    pub fn new(profile: ProfileHandle, tuning: CarouselTuning, field: Vec2) -> Self {
        let mut controls = ControlTable::new();
        controls.add(
            Rect::from_center(Vec2::new(60.0, field.y - 100.0), Vec2::new(80.0, 60.0)),
            ShopCommand::Back,
        );
        controls.add(
            Rect::from_center(
                Vec2::new(field.x * 0.5, field.y * 0.15),
                Vec2::new(field.x * 0.8, 70.0),
            ),
            ShopCommand::BuyOrSelect,
        );

        let mut shop = Self {
            carousel: Carousel::new(BLADE_CATALOG.len(), tuning, controls),
            profile,
            items: Vec::new(),
        };
        shop.refresh();
        shop
    }

    /// Re-read ownership and selection from the profile
    pub fn refresh(&mut self) {
        let store = self.profile.borrow();
        let owned = persistence::owned_blades(&*store);
        let selected = persistence::selected_blade(&*store);
        self.items = BLADE_CATALOG
            .iter()
            .enumerate()
            .map(|(i, &(name, price))| BladeItem {
                name,
                price,
                owned: owned.contains(&i),
                selected: i == selected,
            })
            .collect();
        drop(store);
        self.update_action_visibility();
    }

    pub fn items(&self) -> &[BladeItem] {
        &self.items
    }

    pub fn balance(&self) -> u64 {
        persistence::currency(&*self.profile.borrow())
    }

    pub fn focused_index(&self) -> usize {
        self.carousel.focused_index()
    }

    pub fn carousel(&self) -> &Carousel<ShopCommand> {
        &self.carousel
    }

    /// Action offered for the focused blade
    pub fn action(&self) -> ShopAction {
        match self.items.get(self.focused_index()) {
            Some(item) if item.owned && item.selected => ShopAction::Hidden,
            Some(item) if item.owned => ShopAction::Select,
            Some(item) => ShopAction::Buy { price: item.price },
            None => ShopAction::Hidden,
        }
    }

    fn update_action_visibility(&mut self) {
        let visible = self.action() != ShopAction::Hidden;
        self.carousel
            .controls_mut()
            .set_visible(ShopCommand::BuyOrSelect, visible);
    }

    /// Buy or select the focused blade
    pub fn buy_or_select(&mut self) -> ShopOutcome {
        let index = self.focused_index();
        let outcome = match self.action() {
            ShopAction::Hidden => ShopOutcome::AlreadySelected,
            ShopAction::Select => {
                self.profile
                    .borrow_mut()
                    .set_int(ProfileKey::SelectedBlade, index as i64);
                ShopOutcome::Selected { index }
            }
            ShopAction::Buy { price } => self.purchase(index, price),
        };
        log::info!("Shop: {:?}", outcome);
        self.refresh();
        outcome
    }

    fn purchase(&mut self, index: usize, price: u64) -> ShopOutcome {
        let mut store = self.profile.borrow_mut();
        let balance = persistence::currency(&*store);
        if balance < price {
            return ShopOutcome::NotEnoughCurrency { price, balance };
        }

        store.set_int(ProfileKey::Currency, (balance - price) as i64);
        let mut owned: Vec<i64> = persistence::owned_blades(&*store)
            .into_iter()
            .map(|i| i as i64)
            .collect();
        owned.push(index as i64);
        store.set_int_array(ProfileKey::OwnedBlades, owned);
        ShopOutcome::Purchased { index, price }
    }

    pub fn on_frame_tick(&mut self, dt: f32) {
        self.carousel.on_frame_tick(dt);
        self.update_action_visibility();
    }

    pub fn on_pointer_down(&mut self, point: Vec2, timestamp: f64) {
        self.carousel.on_pointer_down(point, timestamp);
    }

    pub fn on_pointer_move(&mut self, point: Vec2, timestamp: f64) {
        self.carousel.on_pointer_move(point, timestamp);
        self.update_action_visibility();
    }

    pub fn on_pointer_up(&mut self, point: Vec2, timestamp: f64) -> Option<ShopReaction> {
        match self.carousel.on_pointer_up(point, timestamp)? {
            ShopCommand::Back => Some(ShopReaction::Navigate(Scene::MainMenu)),
            ShopCommand::BuyOrSelect => Some(ShopReaction::Outcome(self.buy_or_select())),
        }
    }

    pub fn on_pointer_cancel(&mut self, point: Vec2, timestamp: f64) {
        self.carousel.on_pointer_cancel(point, timestamp);
    }
}
