//! Player profile persistence
//!
//! The game only ever talks to a flat key-value store of integers and
//! integer lists. `ProfileStore` is that contract; `MemoryProfile` is the
//! in-memory implementation used by tests and the headless driver, and can
//! be snapshotted to JSON by whatever host owns real storage.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::consts::MAX_LEVEL_CAP;

/// Keys the game reads and writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileKey {
    /// Level chosen on the level selection screen
    SelectedLevel,
    /// Highest unlocked level
    MaxLevel,
    /// Lifetime currency (sum of fruit cut on completed levels, minus purchases)
    Currency,
    /// Star rating last earned on a level
    LevelStars(u32),
    /// Indices of owned blades
    OwnedBlades,
    /// Index of the blade in use
    SelectedBlade,
}

impl ProfileKey {
    /// Storage key string
    pub fn as_key(&self) -> String {
        match self {
            ProfileKey::SelectedLevel => "selectedLevel".to_string(),
            ProfileKey::MaxLevel => "maxLevel".to_string(),
            ProfileKey::Currency => "totalStars".to_string(),
            ProfileKey::LevelStars(level) => format!("stars_level_{}", level),
            ProfileKey::OwnedBlades => "ownedBlades".to_string(),
            ProfileKey::SelectedBlade => "selectedBladeIndex".to_string(),
        }
    }
}

/// Read/write contract for the player profile
///
/// Missing scalars read as 0 and missing lists read as empty, matching
/// platform preference stores.
pub trait ProfileStore {
    fn get_int(&self, key: ProfileKey) -> i64;
    fn set_int(&mut self, key: ProfileKey, value: i64);
    fn get_int_array(&self, key: ProfileKey) -> Vec<i64>;
    fn set_int_array(&mut self, key: ProfileKey, value: Vec<i64>);
}

/// Shared handle injected into sessions and carousels
pub type ProfileHandle = Rc<RefCell<dyn ProfileStore>>;

/// Wrap a store into a shared handle
pub fn shared<P: ProfileStore + 'static>(store: P) -> ProfileHandle {
    Rc::new(RefCell::new(store))
}

/// A single stored value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredValue {
    Int(i64),
    IntArray(Vec<i64>),
}

/// In-memory profile store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryProfile {
    values: BTreeMap<String, StoredValue>,
}

impl MemoryProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl ProfileStore for MemoryProfile {
    fn get_int(&self, key: ProfileKey) -> i64 {
        match self.values.get(&key.as_key()) {
            Some(StoredValue::Int(v)) => *v,
            _ => 0,
        }
    }

    fn set_int(&mut self, key: ProfileKey, value: i64) {
        self.values.insert(key.as_key(), StoredValue::Int(value));
    }

    fn get_int_array(&self, key: ProfileKey) -> Vec<i64> {
        match self.values.get(&key.as_key()) {
            Some(StoredValue::IntArray(v)) => v.clone(),
            _ => Vec::new(),
        }
    }

    fn set_int_array(&mut self, key: ProfileKey, value: Vec<i64>) {
        self.values.insert(key.as_key(), StoredValue::IntArray(value));
    }
}

// === Typed accessors ===

/// Highest unlocked level, clamped to `[1, MAX_LEVEL_CAP]`
pub fn max_unlocked_level(store: &dyn ProfileStore) -> u32 {
    store.get_int(ProfileKey::MaxLevel).clamp(1, MAX_LEVEL_CAP as i64) as u32
}

/// Level the player picked last (at least 1)
pub fn selected_level(store: &dyn ProfileStore) -> u32 {
    store.get_int(ProfileKey::SelectedLevel).max(1) as u32
}

/// Lifetime currency balance
pub fn currency(store: &dyn ProfileStore) -> u64 {
    store.get_int(ProfileKey::Currency).max(0) as u64
}

/// Stars last earned on `level` (0 if never completed)
pub fn level_stars(store: &dyn ProfileStore, level: u32) -> u8 {
    store.get_int(ProfileKey::LevelStars(level)).clamp(0, 3) as u8
}

/// Owned blade indices; blade 0 is always owned
pub fn owned_blades(store: &dyn ProfileStore) -> Vec<usize> {
    let stored = store.get_int_array(ProfileKey::OwnedBlades);
    if stored.is_empty() {
        return vec![0];
    }
    stored
        .into_iter()
        .filter(|&i| i >= 0)
        .map(|i| i as usize)
        .collect()
}

pub fn selected_blade(store: &dyn ProfileStore) -> usize {
    store.get_int(ProfileKey::SelectedBlade).max(0) as usize
}

/// Commit the results of a completed level
///
/// Raises the unlock high-water mark, adds the fruit cut to the currency
/// total, and overwrites the level's star rating with the latest result.
pub fn record_completion(store: &mut dyn ProfileStore, level: u32, stars: u8, fruit_cut: u32) {
    let stored_max = store.get_int(ProfileKey::MaxLevel);
    let new_max = (level as i64 + 1).max(stored_max);
    store.set_int(ProfileKey::MaxLevel, new_max);

    let balance = store.get_int(ProfileKey::Currency);
    store.set_int(ProfileKey::Currency, balance.saturating_add(fruit_cut as i64));

    store.set_int(ProfileKey::LevelStars(level), stars as i64);

    log::info!(
        "Level {} recorded: {} stars, +{} currency, max level {}",
        level,
        stars,
        fruit_cut,
        new_max
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_values_read_as_defaults() {
        let profile = MemoryProfile::new();
        assert_eq!(profile.get_int(ProfileKey::Currency), 0);
        assert!(profile.get_int_array(ProfileKey::OwnedBlades).is_empty());
        assert_eq!(max_unlocked_level(&profile), 1);
        assert_eq!(owned_blades(&profile), vec![0]);
        assert_eq!(level_stars(&profile, 7), 0);
    }

    #[test]
    fn test_key_strings() {
        assert_eq!(ProfileKey::LevelStars(4).as_key(), "stars_level_4");
        assert_eq!(ProfileKey::Currency.as_key(), "totalStars");
    }

    #[test]
    fn test_max_level_clamped() {
        let mut profile = MemoryProfile::new();
        profile.set_int(ProfileKey::MaxLevel, 500);
        assert_eq!(max_unlocked_level(&profile), MAX_LEVEL_CAP);
        profile.set_int(ProfileKey::MaxLevel, -3);
        assert_eq!(max_unlocked_level(&profile), 1);
    }

    #[test]
    fn test_record_completion_raises_max_and_accumulates() {
        let mut profile = MemoryProfile::new();
        record_completion(&mut profile, 3, 2, 12);
        assert_eq!(profile.get_int(ProfileKey::MaxLevel), 4);
        assert_eq!(profile.get_int(ProfileKey::Currency), 12);
        assert_eq!(level_stars(&profile, 3), 2);

        // Replaying an earlier level keeps the high-water mark
        record_completion(&mut profile, 1, 1, 2);
        assert_eq!(profile.get_int(ProfileKey::MaxLevel), 4);
        assert_eq!(profile.get_int(ProfileKey::Currency), 14);
    }

    #[test]
    fn test_record_completion_overwrites_stars() {
        let mut profile = MemoryProfile::new();
        record_completion(&mut profile, 2, 3, 10);
        record_completion(&mut profile, 2, 1, 3);
        assert_eq!(level_stars(&profile, 2), 1);
    }

    #[test]
    fn test_json_snapshot() {
        let mut profile = MemoryProfile::new();
        profile.set_int(ProfileKey::Currency, 250);
        profile.set_int_array(ProfileKey::OwnedBlades, vec![0, 2]);
        let json = profile.to_json().expect("serializable");
        let back = MemoryProfile::from_json(&json).expect("valid json");
        assert_eq!(back, profile);
        assert_eq!(back.get_int_array(ProfileKey::OwnedBlades), vec![0, 2]);
    }

    #[test]
    fn test_shared_handle_mutation_visible() {
        let handle = shared(MemoryProfile::new());
        handle.borrow_mut().set_int(ProfileKey::SelectedLevel, 5);
        assert_eq!(selected_level(&*handle.borrow()), 5);
    }
}
