//! Preference-backed registries
//!
//! Each registry owns exactly one key in the [`PreferenceStore`] and keeps
//! an in-memory copy that is reconciled with the store on load and after
//! every mutation:
//!
//! - **BookmarkRegistry**: starred stations (`stations`)
//! - **MapStyleRegistry**: basemap variant (`mapType`)
//! - **LanguageRegistry**: UI locale (`language`)

pub mod bookmarks;
pub mod language;
pub mod map_style;

use serde::{de::DeserializeOwned, Serialize};
use std::rc::Rc;

use crate::prefs::PreferenceStore;

pub use bookmarks::{BookmarkRegistry, BookmarkedStation};
pub use language::{Language, LanguageRegistry};
pub use map_style::{MapStyle, MapStyleRegistry, Palette};

/// A single enumerated value persisted under a fixed key
pub trait PreferenceValue: Serialize + DeserializeOwned + Copy + Default + PartialEq {
    const KEY: &'static str;

    /// Next value in the cycle (used by the menu toggles)
    fn next(self) -> Self;
}

/// Registry for a single [`PreferenceValue`]
pub struct Setting<T: PreferenceValue> {
    store: Rc<PreferenceStore>,
    current: T,
}

impl<T: PreferenceValue> Setting<T> {
    pub fn load(store: Rc<PreferenceStore>) -> Self {
        let current = store.read(T::KEY, T::default());
        Self { store, current }
    }

    pub fn get(&self) -> T {
        self.current
    }

    pub fn set(&mut self, value: T) {
        // In-memory value changes even if the write below fails
        self.current = value;
        self.store.write(T::KEY, &value);
    }

    /// Advance to the next value and return it
    pub fn toggle(&mut self) -> T {
        let next = self.current.next();
        self.set(next);
        next
    }
}
