//! Per-creature mutable record: identity, name, trait selections, health.

use serde::{Deserialize, Serialize};

use crate::catalog::{TraitCategory, TraitOptionId};

/// Health every creature starts a playthrough with.
pub const BASE_HEALTH: i32 = 2;

/// One creature in the roster. Created at roster setup, owned by the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creature {
    /// Zero-based id, stable for the session.
    pub id: u8,
    /// Display name, user-editable.
    pub name: String,
    /// Selected option per category, indexed by `TraitCategory::index`.
    traits: [Option<TraitOptionId>; 4],
    /// Current health. No upper clamp; zero or below means dead.
    health: i32,
}

impl Creature {
    /// Create a creature with all trait slots empty and base health.
    #[must_use]
    pub fn new(id: u8) -> Self {
        Self {
            id,
            name: format!("Creature {}", id + 1),
            traits: [None; 4],
            health: BASE_HEALTH,
        }
    }

    /// Select an option for a category, replacing any previous selection.
    pub const fn set_trait(&mut self, category: TraitCategory, id: TraitOptionId) {
        self.traits[category.index()] = Some(id);
    }

    /// The selection for a category, if any.
    #[must_use]
    pub const fn trait_for(&self, category: TraitCategory) -> Option<TraitOptionId> {
        self.traits[category.index()]
    }

    /// All current selections, in category display order.
    pub fn selected_traits(&self) -> impl Iterator<Item = TraitOptionId> + '_ {
        self.traits.iter().filter_map(|slot| *slot)
    }

    /// True when every category has a selection.
    #[must_use]
    pub fn is_fully_specified(&self) -> bool {
        self.traits.iter().all(Option::is_some)
    }

    /// True when this creature carries the given option.
    #[must_use]
    pub fn has_trait(&self, id: TraitOptionId) -> bool {
        self.traits.contains(&Some(id))
    }

    #[must_use]
    pub const fn health(&self) -> i32 {
        self.health
    }

    /// Add a (possibly negative) delta to health. Not clamped.
    pub const fn apply_health_delta(&mut self, delta: i32) {
        self.health += delta;
    }

    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Replace the display name.
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
}
