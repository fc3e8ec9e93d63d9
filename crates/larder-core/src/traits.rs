//! Preservation traits and the trait registry.
//!
//! A trait is a named multiplicative decay adjustment attached to a unit
//! (brined, smoked, in cold storage). Definitions are read-only shared data
//! owned by the host and passed in by reference; per-unit state stores only
//! the ordered list of applied trait keys.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A named decay-rate adjustment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodTrait {
    /// Unique key, e.g. `"brined"`. Units reference traits by this key.
    pub key: String,
    /// Multiplier on the unit's decay rate, higher = spoils faster.
    /// Values below 1 preserve; a value of 0 halts decay entirely.
    pub decay_modifier: f32,
}

impl FoodTrait {
    /// Build a trait definition. The modifier is clamped to be non-negative.
    pub fn new(key: impl Into<String>, decay_modifier: f32) -> Self {
        Self {
            key: key.into(),
            decay_modifier: decay_modifier.max(0.0),
        }
    }
}

/// Read-only lookup table from trait key to definition.
///
/// Built once by the host at startup and shared immutably with every actor
/// that computes decay. Deserialization uses it to drop trait keys that are
/// no longer registered.
#[derive(Debug, Clone, Default)]
pub struct TraitRegistry {
    traits: HashMap<String, FoodTrait>,
}

impl TraitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a trait definition, replacing any previous entry for the key.
    pub fn register(&mut self, definition: FoodTrait) {
        self.traits.insert(definition.key.clone(), definition);
    }

    /// Builder-style `register` for constructing a registry inline.
    pub fn with(mut self, definition: FoodTrait) -> Self {
        self.register(definition);
        self
    }

    pub fn get(&self, key: &str) -> Option<&FoodTrait> {
        self.traits.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.traits.contains_key(key)
    }

    /// Decay modifier for a key. An unregistered key contributes a neutral
    /// factor; deserialization is the gate that drops unknown keys.
    pub fn decay_modifier_of(&self, key: &str) -> f32 {
        self.traits.get(key).map_or(1.0, |t| t.decay_modifier)
    }

    pub fn len(&self) -> usize {
        self.traits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traits.is_empty()
    }
}
