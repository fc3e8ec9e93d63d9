//! Global decay and nutrition tuning values.
//!
//! Hosts construct one `DecayConfig` (typically from their settings file) and
//! pass it by reference into kernel operations. Nothing here is read from
//! ambient state.

use serde::{Deserialize, Serialize};

/// Tuning values shared by the decay clock and the nutrition window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecayConfig {
    /// Global multiplier on every food's decay rate, higher = faster
    /// spoilage everywhere. Zero disables decay world-wide.
    pub global_decay_scalar: f32,
    /// Total hunger worth of consumption history the nutrition window
    /// retains. Values below 1 are clamped to 1.
    pub hunger_window: u32,
    /// Hunger capacity of a consumer; the unsatisfied remainder becomes the
    /// zero-nutrient gap at the front of the window.
    pub max_hunger: u32,
    /// Window fill value for channels not covered by records.
    pub default_nutrition: f32,
    /// Window fill value for the dairy channel, kept separate and typically
    /// lower.
    pub default_dairy_nutrition: f32,
    /// Creation dates round up to this boundary (in hours) so units created
    /// close together in time stack.
    pub stack_window_hours: u32,
    /// Maximum units a single stack may hold.
    pub max_stack_size: u32,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            global_decay_scalar: 1.0,
            hunger_window: 80, // four full hunger bars
            max_hunger: 20,
            default_nutrition: 0.5,
            default_dairy_nutrition: 0.0,
            stack_window_hours: 6,
            max_stack_size: 64,
        }
    }
}
