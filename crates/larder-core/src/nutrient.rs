//! Nutrient channels and per-food static data.

use serde::{Deserialize, Serialize};

/// The five nutrient channels tracked by the nutrition window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Nutrient {
    Grain,
    Fruit,
    Vegetables,
    Protein,
    /// The animal-derived channel. Gets its own, typically lower, default
    /// fill value in the nutrition window.
    Dairy,
}

impl Nutrient {
    pub const COUNT: usize = 5;

    pub const ALL: [Nutrient; Nutrient::COUNT] = [
        Nutrient::Grain,
        Nutrient::Fruit,
        Nutrient::Vegetables,
        Nutrient::Protein,
        Nutrient::Dairy,
    ];

    /// Channel index into a `[f32; 5]` nutrient array.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Immutable nutritional and decay data for one food type.
///
/// Defined once per food type and never mutated. Dynamic foods (meals
/// assembled from ingredients) carry their own instance instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodProfile {
    /// Hunger restored when eaten.
    pub hunger: u32,
    /// Water (thirst) restored when eaten.
    pub water: f32,
    /// Saturation granted on top of hunger.
    pub saturation: f32,
    /// Value per channel, indexed by [`Nutrient`].
    pub nutrients: [f32; Nutrient::COUNT],
    /// Base decay rate, higher = spoils faster. Zero means the food never
    /// decays on its own.
    pub decay_rate: f32,
}

impl FoodProfile {
    /// A zero-everything profile, used as the placeholder for dynamic foods
    /// before their ingredients are known.
    pub const EMPTY: FoodProfile = FoodProfile {
        hunger: 0,
        water: 0.0,
        saturation: 0.0,
        nutrients: [0.0; Nutrient::COUNT],
        decay_rate: 0.0,
    };

    /// Build a profile. Negative inputs are clamped to zero.
    pub fn new(
        hunger: u32,
        water: f32,
        saturation: f32,
        nutrients: [f32; Nutrient::COUNT],
        decay_rate: f32,
    ) -> Self {
        let mut clamped = nutrients;
        for value in &mut clamped {
            *value = value.max(0.0);
        }
        Self {
            hunger,
            water: water.max(0.0),
            saturation: saturation.max(0.0),
            nutrients: clamped,
            decay_rate: decay_rate.max(0.0),
        }
    }

    /// Value of a single nutrient channel.
    pub fn nutrient(&self, channel: Nutrient) -> f32 {
        self.nutrients[channel.index()]
    }
}
