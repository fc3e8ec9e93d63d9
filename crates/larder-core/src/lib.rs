//! Larder Core — food decay and nutrition kernel.
//!
//! Tracks time-based spoilage of perishable food units and aggregates the
//! nutritional effect of recently eaten food into a rolling average. The
//! kernel is pure logic: "now" is an explicit tick parameter, trait
//! definitions live in a registry the host owns, and tuning values arrive in
//! a config struct — no globals, no ambient calendar.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`calendar`] | Tick conventions, the tagged `Timestamp`, creation-date rounding |
//! | [`config`] | Global decay and nutrition tuning values |
//! | [`decay`] | Per-unit spoilage state: rotten dates, trait blending, stack merging |
//! | [`nutrient`] | The five nutrient channels and per-food static data |
//! | [`nutrition`] | Per-consumer rolling nutrient average over recent consumption |
//! | [`persistence`] | Versioned bincode save/load for units and windows |
//! | [`traits`] | Preservation trait definitions and the host-owned registry |
//!
//! # Example
//!
//! ```rust
//! use larder_core::prelude::*;
//!
//! let config = DecayConfig::default();
//! let registry = TraitRegistry::new().with(FoodTrait::new("brined", 0.5));
//!
//! let venison = FoodProfile::new(4, 0.5, 1.0, [0.0, 0.0, 0.0, 1.0, 0.0], 2.0);
//! let mut unit = FoodDecay::created_now(venison.clone(), 1_000, &config);
//! unit.apply_trait("brined", 2_000, &registry, &config);
//! assert!(!unit.is_rotten(2_000, &registry, &config));
//!
//! let mut window = NutritionWindow::new(&config);
//! window.consume(&venison, 16, &config);
//! assert!(window.nutrient(Nutrient::Protein) > 0.0);
//! ```

pub mod calendar;
pub mod config;
pub mod decay;
pub mod nutrient;
pub mod nutrition;
pub mod persistence;
pub mod traits;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::calendar::Timestamp;
    pub use crate::config::DecayConfig;
    pub use crate::decay::FoodDecay;
    pub use crate::nutrient::{FoodProfile, Nutrient};
    pub use crate::nutrition::NutritionWindow;
    pub use crate::traits::{FoodTrait, TraitRegistry};
}
