//! Per-unit decay state and rotten-date arithmetic.
//!
//! Two conventions matter everywhere here:
//!
//! - A *decay rate* (on profiles, traits, and the global scalar) is a
//!   multiplier where higher = faster spoilage.
//! - A *date modifier* is the reciprocal of the combined decay rate, used as
//!   a multiplier on elapsed time until rot — higher = slower spoilage, with
//!   infinity meaning never. A zero rate product maps to infinity rather
//!   than dividing.
//!
//! Trait application preserves the decayed *fraction* of a unit by blending
//! its creation date toward the current time:
//!
//! ```text
//! Cf = (1 - p) * T + p * Ci
//! ```
//!
//! where `T` is now, `Ci` the old creation date, and `p` the ratio between
//! the old and new date modifiers. For a unit that has not yet rotted
//! (`Ei = Ci + d > T`), the blended expiry `Ef = Cf + p * d` satisfies
//! `Ef = (1 - p) * T + p * Ei > T`, so a recompute can never flip a fresh
//! unit to rotten at the current instant.

use crate::calendar::{rounded_creation, Timestamp, BASE_DECAY_TICKS};
use crate::config::DecayConfig;
use crate::nutrient::FoodProfile;
use crate::traits::TraitRegistry;

/// Decay-tracked state for a stack of identical perishable units.
#[derive(Debug, Clone, PartialEq)]
pub struct FoodDecay {
    pub profile: FoodProfile,
    pub creation: Timestamp,
    /// Applied trait keys, unique, in application order.
    trait_keys: Vec<String>,
    /// Transiently non-decaying (recipe display stacks and the like).
    /// Ignores `creation` entirely and is not persisted.
    pub non_decaying: bool,
    /// Units in this stack.
    pub count: u32,
    /// Whether the profile is per-unit (assembled meals) rather than
    /// type-derived; decides whether persistence writes the profile out.
    pub dynamic: bool,
}

impl FoodDecay {
    /// A single unit with a type-derived profile.
    pub fn new(profile: FoodProfile, creation: Timestamp) -> Self {
        Self {
            profile,
            creation,
            trait_keys: Vec::new(),
            non_decaying: false,
            count: 1,
            dynamic: false,
        }
    }

    /// A single unit carrying its own profile (assembled meals).
    pub fn new_dynamic(profile: FoodProfile, creation: Timestamp) -> Self {
        Self {
            dynamic: true,
            ..Self::new(profile, creation)
        }
    }

    /// A single unit stamped with the rounded current time, for food created
    /// from non-food inputs.
    pub fn created_now(profile: FoodProfile, now: i64, config: &DecayConfig) -> Self {
        Self::new(
            profile,
            Timestamp::At(rounded_creation(now, config.stack_window_hours)),
        )
    }

    /// Applied trait keys in application order.
    pub fn traits(&self) -> &[String] {
        &self.trait_keys
    }

    pub fn has_trait(&self, key: &str) -> bool {
        self.trait_keys.iter().any(|k| k == key)
    }

    /// Combined date modifier for this unit: higher = slower decay,
    /// infinity = never decays.
    pub fn date_modifier(&self, registry: &TraitRegistry, config: &DecayConfig) -> f32 {
        decay_date_modifier(&self.profile, &self.trait_keys, registry, config)
    }

    /// The date this unit rots, if it does.
    pub fn rotten_date(&self, registry: &TraitRegistry, config: &DecayConfig) -> Timestamp {
        if self.non_decaying {
            return Timestamp::Never;
        }
        rotten_date_from(self.creation, self.date_modifier(registry, config))
    }

    pub fn is_rotten(&self, now: i64, registry: &TraitRegistry, config: &DecayConfig) -> bool {
        match self.rotten_date(registry, config) {
            Timestamp::Rotten => true,
            Timestamp::At(rot) => rot <= now,
            Timestamp::Never | Timestamp::Unknown => false,
        }
    }

    /// Apply a trait, blending the creation date so the decayed fraction is
    /// unchanged. Idempotent per key. Rotten units and units with no known
    /// creation take the key without a recompute.
    ///
    /// Returns whether the key was newly applied.
    pub fn apply_trait(
        &mut self,
        key: &str,
        now: i64,
        registry: &TraitRegistry,
        config: &DecayConfig,
    ) -> bool {
        if self.has_trait(key) {
            return false;
        }
        if !self.is_rotten(now, registry, config) {
            if let Timestamp::At(ci) = self.creation {
                let modifier = registry.decay_modifier_of(key);
                if modifier > 0.0 {
                    let p = 1.0 / f64::from(modifier);
                    self.creation = Timestamp::At(blend_creation(ci, now, p));
                }
                // A zero modifier makes the combined product zero and the
                // date modifier infinite; the creation date no longer
                // matters, so there is nothing to blend.
            }
        }
        self.trait_keys.push(key.to_owned());
        true
    }

    /// Append a trait key without any creation-date recompute. Used when
    /// restoring persisted state, where the blend already happened.
    pub(crate) fn apply_trait_raw(&mut self, key: &str) {
        if !self.has_trait(key) {
            self.trait_keys.push(key.to_owned());
        }
    }

    /// Remove a trait, undoing the blend direction used when it was applied.
    ///
    /// Returns whether the key was present.
    pub fn remove_trait(
        &mut self,
        key: &str,
        now: i64,
        registry: &TraitRegistry,
        config: &DecayConfig,
    ) -> bool {
        let Some(pos) = self.trait_keys.iter().position(|k| k == key) else {
            return false;
        };
        // Rot status and the blend ratio are read with the trait still
        // applied, mirroring application.
        if !self.is_rotten(now, registry, config) {
            if let Timestamp::At(ci) = self.creation {
                let p = f64::from(registry.decay_modifier_of(key));
                if p > 0.0 {
                    self.creation = Timestamp::At(blend_creation(ci, now, p));
                }
            }
        }
        self.trait_keys.remove(pos);
        true
    }

    /// Collapse observable state: an `Unknown` creation is stamped to the
    /// rounded current time, and a unit past its rotten date becomes
    /// permanently `Rotten`. Run before persisting or displaying.
    pub fn normalize(&mut self, now: i64, registry: &TraitRegistry, config: &DecayConfig) {
        if self.non_decaying {
            return;
        }
        if self.creation == Timestamp::Unknown {
            self.creation = Timestamp::At(rounded_creation(now, config.stack_window_hours));
        }
        if let Timestamp::At(rot) = self.rotten_date(registry, config) {
            if rot <= now {
                self.creation = Timestamp::Rotten;
            }
        }
    }

    /// Two stacks combine when everything but the creation date matches:
    /// same profile, same trait set (order ignored).
    pub fn is_stackable_with(&self, other: &FoodDecay) -> bool {
        self.profile == other.profile
            && self.trait_keys.len() == other.trait_keys.len()
            && self.trait_keys.iter().all(|k| other.has_trait(k))
    }

    /// Merge units from `other` into this stack, up to the configured stack
    /// size; the remainder stays in `other` untouched. The merged stack
    /// adopts the more-decayed creation date of the two.
    ///
    /// Returns the number of units moved.
    pub fn merge_from(&mut self, other: &mut FoodDecay, now: i64, config: &DecayConfig) -> u32 {
        if !self.is_stackable_with(other) {
            return 0;
        }
        let moved = other
            .count
            .min(config.max_stack_size.saturating_sub(self.count));
        if moved == 0 {
            return 0;
        }
        let ours = resolve_unknown(self.creation, now, config);
        let theirs = resolve_unknown(other.creation, now, config);
        self.creation = Timestamp::earlier_of(ours, theirs);
        self.count += moved;
        other.count -= moved;
        moved
    }

    /// Inherit decay state when `prev` is transformed into this unit
    /// (cooking, crafting). Copies `prev`'s traits, then sets the creation
    /// date from `prev`'s scaled by the ratio of the two date modifiers, so
    /// the decayed fraction carries over.
    pub fn inherit_from(
        &mut self,
        prev: &FoodDecay,
        now: i64,
        registry: &TraitRegistry,
        config: &DecayConfig,
    ) {
        // Traits first, so the ratio reflects both sets.
        for key in prev.traits() {
            if !self.has_trait(key) {
                self.trait_keys.push(key.clone());
            }
        }
        let ratio = f64::from(self.date_modifier(registry, config))
            / f64::from(prev.date_modifier(registry, config));
        self.creation = inherited_creation(prev.creation, now, ratio, config);
    }

    /// Inherit decay state from several source units at once (a meal from
    /// many ingredients): earliest creation date, average date modifier.
    /// Traits are not copied.
    pub fn inherit_from_all(
        &mut self,
        prevs: &[FoodDecay],
        now: i64,
        registry: &TraitRegistry,
        config: &DecayConfig,
    ) {
        if prevs.is_empty() {
            return;
        }
        let mut modifier_sum = 0.0;
        let mut earliest = prevs[0].creation;
        for prev in prevs {
            modifier_sum += f64::from(prev.date_modifier(registry, config));
            earliest = Timestamp::earlier_of(earliest, prev.creation);
        }
        let mean = modifier_sum / prevs.len() as f64;
        let ratio = f64::from(self.date_modifier(registry, config)) / mean;
        self.creation = inherited_creation(earliest, now, ratio, config);
    }
}

/// Combined date modifier for a profile and trait set.
///
/// Product of the profile decay rate, the global scalar, and every trait
/// modifier, then inverted; a zero product maps to infinity (never decays)
/// instead of dividing.
pub fn decay_date_modifier(
    profile: &FoodProfile,
    trait_keys: &[String],
    registry: &TraitRegistry,
    config: &DecayConfig,
) -> f32 {
    let mut rate = profile.decay_rate * config.global_decay_scalar;
    for key in trait_keys {
        rate *= registry.decay_modifier_of(key);
    }
    if rate == 0.0 {
        f32::INFINITY
    } else {
        1.0 / rate
    }
}

/// Rotten date for a creation timestamp under a date modifier, saturating to
/// `Never` on an infinite modifier or tick overflow.
pub fn rotten_date_from(creation: Timestamp, date_modifier: f32) -> Timestamp {
    match creation {
        Timestamp::At(t) => {
            let extent = f64::from(date_modifier) * BASE_DECAY_TICKS as f64;
            if !extent.is_finite() || extent >= i64::MAX as f64 {
                return Timestamp::Never;
            }
            match t.checked_add(extent as i64) {
                Some(rot) => Timestamp::At(rot),
                None => Timestamp::Never,
            }
        }
        sentinel => sentinel,
    }
}

/// `Cf = (1 - p) * T + p * Ci`, in f64 to keep precision over large tick
/// values.
fn blend_creation(ci: i64, now: i64, p: f64) -> i64 {
    ((1.0 - p) * now as f64 + p * ci as f64) as i64
}

fn resolve_unknown(creation: Timestamp, now: i64, config: &DecayConfig) -> Timestamp {
    match creation {
        Timestamp::Unknown => Timestamp::At(rounded_creation(now, config.stack_window_hours)),
        other => other,
    }
}

/// Creation date for a unit inheriting decay from `prev_creation` with the
/// given modifier ratio. A non-finite ratio means the output never decays
/// under its current modifiers; it is stamped fresh so the date stays sane
/// if traits are later removed.
fn inherited_creation(
    prev_creation: Timestamp,
    now: i64,
    ratio: f64,
    config: &DecayConfig,
) -> Timestamp {
    match prev_creation {
        Timestamp::At(ci) if ratio.is_finite() => Timestamp::At(rounded_creation(
            blend_creation(ci, now, ratio),
            config.stack_window_hours,
        )),
        Timestamp::At(_) => Timestamp::At(rounded_creation(now, config.stack_window_hours)),
        Timestamp::Unknown => Timestamp::At(rounded_creation(now, config.stack_window_hours)),
        sentinel => sentinel,
    }
}
