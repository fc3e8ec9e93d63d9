//! Save/Load functionality for decay units and nutrition windows.
//!
//! Uses bincode for binary serialization. State is normalized before capture:
//! a unit past its rotten date saves as `Rotten`, and an unknown creation
//! date is stamped to the rounded current time. Trait keys that are no longer
//! registered when loading are dropped with a warning rather than failing the
//! load.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::calendar::Timestamp;
use crate::config::DecayConfig;
use crate::decay::FoodDecay;
use crate::nutrient::FoodProfile;
use crate::nutrition::{ConsumptionRecord, NutritionWindow};
use crate::traits::TraitRegistry;

/// Version number for the save format (increment when the format changes).
const SAVE_VERSION: u32 = 1;

/// Serialized snapshot of one decay unit.
#[derive(Serialize, Deserialize)]
pub struct DecaySave {
    /// Save format version.
    pub version: u32,
    pub creation: Timestamp,
    /// Trait keys in application order.
    pub trait_keys: Vec<String>,
    /// Only present for dynamic units; type-derived profiles are resupplied
    /// by the host on load.
    pub profile: Option<FoodProfile>,
    pub count: u32,
}

/// Serialized snapshot of one consumer's nutrition window.
#[derive(Serialize, Deserialize)]
pub struct NutritionSave {
    /// Save format version.
    pub version: u32,
    /// Consumption records, newest first.
    pub records: Vec<ConsumptionRecord>,
    pub hunger: u32,
}

/// Save a decay unit to a writer.
///
/// The unit itself is not mutated; normalization happens on a snapshot.
pub fn save_decay<W: Write>(
    writer: W,
    unit: &FoodDecay,
    now: i64,
    registry: &TraitRegistry,
    config: &DecayConfig,
) -> Result<(), SaveError> {
    let mut snapshot = unit.clone();
    snapshot.normalize(now, registry, config);

    let save = DecaySave {
        version: SAVE_VERSION,
        creation: snapshot.creation,
        trait_keys: snapshot.traits().to_vec(),
        profile: snapshot.dynamic.then(|| snapshot.profile.clone()),
        count: snapshot.count,
    };
    bincode::serialize_into(writer, &save)?;
    Ok(())
}

/// Load a decay unit from a reader.
///
/// `static_profile` supplies the profile for type-derived units; dynamic
/// units carry their own. Unknown trait keys are dropped with a warning.
pub fn load_decay<R: Read>(
    reader: R,
    static_profile: Option<FoodProfile>,
    now: i64,
    registry: &TraitRegistry,
    config: &DecayConfig,
) -> Result<FoodDecay, SaveError> {
    let save: DecaySave = bincode::deserialize_from(reader)?;
    if save.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: save.version,
        });
    }

    let dynamic = save.profile.is_some();
    let profile = match save.profile.or(static_profile) {
        Some(profile) => profile,
        None => return Err(SaveError::MissingProfile),
    };

    let mut unit = if dynamic {
        FoodDecay::new_dynamic(profile, save.creation)
    } else {
        FoodDecay::new(profile, save.creation)
    };
    unit.count = save.count;

    for key in save.trait_keys {
        if registry.contains(&key) {
            unit.apply_trait_raw(&key);
        } else {
            log::warn!("dropping unregistered food trait '{}' from save data", key);
        }
    }

    // An unknown creation date needs a reset, not an error.
    unit.normalize(now, registry, config);
    Ok(unit)
}

/// Save a nutrition window to a writer.
pub fn save_nutrition<W: Write>(writer: W, window: &NutritionWindow) -> Result<(), SaveError> {
    let save = NutritionSave {
        version: SAVE_VERSION,
        records: window.records().cloned().collect(),
        hunger: window.hunger(),
    };
    bincode::serialize_into(writer, &save)?;
    Ok(())
}

/// Load a nutrition window from a reader, recomputing the average.
pub fn load_nutrition<R: Read>(
    reader: R,
    config: &DecayConfig,
) -> Result<NutritionWindow, SaveError> {
    let save: NutritionSave = bincode::deserialize_from(reader)?;
    if save.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: save.version,
        });
    }
    Ok(NutritionWindow::from_records(
        save.records,
        save.hunger,
        config,
    ))
}

/// Errors that can occur during save/load.
#[derive(Debug)]
pub enum SaveError {
    Io(std::io::Error),
    Bincode(Box<bincode::ErrorKind>),
    VersionMismatch { expected: u32, found: u32 },
    /// A type-derived unit was loaded without a profile to attach.
    MissingProfile,
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<Box<bincode::ErrorKind>> for SaveError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        SaveError::Bincode(e)
    }
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "IO error: {}", e),
            SaveError::Bincode(e) => write!(f, "Serialization error: {}", e),
            SaveError::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Save version mismatch: expected {}, found {}",
                    expected, found
                )
            }
            SaveError::MissingProfile => {
                write!(f, "No profile available for a type-derived unit")
            }
        }
    }
}

impl std::error::Error for SaveError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::BASE_DECAY_TICKS;
    use crate::nutrient::Nutrient;
    use crate::traits::FoodTrait;

    fn meat() -> FoodProfile {
        FoodProfile::new(4, 0.5, 1.0, [0.0, 0.0, 0.0, 1.0, 0.0], 1.0)
    }

    fn registry() -> TraitRegistry {
        TraitRegistry::new()
            .with(FoodTrait::new("brined", 0.5))
            .with(FoodTrait::new("smoked", 0.25))
    }

    #[test]
    fn test_decay_roundtrip_preserves_rotten_date() {
        let (reg, cfg) = (registry(), DecayConfig::default());
        let mut unit = FoodDecay::new(meat(), Timestamp::At(6_000));
        unit.apply_trait("brined", 10_000, &reg, &cfg);
        unit.apply_trait("smoked", 20_000, &reg, &cfg);

        let mut buffer = Vec::new();
        save_decay(&mut buffer, &unit, 30_000, &reg, &cfg).expect("save failed");
        let loaded =
            load_decay(&buffer[..], Some(meat()), 30_000, &reg, &cfg).expect("load failed");

        assert_eq!(loaded.creation, unit.creation);
        assert_eq!(loaded.traits(), unit.traits(), "trait order survives");
        assert_eq!(
            loaded.rotten_date(&reg, &cfg),
            unit.rotten_date(&reg, &cfg),
            "rotten date must be identical after a round trip"
        );
    }

    #[test]
    fn test_rotted_unit_saves_as_rotten() {
        let (reg, cfg) = (registry(), DecayConfig::default());
        let unit = FoodDecay::new(meat(), Timestamp::At(0));
        let past_rot = BASE_DECAY_TICKS + 1;

        let mut buffer = Vec::new();
        save_decay(&mut buffer, &unit, past_rot, &reg, &cfg).expect("save failed");
        let loaded =
            load_decay(&buffer[..], Some(meat()), past_rot, &reg, &cfg).expect("load failed");

        assert_eq!(loaded.creation, Timestamp::Rotten);
        assert_eq!(
            unit.creation,
            Timestamp::At(0),
            "saving must not mutate the original"
        );
    }

    #[test]
    fn test_unknown_trait_keys_are_dropped() {
        let (reg, cfg) = (registry(), DecayConfig::default());
        let mut unit = FoodDecay::new(meat(), Timestamp::At(6_000));
        unit.apply_trait("brined", 10_000, &reg, &cfg);

        let mut buffer = Vec::new();
        save_decay(&mut buffer, &unit, 10_000, &reg, &cfg).expect("save failed");

        // Load against a registry that no longer knows "brined".
        let smaller = TraitRegistry::new().with(FoodTrait::new("smoked", 0.25));
        let loaded =
            load_decay(&buffer[..], Some(meat()), 10_000, &smaller, &cfg).expect("load failed");
        assert!(!loaded.has_trait("brined"), "unknown keys are dropped");
        assert!(loaded.traits().is_empty());
    }

    #[test]
    fn test_unknown_creation_resets_on_load() {
        let (reg, cfg) = (registry(), DecayConfig::default());
        let unit = FoodDecay::new(meat(), Timestamp::Unknown);
        // Save at a time the normalization will stamp.
        let mut buffer = Vec::new();
        save_decay(&mut buffer, &unit, 10_500, &reg, &cfg).expect("save failed");
        let loaded =
            load_decay(&buffer[..], Some(meat()), 10_500, &reg, &cfg).expect("load failed");
        assert!(
            loaded.creation.is_known(),
            "unknown creation must reset to a real time"
        );
    }

    #[test]
    fn test_dynamic_profile_travels_with_unit() {
        let (reg, cfg) = (registry(), DecayConfig::default());
        let stew = FoodProfile::new(8, 2.0, 3.0, [0.2, 0.0, 0.4, 0.6, 0.1], 2.5);
        let unit = FoodDecay::new_dynamic(stew.clone(), Timestamp::At(6_000));

        let mut buffer = Vec::new();
        save_decay(&mut buffer, &unit, 7_000, &reg, &cfg).expect("save failed");
        // No static profile supplied: the save must carry it.
        let loaded = load_decay(&buffer[..], None, 7_000, &reg, &cfg).expect("load failed");
        assert_eq!(loaded.profile, stew);
        assert!(loaded.dynamic);
    }

    #[test]
    fn test_static_unit_without_profile_errors() {
        let (reg, cfg) = (registry(), DecayConfig::default());
        let unit = FoodDecay::new(meat(), Timestamp::At(6_000));
        let mut buffer = Vec::new();
        save_decay(&mut buffer, &unit, 7_000, &reg, &cfg).expect("save failed");
        let result = load_decay(&buffer[..], None, 7_000, &reg, &cfg);
        assert!(matches!(result, Err(SaveError::MissingProfile)));
    }

    #[test]
    fn test_nutrition_roundtrip() {
        let cfg = DecayConfig::default();
        let mut window = NutritionWindow::new(&cfg);
        let apple = FoodProfile::new(4, 1.0, 0.5, [0.0, 1.0, 0.0, 0.0, 0.0], 1.5);
        let cheese = FoodProfile::new(5, 0.0, 2.0, [0.0, 0.0, 0.0, 0.2, 0.8], 2.0);
        window.consume(&apple, 18, &cfg);
        window.consume(&cheese, 20, &cfg);

        let mut buffer = Vec::new();
        save_nutrition(&mut buffer, &window).expect("save failed");
        let loaded = load_nutrition(&buffer[..], &cfg).expect("load failed");

        assert_eq!(loaded.record_count(), window.record_count());
        assert_eq!(loaded.hunger(), window.hunger());
        for channel in Nutrient::ALL {
            assert!(
                (loaded.nutrient(channel) - window.nutrient(channel)).abs() < 1e-6,
                "channel {:?} drifted across a round trip",
                channel
            );
        }
    }
}
