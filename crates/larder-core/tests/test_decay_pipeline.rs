//! Integration tests for the full decay and nutrition pipeline.
//!
//! Exercises: profile → decay unit → trait application over time → stack
//! merging → consumption into the nutrition window → persistence of both.
//!
//! All tests are pure logic — no game host, no rendering.

use larder_core::calendar::{rounded_creation, Timestamp, BASE_DECAY_TICKS, TICKS_IN_DAY};
use larder_core::config::DecayConfig;
use larder_core::decay::FoodDecay;
use larder_core::nutrient::{FoodProfile, Nutrient};
use larder_core::nutrition::NutritionWindow;
use larder_core::persistence::{load_decay, load_nutrition, save_decay, save_nutrition};
use larder_core::traits::{FoodTrait, TraitRegistry};

// ── Helpers ────────────────────────────────────────────────────────────

fn standard_registry() -> TraitRegistry {
    TraitRegistry::new()
        .with(FoodTrait::new("brined", 0.5))
        .with(FoodTrait::new("smoked", 0.25))
        .with(FoodTrait::new("in_cellar", 0.75))
}

fn venison() -> FoodProfile {
    FoodProfile::new(4, 0.5, 1.0, [0.0, 0.0, 0.0, 0.8, 0.0], 2.0)
}

fn barley_bread() -> FoodProfile {
    FoodProfile::new(4, 0.0, 2.0, [1.0, 0.0, 0.0, 0.0, 0.0], 1.0)
}

// ── Decay lifecycle ────────────────────────────────────────────────────

#[test]
fn preserved_meat_outlives_fresh_meat() {
    let registry = standard_registry();
    let config = DecayConfig::default();

    let mut fresh = FoodDecay::created_now(venison(), 0, &config);
    let mut preserved = FoodDecay::created_now(venison(), 0, &config);
    preserved.apply_trait("brined", TICKS_IN_DAY, &registry, &config);
    preserved.apply_trait("smoked", 2 * TICKS_IN_DAY, &registry, &config);

    let fresh_rot = fresh.rotten_date(&registry, &config).tick().unwrap();
    let preserved_rot = preserved.rotten_date(&registry, &config).tick().unwrap();
    assert!(
        preserved_rot > fresh_rot,
        "brined + smoked venison must outlast fresh: {} vs {}",
        preserved_rot,
        fresh_rot
    );

    // At a point where the fresh unit has rotted, the preserved one hasn't.
    let check = fresh_rot + 1;
    assert!(fresh.is_rotten(check, &registry, &config));
    assert!(!preserved.is_rotten(check, &registry, &config));

    // Normalizing collapses the rotted unit and leaves the preserved one.
    fresh.normalize(check, &registry, &config);
    preserved.normalize(check, &registry, &config);
    assert_eq!(fresh.creation, Timestamp::Rotten);
    assert!(preserved.creation.is_known());
}

#[test]
fn clock_jump_across_reload_is_ordinary_time() {
    let registry = standard_registry();
    let config = DecayConfig::default();
    let unit = FoodDecay::created_now(venison(), 0, &config);

    // A huge forward jump (a long-idle save) is just elapsed time.
    let far_future = 400 * TICKS_IN_DAY;
    assert!(unit.is_rotten(far_future, &registry, &config));

    let rot = unit.rotten_date(&registry, &config);
    assert!(
        matches!(rot, Timestamp::At(t) if t < far_future),
        "the rotten date itself does not move with the clock"
    );
}

#[test]
fn stack_merge_preserves_trait_order_on_survivor() {
    let registry = standard_registry();
    let config = DecayConfig::default();

    let mut a = FoodDecay::created_now(venison(), 0, &config);
    a.apply_trait("brined", 1_000, &registry, &config);
    a.apply_trait("in_cellar", 2_000, &registry, &config);
    let mut b = FoodDecay::created_now(venison(), 50_000, &config);
    b.apply_trait("in_cellar", 51_000, &registry, &config);
    b.apply_trait("brined", 52_000, &registry, &config);

    let survivor_creation = Timestamp::earlier_of(a.creation, b.creation);
    let moved = a.merge_from(&mut b, 60_000, &config);
    assert_eq!(moved, 1);
    assert_eq!(a.creation, survivor_creation);
    assert_eq!(
        a.traits(),
        &["brined".to_string(), "in_cellar".to_string()],
        "survivor keeps its own application order"
    );
}

// ── Consumption into the window ────────────────────────────────────────

#[test]
fn varied_diet_beats_monotonous_diet() {
    let config = DecayConfig::default();

    let mut varied = NutritionWindow::new(&config);
    let mut monotonous = NutritionWindow::new(&config);

    let foods = [
        barley_bread(),
        FoodProfile::new(4, 1.0, 0.5, [0.0, 1.5, 0.0, 0.0, 0.0], 1.5),
        FoodProfile::new(4, 0.5, 0.5, [0.0, 0.0, 1.5, 0.0, 0.0], 1.5),
        venison(),
        FoodProfile::new(4, 0.0, 2.0, [0.0, 0.0, 0.0, 0.0, 1.5], 2.0),
    ];
    for _ in 0..4 {
        for food in &foods {
            varied.consume(food, config.max_hunger, &config);
        }
        for _ in 0..5 {
            monotonous.consume(&barley_bread(), config.max_hunger, &config);
        }
    }

    assert!(
        varied.average() > monotonous.average(),
        "five food groups must average higher than bread alone: {} vs {}",
        varied.average(),
        monotonous.average()
    );
    assert_eq!(monotonous.nutrient(Nutrient::Fruit), 0.0);
}

#[test]
fn starvation_decays_the_average_without_eating() {
    let mut config = DecayConfig::default();
    config.default_nutrition = 0.0;
    config.default_dairy_nutrition = 0.0;

    let mut window = NutritionWindow::new(&config);
    for _ in 0..20 {
        window.consume(&barley_bread(), config.max_hunger, &config);
    }
    let fed = window.average();

    // Hunger dropping with no food pushes a widening gap into the window.
    window.set_hunger(10, &config);
    let hungry = window.average();
    window.set_hunger(0, &config);
    let starving = window.average();

    assert!(fed > hungry, "average must fall as hunger grows");
    assert!(hungry > starving);
}

// ── Persistence across a simulated reload ──────────────────────────────

#[test]
fn full_state_survives_reload() {
    let registry = standard_registry();
    let config = DecayConfig::default();
    let now = 3 * TICKS_IN_DAY;

    let mut unit = FoodDecay::created_now(venison(), TICKS_IN_DAY, &config);
    unit.apply_trait("brined", 2 * TICKS_IN_DAY, &registry, &config);

    let mut window = NutritionWindow::new(&config);
    window.consume(&venison(), 16, &config);
    window.consume(&barley_bread(), 19, &config);

    let mut unit_buf = Vec::new();
    save_decay(&mut unit_buf, &unit, now, &registry, &config).expect("unit save failed");
    let mut window_buf = Vec::new();
    save_nutrition(&mut window_buf, &window).expect("window save failed");

    let loaded_unit = load_decay(&unit_buf[..], Some(venison()), now, &registry, &config)
        .expect("unit load failed");
    let loaded_window = load_nutrition(&window_buf[..], &config).expect("window load failed");

    assert_eq!(
        loaded_unit.rotten_date(&registry, &config),
        unit.rotten_date(&registry, &config)
    );
    assert_eq!(loaded_unit.traits(), unit.traits());
    assert!((loaded_window.average() - window.average()).abs() < 1e-6);
}

// ── Property sweep: trait recompute cannot rot fresh food ──────────────

#[test]
fn trait_recompute_preserves_freshness_under_random_sampling() {
    use rand::{Rng, SeedableRng};
    let config = DecayConfig::default();
    let mut rng = rand::rngs::StdRng::seed_from_u64(0xfeed);

    for _ in 0..2_000 {
        let decay_rate = rng.gen_range(0.25..4.0f32);
        let trait_modifier = rng.gen_range(0.05..10.0f32);
        let registry = TraitRegistry::new().with(FoodTrait::new("x", trait_modifier));

        let profile = FoodProfile::new(4, 0.0, 0.0, [0.0; 5], decay_rate);
        let creation = rng.gen_range(0..100 * TICKS_IN_DAY);
        let mut unit = FoodDecay::new(profile, Timestamp::At(creation));

        let rot = unit.rotten_date(&registry, &config).tick().unwrap();
        let now = rng.gen_range(creation..rot - 100);

        unit.apply_trait("x", now, &registry, &config);
        assert!(
            !unit.is_rotten(now, &registry, &config),
            "freshness violated: creation={} now={} rate={} modifier={}",
            creation,
            now,
            decay_rate,
            trait_modifier
        );

        // And removing it again still cannot rot the unit at the same instant.
        unit.remove_trait("x", now, &registry, &config);
        assert!(!unit.is_rotten(now, &registry, &config));
    }
}

// ── Rounding behavior ──────────────────────────────────────────────────

#[test]
fn units_created_in_the_same_window_stack() {
    let config = DecayConfig::default();
    let mut a = FoodDecay::created_now(venison(), 100, &config);
    let mut b = FoodDecay::created_now(venison(), 4_000, &config);
    assert_eq!(a.creation, b.creation, "same stacking window, same date");
    assert_eq!(
        a.creation,
        Timestamp::At(rounded_creation(100, config.stack_window_hours))
    );
    assert!(a.merge_from(&mut b, 5_000, &config) > 0);
}

#[test]
fn base_decay_spans_twenty_two_days() {
    // A decay rate of exactly 1 rots in the full base window.
    let config = DecayConfig::default();
    let registry = TraitRegistry::new();
    let profile = FoodProfile::new(4, 0.0, 0.0, [0.0; 5], 1.0);
    let unit = FoodDecay::new(profile, Timestamp::At(0));
    assert_eq!(
        unit.rotten_date(&registry, &config),
        Timestamp::At(BASE_DECAY_TICKS)
    );
    assert_eq!(BASE_DECAY_TICKS, 22 * TICKS_IN_DAY);
}
