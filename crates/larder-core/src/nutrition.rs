//! Rolling nutrient average over recent consumption.
//!
//! A window holds the newest-first list of consumption records for one
//! consumer. Every mutation recomputes the five-channel average from scratch
//! in a single pass: the unsatisfied portion of the consumer's hunger is a
//! zero-nutrient gap at the front, records are weighted by their hunger
//! value, and anything past the window boundary is dropped permanently.
//! There is no incremental caching — truncation is a side effect that must
//! stay consistent with the hunger value used in the same pass.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::DecayConfig;
use crate::nutrient::{FoodProfile, Nutrient};

/// Minimum weight of a record in the average, regardless of its hunger
/// value. Deliberate tuning: low-hunger snacks still rotate the window.
const MIN_RECORD_WEIGHT: u32 = 4;

/// Snapshot of a single consumption event. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionRecord {
    pub hunger: u32,
    pub nutrients: [f32; Nutrient::COUNT],
}

impl ConsumptionRecord {
    pub fn of(profile: &FoodProfile) -> Self {
        Self {
            hunger: profile.hunger,
            nutrients: profile.nutrients,
        }
    }
}

/// Bounded consumption history and the rolling average derived from it.
///
/// Owned by a single consumer. All reads are precomputed; all writes go
/// through [`consume`](Self::consume), [`set_hunger`](Self::set_hunger), or
/// [`reset`](Self::reset), each of which recomputes atomically.
#[derive(Debug, Clone, PartialEq)]
pub struct NutritionWindow {
    /// Newest first.
    records: VecDeque<ConsumptionRecord>,
    /// Current satisfied hunger of the owning consumer.
    hunger: u32,
    nutrients: [f32; Nutrient::COUNT],
    average: f32,
}

impl NutritionWindow {
    /// An empty window for a consumer at full hunger.
    pub fn new(config: &DecayConfig) -> Self {
        let mut window = Self {
            records: VecDeque::new(),
            hunger: config.max_hunger,
            nutrients: [0.0; Nutrient::COUNT],
            average: 0.0,
        };
        window.recompute(config);
        window
    }

    /// Rebuild a window from persisted records (newest first).
    pub fn from_records(
        records: Vec<ConsumptionRecord>,
        hunger: u32,
        config: &DecayConfig,
    ) -> Self {
        let mut window = Self {
            records: records.into(),
            hunger: hunger.min(config.max_hunger),
            nutrients: [0.0; Nutrient::COUNT],
            average: 0.0,
        };
        window.recompute(config);
        window
    }

    /// Record a consumption event at the given current hunger level.
    pub fn consume(&mut self, profile: &FoodProfile, current_hunger: u32, config: &DecayConfig) {
        self.hunger = current_hunger.min(config.max_hunger);
        self.records.push_front(ConsumptionRecord::of(profile));
        self.recompute(config);
    }

    /// Update the consumer's hunger. Prolonged hunger widens the
    /// zero-nutrient gap and decays the average without any eating.
    pub fn set_hunger(&mut self, hunger: u32, config: &DecayConfig) {
        self.hunger = hunger.min(config.max_hunger);
        self.recompute(config);
    }

    /// Drop all records and return to the all-default profile.
    pub fn reset(&mut self, config: &DecayConfig) {
        self.records.clear();
        self.recompute(config);
    }

    /// Mean of the five channels, in [0, 1].
    pub fn average(&self) -> f32 {
        self.average
    }

    /// One channel's current value, in [0, 1].
    pub fn nutrient(&self, channel: Nutrient) -> f32 {
        self.nutrients[channel.index()]
    }

    pub fn hunger(&self) -> u32 {
        self.hunger
    }

    /// Retained records, newest first.
    pub fn records(&self) -> impl Iterator<Item = &ConsumptionRecord> {
        self.records.iter()
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// One atomic pass: weigh records newest-to-oldest against the window,
    /// truncate whatever falls outside, fill the uncovered remainder with
    /// the default values, cap, and average.
    fn recompute(&mut self, config: &DecayConfig) {
        let window = if config.hunger_window == 0 {
            log::warn!("hunger_window of 0 clamped to 1");
            1
        } else {
            config.hunger_window
        };

        self.nutrients = [0.0; Nutrient::COUNT];

        // The hunger deficit is a zero-nutrient gap in front of the records.
        let mut running_total = config.max_hunger.saturating_sub(self.hunger);

        let mut keep = self.records.len();
        for (i, record) in self.records.iter().enumerate() {
            let next_total = running_total + record.hunger;
            if next_total <= window {
                let weight = record.hunger.max(MIN_RECORD_WEIGHT) as f32;
                for (total, value) in self.nutrients.iter_mut().zip(&record.nutrients) {
                    *total += value * weight;
                }
                running_total = next_total;
            } else {
                // Partial fit: weigh by the remaining capacity (not
                // re-floored), then drop every older record for good.
                let overshoot = window.saturating_sub(running_total) as f32;
                for (total, value) in self.nutrients.iter_mut().zip(&record.nutrients) {
                    *total += value * overshoot;
                }
                running_total = window;
                keep = i + 1;
                break;
            }
        }
        self.records.truncate(keep);

        let window_f = window as f32;
        for total in &mut self.nutrients {
            *total /= window_f;
        }

        // Whatever the records (and the gap) did not cover is filled from
        // the configured defaults.
        if running_total < window {
            let fill = (window - running_total) as f32 / window_f;
            for channel in Nutrient::ALL {
                let default = if channel == Nutrient::Dairy {
                    config.default_dairy_nutrition
                } else {
                    config.default_nutrition
                };
                self.nutrients[channel.index()] += fill * default;
            }
        }

        let mut sum = 0.0;
        for total in &mut self.nutrients {
            *total = total.min(1.0);
            sum += *total;
        }
        self.average = sum / Nutrient::COUNT as f32;
    }
}
