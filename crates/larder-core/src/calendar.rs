//! Calendar tick conventions and the tagged creation timestamp.
//!
//! Decay state distinguishes real calendar ticks from sentinel states
//! (permanently rotten, never-decaying, unknown). Sentinels are enum variants
//! rather than reserved integer values, so tick arithmetic on a sentinel does
//! not typecheck.

use serde::{Deserialize, Serialize};

/// Ticks per in-game hour.
pub const TICKS_IN_HOUR: i64 = 1_000;

/// Ticks per in-game day.
pub const TICKS_IN_DAY: i64 = 24 * TICKS_IN_HOUR;

/// Baseline ticks-to-rot for a unit decay rate, before any modifiers.
///
/// Most food profiles carry decay rates in [1, 4] (higher = faster), which
/// puts actual spoilage times at 25–100% of this value: meat and fruit spoil
/// in roughly five days, grains last around twenty.
pub const BASE_DECAY_TICKS: i64 = 22 * TICKS_IN_DAY;

/// A point on the game calendar, or a sentinel decay state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timestamp {
    /// A concrete calendar tick.
    At(i64),
    /// Permanently rotten, regardless of the current time.
    Rotten,
    /// Never rots.
    Never,
    /// Creation time was lost or never set. Reset to the current rounded
    /// time the next time the unit is normalized.
    Unknown,
}

impl Timestamp {
    /// Whether this is a concrete tick rather than a sentinel.
    pub fn is_known(self) -> bool {
        matches!(self, Timestamp::At(_))
    }

    /// The concrete tick, if there is one.
    pub fn tick(self) -> Option<i64> {
        match self {
            Timestamp::At(t) => Some(t),
            _ => None,
        }
    }

    /// The more-decayed of two timestamps, under `Rotten < At(t) < Never`.
    ///
    /// Used by stack merging, which always adopts the worse history.
    /// `Unknown` carries no history and loses to any other value; callers
    /// merging persistent state should resolve `Unknown` first.
    pub fn earlier_of(a: Timestamp, b: Timestamp) -> Timestamp {
        match (a, b) {
            (Timestamp::Rotten, _) | (_, Timestamp::Rotten) => Timestamp::Rotten,
            (Timestamp::At(x), Timestamp::At(y)) => Timestamp::At(x.min(y)),
            (Timestamp::At(t), _) | (_, Timestamp::At(t)) => Timestamp::At(t),
            (Timestamp::Never, _) | (_, Timestamp::Never) => Timestamp::Never,
            (Timestamp::Unknown, Timestamp::Unknown) => Timestamp::Unknown,
        }
    }
}

/// Round `tick` up to the next stacking-window boundary.
///
/// Units created within the same window share a creation date and therefore
/// stack. The invariant `rounded_creation(t, w) >= t` always holds.
pub fn rounded_creation(tick: i64, stack_window_hours: u32) -> i64 {
    let window = i64::from(stack_window_hours.max(1)) * TICKS_IN_HOUR;
    ((tick - 1).div_euclid(window) + 1) * window
}
