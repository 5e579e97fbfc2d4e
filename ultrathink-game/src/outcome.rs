//! HODL outcome resolution.
//!
//! Turns an announcement's risk category into a frozen [`HodlEffect`] with a
//! weighted roll. Callers resolve once when an announcement is instantiated
//! and keep the result; nothing in the engine rolls again during play.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::announcement::{AnnouncementType, HodlEffect};
use crate::constants::CATALOG_GAIN_STEP;

/// One value per announcement category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct KindTable<T> {
    pub safe: T,
    pub bait: T,
    pub low_risk_reward: T,
    pub middle_risk_reward: T,
    pub high_risk_reward: T,
}

impl<T> KindTable<T> {
    #[must_use]
    pub const fn get(&self, kind: AnnouncementType) -> &T {
        match kind {
            AnnouncementType::Safe => &self.safe,
            AnnouncementType::Bait => &self.bait,
            AnnouncementType::LowRiskReward => &self.low_risk_reward,
            AnnouncementType::MiddleRiskReward => &self.middle_risk_reward,
            AnnouncementType::HighRiskReward => &self.high_risk_reward,
        }
    }
}

/// Inclusive integer reward range, optionally snapped to a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GainRange {
    pub min: i64,
    pub max: i64,
    #[serde(default = "default_step")]
    pub step: i64,
}

const fn default_step() -> i64 {
    1
}

impl GainRange {
    #[must_use]
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max, step: 1 }
    }

    #[must_use]
    pub const fn stepped(min: i64, max: i64, step: i64) -> Self {
        Self { min, max, step }
    }

    #[must_use]
    pub const fn contains(&self, gain: i64) -> bool {
        gain >= self.min && gain <= self.max
    }

    /// Draw a reward. A `0..=0` range yields 0 without touching the RNG.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        if self.min == 0 && self.max == 0 {
            return 0;
        }
        let lo = self.min.min(self.max);
        let hi = self.min.max(self.max);
        if self.step <= 1 {
            return rng.gen_range(lo..=hi);
        }
        let min_step = div_ceil(lo, self.step);
        let max_step = hi.div_euclid(self.step);
        if min_step > max_step {
            return lo;
        }
        rng.gen_range(min_step..=max_step) * self.step
    }
}

fn div_ceil(value: i64, step: i64) -> i64 {
    let floor = value.div_euclid(step);
    if value.rem_euclid(step) == 0 {
        floor
    } else {
        floor + 1
    }
}

/// Probability that HODL succeeds, per category.
pub const SUCCESS_RATES: KindTable<f64> = KindTable {
    safe: 1.0,
    bait: 0.0,
    low_risk_reward: 0.9,
    middle_risk_reward: 0.7,
    high_risk_reward: 0.5,
};

/// Reward ranges used when announcements are generated per token slot.
pub const GAIN_RANGES: KindTable<GainRange> = KindTable {
    safe: GainRange::new(1_000, 2_000),
    bait: GainRange::new(0, 0),
    low_risk_reward: GainRange::new(2_000, 5_000),
    middle_risk_reward: GainRange::new(10_000, 20_000),
    high_risk_reward: GainRange::new(20_000, 30_000),
};

/// Reward ranges used by the authored case catalog, snapped to hundreds.
pub const CATALOG_GAIN_RANGES: KindTable<GainRange> = KindTable {
    safe: GainRange::stepped(300, 1_200, CATALOG_GAIN_STEP),
    bait: GainRange::stepped(0, 0, CATALOG_GAIN_STEP),
    low_risk_reward: GainRange::stepped(1_500, 3_000, CATALOG_GAIN_STEP),
    middle_risk_reward: GainRange::stepped(5_000, 10_000, CATALOG_GAIN_STEP),
    high_risk_reward: GainRange::stepped(10_000, 20_000, CATALOG_GAIN_STEP),
};

/// Success rates plus reward ranges. Loadable as JSON config for tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeTable {
    pub success_rates: KindTable<f64>,
    pub gain_ranges: KindTable<GainRange>,
    #[serde(default = "default_catalog_ranges")]
    pub catalog_gain_ranges: KindTable<GainRange>,
}

const fn default_catalog_ranges() -> KindTable<GainRange> {
    CATALOG_GAIN_RANGES
}

impl Default for OutcomeTable {
    fn default() -> Self {
        Self {
            success_rates: SUCCESS_RATES,
            gain_ranges: GAIN_RANGES,
            catalog_gain_ranges: CATALOG_GAIN_RANGES,
        }
    }
}

impl OutcomeTable {
    /// Parse a table from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a complete table.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn success_rate(&self, kind: AnnouncementType) -> f64 {
        self.success_rates.get(kind).clamp(0.0, 1.0)
    }

    /// Roll a fresh HODL effect for `kind`.
    pub fn resolve<R: Rng + ?Sized>(&self, kind: AnnouncementType, rng: &mut R) -> HodlEffect {
        let roll: f64 = rng.r#gen();
        self.resolve_with_roll(kind, roll, rng)
    }

    /// Resolve with an externally supplied success roll in `[0, 1)`. The
    /// RNG is only used for the reward draw on success.
    pub fn resolve_with_roll<R: Rng + ?Sized>(
        &self,
        kind: AnnouncementType,
        roll: f64,
        rng: &mut R,
    ) -> HodlEffect {
        if roll < self.success_rate(kind) {
            HodlEffect::gain(self.gain_ranges.get(kind).draw(rng))
        } else {
            HodlEffect::rugged()
        }
    }

    /// Reward for an authored catalog entry that is not flagged as a rug.
    pub fn catalog_gain<R: Rng + ?Sized>(&self, kind: AnnouncementType, rng: &mut R) -> i64 {
        self.catalog_gain_ranges.get(kind).draw(rng)
    }
}

/// Roll a HODL effect for `kind` with the default table.
pub fn resolve_hodl_outcome<R: Rng + ?Sized>(kind: AnnouncementType, rng: &mut R) -> HodlEffect {
    OutcomeTable::default().resolve(kind, rng)
}
