//! Announcement data model shared by the generator and the engine.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::RUGGED_GAIN;

const DEFAULT_LEARN_NOTE: &str = "This announcement offered no concrete evidence, and the same \
     wording has preceded vanished liquidity before.";

/// Risk category of an announcement. Decides both the HODL success rate and
/// the size of the reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnnouncementType {
    Safe,
    Bait,
    LowRiskReward,
    MiddleRiskReward,
    HighRiskReward,
}

impl AnnouncementType {
    /// Every category in sampling order.
    pub const ALL: [Self; 5] = [
        Self::Safe,
        Self::Bait,
        Self::LowRiskReward,
        Self::MiddleRiskReward,
        Self::HighRiskReward,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "SAFE",
            Self::Bait => "BAIT",
            Self::LowRiskReward => "LOW_RISK_REWARD",
            Self::MiddleRiskReward => "MIDDLE_RISK_REWARD",
            Self::HighRiskReward => "HIGH_RISK_REWARD",
        }
    }

    /// Human readable badge text.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Safe => "SAFE",
            Self::Bait => "BAIT",
            Self::LowRiskReward => "LOW RISK / LOW REWARD",
            Self::MiddleRiskReward => "MIDDLE RISK / MIDDLE REWARD",
            Self::HighRiskReward => "HIGH RISK / HIGH REWARD",
        }
    }
}

impl fmt::Display for AnnouncementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnnouncementType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or(())
    }
}

/// Result of holding through an announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HodlOutcome {
    Gain,
    Rugged,
}

/// Pre-resolved consequence of choosing HODL. Frozen once attached to an
/// announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HodlEffect {
    pub outcome: HodlOutcome,
    pub gain: i64,
}

impl HodlEffect {
    #[must_use]
    pub const fn gain(gain: i64) -> Self {
        Self {
            outcome: HodlOutcome::Gain,
            gain,
        }
    }

    #[must_use]
    pub const fn rugged() -> Self {
        Self {
            outcome: HodlOutcome::Rugged,
            gain: RUGGED_GAIN,
        }
    }

    #[must_use]
    pub const fn is_rugged(&self) -> bool {
        matches!(self.outcome, HodlOutcome::Rugged)
    }
}

/// A single narrative beat the player reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: AnnouncementType,
    pub tone: String,
    pub hodl: HodlEffect,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learn: Option<Vec<String>>,
}

impl Announcement {
    /// Lessons shown after a rug; falls back to a generic note when the
    /// announcement carries none.
    #[must_use]
    pub fn learn_notes(&self) -> Vec<&str> {
        match self.learn.as_deref() {
            Some(notes) if !notes.is_empty() => notes.iter().map(String::as_str).collect(),
            _ => vec![DEFAULT_LEARN_NOTE],
        }
    }
}

/// One token in a playthrough: an ordered run of announcements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenScenario {
    pub id: String,
    pub name: String,
    pub description: String,
    pub announcements: Vec<Announcement>,
}

impl TokenScenario {
    #[must_use]
    pub fn len(&self) -> usize {
        self.announcements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.announcements.is_empty()
    }
}
