//! Authored announcement catalog and the fixed case deck built from it.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hasher;
use std::sync::OnceLock;
use thiserror::Error;
use twox_hash::XxHash64;

use crate::announcement::{Announcement, AnnouncementType, HodlEffect, TokenScenario};
use crate::constants::{MIXED_EASY_CASES, MIXED_HARD_CASES, MIXED_MEDIUM_CASES};
use crate::outcome::OutcomeTable;

const BUNDLED_CATALOG_DATA: &str = include_str!("../assets/data/announcements.json");

/// Difficulty tier of an authored case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Easy => "EASY",
            Self::Medium => "MEDIUM",
            Self::Hard => "HARD",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog entry as authored in the data files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAnnouncement {
    pub case_id: String,
    pub case_title: String,
    pub case_difficulty: Difficulty,
    pub case_type: String,
    pub announcement_index: u32,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: AnnouncementType,
    pub tone: String,
    #[serde(default)]
    pub is_rugged: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learn: Option<Vec<String>>,
}

impl RawAnnouncement {
    /// Frozen HODL effect for this entry: flagged rugs always rug, everything
    /// else goes through the outcome table.
    pub(crate) fn roll_effect<R: Rng + ?Sized>(
        &self,
        table: &OutcomeTable,
        rng: &mut R,
    ) -> HodlEffect {
        if self.is_rugged {
            HodlEffect::rugged()
        } else {
            table.resolve(self.kind, rng)
        }
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("entry #{position} has an empty case id")]
    MissingCaseId { position: usize },
    #[error("case {case_id} announcement {index} has no text")]
    EmptyText { case_id: String, index: u32 },
    #[error("case {case_id} repeats announcement index {index}")]
    DuplicateIndex { case_id: String, index: u32 },
    #[error("case {case_id} mixes difficulties {first} and {second}")]
    MixedDifficulty {
        case_id: String,
        first: Difficulty,
        second: Difficulty,
    },
}

/// Validated collection of authored announcements.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnnouncementCatalog {
    entries: Vec<RawAnnouncement>,
}

impl AnnouncementCatalog {
    /// Parse and validate a catalog from a JSON array of entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or violates catalog rules.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let entries: Vec<RawAnnouncement> = serde_json::from_str(json)?;
        Self::from_entries(entries)
    }

    /// Validate pre-parsed entries.
    ///
    /// # Errors
    ///
    /// Returns an error on empty ids/text, duplicate indices within a case, or
    /// a case whose entries disagree on difficulty.
    pub fn from_entries(entries: Vec<RawAnnouncement>) -> Result<Self, CatalogError> {
        let mut seen: HashSet<(&str, u32)> = HashSet::new();
        let mut difficulty: HashMap<&str, Difficulty> = HashMap::new();
        for (position, entry) in entries.iter().enumerate() {
            if entry.case_id.trim().is_empty() {
                return Err(CatalogError::MissingCaseId { position });
            }
            if entry.text.trim().is_empty() {
                return Err(CatalogError::EmptyText {
                    case_id: entry.case_id.clone(),
                    index: entry.announcement_index,
                });
            }
            if !seen.insert((entry.case_id.as_str(), entry.announcement_index)) {
                return Err(CatalogError::DuplicateIndex {
                    case_id: entry.case_id.clone(),
                    index: entry.announcement_index,
                });
            }
            let first = *difficulty
                .entry(entry.case_id.as_str())
                .or_insert(entry.case_difficulty);
            if first != entry.case_difficulty {
                return Err(CatalogError::MixedDifficulty {
                    case_id: entry.case_id.clone(),
                    first,
                    second: entry.case_difficulty,
                });
            }
        }
        Ok(Self { entries })
    }

    /// Catalog shipped with the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled data fails validation.
    pub fn load_bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_CATALOG_DATA)
    }

    /// Shared instance of the bundled catalog; empty if it fails to load.
    #[must_use]
    pub fn bundled() -> &'static Self {
        static CATALOG: OnceLock<AnnouncementCatalog> = OnceLock::new();
        CATALOG.get_or_init(|| {
            Self::load_bundled().unwrap_or_else(|err| {
                log::error!("bundled announcement catalog rejected: {err}");
                Self::default()
            })
        })
    }

    #[must_use]
    pub fn entries(&self) -> &[RawAnnouncement] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries of one category, in catalog order.
    #[must_use]
    pub fn pool(&self, kind: AnnouncementType) -> Vec<&RawAnnouncement> {
        self.entries.iter().filter(|raw| raw.kind == kind).collect()
    }

    /// Stable content hash; replay tooling uses it to detect catalog drift.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = XxHash64::with_seed(0);
        for entry in &self.entries {
            // Serializing a derived struct of strings and numbers cannot fail.
            if let Ok(bytes) = serde_json::to_vec(entry) {
                hasher.write(&bytes);
            }
            hasher.write_u8(b'\n');
        }
        hasher.finish()
    }

    /// Build one token per authored case with frozen HODL effects.
    pub fn case_scenarios<R: Rng + ?Sized>(
        &self,
        table: &OutcomeTable,
        rng: &mut R,
    ) -> Vec<CaseScenario> {
        let mut order: Vec<&str> = Vec::new();
        let mut grouped: HashMap<&str, Vec<&RawAnnouncement>> = HashMap::new();
        for entry in &self.entries {
            let bucket = grouped.entry(entry.case_id.as_str()).or_insert_with(|| {
                order.push(entry.case_id.as_str());
                Vec::new()
            });
            bucket.push(entry);
        }

        let mut scenarios = Vec::with_capacity(order.len());
        for (position, case_id) in order.into_iter().enumerate() {
            let Some(mut case) = grouped.remove(case_id) else {
                continue;
            };
            case.sort_by_key(|raw| raw.announcement_index);
            let Some(head) = case.first().copied() else {
                continue;
            };
            let announcements = case
                .iter()
                .enumerate()
                .map(|(index, raw)| Announcement {
                    id: format!("{case_id}_{index}"),
                    text: raw.text.clone(),
                    kind: raw.kind,
                    tone: raw.tone.clone(),
                    hodl: if raw.is_rugged {
                        HodlEffect::rugged()
                    } else {
                        HodlEffect::gain(table.catalog_gain(raw.kind, rng))
                    },
                    learn: raw.learn.clone(),
                })
                .collect();
            scenarios.push(CaseScenario {
                difficulty: head.case_difficulty,
                scenario: TokenScenario {
                    id: case_id.to_string(),
                    name: format!("TOKEN #{} / {}", position + 1, head.case_title),
                    description: format!("{} - {}", head.case_type, head.case_difficulty),
                    announcements,
                },
            });
        }
        scenarios
    }
}

/// A catalog case together with its difficulty tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseScenario {
    pub difficulty: Difficulty,
    pub scenario: TokenScenario,
}

/// Cases of one difficulty, in catalog order.
#[must_use]
pub fn scenarios_by_difficulty(cases: &[CaseScenario], difficulty: Difficulty) -> Vec<TokenScenario> {
    cases
        .iter()
        .filter(|case| case.difficulty == difficulty)
        .map(|case| case.scenario.clone())
        .collect()
}

/// Default deck: the first two easy, two medium and one hard case. Falls back
/// to every case when no tier has any.
#[must_use]
pub fn mixed_scenarios(cases: &[CaseScenario]) -> Vec<TokenScenario> {
    let mut mixed: Vec<TokenScenario> = Vec::new();
    for (difficulty, take) in [
        (Difficulty::Easy, MIXED_EASY_CASES),
        (Difficulty::Medium, MIXED_MEDIUM_CASES),
        (Difficulty::Hard, MIXED_HARD_CASES),
    ] {
        mixed.extend(
            scenarios_by_difficulty(cases, difficulty)
                .into_iter()
                .take(take),
        );
    }
    if mixed.is_empty() {
        return cases.iter().map(|case| case.scenario.clone()).collect();
    }
    mixed
}
