//! Randomized token decks.
//!
//! Each token slot draws a category mix from a difficulty curve, samples the
//! catalog pools without replacement, shuffles, and freezes every HODL
//! outcome at instantiation time.
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::announcement::{Announcement, AnnouncementType, TokenScenario};
use crate::catalog::{AnnouncementCatalog, Difficulty, RawAnnouncement};
use crate::constants::{
    DIFFICULTY_CEILING, EASY_ORDINAL_MAX, ID_ALPHABET, ID_SUFFIX_LEN, MEDIUM_ORDINAL,
};
use crate::outcome::{KindTable, OutcomeTable};
use crate::rng::RngStreams;

/// How many announcements of each category a token receives.
pub type DifficultyCurve = KindTable<usize>;

impl DifficultyCurve {
    /// Non-zero category counts in sampling order.
    #[must_use]
    pub fn counts(&self) -> SmallVec<[(AnnouncementType, usize); 5]> {
        AnnouncementType::ALL
            .into_iter()
            .map(|kind| (kind, *self.get(kind)))
            .filter(|(_, count)| *count > 0)
            .collect()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        AnnouncementType::ALL
            .into_iter()
            .map(|kind| *self.get(kind))
            .sum()
    }
}

/// SAFE-heavy, no BAIT, no HIGH.
pub const CURVE_OPENING: DifficultyCurve = KindTable {
    safe: 3,
    bait: 0,
    low_risk_reward: 1,
    middle_risk_reward: 1,
    high_risk_reward: 0,
};

/// First token with BAIT and HIGH in the mix.
pub const CURVE_MIDGAME: DifficultyCurve = KindTable {
    safe: 2,
    bait: 1,
    low_risk_reward: 2,
    middle_risk_reward: 1,
    high_risk_reward: 1,
};

/// Every token from the ceiling onwards.
pub const CURVE_ENDGAME: DifficultyCurve = KindTable {
    safe: 2,
    bait: 1,
    low_risk_reward: 2,
    middle_risk_reward: 2,
    high_risk_reward: 1,
};

/// Curves keyed by 1-based token ordinal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveTable {
    /// Curve for ordinal `i + 1`; the last entry covers every later ordinal.
    pub curves: Vec<DifficultyCurve>,
}

impl Default for CurveTable {
    fn default() -> Self {
        Self {
            curves: vec![CURVE_OPENING, CURVE_OPENING, CURVE_MIDGAME, CURVE_ENDGAME],
        }
    }
}

impl CurveTable {
    /// Curve for a 1-based token ordinal. Ordinal 0 uses the first curve and
    /// ordinals past the table collapse onto the last one.
    #[must_use]
    pub fn distribution_for(&self, ordinal: u32) -> DifficultyCurve {
        let ceiling = u32::try_from(self.curves.len())
            .unwrap_or(DIFFICULTY_CEILING)
            .max(1);
        let slot = ordinal.clamp(1, ceiling) - 1;
        usize::try_from(slot)
            .ok()
            .and_then(|idx| self.curves.get(idx))
            .copied()
            .unwrap_or(CURVE_OPENING)
    }
}

/// Difficulty label for a randomized token ordinal.
#[must_use]
pub const fn ordinal_difficulty(ordinal: u32) -> Difficulty {
    if ordinal <= EASY_ORDINAL_MAX {
        Difficulty::Easy
    } else if ordinal == MEDIUM_ORDINAL {
        Difficulty::Medium
    } else {
        Difficulty::Hard
    }
}

fn random_suffix<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..ID_SUFFIX_LEN)
        .map(|_| char::from(ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())]))
        .collect()
}

/// Builds randomized decks from a catalog.
#[derive(Debug, Clone)]
pub struct ScenarioGenerator<'a> {
    catalog: &'a AnnouncementCatalog,
    outcomes: OutcomeTable,
    curves: CurveTable,
}

impl<'a> ScenarioGenerator<'a> {
    #[must_use]
    pub fn new(catalog: &'a AnnouncementCatalog) -> Self {
        Self::with_tables(catalog, OutcomeTable::default(), CurveTable::default())
    }

    #[must_use]
    pub fn with_tables(
        catalog: &'a AnnouncementCatalog,
        outcomes: OutcomeTable,
        curves: CurveTable,
    ) -> Self {
        Self {
            catalog,
            outcomes,
            curves,
        }
    }

    #[must_use]
    pub const fn catalog(&self) -> &'a AnnouncementCatalog {
        self.catalog
    }

    #[must_use]
    pub const fn outcomes(&self) -> &OutcomeTable {
        &self.outcomes
    }

    #[must_use]
    pub const fn curves(&self) -> &CurveTable {
        &self.curves
    }

    fn instantiate(&self, raw: &RawAnnouncement, streams: &mut RngStreams) -> Announcement {
        let id = format!(
            "{}_{}_{}",
            raw.case_id,
            raw.announcement_index,
            random_suffix(streams.selection())
        );
        Announcement {
            id,
            text: raw.text.clone(),
            kind: raw.kind,
            tone: raw.tone.clone(),
            hodl: raw.roll_effect(&self.outcomes, streams.outcome()),
            learn: raw.learn.clone(),
        }
    }

    /// Shuffled announcements for the token at `ordinal` (1-based). A pool
    /// smaller than its curve count contributes every entry it has.
    pub fn build_announcement_sequence(
        &self,
        ordinal: u32,
        streams: &mut RngStreams,
    ) -> Vec<Announcement> {
        let curve = self.curves.distribution_for(ordinal);
        let mut announcements = Vec::with_capacity(curve.total());
        for (kind, count) in curve.counts() {
            let pool = self.catalog.pool(kind);
            if pool.len() < count {
                log::debug!(
                    "pool {kind} holds {} entries, curve for token {ordinal} wants {count}",
                    pool.len()
                );
            }
            let picked: Vec<&RawAnnouncement> = pool
                .choose_multiple(streams.selection(), count)
                .copied()
                .collect();
            for raw in picked {
                announcements.push(self.instantiate(raw, streams));
            }
        }
        announcements.shuffle(streams.selection());
        announcements
    }

    /// Token for a 0-based slot index.
    pub fn generate_random_scenario(&self, index: usize, streams: &mut RngStreams) -> TokenScenario {
        let ordinal = u32::try_from(index).map_or(u32::MAX, |i| i.saturating_add(1));
        let announcements = self.build_announcement_sequence(ordinal, streams);
        let nonce: u32 = streams.selection().r#gen();
        TokenScenario {
            id: format!("token_{ordinal}_{nonce:08x}"),
            name: format!("TOKEN #{ordinal}"),
            description: ordinal_difficulty(ordinal).label().to_string(),
            announcements,
        }
    }

    /// `count` tokens in slot order.
    pub fn generate_random_scenarios(&self, count: usize, streams: &mut RngStreams) -> Vec<TokenScenario> {
        (0..count)
            .map(|index| self.generate_random_scenario(index, streams))
            .collect()
    }
}

/// Announcements for one token slot using the default tables.
pub fn build_announcement_sequence(
    catalog: &AnnouncementCatalog,
    ordinal: u32,
    streams: &mut RngStreams,
) -> Vec<Announcement> {
    ScenarioGenerator::new(catalog).build_announcement_sequence(ordinal, streams)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn curve_lookup_clamps_both_ends() {
        let table = CurveTable::default();
        assert_eq!(table.distribution_for(0), CURVE_OPENING);
        assert_eq!(table.distribution_for(1), CURVE_OPENING);
        assert_eq!(table.distribution_for(2), CURVE_OPENING);
        assert_eq!(table.distribution_for(3), CURVE_MIDGAME);
        assert_eq!(table.distribution_for(4), CURVE_ENDGAME);
        assert_eq!(table.distribution_for(40), CURVE_ENDGAME);
        assert_eq!(CURVE_OPENING.counts().len(), 3);
        assert_eq!(CURVE_ENDGAME.total(), 8);
    }

    #[test]
    fn opening_tokens_have_no_bait() {
        let catalog = AnnouncementCatalog::bundled();
        let mut streams = RngStreams::from_user_seed(5);
        for ordinal in 1..=2 {
            let seq = build_announcement_sequence(catalog, ordinal, &mut streams);
            assert_eq!(seq.len(), CURVE_OPENING.total());
            assert!(seq.iter().all(|a| a.kind != AnnouncementType::Bait));
            assert!(seq.iter().all(|a| a.kind != AnnouncementType::HighRiskReward));
        }
    }

    #[test]
    fn endgame_sequence_matches_curve_and_ids_are_unique() {
        let catalog = AnnouncementCatalog::bundled();
        let mut streams = RngStreams::from_user_seed(77);
        let seq = build_announcement_sequence(catalog, 9, &mut streams);
        for (kind, count) in CURVE_ENDGAME.counts() {
            assert_eq!(seq.iter().filter(|a| a.kind == kind).count(), count, "{kind}");
        }
        let ids: HashSet<&str> = seq.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids.len(), seq.len());
        for ann in seq.iter().filter(|a| a.kind == AnnouncementType::Bait) {
            assert!(ann.hodl.is_rugged());
        }
    }

    #[test]
    fn exhausted_pool_never_invents_entries() {
        let catalog = AnnouncementCatalog::from_json(
            r#"[{"caseId":"c","caseTitle":"t","caseDifficulty":"easy","caseType":"x",
                 "announcementIndex":0,"text":"only safe","type":"SAFE","tone":"calm"}]"#,
        )
        .unwrap();
        let mut streams = RngStreams::from_user_seed(1);
        let seq = build_announcement_sequence(&catalog, 1, &mut streams);
        assert_eq!(seq.len(), 1);
        assert!(seq[0].id.starts_with("c_0_"));
        assert_eq!(seq[0].id.len(), "c_0_".len() + ID_SUFFIX_LEN);
    }

    #[test]
    fn scenarios_are_labelled_by_ordinal() {
        let catalog = AnnouncementCatalog::bundled();
        let generator = ScenarioGenerator::new(catalog);
        let mut streams = RngStreams::from_user_seed(2024);
        let tokens = generator.generate_random_scenarios(5, &mut streams);
        let names: Vec<&str> = tokens.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["TOKEN #1", "TOKEN #2", "TOKEN #3", "TOKEN #4", "TOKEN #5"]);
        let labels: Vec<&str> = tokens.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(labels, vec!["EASY", "EASY", "MEDIUM", "HARD", "HARD"]);
        assert!(tokens[0].id.starts_with("token_1_"));
    }

    #[test]
    fn same_seed_builds_same_deck() {
        let catalog = AnnouncementCatalog::bundled();
        let generator = ScenarioGenerator::new(catalog);
        let a = generator.generate_random_scenarios(4, &mut RngStreams::from_user_seed(9));
        let b = generator.generate_random_scenarios(4, &mut RngStreams::from_user_seed(9));
        assert_eq!(a, b);
    }
}
