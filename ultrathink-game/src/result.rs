//! End-of-game labels and the summary handed to the results view.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{DEFAULT_RESULT_TOTAL, INITIAL_FUNDS};
use crate::numbers::{group_thousands, signed_dollars};
use crate::state::GameState;

const SHARE_TAGLINE: &str = "A deterministic simulator where you pick the exit, not the information.";

/// End-screen title, chosen purely from survival counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Title {
    UltraDisciplined,
    BelievedTheFirstTone,
    FedByHype,
    AlmostSafe,
    SometimesGreedy,
}

impl Title {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UltraDisciplined => "ULTRA DISCIPLINED",
            Self::BelievedTheFirstTone => "BELIEVED THE FIRST TONE",
            Self::FedByHype => "FED BY HYPE",
            Self::AlmostSafe => "ALMOST SAFE",
            Self::SometimesGreedy => "SOMETIMES GREEDY",
        }
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rules are checked in order; the first match wins.
#[must_use]
pub const fn title(survived: usize, total: usize) -> Title {
    if survived == total {
        Title::UltraDisciplined
    } else if survived == 0 {
        Title::BelievedTheFirstTone
    } else if survived <= 1 {
        Title::FedByHype
    } else if survived >= total.saturating_sub(1) {
        Title::AlmostSafe
    } else {
        Title::SometimesGreedy
    }
}

/// Title text for the given counts.
#[must_use]
pub const fn get_title(survived: usize, total: usize) -> &'static str {
    title(survived, total).as_str()
}

/// One-line verdict for the end screen.
#[must_use]
pub fn score_message(survived: usize, total: usize, chart_value: i64) -> String {
    if survived == total {
        return "You trusted nothing but the timing of your exits, and it carried you through."
            .to_string();
    }
    if survived == 0 {
        return "You chased the very first announcement. Actions decide outcomes, not information."
            .to_string();
    }
    let profit = chart_value - INITIAL_FUNDS;
    format!(
        "{survived}/{total} tokens survived. P&L {}. The longer you wait to take profit, the worse the odds.",
        signed_dollars(profit)
    )
}

/// Three integers handed from the play screen to the results screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub survived: usize,
    pub total: usize,
    #[serde(rename = "value")]
    pub chart_value: i64,
}

impl Default for ResultSummary {
    fn default() -> Self {
        Self {
            survived: 0,
            total: DEFAULT_RESULT_TOTAL as usize,
            chart_value: INITIAL_FUNDS,
        }
    }
}

impl ResultSummary {
    #[must_use]
    pub const fn from_state(state: &GameState) -> Self {
        Self {
            survived: state.survived_tokens,
            total: state.total_tokens,
            chart_value: state.chart_value,
        }
    }

    /// `survived=S&total=T&value=V`
    #[must_use]
    pub fn to_query(&self) -> String {
        format!(
            "survived={}&total={}&value={}",
            self.survived, self.total, self.chart_value
        )
    }

    /// Parse a query string. Missing or unparsable fields fall back to the
    /// defaults instead of failing, and unknown keys are ignored.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let mut summary = Self::default();
        for pair in query.trim_start_matches('?').split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "survived" => {
                    if let Ok(parsed) = value.parse() {
                        summary.survived = parsed;
                    }
                }
                "total" => {
                    if let Ok(parsed) = value.parse() {
                        summary.total = parsed;
                    }
                }
                "value" => {
                    if let Ok(parsed) = value.parse() {
                        summary.chart_value = parsed;
                    }
                }
                _ => {}
            }
        }
        summary
    }

    #[must_use]
    pub const fn profit(&self) -> i64 {
        self.chart_value - INITIAL_FUNDS
    }

    #[must_use]
    pub fn profit_label(&self) -> String {
        signed_dollars(self.profit())
    }

    #[must_use]
    pub const fn is_perfect(&self) -> bool {
        self.survived == self.total
    }

    #[must_use]
    pub const fn title(&self) -> Title {
        title(self.survived, self.total)
    }

    #[must_use]
    pub fn message(&self) -> String {
        score_message(self.survived, self.total, self.chart_value)
    }

    /// Text for the share button.
    #[must_use]
    pub fn share_text(&self) -> String {
        let sign = if self.chart_value < 0 { "-" } else { "" };
        format!(
            "ULTRATHINK: {} ({}/{}) / {sign}${} ({})\n{SHARE_TAGLINE}",
            self.title(),
            self.survived,
            self.total,
            group_thousands(self.chart_value),
            self.profit_label()
        )
    }
}
