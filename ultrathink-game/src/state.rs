use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::announcement::Announcement;

/// Player decision on the current announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActionChoice {
    Hodl,
    Sell,
}

impl ActionChoice {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hodl => "HODL",
            Self::Sell => "SELL",
        }
    }
}

impl fmt::Display for ActionChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionChoice {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HODL" | "HOLD" => Ok(Self::Hodl),
            "SELL" => Ok(Self::Sell),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GameStatus {
    #[default]
    Running,
    Rugged,
    Completed,
}

impl GameStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Running => "RUNNING",
            Self::Rugged => "RUGGED",
            Self::Completed => "COMPLETED",
        }
    }

    /// RUGGED and COMPLETED are absorbing.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label of the most recent transition, for the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OutcomeLabel {
    Gain,
    Loss,
    Profit,
}

/// Snapshot of a playthrough. The engine never mutates one in place; every
/// action yields a new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub token_index: usize,
    pub announcement_index: usize,
    pub survived_tokens: usize,
    pub total_tokens: usize,
    pub chart_value: i64,
    /// Chart value after every resolved action, seeded with the start value.
    pub chart_history: Vec<i64>,
    /// Running gain inside the current token.
    pub token_gain: i64,
    /// Per-token gain log, reset to `[0]` whenever a new token begins.
    pub token_gain_history: Vec<i64>,
    pub status: GameStatus,
    pub last_action: Option<ActionChoice>,
    pub last_outcome: Option<OutcomeLabel>,
    pub last_announcement: Option<Announcement>,
}

impl GameState {
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self.status, GameStatus::Running)
    }

    /// Number of actions resolved so far.
    #[must_use]
    pub fn actions_resolved(&self) -> usize {
        self.chart_history.len().saturating_sub(1)
    }

    /// Progress view for the header and token dots.
    #[must_use]
    pub fn progress(&self) -> Progress {
        let last_slot = self.total_tokens.saturating_sub(1);
        let active_token_index = if matches!(self.status, GameStatus::Completed) {
            last_slot
        } else {
            self.token_index.min(last_slot)
        };
        Progress {
            active_token_index,
            announcement_step: self.announcement_index + 1,
            cleared: (0..self.total_tokens)
                .map(|slot| slot < self.survived_tokens)
                .collect(),
        }
    }
}

/// Derived progress numbers; nothing here feeds back into the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Token slot to highlight, clamped to the last slot.
    pub active_token_index: usize,
    /// 1-based position inside the current token.
    pub announcement_step: usize,
    /// One flag per token slot, true once that slot was survived.
    pub cleared: Vec<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::create_initial_state;

    #[test]
    fn actions_parse_case_insensitively() {
        assert_eq!("hodl".parse::<ActionChoice>(), Ok(ActionChoice::Hodl));
        assert_eq!(" Sell ".parse::<ActionChoice>(), Ok(ActionChoice::Sell));
        assert!("buy".parse::<ActionChoice>().is_err());
        assert_eq!(
            serde_json::to_string(&GameStatus::Completed).unwrap(),
            "\"COMPLETED\""
        );
    }

    #[test]
    fn progress_clamps_active_slot() {
        let mut state = create_initial_state(3);
        assert_eq!(state.progress().active_token_index, 0);
        assert_eq!(state.progress().announcement_step, 1);

        state.token_index = 3;
        state.survived_tokens = 2;
        let progress = state.progress();
        assert_eq!(progress.active_token_index, 2);
        assert_eq!(progress.cleared, vec![true, true, false]);

        state.status = GameStatus::Completed;
        state.token_index = 0;
        assert_eq!(state.progress().active_token_index, 2);
    }
}
