use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::announcement::TokenScenario;
use crate::catalog::mixed_scenarios;
use crate::engine::{CurrentAnnouncement, create_initial_state, current_announcement, process_action};
use crate::generator::ScenarioGenerator;
use crate::result::ResultSummary;
use crate::rng::RngStreams;
use crate::seed::encode_replay_code;
use crate::state::{ActionChoice, GameState, GameStatus};

/// Where a session's deck comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioMode {
    /// Authored cases from the catalog, the mixed easy/medium/hard deck.
    #[default]
    Catalog,
    /// Decks sampled per slot along the difficulty curve.
    Random,
}

impl ScenarioMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Catalog => "catalog",
            Self::Random => "random",
        }
    }
}

impl fmt::Display for ScenarioMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScenarioMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "catalog" | "cases" => Ok(Self::Catalog),
            "random" | "generated" => Ok(Self::Random),
            _ => Err(()),
        }
    }
}

/// Inputs that fully determine a session's deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub seed: u64,
    pub mode: ScenarioMode,
    /// Deck size for [`ScenarioMode::Random`]; catalog decks size themselves.
    pub tokens: usize,
}

impl SessionConfig {
    #[must_use]
    pub const fn new(seed: u64, mode: ScenarioMode, tokens: usize) -> Self {
        Self { seed, mode, tokens }
    }
}

/// One playthrough: a frozen deck and the state walking through it.
#[derive(Debug, Clone)]
pub struct GameSession {
    seed: u64,
    mode: ScenarioMode,
    tokens: Vec<TokenScenario>,
    state: GameState,
}

impl GameSession {
    /// Build the deck for `config` and start at the initial state. HODL
    /// outcomes are resolved here, once, and never re-rolled during play.
    #[must_use]
    pub fn new(config: &SessionConfig, generator: &ScenarioGenerator<'_>) -> Self {
        let mut streams = RngStreams::from_user_seed(config.seed);
        let tokens = match config.mode {
            ScenarioMode::Catalog => {
                let cases = generator
                    .catalog()
                    .case_scenarios(generator.outcomes(), streams.outcome());
                mixed_scenarios(&cases)
            }
            ScenarioMode::Random => generator.generate_random_scenarios(config.tokens, &mut streams),
        };
        log::debug!(
            "session {} ({}) dealt {} tokens",
            encode_replay_code(config.seed),
            config.mode,
            tokens.len()
        );
        Self::from_scenarios(config.seed, config.mode, tokens)
    }

    /// Wrap an already-built deck.
    #[must_use]
    pub fn from_scenarios(seed: u64, mode: ScenarioMode, tokens: Vec<TokenScenario>) -> Self {
        let state = create_initial_state(tokens.len());
        Self {
            seed,
            mode,
            tokens,
            state,
        }
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub fn replay_code(&self) -> String {
        encode_replay_code(self.seed)
    }

    #[must_use]
    pub const fn mode(&self) -> ScenarioMode {
        self.mode
    }

    #[must_use]
    pub fn tokens(&self) -> &[TokenScenario] {
        &self.tokens
    }

    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub const fn status(&self) -> GameStatus {
        self.state.status
    }

    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }

    #[must_use]
    pub fn current(&self) -> CurrentAnnouncement<'_> {
        current_announcement(&self.state, &self.tokens)
    }

    /// Apply one decision. Terminal sessions ignore further input.
    pub fn act(&mut self, action: ActionChoice) -> &GameState {
        self.state = process_action(&self.state, action, &self.tokens);
        &self.state
    }

    /// Back to the first announcement with the same deck.
    pub fn restart(&mut self) {
        self.state = create_initial_state(self.tokens.len());
    }

    #[must_use]
    pub const fn summary(&self) -> ResultSummary {
        ResultSummary::from_state(&self.state)
    }

    #[must_use]
    pub fn into_state(self) -> GameState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::AnnouncementCatalog;
    use crate::constants::INITIAL_FUNDS;

    fn generator() -> ScenarioGenerator<'static> {
        ScenarioGenerator::new(AnnouncementCatalog::bundled())
    }

    #[test]
    fn catalog_mode_deals_the_mixed_deck() {
        let session = GameSession::new(
            &SessionConfig::new(7, ScenarioMode::Catalog, 0),
            &generator(),
        );
        assert_eq!(session.tokens().len(), 5);
        assert_eq!(session.state().total_tokens, 5);
        assert!(session.current().announcement.is_some());
    }

    #[test]
    fn random_mode_honours_token_count_and_seed() {
        let config = SessionConfig::new(42, ScenarioMode::Random, 4);
        let first = GameSession::new(&config, &generator());
        let second = GameSession::new(&config, &generator());
        assert_eq!(first.tokens().len(), 4);
        assert_eq!(first.tokens(), second.tokens());
    }

    #[test]
    fn restart_keeps_the_frozen_deck() {
        let mut session = GameSession::new(
            &SessionConfig::new(9, ScenarioMode::Random, 3),
            &generator(),
        );
        let deck = session.tokens().to_vec();
        while !session.is_finished() {
            session.act(ActionChoice::Sell);
        }
        assert_eq!(session.status(), GameStatus::Completed);
        assert_eq!(session.summary().survived, 3);

        session.restart();
        assert_eq!(session.tokens(), deck.as_slice());
        assert_eq!(session.state().chart_value, INITIAL_FUNDS);
        assert!(session.state().is_running());
    }

    #[test]
    fn modes_parse_from_cli_strings() {
        assert_eq!("Random".parse::<ScenarioMode>(), Ok(ScenarioMode::Random));
        assert_eq!("catalog".parse::<ScenarioMode>(), Ok(ScenarioMode::Catalog));
        assert!("endless".parse::<ScenarioMode>().is_err());
    }
}
