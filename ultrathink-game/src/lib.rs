//! ULTRATHINK Game Engine
//!
//! Platform-agnostic core logic for the ULTRATHINK announcement game: read a
//! token's announcements one by one and decide to HODL or SELL before the rug.
//! This crate holds every rule and table without UI or platform dependencies.

pub mod announcement;
pub mod catalog;
pub mod constants;
pub mod engine;
pub mod generator;
pub mod numbers;
pub mod outcome;
pub mod result;
pub mod rng;
pub mod seed;
pub mod session;
pub mod state;

// Re-export commonly used types
pub use announcement::{Announcement, AnnouncementType, HodlEffect, HodlOutcome, TokenScenario};
pub use catalog::{
    AnnouncementCatalog, CaseScenario, CatalogError, Difficulty, RawAnnouncement, mixed_scenarios,
    scenarios_by_difficulty,
};
pub use engine::{CurrentAnnouncement, create_initial_state, current_announcement, process_action};
pub use generator::{CurveTable, DifficultyCurve, ScenarioGenerator, build_announcement_sequence};
pub use outcome::{GainRange, KindTable, OutcomeTable, resolve_hodl_outcome};
pub use result::{ResultSummary, Title, get_title, score_message, title};
pub use rng::{CountingRng, RngStreams};
pub use seed::{decode_replay_code, encode_replay_code, generate_code_from_entropy};
pub use session::{GameSession, ScenarioMode, SessionConfig};
pub use state::{ActionChoice, GameState, GameStatus, OutcomeLabel, Progress};

/// Config name for an [`OutcomeTable`] override.
pub const OUTCOMES_CONFIG: &str = "outcomes";
/// Config name for a [`CurveTable`] override.
pub const CURVES_CONFIG: &str = "curves";

/// Trait for abstracting data loading operations
/// Platform-specific implementations should provide this
pub trait DataLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the announcement catalog from the platform-specific source
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or fails validation.
    fn load_catalog(&self) -> Result<AnnouncementCatalog, Self::Error>;

    /// Load configuration data for a specific system
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or parsed.
    fn load_config<T>(&self, config_name: &str) -> Result<T, Self::Error>
    where
        T: serde::de::DeserializeOwned;
}

/// Loader backed by the catalog compiled into the crate. It carries no
/// config files, so every optional override resolves to `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledLoader;

impl DataLoader for BundledLoader {
    type Error = CatalogError;

    fn load_catalog(&self) -> Result<AnnouncementCatalog, Self::Error> {
        AnnouncementCatalog::load_bundled()
    }

    fn load_config<T>(&self, _config_name: &str) -> Result<T, Self::Error>
    where
        T: serde::de::DeserializeOwned,
    {
        Ok(serde_json::from_str("null")?)
    }
}

/// Main game engine for starting sessions
pub struct GameEngine<L>
where
    L: DataLoader,
{
    data_loader: L,
}

impl<L> GameEngine<L>
where
    L: DataLoader,
{
    /// Create a new game engine with the provided data loader
    pub const fn new(data_loader: L) -> Self {
        Self { data_loader }
    }

    #[must_use]
    pub const fn data_loader(&self) -> &L {
        &self.data_loader
    }

    /// Outcome and curve tables, with loader overrides applied.
    ///
    /// # Errors
    ///
    /// Returns an error if a present config fails to parse.
    pub fn load_tables(&self) -> Result<(OutcomeTable, CurveTable), L::Error> {
        let outcomes = self
            .data_loader
            .load_config::<Option<OutcomeTable>>(OUTCOMES_CONFIG)?
            .unwrap_or_default();
        let curves = self
            .data_loader
            .load_config::<Option<CurveTable>>(CURVES_CONFIG)?
            .unwrap_or_default();
        Ok((outcomes, curves))
    }

    /// Build a session for the given seed, mode and deck size
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog or tuning tables cannot be loaded, or
    /// if the catalog is empty.
    pub fn start_session(&self, config: &SessionConfig) -> Result<GameSession, anyhow::Error>
    where
        L::Error: Into<anyhow::Error>,
    {
        let catalog = self.data_loader.load_catalog().map_err(Into::into)?;
        if catalog.is_empty() {
            anyhow::bail!("announcement catalog is empty");
        }
        let (outcomes, curves) = self.load_tables().map_err(Into::into)?;
        let generator = ScenarioGenerator::with_tables(&catalog, outcomes, curves);
        Ok(GameSession::new(config, &generator))
    }
}

impl Default for GameEngine<BundledLoader> {
    fn default() -> Self {
        Self::new(BundledLoader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::de::DeserializeOwned;
    use std::collections::HashMap;

    #[derive(Clone, Default)]
    struct FixtureLoader {
        configs: HashMap<&'static str, &'static str>,
    }

    impl DataLoader for FixtureLoader {
        type Error = CatalogError;

        fn load_catalog(&self) -> Result<AnnouncementCatalog, Self::Error> {
            AnnouncementCatalog::load_bundled()
        }

        fn load_config<T>(&self, config_name: &str) -> Result<T, Self::Error>
        where
            T: DeserializeOwned,
        {
            let raw = self.configs.get(config_name).copied().unwrap_or("null");
            Ok(serde_json::from_str(raw)?)
        }
    }

    #[test]
    fn engine_starts_deterministic_sessions() {
        let engine = GameEngine::default();
        let config = SessionConfig::new(0xABCD, ScenarioMode::Random, 5);
        let first = engine.start_session(&config).unwrap();
        let second = engine.start_session(&config).unwrap();
        assert_eq!(first.tokens(), second.tokens());
        assert_eq!(first.state().total_tokens, 5);
        assert_eq!(first.replay_code(), encode_replay_code(0xABCD));
    }

    #[test]
    fn config_overrides_reach_the_generator() {
        let mut loader = FixtureLoader::default();
        loader.configs.insert(
            CURVES_CONFIG,
            r#"{"curves":[{"SAFE":1,"BAIT":0,"LOW_RISK_REWARD":0,"MIDDLE_RISK_REWARD":0,"HIGH_RISK_REWARD":0}]}"#,
        );
        let engine = GameEngine::new(loader);
        let (outcomes, curves) = engine.load_tables().unwrap();
        assert_eq!(outcomes, OutcomeTable::default());
        assert_eq!(curves.curves.len(), 1);

        let session = engine
            .start_session(&SessionConfig::new(3, ScenarioMode::Random, 3))
            .unwrap();
        for token in session.tokens() {
            assert_eq!(token.announcements.len(), 1);
            assert_eq!(token.announcements[0].kind, AnnouncementType::Safe);
        }
    }

    #[test]
    fn malformed_config_is_an_error() {
        let mut loader = FixtureLoader::default();
        loader.configs.insert(OUTCOMES_CONFIG, "{\"success_rates\":");
        let engine = GameEngine::new(loader);
        assert!(engine.load_tables().is_err());
        assert!(
            engine
                .start_session(&SessionConfig::new(1, ScenarioMode::Catalog, 0))
                .is_err()
        );
    }
}
