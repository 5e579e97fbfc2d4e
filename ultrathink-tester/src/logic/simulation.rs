use std::collections::BTreeMap;

use anyhow::{Result, ensure};
use serde::Serialize;
use ultrathink_game::constants::INITIAL_FUNDS;
use ultrathink_game::numbers::{mean_i64, ratio_pct};
use ultrathink_game::{
    ActionChoice, AnnouncementCatalog, CurveTable, DataLoader, GameEngine, GameSession, GameStatus,
    OutcomeTable, ScenarioGenerator, ScenarioMode, SessionConfig, encode_replay_code,
};

use crate::logic::policy::{GameplayStrategy, PlayerPolicy};

/// Catalog and tuning tables shared by every simulated run.
#[derive(Debug, Clone)]
pub struct TesterAssets {
    catalog: AnnouncementCatalog,
    outcomes: OutcomeTable,
    curves: CurveTable,
}

impl TesterAssets {
    /// Load everything through the bundled loader.
    pub fn load_default() -> Result<Self> {
        let engine = GameEngine::default();
        let catalog = engine.data_loader().load_catalog()?;
        ensure!(!catalog.is_empty(), "bundled announcement catalog is empty");
        let (outcomes, curves) = engine.load_tables()?;
        Ok(Self {
            catalog,
            outcomes,
            curves,
        })
    }

    #[must_use]
    pub fn generator(&self) -> ScenarioGenerator<'_> {
        ScenarioGenerator::with_tables(&self.catalog, self.outcomes.clone(), self.curves.clone())
    }

    #[must_use]
    pub fn catalog(&self) -> &AnnouncementCatalog {
        &self.catalog
    }
}

/// Configuration for a simulated playthrough.
#[derive(Debug, Clone, Copy)]
pub struct SimulationConfig {
    pub seed: u64,
    pub mode: ScenarioMode,
    pub strategy: GameplayStrategy,
    pub tokens: usize,
    pub record_decisions: bool,
}

impl SimulationConfig {
    #[must_use]
    pub fn new(mode: ScenarioMode, strategy: GameplayStrategy, seed: u64) -> Self {
        Self {
            seed,
            mode,
            strategy,
            tokens: 5,
            record_decisions: false,
        }
    }

    #[must_use]
    pub fn with_tokens(mut self, tokens: usize) -> Self {
        self.tokens = tokens;
        self
    }

    #[must_use]
    pub fn with_decisions(mut self, record: bool) -> Self {
        self.record_decisions = record;
        self
    }
}

/// Snapshot of one resolved announcement.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionRecord {
    pub token_index: usize,
    pub announcement_id: String,
    pub action: ActionChoice,
    pub rationale: Option<String>,
    pub chart_value: i64,
}

/// Outcome of one seeded playthrough.
#[derive(Debug, Clone, Serialize)]
pub struct PlaythroughRecord {
    pub strategy: GameplayStrategy,
    pub mode: ScenarioMode,
    pub seed: u64,
    pub seed_code: String,
    pub status: GameStatus,
    pub survived: usize,
    pub total: usize,
    pub final_value: i64,
    pub actions: usize,
    pub title: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub decisions: Vec<DecisionRecord>,
}

impl PlaythroughRecord {
    #[must_use]
    pub fn is_rugged(&self) -> bool {
        self.status == GameStatus::Rugged
    }

    #[must_use]
    pub fn is_perfect(&self) -> bool {
        self.status == GameStatus::Completed && self.survived == self.total
    }

    #[must_use]
    pub fn profit(&self) -> i64 {
        self.final_value - INITIAL_FUNDS
    }
}

/// Play one seeded session to a terminal state.
#[must_use]
pub fn simulate(assets: &TesterAssets, config: SimulationConfig) -> PlaythroughRecord {
    let session_config = SessionConfig::new(config.seed, config.mode, config.tokens);
    let mut session = GameSession::new(&session_config, &assets.generator());
    let mut policy = config.strategy.create_policy(config.seed);
    let decisions = drive(&mut session, policy.as_mut(), config.record_decisions);

    let summary = session.summary();
    let state = session.state();
    log::debug!(
        "{} seed {} finished {} with {}/{}",
        config.strategy,
        config.seed,
        state.status,
        summary.survived,
        summary.total
    );
    PlaythroughRecord {
        strategy: config.strategy,
        mode: config.mode,
        seed: config.seed,
        seed_code: encode_replay_code(config.seed),
        status: state.status,
        survived: summary.survived,
        total: summary.total,
        final_value: summary.chart_value,
        actions: state.actions_resolved(),
        title: summary.title().as_str().to_string(),
        decisions,
    }
}

fn drive(
    session: &mut GameSession,
    policy: &mut dyn PlayerPolicy,
    record: bool,
) -> Vec<DecisionRecord> {
    let budget: usize = session.tokens().iter().map(|token| token.len()).sum::<usize>() + 1;
    let mut decisions = Vec::new();
    for _ in 0..budget {
        if session.is_finished() {
            break;
        }
        let Some(announcement) = session.current().announcement.cloned() else {
            // Out of deck; let the engine settle the state.
            session.act(ActionChoice::Sell);
            continue;
        };
        let decision = policy.decide(session.state(), &announcement);
        let token_index = session.state().token_index;
        let chart_value = session.act(decision.action).chart_value;
        if record {
            decisions.push(DecisionRecord {
                token_index,
                announcement_id: announcement.id,
                action: decision.action,
                rationale: decision.rationale,
                chart_value,
            });
        }
    }
    if !session.is_finished() {
        log::warn!(
            "{} gave up after {budget} actions without reaching a terminal state",
            policy.name()
        );
    }
    decisions
}

/// Per strategy and mode summary.
#[derive(Debug, Clone, Serialize)]
pub struct StrategyAggregate {
    pub strategy: GameplayStrategy,
    pub mode: ScenarioMode,
    pub runs: usize,
    pub completed: usize,
    pub rugged: usize,
    pub perfect_runs: usize,
    pub mean_survived: f64,
    pub mean_final_value: f64,
    pub best_value: i64,
    pub completion_pct: f64,
}

#[must_use]
pub fn aggregate(records: &[PlaythroughRecord]) -> Vec<StrategyAggregate> {
    let mut grouped: BTreeMap<(GameplayStrategy, &str), Vec<&PlaythroughRecord>> = BTreeMap::new();
    for record in records {
        grouped
            .entry((record.strategy, record.mode.as_str()))
            .or_default()
            .push(record);
    }

    grouped
        .into_values()
        .filter_map(|group| {
            let first = group.first()?;
            let runs = group.len();
            let completed = group
                .iter()
                .filter(|r| r.status == GameStatus::Completed)
                .count();
            let survived: Vec<i64> = group
                .iter()
                .map(|r| i64::try_from(r.survived).unwrap_or(i64::MAX))
                .collect();
            let values: Vec<i64> = group.iter().map(|r| r.final_value).collect();
            Some(StrategyAggregate {
                strategy: first.strategy,
                mode: first.mode,
                runs,
                completed,
                rugged: group.iter().filter(|r| r.is_rugged()).count(),
                perfect_runs: group.iter().filter(|r| r.is_perfect()).count(),
                mean_survived: mean_i64(&survived),
                mean_final_value: mean_i64(&values),
                best_value: values.iter().copied().max().unwrap_or(INITIAL_FUNDS),
                completion_pct: ratio_pct(completed, runs),
            })
        })
        .collect()
}

/// Sanity checks every run must pass regardless of seed.
pub fn validate_strategy_invariants(records: &[PlaythroughRecord]) -> Result<()> {
    for record in records {
        ensure!(
            record.survived <= record.total,
            "{} seed {} survived {} of {}",
            record.strategy,
            record.seed_code,
            record.survived,
            record.total
        );
        ensure!(
            record.status != GameStatus::Running,
            "{} seed {} never reached a terminal state",
            record.strategy,
            record.seed_code
        );
        match record.strategy {
            GameplayStrategy::AlwaysSell | GameplayStrategy::Cautious => ensure!(
                record.is_perfect(),
                "{} seed {} should never be rugged",
                record.strategy,
                record.seed_code
            ),
            _ if record.is_rugged() => ensure!(
                record.final_value == 0,
                "{} seed {} rugged with value {}",
                record.strategy,
                record.seed_code,
                record.final_value
            ),
            _ => ensure!(
                record.final_value >= INITIAL_FUNDS,
                "{} seed {} completed below starting funds",
                record.strategy,
                record.seed_code
            ),
        }
    }
    Ok(())
}
