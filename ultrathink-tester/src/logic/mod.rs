pub mod policy;
pub mod reports;
pub mod seeds;
pub mod simulation;

pub use policy::{GameplayStrategy, PlayerPolicy, PolicyDecision};
pub use seeds::{SeedInfo, resolve_seed_inputs};
pub use simulation::{
    PlaythroughRecord, SimulationConfig, StrategyAggregate, TesterAssets, aggregate, simulate,
    validate_strategy_invariants,
};
