use std::fmt;
use std::str::FromStr;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::Serialize;
use ultrathink_game::{ActionChoice, Announcement, AnnouncementType, GameState};

/// Decision returned by a [`PlayerPolicy`]
#[derive(Debug, Clone)]
pub struct PolicyDecision {
    pub action: ActionChoice,
    pub rationale: Option<String>,
}

impl PolicyDecision {
    #[must_use]
    pub fn new(action: ActionChoice, rationale: Option<String>) -> Self {
        Self { action, rationale }
    }

    fn hodl(reason: &str) -> Self {
        Self::new(ActionChoice::Hodl, Some(reason.to_string()))
    }

    fn sell(reason: &str) -> Self {
        Self::new(ActionChoice::Sell, Some(reason.to_string()))
    }
}

/// Policy interface for automated play strategies.
pub trait PlayerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Pick HODL or SELL for the announcement on screen.
    fn decide(&mut self, state: &GameState, announcement: &Announcement) -> PolicyDecision;
}

/// Built-in gameplay strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameplayStrategy {
    AlwaysSell,
    AlwaysHodl,
    Cautious,
    Balanced,
    Greedy,
    Coin,
}

impl GameplayStrategy {
    pub const ALL: [Self; 6] = [
        Self::AlwaysSell,
        Self::AlwaysHodl,
        Self::Cautious,
        Self::Balanced,
        Self::Greedy,
        Self::Coin,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            GameplayStrategy::AlwaysSell => "Always Sell",
            GameplayStrategy::AlwaysHodl => "Always HODL",
            GameplayStrategy::Cautious => "Cautious",
            GameplayStrategy::Balanced => "Balanced",
            GameplayStrategy::Greedy => "Greedy",
            GameplayStrategy::Coin => "Coin Flip",
        }
    }

    /// Key accepted on the command line.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            GameplayStrategy::AlwaysSell => "always-sell",
            GameplayStrategy::AlwaysHodl => "always-hodl",
            GameplayStrategy::Cautious => "cautious",
            GameplayStrategy::Balanced => "balanced",
            GameplayStrategy::Greedy => "greedy",
            GameplayStrategy::Coin => "coin",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn PlayerPolicy + Send> {
        match self {
            GameplayStrategy::AlwaysSell => Box::new(AlwaysSellPolicy),
            GameplayStrategy::AlwaysHodl => Box::new(AlwaysHodlPolicy),
            GameplayStrategy::Cautious => Box::new(CautiousPolicy),
            GameplayStrategy::Balanced => Box::new(BalancedPolicy),
            GameplayStrategy::Greedy => Box::new(GreedyPolicy),
            GameplayStrategy::Coin => Box::new(CoinPolicy::new(seed)),
        }
    }
}

impl fmt::Display for GameplayStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GameplayStrategy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.key() == wanted)
            .ok_or(())
    }
}

struct AlwaysSellPolicy;
struct AlwaysHodlPolicy;
struct CautiousPolicy;
struct BalancedPolicy;
struct GreedyPolicy;

struct CoinPolicy {
    rng: ChaCha20Rng,
}

impl CoinPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

/// Holding streak after which the greedy player cashes out.
const GREEDY_GAIN_STREAK: usize = 2;

impl PlayerPolicy for AlwaysSellPolicy {
    fn name(&self) -> &'static str {
        "Always Sell"
    }

    fn decide(&mut self, _state: &GameState, _announcement: &Announcement) -> PolicyDecision {
        PolicyDecision::sell("exit immediately")
    }
}

impl PlayerPolicy for AlwaysHodlPolicy {
    fn name(&self) -> &'static str {
        "Always HODL"
    }

    fn decide(&mut self, _state: &GameState, _announcement: &Announcement) -> PolicyDecision {
        PolicyDecision::hodl("never sell")
    }
}

impl PlayerPolicy for CautiousPolicy {
    fn name(&self) -> &'static str {
        "Cautious"
    }

    fn decide(&mut self, _state: &GameState, announcement: &Announcement) -> PolicyDecision {
        if announcement.kind == AnnouncementType::Safe {
            PolicyDecision::hodl("safe announcement")
        } else {
            PolicyDecision::sell(announcement.kind.as_str())
        }
    }
}

impl PlayerPolicy for BalancedPolicy {
    fn name(&self) -> &'static str {
        "Balanced"
    }

    fn decide(&mut self, _state: &GameState, announcement: &Announcement) -> PolicyDecision {
        match announcement.kind {
            AnnouncementType::Safe | AnnouncementType::LowRiskReward => {
                PolicyDecision::hodl(announcement.kind.as_str())
            }
            other => PolicyDecision::sell(other.as_str()),
        }
    }
}

impl PlayerPolicy for GreedyPolicy {
    fn name(&self) -> &'static str {
        "Greedy"
    }

    fn decide(&mut self, state: &GameState, _announcement: &Announcement) -> PolicyDecision {
        let gains = state.token_gain_history.len().saturating_sub(1);
        if gains >= GREEDY_GAIN_STREAK {
            PolicyDecision::sell(&format!("{gains} gains banked"))
        } else {
            PolicyDecision::hodl(&format!("{gains} gains so far"))
        }
    }
}

impl PlayerPolicy for CoinPolicy {
    fn name(&self) -> &'static str {
        "Coin Flip"
    }

    fn decide(&mut self, _state: &GameState, _announcement: &Announcement) -> PolicyDecision {
        if self.rng.gen_bool(0.5) {
            PolicyDecision::hodl("heads")
        } else {
            PolicyDecision::sell("tails")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ultrathink_game::{HodlEffect, create_initial_state};

    fn announcement(kind: AnnouncementType) -> Announcement {
        Announcement {
            id: "case_0".to_string(),
            text: "Liquidity locked for twelve months.".to_string(),
            kind,
            tone: "calm".to_string(),
            hodl: HodlEffect::gain(500),
            learn: None,
        }
    }

    #[test]
    fn strategies_parse_from_cli_keys() {
        for strategy in GameplayStrategy::ALL {
            assert_eq!(strategy.key().parse::<GameplayStrategy>(), Ok(strategy));
        }
        assert_eq!(
            "ALWAYS_SELL".parse::<GameplayStrategy>(),
            Ok(GameplayStrategy::AlwaysSell)
        );
        assert!("yolo".parse::<GameplayStrategy>().is_err());
    }

    #[test]
    fn cautious_and_balanced_follow_category() {
        let state = create_initial_state(1);
        let mut cautious = GameplayStrategy::Cautious.create_policy(0);
        let mut balanced = GameplayStrategy::Balanced.create_policy(0);
        let low = announcement(AnnouncementType::LowRiskReward);
        let safe = announcement(AnnouncementType::Safe);
        let bait = announcement(AnnouncementType::Bait);

        assert_eq!(cautious.decide(&state, &safe).action, ActionChoice::Hodl);
        assert_eq!(cautious.decide(&state, &low).action, ActionChoice::Sell);
        assert_eq!(balanced.decide(&state, &low).action, ActionChoice::Hodl);
        assert_eq!(balanced.decide(&state, &bait).action, ActionChoice::Sell);
    }

    #[test]
    fn greedy_cashes_out_after_two_gains() {
        let mut state = create_initial_state(1);
        let mut greedy = GameplayStrategy::Greedy.create_policy(0);
        let high = announcement(AnnouncementType::HighRiskReward);
        assert_eq!(greedy.decide(&state, &high).action, ActionChoice::Hodl);
        state.token_gain_history = vec![0, 1_000];
        assert_eq!(greedy.decide(&state, &high).action, ActionChoice::Hodl);
        state.token_gain_history = vec![0, 1_000, 3_000];
        assert_eq!(greedy.decide(&state, &high).action, ActionChoice::Sell);
    }

    #[test]
    fn coin_is_reproducible_per_seed() {
        let state = create_initial_state(1);
        let ann = announcement(AnnouncementType::MiddleRiskReward);
        let mut a = GameplayStrategy::Coin.create_policy(11);
        let mut b = GameplayStrategy::Coin.create_policy(11);
        let flips_a: Vec<ActionChoice> = (0..16).map(|_| a.decide(&state, &ann).action).collect();
        let flips_b: Vec<ActionChoice> = (0..16).map(|_| b.decide(&state, &ann).action).collect();
        assert_eq!(flips_a, flips_b);
        assert!(flips_a.contains(&ActionChoice::Hodl));
        assert!(flips_a.contains(&ActionChoice::Sell));
    }
}
