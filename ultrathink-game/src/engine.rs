//! State transitions for a playthrough.
//!
//! `process_action` is total: it never panics on short or malformed scenario
//! lists and never mutates its input. Terminal states come back unchanged.
use crate::announcement::{Announcement, AnnouncementType, HodlOutcome, TokenScenario};
use crate::constants::{INITIAL_FUNDS, RUGGED_GAIN, SELL_SAFE_BONUS};
use crate::state::{ActionChoice, GameState, GameStatus, OutcomeLabel};

/// Fresh state for a game over `total_tokens` tokens.
#[must_use]
pub fn create_initial_state(total_tokens: usize) -> GameState {
    GameState {
        token_index: 0,
        announcement_index: 0,
        survived_tokens: 0,
        total_tokens,
        chart_value: INITIAL_FUNDS,
        chart_history: vec![INITIAL_FUNDS],
        token_gain: 0,
        token_gain_history: vec![0],
        status: GameStatus::Running,
        last_action: None,
        last_outcome: None,
        last_announcement: None,
    }
}

/// Token and announcement at the state's current indices, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentAnnouncement<'a> {
    pub token: Option<&'a TokenScenario>,
    pub announcement: Option<&'a Announcement>,
}

/// Look up what the player is looking at. Both fields are `None` past the end.
#[must_use]
pub fn current_announcement<'a>(
    state: &GameState,
    tokens: &'a [TokenScenario],
) -> CurrentAnnouncement<'a> {
    let token = tokens.get(state.token_index);
    let announcement = token.and_then(|token| token.announcements.get(state.announcement_index));
    CurrentAnnouncement {
        token,
        announcement,
    }
}

/// Gain credited for selling on an announcement of `kind`.
#[must_use]
pub const fn sell_gain(kind: AnnouncementType) -> i64 {
    if matches!(kind, AnnouncementType::Safe) {
        SELL_SAFE_BONUS
    } else {
        0
    }
}

struct Resolution<'a> {
    action: ActionChoice,
    outcome: OutcomeLabel,
    announcement: &'a Announcement,
    gain: i64,
}

/// Apply `gain` to both running totals and append to both logs.
fn credit(state: &GameState, gain: i64) -> GameState {
    let chart_value = state.chart_value + gain;
    let token_gain = state.token_gain + gain;
    let mut chart_history = state.chart_history.clone();
    chart_history.push(chart_value);
    let mut token_gain_history = state.token_gain_history.clone();
    token_gain_history.push(token_gain);
    GameState {
        chart_value,
        chart_history,
        token_gain,
        token_gain_history,
        ..state.clone()
    }
}

fn advance_to_next_token(
    state: &GameState,
    tokens: &[TokenScenario],
    resolution: &Resolution<'_>,
) -> GameState {
    let credited = credit(state, resolution.gain);
    let next_token_index = state.token_index + 1;
    let has_more_tokens = next_token_index < state.total_tokens && next_token_index < tokens.len();
    GameState {
        token_index: next_token_index,
        announcement_index: 0,
        survived_tokens: (state.survived_tokens + 1).min(state.total_tokens),
        token_gain: 0,
        token_gain_history: vec![0],
        status: if has_more_tokens {
            GameStatus::Running
        } else {
            GameStatus::Completed
        },
        last_action: Some(resolution.action),
        last_outcome: Some(resolution.outcome),
        last_announcement: Some(resolution.announcement.clone()),
        ..credited
    }
}

fn rug(state: &GameState, announcement: &Announcement) -> GameState {
    let mut chart_history = state.chart_history.clone();
    chart_history.push(0);
    GameState {
        status: GameStatus::Rugged,
        chart_value: 0,
        chart_history,
        token_gain: RUGGED_GAIN,
        last_action: Some(ActionChoice::Hodl),
        last_outcome: Some(OutcomeLabel::Loss),
        last_announcement: Some(announcement.clone()),
        ..state.clone()
    }
}

/// Resolve one player action and return the next state.
#[must_use]
pub fn process_action(
    state: &GameState,
    action: ActionChoice,
    tokens: &[TokenScenario],
) -> GameState {
    if state.is_terminal() {
        return state.clone();
    }

    let current = current_announcement(state, tokens);
    let (Some(token), Some(announcement)) = (current.token, current.announcement) else {
        log::warn!(
            "no announcement at token {} / announcement {}; closing the game",
            state.token_index,
            state.announcement_index
        );
        return GameState {
            status: GameStatus::Completed,
            token_index: tokens.len(),
            announcement_index: 0,
            ..state.clone()
        };
    };

    let next = match action {
        ActionChoice::Sell => advance_to_next_token(
            state,
            tokens,
            &Resolution {
                action,
                outcome: OutcomeLabel::Profit,
                announcement,
                gain: sell_gain(announcement.kind),
            },
        ),
        ActionChoice::Hodl => match announcement.hodl.outcome {
            HodlOutcome::Rugged => rug(state, announcement),
            HodlOutcome::Gain => {
                let is_last = state.announcement_index + 1 >= token.announcements.len();
                if is_last {
                    advance_to_next_token(
                        state,
                        tokens,
                        &Resolution {
                            action,
                            outcome: OutcomeLabel::Gain,
                            announcement,
                            gain: announcement.hodl.gain,
                        },
                    )
                } else {
                    GameState {
                        announcement_index: state.announcement_index + 1,
                        last_action: Some(action),
                        last_outcome: Some(OutcomeLabel::Gain),
                        last_announcement: Some(announcement.clone()),
                        ..credit(state, announcement.hodl.gain)
                    }
                }
            }
        },
    };

    log::debug!(
        "{action} on {} [{}] -> {} (chart {} -> {})",
        announcement.id,
        announcement.kind,
        next.status,
        state.chart_value,
        next.chart_value
    );
    next
}
