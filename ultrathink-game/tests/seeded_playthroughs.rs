use ultrathink_game::{
    ActionChoice, GameEngine, GameSession, GameStatus, ResultSummary, ScenarioMode, SessionConfig,
    decode_replay_code, encode_replay_code,
};

fn play_hodl_safe_only(session: &mut GameSession) {
    while !session.is_finished() {
        let action = match session.current().announcement {
            Some(ann) if ann.kind == ultrathink_game::AnnouncementType::Safe => ActionChoice::Hodl,
            _ => ActionChoice::Sell,
        };
        session.act(action);
    }
}

#[test]
fn replay_code_reproduces_the_same_game() {
    let engine = GameEngine::default();
    let seed = decode_replay_code("UT-MOON07").unwrap();
    for mode in [ScenarioMode::Catalog, ScenarioMode::Random] {
        let config = SessionConfig::new(seed, mode, 4);
        let mut first = engine.start_session(&config).unwrap();
        let mut second = engine.start_session(&config).unwrap();
        play_hodl_safe_only(&mut first);
        play_hodl_safe_only(&mut second);
        assert_eq!(first.state(), second.state());
        assert_eq!(first.replay_code(), "UT-MOON07");
    }
}

#[test]
fn different_seeds_deal_different_random_decks() {
    let engine = GameEngine::default();
    let a = engine
        .start_session(&SessionConfig::new(1, ScenarioMode::Random, 4))
        .unwrap();
    let b = engine
        .start_session(&SessionConfig::new(2, ScenarioMode::Random, 4))
        .unwrap();
    assert_ne!(a.tokens(), b.tokens());
}

#[test]
fn holding_safe_only_never_rugs() {
    let engine = GameEngine::default();
    for seed in 0..40_u64 {
        for mode in [ScenarioMode::Catalog, ScenarioMode::Random] {
            let mut session = engine
                .start_session(&SessionConfig::new(seed, mode, 5))
                .unwrap();
            play_hodl_safe_only(&mut session);
            assert_eq!(session.status(), GameStatus::Completed, "seed {seed} {mode}");
            let summary = session.summary();
            assert!(summary.is_perfect());
            assert!(summary.profit() >= 0);
        }
    }
}

#[test]
fn summary_survives_the_query_hand_off() {
    let engine = GameEngine::default();
    let mut session = engine
        .start_session(&SessionConfig::new(0xC0FFEE, ScenarioMode::Random, 4))
        .unwrap();
    while !session.is_finished() {
        session.act(ActionChoice::Hodl);
    }
    let summary = session.summary();
    let parsed = ResultSummary::from_query(&summary.to_query());
    assert_eq!(parsed, summary);
    assert!(summary.share_text().contains(summary.title().as_str()));
    assert_eq!(
        encode_replay_code(decode_replay_code(&session.replay_code()).unwrap()),
        session.replay_code()
    );
}
