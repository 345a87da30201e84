//! Integration tests for complete game sessions.
//!
//! Exercises: GameEngine::new_game → start_game → check / try_again /
//! show_answer → next → acknowledge, with scoring, the level timer, best
//! times, and observer notifications.
//!
//! All tests are pure logic, no presentation layer.

use std::cell::RefCell;
use std::rc::Rc;

use bce_logic::config::GameConfig;
use bce_logic::equation::Side;
use bce_logic::error::ConfigError;
use bce_logic::game::{BestTime, ChallengeOutcome, GameEngine, GameEvent, GameState};
use bce_logic::pool::LevelPool;
use bce_logic::reactions::{R_2H2_O2_2H2O, R_C_O2_CO2, R_N2_3H2_2NH3};

// ── Helpers ────────────────────────────────────────────────────────────

/// One level of three reactions whose doubled answers still fit 0..=7.
fn three_challenge_engine(timer: bool) -> GameEngine {
    let config = GameConfig {
        timer_enabled: timer,
        challenges_per_level: 3,
        seed: Some(42),
        ..Default::default()
    };
    let level = LevelPool::new(vec![&R_2H2_O2_2H2O, &R_N2_3H2_2NH3, &R_C_O2_CO2]);
    GameEngine::with_levels(config, vec![level]).unwrap()
}

fn enter(engine: &mut GameEngine, coefficients: &[u32]) {
    let reactants = engine.current_equation().unwrap().reactants().len();
    for (i, &c) in coefficients.iter().enumerate() {
        let (side, index) = if i < reactants {
            (Side::Reactants, i)
        } else {
            (Side::Products, i - reactants)
        };
        assert!(engine.set_coefficient(side, index, c as i64).is_some());
    }
}

fn enter_answer(engine: &mut GameEngine) {
    let answer = engine.current_equation().unwrap().balanced_coefficients();
    enter(engine, &answer);
}

/// Balanced but not simplified, which counts as wrong.
fn enter_doubled(engine: &mut GameEngine) {
    let doubled: Vec<u32> = engine
        .current_equation()
        .unwrap()
        .balanced_coefficients()
        .iter()
        .map(|c| c * 2)
        .collect();
    enter(engine, &doubled);
}

fn start(engine: &mut GameEngine) {
    engine.new_game(0).unwrap();
    assert!(engine.start_game());
    assert_eq!(engine.state(), GameState::Check);
}

/// Solve every challenge first try, ticking `seconds` along the way.
fn play_perfect(engine: &mut GameEngine, seconds: f64) {
    start(engine);
    let per_challenge = seconds / engine.number_of_equations() as f64;
    for _ in 0..engine.number_of_equations() {
        engine.tick(per_challenge);
        enter_answer(engine);
        assert!(engine.check());
        assert!(engine.next());
    }
    assert_eq!(engine.state(), GameState::LevelCompleted);
}

fn record_events(engine: &mut GameEngine) -> Rc<RefCell<Vec<GameEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    engine.subscribe(move |e| sink.borrow_mut().push(e.clone()));
    events
}

// ── Scoring scenarios ──────────────────────────────────────────────────

#[test]
fn mixed_attempts_score_by_ordering() {
    let mut engine = three_challenge_engine(true);
    start(&mut engine);
    engine.tick(12.0);

    // first try
    enter_answer(&mut engine);
    engine.check();
    assert_eq!(engine.state(), GameState::Next);
    assert_eq!(engine.points(), 2);
    engine.next();

    // wrong twice, then revealed
    enter_doubled(&mut engine);
    engine.check();
    assert_eq!(engine.state(), GameState::TryAgain);
    engine.try_again();
    assert_eq!(engine.state(), GameState::Check);
    engine.check();
    assert_eq!(engine.state(), GameState::ShowAnswer);
    engine.show_answer();
    assert_eq!(engine.state(), GameState::Next);
    assert!(engine
        .current_equation()
        .unwrap()
        .is_balanced_and_simplified());
    assert_eq!(engine.points(), 2);
    engine.next();

    // correct after one retry
    enter_doubled(&mut engine);
    engine.check();
    engine.try_again();
    enter_answer(&mut engine);
    engine.check();
    assert_eq!(engine.state(), GameState::Next);
    assert_eq!(engine.points(), 3);
    engine.next();

    assert_eq!(engine.state(), GameState::LevelCompleted);
    assert_eq!(
        engine.outcomes(),
        &[
            ChallengeOutcome::FirstAttempt,
            ChallengeOutcome::Revealed,
            ChallengeOutcome::SecondAttempt,
        ]
    );
    assert!(!engine.is_perfect_score());
    assert!(!engine.is_new_best_time());

    assert!(engine.acknowledge());
    assert_eq!(engine.state(), GameState::LevelSelection);
    assert_eq!(engine.best_time(0), Some(BestTime::default()));
    assert!(!engine.perfect_score(0));
}

#[test]
fn second_check_is_ignored() {
    let mut engine = three_challenge_engine(false);
    start(&mut engine);
    enter_doubled(&mut engine);
    assert!(engine.check());
    assert!(!engine.check());
    assert_eq!(engine.state(), GameState::TryAgain);

    engine.try_again();
    enter_answer(&mut engine);
    assert!(engine.check());
    assert!(!engine.check());
    assert_eq!(engine.state(), GameState::Next);
    assert_eq!(engine.points(), 1);
}

#[test]
fn check_with_nothing_entered_is_ignored() {
    let mut engine = three_challenge_engine(false);
    start(&mut engine);
    assert!(!engine.check());
    assert_eq!(engine.state(), GameState::Check);
    // a real attempt afterwards still counts as the first
    enter_answer(&mut engine);
    engine.check();
    assert_eq!(engine.points(), 2);
}

// ── Construction errors ────────────────────────────────────────────────

#[test]
fn empty_pool_fails_before_start_game() {
    let mut engine =
        GameEngine::with_levels(GameConfig::default(), vec![LevelPool::new(vec![])]).unwrap();
    let events = record_events(&mut engine);
    assert_eq!(engine.new_game(0), Err(ConfigError::EmptyPool { level: 0 }));
    assert_eq!(engine.state(), GameState::LevelSelection);
    assert!(events.borrow().is_empty());
}

#[test]
fn pool_too_small_for_level_length() {
    let config = GameConfig {
        challenges_per_level: 4,
        ..Default::default()
    };
    let level = LevelPool::new(vec![&R_2H2_O2_2H2O, &R_N2_3H2_2NH3, &R_C_O2_CO2]);
    let mut engine = GameEngine::with_levels(config, vec![level]).unwrap();
    assert_eq!(
        engine.new_game(0),
        Err(ConfigError::PoolTooSmall {
            level: 0,
            available: 3,
            required: 4
        })
    );
    assert_eq!(engine.state(), GameState::LevelSelection);
}

// ── Best times ─────────────────────────────────────────────────────────

#[test]
fn perfect_run_records_best_time() {
    let mut engine = three_challenge_engine(true);
    play_perfect(&mut engine, 30.0);
    assert!(engine.is_perfect_score());
    assert!(engine.is_new_best_time());
    assert!((engine.elapsed_time() - 30.0).abs() < 1e-9);
    // not committed until acknowledged
    assert_eq!(engine.best_time(0), Some(BestTime::default()));

    engine.acknowledge();
    let best = engine.best_time(0).unwrap();
    assert!(best.perfect);
    assert!((best.elapsed.unwrap() - 30.0).abs() < 1e-9);
}

#[test]
fn only_strictly_faster_run_replaces_best() {
    let mut engine = three_challenge_engine(true);
    play_perfect(&mut engine, 30.0);
    engine.acknowledge();

    play_perfect(&mut engine, 45.0);
    assert!(!engine.is_new_best_time());
    engine.acknowledge();
    assert!((engine.best_time(0).unwrap().elapsed.unwrap() - 30.0).abs() < 1e-9);

    play_perfect(&mut engine, 21.0);
    assert!(engine.is_new_best_time());
    engine.acknowledge();
    assert!((engine.best_time(0).unwrap().elapsed.unwrap() - 21.0).abs() < 1e-9);
}

#[test]
fn timer_disabled_records_perfect_without_time() {
    let mut engine = three_challenge_engine(false);
    play_perfect(&mut engine, 30.0);
    assert_eq!(engine.elapsed_time(), 0.0);
    assert!(!engine.is_new_best_time());
    engine.acknowledge();
    assert_eq!(
        engine.best_time(0),
        Some(BestTime {
            elapsed: None,
            perfect: true
        })
    );
}

#[test]
fn new_game_waits_for_acknowledge() {
    let mut engine = three_challenge_engine(true);
    play_perfect(&mut engine, 10.0);
    assert_eq!(engine.new_game(0), Ok(false));
    assert_eq!(engine.state(), GameState::LevelCompleted);
    assert_eq!(engine.best_time(0), Some(BestTime::default()));

    assert!(engine.acknowledge());
    assert!(engine.perfect_score(0));
    assert_eq!(engine.new_game(0), Ok(true));
    assert_eq!(engine.state(), GameState::StartGame);
}

#[test]
fn non_finite_ticks_leave_best_time_intact() {
    let mut engine = three_challenge_engine(true);
    start(&mut engine);
    engine.tick(f64::NAN);
    engine.tick(f64::INFINITY);
    assert_eq!(engine.elapsed_time(), 0.0);
    assert!(engine.abandon());

    play_perfect(&mut engine, 21.0);
    engine.acknowledge();
    assert_eq!(engine.best_time(0).and_then(|b| b.elapsed), Some(21.0));
    play_perfect(&mut engine, 12.0);
    engine.acknowledge();
    assert_eq!(engine.best_time(0).and_then(|b| b.elapsed), Some(12.0));
}

#[test]
fn abandon_never_touches_best_times() {
    let mut engine = three_challenge_engine(true);
    play_perfect(&mut engine, 30.0);
    engine.acknowledge();
    let before = engine.best_time(0);

    start(&mut engine);
    engine.tick(1.0);
    enter_answer(&mut engine);
    engine.check();
    assert!(engine.abandon());
    assert_eq!(engine.state(), GameState::LevelSelection);
    assert_eq!(engine.best_time(0), before);
    assert_eq!(engine.points(), 0);
    assert!(!engine.abandon());
}

// ── Notifications ──────────────────────────────────────────────────────

#[test]
fn observers_fire_in_registration_order() {
    let mut engine = three_challenge_engine(false);
    let order = Rc::new(RefCell::new(Vec::new()));
    for tag in ["first", "second"] {
        let sink = Rc::clone(&order);
        engine.subscribe(move |_| sink.borrow_mut().push(tag));
    }
    engine.new_game(0).unwrap();
    let order = order.borrow();
    assert!(!order.is_empty());
    for pair in order.chunks(2) {
        assert_eq!(pair, ["first", "second"]);
    }
}

#[test]
fn events_carry_updated_values() {
    let mut engine = three_challenge_engine(false);
    let events = record_events(&mut engine);
    start(&mut engine);
    assert_eq!(
        *events.borrow(),
        vec![
            GameEvent::StateChanged {
                from: GameState::LevelSelection,
                to: GameState::StartGame
            },
            GameEvent::PointsChanged(0),
            GameEvent::ElapsedTimeChanged(0.0),
            GameEvent::StateChanged {
                from: GameState::StartGame,
                to: GameState::Check
            },
            GameEvent::EquationChanged { index: 0 },
            GameEvent::CoefficientsChanged {
                balanced: false,
                sum: 0
            },
        ]
    );

    events.borrow_mut().clear();
    enter_answer(&mut engine);
    engine.check();
    let events = events.borrow();
    assert!(events.contains(&GameEvent::PointsChanged(2)));
    assert_eq!(
        events.last(),
        Some(&GameEvent::StateChanged {
            from: GameState::Check,
            to: GameState::Next
        })
    );
}

#[test]
fn unsubscribed_listener_stops_receiving() {
    let mut engine = three_challenge_engine(false);
    let events = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&events);
    let id = engine.subscribe(move |_| *sink.borrow_mut() += 1);
    engine.new_game(0).unwrap();
    let seen = *events.borrow();
    assert!(engine.unsubscribe(id));
    engine.start_game();
    assert_eq!(*events.borrow(), seen);
}
