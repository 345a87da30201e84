//! Game engine: challenge flow, scoring, and best times.
//!
//! One [`GameEngine`] owns the level pools and the per-level best times for
//! the life of the process. A game session exists from `new_game` until the
//! engine returns to [`GameState::LevelSelection`].
//!
//! ```text
//! LEVEL_SELECTION ─new_game─▶ START_GAME ─start_game─▶ CHECK
//! CHECK ─check─▶ NEXT | TRY_AGAIN
//! TRY_AGAIN ─try_again─▶ CHECK        (second wrong check ─▶ SHOW_ANSWER)
//! SHOW_ANSWER ─show_answer─▶ NEXT
//! NEXT ─next─▶ CHECK | LEVEL_COMPLETED ─acknowledge─▶ LEVEL_SELECTION
//! ```
//!
//! Events sent in a state that does not accept them are ignored and return
//! `false`.

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::config::{validate_config, GameConfig};
use crate::equation::{Equation, EquationView, Side};
use crate::error::ConfigError;
use crate::events::{Notifier, SubscriptionId};
use crate::pool::{default_levels, ChallengePool, LevelPool};
use crate::reactions::validate_catalog;

// ============================================================================
// STATES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameState {
    LevelSelection = 0,
    StartGame = 1,
    Check = 2,
    TryAgain = 3,
    ShowAnswer = 4,
    Next = 5,
    LevelCompleted = 6,
}

impl GameState {
    pub fn all() -> &'static [GameState] {
        &[
            GameState::LevelSelection,
            GameState::StartGame,
            GameState::Check,
            GameState::TryAgain,
            GameState::ShowAnswer,
            GameState::Next,
            GameState::LevelCompleted,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameState::LevelSelection => "LEVEL_SELECTION",
            GameState::StartGame => "START_GAME",
            GameState::Check => "CHECK",
            GameState::TryAgain => "TRY_AGAIN",
            GameState::ShowAnswer => "SHOW_ANSWER",
            GameState::Next => "NEXT",
            GameState::LevelCompleted => "LEVEL_COMPLETED",
        }
    }

    /// States between `new_game` and `LEVEL_COMPLETED`.
    pub fn is_in_progress(&self) -> bool {
        !matches!(self, GameState::LevelSelection | GameState::LevelCompleted)
    }

    /// States in which the player may edit coefficients.
    pub fn accepts_edits(&self) -> bool {
        matches!(self, GameState::Check | GameState::TryAgain)
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameState {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameState::all()
            .iter()
            .copied()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownState(s.to_string()))
    }
}

impl TryFrom<u8> for GameState {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        GameState::all()
            .get(value as usize)
            .copied()
            .ok_or_else(|| ConfigError::UnknownState(value.to_string()))
    }
}

// ============================================================================
// SESSION DATA
// ============================================================================

/// How a finished challenge was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChallengeOutcome {
    FirstAttempt,
    SecondAttempt,
    Revealed,
}

/// Best result recorded for one level.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BestTime {
    /// Fastest perfect run in seconds, only recorded with the timer enabled.
    pub elapsed: Option<f64>,
    /// At least one perfect run has been completed.
    pub perfect: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    StateChanged { from: GameState, to: GameState },
    EquationChanged { index: usize },
    CoefficientsChanged { balanced: bool, sum: u32 },
    PointsChanged(u32),
    ElapsedTimeChanged(f64),
    BestTimeUpdated { level: usize, elapsed: Option<f64> },
}

/// Serializable read model of the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub state: GameState,
    pub level: Option<usize>,
    pub points: u32,
    pub equation_index: usize,
    pub number_of_equations: usize,
    pub elapsed_time: f64,
    pub timer_enabled: bool,
    pub outcomes: Vec<ChallengeOutcome>,
    pub equation: Option<EquationView>,
    pub best_times: Vec<BestTime>,
}

#[derive(Debug)]
struct GameSession {
    pool: ChallengePool,
    index: usize,
    attempts: u32,
    points: u32,
    outcomes: Vec<ChallengeOutcome>,
    elapsed: f64,
    timer_running: bool,
    new_best_time: bool,
}

impl GameSession {
    fn new(pool: ChallengePool) -> Self {
        Self {
            pool,
            index: 0,
            attempts: 0,
            points: 0,
            outcomes: Vec::new(),
            elapsed: 0.0,
            timer_running: false,
            new_best_time: false,
        }
    }

    fn equation(&self) -> Option<&Equation> {
        self.pool.equation(self.index)
    }

    fn equation_mut(&mut self) -> Option<&mut Equation> {
        self.pool.equation_mut(self.index)
    }
}

// ============================================================================
// ENGINE
// ============================================================================

pub struct GameEngine {
    config: GameConfig,
    levels: Vec<LevelPool>,
    state: GameState,
    session: Option<GameSession>,
    best_times: Vec<BestTime>,
    rng: StdRng,
    notifier: Notifier<GameEvent>,
}

impl GameEngine {
    /// Engine over the built-in levels.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::with_levels(config, default_levels())
    }

    /// Engine over custom level pools. Every reaction in every pool is
    /// checked against the balancer before the engine is returned.
    pub fn with_levels(config: GameConfig, levels: Vec<LevelPool>) -> Result<Self, ConfigError> {
        if let Some(err) = validate_config(&config).into_iter().next() {
            log::error!("invalid game configuration: {}", err);
            return Err(err);
        }
        if levels.is_empty() {
            return Err(ConfigError::NoLevels);
        }
        for pool in &levels {
            validate_catalog(&pool.reactions, config.max_coefficient)?;
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        log::debug!(
            "game engine ready: {} levels, {} challenges per level",
            levels.len(),
            config.challenges_per_level
        );
        Ok(Self {
            best_times: vec![BestTime::default(); levels.len()],
            config,
            levels,
            state: GameState::LevelSelection,
            session: None,
            rng,
            notifier: Notifier::new(),
        })
    }

    // ── Observables ─────────────────────────────────────────────────────

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn number_of_levels(&self) -> usize {
        self.levels.len()
    }

    /// Level of the current session, if any.
    pub fn level(&self) -> Option<usize> {
        self.session.as_ref().map(|s| s.pool.level())
    }

    pub fn points(&self) -> u32 {
        self.session.as_ref().map_or(0, |s| s.points)
    }

    pub fn current_equation_index(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.index)
    }

    pub fn number_of_equations(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.pool.len())
    }

    pub fn elapsed_time(&self) -> f64 {
        self.session.as_ref().map_or(0.0, |s| s.elapsed)
    }

    pub fn outcomes(&self) -> &[ChallengeOutcome] {
        self.session
            .as_ref()
            .map(|s| s.outcomes.as_slice())
            .unwrap_or(&[])
    }

    /// The equation being solved, once the session has started.
    pub fn current_equation(&self) -> Option<&Equation> {
        match self.state {
            GameState::LevelSelection | GameState::StartGame => None,
            _ => self.session.as_ref().and_then(|s| s.equation()),
        }
    }

    pub fn best_time(&self, level: usize) -> Option<BestTime> {
        self.best_times.get(level).copied()
    }

    pub fn best_times(&self) -> &[BestTime] {
        &self.best_times
    }

    /// Whether a perfect run has ever been completed on `level`.
    pub fn perfect_score(&self, level: usize) -> bool {
        self.best_times.get(level).is_some_and(|b| b.perfect)
    }

    /// Every challenge so far answered on the first attempt, with the whole
    /// level played.
    pub fn is_perfect_score(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.outcomes.len() == s.pool.len() && s.points == self.max_points(s))
    }

    /// Set when the finished level beat the recorded best time.
    pub fn is_new_best_time(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.new_best_time)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            state: self.state,
            level: self.level(),
            points: self.points(),
            equation_index: self.current_equation_index(),
            number_of_equations: self.number_of_equations(),
            elapsed_time: self.elapsed_time(),
            timer_enabled: self.config.timer_enabled,
            outcomes: self.outcomes().to_vec(),
            equation: self.current_equation().map(Equation::view),
            best_times: self.best_times.clone(),
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&GameEvent) + 'static) -> SubscriptionId {
        self.notifier.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    // ── Actions ─────────────────────────────────────────────────────────

    /// Build the challenge pool for `level` and enter START_GAME.
    ///
    /// A game in progress is abandoned first. Returns `Ok(false)` in
    /// LEVEL_COMPLETED, which only [`acknowledge`](Self::acknowledge) leaves.
    /// On error the engine stays in LEVEL_SELECTION.
    pub fn new_game(&mut self, level: usize) -> Result<bool, ConfigError> {
        match self.state {
            GameState::LevelCompleted => {
                log::debug!("ignoring new_game in {}", self.state);
                return Ok(false);
            }
            s if s.is_in_progress() => self.discard_session(),
            _ => {}
        }

        let result = self.build_pool(level).map(|pool| {
            self.session = Some(GameSession::new(pool));
            self.set_state(GameState::StartGame);
            self.notifier.push(GameEvent::PointsChanged(0));
            self.notifier.push(GameEvent::ElapsedTimeChanged(0.0));
            true
        });
        if let Err(err) = &result {
            log::error!("cannot start level {}: {}", level, err);
        }
        self.notifier.flush();
        result
    }

    /// Load the first challenge and start the timer.
    pub fn start_game(&mut self) -> bool {
        if !self.accepts("start_game", &[GameState::StartGame]) {
            return false;
        }
        if let Some(session) = self.session.as_mut() {
            session.timer_running = self.config.timer_enabled;
        }
        self.set_state(GameState::Check);
        self.notifier.push(GameEvent::EquationChanged { index: 0 });
        self.push_coefficients();
        self.notifier.flush();
        true
    }

    /// Set a coefficient on the current equation; returns the clamped value.
    pub fn set_coefficient(&mut self, side: Side, index: usize, value: i64) -> Option<u32> {
        if !self.state.accepts_edits() {
            log::debug!("ignoring coefficient edit in {}", self.state);
            return None;
        }
        let stored = self
            .session
            .as_mut()
            .and_then(|s| s.equation_mut())
            .and_then(|e| e.set_coefficient(side, index, value))?;
        self.push_coefficients();
        self.notifier.flush();
        Some(stored)
    }

    /// Submit the current coefficients.
    pub fn check(&mut self) -> bool {
        if !self.accepts("check", &[GameState::Check]) {
            return false;
        }
        let first = self.config.points_first_attempt;
        let second = self.config.points_second_attempt;
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let Some(correct) = session
            .equation()
            .filter(|e| e.coefficients_sum() > 0)
            .map(Equation::is_balanced_and_simplified)
        else {
            log::debug!("ignoring check with no coefficients entered");
            return false;
        };

        session.attempts += 1;
        let attempts = session.attempts;
        if correct {
            let (outcome, award) = if attempts == 1 {
                (ChallengeOutcome::FirstAttempt, first)
            } else {
                (ChallengeOutcome::SecondAttempt, second)
            };
            session.points = session.points.saturating_add(award);
            session.outcomes.push(outcome);
            let points = session.points;
            log::debug!("challenge {} correct ({:?}), {} points", session.index, outcome, points);
            self.notifier.push(GameEvent::PointsChanged(points));
            self.enter_next();
        } else if attempts == 1 {
            self.set_state(GameState::TryAgain);
        } else {
            self.set_state(GameState::ShowAnswer);
        }
        self.notifier.flush();
        true
    }

    /// Dismiss wrong-answer feedback and edit again.
    pub fn try_again(&mut self) -> bool {
        if !self.accepts("try_again", &[GameState::TryAgain]) {
            return false;
        }
        self.set_state(GameState::Check);
        self.notifier.flush();
        true
    }

    /// Reveal the answer after a second wrong attempt. Scores nothing.
    pub fn show_answer(&mut self) -> bool {
        if !self.accepts("show_answer", &[GameState::ShowAnswer]) {
            return false;
        }
        if let Some(session) = self.session.as_mut() {
            session.outcomes.push(ChallengeOutcome::Revealed);
        }
        self.enter_next();
        self.notifier.flush();
        true
    }

    /// Advance to the next challenge, or complete the level.
    pub fn next(&mut self) -> bool {
        if !self.accepts("next", &[GameState::Next]) {
            return false;
        }
        let Some(session) = self.session.as_ref() else {
            return false;
        };

        if session.index + 1 < session.pool.len() {
            let index = session.index + 1;
            if let Some(session) = self.session.as_mut() {
                session.index = index;
                session.attempts = 0;
            }
            self.set_state(GameState::Check);
            self.notifier.push(GameEvent::EquationChanged { index });
            self.push_coefficients();
        } else {
            let level = session.pool.level();
            let elapsed = session.elapsed;
            let perfect = session.points == self.max_points(session);
            let new_best = perfect
                && self.config.timer_enabled
                && self.best_times[level].elapsed.map_or(true, |best| elapsed < best);
            if let Some(session) = self.session.as_mut() {
                session.timer_running = false;
                session.new_best_time = new_best;
            }
            log::info!(
                "level {} completed: {} points in {:.1}s{}",
                level,
                self.points(),
                elapsed,
                if new_best { " (new best time)" } else { "" }
            );
            self.set_state(GameState::LevelCompleted);
        }
        self.notifier.flush();
        true
    }

    /// Leave the completed level and record its result.
    pub fn acknowledge(&mut self) -> bool {
        if !self.accepts("acknowledge", &[GameState::LevelCompleted]) {
            return false;
        }
        self.finish_level();
        self.notifier.flush();
        true
    }

    /// Drop the game in progress without recording anything.
    pub fn abandon(&mut self) -> bool {
        if !self.state.is_in_progress() {
            log::debug!("ignoring abandon in {}", self.state);
            return false;
        }
        self.discard_session();
        self.notifier.flush();
        true
    }

    /// Advance the level timer by `dt` seconds. Non-finite or non-positive
    /// steps are dropped.
    pub fn tick(&mut self, dt: f64) {
        if !self.config.timer_enabled || !dt.is_finite() || dt <= 0.0 {
            return;
        }
        if let Some(session) = self.session.as_mut().filter(|s| s.timer_running) {
            session.elapsed += dt;
            let elapsed = session.elapsed;
            self.notifier.push(GameEvent::ElapsedTimeChanged(elapsed));
            self.notifier.flush();
        }
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn max_points(&self, session: &GameSession) -> u32 {
        let challenges = u32::try_from(session.pool.len()).unwrap_or(u32::MAX);
        self.config.points_first_attempt.saturating_mul(challenges)
    }

    fn accepts(&self, event: &str, states: &[GameState]) -> bool {
        let ok = states.contains(&self.state);
        if !ok {
            log::debug!("ignoring {} in {}", event, self.state);
        }
        ok
    }

    fn set_state(&mut self, to: GameState) {
        let from = self.state;
        if from == to {
            return;
        }
        log::debug!("{} -> {}", from, to);
        self.state = to;
        self.notifier.push(GameEvent::StateChanged { from, to });
    }

    fn push_coefficients(&mut self) {
        if let Some(equation) = self.session.as_ref().and_then(|s| s.equation()) {
            self.notifier.push(GameEvent::CoefficientsChanged {
                balanced: equation.is_balanced(),
                sum: equation.coefficients_sum(),
            });
        }
    }

    /// Enter NEXT with the answer shown.
    fn enter_next(&mut self) {
        if let Some(equation) = self.session.as_mut().and_then(|s| s.equation_mut()) {
            equation.balance();
        }
        self.push_coefficients();
        self.set_state(GameState::Next);
    }

    fn build_pool(&mut self, level: usize) -> Result<ChallengePool, ConfigError> {
        let pool = self.levels.get(level).ok_or(ConfigError::InvalidLevel {
            level,
            levels: self.levels.len(),
        })?;
        ChallengePool::build(
            pool,
            level,
            self.config.challenges_per_level,
            self.config.max_coefficient,
            &mut self.rng,
        )
    }

    fn discard_session(&mut self) {
        if let Some(session) = self.session.take() {
            log::debug!(
                "abandoning level {} at challenge {}",
                session.pool.level(),
                session.index
            );
        }
        self.set_state(GameState::LevelSelection);
    }

    /// Commit the completed session's result and return to level selection.
    fn finish_level(&mut self) {
        if let Some(session) = self.session.take() {
            let level = session.pool.level();
            let perfect = session.points == self.max_points(&session);
            if perfect {
                let best = &mut self.best_times[level];
                let before = *best;
                best.perfect = true;
                if session.new_best_time {
                    best.elapsed = Some(session.elapsed);
                }
                if *best != before {
                    log::info!("level {} best updated: {:?}", level, best.elapsed);
                    self.notifier.push(GameEvent::BestTimeUpdated {
                        level,
                        elapsed: best.elapsed,
                    });
                }
            }
        }
        self.set_state(GameState::LevelSelection);
    }
}

impl fmt::Debug for GameEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameEngine")
            .field("state", &self.state)
            .field("levels", &self.levels.len())
            .field("session", &self.session)
            .field("best_times", &self.best_times)
            .finish_non_exhaustive()
    }
}
