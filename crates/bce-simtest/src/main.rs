//! BCE Headless Game Harness
//!
//! Validates the reaction catalog, the balancer, and the game engine
//! without any presentation layer. Runs entirely in-process.
//!
//! Usage:
//!   cargo run -p bce-simtest
//!   cargo run -p bce-simtest -- --verbose

use bce_logic::balancer;
use bce_logic::config::{validate_config, GameConfig};
use bce_logic::equation::Side;
use bce_logic::error::BalanceError;
use bce_logic::game::{ChallengeOutcome, GameEngine, GameState};
use bce_logic::introduction::IntroductionModel;
use bce_logic::molecule::{CARBON, CO2, H2, H2O, O2};
use bce_logic::pool::default_levels;
use bce_logic::reactions::{validate_catalog, ReactionFamily, CATALOG};
use rand::rngs::StdRng;
use rand::SeedableRng;

// ── Game configuration (same defaults a front end would ship) ───────────
const CONFIG_JSON: &str = include_str!("../../../data/game_config.json");

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if verbose { "debug" } else { "warn" }),
    )
    .init();
    println!("=== BCE Game Harness ===\n");

    let mut results = Vec::new();

    // 1. Configuration file
    let config = match GameConfig::from_json(CONFIG_JSON) {
        Ok(c) => c,
        Err(e) => {
            println!("  ✗ config_parse: {}", e);
            std::process::exit(1);
        }
    };
    log::info!("loaded game config: {:?}", config);
    results.extend(validate_game_config(&config));

    // 2. Reaction catalog
    results.extend(validate_reaction_catalog(&config, verbose));

    // 3. Balancer edge cases
    results.extend(validate_balancer());

    // 4. Level pools
    results.extend(validate_level_pools(&config, verbose));

    // 5. Scripted games
    results.extend(validate_playthrough(&config, verbose));

    // 6. Introduction screen
    results.extend(validate_introduction());

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Game Config ──────────────────────────────────────────────────────

fn validate_game_config(config: &GameConfig) -> Vec<TestResult> {
    println!("--- Game Config ---");
    let errors = validate_config(config);
    vec![
        TestResult {
            name: "config_valid".into(),
            passed: errors.is_empty(),
            detail: if errors.is_empty() {
                format!(
                    "range 0..={}, {} challenges, {}/{} points, timer {}",
                    config.max_coefficient,
                    config.challenges_per_level,
                    config.points_first_attempt,
                    config.points_second_attempt,
                    if config.timer_enabled { "on" } else { "off" }
                )
            } else {
                format!("{:?}", errors)
            },
        },
        TestResult {
            name: "config_seeded".into(),
            passed: config.seed.is_some(),
            detail: format!("seed {:?}", config.seed),
        },
    ]
}

// ── 2. Reaction Catalog ─────────────────────────────────────────────────

fn validate_reaction_catalog(config: &GameConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Reaction Catalog ---");
    let mut results = Vec::new();

    let outcome = validate_catalog(CATALOG, config.max_coefficient);
    results.push(TestResult {
        name: "catalog_matches_balancer".into(),
        passed: outcome.is_ok(),
        detail: match &outcome {
            Ok(()) => format!("{} reactions agree with the balancer", CATALOG.len()),
            Err(e) => e.to_string(),
        },
    });

    let mut ids: Vec<&str> = CATALOG.iter().map(|r| r.id).collect();
    ids.sort_unstable();
    ids.dedup();
    results.push(TestResult {
        name: "catalog_unique_ids".into(),
        passed: ids.len() == CATALOG.len(),
        detail: format!("{} distinct ids", ids.len()),
    });

    for family in [
        ReactionFamily::Synthesis,
        ReactionFamily::Decomposition,
        ReactionFamily::Displacement,
    ] {
        let count = CATALOG.iter().filter(|r| r.family == family).count();
        results.push(TestResult {
            name: format!("catalog_{:?}", family).to_lowercase(),
            passed: count > 0,
            detail: format!("{} reactions", count),
        });
    }

    if verbose {
        println!("  Catalog:");
        for r in CATALOG {
            if let Ok(equation) = r.equation(config.max_coefficient) {
                println!("    {:14} {}", format!("{:?}", r.family), equation);
            }
        }
    }

    results
}

// ── 3. Balancer ─────────────────────────────────────────────────────────

fn validate_balancer() -> Vec<TestResult> {
    println!("--- Balancer ---");
    let mut results = Vec::new();

    let water = balancer::solve(&[&H2, &O2], &[&H2O]);
    results.push(TestResult {
        name: "balancer_water".into(),
        passed: water == Ok(vec![2, 1, 2]),
        detail: format!("{:?}", water),
    });

    // Two independent combustions
    let coupled = balancer::solve(&[&H2, &O2, &CARBON], &[&H2O, &CO2]);
    results.push(TestResult {
        name: "balancer_rejects_underdetermined".into(),
        passed: matches!(coupled, Err(BalanceError::NotUnique { .. })),
        detail: format!("{:?}", coupled),
    });

    let impossible = balancer::solve(&[&CARBON], &[&O2]);
    results.push(TestResult {
        name: "balancer_rejects_overdetermined".into(),
        passed: impossible.is_err(),
        detail: format!("{:?}", impossible),
    });

    results
}

// ── 4. Level Pools ──────────────────────────────────────────────────────

fn validate_level_pools(config: &GameConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Level Pools ---");
    let mut results = Vec::new();
    let seeds = 200u64;

    for (level, pool) in default_levels().iter().enumerate() {
        let mut failures = Vec::new();
        let mut large_max = 0;
        for seed in 0..seeds {
            let mut rng = StdRng::seed_from_u64(seed);
            let picked = match pool.select(level, config.challenges_per_level, &mut rng) {
                Ok(p) => p,
                Err(e) => {
                    failures.push(format!("seed {}: {}", seed, e));
                    continue;
                }
            };
            let repeated = picked.iter().enumerate().any(|(i, a)| {
                picked[i + 1..]
                    .iter()
                    .any(|b| a.id == b.id || a.is_reverse_of(b))
            });
            if repeated {
                failures.push(format!("seed {}: duplicate or reverse pair", seed));
            }
            let large = picked.iter().filter(|r| r.has_large_molecule()).count();
            large_max = large_max.max(large);
            if pool.max_large_molecules.is_some_and(|max| large > max) {
                failures.push(format!("seed {}: {} large-molecule challenges", seed, large));
            }
        }

        results.push(TestResult {
            name: format!("pool_level_{}", level),
            passed: failures.is_empty(),
            detail: if failures.is_empty() {
                format!(
                    "{} seeds ok, {} candidates, at most {} large",
                    seeds,
                    pool.reactions.len(),
                    large_max
                )
            } else {
                failures.join("; ")
            },
        });
        if verbose {
            println!(
                "  level {}: {} candidates, cap {:?}",
                level,
                pool.reactions.len(),
                pool.max_large_molecules
            );
        }
    }

    results
}

// ── 5. Scripted Games ───────────────────────────────────────────────────

fn enter(engine: &mut GameEngine, coefficients: &[u32]) {
    let reactants = engine
        .current_equation()
        .map_or(0, |e| e.reactants().len());
    for (i, &c) in coefficients.iter().enumerate() {
        let (side, index) = if i < reactants {
            (Side::Reactants, i)
        } else {
            (Side::Products, i - reactants)
        };
        engine.set_coefficient(side, index, c as i64);
    }
}

fn answer(engine: &GameEngine, scale: u32) -> Vec<u32> {
    engine.current_equation().map_or(Vec::new(), |e| {
        e.balanced_coefficients().iter().map(|c| c * scale).collect()
    })
}

/// Play one level. `wrong_first` marks challenges answered wrong once
/// before the correct answer; the doubled answer must fit the range.
fn play_level(engine: &mut GameEngine, level: usize, wrong_first: &[usize]) -> Result<(), String> {
    if !engine.new_game(level).map_err(|e| e.to_string())? {
        return Err(format!("new_game ignored in {}", engine.state()));
    }
    engine.start_game();
    for index in 0..engine.number_of_equations() {
        engine.tick(4.0);
        if wrong_first.contains(&index) {
            // balanced but not simplified
            let doubled = answer(engine, 2);
            enter(engine, &doubled);
            engine.check();
            if engine.state() == GameState::TryAgain {
                engine.try_again();
            }
        }
        let correct = answer(engine, 1);
        enter(engine, &correct);
        engine.check();
        if engine.state() != GameState::Next {
            return Err(format!("challenge {} stuck in {}", index, engine.state()));
        }
        engine.next();
    }
    Ok(())
}

fn validate_playthrough(config: &GameConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Scripted Games ---");
    let mut results = Vec::new();

    let mut engine = match GameEngine::new(config.clone()) {
        Ok(e) => e,
        Err(e) => {
            results.push(TestResult {
                name: "engine_new".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };

    for level in 0..engine.number_of_levels() {
        let played = play_level(&mut engine, level, &[]);
        let perfect = engine.is_perfect_score();
        let points = engine.points();
        let new_best = engine.is_new_best_time();
        if verbose {
            if let Ok(json) = serde_json::to_string_pretty(&engine.snapshot()) {
                println!("  level {} snapshot:\n{}", level, json);
            }
        }
        engine.acknowledge();
        let best = engine.best_time(level).unwrap_or_default();
        results.push(TestResult {
            name: format!("game_level_{}_perfect", level),
            passed: played.is_ok()
                && perfect
                && points == config.perfect_points()
                && new_best == config.timer_enabled
                && best.perfect,
            detail: match played {
                Ok(()) => format!("{} points, best {:?}", points, best.elapsed),
                Err(e) => e,
            },
        });
    }

    // A retry costs a point and leaves the recorded best alone
    let before = engine.best_time(0);
    let played = play_level(&mut engine, 0, &[1]);
    let outcomes = engine.outcomes().to_vec();
    let points = engine.points();
    engine.acknowledge();
    results.push(TestResult {
        name: "game_retry_not_perfect".into(),
        passed: played.is_ok()
            && outcomes.get(1) == Some(&ChallengeOutcome::SecondAttempt)
            && points + 1 == config.perfect_points()
            && engine.best_time(0) == before,
        detail: format!("{} points, outcomes {:?}", points, outcomes),
    });

    // Abandoning mid-level returns to selection without side effects
    let abandoned = engine.new_game(1) == Ok(true) && engine.start_game() && engine.abandon();
    results.push(TestResult {
        name: "game_abandon".into(),
        passed: abandoned && engine.state() == GameState::LevelSelection,
        detail: format!("state {}", engine.state()),
    });

    results
}

// ── 6. Introduction ─────────────────────────────────────────────────────

fn validate_introduction() -> Vec<TestResult> {
    println!("--- Introduction ---");
    let mut results = Vec::new();

    let mut model = match IntroductionModel::new() {
        Ok(m) => m,
        Err(e) => {
            results.push(TestResult {
                name: "intro_new".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };

    let mut solved = Vec::new();
    for index in 0..model.choices().len() {
        model.select(index);
        let answer = model.current().balanced_coefficients();
        let reactants = model.current().reactants().len();
        for (i, &c) in answer.iter().enumerate() {
            let (side, idx) = if i < reactants {
                (Side::Reactants, i)
            } else {
                (Side::Products, i - reactants)
            };
            model.set_coefficient(side, idx, c as i64);
        }
        if model.current().is_balanced_and_simplified() {
            solved.push(model.label());
        }
    }
    results.push(TestResult {
        name: "intro_all_solvable".into(),
        passed: solved.len() == model.choices().len(),
        detail: solved.join(", "),
    });

    model.reset();
    results.push(TestResult {
        name: "intro_reset".into(),
        passed: model.selected() == 0
            && model
                .choices()
                .iter()
                .all(|c| c.equation.coefficients_sum() == 0),
        detail: format!("selected {}", model.label()),
    });

    results
}
