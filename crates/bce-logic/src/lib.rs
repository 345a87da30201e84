//! Pure logic for the chemical equation balancing game.
//!
//! This crate contains all model logic that is independent of any UI,
//! renderer, or runtime. Equations, the balancer, and the game engine take
//! plain data and return results, so the whole game is unit-testable and a
//! presentation layer only has to subscribe to events and draw snapshots.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`balancer`] | Minimal integer coefficients by exact null-space computation |
//! | [`config`] | Game settings (range, scoring, timer, seed) and validation |
//! | [`elements`] | The eight elements used by the reactions |
//! | [`equation`] | Equations, terms, balanced / simplified checks, view models |
//! | [`error`] | Configuration and balancing error types |
//! | [`events`] | Synchronous observer registry for model-to-view updates |
//! | [`game`] | Game state machine, scoring, timer, and best times |
//! | [`introduction`] | Free-play model for the three introduction equations |
//! | [`molecule`] | Static molecule table with atom composition |
//! | [`pool`] | Per-level reaction pools and challenge selection |
//! | [`reactions`] | Reaction catalog grouped by family |

pub mod balancer;
pub mod config;
pub mod elements;
pub mod equation;
pub mod error;
pub mod events;
pub mod game;
pub mod introduction;
pub mod molecule;
pub mod pool;
pub mod reactions;

pub use config::GameConfig;
pub use equation::{Equation, Side};
pub use error::{BalanceError, ConfigError};
pub use game::{GameEngine, GameEvent, GameState};
