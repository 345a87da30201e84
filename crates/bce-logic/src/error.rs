//! Error types for equation construction, balancing, and game setup.
//!
//! Only broken content is an error here. Wrong guesses are ordinary state
//! transitions and out-of-range coefficient edits are clamped, so neither
//! appears in these enums.

use thiserror::Error;

/// Failures of the null-space balancer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BalanceError {
    /// One side of the equation has no molecules.
    #[error("equation has no {0}")]
    EmptySide(&'static str),

    /// Only the all-zero assignment conserves atoms.
    #[error("no nontrivial coefficient set conserves atoms")]
    NoSolution,

    /// The conservation system leaves more than one degree of freedom.
    #[error("coefficients are not unique up to scale (null space dimension {dimension})")]
    NotUnique { dimension: usize },

    /// The unique solution needs a zero or negative coefficient.
    #[error("conserving coefficients are not all positive: {coefficients:?}")]
    NonPositive { coefficients: Vec<i64> },

    /// Intermediate values left the i64 range.
    #[error("integer overflow during row reduction")]
    Overflow,
}

/// Fatal configuration and content errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A reaction's canonical coefficients do not conserve an element.
    #[error("reaction {reaction} does not conserve {element}: {reactant_count} vs {product_count}")]
    NotConserved {
        reaction: String,
        element: &'static str,
        reactant_count: u64,
        product_count: u64,
    },

    /// A reaction's molecules cannot be balanced at all.
    #[error("reaction {reaction} cannot be balanced: {source}")]
    Unbalanceable {
        reaction: String,
        #[source]
        source: BalanceError,
    },

    /// A reaction's canonical coefficients are not the minimal tuple.
    #[error("reaction {reaction} has coefficients {declared:?}, expected minimal {minimal:?}")]
    NotMinimal {
        reaction: String,
        declared: Vec<u32>,
        minimal: Vec<u32>,
    },

    /// A canonical coefficient is zero.
    #[error("reaction {reaction} has a zero coefficient")]
    ZeroCoefficient { reaction: String },

    /// A reaction has no reactants or no products.
    #[error("reaction {reaction} is missing its {side}")]
    EmptySide {
        reaction: String,
        side: &'static str,
    },

    /// A canonical coefficient cannot be entered with the configured range.
    #[error("reaction {reaction} needs coefficient {coefficient}, above the maximum of {max}")]
    CoefficientOutOfRange {
        reaction: String,
        coefficient: u32,
        max: u32,
    },

    /// Level index outside the configured levels.
    #[error("level {level} is out of range (have {levels} levels)")]
    InvalidLevel { level: usize, levels: usize },

    /// The selected level has no reactions.
    #[error("level {level} has an empty challenge pool")]
    EmptyPool { level: usize },

    /// The selected level cannot supply enough distinct challenges.
    #[error("level {level} can supply only {available} of {required} challenges")]
    PoolTooSmall {
        level: usize,
        available: usize,
        required: usize,
    },

    /// A state name or discriminant that maps to no game state.
    #[error("unrecognized game state: {0}")]
    UnknownState(String),

    /// The coefficient range is empty or wider than a picker can offer.
    #[error("max coefficient must be between 1 and {limit} (got {value})")]
    InvalidMaxCoefficient { value: u32, limit: u32 },

    /// Levels need at least one challenge.
    #[error("challenges per level must be at least 1")]
    NoChallenges,

    /// More challenges per level than any pool can supply.
    #[error("challenges per level must be at most {limit} (got {value})")]
    TooManyChallenges { value: usize, limit: usize },

    /// A point award above the supported maximum.
    #[error("points per challenge must be at most {limit} (got {value})")]
    PointsTooLarge { value: u32, limit: u32 },

    /// Scoring must order first attempt above retry above reveal.
    #[error("scoring must satisfy first ({first}) > second ({second}) > 0")]
    InvalidScoring { first: u32, second: u32 },

    /// No levels were supplied to the engine.
    #[error("game has no levels")]
    NoLevels,

    /// The JSON configuration could not be parsed.
    #[error("failed to parse game configuration: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e.to_string())
    }
}
