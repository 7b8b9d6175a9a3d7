//! Error types for resin-ca.

use thiserror::Error;

/// Errors raised while configuring or stepping an automaton.
///
/// Every variant is a construction-time or precondition failure. None of them
/// leave a grid half-stepped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CaError {
    /// Dimensionality selector was not 1 or 2.
    #[error("unsupported number of dimensions {0}, only 1D or 2D automata are supported")]
    InvalidDimensionality(usize),

    /// Neighbourhood input has an unusable number of axes.
    #[error("invalid neighbourhood shape {shape:?}: {reason}")]
    InvalidShape {
        /// Shape of the rejected input.
        shape: Vec<usize>,
        /// What was wrong with it.
        reason: &'static str,
    },

    /// Neighbourhood has an even-length axis, so no unique center cell exists.
    #[error("neighbourhood of shape {shape:?} has no center cell")]
    NoCenter {
        /// Shape of the rejected input.
        shape: Vec<usize>,
    },

    /// A 2D grid needs at least three rows and three columns.
    #[error("invalid grid size {rows}x{cols}, both axes must be at least 3")]
    InvalidGridSize {
        /// Requested rows.
        rows: usize,
        /// Requested columns.
        cols: usize,
    },

    /// A 1D automaton needs at least one generation.
    #[error("invalid generation count {0}, there must be 1 or more generations")]
    InvalidGenerationCount(usize),

    /// Fixed boundary value cannot be compared against cell states.
    #[error("invalid wrap policy: fixed boundary value {0} is not a finite state")]
    InvalidWrapPolicy(f64),

    /// Random seeding asked for more cells than the grid holds.
    #[error("cannot place {requested} cells in a grid of {available}")]
    InsufficientCells {
        /// Total cells requested across all states.
        requested: usize,
        /// Cells available for sampling.
        available: usize,
    },

    /// The state alphabet has no labels.
    #[error("state alphabet must contain at least one state")]
    EmptyAlphabet,

    /// An array did not have the shape the engine expected.
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected `(rows, cols)`.
        expected: (usize, usize),
        /// Actual `(rows, cols)`.
        got: (usize, usize),
    },

    /// A 1D automaton has already filled every allocated generation row.
    #[error("all {generations} generations have been computed")]
    GenerationsExhausted {
        /// Number of generations the grid was allocated for.
        generations: usize,
    },
}

/// Result alias for cellular automaton operations.
pub type Result<T> = std::result::Result<T, CaError>;
