//! Boundary handling shared by the 1D and 2D grids.
//!
//! Each grid keeps a padded copy of its visible cells with one extra
//! column on each side (1D) or one extra ring (2D). Neighbour lookups read
//! the padded copy, so the hot path never branches on edges. The visible
//! grid is authoritative; [`BoundaryGrid::refresh_boundary`] re-derives the
//! padding from it.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::State;
use crate::array::Array2;
use crate::error::{CaError, Result};

/// Boundary value used when wrapping is switched off with `false`.
///
/// Chosen outside any sensible state alphabet so that 2D border cells never
/// count as a neighbour of any state. 1D grids read it as their background
/// state instead.
pub const DEAD_STATE: State = -100.0;

/// What lies beyond the edge of the visible grid.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WrapPolicy {
    /// Toroidal topology: edges see the opposite edge.
    #[default]
    Wrap,
    /// Every border cell holds this value.
    Fixed(State),
}

impl From<bool> for WrapPolicy {
    fn from(wrap: bool) -> Self {
        if wrap {
            WrapPolicy::Wrap
        } else {
            WrapPolicy::Fixed(DEAD_STATE)
        }
    }
}

impl WrapPolicy {
    /// Rejects fixed values that cannot be compared against states.
    pub fn validate(self) -> Result<Self> {
        match self {
            WrapPolicy::Fixed(value) if !value.is_finite() => {
                Err(CaError::InvalidWrapPolicy(value))
            }
            policy => Ok(policy),
        }
    }

    /// Returns true for toroidal wrapping.
    pub fn wraps(self) -> bool {
        matches!(self, WrapPolicy::Wrap)
    }
}

/// Common capability of the 1D and 2D grids.
pub trait BoundaryGrid {
    /// Returns the visible grid.
    ///
    /// For 1D automata this is the full space-time diagram, one row per
    /// generation.
    fn grid(&self) -> &Array2<State>;

    /// Returns the padded buffer backing neighbour lookups.
    fn padded(&self) -> &Array2<State>;

    /// Recomputes the padding from the visible grid and wrap policy.
    fn refresh_boundary(&mut self);

    /// Replaces the visible contents, rescaling them if the shape differs.
    fn set_grid(&mut self, contents: &Array2<State>);

    /// Advances one generation.
    fn step(&mut self) -> Result<()>;

    /// Number of generations computed so far.
    fn generation(&self) -> usize;

    /// Maximum number of generations this grid can hold, if bounded.
    fn capacity(&self) -> Option<usize> {
        None
    }
}
