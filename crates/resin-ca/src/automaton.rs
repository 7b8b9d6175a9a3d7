//! Dimension-agnostic automaton handle.

use std::fmt;

use crate::State;
use crate::array::Array2;
use crate::boundary::{BoundaryGrid, WrapPolicy};
use crate::config::GridConfig;
use crate::error::Result;
use crate::grid1d::Grid1D;
use crate::grid2d::Grid2D;
use crate::neighbourhood::{Dimensions, Neighbourhood};
use crate::rule::TransitionRule;

/// A 1D or 2D grid, chosen from [`GridConfig::dimensions`].
pub enum Automaton<A = ()> {
    /// Space-time diagram of a 1D automaton.
    OneDimensional(Grid1D<A>),
    /// A 2D automaton.
    TwoDimensional(Grid2D<A>),
}

impl<A> Automaton<A> {
    /// Builds the grid variant matching `config.dimensions`.
    pub fn new(
        config: &GridConfig,
        rule: impl TransitionRule<A> + 'static,
        aux: A,
    ) -> Result<Self> {
        Ok(match config.dimensions {
            Dimensions::One => Automaton::OneDimensional(Grid1D::new(config, rule, aux)?),
            Dimensions::Two => Automaton::TwoDimensional(Grid2D::new(config, rule, aux)?),
        })
    }

    /// Returns the dimensionality.
    pub fn dimensions(&self) -> Dimensions {
        match self {
            Automaton::OneDimensional(_) => Dimensions::One,
            Automaton::TwoDimensional(_) => Dimensions::Two,
        }
    }

    /// Returns the state alphabet.
    pub fn states(&self) -> &[State] {
        match self {
            Automaton::OneDimensional(grid) => grid.states(),
            Automaton::TwoDimensional(grid) => grid.states(),
        }
    }

    /// Returns the wrap policy.
    pub fn wrap(&self) -> WrapPolicy {
        match self {
            Automaton::OneDimensional(grid) => grid.wrap(),
            Automaton::TwoDimensional(grid) => grid.wrap(),
        }
    }

    /// Changes the wrap policy and re-derives the padding.
    pub fn set_wrap(&mut self, wrap: impl Into<WrapPolicy>) -> Result<()> {
        match self {
            Automaton::OneDimensional(grid) => grid.set_wrap(wrap),
            Automaton::TwoDimensional(grid) => grid.set_wrap(wrap),
        }
    }

    /// Returns the neighbourhood.
    pub fn neighbourhood(&self) -> &Neighbourhood {
        match self {
            Automaton::OneDimensional(grid) => grid.neighbourhood(),
            Automaton::TwoDimensional(grid) => grid.neighbourhood(),
        }
    }

    /// Returns the auxiliary rule state.
    pub fn aux(&self) -> &A {
        match self {
            Automaton::OneDimensional(grid) => grid.aux(),
            Automaton::TwoDimensional(grid) => grid.aux(),
        }
    }

    /// Returns the auxiliary rule state mutably.
    pub fn aux_mut(&mut self) -> &mut A {
        match self {
            Automaton::OneDimensional(grid) => grid.aux_mut(),
            Automaton::TwoDimensional(grid) => grid.aux_mut(),
        }
    }

    fn inner(&self) -> &dyn BoundaryGrid {
        match self {
            Automaton::OneDimensional(grid) => grid,
            Automaton::TwoDimensional(grid) => grid,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn BoundaryGrid {
        match self {
            Automaton::OneDimensional(grid) => grid,
            Automaton::TwoDimensional(grid) => grid,
        }
    }
}

impl<A> BoundaryGrid for Automaton<A> {
    fn grid(&self) -> &Array2<State> {
        self.inner().grid()
    }

    fn padded(&self) -> &Array2<State> {
        self.inner().padded()
    }

    fn refresh_boundary(&mut self) {
        self.inner_mut().refresh_boundary();
    }

    fn set_grid(&mut self, contents: &Array2<State>) {
        self.inner_mut().set_grid(contents);
    }

    fn step(&mut self) -> Result<()> {
        self.inner_mut().step()
    }

    fn generation(&self) -> usize {
        self.inner().generation()
    }

    fn capacity(&self) -> Option<usize> {
        self.inner().capacity()
    }
}

impl<A: fmt::Debug> fmt::Debug for Automaton<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Automaton::OneDimensional(grid) => f.debug_tuple("OneDimensional").field(grid).finish(),
            Automaton::TwoDimensional(grid) => f.debug_tuple("TwoDimensional").field(grid).finish(),
        }
    }
}
