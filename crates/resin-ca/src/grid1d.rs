//! One-dimensional automata.
//!
//! Generations are stacked as rows of a single 2D buffer, so the visible
//! grid is the space-time diagram: row `t` holds generation `t`.

use std::fmt;

use crate::State;
use crate::array::{Array2, scale_array};
use crate::boundary::{BoundaryGrid, DEAD_STATE, WrapPolicy};
use crate::config::{GridConfig, gens_to_dims};
use crate::error::{CaError, Result};
use crate::neighbourhood::{Dimensions, Neighbourhood};
use crate::rule::{BoxedRule, TransitionRule};

/// A 1D cellular automaton driven by a pluggable transition rule.
///
/// The grid is allocated up front for a fixed number of generations with
/// shape `(generations + 1, 2 * generations + 1)`, wide enough for a single
/// seed's light cone never to reach the edge.
///
/// With wrapping switched off by `false`, both padding columns hold the
/// background state (the first in the alphabet), so edge cells see it as
/// a neighbour. An explicit [`WrapPolicy::Fixed`] value is used as given.
pub struct Grid1D<A = ()> {
    /// Space-time diagram, one row per generation.
    grid: Array2<State>,
    /// Same rows with one padding column on each side.
    padded: Array2<State>,
    states: Vec<State>,
    background: State,
    wrap: WrapPolicy,
    neighbourhood: Neighbourhood,
    rule: BoxedRule<A>,
    aux: A,
    generations: usize,
    current: usize,
}

impl<A> Grid1D<A> {
    /// Builds a grid from `config`.
    ///
    /// The grid shape is derived from the generation count; any configured
    /// grid dimensions are ignored.
    pub fn new(
        config: &GridConfig,
        rule: impl TransitionRule<A> + 'static,
        aux: A,
    ) -> Result<Self> {
        let generations = config.resolved_generations();
        if generations < 1 {
            return Err(CaError::InvalidGenerationCount(generations));
        }
        let (rows, cols) = gens_to_dims(generations);
        let background = *config.states.first().ok_or(CaError::EmptyAlphabet)?;
        let wrap = row_boundary(config.wrap.validate()?, background);
        let neighbourhood = config.neighbourhood_for(Dimensions::One)?;

        let mut grid = Self {
            grid: Array2::filled(rows, cols, background),
            padded: Array2::filled(rows, cols + 2, background),
            states: config.states.clone(),
            background,
            wrap,
            neighbourhood,
            rule: Box::new(rule),
            aux,
            generations,
            current: 0,
        };
        match &config.initial_grid {
            Some(initial) => grid.set_grid(initial),
            None => grid.refresh_all(),
        }
        Ok(grid)
    }

    /// Returns the state alphabet.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Returns the wrap policy.
    pub fn wrap(&self) -> WrapPolicy {
        self.wrap
    }

    /// Changes the wrap policy and re-derives the padding.
    pub fn set_wrap(&mut self, wrap: impl Into<WrapPolicy>) -> Result<()> {
        self.wrap = row_boundary(wrap.into().validate()?, self.background);
        self.refresh_all();
        Ok(())
    }

    /// Returns the neighbourhood.
    pub fn neighbourhood(&self) -> &Neighbourhood {
        &self.neighbourhood
    }

    /// Replaces the neighbourhood. It must be one-dimensional.
    pub fn set_neighbourhood(&mut self, neighbourhood: Neighbourhood) -> Result<()> {
        if neighbourhood.dims() != Dimensions::One {
            return Err(CaError::InvalidDimensionality(neighbourhood.dims().count()));
        }
        self.neighbourhood = neighbourhood;
        Ok(())
    }

    /// Returns the auxiliary rule state.
    pub fn aux(&self) -> &A {
        &self.aux
    }

    /// Returns the auxiliary rule state mutably.
    pub fn aux_mut(&mut self) -> &mut A {
        &mut self.aux
    }

    /// Number of generations the grid was allocated for.
    pub fn generations(&self) -> usize {
        self.generations
    }

    /// Returns the row of the most recently computed generation.
    pub fn current_row(&self) -> &[State] {
        self.grid.row(self.current)
    }

    /// Returns `[left, self, right]` for the current generation, each of
    /// shape `(1, width)`.
    ///
    /// Left and right are gated by their mask weight: a side with non-zero
    /// weight shows the neighbour's state unchanged, a zero-weight side is
    /// all zeros. Weights are not multiplied in, so rules comparing views
    /// against state labels see real labels.
    pub fn neighbour_arrays(&self) -> [Array2<State>; 3] {
        let width = self.grid.cols();
        let padded = self.padded.row(self.current);
        let gate = |col: usize, side: &[State]| -> Vec<State> {
            if self.neighbourhood.weight(0, col) == 0.0 {
                vec![0.0; side.len()]
            } else {
                side.to_vec()
            }
        };

        let left = gate(0, &padded[..width]);
        let right = gate(2, &padded[2..]);
        [
            Array2::from_row(&left),
            Array2::from_row(self.current_row()),
            Array2::from_row(&right),
        ]
    }

    /// Counts, for each state, how many of each cell's left and right
    /// neighbours hold it. The cell itself and zero-weight sides never count.
    pub fn count_neighbours(&self, neighbour_arrays: &[Array2<State>; 3]) -> Vec<Array2<u32>> {
        let [left, _, right] = neighbour_arrays;
        let sides: Vec<&Array2<State>> = [(left, (0, 0)), (right, (0, 2))]
            .into_iter()
            .filter(|(_, (r, c))| self.neighbourhood.weight(*r, *c) != 0.0)
            .map(|(side, _)| side)
            .collect();

        self.states
            .iter()
            .map(|&state| {
                let mut counts: Array2<u32> = Array2::new(1, self.grid.cols());
                for side in &sides {
                    for (count, &value) in counts.as_mut_slice().iter_mut().zip(side.as_slice()) {
                        if value == state {
                            *count += 1;
                        }
                    }
                }
                counts
            })
            .collect()
    }

    fn refresh_row(&mut self, row: usize) {
        let width = self.grid.cols();
        let visible = self.grid.row(row);
        let (first, last) = (visible[0], visible[width - 1]);
        let padded = self.padded.row_mut(row);
        padded[1..=width].copy_from_slice(visible);
        match self.wrap {
            WrapPolicy::Wrap => {
                padded[0] = last;
                padded[width + 1] = first;
            }
            WrapPolicy::Fixed(value) => {
                padded[0] = value;
                padded[width + 1] = value;
            }
        }
    }

    fn refresh_all(&mut self) {
        for row in 0..self.grid.rows() {
            self.refresh_row(row);
        }
    }
}

/// Maps the `false` boundary to the background state.
fn row_boundary(wrap: WrapPolicy, background: State) -> WrapPolicy {
    match wrap {
        WrapPolicy::Fixed(value) if value == DEAD_STATE => WrapPolicy::Fixed(background),
        policy => policy,
    }
}

impl<A> BoundaryGrid for Grid1D<A> {
    fn grid(&self) -> &Array2<State> {
        &self.grid
    }

    fn padded(&self) -> &Array2<State> {
        &self.padded
    }

    /// Refreshes the padding of the current generation's row only.
    fn refresh_boundary(&mut self) {
        self.refresh_row(self.current);
    }

    /// A single row seeds generation 0; anything taller replaces the whole
    /// diagram. Either is rescaled to fit.
    fn set_grid(&mut self, contents: &Array2<State>) {
        let (rows, cols) = self.grid.shape();
        if contents.rows() == 1 {
            let seed = scale_array(contents, 1, cols);
            self.grid.row_mut(0).copy_from_slice(seed.row(0));
        } else if contents.shape() == (rows, cols) {
            self.grid = contents.clone();
        } else {
            self.grid = scale_array(contents, rows, cols);
        }
        self.refresh_all();
    }

    fn step(&mut self) -> Result<()> {
        if self.current >= self.generations {
            return Err(CaError::GenerationsExhausted {
                generations: self.generations,
            });
        }
        let arrays = self.neighbour_arrays();
        let counts = self.count_neighbours(&arrays);
        let row = self.rule.next(&self.grid, &arrays, &counts, &mut self.aux);
        let width = self.grid.cols();
        if row.shape() != (1, width) {
            return Err(CaError::ShapeMismatch {
                expected: (1, width),
                got: row.shape(),
            });
        }
        self.current += 1;
        self.grid.row_mut(self.current).copy_from_slice(row.row(0));
        self.refresh_boundary();
        Ok(())
    }

    fn generation(&self) -> usize {
        self.current
    }

    fn capacity(&self) -> Option<usize> {
        Some(self.generations)
    }
}

impl<A: fmt::Debug> fmt::Debug for Grid1D<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid1D")
            .field("shape", &self.grid.shape())
            .field("states", &self.states)
            .field("wrap", &self.wrap)
            .field("generation", &self.current)
            .field("generations", &self.generations)
            .field("aux", &self.aux)
            .finish_non_exhaustive()
    }
}
