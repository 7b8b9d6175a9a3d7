//! Automaton configuration and sizing defaults.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::State;
use crate::array::{Array2, scale_array};
use crate::boundary::WrapPolicy;
use crate::error::Result;
use crate::neighbourhood::{Dimensions, Mask, Neighbourhood};

/// Generation count used when none is configured.
pub const DEFAULT_GENERATIONS: usize = 100;

/// 2D grid size used when none is configured.
pub const DEFAULT_GRID_DIMS: (usize, usize) = (200, 200);

/// Cell-generations above which a run is reported as slow.
pub const COMPLEXITY_THRESHOLD: usize = 30_000_000;

/// 1D generation count above which a run is reported as slow.
pub const GENERATION_WARNING_THRESHOLD: usize = 500;

/// Grid shape of a 1D automaton run for `generations` generations.
///
/// One row per generation plus the initial row, and enough columns for a
/// single seed's light cone: `(generations + 1, 2 * generations + 1)`.
pub fn gens_to_dims(generations: usize) -> (usize, usize) {
    (generations + 1, generations * 2 + 1)
}

/// Clamps a generation count to at least 1, warning when it had to.
pub fn verify_generations(generations: usize) -> usize {
    if generations < 1 {
        warn!(generations, "invalid number of generations, defaulting to 1");
        return 1;
    }
    generations
}

/// Warns if a run of this size is likely to take a while.
///
/// `dims` is `None` for 1D automata, whose cost is judged by generation
/// count alone. Returns whether a warning was emitted.
pub fn check_complexity(generations: usize, dims: Option<(usize, usize)>) -> bool {
    match dims {
        None if generations > GENERATION_WARNING_THRESHOLD => {
            warn!(generations, "run may take some time");
            true
        }
        Some((rows, cols))
            if rows.saturating_mul(cols).saturating_mul(generations) > COMPLEXITY_THRESHOLD =>
        {
            warn!(rows, cols, generations, "run may take some time");
            true
        }
        _ => false,
    }
}

/// How to resize a configured grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridSizing {
    /// Explicit `(rows, cols)`. Each axis is clamped to at least 3.
    Dims(usize, usize),
    /// Derive the shape from a 1D generation count, clamped to at least 1.
    Generations(usize),
}

/// Everything needed to construct a grid.
///
/// Unset fields fall back to defaults when the grid is built, or eagerly
/// via [`GridConfig::fill_in_defaults`]. Grids copy what they need at
/// construction; changing a config afterwards does not affect them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridConfig {
    /// Human-readable name of the automaton.
    pub title: String,
    /// 1D or 2D.
    pub dimensions: Dimensions,
    /// Ordered state alphabet. The first state is the background.
    pub states: Vec<State>,
    /// Grid shape as `(rows, cols)`. Ignored by 1D grids.
    pub grid_dims: Option<(usize, usize)>,
    /// Number of generations to run.
    pub num_generations: Option<usize>,
    /// What lies beyond the grid edge.
    pub wrap: WrapPolicy,
    /// Contents at generation 0.
    pub initial_grid: Option<Array2<State>>,
    /// Raw neighbourhood mask, normalized when the grid is built.
    pub neighbourhood: Option<Mask>,
    /// Wolfram rule number, read by [`Elementary::from_config`].
    ///
    /// [`Elementary::from_config`]: crate::Elementary::from_config
    pub rule_num: Option<u8>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::new(Dimensions::Two, vec![0.0, 1.0])
    }
}

impl GridConfig {
    /// Creates a config with the given dimensionality and state alphabet.
    pub fn new(dimensions: Dimensions, states: Vec<State>) -> Self {
        Self {
            title: String::new(),
            dimensions,
            states,
            grid_dims: None,
            num_generations: None,
            wrap: WrapPolicy::Wrap,
            initial_grid: None,
            neighbourhood: None,
            rule_num: None,
        }
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the grid shape as given, without clamping.
    pub fn with_grid_dims(mut self, rows: usize, cols: usize) -> Self {
        self.grid_dims = Some((rows, cols));
        self
    }

    /// Sets the generation count as given, without clamping.
    pub fn with_generations(mut self, generations: usize) -> Self {
        self.num_generations = Some(generations);
        self
    }

    /// Sets the wrap policy.
    pub fn with_wrap(mut self, wrap: impl Into<WrapPolicy>) -> Self {
        self.wrap = wrap.into();
        self
    }

    /// Sets the initial grid.
    pub fn with_initial_grid(mut self, grid: Array2<State>) -> Self {
        self.initial_grid = Some(grid);
        self
    }

    /// Sets the raw neighbourhood mask.
    pub fn with_neighbourhood(mut self, mask: Mask) -> Self {
        self.neighbourhood = Some(mask);
        self
    }

    /// Sets the elementary rule number.
    pub fn with_rule_num(mut self, rule: u8) -> Self {
        self.rule_num = Some(rule);
        self
    }

    /// The background state, or `0.0` for an empty alphabet.
    pub fn background(&self) -> State {
        self.states.first().copied().unwrap_or(0.0)
    }

    /// Configured generation count, or the default.
    pub fn resolved_generations(&self) -> usize {
        self.num_generations.unwrap_or(DEFAULT_GENERATIONS)
    }

    /// Configured grid shape, or the default for this dimensionality.
    pub fn resolved_grid_dims(&self) -> (usize, usize) {
        self.grid_dims.unwrap_or_else(|| match self.dimensions {
            Dimensions::One => gens_to_dims(self.resolved_generations()),
            Dimensions::Two => DEFAULT_GRID_DIMS,
        })
    }

    /// Normalizes the configured mask for this config's dimensionality.
    pub fn neighbourhood(&self) -> Result<Neighbourhood> {
        self.neighbourhood_for(self.dimensions)
    }

    /// Normalizes the configured mask for `dims`. With no mask configured,
    /// every neighbour is active.
    pub fn neighbourhood_for(&self, dims: Dimensions) -> Result<Neighbourhood> {
        match &self.neighbourhood {
            Some(mask) => Neighbourhood::with_dimensions(mask, dims),
            None => Ok(match dims {
                Dimensions::One => Neighbourhood::elementary(),
                Dimensions::Two => Neighbourhood::moore(),
            }),
        }
    }

    /// Fills every unset field with its default.
    pub fn fill_in_defaults(&mut self) {
        self.rule_num.get_or_insert(0);
        self.num_generations.get_or_insert(DEFAULT_GENERATIONS);
        let dims = self.resolved_grid_dims();
        self.grid_dims = Some(dims);
        if self.initial_grid.is_none() {
            self.initial_grid = Some(Array2::filled(dims.0, dims.1, self.background()));
        }
        if self.neighbourhood.is_none() {
            self.neighbourhood = Some(match self.dimensions {
                Dimensions::One => Mask::from_slice(&[1.0; 3]),
                Dimensions::Two => Mask::from_rows(&[[1.0; 3]; 3]),
            });
        }
    }

    /// Resizes the grid, keeping as much of the initial grid as fits.
    pub fn set_grid_dims(&mut self, sizing: GridSizing) {
        let dims = match sizing {
            GridSizing::Dims(rows, cols) => (rows.max(3), cols.max(3)),
            GridSizing::Generations(generations) => {
                let generations = verify_generations(generations);
                self.num_generations = Some(generations);
                gens_to_dims(generations)
            }
        };
        self.grid_dims = Some(dims);
        if let Some(initial) = self.initial_grid.take() {
            self.initial_grid = Some(scale_array(&initial, dims.0, dims.1));
        }
    }

    /// Replaces the initial grid.
    ///
    /// A single row only replaces row 0 of an existing initial grid, which
    /// is how 1D automata are seeded.
    pub fn set_initial_grid(&mut self, grid: &Array2<State>) {
        let seeds_row = |initial: &&mut Array2<State>| grid.rows() == 1 && initial.rows() > 1;
        if let Some(initial) = self.initial_grid.as_mut().filter(seeds_row) {
            let row = scale_array(grid, 1, initial.cols());
            initial.row_mut(0).copy_from_slice(row.row(0));
            return;
        }
        self.initial_grid = Some(grid.clone());
    }
}
