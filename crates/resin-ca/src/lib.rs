//! Generic cellular automaton engine.
//!
//! Runs 1D and 2D automata over an arbitrary state alphabet with a
//! user-supplied transition rule:
//!
//! - [`Grid1D`] / [`Grid2D`] - padded grids with toroidal or fixed boundaries
//! - [`Neighbourhood`] - normalized weight masks ([`Mask`] in, 3x3 or 1x3 out)
//! - [`TransitionRule`] - the rule seam, implemented by closures and by the
//!   ready-made [`Elementary`] and [`LifeLike`] rules
//! - [`Runner`] - steps a grid and records a [`Timeline`]
//!
//! # Example
//!
//! ```
//! use rhizome_resin_ca::{Array2, BoundaryGrid, Grid2D, GridConfig, LifeLike, Runner};
//!
//! // a blinker oscillates with period 2
//! let mut initial = Array2::new(5, 5);
//! for c in 1..4 {
//!     initial[(2, c)] = 1.0;
//! }
//! let config = GridConfig::default()
//!     .with_grid_dims(5, 5)
//!     .with_initial_grid(initial.clone());
//!
//! let mut grid = Grid2D::new(&config, LifeLike::conway(), ()).unwrap();
//! let output = Runner::new().run(&mut grid, 2).unwrap();
//!
//! assert_ne!(output.timeline.get(1), Some(&initial));
//! assert_eq!(grid.grid(), &initial);
//! ```

mod array;
mod automaton;
mod boundary;
mod config;
mod error;
mod grid1d;
mod grid2d;
mod neighbourhood;
mod random;
mod rule;
mod rules;
mod runner;

/// A cell state label.
///
/// Labels are compared for exact equality when counting neighbours.
pub type State = f64;

pub use array::{Array2, scale_array};
pub use automaton::Automaton;
pub use boundary::{BoundaryGrid, DEAD_STATE, WrapPolicy};
pub use config::{
    COMPLEXITY_THRESHOLD, DEFAULT_GENERATIONS, DEFAULT_GRID_DIMS, GENERATION_WARNING_THRESHOLD,
    GridConfig, GridSizing, check_complexity, gens_to_dims, verify_generations,
};
pub use error::{CaError, Result};
pub use grid1d::Grid1D;
pub use grid2d::{Direction, Grid2D, MIN_GRID_AXIS};
pub use neighbourhood::{Dimensions, Mask, Neighbourhood};
pub use random::{randomise1d, randomise2d};
pub use rule::{BoxedRule, TransitionRule};
pub use rules::{Elementary, LifeLike, elementary_rules, presets, rule_bits};
pub use runner::{Progress, RunOutput, RunStatus, Runner, Timeline, extract_states};
