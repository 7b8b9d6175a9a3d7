//! Two-dimensional automata.

use std::fmt;
use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::State;
use crate::array::{Array2, scale_array};
use crate::boundary::{BoundaryGrid, WrapPolicy};
use crate::config::GridConfig;
use crate::error::{CaError, Result};
use crate::neighbourhood::{Dimensions, Neighbourhood};
use crate::rule::{BoxedRule, TransitionRule};

/// Width of the padding ring around the visible grid.
const PAD: usize = 1;

/// Smallest grid axis that still fits a full 3x3 neighbourhood.
pub const MIN_GRID_AXIS: usize = 3;

/// The eight neighbour directions, in the order neighbour views are passed
/// to transition rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Up and left.
    NorthWest,
    /// Up.
    North,
    /// Up and right.
    NorthEast,
    /// Left.
    West,
    /// Right.
    East,
    /// Down and left.
    SouthWest,
    /// Down.
    South,
    /// Down and right.
    SouthEast,
}

impl Direction {
    /// All directions in view order.
    pub const ALL: [Direction; 8] = [
        Direction::NorthWest,
        Direction::North,
        Direction::NorthEast,
        Direction::West,
        Direction::East,
        Direction::SouthWest,
        Direction::South,
        Direction::SouthEast,
    ];

    /// Position of this direction in the 3x3 neighbourhood mask, as
    /// `(row, col)`. Also the offset of the neighbour in the padded buffer.
    pub fn mask_position(self) -> (usize, usize) {
        match self {
            Direction::NorthWest => (0, 0),
            Direction::North => (0, 1),
            Direction::NorthEast => (0, 2),
            Direction::West => (1, 0),
            Direction::East => (1, 2),
            Direction::SouthWest => (2, 0),
            Direction::South => (2, 1),
            Direction::SouthEast => (2, 2),
        }
    }

    /// Index of this direction's view in the slice passed to rules.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// One rectangular copy from the visible grid into the padding.
#[derive(Debug, Clone, PartialEq, Eq)]
struct BorderCopy {
    src_rows: Range<usize>,
    src_cols: Range<usize>,
    dst_rows: Range<usize>,
    dst_cols: Range<usize>,
}

/// Computes the eight edge and corner copies that realize wrapping for a
/// `rows x cols` grid with `pad` cells of padding.
///
/// Sources index the visible grid, destinations the padded buffer.
fn border_copies(rows: usize, cols: usize, pad: usize) -> [BorderCopy; 8] {
    let top = 0..pad;
    let bottom = pad + rows..rows + 2 * pad;
    let left = 0..pad;
    let right = pad + cols..cols + 2 * pad;
    let inner_rows = pad..pad + rows;
    let inner_cols = pad..pad + cols;

    let last_rows = rows - pad..rows;
    let first_rows = 0..pad;
    let last_cols = cols - pad..cols;
    let first_cols = 0..pad;

    let copy = |src_rows: &Range<usize>,
                src_cols: &Range<usize>,
                dst_rows: &Range<usize>,
                dst_cols: &Range<usize>| BorderCopy {
        src_rows: src_rows.clone(),
        src_cols: src_cols.clone(),
        dst_rows: dst_rows.clone(),
        dst_cols: dst_cols.clone(),
    };

    [
        // edges
        copy(&last_rows, &(0..cols), &top, &inner_cols),
        copy(&first_rows, &(0..cols), &bottom, &inner_cols),
        copy(&(0..rows), &last_cols, &inner_rows, &left),
        copy(&(0..rows), &first_cols, &inner_rows, &right),
        // corners take the diagonally opposite corner
        copy(&last_rows, &last_cols, &top, &left),
        copy(&last_rows, &first_cols, &top, &right),
        copy(&first_rows, &last_cols, &bottom, &left),
        copy(&first_rows, &first_cols, &bottom, &right),
    ]
}

/// A 2D cellular automaton driven by a pluggable transition rule.
///
/// `A` is auxiliary state owned by the grid and lent to the rule on every
/// step.
pub struct Grid2D<A = ()> {
    /// Visible cells.
    grid: Array2<State>,
    /// Visible cells surrounded by one ring of padding.
    padded: Array2<State>,
    /// State alphabet; index 0 is the background.
    states: Vec<State>,
    wrap: WrapPolicy,
    neighbourhood: Neighbourhood,
    border: [BorderCopy; 8],
    rule: BoxedRule<A>,
    aux: A,
    generation: usize,
}

impl<A> Grid2D<A> {
    /// Builds a grid from `config`.
    ///
    /// Fails if either grid axis is below 3, the alphabet is empty, the wrap
    /// policy is invalid or the neighbourhood mask cannot be normalized.
    pub fn new(
        config: &GridConfig,
        rule: impl TransitionRule<A> + 'static,
        aux: A,
    ) -> Result<Self> {
        let (rows, cols) = config.resolved_grid_dims();
        if rows < MIN_GRID_AXIS || cols < MIN_GRID_AXIS {
            return Err(CaError::InvalidGridSize { rows, cols });
        }
        let background = *config.states.first().ok_or(CaError::EmptyAlphabet)?;
        let wrap = config.wrap.validate()?;
        let neighbourhood = config.neighbourhood_for(Dimensions::Two)?;

        let mut grid = Self {
            grid: Array2::filled(rows, cols, background),
            padded: Array2::filled(rows + 2 * PAD, cols + 2 * PAD, background),
            states: config.states.clone(),
            wrap,
            neighbourhood,
            border: border_copies(rows, cols, PAD),
            rule: Box::new(rule),
            aux,
            generation: 0,
        };
        match &config.initial_grid {
            Some(initial) => grid.set_grid(initial),
            None => grid.refresh_boundary(),
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
        self.wrap = wrap.into().validate()?;
        self.refresh_boundary();
        Ok(())
    }

    /// Returns the neighbourhood.
    pub fn neighbourhood(&self) -> &Neighbourhood {
        &self.neighbourhood
    }

    /// Replaces the neighbourhood. It must be two-dimensional.
    pub fn set_neighbourhood(&mut self, neighbourhood: Neighbourhood) -> Result<()> {
        if neighbourhood.dims() != Dimensions::Two {
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

    /// Returns the eight neighbour views of the current generation.
    ///
    /// View `d` holds, for every visible cell, the state of its neighbour in
    /// direction `d` multiplied by that direction's mask weight. Directions
    /// with zero weight yield an all-zero view.
    pub fn neighbour_states(&self) -> [Array2<State>; 8] {
        Direction::ALL.map(|direction| self.view(direction))
    }

    fn view(&self, direction: Direction) -> Array2<State> {
        let (rows, cols) = self.grid.shape();
        let (dr, dc) = direction.mask_position();
        let weight = self.neighbourhood.weight(dr, dc);
        let mut view = Array2::new(rows, cols);
        if weight == 0.0 {
            return view;
        }
        for r in 0..rows {
            let src = &self.padded.row(r + dr)[dc..dc + cols];
            for (out, &value) in view.row_mut(r).iter_mut().zip(src) {
                *out = weight * value;
            }
        }
        view
    }

    /// Counts, for each state in the alphabet, how many active neighbours of
    /// every cell hold that state.
    ///
    /// Directions with zero mask weight never contribute, so a masked-out
    /// neighbour is not mistaken for a neighbour in state `0`.
    pub fn count_neighbours(&self, neighbour_states: &[Array2<State>; 8]) -> Vec<Array2<u32>> {
        let (rows, cols) = self.grid.shape();
        let active: Vec<&Array2<State>> = Direction::ALL
            .iter()
            .zip(neighbour_states)
            .filter(|(direction, _)| {
                let (r, c) = direction.mask_position();
                self.neighbourhood.weight(r, c) != 0.0
            })
            .map(|(_, view)| view)
            .collect();

        self.states
            .iter()
            .map(|&state| {
                let mut counts: Array2<u32> = Array2::new(rows, cols);
                for view in &active {
                    for (count, &value) in counts.as_mut_slice().iter_mut().zip(view.as_slice()) {
                        if value == state {
                            *count += 1;
                        }
                    }
                }
                counts
            })
            .collect()
    }

    fn copy_interior(&mut self) {
        let cols = self.grid.cols();
        for r in 0..self.grid.rows() {
            self.padded.row_mut(r + PAD)[PAD..PAD + cols].copy_from_slice(self.grid.row(r));
        }
    }
}

impl<A> BoundaryGrid for Grid2D<A> {
    fn grid(&self) -> &Array2<State> {
        &self.grid
    }

    fn padded(&self) -> &Array2<State> {
        &self.padded
    }

    fn refresh_boundary(&mut self) {
        self.copy_interior();
        match self.wrap {
            WrapPolicy::Wrap => {
                for copy in &self.border {
                    for (dst, src) in copy.dst_rows.clone().zip(copy.src_rows.clone()) {
                        let values = &self.grid.row(src)[copy.src_cols.clone()];
                        self.padded.row_mut(dst)[copy.dst_cols.clone()].copy_from_slice(values);
                    }
                }
            }
            WrapPolicy::Fixed(value) => {
                for copy in &self.border {
                    for dst in copy.dst_rows.clone() {
                        self.padded.row_mut(dst)[copy.dst_cols.clone()].fill(value);
                    }
                }
            }
        }
    }

    fn set_grid(&mut self, contents: &Array2<State>) {
        let (rows, cols) = self.grid.shape();
        self.grid = if contents.shape() == (rows, cols) {
            contents.clone()
        } else {
            scale_array(contents, rows, cols)
        };
        self.refresh_boundary();
    }

    fn step(&mut self) -> Result<()> {
        let states = self.neighbour_states();
        let counts = self.count_neighbours(&states);
        let next = self.rule.next(&self.grid, &states, &counts, &mut self.aux);
        if next.shape() != self.grid.shape() {
            return Err(CaError::ShapeMismatch {
                expected: self.grid.shape(),
                got: next.shape(),
            });
        }
        self.grid = next;
        self.refresh_boundary();
        self.generation += 1;
        Ok(())
    }

    fn generation(&self) -> usize {
        self.generation
    }
}

impl<A: fmt::Debug> fmt::Debug for Grid2D<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid2D")
            .field("shape", &self.grid.shape())
            .field("states", &self.states)
            .field("wrap", &self.wrap)
            .field("generation", &self.generation)
            .field("aux", &self.aux)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::DEAD_STATE;
    use crate::neighbourhood::Mask;

    fn identity(
        grid: &Array2<State>,
        _: &[Array2<State>],
        _: &[Array2<u32>],
        _: &mut (),
    ) -> Array2<State> {
        grid.clone()
    }

    fn numbered(rows: usize, cols: usize) -> Array2<State> {
        let data = (0..rows * cols).map(|i| i as State).collect();
        Array2::from_vec(rows, cols, data).unwrap()
    }

    fn config(rows: usize, cols: usize) -> GridConfig {
        GridConfig::new(Dimensions::Two, vec![0.0, 1.0]).with_grid_dims(rows, cols)
    }

    #[test]
    fn test_rejects_small_grids() {
        for (rows, cols) in [(2, 5), (5, 2), (0, 0), (2, 2)] {
            let err = Grid2D::new(&config(rows, cols), identity, ()).unwrap_err();
            assert_eq!(err, CaError::InvalidGridSize { rows, cols });
        }
        let grid = Grid2D::new(&config(3, 3), identity, ()).unwrap();
        assert_eq!(grid.grid().shape(), (3, 3));
        assert_eq!(grid.padded().shape(), (5, 5));
    }

    #[test]
    fn test_rejects_empty_alphabet() {
        let config = GridConfig::new(Dimensions::Two, vec![]).with_grid_dims(5, 5);
        assert_eq!(
            Grid2D::new(&config, identity, ()).unwrap_err(),
            CaError::EmptyAlphabet
        );
    }

    #[test]
    fn test_border_copies_cover_padding() {
        let copies = border_copies(4, 6, PAD);
        let mut covered = Array2::filled(6, 8, false);
        for copy in &copies {
            assert_eq!(copy.src_rows.len(), copy.dst_rows.len());
            assert_eq!(copy.src_cols.len(), copy.dst_cols.len());
            for r in copy.dst_rows.clone() {
                for c in copy.dst_cols.clone() {
                    assert!(!covered[(r, c)], "({r}, {c}) written twice");
                    covered[(r, c)] = true;
                }
            }
        }
        for r in 0..6 {
            for c in 0..8 {
                let border = r == 0 || r == 5 || c == 0 || c == 7;
                assert_eq!(covered[(r, c)], border);
            }
        }
    }

    #[test]
    fn test_wrap_refresh() {
        let mut grid = Grid2D::new(&config(3, 4), identity, ()).unwrap();
        grid.set_grid(&numbered(3, 4));
        let p = grid.padded();
        // top padding mirrors last row
        assert_eq!(&p.row(0)[1..5], &[8.0, 9.0, 10.0, 11.0]);
        // bottom padding mirrors first row
        assert_eq!(&p.row(4)[1..5], &[0.0, 1.0, 2.0, 3.0]);
        // left and right columns
        assert_eq!(p[(1, 0)], 3.0);
        assert_eq!(p[(1, 5)], 0.0);
        // corners
        assert_eq!(p[(0, 0)], 11.0);
        assert_eq!(p[(0, 5)], 8.0);
        assert_eq!(p[(4, 0)], 3.0);
        assert_eq!(p[(4, 5)], 0.0);
    }

    #[test]
    fn test_fixed_refresh() {
        let config = config(3, 3).with_wrap(WrapPolicy::Fixed(7.0));
        let mut grid = Grid2D::new(&config, identity, ()).unwrap();
        grid.set_grid(&numbered(3, 3));
        let p = grid.padded();
        for r in 0..5 {
            for c in 0..5 {
                if r == 0 || r == 4 || c == 0 || c == 4 {
                    assert_eq!(p[(r, c)], 7.0);
                } else {
                    assert_eq!(p[(r, c)], ((r - 1) * 3 + (c - 1)) as State);
                }
            }
        }
    }

    #[test]
    fn test_set_grid_rescales() {
        let mut grid = Grid2D::new(&config(4, 4), identity, ()).unwrap();
        grid.set_grid(&Array2::filled(2, 6, 1.0));
        assert_eq!(grid.grid().shape(), (4, 4));
        assert_eq!(grid.grid()[(1, 3)], 1.0);
        assert_eq!(grid.grid()[(2, 0)], 0.0);
    }

    #[test]
    fn test_neighbour_states_align() {
        let mut grid = Grid2D::new(&config(3, 3), identity, ()).unwrap();
        grid.set_grid(&numbered(3, 3));
        let ns = grid.neighbour_states();
        // cell (1, 1) sees the whole grid around it
        let around: Vec<State> = Direction::ALL.iter().map(|d| ns[d.index()][(1, 1)]).collect();
        assert_eq!(around, vec![0.0, 1.0, 2.0, 3.0, 5.0, 6.0, 7.0, 8.0]);
        // cell (0, 0) wraps
        assert_eq!(ns[Direction::NorthWest.index()][(0, 0)], 8.0);
        assert_eq!(ns[Direction::North.index()][(0, 0)], 6.0);
        assert_eq!(ns[Direction::West.index()][(0, 0)], 2.0);
    }

    #[test]
    fn test_zero_weight_direction_is_zero_view() {
        let mask = Mask::from_rows(&[[0.0, 1.0, 0.0], [1.0, 1.0, 1.0], [0.0, 1.0, 0.0]]);
        let config = config(3, 3).with_neighbourhood(mask);
        let mut grid = Grid2D::new(&config, identity, ()).unwrap();
        grid.set_grid(&Array2::filled(3, 3, 1.0));
        let ns = grid.neighbour_states();
        assert_eq!(ns.len(), 8);
        assert!(ns[Direction::NorthWest.index()].iter().all(|&v| v == 0.0));
        assert!(ns[Direction::North.index()].iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_weighted_view() {
        let mask = Mask::from_rows(&[[1.0, 2.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 1.0]]);
        let config = config(3, 3).with_neighbourhood(mask);
        let mut grid = Grid2D::new(&config, identity, ()).unwrap();
        grid.set_grid(&Array2::filled(3, 3, 1.0));
        let ns = grid.neighbour_states();
        assert!(ns[Direction::North.index()].iter().all(|&v| v == 2.0));
    }

    #[test]
    fn test_count_neighbours() {
        let mut grid = Grid2D::new(&config(5, 5), identity, ()).unwrap();
        let mut seed = Array2::new(5, 5);
        seed[(2, 2)] = 1.0;
        grid.set_grid(&seed);
        let counts = grid.count_neighbours(&grid.neighbour_states());
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[1][(1, 1)], 1);
        assert_eq!(counts[1][(2, 2)], 0);
        assert_eq!(counts[0][(1, 1)], 7);
        assert_eq!(counts[0][(2, 2)], 8);
    }

    #[test]
    fn test_masked_directions_not_counted_as_zero() {
        let mask = Mask::from_rows(&[[0.0, 1.0, 0.0], [1.0, 1.0, 1.0], [0.0, 1.0, 0.0]]);
        let config = config(3, 3).with_neighbourhood(mask);
        let grid = Grid2D::new(&config, identity, ()).unwrap();
        let counts = grid.count_neighbours(&grid.neighbour_states());
        // four active directions, all background
        assert!(counts[0].iter().all(|&n| n == 4));
    }

    #[test]
    fn test_fixed_boundary_not_counted() {
        let config = config(3, 3).with_wrap(WrapPolicy::from(false));
        let grid = Grid2D::new(&config, identity, ()).unwrap();
        let counts = grid.count_neighbours(&grid.neighbour_states());
        assert_eq!(counts[0][(1, 1)], 8);
        assert_eq!(counts[0][(0, 0)], 3);
    }

    #[test]
    fn test_step_checks_rule_shape() {
        let shrink = |_: &Array2<State>, _: &[Array2<State>], _: &[Array2<u32>], _: &mut ()| {
            Array2::<State>::new(2, 2)
        };
        let mut grid = Grid2D::new(&config(3, 3), shrink, ()).unwrap();
        assert_eq!(
            grid.step(),
            Err(CaError::ShapeMismatch {
                expected: (3, 3),
                got: (2, 2)
            })
        );
        assert_eq!(grid.generation(), 0);
    }

    #[test]
    fn test_step_threads_aux() {
        let count_calls = |grid: &Array2<State>,
                           _: &[Array2<State>],
                           _: &[Array2<u32>],
                           calls: &mut usize| {
            *calls += 1;
            grid.clone()
        };
        let mut grid = Grid2D::new(&config(3, 3), count_calls, 0usize).unwrap();
        grid.step().unwrap();
        grid.step().unwrap();
        assert_eq!(*grid.aux(), 2);
        assert_eq!(grid.generation(), 2);
    }

    #[test]
    fn test_set_wrap_refreshes_padding() {
        let mut grid = Grid2D::new(&config(3, 3), identity, ()).unwrap();
        grid.set_grid(&Array2::filled(3, 3, 1.0));
        grid.set_wrap(false).unwrap();
        assert_eq!(grid.padded()[(0, 0)], DEAD_STATE);
        assert_eq!(grid.padded()[(1, 1)], 1.0);
        grid.set_wrap(true).unwrap();
        assert_eq!(grid.padded()[(0, 0)], 1.0);
        assert!(grid.set_wrap(WrapPolicy::Fixed(f64::NAN)).is_err());
        assert_eq!(grid.wrap(), WrapPolicy::Wrap);
    }

    #[test]
    fn test_set_neighbourhood_rejects_1d() {
        let mut grid = Grid2D::new(&config(3, 3), identity, ()).unwrap();
        assert!(grid.set_neighbourhood(Neighbourhood::elementary()).is_err());
        assert!(grid.set_neighbourhood(Neighbourhood::von_neumann()).is_ok());
    }
}
