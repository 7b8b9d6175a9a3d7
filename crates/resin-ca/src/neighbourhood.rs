//! Neighbourhood masks.
//!
//! A neighbourhood says which surrounding cells influence a cell's next
//! state. Callers may hand in masks of almost any 1D or 2D shape; they are
//! normalized here into the canonical form the grids index directly:
//!
//! ```text
//! 2D (3x3)            1D (length 3)
//! ┌───┬───┬───┐       ┌───┬───┬───┐
//! │NW │ N │NE │       │ L │ · │ R │
//! ├───┼───┼───┤       └───┴───┴───┘
//! │ W │ · │ E │
//! ├───┼───┼───┤
//! │SW │ S │SE │
//! └───┴───┴───┘
//! ```
//!
//! The center (`·`) marks the cell itself. It is always stored as `1.0` and
//! never takes part in neighbour aggregation.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::array::Array2;
use crate::error::{CaError, Result};

/// Side length of the canonical mask.
const CANONICAL: usize = 3;

/// Number of spatial dimensions of an automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Dimensions {
    /// A row of cells; generations stack into a space-time diagram.
    One,
    /// A plane of cells.
    #[default]
    Two,
}

impl Dimensions {
    /// Returns the dimension count as a number.
    pub fn count(self) -> usize {
        match self {
            Dimensions::One => 1,
            Dimensions::Two => 2,
        }
    }
}

impl TryFrom<usize> for Dimensions {
    type Error = CaError;

    fn try_from(value: usize) -> Result<Self> {
        match value {
            1 => Ok(Dimensions::One),
            2 => Ok(Dimensions::Two),
            other => Err(CaError::InvalidDimensionality(other)),
        }
    }
}

/// Caller-supplied neighbourhood weights of arbitrary shape.
///
/// This is the raw input to [`Neighbourhood::new`]; it may have any number
/// of axes so that bad input can be reported instead of being unrepresentable.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Mask {
    shape: Vec<usize>,
    weights: Vec<f64>,
}

impl Mask {
    /// Creates a mask from a shape and row-major weights.
    pub fn new(shape: Vec<usize>, weights: Vec<f64>) -> Result<Self> {
        if shape.iter().product::<usize>() != weights.len() {
            return Err(CaError::InvalidShape {
                shape,
                reason: "weight count does not match shape",
            });
        }
        Ok(Self { shape, weights })
    }

    /// Creates a single-axis mask.
    pub fn from_slice(weights: &[f64]) -> Self {
        Self {
            shape: vec![weights.len()],
            weights: weights.to_vec(),
        }
    }

    /// Creates a two-axis mask. Short rows are zero-padded to the widest row.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Self {
        let cols = rows.iter().map(|r| r.as_ref().len()).max().unwrap_or(0);
        let mut weights = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            let row = row.as_ref();
            weights.extend_from_slice(row);
            weights.extend(std::iter::repeat_n(0.0, cols - row.len()));
        }
        Self {
            shape: vec![rows.len(), cols],
            weights,
        }
    }

    /// Creates a mask with no elements.
    pub fn empty() -> Self {
        Self {
            shape: vec![0],
            weights: Vec::new(),
        }
    }

    /// Returns the shape.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Returns the weights in row-major order.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }
}

impl From<Array2<f64>> for Mask {
    fn from(array: Array2<f64>) -> Self {
        Self {
            shape: vec![array.rows(), array.cols()],
            weights: array.as_slice().to_vec(),
        }
    }
}

/// A validated, canonical neighbourhood mask.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Neighbourhood {
    dims: Dimensions,
    /// 3x3 for 2D, 1x3 for 1D.
    weights: Array2<f64>,
}

impl Neighbourhood {
    /// Normalizes `mask` for an automaton with `dims` spatial dimensions.
    ///
    /// Fails with [`CaError::InvalidDimensionality`] unless `dims` is 1 or 2.
    pub fn new(mask: &Mask, dims: usize) -> Result<Self> {
        Self::with_dimensions(mask, Dimensions::try_from(dims)?)
    }

    /// Normalizes `mask` for the given dimensionality.
    ///
    /// Empty masks become the "cell exists, no neighbours" mask. Masks larger
    /// than canonical are cropped around their center with a warning; smaller
    /// ones are zero-padded symmetrically. Any even-length axis fails with
    /// [`CaError::NoCenter`].
    pub fn with_dimensions(mask: &Mask, dims: Dimensions) -> Result<Self> {
        let weights = match dims {
            Dimensions::One => prepare_1d(mask)?,
            Dimensions::Two => prepare_2d(mask)?,
        };
        Ok(Self { dims, weights })
    }

    /// Moore neighbourhood: all eight surrounding cells.
    pub fn moore() -> Self {
        Self {
            dims: Dimensions::Two,
            weights: Array2::filled(CANONICAL, CANONICAL, 1.0),
        }
    }

    /// Von Neumann neighbourhood: the four orthogonal cells.
    pub fn von_neumann() -> Self {
        let mut weights = Array2::new(CANONICAL, CANONICAL);
        for (r, c) in [(0, 1), (1, 0), (1, 1), (1, 2), (2, 1)] {
            weights[(r, c)] = 1.0;
        }
        Self {
            dims: Dimensions::Two,
            weights,
        }
    }

    /// Left and right cells of a 1D automaton.
    pub fn elementary() -> Self {
        Self {
            dims: Dimensions::One,
            weights: Array2::filled(1, CANONICAL, 1.0),
        }
    }

    /// A neighbourhood in which the cell has no neighbours.
    pub fn empty(dims: Dimensions) -> Self {
        let weights = match dims {
            Dimensions::One => degenerate(1),
            Dimensions::Two => degenerate(CANONICAL),
        };
        Self { dims, weights }
    }

    /// Returns the dimensionality this mask was built for.
    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    /// Returns the canonical weights (3x3, or 1x3 for 1D).
    pub fn weights(&self) -> &Array2<f64> {
        &self.weights
    }

    /// Returns the weight at `(row, col)` of the canonical mask, or zero.
    pub fn weight(&self, row: usize, col: usize) -> f64 {
        self.weights.get(row, col).unwrap_or(0.0)
    }

    /// Converts back into a raw mask of canonical shape.
    pub fn to_mask(&self) -> Mask {
        let shape = match self.dims {
            Dimensions::One => vec![CANONICAL],
            Dimensions::Two => vec![CANONICAL, CANONICAL],
        };
        Mask {
            shape,
            weights: self.weights.as_slice().to_vec(),
        }
    }
}

impl fmt::Display for Neighbourhood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.weights.rows() {
            let row: Vec<String> = self.weights.row(r).iter().map(|w| w.to_string()).collect();
            writeln!(f, "[{}]", row.join(" "))?;
        }
        Ok(())
    }
}

/// All-zero mask of `rows x 3` with an active center.
fn degenerate(rows: usize) -> Array2<f64> {
    let mut weights = Array2::new(rows, CANONICAL);
    weights[(rows / 2, CANONICAL / 2)] = 1.0;
    weights
}

fn prepare_2d(mask: &Mask) -> Result<Array2<f64>> {
    let shape = mask.shape();
    if !(shape.len() == 1 || shape.len() == 2) {
        return Err(CaError::InvalidShape {
            shape: shape.to_vec(),
            reason: "only 1D or 2D input arrays are supported",
        });
    }
    if shape.contains(&0) {
        return Ok(degenerate(CANONICAL));
    }
    check_center(shape)?;

    // A single axis is read as the middle row: [1, 1, 1] -> [[0,0,0],[1,1,1],[0,0,0]].
    let (rows, cols) = match *shape {
        [r, c] => (r, c),
        _ => (1, mask.weights().len()),
    };
    let input = Array2::from_vec(rows, cols, mask.weights().to_vec())?;
    if rows > CANONICAL || cols > CANONICAL {
        warn!(?shape, "neighbourhood larger than 3x3, truncating outer cells");
    }
    Ok(recenter(&input, CANONICAL))
}

fn prepare_1d(mask: &Mask) -> Result<Array2<f64>> {
    let shape = mask.shape();
    let len = match *shape {
        [n] => n,
        [r, c] if r == 0 || c == 0 => 0,
        [1, n] | [n, 1] => n,
        _ => {
            return Err(CaError::InvalidShape {
                shape: shape.to_vec(),
                reason: "a 1D neighbourhood must be a single row or column",
            });
        }
    };
    if len == 0 {
        return Ok(degenerate(1));
    }
    check_center(&[len])?;

    let input = Array2::from_vec(1, len, mask.weights().to_vec())?;
    if len > CANONICAL {
        warn!(len, "neighbourhood longer than 3, truncating outer cells");
    }
    Ok(recenter(&input, 1))
}

fn check_center(shape: &[usize]) -> Result<()> {
    if shape.iter().any(|s| s % 2 == 0) {
        return Err(CaError::NoCenter {
            shape: shape.to_vec(),
        });
    }
    Ok(())
}

/// Crops or zero-pads each axis of `input` around its center to reach
/// `rows x 3`, then activates the center cell.
///
/// Both axes of `input` must have odd length.
fn recenter(input: &Array2<f64>, rows: usize) -> Array2<f64> {
    let mut out = Array2::new(rows, CANONICAL);
    let row_shift = (input.rows() / 2) as isize - (rows / 2) as isize;
    let col_shift = (input.cols() / 2) as isize - (CANONICAL / 2) as isize;
    for r in 0..rows {
        for c in 0..CANONICAL {
            let sr = r as isize + row_shift;
            let sc = c as isize + col_shift;
            if sr >= 0 && sc >= 0 {
                if let Some(w) = input.get(sr as usize, sc as usize) {
                    out[(r, c)] = w;
                }
            }
        }
    }
    out[(rows / 2, CANONICAL / 2)] = 1.0;
    debug_assert!(out.rows() % 2 == 1 && out.cols() % 2 == 1);
    out
}
