//! Random initial states.

use rand::Rng;
use rand::seq::index;

use crate::State;
use crate::array::Array2;
use crate::error::{CaError, Result};

/// Fills a `(rows, cols)` grid with `background`, then scatters each
/// `(state, proportion)` pair over distinct cells.
///
/// Each state gets `floor(proportion * rows * cols)` cells, with proportions
/// clipped to `[0, 1]`. Cells are sampled without replacement across the
/// whole grid, so no two states share a cell. Fails with
/// [`CaError::InsufficientCells`] if the counts add up to more than the
/// grid holds.
pub fn randomise2d<R: Rng + ?Sized>(
    shape: (usize, usize),
    background: State,
    proportions: &[(State, f64)],
    rng: &mut R,
) -> Result<Array2<State>> {
    let (rows, cols) = shape;
    let mut grid = Array2::filled(rows, cols, background);
    scatter(grid.as_mut_slice(), proportions, rng)?;
    Ok(grid)
}

/// The 1D counterpart of [`randomise2d`]: a single `(1, width)` row, ready
/// to seed generation 0 through `set_grid`.
///
/// Counts are taken against `width`, not the whole space-time diagram.
pub fn randomise1d<R: Rng + ?Sized>(
    width: usize,
    background: State,
    proportions: &[(State, f64)],
    rng: &mut R,
) -> Result<Array2<State>> {
    randomise2d((1, width), background, proportions, rng)
}

fn scatter<R: Rng + ?Sized>(
    cells: &mut [State],
    proportions: &[(State, f64)],
    rng: &mut R,
) -> Result<()> {
    let available = cells.len();
    let counts: Vec<(State, usize)> = proportions
        .iter()
        .map(|&(state, proportion)| {
            let proportion = proportion.clamp(0.0, 1.0);
            (state, (proportion * available as f64) as usize)
        })
        .collect();
    let requested: usize = counts.iter().map(|(_, count)| count).sum();
    if requested > available {
        return Err(CaError::InsufficientCells {
            requested,
            available,
        });
    }

    let mut positions = index::sample(rng, available, requested).into_iter();
    for (state, count) in counts {
        for position in positions.by_ref().take(count) {
            cells[position] = state;
        }
    }
    Ok(())
}
