//! The transition rule seam.

use crate::State;
use crate::array::Array2;

/// Computes the next generation from the current one.
///
/// The engine hands over:
///
/// - `grid`: the visible grid. For 1D automata this is the whole space-time
///   diagram computed so far.
/// - `states`: one view per neighbour direction, aligned with the cells
///   being updated and scaled by the neighbourhood weight. 2D grids pass
///   eight views in [`Direction`](crate::Direction) order; 1D grids pass
///   `[left, self, right]`, each of shape `(1, width)`.
/// - `counts`: one array per state in the alphabet, in alphabet order,
///   counting how many active neighbours hold that state.
/// - `aux`: caller-owned state threaded through every call untouched by the
///   engine (a fuel map, a rule table, `()`).
///
/// The returned array must match the grid shape (2D) or be a single
/// `(1, width)` row (1D).
pub trait TransitionRule<A> {
    /// Produces the next generation.
    fn next(
        &mut self,
        grid: &Array2<State>,
        states: &[Array2<State>],
        counts: &[Array2<u32>],
        aux: &mut A,
    ) -> Array2<State>;
}

impl<A, F> TransitionRule<A> for F
where
    F: FnMut(&Array2<State>, &[Array2<State>], &[Array2<u32>], &mut A) -> Array2<State>,
{
    fn next(
        &mut self,
        grid: &Array2<State>,
        states: &[Array2<State>],
        counts: &[Array2<u32>],
        aux: &mut A,
    ) -> Array2<State> {
        self(grid, states, counts, aux)
    }
}

/// A boxed transition rule.
pub type BoxedRule<A> = Box<dyn TransitionRule<A>>;
