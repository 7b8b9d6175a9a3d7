//! Driving an automaton for many generations.

use std::ops::ControlFlow;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::State;
use crate::array::Array2;
use crate::boundary::BoundaryGrid;
use crate::config::check_complexity;
use crate::error::{CaError, Result};

/// Ordered grid snapshots, one per generation, starting with generation 0.
///
/// Snapshots are owned copies; stepping the grid further never changes
/// recorded history.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Timeline {
    snapshots: Vec<Array2<State>>,
}

impl Timeline {
    /// Creates an empty timeline.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_capacity(capacity: usize) -> Self {
        Self {
            snapshots: Vec::with_capacity(capacity),
        }
    }

    /// Appends a copy of `grid`.
    pub fn record(&mut self, grid: &Array2<State>) {
        self.snapshots.push(grid.clone());
    }

    /// Number of snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Returns the snapshot of `generation`, counted from the start of the run.
    pub fn get(&self, generation: usize) -> Option<&Array2<State>> {
        self.snapshots.get(generation)
    }

    /// Returns the most recent snapshot.
    pub fn last(&self) -> Option<&Array2<State>> {
        self.snapshots.last()
    }

    /// Iterates over snapshots in generation order.
    pub fn iter(&self) -> impl Iterator<Item = &Array2<State>> {
        self.snapshots.iter()
    }

    /// Returns all snapshots.
    pub fn snapshots(&self) -> &[Array2<State>] {
        &self.snapshots
    }

    /// Consumes the timeline, returning its snapshots.
    pub fn into_snapshots(self) -> Vec<Array2<State>> {
        self.snapshots
    }
}

/// Sorted distinct states present anywhere in `timeline`.
///
/// A fallback for collaborators that lost track of the alphabet.
pub fn extract_states(timeline: &Timeline) -> Vec<State> {
    let mut states: Vec<State> = timeline.iter().flat_map(|s| s.iter().copied()).collect();
    states.sort_by(f64::total_cmp);
    states.dedup();
    states
}

/// Reported to the progress callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Generations completed in this run.
    pub generation: usize,
    /// Generations requested for this run.
    pub total: usize,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RunStatus {
    /// Every requested generation was computed.
    Completed,
    /// The progress callback asked to stop after `generation`.
    Aborted {
        /// Last generation computed.
        generation: usize,
    },
}

/// Result of [`Runner::run`].
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutput {
    /// Generation 0 plus one snapshot per computed step.
    pub timeline: Timeline,
    /// How the run ended.
    pub status: RunStatus,
}

/// Upper bound on snapshots reserved before a run starts.
const PREALLOCATED_SNAPSHOTS: usize = 1024;

type ProgressFn<'a> = Box<dyn FnMut(Progress) -> ControlFlow<()> + 'a>;

/// Steps a grid repeatedly, recording a [`Timeline`].
///
/// # Example
///
/// ```
/// use rhizome_resin_ca::{Grid2D, GridConfig, LifeLike, Runner};
/// use std::ops::ControlFlow;
///
/// let config = GridConfig::default().with_grid_dims(8, 8);
/// let mut grid = Grid2D::new(&config, LifeLike::conway(), ()).unwrap();
///
/// let mut ticks = 0;
/// let output = Runner::new()
///     .with_progress(|_| {
///         ticks += 1;
///         ControlFlow::Continue(())
///     })
///     .run(&mut grid, 5)
///     .unwrap();
///
/// assert_eq!(output.timeline.len(), 6);
/// assert_eq!(ticks, 5);
/// ```
pub struct Runner<'a> {
    progress: Option<ProgressFn<'a>>,
    progress_every: usize,
}

impl Default for Runner<'_> {
    fn default() -> Self {
        Self {
            progress: None,
            progress_every: 1,
        }
    }
}

impl<'a> Runner<'a> {
    /// Creates a runner without a progress callback.
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls `progress` between steps. Returning [`ControlFlow::Break`]
    /// stops the run after the current generation.
    pub fn with_progress(
        mut self,
        progress: impl FnMut(Progress) -> ControlFlow<()> + 'a,
    ) -> Self {
        self.progress = Some(Box::new(progress));
        self
    }

    /// Reports progress every `every` generations instead of every one.
    /// The final generation is always reported.
    pub fn with_progress_every(mut self, every: usize) -> Self {
        self.progress_every = every.max(1);
        self
    }

    /// Runs `generations` steps of `grid`.
    ///
    /// The timeline starts with the grid as it is now. Fails before the
    /// first step if the grid cannot hold that many more generations, and
    /// stops at the first step that fails.
    #[instrument(skip(self, grid))]
    pub fn run<G: BoundaryGrid + ?Sized>(
        &mut self,
        grid: &mut G,
        generations: usize,
    ) -> Result<RunOutput> {
        if let Some(capacity) = grid.capacity() {
            let end = grid.generation().checked_add(generations);
            if end.is_none_or(|end| end > capacity) {
                return Err(CaError::GenerationsExhausted {
                    generations: capacity,
                });
            }
        }
        let dims = match grid.capacity() {
            Some(_) => None,
            None => Some(grid.grid().shape()),
        };
        check_complexity(generations, dims);

        info!(start = grid.generation(), "run starting");
        let reserve = generations.saturating_add(1).min(PREALLOCATED_SNAPSHOTS);
        let mut timeline = Timeline::with_capacity(reserve);
        timeline.record(grid.grid());

        for generation in 1..=generations {
            grid.step()?;
            timeline.record(grid.grid());

            let due = generation % self.progress_every == 0 || generation == generations;
            let Some(progress) = self.progress.as_mut().filter(|_| due) else {
                continue;
            };
            debug!(generation, "progress");
            let tick = Progress {
                generation,
                total: generations,
            };
            if progress(tick).is_break() {
                debug!(generation, "run aborted");
                return Ok(RunOutput {
                    timeline,
                    status: RunStatus::Aborted { generation },
                });
            }
        }

        info!(snapshots = timeline.len(), "run complete");
        Ok(RunOutput {
            timeline,
            status: RunStatus::Completed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use crate::grid1d::Grid1D;
    use crate::grid2d::Grid2D;
    use crate::neighbourhood::Dimensions;
    use crate::rules::{Elementary, LifeLike};

    fn counter_grid() -> Grid2D {
        let config = GridConfig::default().with_grid_dims(3, 3);
        let increment = |grid: &Array2<State>,
                         _: &[Array2<State>],
                         _: &[Array2<u32>],
                         _: &mut ()| grid.map(|s| s + 1.0);
        Grid2D::new(&config, increment, ()).unwrap()
    }

    #[test]
    fn test_run_records_every_generation() {
        let mut grid = counter_grid();
        let output = Runner::new().run(&mut grid, 4).unwrap();
        assert_eq!(output.status, RunStatus::Completed);
        assert_eq!(output.timeline.len(), 5);
        for (generation, snapshot) in output.timeline.iter().enumerate() {
            assert!(snapshot.iter().all(|&s| s == generation as State));
        }
    }

    #[test]
    fn test_run_zero_generations() {
        let mut grid = counter_grid();
        let output = Runner::new().run(&mut grid, 0).unwrap();
        assert_eq!(output.timeline.len(), 1);
        assert_eq!(grid.generation(), 0);
    }

    #[test]
    fn test_progress_every() {
        let mut grid = counter_grid();
        let mut seen = Vec::new();
        Runner::new()
            .with_progress(|p| {
                seen.push(p.generation);
                ControlFlow::Continue(())
            })
            .with_progress_every(3)
            .run(&mut grid, 7)
            .unwrap();
        assert_eq!(seen, vec![3, 6, 7]);
    }

    #[test]
    fn test_abort() {
        let mut grid = counter_grid();
        let output = Runner::new()
            .with_progress(|p| {
                if p.generation == 2 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            })
            .run(&mut grid, 10)
            .unwrap();
        assert_eq!(output.status, RunStatus::Aborted { generation: 2 });
        assert_eq!(output.timeline.len(), 3);
        assert_eq!(grid.generation(), 2);
    }

    #[test]
    fn test_snapshots_are_copies() {
        let mut grid = counter_grid();
        let output = Runner::new().run(&mut grid, 1).unwrap();
        grid.step().unwrap();
        assert!(output.timeline.get(1).unwrap().iter().all(|&s| s == 1.0));
    }

    #[test]
    fn test_capacity_checked_up_front() {
        let config = GridConfig::new(Dimensions::One, vec![0.0, 1.0]).with_generations(3);
        let mut grid = Grid1D::new(&config, Elementary::new(90), ()).unwrap();
        let err = Runner::new().run(&mut grid, 4).unwrap_err();
        assert_eq!(err, CaError::GenerationsExhausted { generations: 3 });
        assert_eq!(grid.generation(), 0);
        assert!(Runner::new().run(&mut grid, 3).is_ok());
    }

    #[test]
    fn test_huge_run_on_bounded_grid_fails() {
        let config = GridConfig::new(Dimensions::One, vec![0.0, 1.0]).with_generations(3);
        let mut grid = Grid1D::new(&config, Elementary::new(90), ()).unwrap();
        grid.step().unwrap();
        let err = Runner::new().run(&mut grid, usize::MAX).unwrap_err();
        assert_eq!(err, CaError::GenerationsExhausted { generations: 3 });
        assert_eq!(grid.generation(), 1);
    }

    #[test]
    fn test_huge_run_on_unbounded_grid_can_abort() {
        let mut grid = counter_grid();
        let output = Runner::new()
            .with_progress(|_| ControlFlow::Break(()))
            .run(&mut grid, usize::MAX)
            .unwrap();
        assert_eq!(output.status, RunStatus::Aborted { generation: 1 });
        assert_eq!(output.timeline.len(), 2);
    }

    #[test]
    fn test_extract_states() {
        let config = GridConfig::default()
            .with_grid_dims(3, 3)
            .with_initial_grid(Array2::from_rows(&[[2.0, 0.0, 1.0]]).unwrap());
        let mut grid = Grid2D::new(&config, LifeLike::conway(), ()).unwrap();
        let output = Runner::new().run(&mut grid, 1).unwrap();
        assert_eq!(extract_states(&output.timeline), vec![0.0, 1.0, 2.0]);
    }
}
