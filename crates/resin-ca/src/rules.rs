//! Ready-made transition rules.
//!
//! Both rules are built purely on the views and counts the engine hands
//! to every [`TransitionRule`], so they work with any auxiliary state.

use crate::State;
use crate::array::Array2;
use crate::config::GridConfig;
use crate::rule::TransitionRule;

/// Common Life-like rules as `(birth, survive)` neighbour counts.
pub mod presets {
    /// Game of Life (B3/S23).
    pub const LIFE: (&[u32], &[u32]) = (&[3], &[2, 3]);

    /// HighLife (B36/S23).
    pub const HIGH_LIFE: (&[u32], &[u32]) = (&[3, 6], &[2, 3]);

    /// Seeds (B2/S).
    pub const SEEDS: (&[u32], &[u32]) = (&[2], &[]);

    /// Day & Night (B3678/S34678).
    pub const DAY_NIGHT: (&[u32], &[u32]) = (&[3, 6, 7, 8], &[3, 4, 6, 7, 8]);

    /// Maze (B3/S12345).
    pub const MAZE: (&[u32], &[u32]) = (&[3], &[1, 2, 3, 4, 5]);
}

/// Common elementary rule numbers.
pub mod elementary_rules {
    /// Rule 30 - chaotic.
    pub const RULE_30: u8 = 30;

    /// Rule 90 - Sierpinski triangle.
    pub const RULE_90: u8 = 90;

    /// Rule 110 - Turing complete.
    pub const RULE_110: u8 = 110;

    /// Rule 184 - traffic flow.
    pub const RULE_184: u8 = 184;
}

/// Binary digits of a Wolfram rule number, most significant bit first.
///
/// Out-of-range numbers are clipped to `0..=255`. Entry `i` is the output
/// for the neighbourhood pattern `7 - i` (`111` first, `000` last).
pub fn rule_bits(rule: i64) -> [bool; 8] {
    let rule = rule.clamp(0, 255) as u8;
    std::array::from_fn(|i| (rule >> (7 - i)) & 1 == 1)
}

/// Wolfram elementary rule over a two-state alphabet.
///
/// A neighbour is on when its view equals the `alive` state; the triple
/// `(left, self, right)` indexes the rule number's bits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Elementary {
    rule: u8,
    dead: State,
    alive: State,
}

impl Elementary {
    /// Creates the rule over the alphabet `[0, 1]`.
    pub fn new(rule: u8) -> Self {
        Self {
            rule,
            dead: 0.0,
            alive: 1.0,
        }
    }

    /// Builds the rule from `config.rule_num` (0 if unset), with the first
    /// two states of the alphabet as off and on.
    pub fn from_config(config: &GridConfig) -> Self {
        let rule = Self::new(config.rule_num.unwrap_or(0));
        match config.states.as_slice() {
            [dead, alive, ..] => rule.with_states(*dead, *alive),
            _ => rule,
        }
    }

    /// Uses other labels for the off and on states.
    pub fn with_states(mut self, dead: State, alive: State) -> Self {
        self.dead = dead;
        self.alive = alive;
        self
    }

    /// Returns the rule number.
    pub fn rule(&self) -> u8 {
        self.rule
    }

    fn apply(&self, left: State, centre: State, right: State) -> State {
        let pattern = (usize::from(left == self.alive) << 2)
            | (usize::from(centre == self.alive) << 1)
            | usize::from(right == self.alive);
        if rule_bits(i64::from(self.rule))[7 - pattern] {
            self.alive
        } else {
            self.dead
        }
    }
}

impl<A> TransitionRule<A> for Elementary {
    fn next(
        &mut self,
        _grid: &Array2<State>,
        states: &[Array2<State>],
        _counts: &[Array2<u32>],
        _aux: &mut A,
    ) -> Array2<State> {
        let [left, centre, right] = states else {
            return Array2::new(0, 0);
        };
        let row: Vec<State> = left
            .iter()
            .zip(centre.iter())
            .zip(right.iter())
            .map(|((&l, &c), &r)| self.apply(l, c, r))
            .collect();
        Array2::from_row(&row)
    }
}

/// Birth/survive rule on neighbour counts, e.g. Conway's B3/S23.
///
/// Reads the count array at `alive_index` (the alive state's position in
/// the alphabet). Works with any neighbourhood; a von Neumann mask gives a
/// four-neighbour variant.
#[derive(Debug, Clone, PartialEq)]
pub struct LifeLike {
    birth: Vec<u32>,
    survive: Vec<u32>,
    dead: State,
    alive: State,
    alive_index: usize,
}

impl LifeLike {
    /// Creates a rule over the alphabet `[0, 1]`.
    pub fn new(birth: &[u32], survive: &[u32]) -> Self {
        Self {
            birth: birth.to_vec(),
            survive: survive.to_vec(),
            dead: 0.0,
            alive: 1.0,
            alive_index: 1,
        }
    }

    /// Conway's Game of Life.
    pub fn conway() -> Self {
        let (birth, survive) = presets::LIFE;
        Self::new(birth, survive)
    }

    /// Uses other labels, with `alive` at `alive_index` in the alphabet.
    pub fn with_states(mut self, dead: State, alive: State, alive_index: usize) -> Self {
        self.dead = dead;
        self.alive = alive;
        self.alive_index = alive_index;
        self
    }
}

impl<A> TransitionRule<A> for LifeLike {
    fn next(
        &mut self,
        grid: &Array2<State>,
        _states: &[Array2<State>],
        counts: &[Array2<u32>],
        _aux: &mut A,
    ) -> Array2<State> {
        let Some(alive_counts) = counts.get(self.alive_index) else {
            return Array2::filled(grid.rows(), grid.cols(), self.dead);
        };
        let data = grid
            .iter()
            .zip(alive_counts.iter())
            .map(|(&cell, count)| {
                let born = cell != self.alive && self.birth.contains(count);
                let survives = cell == self.alive && self.survive.contains(count);
                if born || survives { self.alive } else { self.dead }
            })
            .collect();
        Array2::from_vec(grid.rows(), grid.cols(), data)
            .unwrap_or_else(|_| Array2::filled(grid.rows(), grid.cols(), self.dead))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_bits() {
        assert_eq!(
            rule_bits(30),
            [false, false, false, true, true, true, true, false]
        );
        assert_eq!(rule_bits(255), [true; 8]);
        assert_eq!(rule_bits(-4), [false; 8]);
        assert_eq!(rule_bits(1000), [true; 8]);
    }

    #[test]
    fn test_elementary_rule_90() {
        let mut rule = Elementary::new(elementary_rules::RULE_90);
        let views = [
            Array2::from_row(&[0.0, 0.0, 1.0, 0.0]),
            Array2::from_row(&[0.0, 1.0, 0.0, 0.0]),
            Array2::from_row(&[1.0, 0.0, 0.0, 0.0]),
        ];
        let grid = Array2::new(2, 4);
        let out = TransitionRule::<()>::next(&mut rule, &grid, &views, &[], &mut ());
        // rule 90 is left XOR right
        assert_eq!(out.row(0), &[1.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_elementary_matches_rule_bits() {
        let bits = rule_bits(110);
        let rule = Elementary::new(110);
        for pattern in 0..8usize {
            let on = |bit: usize| if (pattern >> bit) & 1 == 1 { 1.0 } else { 0.0 };
            let expected = if bits[7 - pattern] { 1.0 } else { 0.0 };
            assert_eq!(rule.apply(on(2), on(1), on(0)), expected);
        }
    }

    #[test]
    fn test_elementary_from_config() {
        use crate::neighbourhood::Dimensions;

        let config = GridConfig::new(Dimensions::One, vec![2.0, 5.0])
            .with_rule_num(elementary_rules::RULE_110);
        let rule = Elementary::from_config(&config);
        assert_eq!(rule.rule(), 110);
        assert_eq!(rule.apply(2.0, 2.0, 5.0), 5.0);
        assert_eq!(rule.apply(5.0, 5.0, 5.0), 2.0);

        let unset = GridConfig::new(Dimensions::One, vec![0.0, 1.0]);
        assert_eq!(Elementary::from_config(&unset), Elementary::new(0));
    }

    #[test]
    fn test_elementary_custom_states() {
        let rule = Elementary::new(255).with_states(2.0, 5.0);
        assert_eq!(rule.apply(0.0, 0.0, 0.0), 5.0);
        let rule = Elementary::new(0).with_states(2.0, 5.0);
        assert_eq!(rule.apply(5.0, 5.0, 5.0), 2.0);
    }

    #[test]
    fn test_life_like_birth_and_survival() {
        let mut rule = LifeLike::conway();
        let grid = Array2::from_rows(&[[0.0, 1.0, 1.0]]).unwrap();
        let dead_counts: Array2<u32> = Array2::new(1, 3);
        let alive_counts: Array2<u32> = Array2::from_rows(&[[3, 1, 2]]).unwrap();
        let counts = [dead_counts, alive_counts];
        let out = TransitionRule::<()>::next(&mut rule, &grid, &[], &counts, &mut ());
        assert_eq!(out.row(0), &[1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_life_like_missing_counts_is_dead() {
        let mut rule = LifeLike::conway().with_states(0.0, 1.0, 4);
        let grid = Array2::filled(3, 3, 1.0);
        let out = TransitionRule::<()>::next(&mut rule, &grid, &[], &[], &mut ());
        assert!(out.iter().all(|&s| s == 0.0));
    }
}
