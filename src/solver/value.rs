//! Dense per-age storage for the value and policy functions
//!
//! Both arrays are laid out `[age][asset][income]` with income as the fastest
//! varying dimension, so the cells of one age form a contiguous slice indexed
//! by the flattened state index `ix * ne + ie`.

/// Split a flattened state index into `(asset_index, income_index)`
pub fn decompose_state(ind: usize, ne: usize) -> (usize, usize) {
    (ind / ne, ind % ne)
}

/// Optimized value for every (age, asset, income) state
#[derive(Debug, Clone, PartialEq)]
pub struct ValueFunction {
    periods: usize,
    nx: usize,
    ne: usize,
    pub(crate) data: Vec<f64>,
}

impl ValueFunction {
    /// Unsolved cells hold NaN until the solver writes them
    pub const UNSOLVED: f64 = f64::NAN;

    pub fn new(periods: usize, nx: usize, ne: usize) -> Self {
        Self {
            periods,
            nx,
            ne,
            data: vec![Self::UNSOLVED; periods * nx * ne],
        }
    }

    pub fn periods(&self) -> usize {
        self.periods
    }

    pub fn asset_points(&self) -> usize {
        self.nx
    }

    pub fn income_points(&self) -> usize {
        self.ne
    }

    pub fn states_per_age(&self) -> usize {
        self.nx * self.ne
    }

    pub fn get(&self, age: usize, ix: usize, ie: usize) -> f64 {
        self.data[(age * self.nx + ix) * self.ne + ie]
    }

    /// All states of one age, indexed by flattened state index
    pub fn age(&self, age: usize) -> &[f64] {
        let n = self.states_per_age();
        &self.data[age * n..(age + 1) * n]
    }

    /// Mutable slice for `age` alongside the solved slice of `age + 1`, if any
    pub(crate) fn split_age_mut(&mut self, age: usize) -> (&mut [f64], Option<&[f64]>) {
        let n = self.states_per_age();
        let (head, tail) = self.data.split_at_mut((age + 1) * n);
        let current = &mut head[age * n..];
        let next = if age + 1 < self.periods {
            Some(&tail[..n])
        } else {
            None
        };
        (current, next)
    }

    /// True once every cell has been written
    pub fn is_fully_solved(&self) -> bool {
        !self.data.iter().any(|v| v.is_nan())
    }
}

/// Maximizing next-period asset index for every state
///
/// `None` marks a state where no choice beat the initial bound of the search.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyFunction {
    periods: usize,
    nx: usize,
    ne: usize,
    pub(crate) data: Vec<Option<usize>>,
}

impl PolicyFunction {
    pub fn new(periods: usize, nx: usize, ne: usize) -> Self {
        Self {
            periods,
            nx,
            ne,
            data: vec![None; periods * nx * ne],
        }
    }

    pub fn periods(&self) -> usize {
        self.periods
    }

    pub fn get(&self, age: usize, ix: usize, ie: usize) -> Option<usize> {
        self.data[(age * self.nx + ix) * self.ne + ie]
    }

    pub fn age(&self, age: usize) -> &[Option<usize>] {
        let n = self.nx * self.ne;
        &self.data[age * n..(age + 1) * n]
    }

    pub(crate) fn age_mut(&mut self, age: usize) -> &mut [Option<usize>] {
        let n = self.nx * self.ne;
        &mut self.data[age * n..(age + 1) * n]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decompose_state_is_row_major() {
        assert_eq!(decompose_state(0, 3), (0, 0));
        assert_eq!(decompose_state(2, 3), (0, 2));
        assert_eq!(decompose_state(3, 3), (1, 0));
        assert_eq!(decompose_state(14, 3), (4, 2));
    }

    #[test]
    fn test_layout_matches_flattened_index() {
        let mut values = ValueFunction::new(2, 4, 3);
        assert!(!values.is_fully_solved());

        let (current, next) = values.split_age_mut(1);
        assert!(next.is_none());
        for (ind, cell) in current.iter_mut().enumerate() {
            *cell = ind as f64;
        }

        let (ix, ie) = decompose_state(7, 3);
        assert_eq!(values.get(1, ix, ie), 7.0);
        assert_eq!(values.age(1)[7], 7.0);
        assert!(values.age(0).iter().all(|v| v.is_nan()));

        let (current, next) = values.split_age_mut(0);
        assert_eq!(current.len(), 12);
        assert_eq!(next.unwrap()[11], 11.0);
        current.fill(0.0);
        assert!(values.is_fully_solved());
    }

    #[test]
    fn test_policy_starts_unset() {
        let mut policy = PolicyFunction::new(2, 2, 2);
        assert!(policy.age(0).iter().all(Option::is_none));

        policy.age_mut(1)[3] = Some(1);
        assert_eq!(policy.get(1, 1, 1), Some(1));
        assert_eq!(policy.get(0, 1, 1), None);
    }
}
