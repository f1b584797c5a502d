//! Bellman maximization for a single (age, state) pair
//!
//! For state `(ix, ie)` every asset level on the grid is a candidate savings
//! choice `ixp`. The candidate's utility is CRRA felicity of the implied
//! consumption plus the discounted, transition-weighted continuation value of
//! the next age. Non-positive consumption is infeasible and scores a fixed
//! penalty instead.

use crate::params::Prices;

use super::model::Model;
use super::value::decompose_state;

/// Utility assigned to a choice with non-positive consumption
pub const INFEASIBLE_UTILITY: f64 = -1.0e5;

/// Starting bound of the running maximum
///
/// Looser than [`INFEASIBLE_UTILITY`], so a state whose every choice is
/// infeasible reports this bound and no choice.
pub const INITIAL_BOUND: f64 = -1.0e3;

/// Best value for a state and the choice that attained it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateChoice {
    pub value: f64,
    pub choice: Option<usize>,
}

/// CRRA felicity `c^(1-sigma) / (1-sigma)`, with the `ln c` limit at `sigma == 1`
///
/// Only defined for strictly positive consumption.
pub fn crra_utility(consumption: f64, risk_aversion: f64) -> f64 {
    debug_assert!(
        consumption > 0.0,
        "felicity evaluated at non-positive consumption {}",
        consumption
    );
    let exponent = 1.0 - risk_aversion;
    if exponent == 0.0 {
        consumption.ln()
    } else {
        consumption.powf(exponent) / exponent
    }
}

/// Evaluates the maximal attainable utility of individual states
#[derive(Debug, Clone, Copy)]
pub struct StateValueEvaluator<'a> {
    model: &'a Model,
}

impl<'a> StateValueEvaluator<'a> {
    pub fn new(model: &'a Model) -> Self {
        Self { model }
    }

    /// Maximize over all next-period asset choices for state `ind` at `age`
    ///
    /// `next_age` holds the solved values of `age + 1` in flattened state order.
    /// It is never read at the terminal age.
    pub fn evaluate(&self, age: usize, ind: usize, next_age: Option<&[f64]>) -> StateChoice {
        let model = self.model;
        let ne = model.income.len();
        let (ix, ie) = decompose_state(ind, ne);

        let terminal = age + 1 >= model.periods;
        let next_age = if terminal { None } else { next_age };
        debug_assert!(
            terminal || next_age.is_some(),
            "age {} evaluated without the solved values of age {}",
            age,
            age + 1
        );
        if let Some(values) = next_age {
            debug_assert_eq!(
                values.len(),
                model.states_per_age(),
                "next-age slice must hold one value per state"
            );
        }

        let xgrid = model.assets.levels();
        let transition = model.income.transition.row(ie);
        let Prices { interest_rate, wage } = model.prices;
        let sigma = model.preferences.risk_aversion;
        let beta = model.preferences.discount_factor;

        let resources = (1.0 + interest_rate) * xgrid[ix] + model.income.levels[ie] * wage;

        let mut best = StateChoice {
            value: INITIAL_BOUND,
            choice: None,
        };

        for (ixp, &savings) in xgrid.iter().enumerate() {
            let expected = match next_age {
                Some(values) => {
                    let continuation = &values[ixp * ne..(ixp + 1) * ne];
                    transition
                        .iter()
                        .zip(continuation)
                        .fold(0.0, |acc, (p, v)| acc + p * v)
                }
                None => 0.0,
            };

            let cons = resources - savings;
            let utility = if cons <= 0.0 {
                INFEASIBLE_UTILITY
            } else {
                crra_utility(cons, sigma) + beta * expected
            };

            // Non-strict: among equal values the highest index wins
            if utility >= best.value {
                best = StateChoice {
                    value: utility,
                    choice: Some(ixp),
                };
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{AssetGrid, IncomeProcess, TransitionMatrix};
    use crate::params::Preferences;
    use approx::assert_abs_diff_eq;

    /// Two asset levels {1, 2}, flat income {1, 1}, no interest or wage
    fn two_point_model(periods: usize) -> Model {
        Model {
            assets: AssetGrid { levels: vec![1.0, 2.0] },
            income: IncomeProcess {
                log_levels: vec![0.0, 0.0],
                levels: vec![1.0, 1.0],
                transition: TransitionMatrix::from_rows(2, vec![0.5, 0.5, 0.5, 0.5]),
            },
            preferences: Preferences {
                risk_aversion: 2.0,
                discount_factor: 0.97,
            },
            prices: Prices {
                interest_rate: 0.0,
                wage: 0.0,
            },
            periods,
        }
    }

    #[test]
    fn test_crra_utility() {
        assert_eq!(crra_utility(1.0, 2.0), -1.0);
        assert_abs_diff_eq!(crra_utility(2.0, 2.0), -0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(crra_utility(4.0, 0.5), 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(crra_utility(std::f64::consts::E, 1.0), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_terminal_scenario_picks_feasible_choice() {
        let model = two_point_model(1);
        let evaluator = StateValueEvaluator::new(&model);

        // ix = 1: consuming 2 - 1 = 1 gives -1, saving everything is infeasible
        for ie in 0..2 {
            let result = evaluator.evaluate(0, 2 + ie, None);
            assert_eq!(result.value, -1.0);
            assert_eq!(result.choice, Some(0));
        }
    }

    #[test]
    fn test_all_infeasible_returns_initial_bound() {
        let model = two_point_model(1);
        let evaluator = StateValueEvaluator::new(&model);

        // ix = 0: consumption is 0 or -1, both infeasible
        let result = evaluator.evaluate(0, 0, None);
        assert_eq!(result.value, INITIAL_BOUND);
        assert_eq!(result.choice, None);
    }

    #[test]
    fn test_terminal_age_ignores_continuation() {
        let model = two_point_model(1);
        let evaluator = StateValueEvaluator::new(&model);
        let poisoned = vec![f64::NAN; 4];

        let clean = evaluator.evaluate(0, 3, None);
        let with_poison = evaluator.evaluate(0, 3, Some(&poisoned));
        assert_eq!(clean, with_poison);
    }

    #[test]
    fn test_continuation_is_transition_weighted() {
        let model = two_point_model(2);
        let evaluator = StateValueEvaluator::new(&model);

        // Next-age values for (ixp, iep): choosing ixp = 1 is worth 10 on average
        let next = vec![0.0, 0.0, 4.0, 16.0];

        // ix = 1 can only afford ixp = 0; ixp = 1 stays infeasible regardless
        let result = evaluator.evaluate(0, 2, Some(&next));
        assert_eq!(result.choice, Some(0));
        assert_eq!(result.value, -1.0);

        // With wage income the richer choice becomes feasible
        let mut model = two_point_model(2);
        model.prices.wage = 1.0;
        let evaluator = StateValueEvaluator::new(&model);
        let result = evaluator.evaluate(0, 2, Some(&next));
        // cons = 2 + 1 - 2 = 1 -> -1 + 0.97 * 10
        assert_eq!(result.choice, Some(1));
        assert_abs_diff_eq!(result.value, -1.0 + 0.97 * 10.0, epsilon = 1e-12);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "next-age slice must hold one value per state")]
    fn test_short_continuation_slice_rejected() {
        let model = two_point_model(2);
        let evaluator = StateValueEvaluator::new(&model);
        let short = vec![0.0; 3];
        evaluator.evaluate(0, 2, Some(&short));
    }

    #[test]
    fn test_ties_resolve_to_highest_index() {
        let mut model = two_point_model(2);
        model.prices.wage = 1.0;
        model.preferences.discount_factor = 1.0;
        let evaluator = StateValueEvaluator::new(&model);

        // ixp = 0: cons = 2, value -0.5 + 0
        // ixp = 1: cons = 1, value -1 + 0.5
        let next = vec![0.0, 0.0, 0.5, 0.5];

        let result = evaluator.evaluate(0, 2, Some(&next));
        assert_eq!(result.value, -0.5);
        assert_eq!(result.choice, Some(1));
    }
}
