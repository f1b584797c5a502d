//! Run summaries and CSV export of solved value and policy functions

use std::io::Write;

use serde::Serialize;

use crate::params::ModelParameters;
use crate::solver::{decompose_state, AgeTiming, Solution};

/// One solved state in the CSV export
#[derive(Debug, Clone, Serialize)]
pub struct StateRow {
    pub age: usize,
    pub asset_index: usize,
    pub income_index: usize,
    pub assets: f64,
    pub income: f64,
    pub value: f64,
    pub choice_index: Option<usize>,
    pub next_assets: Option<f64>,
}

/// Summary of a solve, serializable for `--json` output
#[derive(Debug, Clone, Serialize)]
pub struct SolveSummary {
    pub parameters: ModelParameters,
    pub states_per_age: usize,
    pub timings: Vec<AgeTiming>,
    pub total_seconds: f64,
    /// `V[0][0][ie]` for the first few income states
    pub first_values: Vec<f64>,
    /// Smallest value over all states of age 0
    pub age0_min_value: f64,
    /// Largest value over all states of age 0
    pub age0_max_value: f64,
}

impl SolveSummary {
    pub fn new(parameters: &ModelParameters, solution: &Solution) -> Self {
        let values = &solution.values;
        let first_values = (0..values.income_points().min(3))
            .map(|ie| values.get(0, 0, ie))
            .collect();
        let (age0_min_value, age0_max_value) = values
            .age(0)
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });

        Self {
            parameters: parameters.clone(),
            states_per_age: values.states_per_age(),
            timings: solution.timings.clone(),
            total_seconds: solution.total_seconds(),
            first_values,
            age0_min_value,
            age0_max_value,
        }
    }
}

/// Iterate every solved state in `[age][asset][income]` order
pub fn state_rows(solution: &Solution) -> impl Iterator<Item = StateRow> + '_ {
    let values = &solution.values;
    let xgrid = solution.model.assets().levels();
    let egrid = solution.model.income().levels();
    let ne = values.income_points();

    (0..values.periods()).flat_map(move |age| {
        (0..values.states_per_age()).map(move |ind| {
            let (ix, ie) = decompose_state(ind, ne);
            let choice = solution.policy.get(age, ix, ie);
            StateRow {
                age,
                asset_index: ix,
                income_index: ie,
                assets: xgrid[ix],
                income: egrid[ie],
                value: values.get(age, ix, ie),
                choice_index: choice,
                next_assets: choice.map(|ixp| xgrid[ixp]),
            }
        })
    })
}

/// Write every solved state as CSV with a header row
pub fn write_csv<W: Write>(solution: &Solution, writer: W) -> Result<usize, csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut rows = 0;
    for row in state_rows(solution) {
        csv_writer.serialize(row)?;
        rows += 1;
    }
    csv_writer.flush()?;
    Ok(rows)
}
