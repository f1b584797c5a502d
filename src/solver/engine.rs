//! Backward induction over the life cycle
//!
//! Ages are solved from `T-1` down to `0`. Within an age every state reads only
//! the already solved slice of the next age and writes its own cell, so the
//! states are evaluated in parallel with rayon. The join at the end of each
//! parallel pass is the only synchronization point between ages.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;

use crate::error::ModelError;
use crate::params::ModelParameters;

use super::evaluator::StateValueEvaluator;
use super::model::Model;
use super::value::{PolicyFunction, ValueFunction};

/// Wall-clock time spent on one age
#[derive(Debug, Clone, Serialize)]
pub struct AgeTiming {
    /// Zero-based age index
    pub age: usize,
    /// Seconds spent solving this age
    pub seconds: f64,
    /// Seconds since the solve started, after this age finished
    pub cumulative_seconds: f64,
}

/// Solved value and policy functions with the model they belong to
#[derive(Debug, Clone)]
pub struct Solution {
    pub model: Model,
    pub values: ValueFunction,
    pub policy: PolicyFunction,
    pub timings: Vec<AgeTiming>,
}

impl Solution {
    /// Total wall-clock time of the backward induction
    pub fn total_seconds(&self) -> f64 {
        self.timings
            .last()
            .map(|t| t.cumulative_seconds)
            .unwrap_or(0.0)
    }

    /// Next-period asset level chosen in a state, if any choice was made
    pub fn savings(&self, age: usize, ix: usize, ie: usize) -> Option<f64> {
        self.policy
            .get(age, ix, ie)
            .map(|ixp| self.model.assets.levels()[ixp])
    }
}

/// Backward-induction solver
pub struct LifeCycleSolver {
    model: Model,
    cancel: Option<Arc<AtomicBool>>,
}

impl LifeCycleSolver {
    pub fn new(model: Model) -> Self {
        Self { model, cancel: None }
    }

    /// Validate parameters and build the model, failing before any solving
    pub fn from_params(params: &ModelParameters) -> Result<Self, ModelError> {
        Ok(Self::new(Model::build(params)?))
    }

    /// Check `flag` before each age and stop with [`ModelError::Cancelled`] once set
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Solve every age from the terminal period backwards
    pub fn solve(self) -> Result<Solution, ModelError> {
        let model = self.model;
        let periods = model.periods;
        let nx = model.assets.len();
        let ne = model.income.len();

        let mut values = ValueFunction::new(periods, nx, ne);
        let mut policy = PolicyFunction::new(periods, nx, ne);
        let mut timings = Vec::with_capacity(periods);

        log::info!(
            "Life cycle computation: T={} nx={} ne={} ({} states per age)",
            periods,
            nx,
            ne,
            nx * ne
        );

        let start = Instant::now();
        for age in (0..periods).rev() {
            if let Some(flag) = &self.cancel {
                if flag.load(Ordering::Relaxed) {
                    log::warn!("Solve cancelled before age {}", age);
                    return Err(ModelError::Cancelled { age });
                }
            }

            let age_start = Instant::now();
            solve_age(&model, age, &mut values, &mut policy);

            let timing = AgeTiming {
                age,
                seconds: age_start.elapsed().as_secs_f64(),
                cumulative_seconds: start.elapsed().as_secs_f64(),
            };
            log::info!("Age: {}. Time: {:.4} seconds.", age + 1, timing.cumulative_seconds);
            timings.push(timing);
        }

        log::info!("TOTAL ELAPSED TIME: {:.4} seconds.", start.elapsed().as_secs_f64());

        Ok(Solution {
            model,
            values,
            policy,
            timings,
        })
    }
}

/// Evaluate all states of one age in parallel
fn solve_age(model: &Model, age: usize, values: &mut ValueFunction, policy: &mut PolicyFunction) {
    let evaluator = StateValueEvaluator::new(model);
    let (current, next) = values.split_age_mut(age);

    current
        .par_iter_mut()
        .zip(policy.age_mut(age).par_iter_mut())
        .enumerate()
        .for_each(|(ind, (value, choice))| {
            let best = evaluator.evaluate(age, ind, next);
            *value = best.value;
            *choice = best.choice;
        });
}
