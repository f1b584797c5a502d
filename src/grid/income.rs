//! Tauchen (1986) discretization of the AR(1) log-income shock
//!
//! The log shock follows `e' = llambda_eps * e + eps` with
//! `eps ~ N(0, ssigma_eps^2)`. The state space is an evenly spaced grid spanning
//! `m` unconditional standard deviations on either side of zero; transition
//! probabilities integrate the innovation density over half-step bins around
//! each grid point, with the outermost bins absorbing the tails.

use std::f64::consts::SQRT_2;

use serde::{Deserialize, Serialize};
use statrs::function::erf::erfc;

use crate::error::ModelError;

/// Parameters of the AR(1) income shock and its grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncomeProcessSpec {
    /// Innovation standard deviation (ssigma_eps)
    #[serde(alias = "ssigma_eps")]
    pub innovation_std: f64,

    /// Persistence coefficient (llambda_eps)
    #[serde(alias = "llambda_eps")]
    pub persistence: f64,

    /// Number of unconditional standard deviations covered on each side (m)
    #[serde(alias = "m")]
    pub span: f64,

    /// Number of grid points (ne)
    #[serde(alias = "ne")]
    pub points: usize,
}

impl Default for IncomeProcessSpec {
    fn default() -> Self {
        Self {
            innovation_std: 0.02058,
            persistence: 0.99,
            span: 1.5,
            points: 15,
        }
    }
}

impl IncomeProcessSpec {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.points < 2 {
            return Err(ModelError::grid(
                "income",
                format!("ne = {} must be at least 2", self.points),
            ));
        }
        if !(self.span.is_finite() && self.span > 0.0) {
            return Err(ModelError::grid(
                "income",
                format!("m = {} must be positive", self.span),
            ));
        }
        if !(self.innovation_std.is_finite() && self.innovation_std > 0.0) {
            return Err(ModelError::parameter(
                "ssigma_eps",
                format!("must be positive, got {}", self.innovation_std),
            ));
        }
        if !(self.persistence.abs() < 1.0) {
            return Err(ModelError::DegenerateProcess {
                persistence: self.persistence,
            });
        }
        Ok(())
    }

    /// Unconditional standard deviation of the stationary process
    pub fn unconditional_std(&self) -> f64 {
        (self.innovation_std.powi(2) / (1.0 - self.persistence.powi(2))).sqrt()
    }
}

/// Standard normal cumulative distribution function
///
/// Accurate to about 1e-12 absolute, which bounds the drift of the transition
/// matrix against other CDF implementations.
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// Row-stochastic `ne x ne` matrix stored row-major
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionMatrix {
    size: usize,
    data: Vec<f64>,
}

impl TransitionMatrix {
    pub(crate) fn from_rows(size: usize, data: Vec<f64>) -> Self {
        debug_assert_eq!(data.len(), size * size);
        Self { size, data }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Probability of moving from shock `from` to shock `to`
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Transition probabilities out of shock `from`
    pub fn row(&self, from: usize) -> &[f64] {
        &self.data[from * self.size..(from + 1) * self.size]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.size)
    }

    pub fn row_sums(&self) -> Vec<f64> {
        self.rows().map(|row| row.iter().sum()).collect()
    }
}

/// Discretized income process: shock grid plus Markov transition matrix
#[derive(Debug, Clone, PartialEq)]
pub struct IncomeProcess {
    pub(crate) log_levels: Vec<f64>,
    pub(crate) levels: Vec<f64>,
    pub(crate) transition: TransitionMatrix,
}

impl IncomeProcess {
    /// Discretize with the standard normal CDF
    pub fn tauchen(spec: &IncomeProcessSpec) -> Result<Self, ModelError> {
        Self::tauchen_with(spec, normal_cdf)
    }

    /// Discretize with a caller-supplied innovation CDF
    pub fn tauchen_with<F>(spec: &IncomeProcessSpec, cdf: F) -> Result<Self, ModelError>
    where
        F: Fn(f64) -> f64,
    {
        spec.validate()?;

        let ne = spec.points;
        let sigma_y = spec.unconditional_std();
        let estep = 2.0 * sigma_y * spec.span / (ne - 1) as f64;
        let log_levels: Vec<f64> = (0..ne)
            .map(|i| -spec.span * sigma_y + i as f64 * estep)
            .collect();

        let half = (log_levels[1] - log_levels[0]) / 2.0;
        let lambda = spec.persistence;
        let sigma = spec.innovation_std;

        let mut data = vec![0.0; ne * ne];
        for (j, row) in data.chunks_exact_mut(ne).enumerate() {
            let mean = lambda * log_levels[j];
            for (k, p) in row.iter_mut().enumerate() {
                let upper = (log_levels[k] - mean + half) / sigma;
                let lower = (log_levels[k] - mean - half) / sigma;
                *p = if k == 0 {
                    cdf(upper)
                } else if k == ne - 1 {
                    1.0 - cdf(lower)
                } else {
                    cdf(upper) - cdf(lower)
                };
            }
        }

        // Exponentiate only once the matrix has been built from log space
        let levels = log_levels.iter().map(|e| e.exp()).collect();

        log::debug!(
            "Tauchen grid: ne={} sigma_y={:.6} step={:.6}",
            ne,
            sigma_y,
            estep
        );

        Ok(Self {
            log_levels,
            levels,
            transition: TransitionMatrix::from_rows(ne, data),
        })
    }

    /// Income multipliers `exp(log shock)`
    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    /// Log-space shock grid the transition matrix was built on
    pub fn log_levels(&self) -> &[f64] {
        &self.log_levels
    }

    pub fn transition(&self) -> &TransitionMatrix {
        &self.transition
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}
