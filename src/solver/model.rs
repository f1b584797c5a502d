//! Immutable model bundle shared by every state evaluation

use crate::error::ModelError;
use crate::grid::{AssetGrid, IncomeProcess};
use crate::params::{ModelParameters, Preferences, Prices};

/// Grids, transition matrix and scalar parameters for one solve
///
/// Built once before backward induction starts and only read afterwards, so it
/// can be shared across worker threads by reference.
#[derive(Debug, Clone)]
pub struct Model {
    pub(crate) assets: AssetGrid,
    pub(crate) income: IncomeProcess,
    pub(crate) preferences: Preferences,
    pub(crate) prices: Prices,
    pub(crate) periods: usize,
}

impl Model {
    /// Validate parameters and build both grids
    pub fn build(params: &ModelParameters) -> Result<Self, ModelError> {
        params.validate()?;

        let assets = AssetGrid::build(&params.assets)?;
        let income = IncomeProcess::tauchen(&params.income)?;

        log::debug!(
            "Model built: nx={} ne={} T={}",
            assets.len(),
            income.len(),
            params.periods
        );

        Ok(Self {
            assets,
            income,
            preferences: params.preferences,
            prices: params.prices,
            periods: params.periods,
        })
    }

    pub fn assets(&self) -> &AssetGrid {
        &self.assets
    }

    pub fn income(&self) -> &IncomeProcess {
        &self.income
    }

    pub fn preferences(&self) -> Preferences {
        self.preferences
    }

    pub fn prices(&self) -> Prices {
        self.prices
    }

    /// Number of life-cycle periods (T)
    pub fn periods(&self) -> usize {
        self.periods
    }

    /// Number of states per age (nx * ne)
    pub fn states_per_age(&self) -> usize {
        self.assets.len() * self.income.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_small_model() {
        let mut params = ModelParameters::default();
        params.assets.points = 20;
        params.income.points = 4;
        params.periods = 3;

        let model = Model::build(&params).unwrap();
        assert_eq!(model.assets().len(), 20);
        assert_eq!(model.income().len(), 4);
        assert_eq!(model.states_per_age(), 80);
        assert_eq!(model.periods(), 3);
    }

    #[test]
    fn test_build_fails_before_grids() {
        let mut params = ModelParameters::default();
        params.income.persistence = -1.0;
        assert!(matches!(
            Model::build(&params),
            Err(ModelError::DegenerateProcess { .. })
        ));
    }
}
