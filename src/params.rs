//! Model parameters with the reference calibration as defaults
//!
//! Parameters can be built in code, loaded from a JSON file (missing keys fall
//! back to the defaults), and are validated as a whole before any grid is built.

use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::grid::{AssetGridSpec, IncomeProcessSpec};

/// CRRA preferences
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Relative risk aversion (ssigma)
    #[serde(alias = "ssigma")]
    pub risk_aversion: f64,

    /// Discount factor (bbeta)
    #[serde(alias = "bbeta")]
    pub discount_factor: f64,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            risk_aversion: 2.0,
            discount_factor: 0.97,
        }
    }
}

/// Prices faced by the household
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Prices {
    /// Return on savings (r)
    #[serde(alias = "r")]
    pub interest_rate: f64,

    /// Wage per efficiency unit (w)
    #[serde(alias = "w")]
    pub wage: f64,
}

impl Default for Prices {
    fn default() -> Self {
        Self {
            interest_rate: 0.07,
            wage: 5.0,
        }
    }
}

/// Complete parameter set for one solve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParameters {
    pub assets: AssetGridSpec,
    pub income: IncomeProcessSpec,
    pub preferences: Preferences,
    pub prices: Prices,

    /// Number of life-cycle periods (T)
    #[serde(alias = "T")]
    pub periods: usize,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            assets: AssetGridSpec::default(),
            income: IncomeProcessSpec::default(),
            preferences: Preferences::default(),
            prices: Prices::default(),
            periods: 10,
        }
    }
}

impl ModelParameters {
    /// Load parameters from a JSON file
    pub fn from_json_path(path: &Path) -> Result<Self, Box<dyn Error>> {
        let file = File::open(path)?;
        let params: Self = serde_json::from_reader(BufReader::new(file))?;
        Ok(params)
    }

    /// Validate every parameter group, reporting the first failure
    pub fn validate(&self) -> Result<(), ModelError> {
        self.assets.validate()?;
        self.income.validate()?;

        if self.periods < 1 {
            return Err(ModelError::parameter("T", "at least one period is required"));
        }
        check_finite("ssigma", self.preferences.risk_aversion)?;
        check_finite("bbeta", self.preferences.discount_factor)?;
        check_finite("r", self.prices.interest_rate)?;
        check_finite("w", self.prices.wage)?;
        Ok(())
    }

    /// Number of states per age (nx * ne)
    pub fn states_per_age(&self) -> usize {
        self.assets.points * self.income.points
    }
}

fn check_finite(name: &'static str, value: f64) -> Result<(), ModelError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ModelError::parameter(name, format!("must be finite, got {}", value)))
    }
}
