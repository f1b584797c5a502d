//! Lifecycle Solver - finite-horizon consumption-savings model with income risk
//!
//! This library provides:
//! - Evenly spaced asset grids
//! - Tauchen (1986) discretization of an AR(1) log-income shock
//! - Parallel backward induction of the value and policy functions
//! - Parameter loading, run summaries and CSV export

pub mod error;
pub mod grid;
pub mod output;
pub mod params;
pub mod solver;

// Re-export commonly used types
pub use error::ModelError;
pub use grid::{AssetGrid, AssetGridSpec, IncomeProcess, IncomeProcessSpec, TransitionMatrix};
pub use params::{ModelParameters, Preferences, Prices};
pub use solver::{LifeCycleSolver, Model, PolicyFunction, Solution, ValueFunction};
