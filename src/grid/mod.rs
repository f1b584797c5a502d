//! State-space discretization: asset grid and Markov income process

mod asset;
mod income;

pub use asset::{AssetGrid, AssetGridSpec};
pub use income::{normal_cdf, IncomeProcess, IncomeProcessSpec, TransitionMatrix};
