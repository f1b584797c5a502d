//! Backward-induction solver for the life-cycle savings problem

mod engine;
mod evaluator;
mod model;
mod value;

pub use engine::{AgeTiming, LifeCycleSolver, Solution};
pub use evaluator::{crra_utility, StateChoice, StateValueEvaluator, INFEASIBLE_UTILITY, INITIAL_BOUND};
pub use model::Model;
pub use value::{decompose_state, PolicyFunction, ValueFunction};
