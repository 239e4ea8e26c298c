//! Draft subsystem: prospect-pool and pick-order generation, automated
//! evaluation for AI-controlled teams, and pick execution.

pub mod evaluation;
pub mod execution;
pub mod generation;

pub use evaluation::{best_available, evaluate, EvaluationWeights, TeamNeed};
pub use execution::{execute_ai_pick, execute_pick};
pub use generation::{generate_and_store_class, generate_prospects, generate_standard_pick_order};
