//! Order cost calculations.
//!
//! All arithmetic is exact decimal arithmetic; nothing here goes through
//! binary floating point.

pub mod common;
pub mod order_costs;

pub use order_costs::{CalculationError, CostInputs, OrderCosts, compute_costs};
