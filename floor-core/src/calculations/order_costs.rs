//! Derived money fields of a flooring order.
//!
//! | Field         | Formula                                         |
//! |---------------|-------------------------------------------------|
//! | material cost | round(area × cost per square foot)              |
//! | labor cost    | round(area × labor cost per square foot)        |
//! | tax           | round((material + labor) × tax rate / 100)      |
//! | total         | material + labor + tax (no further rounding)    |
//!
//! Rounding is half-up to two places and happens before the total is
//! summed. Every step is checked: an amount too large to hold in a
//! [`Decimal`] with two places is a [`CalculationError`], never a panic.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use floor_core::calculations::{CostInputs, compute_costs};
//!
//! let costs = compute_costs(&CostInputs {
//!     area: dec!(249.00),
//!     cost_per_square_foot: dec!(3.50),
//!     labor_cost_per_square_foot: dec!(4.15),
//!     tax_rate: dec!(25.00),
//! })
//! .unwrap();
//!
//! assert_eq!(costs.material_cost, dec!(871.50));
//! assert_eq!(costs.labor_cost, dec!(1033.35));
//! assert_eq!(costs.tax, dec!(476.21));
//! assert_eq!(costs.total, dec!(2381.06));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::common::round_half_up;
use crate::models::{Order, Product, State};

/// Everything the cost formulas read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostInputs {
    /// Floor area in square feet.
    pub area: Decimal,
    pub cost_per_square_foot: Decimal,
    pub labor_cost_per_square_foot: Decimal,
    /// Tax rate as a percentage, e.g. `6.25`.
    pub tax_rate: Decimal,
}

impl CostInputs {
    /// Combines an area with the current catalog rates.
    pub fn from_catalog(
        area: Decimal,
        product: &Product,
        state: &State,
    ) -> Self {
        Self {
            area,
            cost_per_square_foot: product.cost_per_square_foot,
            labor_cost_per_square_foot: product.labor_cost_per_square_foot,
            tax_rate: state.tax_rate,
        }
    }

    /// The rates already recorded on an order.
    pub fn from_order(order: &Order) -> Self {
        Self {
            area: order.area,
            cost_per_square_foot: order.cost_per_square_foot,
            labor_cost_per_square_foot: order.labor_cost_per_square_foot,
            tax_rate: order.tax_rate,
        }
    }
}

/// The four derived fields of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCosts {
    pub material_cost: Decimal,
    pub labor_cost: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl OrderCosts {
    /// Copies the derived fields onto `order`.
    pub fn apply_to(
        &self,
        order: &mut Order,
    ) {
        order.material_cost = self.material_cost;
        order.labor_cost = self.labor_cost;
        order.tax = self.tax;
        order.total = self.total;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CalculationError {
    #[error("{0} is too large to calculate")]
    Overflow(&'static str),
}

fn money(
    field: &'static str,
    value: Option<Decimal>,
) -> Result<Decimal, CalculationError> {
    let rounded = value.map(round_half_up).ok_or(CalculationError::Overflow(field))?;
    // rescale gives up silently when the integer part leaves no room for cents
    if rounded.scale() != 2 {
        return Err(CalculationError::Overflow(field));
    }
    Ok(rounded)
}

pub fn material_cost(inputs: &CostInputs) -> Result<Decimal, CalculationError> {
    money(
        "material cost",
        inputs.area.checked_mul(inputs.cost_per_square_foot),
    )
}

pub fn labor_cost(inputs: &CostInputs) -> Result<Decimal, CalculationError> {
    money(
        "labor cost",
        inputs.area.checked_mul(inputs.labor_cost_per_square_foot),
    )
}

/// Tax on the already rounded material and labor costs.
pub fn tax(
    material_cost: Decimal,
    labor_cost: Decimal,
    tax_rate: Decimal,
) -> Result<Decimal, CalculationError> {
    let taxed = material_cost
        .checked_add(labor_cost)
        .and_then(|base| base.checked_mul(tax_rate))
        .and_then(|amount| amount.checked_div(Decimal::ONE_HUNDRED));
    money("tax", taxed)
}

/// Computes all derived fields. Pure and deterministic.
///
/// # Errors
/// [`CalculationError::Overflow`] when any amount exceeds what a
/// [`Decimal`] can hold at two decimal places.
pub fn compute_costs(inputs: &CostInputs) -> Result<OrderCosts, CalculationError> {
    let material_cost = material_cost(inputs)?;
    let labor_cost = labor_cost(inputs)?;
    let tax = tax(material_cost, labor_cost, inputs.tax_rate)?;
    let total = material_cost
        .checked_add(labor_cost)
        .and_then(|sum| sum.checked_add(tax));

    Ok(OrderCosts {
        material_cost,
        labor_cost,
        tax,
        total: money("total", total)?,
    })
}
