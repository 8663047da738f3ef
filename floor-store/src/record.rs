//! Row struct between the on-disk record and [`Order`].
//!
//! Every column is read as text and parsed explicitly so decimal values keep
//! the scale they were written with.

use chrono::NaiveDate;
use floor_core::{Order, StoreError};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::format::RecordFormat;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct OrderRow {
    pub order_number: String,
    pub customer_name: String,
    pub state: String,
    pub tax_rate: String,
    pub product_type: String,
    pub area: String,
    pub cost_per_square_foot: String,
    pub labor_cost_per_square_foot: String,
    pub material_cost: String,
    pub labor_cost: String,
    pub tax: String,
    pub total: String,
}

impl OrderRow {
    /// Stored form of `order`. The customer name is escaped; every other
    /// text field must already be safe to write.
    pub fn from_order(
        order: &Order,
        format: &RecordFormat,
    ) -> Result<Self, StoreError> {
        if !format.accepts_name(&order.customer_name) {
            return Err(StoreError::UnsafeField {
                field: "CustomerName",
                value: order.customer_name.clone(),
            });
        }
        let checked = |field: &'static str, value: &str| {
            if format.is_safe_field(value) {
                Ok(value.to_string())
            } else {
                Err(StoreError::UnsafeField {
                    field,
                    value: value.to_string(),
                })
            }
        };

        Ok(Self {
            order_number: order.order_number.to_string(),
            customer_name: format.escape_name(&order.customer_name),
            state: checked("State", &order.state)?,
            tax_rate: order.tax_rate.to_string(),
            product_type: checked("ProductType", &order.product_type)?,
            area: order.area.to_string(),
            cost_per_square_foot: order.cost_per_square_foot.to_string(),
            labor_cost_per_square_foot: order.labor_cost_per_square_foot.to_string(),
            material_cost: order.material_cost.to_string(),
            labor_cost: order.labor_cost.to_string(),
            tax: order.tax.to_string(),
            total: order.total.to_string(),
        })
    }

    /// Parse the row into an order placed on `date`. The error is a reason
    /// string; the caller knows the file and line.
    pub fn into_order(
        self,
        date: NaiveDate,
        format: &RecordFormat,
    ) -> Result<Order, String> {
        let order_number = self
            .order_number
            .trim()
            .parse::<u32>()
            .map_err(|e| format!("invalid OrderNumber '{}': {e}", self.order_number))?;
        if order_number == 0 {
            return Err("OrderNumber must be positive".to_string());
        }

        Ok(Order {
            order_number,
            order_date: date,
            customer_name: format.unescape_name(&self.customer_name),
            tax_rate: parse_decimal("TaxRate", &self.tax_rate)?,
            area: parse_decimal("Area", &self.area)?,
            cost_per_square_foot: parse_decimal("CostPerSquareFoot", &self.cost_per_square_foot)?,
            labor_cost_per_square_foot: parse_decimal(
                "LaborCostPerSquareFoot",
                &self.labor_cost_per_square_foot,
            )?,
            material_cost: parse_decimal("MaterialCost", &self.material_cost)?,
            labor_cost: parse_decimal("LaborCost", &self.labor_cost)?,
            tax: parse_decimal("Tax", &self.tax)?,
            total: parse_decimal("Total", &self.total)?,
            state: self.state,
            product_type: self.product_type,
        })
    }

    /// Fields in column order.
    pub fn fields(&self) -> [&str; 12] {
        [
            &self.order_number,
            &self.customer_name,
            &self.state,
            &self.tax_rate,
            &self.product_type,
            &self.area,
            &self.cost_per_square_foot,
            &self.labor_cost_per_square_foot,
            &self.material_cost,
            &self.labor_cost,
            &self.tax,
            &self.total,
        ]
    }
}

fn parse_decimal(
    column: &str,
    value: &str,
) -> Result<Decimal, String> {
    value
        .trim()
        .parse::<Decimal>()
        .map_err(|e| format!("invalid {column} '{value}': {e}"))
}
