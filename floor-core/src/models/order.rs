use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A flooring purchase order with every derived field filled in.
///
/// The order number is unique across all dates. The order date is not part
/// of the persisted record line; the store derives it from the partition the
/// record lives in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_number: u32,
    pub order_date: NaiveDate,
    pub customer_name: String,

    // Reference data captured at calculation time
    pub state: String,
    pub tax_rate: Decimal,
    pub product_type: String,
    pub area: Decimal,
    pub cost_per_square_foot: Decimal,
    pub labor_cost_per_square_foot: Decimal,

    // Calculated values
    pub material_cost: Decimal,
    pub labor_cost: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

/// For creating new orders (no number, no calculated values)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub order_date: NaiveDate,
    pub customer_name: String,
    pub state: String,
    pub product_type: String,
    pub area: Decimal,
}

/// The user-editable fields of an existing order.
///
/// Number and date are fixed for the lifetime of an order and cannot be
/// edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderEdit {
    pub customer_name: String,
    pub state: String,
    pub product_type: String,
    pub area: Decimal,
}

impl OrderEdit {
    /// True when every editable field matches `order`.
    pub fn matches(
        &self,
        order: &Order,
    ) -> bool {
        self.customer_name == order.customer_name
            && self.state == order.state
            && self.product_type == order.product_type
            && self.area == order.area
    }
}

impl From<&Order> for OrderEdit {
    fn from(order: &Order) -> Self {
        Self {
            customer_name: order.customer_name.clone(),
            state: order.state.clone(),
            product_type: order.product_type.clone(),
            area: order.area,
        }
    }
}
