use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub product_type: String,
    pub cost_per_square_foot: Decimal,
    pub labor_cost_per_square_foot: Decimal,
}
