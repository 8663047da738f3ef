use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A sales-tax jurisdiction. `tax_rate` is a percentage (`25.00` means 25%).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub abbreviation: String,
    pub name: String,
    pub tax_rate: Decimal,
}
