//! Order lifecycle service composing the catalog, the order repository and
//! the audit sink.

mod error;
mod orders;

pub use error::ServiceError;
pub use orders::{Committed, MINIMUM_AREA, OrderService, ServiceOptions};
