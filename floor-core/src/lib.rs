pub mod audit;
pub mod calculations;
pub mod catalog;
pub mod models;
pub mod repository;
pub mod service;

pub use audit::{AuditError, AuditSink};
pub use catalog::ReferenceCatalog;
pub use models::*;
pub use repository::{OrderRepository, StoreError};
pub use service::{Committed, OrderService, ServiceError, ServiceOptions};
