mod audit_entry;
mod order;
mod product;
mod state;

pub use audit_entry::{AuditEntry, AuditEvent};
pub use order::{Order, OrderDraft, OrderEdit};
pub use product::Product;
pub use state::State;
