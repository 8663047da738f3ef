use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditEvent {
    Created { order_number: u32 },
    Edited { order_number: u32 },
    Removed { order_number: u32 },
    Exported { order_count: usize },
}

impl fmt::Display for AuditEvent {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Created { order_number } => write!(f, "Order Number {order_number}, CREATED"),
            Self::Edited { order_number } => write!(f, "Order Number {order_number}, EDITED"),
            Self::Removed { order_number } => write!(f, "Order Number {order_number}, REMOVED"),
            Self::Exported { order_count } => write!(f, "DATA EXPORTED ({order_count} orders)"),
        }
    }
}

/// One line of the audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: NaiveDateTime,
    pub event: AuditEvent,
}

impl AuditEntry {
    pub fn new(
        timestamp: NaiveDateTime,
        event: AuditEvent,
    ) -> Self {
        Self { timestamp, event }
    }
}

impl fmt::Display for AuditEntry {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(
            f,
            "{} : {}",
            self.timestamp.format("%Y-%m-%dT%H:%M:%S%.3f"),
            self.event
        )
    }
}
