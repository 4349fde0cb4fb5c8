//! Common types for the shared crate

use serde::{Deserialize, Serialize};

/// Timestamp type (Unix milliseconds)
pub type Timestamp = i64;

/// Table identifier
pub type TableId = i64;

/// Guest session context
///
/// Issued by the session/auth collaborator when a guest scans a table QR code.
/// The floor server trusts it as given and does not validate the tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub tenant_id: String,
    pub table_id: TableId,
}

impl SessionContext {
    pub fn new(tenant_id: impl Into<String>, table_id: TableId) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            table_id,
        }
    }
}
