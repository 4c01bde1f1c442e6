//! Configuration for statement ingestion.
//!
//! ```rust
//! use ingest::IngestConfig;
//! use uuid::Uuid;
//!
//! let cfg = IngestConfig::default()
//!     .with_id_namespace(Uuid::new_v5(&Uuid::NAMESPACE_DNS, b"ledger.example.com"))
//!     .with_negate_debits(false);
//! assert!(!cfg.negate_debits);
//! ```
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Runtime knobs for [`parse_statement`](crate::parse_statement).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Namespace for deterministic record ids (UUIDv5).
    #[serde(default = "IngestConfig::default_namespace")]
    pub id_namespace: Uuid,
    /// Store debit amounts as negative numbers.
    #[serde(default = "IngestConfig::default_negate_debits")]
    pub negate_debits: bool,
}

impl IngestConfig {
    fn default_namespace() -> Uuid {
        Uuid::NAMESPACE_OID
    }

    fn default_negate_debits() -> bool {
        true
    }

    pub fn with_id_namespace(mut self, namespace: Uuid) -> Self {
        self.id_namespace = namespace;
        self
    }

    pub fn with_negate_debits(mut self, negate: bool) -> Self {
        self.negate_debits = negate;
        self
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            id_namespace: Self::default_namespace(),
            negate_debits: Self::default_negate_debits(),
        }
    }
}
