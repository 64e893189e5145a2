use thiserror::Error;
use uuid::Uuid;

use crate::types::{AccountType, Capability};

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("validation failed for {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("account {account_id} is deleted and accepts no further changes")]
    AccountDeleted {
        account_id: Uuid,
    },

    #[error("{account_type} does not support {capability}")]
    CapabilityNotSupported {
        account_type: AccountType,
        capability: Capability,
    },

    #[error("{property} out of range: {value}")]
    OutOfRange {
        property: &'static str,
        value: String,
    },

    #[error("account {account_id} cannot be deleted: {reason}")]
    CannotDelete {
        account_id: Uuid,
        reason: String,
    },

    #[error("not implemented: {message}")]
    NotImplemented {
        message: String,
    },

    #[error("stale write for account {account_id}: expected version {expected}, found {actual}")]
    VersionConflict {
        account_id: Uuid,
        expected: u64,
        actual: u64,
    },

    #[error("snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
