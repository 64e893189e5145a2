pub mod account;
pub mod balance;
pub mod capability;
pub mod decimal;
pub mod errors;
pub mod history;
pub mod repository;
pub mod totals;
pub mod types;

// re-export key types
pub use account::{Account, AccountDetails, AccountKind, LoadedAccount};
pub use decimal::{Money, Rate};
pub use errors::{LedgerError, Result};
pub use history::{AdjustedProperty, ChangeHistory, ChangeHistoryEntry};
pub use repository::{AccountRepository, InMemoryAccountStore};
pub use totals::{MonthKey, MonthlyTotals, MonthlyTotalsLedger};
pub use types::{
    balance_effect, AccountId, AccountStatus, AccountType, BalanceEffect, Capability, OwnerId,
    Polarity, TransactionDirection,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
