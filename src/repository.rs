use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::account::Account;
use crate::errors::{LedgerError, Result};
use crate::types::AccountId;

/// persistence contract consumed by the application layer
///
/// the snapshot covers balance, monthly totals, and change history as one
/// document, so everything a logical operation touched commits together.
/// `save` is compare-and-swap on the aggregate version: `expected_version`
/// is the version the caller loaded (`None` for a freshly created account),
/// and a stale save fails with `VersionConflict` instead of silently
/// dropping the other writer's update
pub trait AccountRepository {
    fn load_by_id(&self, id: AccountId) -> Result<Option<Account>>;
    fn save(&self, account: &Account, expected_version: Option<u64>) -> Result<()>;
}

/// in-memory store over serialized snapshots; a single lock plus the version
/// check serializes concurrent mutation attempts per account
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    accounts: Mutex<HashMap<AccountId, StoredSnapshot>>,
}

#[derive(Debug, Clone)]
struct StoredSnapshot {
    version: u64,
    document: String,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.accounts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AccountRepository for InMemoryAccountStore {
    fn load_by_id(&self, id: AccountId) -> Result<Option<Account>> {
        let accounts = self.accounts.lock().unwrap_or_else(PoisonError::into_inner);
        match accounts.get(&id) {
            Some(snapshot) => Ok(Some(serde_json::from_str(&snapshot.document)?)),
            None => Ok(None),
        }
    }

    fn save(&self, account: &Account, expected_version: Option<u64>) -> Result<()> {
        let mut accounts = self.accounts.lock().unwrap_or_else(PoisonError::into_inner);

        let stored_version = accounts.get(&account.id()).map(|s| s.version);
        if stored_version != expected_version {
            return Err(LedgerError::VersionConflict {
                account_id: account.id(),
                expected: expected_version.unwrap_or(0),
                actual: stored_version.unwrap_or(0),
            });
        }

        let document = serde_json::to_string(account)?;
        debug!(id = %account.id(), version = account.version(), "snapshot saved");
        accounts.insert(
            account.id(),
            StoredSnapshot {
                version: account.version(),
                document,
            },
        );
        Ok(())
    }
}
