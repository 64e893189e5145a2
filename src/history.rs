use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::types::{AccountId, OwnerId};

/// properties that can receive an audited adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdjustedProperty {
    Balance,
    CreditLimit,
    InterestRate,
    OverdraftAmount,
}

impl fmt::Display for AdjustedProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AdjustedProperty::Balance => "Balance",
            AdjustedProperty::CreditLimit => "Credit Limit",
            AdjustedProperty::InterestRate => "Interest Rate",
            AdjustedProperty::OverdraftAmount => "Overdraft Amount",
        };
        write!(f, "{}", name)
    }
}

/// one audited change to a tracked property
///
/// old/new values are stringified snapshots, the effective date may be
/// backdated to when the correction actually took effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeHistoryEntry {
    pub entry_id: Uuid,
    pub account_id: AccountId,
    pub owner_id: OwnerId,
    pub property: AdjustedProperty,
    pub old_value: String,
    pub new_value: String,
    pub date_changed: DateTime<Utc>,
    pub reason: String,
}

/// append-only ledger of adjustments; entries are never mutated or removed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeHistory {
    entries: Vec<ChangeHistoryEntry>,
}

impl ChangeHistory {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn append(&mut self, entry: ChangeHistoryEntry) {
        self.entries.push(entry);
    }

    /// entries in append order
    pub fn entries(&self) -> &[ChangeHistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(property: AdjustedProperty, old: &str, new: &str) -> ChangeHistoryEntry {
        ChangeHistoryEntry {
            entry_id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            property,
            old_value: old.to_string(),
            new_value: new.to_string(),
            date_changed: Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap(),
            reason: "statement reconciliation".to_string(),
        }
    }

    #[test]
    fn test_entries_keep_append_order() {
        let mut history = ChangeHistory::new();
        history.append(entry(AdjustedProperty::Balance, "0", "125.50"));
        history.append(entry(AdjustedProperty::CreditLimit, "1000", "1500"));

        assert_eq!(history.len(), 2);
        assert_eq!(history.entries()[0].property, AdjustedProperty::Balance);
        assert_eq!(history.entries()[1].property, AdjustedProperty::CreditLimit);
    }

    #[test]
    fn test_property_display_names() {
        assert_eq!(AdjustedProperty::InterestRate.to_string(), "Interest Rate");
        assert_eq!(AdjustedProperty::OverdraftAmount.to_string(), "Overdraft Amount");
    }
}
