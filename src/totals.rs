use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::decimal::Money;
use crate::types::TransactionDirection;

/// calendar bucket key, ordered year-then-month
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    /// key for the month a transaction is dated in, not wall-clock time
    pub fn from_date(date: DateTime<Utc>) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

/// per-month credit/debit rollup
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotals {
    pub credit_total: Money,
    pub credit_count: u32,
    pub debit_total: Money,
    pub debit_count: u32,
}

impl MonthlyTotals {
    pub fn is_zero(&self) -> bool {
        self.credit_total.is_zero()
            && self.debit_total.is_zero()
            && self.credit_count == 0
            && self.debit_count == 0
    }
}

/// per-account monthly rollups, fed by the balance engine
///
/// policy: buckets are never pruned once created, and an undo against a month
/// that was never recorded creates the bucket and applies the decrement, so
/// bucket totals always equal applied-minus-undone amounts regardless of
/// operation order; counts saturate at zero instead of going negative
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotalsLedger {
    // serialized as a sequence of (key, value) pairs: JSON object keys must
    // be strings, and MonthKey is a struct
    #[serde(with = "buckets_serde")]
    buckets: BTreeMap<MonthKey, MonthlyTotals>,
}

mod buckets_serde {
    use super::{MonthKey, MonthlyTotals};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S: Serializer>(
        map: &BTreeMap<MonthKey, MonthlyTotals>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        map.iter().collect::<Vec<_>>().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<MonthKey, MonthlyTotals>, D::Error> {
        let pairs = Vec::<(MonthKey, MonthlyTotals)>::deserialize(deserializer)?;
        Ok(pairs.into_iter().collect())
    }
}

impl MonthlyTotalsLedger {
    pub fn new() -> Self {
        Self {
            buckets: BTreeMap::new(),
        }
    }

    /// record an applied transaction into its month bucket
    pub fn record(&mut self, date: DateTime<Utc>, direction: TransactionDirection, amount: Money) {
        let bucket = self.buckets.entry(MonthKey::from_date(date)).or_default();
        match direction {
            TransactionDirection::Credit => {
                bucket.credit_total += amount;
                bucket.credit_count += 1;
            }
            TransactionDirection::Debit => {
                bucket.debit_total += amount;
                bucket.debit_count += 1;
            }
        }
    }

    /// exact inverse of `record`, used when a transaction is undone
    pub fn unrecord(
        &mut self,
        date: DateTime<Utc>,
        direction: TransactionDirection,
        amount: Money,
    ) {
        let bucket = self.buckets.entry(MonthKey::from_date(date)).or_default();
        match direction {
            TransactionDirection::Credit => {
                bucket.credit_total -= amount;
                bucket.credit_count = bucket.credit_count.saturating_sub(1);
            }
            TransactionDirection::Debit => {
                bucket.debit_total -= amount;
                bucket.debit_count = bucket.debit_count.saturating_sub(1);
            }
        }
    }

    pub fn get(&self, key: MonthKey) -> Option<&MonthlyTotals> {
        self.buckets.get(&key)
    }

    /// buckets ordered by year then month
    pub fn iter(&self) -> impl Iterator<Item = (&MonthKey, &MonthlyTotals)> {
        self.buckets.iter()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// sum of credit totals across all buckets
    pub fn credit_total(&self) -> Money {
        self.buckets
            .values()
            .fold(Money::ZERO, |acc, b| acc + b.credit_total)
    }

    /// sum of debit totals across all buckets
    pub fn debit_total(&self) -> Money {
        self.buckets
            .values()
            .fold(Money::ZERO, |acc, b| acc + b.debit_total)
    }
}
