use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;
use tracing::debug;
use uuid::Uuid;

use crate::account::Account;
use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::history::{AdjustedProperty, ChangeHistoryEntry};
use crate::types::{balance_effect, BalanceEffect, TransactionDirection};

impl Account {
    /// apply a transaction amount to the balance
    ///
    /// `amount` is a non-negative magnitude; the direction is carried
    /// separately and resolved against the account polarity. the monthly
    /// bucket is keyed by the transaction's own date, not wall-clock time
    pub fn apply_transaction_amount(
        &mut self,
        amount: Money,
        direction: TransactionDirection,
        transaction_date: DateTime<Utc>,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        self.ensure_not_deleted()?;
        check_amount(amount)?;

        let effect = balance_effect(self.polarity(), direction);
        debug!(
            id = %self.id(),
            %amount,
            ?direction,
            ?effect,
            "transaction applied"
        );

        self.shift_balance(amount, effect);
        self.monthly_totals_mut()
            .record(transaction_date, direction, amount);
        self.touch(time_provider.now());
        Ok(())
    }

    /// exact algebraic inverse of `apply_transaction_amount`, used when a
    /// transaction is deleted or voided
    pub fn undo_transaction_amount(
        &mut self,
        amount: Money,
        direction: TransactionDirection,
        transaction_date: DateTime<Utc>,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        self.ensure_not_deleted()?;
        check_amount(amount)?;

        let effect = balance_effect(self.polarity(), direction).inverse();
        debug!(
            id = %self.id(),
            %amount,
            ?direction,
            ?effect,
            "transaction undone"
        );

        self.shift_balance(amount, effect);
        self.monthly_totals_mut()
            .unrecord(transaction_date, direction, amount);
        self.touch(time_provider.now());
        Ok(())
    }

    /// manual reconciliation: sets the balance outright and records one
    /// audited change-history entry
    ///
    /// distinct from transaction application; monthly totals are untouched
    pub fn adjust_balance(
        &mut self,
        new_value: Money,
        date_changed: DateTime<Utc>,
        reason: impl Into<String>,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        self.ensure_not_deleted()?;

        let old_value = self.balance();
        debug!(id = %self.id(), %old_value, %new_value, "balance adjusted");

        *self.balance_mut() = new_value;
        let entry = ChangeHistoryEntry {
            entry_id: Uuid::new_v4(),
            account_id: self.id(),
            owner_id: self.owner_id(),
            property: AdjustedProperty::Balance,
            old_value: old_value.to_string(),
            new_value: new_value.to_string(),
            date_changed,
            reason: reason.into(),
        };
        self.change_history_mut().append(entry);
        self.touch(time_provider.now());
        Ok(())
    }

    fn shift_balance(&mut self, amount: Money, effect: BalanceEffect) {
        match effect {
            BalanceEffect::Increase => *self.balance_mut() += amount,
            BalanceEffect::Decrease => *self.balance_mut() -= amount,
        }
    }
}

fn check_amount(amount: Money) -> Result<()> {
    if amount.is_negative() {
        return Err(LedgerError::OutOfRange {
            property: "amount",
            value: amount.to_string(),
        });
    }
    Ok(())
}
