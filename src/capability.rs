use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;
use tracing::debug;
use uuid::Uuid;

use crate::account::{
    check_credit_limit, check_interest_rate, check_overdraft_amount, Account, AccountKind,
};
use crate::decimal::{Money, Rate};
use crate::errors::Result;
use crate::history::{AdjustedProperty, ChangeHistoryEntry};
use crate::types::Capability;

/// capability mutators, mirroring the balance engine's two-tier model:
/// `update_*` is a silent system-driven correction, `adjust_*` is an audited
/// user-driven one carrying an effective date and a reason
impl Account {
    // --- credit limit ---

    pub fn update_credit_limit(
        &mut self,
        new_value: Money,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        self.set_credit_limit(new_value)?;
        self.touch(time_provider.now());
        Ok(())
    }

    pub fn adjust_credit_limit(
        &mut self,
        new_value: Money,
        date_changed: DateTime<Utc>,
        reason: impl Into<String>,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        let old_value = self.credit_limit();
        self.set_credit_limit(new_value)?;
        self.audit(
            AdjustedProperty::CreditLimit,
            old_value.unwrap_or(Money::ZERO).to_string(),
            new_value.to_string(),
            date_changed,
            reason.into(),
        );
        self.touch(time_provider.now());
        Ok(())
    }

    fn set_credit_limit(&mut self, new_value: Money) -> Result<()> {
        self.ensure_not_deleted()?;
        self.ensure_supports(Capability::CreditLimit)?;
        check_credit_limit(new_value)?;
        debug!(id = %self.id(), %new_value, "credit limit changed");

        match self.kind_mut() {
            AccountKind::CreditCard { credit_limit, .. }
            | AccountKind::LineOfCredit { credit_limit, .. }
            | AccountKind::Loan { credit_limit, .. } => *credit_limit = new_value,
            _ => unreachable!("capability support was checked above"),
        }
        Ok(())
    }

    // --- interest rate ---

    pub fn update_interest_rate(
        &mut self,
        new_value: Rate,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        self.set_interest_rate(new_value)?;
        self.touch(time_provider.now());
        Ok(())
    }

    pub fn adjust_interest_rate(
        &mut self,
        new_value: Rate,
        date_changed: DateTime<Utc>,
        reason: impl Into<String>,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        let old_value = self.interest_rate();
        self.set_interest_rate(new_value)?;
        self.audit(
            AdjustedProperty::InterestRate,
            old_value.unwrap_or(Rate::ZERO).to_string(),
            new_value.to_string(),
            date_changed,
            reason.into(),
        );
        self.touch(time_provider.now());
        Ok(())
    }

    fn set_interest_rate(&mut self, new_value: Rate) -> Result<()> {
        self.ensure_not_deleted()?;
        self.ensure_supports(Capability::InterestRate)?;
        check_interest_rate(new_value)?;
        debug!(id = %self.id(), %new_value, "interest rate changed");

        match self.kind_mut() {
            AccountKind::Savings { interest_rate }
            | AccountKind::CreditCard { interest_rate, .. }
            | AccountKind::LineOfCredit { interest_rate, .. }
            | AccountKind::Loan { interest_rate, .. } => *interest_rate = new_value,
            _ => unreachable!("capability support was checked above"),
        }
        Ok(())
    }

    // --- overdraft amount ---

    pub fn update_overdraft_amount(
        &mut self,
        new_value: Money,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        self.set_overdraft_amount(new_value)?;
        self.touch(time_provider.now());
        Ok(())
    }

    pub fn adjust_overdraft_amount(
        &mut self,
        new_value: Money,
        date_changed: DateTime<Utc>,
        reason: impl Into<String>,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        let old_value = self.overdraft_amount();
        self.set_overdraft_amount(new_value)?;
        self.audit(
            AdjustedProperty::OverdraftAmount,
            old_value.unwrap_or(Money::ZERO).to_string(),
            new_value.to_string(),
            date_changed,
            reason.into(),
        );
        self.touch(time_provider.now());
        Ok(())
    }

    fn set_overdraft_amount(&mut self, new_value: Money) -> Result<()> {
        self.ensure_not_deleted()?;
        self.ensure_supports(Capability::OverdraftAmount)?;
        check_overdraft_amount(new_value)?;
        debug!(id = %self.id(), %new_value, "overdraft amount changed");

        match self.kind_mut() {
            AccountKind::Checking { overdraft_amount } => *overdraft_amount = new_value,
            _ => unreachable!("capability support was checked above"),
        }
        Ok(())
    }

    fn audit(
        &mut self,
        property: AdjustedProperty,
        old_value: String,
        new_value: String,
        date_changed: DateTime<Utc>,
        reason: String,
    ) {
        let entry = ChangeHistoryEntry {
            entry_id: Uuid::new_v4(),
            account_id: self.id(),
            owner_id: self.owner_id(),
            property,
            old_value,
            new_value,
            date_changed,
            reason,
        };
        self.change_history_mut().append(entry);
    }
}
