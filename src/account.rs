use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::decimal::{Money, Rate};
use crate::errors::{LedgerError, Result};
use crate::history::ChangeHistory;
use crate::totals::MonthlyTotalsLedger;
use crate::types::{AccountId, AccountStatus, AccountType, Capability, OwnerId, Polarity};

/// tagged variant carrying the capability facets of each account type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AccountKind {
    Cash,
    Checking {
        overdraft_amount: Money,
    },
    Savings {
        interest_rate: Rate,
    },
    CreditCard {
        credit_limit: Money,
        interest_rate: Rate,
    },
    LineOfCredit {
        credit_limit: Money,
        interest_rate: Rate,
    },
    /// stub variant: reload is permitted, fresh construction is not
    Loan {
        credit_limit: Money,
        interest_rate: Rate,
    },
}

impl AccountKind {
    pub fn account_type(&self) -> AccountType {
        match self {
            AccountKind::Cash => AccountType::Cash,
            AccountKind::Checking { .. } => AccountType::Checking,
            AccountKind::Savings { .. } => AccountType::Savings,
            AccountKind::CreditCard { .. } => AccountType::CreditCard,
            AccountKind::LineOfCredit { .. } => AccountType::LineOfCredit,
            AccountKind::Loan { .. } => AccountType::Loan,
        }
    }

    /// check every capability facet against its bounds
    pub fn validate(&self) -> Result<()> {
        if let Some(limit) = self.credit_limit() {
            check_credit_limit(limit)?;
        }
        if let Some(rate) = self.interest_rate() {
            check_interest_rate(rate)?;
        }
        if let Some(overdraft) = self.overdraft_amount() {
            check_overdraft_amount(overdraft)?;
        }
        Ok(())
    }

    pub fn credit_limit(&self) -> Option<Money> {
        match self {
            AccountKind::CreditCard { credit_limit, .. }
            | AccountKind::LineOfCredit { credit_limit, .. }
            | AccountKind::Loan { credit_limit, .. } => Some(*credit_limit),
            _ => None,
        }
    }

    pub fn interest_rate(&self) -> Option<Rate> {
        match self {
            AccountKind::Savings { interest_rate }
            | AccountKind::CreditCard { interest_rate, .. }
            | AccountKind::LineOfCredit { interest_rate, .. }
            | AccountKind::Loan { interest_rate, .. } => Some(*interest_rate),
            _ => None,
        }
    }

    pub fn overdraft_amount(&self) -> Option<Money> {
        match self {
            AccountKind::Checking { overdraft_amount } => Some(*overdraft_amount),
            _ => None,
        }
    }
}

pub(crate) fn check_credit_limit(limit: Money) -> Result<()> {
    if limit.is_negative() {
        return Err(LedgerError::OutOfRange {
            property: "credit_limit",
            value: limit.to_string(),
        });
    }
    Ok(())
}

pub(crate) fn check_interest_rate(rate: Rate) -> Result<()> {
    if !rate.is_valid_percentage() {
        return Err(LedgerError::OutOfRange {
            property: "interest_rate",
            value: rate.to_string(),
        });
    }
    Ok(())
}

pub(crate) fn check_overdraft_amount(overdraft: Money) -> Result<()> {
    if overdraft.is_negative() {
        return Err(LedgerError::OutOfRange {
            property: "overdraft_amount",
            value: overdraft.to_string(),
        });
    }
    Ok(())
}

/// descriptive fields shared by creation and update_details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountDetails {
    pub name: String,
    pub description: String,
    pub display_color: String,
    pub is_default: bool,
    pub sort_order: u32,
}

impl AccountDetails {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            display_color: String::new(),
            is_default: false,
            sort_order: 0,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(LedgerError::Validation {
                field: "name",
                message: "account name is required".to_string(),
            });
        }
        Ok(())
    }
}

/// every persisted field, for verbatim reconstruction from storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadedAccount {
    pub id: AccountId,
    pub owner_id: OwnerId,
    pub kind: AccountKind,
    pub details: AccountDetails,
    pub balance: Money,
    pub date_created: DateTime<Utc>,
    pub date_updated: DateTime<Utc>,
    pub date_closed: Option<DateTime<Utc>>,
    pub date_deleted: Option<DateTime<Utc>>,
    pub change_history: ChangeHistory,
    pub monthly_totals: MonthlyTotalsLedger,
    pub version: u64,
}

/// the account aggregate
///
/// balance, monthly totals, and change history live on the one struct so a
/// logical operation either updates all of them or returns an error having
/// changed nothing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    id: AccountId,
    owner_id: OwnerId,
    kind: AccountKind,
    details: AccountDetails,
    balance: Money,
    date_created: DateTime<Utc>,
    date_updated: DateTime<Utc>,
    date_closed: Option<DateTime<Utc>>,
    date_deleted: Option<DateTime<Utc>>,
    change_history: ChangeHistory,
    monthly_totals: MonthlyTotalsLedger,
    version: u64,
}

impl Account {
    fn create(
        owner_id: OwnerId,
        kind: AccountKind,
        details: AccountDetails,
        time_provider: &SafeTimeProvider,
    ) -> Result<Self> {
        if owner_id.is_nil() {
            return Err(LedgerError::Validation {
                field: "owner_id",
                message: "owner id is required".to_string(),
            });
        }
        details.validate()?;
        kind.validate()?;

        let now = time_provider.now();
        let id = Uuid::new_v4();
        debug!(%id, account_type = %kind.account_type(), "account created");

        Ok(Self {
            id,
            owner_id,
            kind,
            details,
            balance: Money::ZERO,
            date_created: now,
            date_updated: now,
            date_closed: None,
            date_deleted: None,
            change_history: ChangeHistory::new(),
            monthly_totals: MonthlyTotalsLedger::new(),
            version: 0,
        })
    }

    /// create a cash account
    pub fn new_cash(
        owner_id: OwnerId,
        details: AccountDetails,
        time_provider: &SafeTimeProvider,
    ) -> Result<Self> {
        Self::create(owner_id, AccountKind::Cash, details, time_provider)
    }

    /// create a checking account with an overdraft ceiling
    pub fn new_checking(
        owner_id: OwnerId,
        details: AccountDetails,
        overdraft_amount: Money,
        time_provider: &SafeTimeProvider,
    ) -> Result<Self> {
        Self::create(
            owner_id,
            AccountKind::Checking { overdraft_amount },
            details,
            time_provider,
        )
    }

    /// create a savings account
    pub fn new_savings(
        owner_id: OwnerId,
        details: AccountDetails,
        interest_rate: Rate,
        time_provider: &SafeTimeProvider,
    ) -> Result<Self> {
        Self::create(
            owner_id,
            AccountKind::Savings { interest_rate },
            details,
            time_provider,
        )
    }

    /// create a credit card account
    pub fn new_credit_card(
        owner_id: OwnerId,
        details: AccountDetails,
        credit_limit: Money,
        interest_rate: Rate,
        time_provider: &SafeTimeProvider,
    ) -> Result<Self> {
        Self::create(
            owner_id,
            AccountKind::CreditCard {
                credit_limit,
                interest_rate,
            },
            details,
            time_provider,
        )
    }

    /// create a line of credit account
    pub fn new_line_of_credit(
        owner_id: OwnerId,
        details: AccountDetails,
        credit_limit: Money,
        interest_rate: Rate,
        time_provider: &SafeTimeProvider,
    ) -> Result<Self> {
        Self::create(
            owner_id,
            AccountKind::LineOfCredit {
                credit_limit,
                interest_rate,
            },
            details,
            time_provider,
        )
    }

    /// loan accounts cannot be originated here yet; existing ones still load
    pub fn new_loan(
        _owner_id: OwnerId,
        _details: AccountDetails,
        _credit_limit: Money,
        _interest_rate: Rate,
        _time_provider: &SafeTimeProvider,
    ) -> Result<Self> {
        Err(LedgerError::NotImplemented {
            message: "loan account origination is not implemented".to_string(),
        })
    }

    /// reconstruct an account verbatim from its persisted fields
    pub fn load(loaded: LoadedAccount) -> Result<Self> {
        if loaded.id.is_nil() {
            return Err(LedgerError::Validation {
                field: "id",
                message: "account id is required".to_string(),
            });
        }
        if loaded.owner_id.is_nil() {
            return Err(LedgerError::Validation {
                field: "owner_id",
                message: "owner id is required".to_string(),
            });
        }
        loaded.details.validate()?;
        loaded.kind.validate()?;

        Ok(Self {
            id: loaded.id,
            owner_id: loaded.owner_id,
            kind: loaded.kind,
            details: loaded.details,
            balance: loaded.balance,
            date_created: loaded.date_created,
            date_updated: loaded.date_updated,
            date_closed: loaded.date_closed,
            date_deleted: loaded.date_deleted,
            change_history: loaded.change_history,
            monthly_totals: loaded.monthly_totals,
            version: loaded.version,
        })
    }

    // --- read accessors; these never fail, even on deleted accounts ---

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn owner_id(&self) -> OwnerId {
        self.owner_id
    }

    pub fn kind(&self) -> &AccountKind {
        &self.kind
    }

    pub fn account_type(&self) -> AccountType {
        self.kind.account_type()
    }

    pub fn polarity(&self) -> Polarity {
        self.account_type().polarity()
    }

    pub fn details(&self) -> &AccountDetails {
        &self.details
    }

    pub fn name(&self) -> &str {
        &self.details.name
    }

    pub fn is_default(&self) -> bool {
        self.details.is_default
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    pub fn credit_limit(&self) -> Option<Money> {
        self.kind.credit_limit()
    }

    pub fn interest_rate(&self) -> Option<Rate> {
        self.kind.interest_rate()
    }

    pub fn overdraft_amount(&self) -> Option<Money> {
        self.kind.overdraft_amount()
    }

    pub fn date_created(&self) -> DateTime<Utc> {
        self.date_created
    }

    pub fn date_updated(&self) -> DateTime<Utc> {
        self.date_updated
    }

    pub fn date_closed(&self) -> Option<DateTime<Utc>> {
        self.date_closed
    }

    pub fn date_deleted(&self) -> Option<DateTime<Utc>> {
        self.date_deleted
    }

    pub fn status(&self) -> AccountStatus {
        if self.date_deleted.is_some() {
            AccountStatus::Deleted
        } else if self.date_closed.is_some() {
            AccountStatus::Closed
        } else {
            AccountStatus::Active
        }
    }

    pub fn is_closed(&self) -> bool {
        self.status() == AccountStatus::Closed
    }

    pub fn is_deleted(&self) -> bool {
        self.date_deleted.is_some()
    }

    /// whether the balance has breached the variant's ceiling
    ///
    /// credit-polarity accounts are over limit once more is owed than the
    /// credit limit; checking accounts once the balance drops below the
    /// negated overdraft ceiling
    pub fn is_over_limit(&self) -> bool {
        match self.kind {
            AccountKind::CreditCard { credit_limit, .. }
            | AccountKind::LineOfCredit { credit_limit, .. }
            | AccountKind::Loan { credit_limit, .. } => self.balance > credit_limit,
            AccountKind::Checking { overdraft_amount } => self.balance < -overdraft_amount,
            _ => false,
        }
    }

    pub fn change_history(&self) -> &ChangeHistory {
        &self.change_history
    }

    pub fn monthly_totals(&self) -> &MonthlyTotalsLedger {
        &self.monthly_totals
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// default accounts are never deletable
    pub fn can_be_deleted(&self) -> bool {
        !self.details.is_default
    }

    // --- shared mutation plumbing ---

    pub(crate) fn ensure_not_deleted(&self) -> Result<()> {
        if self.is_deleted() {
            return Err(LedgerError::AccountDeleted {
                account_id: self.id,
            });
        }
        Ok(())
    }

    pub(crate) fn ensure_supports(&self, capability: Capability) -> Result<()> {
        if !self.account_type().supports(capability) {
            return Err(LedgerError::CapabilityNotSupported {
                account_type: self.account_type(),
                capability,
            });
        }
        Ok(())
    }

    /// every successful non-no-op mutation lands here
    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.date_updated = now;
        self.version += 1;
    }

    pub(crate) fn kind_mut(&mut self) -> &mut AccountKind {
        &mut self.kind
    }

    pub(crate) fn balance_mut(&mut self) -> &mut Money {
        &mut self.balance
    }

    pub(crate) fn change_history_mut(&mut self) -> &mut ChangeHistory {
        &mut self.change_history
    }

    pub(crate) fn monthly_totals_mut(&mut self) -> &mut MonthlyTotalsLedger {
        &mut self.monthly_totals
    }

    // --- descriptive update ---

    /// silent descriptive update; no history entry
    pub fn update_details(
        &mut self,
        details: AccountDetails,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        self.ensure_not_deleted()?;
        details.validate()?;
        self.details = details;
        self.touch(time_provider.now());
        Ok(())
    }

    // --- lifecycle state machine ---

    /// close an active account; idempotent when already closed
    pub fn close(&mut self, date: DateTime<Utc>, time_provider: &SafeTimeProvider) -> Result<()> {
        self.ensure_not_deleted()?;
        if self.is_closed() {
            return Ok(());
        }
        debug!(id = %self.id, "account closed");
        self.date_closed = Some(date);
        self.touch(time_provider.now());
        Ok(())
    }

    /// reopen a closed account; idempotent when already active
    pub fn re_open(&mut self, time_provider: &SafeTimeProvider) -> Result<()> {
        self.ensure_not_deleted()?;
        if !self.is_closed() {
            return Ok(());
        }
        debug!(id = %self.id, "account reopened");
        self.date_closed = None;
        self.touch(time_provider.now());
        Ok(())
    }

    /// soft-delete the account; terminal, the record is never removed
    pub fn delete(&mut self, time_provider: &SafeTimeProvider) -> Result<()> {
        if self.is_deleted() {
            return Ok(());
        }
        if !self.can_be_deleted() {
            return Err(LedgerError::CannotDelete {
                account_id: self.id,
                reason: "default accounts cannot be deleted".to_string(),
            });
        }
        let now = time_provider.now();
        debug!(id = %self.id, "account soft-deleted");
        self.date_deleted = Some(now);
        self.touch(now);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use hourglass_rs::TimeSource;
    use rust_decimal_macros::dec;

    fn test_time() -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        ))
    }

    fn owner() -> OwnerId {
        Uuid::new_v4()
    }

    #[test]
    fn test_new_account_starts_at_zero() {
        let time = test_time();
        let account =
            Account::new_cash(owner(), AccountDetails::new("Wallet"), &time).unwrap();

        assert_eq!(account.balance(), Money::ZERO);
        assert_eq!(account.status(), AccountStatus::Active);
        assert_eq!(account.version(), 0);
        assert!(account.change_history().is_empty());
        assert!(account.monthly_totals().is_empty());
        assert!(account.date_closed().is_none());
        assert!(account.date_deleted().is_none());
        assert_eq!(
            account.date_created(),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_missing_owner_fails_validation() {
        let time = test_time();
        let result = Account::new_cash(Uuid::nil(), AccountDetails::new("Wallet"), &time);
        assert!(matches!(
            result,
            Err(LedgerError::Validation { field: "owner_id", .. })
        ));
    }

    #[test]
    fn test_blank_name_fails_validation() {
        let time = test_time();
        let result = Account::new_cash(owner(), AccountDetails::new("  "), &time);
        assert!(matches!(
            result,
            Err(LedgerError::Validation { field: "name", .. })
        ));
    }

    #[test]
    fn test_credit_limit_bounds_at_construction() {
        let time = test_time();
        let below = Account::new_credit_card(
            owner(),
            AccountDetails::new("Visa"),
            Money::from_str_exact("-0.01").unwrap(),
            Rate::from_percent(dec!(19.99)),
            &time,
        );
        assert!(matches!(
            below,
            Err(LedgerError::OutOfRange { property: "credit_limit", .. })
        ));

        let at_zero = Account::new_credit_card(
            owner(),
            AccountDetails::new("Visa"),
            Money::ZERO,
            Rate::from_percent(dec!(19.99)),
            &time,
        );
        assert!(at_zero.is_ok());
    }

    #[test]
    fn test_interest_rate_bounds_at_construction() {
        let time = test_time();
        for bad in [dec!(-0.01), dec!(100.01)] {
            let result = Account::new_savings(
                owner(),
                AccountDetails::new("Nest egg"),
                Rate::from_percent(bad),
                &time,
            );
            assert!(matches!(
                result,
                Err(LedgerError::OutOfRange { property: "interest_rate", .. })
            ));
        }
        for ok in [dec!(0), dec!(100)] {
            let result = Account::new_savings(
                owner(),
                AccountDetails::new("Nest egg"),
                Rate::from_percent(ok),
                &time,
            );
            assert!(result.is_ok());
        }
    }

    #[test]
    fn test_overdraft_bounds_at_construction() {
        let time = test_time();
        let result = Account::new_checking(
            owner(),
            AccountDetails::new("Everyday"),
            Money::from_str_exact("-0.01").unwrap(),
            &time,
        );
        assert!(matches!(
            result,
            Err(LedgerError::OutOfRange { property: "overdraft_amount", .. })
        ));
    }

    #[test]
    fn test_loan_origination_is_stubbed() {
        let time = test_time();
        let result = Account::new_loan(
            owner(),
            AccountDetails::new("Car loan"),
            Money::from_major(20_000),
            Rate::from_percent(dec!(6.5)),
            &time,
        );
        assert!(matches!(result, Err(LedgerError::NotImplemented { .. })));
    }

    #[test]
    fn test_load_reconstructs_verbatim() {
        let time = test_time();
        let mut account = Account::new_checking(
            owner(),
            AccountDetails::new("Everyday"),
            Money::from_major(200),
            &time,
        )
        .unwrap();
        let close_date = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        account.close(close_date, &time).unwrap();

        let loaded = Account::load(LoadedAccount {
            id: account.id(),
            owner_id: account.owner_id(),
            kind: *account.kind(),
            details: account.details().clone(),
            balance: account.balance(),
            date_created: account.date_created(),
            date_updated: account.date_updated(),
            date_closed: account.date_closed(),
            date_deleted: account.date_deleted(),
            change_history: account.change_history().clone(),
            monthly_totals: account.monthly_totals().clone(),
            version: account.version(),
        })
        .unwrap();

        assert_eq!(loaded.id(), account.id());
        assert_eq!(loaded.status(), AccountStatus::Closed);
        assert_eq!(loaded.date_closed(), Some(close_date));
        assert_eq!(loaded.version(), account.version());
    }

    #[test]
    fn test_load_requires_identity() {
        let time = test_time();
        let account =
            Account::new_cash(owner(), AccountDetails::new("Wallet"), &time).unwrap();
        let loaded = LoadedAccount {
            id: Uuid::nil(),
            owner_id: account.owner_id(),
            kind: *account.kind(),
            details: account.details().clone(),
            balance: account.balance(),
            date_created: account.date_created(),
            date_updated: account.date_updated(),
            date_closed: None,
            date_deleted: None,
            change_history: ChangeHistory::new(),
            monthly_totals: MonthlyTotalsLedger::new(),
            version: 0,
        };
        assert!(matches!(
            Account::load(loaded),
            Err(LedgerError::Validation { field: "id", .. })
        ));
    }

    #[test]
    fn test_close_is_idempotent() {
        let time = test_time();
        let mut account =
            Account::new_cash(owner(), AccountDetails::new("Wallet"), &time).unwrap();
        let close_date = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();

        account.close(close_date, &time).unwrap();
        let updated = account.date_updated();
        let version = account.version();

        account.close(close_date, &time).unwrap();
        assert_eq!(account.date_updated(), updated);
        assert_eq!(account.version(), version);
        assert_eq!(account.date_closed(), Some(close_date));
    }

    #[test]
    fn test_re_open_restores_active() {
        let time = test_time();
        let mut account =
            Account::new_cash(owner(), AccountDetails::new("Wallet"), &time).unwrap();

        // no-op while active
        let version = account.version();
        account.re_open(&time).unwrap();
        assert_eq!(account.version(), version);

        account
            .close(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(), &time)
            .unwrap();
        account.re_open(&time).unwrap();
        assert_eq!(account.status(), AccountStatus::Active);
        assert!(account.date_closed().is_none());
    }

    #[test]
    fn test_delete_is_terminal() {
        let time = test_time();
        let mut account =
            Account::new_cash(owner(), AccountDetails::new("Wallet"), &time).unwrap();
        account.delete(&time).unwrap();

        assert!(account.is_deleted());
        assert_eq!(account.status(), AccountStatus::Deleted);
        assert!(matches!(
            account.close(time.now(), &time),
            Err(LedgerError::AccountDeleted { .. })
        ));
        assert!(matches!(
            account.re_open(&time),
            Err(LedgerError::AccountDeleted { .. })
        ));

        // delete again is a no-op
        let version = account.version();
        account.delete(&time).unwrap();
        assert_eq!(account.version(), version);
    }

    #[test]
    fn test_default_account_cannot_be_deleted() {
        let time = test_time();
        let mut details = AccountDetails::new("Wallet");
        details.is_default = true;
        let mut account = Account::new_cash(owner(), details, &time).unwrap();

        assert!(!account.can_be_deleted());
        assert!(matches!(
            account.delete(&time),
            Err(LedgerError::CannotDelete { .. })
        ));
        assert!(!account.is_deleted());
    }

    #[test]
    fn test_update_details_guards_deleted() {
        let time = test_time();
        let mut account =
            Account::new_cash(owner(), AccountDetails::new("Wallet"), &time).unwrap();
        account.delete(&time).unwrap();

        let result = account.update_details(AccountDetails::new("Renamed"), &time);
        assert!(matches!(result, Err(LedgerError::AccountDeleted { .. })));
        assert_eq!(account.name(), "Wallet");
    }

    #[test]
    fn test_accessors_survive_deletion() {
        let time = test_time();
        let mut account = Account::new_credit_card(
            owner(),
            AccountDetails::new("Visa"),
            Money::from_major(1000),
            Rate::from_percent(dec!(19.99)),
            &time,
        )
        .unwrap();
        account.delete(&time).unwrap();

        assert_eq!(account.balance(), Money::ZERO);
        assert_eq!(account.credit_limit(), Some(Money::from_major(1000)));
        assert_eq!(account.interest_rate(), Some(Rate::from_percent(dec!(19.99))));
        assert!(!account.is_over_limit());
    }
}
