use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// unique identifier for an account
pub type AccountId = Uuid;

/// unique identifier for an account owner
pub type OwnerId = Uuid;

/// closed set of account variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountType {
    Cash,
    Checking,
    Savings,
    CreditCard,
    LineOfCredit,
    Loan,
}

impl AccountType {
    /// polarity is derived from the variant and never independently settable
    pub fn polarity(&self) -> Polarity {
        match self {
            AccountType::Cash | AccountType::Checking | AccountType::Savings => Polarity::Debit,
            AccountType::CreditCard | AccountType::LineOfCredit | AccountType::Loan => {
                Polarity::Credit
            }
        }
    }

    /// whether the variant carries the given capability facet
    pub fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::CreditLimit => matches!(
                self,
                AccountType::CreditCard | AccountType::LineOfCredit | AccountType::Loan
            ),
            Capability::InterestRate => matches!(
                self,
                AccountType::Savings
                    | AccountType::CreditCard
                    | AccountType::LineOfCredit
                    | AccountType::Loan
            ),
            Capability::OverdraftAmount => matches!(self, AccountType::Checking),
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AccountType::Cash => "Cash",
            AccountType::Checking => "Checking",
            AccountType::Savings => "Savings",
            AccountType::CreditCard => "Credit Card",
            AccountType::LineOfCredit => "Line of Credit",
            AccountType::Loan => "Loan",
        };
        write!(f, "{}", name)
    }
}

/// whether a balance conventionally represents an asset or a liability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    /// asset accounts: balance grows when money comes in
    Debit,
    /// liability accounts: balance is what is owed
    Credit,
}

/// direction of a transaction from the user's perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionDirection {
    /// money entering the ledger (deposit, payment received, refund)
    Credit,
    /// money leaving the ledger (purchase, withdrawal)
    Debit,
}

/// resolved effect of a transaction on an account balance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceEffect {
    Increase,
    Decrease,
}

impl BalanceEffect {
    /// algebraic inverse, used when a transaction is undone
    pub fn inverse(&self) -> BalanceEffect {
        match self {
            BalanceEffect::Increase => BalanceEffect::Decrease,
            BalanceEffect::Decrease => BalanceEffect::Increase,
        }
    }
}

/// the one place the sign rule lives
///
/// | polarity | direction | effect   |
/// |----------|-----------|----------|
/// | Debit    | Credit    | Increase |
/// | Debit    | Debit     | Decrease |
/// | Credit   | Credit    | Decrease |
/// | Credit   | Debit     | Increase |
///
/// a credit transaction against a liability pays down what is owed; a debit
/// transaction against a liability owes more
pub fn balance_effect(polarity: Polarity, direction: TransactionDirection) -> BalanceEffect {
    match (polarity, direction) {
        (Polarity::Debit, TransactionDirection::Credit) => BalanceEffect::Increase,
        (Polarity::Debit, TransactionDirection::Debit) => BalanceEffect::Decrease,
        (Polarity::Credit, TransactionDirection::Credit) => BalanceEffect::Decrease,
        (Polarity::Credit, TransactionDirection::Debit) => BalanceEffect::Increase,
    }
}

/// optional capability facets, present only on applicable variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Capability {
    CreditLimit,
    InterestRate,
    OverdraftAmount,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::CreditLimit => "Credit Limit",
            Capability::InterestRate => "Interest Rate",
            Capability::OverdraftAmount => "Overdraft Amount",
        };
        write!(f, "{}", name)
    }
}

/// lifecycle status, derived from the closed/deleted dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountStatus {
    Active,
    Closed,
    /// terminal soft-delete state, the record is never physically removed
    Deleted,
}
