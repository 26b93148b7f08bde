use rust_decimal::Decimal;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::{
    amount::{coerce_amount, display_raw},
    command::{Position, TransactionCommand, TransactionKind},
    processor::ProcessingError,
};

#[derive(Debug, PartialEq, Eq)]
pub enum AccountEventKind {
    Deposited,
    Withdrawn,
}

#[derive(Debug)]
pub struct AccountEvent {
    position: Position,
    amount: Decimal,
    kind: AccountEventKind,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountError {
    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance {
        required: Decimal,
        available: Decimal,
    },
    #[error("Balance overflow: cannot deposit {amount} onto {balance}")]
    BalanceOverflow { amount: Decimal, balance: Decimal },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    id: String,
    holder: String,
    currency: String,
    initial_balance: Decimal,
    balance: Decimal,
}

impl Account {
    pub fn new(id: String, holder: String, currency: String, initial_balance: Decimal) -> Self {
        Self {
            id,
            holder,
            currency,
            initial_balance,
            balance: initial_balance,
        }
    }

    /// Builds an account from an untyped descriptor with the keys `account_id`,
    /// `holder`, `currency` and `initial_balance`.
    pub fn from_descriptor(descriptor: &Value) -> Result<Self, ProcessingError> {
        let Value::Object(record) = descriptor else {
            return Err(ProcessingError::InvalidAccount);
        };
        let id = required_text(record, "account_id")?;
        let holder = required_text(record, "holder")?;
        let raw_balance = match record.get("initial_balance") {
            None | Some(Value::Null) => {
                return Err(ProcessingError::MissingAccountField("initial_balance"));
            }
            Some(raw) => raw,
        };
        let currency = required_text(record, "currency")?;
        let initial_balance = coerce_amount(raw_balance)
            .ok_or_else(|| ProcessingError::InvalidInitialBalance(display_raw(raw_balance)))?;
        Ok(Self::new(id, holder, currency, initial_balance))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn holder(&self) -> &str {
        &self.holder
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn initial_balance(&self) -> Decimal {
        self.initial_balance
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn apply(&mut self, event: &AccountEvent) {
        match event.kind {
            AccountEventKind::Deposited => {
                self.balance += event.amount;
            }
            AccountEventKind::Withdrawn => {
                self.balance -= event.amount;
            }
        }
    }

    pub fn handle_transaction(
        &self,
        command: &TransactionCommand,
    ) -> Result<AccountEvent, AccountError> {
        match command.kind {
            TransactionKind::Deposit => {
                if self.balance.checked_add(command.amount).is_some() {
                    Ok(AccountEvent {
                        position: command.position,
                        amount: command.amount,
                        kind: AccountEventKind::Deposited,
                    })
                } else {
                    Err(AccountError::BalanceOverflow {
                        amount: command.amount,
                        balance: self.balance,
                    })
                }
            }
            TransactionKind::Withdraw => {
                // draining the balance to exactly zero is allowed
                if self.balance >= command.amount {
                    Ok(AccountEvent {
                        position: command.position,
                        amount: command.amount,
                        kind: AccountEventKind::Withdrawn,
                    })
                } else {
                    Err(AccountError::InsufficientBalance {
                        required: command.amount,
                        available: self.balance,
                    })
                }
            }
        }
    }
}

impl AccountEvent {
    pub fn position(&self) -> Position {
        self.position
    }
}

fn required_text(
    record: &Map<String, Value>,
    field: &'static str,
) -> Result<String, ProcessingError> {
    match record.get(field) {
        Some(Value::String(text)) if !text.is_empty() => Ok(text.clone()),
        _ => Err(ProcessingError::MissingAccountField(field)),
    }
}
