use rust_decimal::Decimal;
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info};

use crate::{
    account::{Account, AccountError},
    command::{Position, TransactionCommandError, TransactionKind, TransactionRequest},
};

pub mod account_processor;

use account_processor::AccountProcessor;

/// Malformed top-level input. Nothing is evaluated when one of these occurs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProcessingError {
    #[error("Invalid account data: expected a record")]
    InvalidAccount,
    #[error("Invalid account data: missing {0}")]
    MissingAccountField(&'static str),
    #[error("Invalid initial balance: {0}")]
    InvalidInitialBalance(String),
    #[error("Invalid transactions: expected a list")]
    InvalidTransactionList,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransactionProcessError {
    #[error(transparent)]
    CommandErr(#[from] TransactionCommandError),
    #[error(transparent)]
    AccountErr(#[from] AccountError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedTransaction {
    pub position: Position,
    pub kind: TransactionKind,
    pub amount: Decimal,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Rejection {
    Structural(ProcessingError),
    Transaction {
        position: Position,
        error: TransactionProcessError,
    },
}

impl Rejection {
    pub fn position(&self) -> Option<Position> {
        match self {
            Rejection::Structural(_) => None,
            Rejection::Transaction { position, .. } => Some(*position),
        }
    }

    pub fn reason(&self) -> String {
        match self {
            Rejection::Structural(err) => err.to_string(),
            Rejection::Transaction { error, .. } => error.to_string(),
        }
    }
}

/// Either side of a processed transaction, borrowed from a [`ProcessingResult`].
#[derive(Debug, Clone, Copy)]
pub enum Outcome<'a> {
    Applied(&'a AppliedTransaction),
    Rejected(&'a Rejection),
}

#[derive(Debug)]
pub struct ProcessingResult {
    /// `None` when the input was structurally invalid.
    pub account: Option<Account>,
    pub applied: Vec<AppliedTransaction>,
    pub rejected: Vec<Rejection>,
    pub summary: String,
}

impl ProcessingResult {
    fn structural_failure(err: ProcessingError) -> Self {
        error!(%err, "Aborting run on malformed input");
        Self {
            account: None,
            applied: Vec::new(),
            summary: err.to_string(),
            rejected: vec![Rejection::Structural(err)],
        }
    }

    pub fn is_structural_failure(&self) -> bool {
        self.account.is_none()
    }

    /// Applied and rejected transactions merged back into input order.
    /// A structural rejection has no position and comes first.
    pub fn outcomes(&self) -> Vec<Outcome<'_>> {
        let mut outcomes: Vec<Outcome<'_>> = self
            .applied
            .iter()
            .map(Outcome::Applied)
            .chain(self.rejected.iter().map(Outcome::Rejected))
            .collect();
        outcomes.sort_by_key(|outcome| match outcome {
            Outcome::Applied(applied) => Some(applied.position),
            Outcome::Rejected(rejection) => rejection.position(),
        });
        outcomes
    }
}

pub trait TransactionProcessor {
    fn process_transaction(
        &mut self,
        position: Position,
        request: &TransactionRequest,
    ) -> Result<AppliedTransaction, TransactionProcessError>;
}

/// Validates the account descriptor and the transaction list, then folds every
/// transaction into the account in input order.
pub fn process(account: &Value, transactions: &Value) -> ProcessingResult {
    let account = match Account::from_descriptor(account) {
        Ok(account) => account,
        Err(err) => return ProcessingResult::structural_failure(err),
    };
    let Value::Array(transactions) = transactions else {
        return ProcessingResult::structural_failure(ProcessingError::InvalidTransactionList);
    };

    info!(
        account = account.id(),
        transactions = transactions.len(),
        "Processing transactions"
    );
    let mut processor = AccountProcessor::new(account);
    let mut applied = Vec::new();
    let mut rejected = Vec::new();
    for (idx, raw) in transactions.iter().enumerate() {
        let position = idx + 1;
        match processor.process_transaction(position, &TransactionRequest::from(raw)) {
            Ok(tx) => applied.push(tx),
            Err(error) => rejected.push(Rejection::Transaction { position, error }),
        }
    }

    let summary = format!("{} applied, {} rejected", applied.len(), rejected.len());
    let account = processor.into_account();
    info!(account = account.id(), balance = %account.balance(), "{summary}");
    ProcessingResult {
        account: Some(account),
        applied,
        rejected,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use serde_json::json;

    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn descriptor(balance: Value) -> Value {
        json!({
            "account_id": "ACC-001",
            "holder": "Jane Doe",
            "currency": "USD",
            "initial_balance": balance,
        })
    }

    #[test]
    fn empty_transaction_list_keeps_balance() {
        let result = process(&descriptor(json!(1000)), &json!([]));
        let account = result.account.unwrap();
        assert_eq!(account.balance(), dec("1000"));
        assert!(result.applied.is_empty());
        assert!(result.rejected.is_empty());
        assert_eq!(result.summary, "0 applied, 0 rejected");
    }

    #[test]
    fn all_valid_transactions_applied() {
        let result = process(
            &descriptor(json!(1000)),
            &json!([
                { "type": "Deposit", "amount": 500 },
                { "type": "Withdraw", "amount": 200 },
                { "type": "Deposit", "amount": 300 },
            ]),
        );
        assert_eq!(result.applied.len(), 3);
        assert!(result.rejected.is_empty());
        assert_eq!(result.account.unwrap().balance(), dec("1600"));
        assert_eq!(result.summary, "3 applied, 0 rejected");
        let positions: Vec<_> = result.applied.iter().map(|tx| tx.position).collect();
        assert_eq!(positions, vec![1, 2, 3]);
    }

    #[test]
    fn mixed_valid_and_invalid_transactions() {
        let result = process(
            &descriptor(json!("2000")),
            &json!([
                { "type": "Deposit", "amount": 500 },
                { "type": "Withdraw", "amount": 3000 },
                { "type": "Deposit", "amount": -100 },
                { "type": "Unknown", "amount": 50 },
                { "type": "Withdraw" },
                { "amount": 200 },
                { "type": "Deposit", "amount": "invalid" },
            ]),
        );
        assert_eq!(
            result.applied,
            vec![AppliedTransaction {
                position: 1,
                kind: TransactionKind::Deposit,
                amount: dec("500"),
            }]
        );
        assert_eq!(result.account.unwrap().balance(), dec("2500"));

        let rejections: Vec<_> = result
            .rejected
            .iter()
            .map(|rejection| (rejection.position().unwrap(), rejection.reason()))
            .collect();
        assert_eq!(
            rejections,
            vec![
                (
                    2,
                    "Insufficient balance: required 3000, available 2500".to_string()
                ),
                (3, "Amount must be positive: -100".to_string()),
                (4, "Unknown transaction type: Unknown".to_string()),
                (5, "Missing transaction amount".to_string()),
                (6, "Missing transaction type".to_string()),
                (7, "Invalid amount: invalid".to_string()),
            ]
        );
        assert_eq!(result.summary, "1 applied, 6 rejected");
    }

    #[test]
    fn decimal_strings_and_exact_drain() {
        let result = process(
            &descriptor(json!("500.50")),
            &json!([
                { "type": "Deposit", "amount": "250.75" },
                { "type": "Withdraw", "amount": 0 },
                { "type": "Withdraw", "amount": 750.25 },
            ]),
        );
        assert_eq!(result.applied.len(), 2);
        assert_eq!(result.rejected.len(), 1);
        assert_eq!(result.rejected[0].position(), Some(2));
        assert_eq!(result.rejected[0].reason(), "Amount must be positive: 0");
        assert_eq!(result.account.unwrap().balance(), dec("1.00"));
    }

    #[test]
    fn overflowing_deposit_rejected_and_run_continues() {
        let result = process(
            &descriptor(json!("79228162514264337593543950335")),
            &json!([
                { "type": "Deposit", "amount": 1 },
                { "type": "Withdraw", "amount": 5 },
                { "type": "Deposit", "amount": 2 },
            ]),
        );
        assert_eq!(
            result.applied.iter().map(|tx| tx.position).collect::<Vec<_>>(),
            vec![2, 3]
        );
        assert_eq!(result.rejected.len(), 1);
        assert_eq!(result.rejected[0].position(), Some(1));
        assert_eq!(
            result.rejected[0].reason(),
            "Balance overflow: cannot deposit 1 onto 79228162514264337593543950335"
        );
        assert_eq!(
            result.account.unwrap().balance(),
            dec("79228162514264337593543950332")
        );
        assert_eq!(result.summary, "2 applied, 1 rejected");
    }

    #[test]
    fn withdraw_of_entire_balance_is_allowed() {
        let result = process(
            &descriptor(json!(100)),
            &json!([{ "type": "Withdraw", "amount": 100 }]),
        );
        assert_eq!(result.applied.len(), 1);
        assert_eq!(result.account.unwrap().balance(), Decimal::ZERO);
    }

    #[test]
    fn non_record_elements_rejected() {
        let result = process(
            &descriptor(json!(10)),
            &json!([null, 5, "Deposit", { "type": "Deposit", "amount": 1 }]),
        );
        assert_eq!(result.applied.len(), 1);
        assert_eq!(result.applied[0].position, 4);
        assert!(
            result
                .rejected
                .iter()
                .all(|rejection| rejection.reason() == "Invalid transaction object")
        );
    }

    #[test]
    fn structural_failures_abort() {
        let result = process(&json!({ "holder": "Jane" }), &json!([
            { "type": "Deposit", "amount": 1 }
        ]));
        assert!(result.is_structural_failure());
        assert!(result.applied.is_empty());
        assert_eq!(
            result.rejected,
            vec![Rejection::Structural(ProcessingError::MissingAccountField(
                "account_id"
            ))]
        );
        assert_eq!(result.rejected[0].position(), None);
        assert_eq!(result.summary, "Invalid account data: missing account_id");

        let result = process(&descriptor(json!("abc")), &json!([]));
        assert!(result.is_structural_failure());
        assert_eq!(result.summary, "Invalid initial balance: abc");

        for transactions in [Value::Null, json!({ "type": "Deposit" }), json!("[]")] {
            let result = process(&descriptor(json!(10)), &transactions);
            assert!(result.is_structural_failure());
            assert_eq!(
                result.rejected,
                vec![Rejection::Structural(ProcessingError::InvalidTransactionList)]
            );
        }
    }

    #[test]
    fn outcomes_restore_input_order() {
        let result = process(
            &descriptor(json!(10)),
            &json!([
                { "type": "Withdraw", "amount": 20 },
                { "type": "Deposit", "amount": 20 },
                { "type": "Bogus" },
                { "type": "Withdraw", "amount": 20 },
            ]),
        );
        let order: Vec<_> = result
            .outcomes()
            .iter()
            .map(|outcome| match outcome {
                Outcome::Applied(tx) => (tx.position, true),
                Outcome::Rejected(rejection) => (rejection.position().unwrap(), false),
            })
            .collect();
        assert_eq!(order, vec![(1, false), (2, true), (3, false), (4, true)]);
    }
}
