use std::fmt;

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::amount::{coerce_amount, display_raw};

/// 1-based position of a transaction in the input sequence.
pub type Position = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Deposit,
    Withdraw,
}

impl TransactionKind {
    /// Matching is case-sensitive: only `Deposit` and `Withdraw` are known.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Deposit" => Some(Self::Deposit),
            "Withdraw" => Some(Self::Withdraw),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "Deposit",
            Self::Withdraw => "Withdraw",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single transaction element exactly as it was received.
#[derive(Debug, Clone)]
pub enum TransactionRequest {
    Record(Map<String, Value>),
    Malformed(Value),
}

impl From<Value> for TransactionRequest {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(record) => Self::Record(record),
            other => Self::Malformed(other),
        }
    }
}

impl From<&Value> for TransactionRequest {
    fn from(value: &Value) -> Self {
        Self::from(value.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionCommand {
    pub position: Position,
    pub kind: TransactionKind,
    pub amount: Decimal,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransactionCommandError {
    #[error("Invalid transaction object")]
    InvalidObject,
    #[error("Missing transaction type")]
    MissingType,
    #[error("Unknown transaction type: {0}")]
    UnknownType(String),
    #[error("Missing transaction amount")]
    MissingAmount,
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Amount must be positive: {0}")]
    NonPositiveAmount(Decimal),
}

impl TransactionCommand {
    /// Validates the shape and the amount of a request. Checks run in a fixed order
    /// and the first failing one is reported.
    pub fn parse(
        position: Position,
        request: &TransactionRequest,
    ) -> Result<Self, TransactionCommandError> {
        let TransactionRequest::Record(record) = request else {
            return Err(TransactionCommandError::InvalidObject);
        };
        let kind = Self::parse_kind(record)?;
        let amount = Self::parse_amount(record)?;
        Ok(Self {
            position,
            kind,
            amount,
        })
    }

    fn parse_kind(
        record: &Map<String, Value>,
    ) -> Result<TransactionKind, TransactionCommandError> {
        match record.get("type") {
            None | Some(Value::Null) => Err(TransactionCommandError::MissingType),
            Some(Value::String(raw)) if raw.is_empty() => {
                Err(TransactionCommandError::MissingType)
            }
            Some(Value::String(raw)) => TransactionKind::parse(raw)
                .ok_or_else(|| TransactionCommandError::UnknownType(raw.clone())),
            Some(other) => Err(TransactionCommandError::UnknownType(display_raw(other))),
        }
    }

    fn parse_amount(record: &Map<String, Value>) -> Result<Decimal, TransactionCommandError> {
        let raw = match record.get("amount") {
            None | Some(Value::Null) => return Err(TransactionCommandError::MissingAmount),
            Some(raw) => raw,
        };
        let amount = coerce_amount(raw)
            .ok_or_else(|| TransactionCommandError::InvalidAmount(display_raw(raw)))?;
        if amount > Decimal::ZERO {
            Ok(amount)
        } else {
            Err(TransactionCommandError::NonPositiveAmount(amount))
        }
    }
}
