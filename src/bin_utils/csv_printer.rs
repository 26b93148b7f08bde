use std::io::Write;

use csv::WriterBuilder;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    command::Position,
    processor::{Outcome, ProcessingResult},
};

const HEADER: [&str; 5] = ["position", "type", "amount", "outcome", "reason"];

#[derive(Debug, Serialize)]
pub struct LedgerRow {
    pub position: Option<Position>,
    pub kind: Option<&'static str>,
    pub amount: Option<Decimal>,
    pub outcome: &'static str,
    pub reason: Option<String>,
}

impl From<Outcome<'_>> for LedgerRow {
    fn from(outcome: Outcome<'_>) -> Self {
        match outcome {
            Outcome::Applied(tx) => LedgerRow {
                position: Some(tx.position),
                kind: Some(tx.kind.as_str()),
                amount: Some(tx.amount),
                outcome: "applied",
                reason: None,
            },
            Outcome::Rejected(rejection) => LedgerRow {
                position: rejection.position(),
                kind: None,
                amount: None,
                outcome: "rejected",
                reason: Some(rejection.reason()),
            },
        }
    }
}

/// Writes every outcome of the run as a CSV row, in input order.
/// The header is always written, even when there is nothing to report.
pub fn print_ledger<W>(output: &mut W, result: &ProcessingResult) -> anyhow::Result<()>
where
    W: Write,
{
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(output);
    if let Err(err) = writer.write_record(HEADER) {
        anyhow::bail!("Failed to write to CSV: {err}")
    }
    for outcome in result.outcomes() {
        if let Err(err) = writer.serialize(LedgerRow::from(outcome)) {
            anyhow::bail!("Failed to write to CSV: {err}")
        }
    }
    // Ensure all data is flushed to the output
    if let Err(err) = writer.flush() {
        anyhow::bail!("Failed to flush CSV writer: {err}")
    }
    Ok(())
}
