//! This module could be a separate crate on its own, to bootstrap [`crate::processor`] within
//! the binary, but it is kept here so the integration tests can use it.

use std::io::{Read, Write};

use crate::processor::{ProcessingResult, process};
use anyhow::Result;
use csv_printer::print_ledger;
use json_parser::parse_document;
pub mod csv_printer;
pub mod json_parser;

pub struct Service<'w, R, W: 'w> {
    pub input: R,
    pub output: &'w mut W,
    pub summary_printer: Box<dyn FnMut(&ProcessingResult)>,
}

impl<'w, R, W> Service<'w, R, W>
where
    R: Read,
    W: Write + 'w,
{
    pub fn run(mut self) -> Result<()> {
        let document = parse_document(self.input)?;

        let result = process(&document.account, &document.transactions);

        print_ledger(self.output, &result)?;
        (self.summary_printer)(&result);
        Ok(())
    }
}

/// One line describing the final account state and the run totals.
pub fn summary_line(result: &ProcessingResult) -> String {
    match &result.account {
        Some(acc) => format!(
            "Account {} ({}): balance {} {} (initial {}); {}",
            acc.id(),
            acc.holder(),
            acc.balance(),
            acc.currency(),
            acc.initial_balance(),
            result.summary
        ),
        None => format!("Processing aborted: {}", result.summary),
    }
}
