use std::io::Read;

use anyhow::Context;
use serde::Deserialize;
use serde_json::Value;

/// Top level input document.
///
/// Both parts are kept untyped: their shape is validated by [`crate::processor::process`],
/// so a missing key simply becomes `null` and is reported as a structural failure there.
#[derive(Debug, Deserialize)]
pub struct InputDocument {
    #[serde(default)]
    pub account: Value,
    #[serde(default)]
    pub transactions: Value,
}

pub fn parse_document<R>(source: R) -> anyhow::Result<InputDocument>
where
    R: Read,
{
    serde_json::from_reader(source).context("Failed to parse input document as JSON")
}
