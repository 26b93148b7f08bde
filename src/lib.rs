/// Coercion of loosely typed input values into monetary amounts.
pub mod amount;

/// Account state for a single run.
/// Balance is modified using events, which are created by handling commands
pub mod account;

/// Validation of raw transaction requests into commands that are later executed by [`account`].
pub mod command;

/// Transaction processor interface, plus the single account implementation
/// and the [`processor::process`] entry point that folds a whole transaction list.
pub mod processor;

/// Input document parsing and ledger printing used by the binary.
/// It lives in the library so the integration tests can drive it.
pub mod bin_utils;
