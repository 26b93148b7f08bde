use tracing::{debug, warn};

use crate::{
    account::Account,
    command::{Position, TransactionCommand, TransactionRequest},
};

use super::{AppliedTransaction, TransactionProcessError, TransactionProcessor};

/// Processes transactions for a single in-memory account.
pub struct AccountProcessor {
    account: Account,
}

impl AccountProcessor {
    pub fn new(account: Account) -> Self {
        Self { account }
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn into_account(self) -> Account {
        self.account
    }

    fn try_apply(
        &mut self,
        position: Position,
        request: &TransactionRequest,
    ) -> Result<AppliedTransaction, TransactionProcessError> {
        let cmd = TransactionCommand::parse(position, request)?;
        let evt = self.account.handle_transaction(&cmd)?;
        self.account.apply(&evt);
        Ok(AppliedTransaction {
            position: cmd.position,
            kind: cmd.kind,
            amount: cmd.amount,
        })
    }
}

impl TransactionProcessor for AccountProcessor {
    fn process_transaction(
        &mut self,
        position: Position,
        request: &TransactionRequest,
    ) -> Result<AppliedTransaction, TransactionProcessError> {
        match self.try_apply(position, request) {
            Ok(tx) => {
                debug!(
                    position,
                    kind = %tx.kind,
                    amount = %tx.amount,
                    balance = %self.account.balance(),
                    "Transaction applied"
                );
                Ok(tx)
            }
            Err(err) => {
                warn!(position, %err, "Transaction rejected");
                Err(err)
            }
        }
    }
}
