// Ticket Ledger - token issuance

use crate::domain::{OrgId, TokenNumber};
use crate::error::{AppError, Result};
use crate::port::TicketStoreTransaction;
use tracing::debug;

/// Issues token numbers for one organization
///
/// The durable counter lives in the store; the ledger draws from it inside the
/// caller's transaction and only advances `last_issued` once that transaction
/// has committed. A failed transaction may leave a gap, never a duplicate.
#[derive(Debug)]
pub struct TicketLedger {
    org_id: OrgId,
    last_issued: TokenNumber,
}

impl TicketLedger {
    /// `last_issued` is the highest token already committed for this organization
    pub fn new(org_id: impl Into<String>, last_issued: TokenNumber) -> Self {
        Self {
            org_id: org_id.into(),
            last_issued,
        }
    }

    pub fn last_issued(&self) -> TokenNumber {
        self.last_issued
    }

    /// Draw the next token within `tx` (not yet confirmed)
    pub async fn issue(&self, tx: &mut dyn TicketStoreTransaction) -> Result<TokenNumber> {
        let token = tx.next_token_number(&self.org_id).await?;

        if token <= self.last_issued {
            return Err(AppError::Internal(format!(
                "Token sequence for {} went backwards: store returned {} after {}",
                self.org_id, token, self.last_issued
            )));
        }

        debug!(org_id = %self.org_id, token_number = token, "Token drawn");
        Ok(token)
    }

    /// Record a token whose transaction has committed
    pub fn confirm(&mut self, token: TokenNumber) {
        if token > self.last_issued {
            self.last_issued = token;
        }
    }
}
