// Transaction port for atomic operations

use crate::domain::{OrgId, Ticket, TokenNumber};
use crate::error::Result;
use async_trait::async_trait;

/// Transaction trait for atomic multi-step operations
#[async_trait]
pub trait Transaction: Send {
    /// Commit the transaction
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Rollback the transaction
    async fn rollback(self: Box<Self>) -> Result<()>;
}

/// Transactional TicketStore operations
#[async_trait]
pub trait TransactionalTicketStore: Send + Sync {
    /// Begin a new transaction
    async fn begin_transaction(&self) -> Result<Box<dyn TicketStoreTransaction>>;
}

/// TicketStore operations within a transaction
///
/// Dropping an uncommitted transaction discards every change made in it.
#[async_trait]
pub trait TicketStoreTransaction: Transaction {
    /// Increment the organization's token counter (within transaction)
    async fn next_token_number(&mut self, org_id: &OrgId) -> Result<TokenNumber>;

    /// Insert ticket (within transaction)
    async fn insert_ticket(&mut self, ticket: &Ticket) -> Result<()>;
}
