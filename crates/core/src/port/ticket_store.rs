// Ticket Store Port (Interface)

use crate::domain::{OrgId, Ticket, TicketId, TokenNumber};
use crate::error::Result;
use async_trait::async_trait;

/// Repository interface for Ticket persistence
///
/// Stored positions/ETAs are not authoritative; the queue state re-derives
/// them after loading.
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Find ticket by ID
    async fn load_ticket(&self, id: &TicketId) -> Result<Option<Ticket>>;

    /// Find an organization's ticket by token number (any status)
    async fn load_ticket_by_token(
        &self,
        org_id: &OrgId,
        token_number: TokenNumber,
    ) -> Result<Option<Ticket>>;

    /// Insert or update a ticket
    async fn save_ticket(&self, ticket: &Ticket) -> Result<()>;

    /// Waiting and processing tickets of an organization, ordered by token number
    async fn list_open_tickets(&self, org_id: &OrgId) -> Result<Vec<Ticket>>;

    /// Atomically increment and return the organization's token counter
    async fn next_token_number(&self, org_id: &OrgId) -> Result<TokenNumber>;

    /// Highest token committed for an organization (0 if none)
    async fn last_token_number(&self, org_id: &OrgId) -> Result<TokenNumber>;
}
