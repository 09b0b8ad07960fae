// SQLite Transaction Implementation

use crate::error::map_sqlx_error;
use crate::ticket_store::{INSERT_TICKET_SQL, NEXT_TOKEN_SQL};
use async_trait::async_trait;
use sqlx::{Sqlite, Transaction as SqlxTransaction};
use walkin_core::domain::{OrgId, Ticket, TokenNumber};
use walkin_core::error::Result;
use walkin_core::port::{TicketStoreTransaction, Transaction};

/// Join transaction: token increment and ticket insert commit together
///
/// Dropping it without `commit` rolls back.
pub struct SqliteQueueTransaction {
    tx: SqlxTransaction<'static, Sqlite>,
}

impl SqliteQueueTransaction {
    pub fn new(tx: SqlxTransaction<'static, Sqlite>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl Transaction for SqliteQueueTransaction {
    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.tx.rollback().await.map_err(map_sqlx_error)?;
        Ok(())
    }
}

#[async_trait]
impl TicketStoreTransaction for SqliteQueueTransaction {
    async fn next_token_number(&mut self, org_id: &OrgId) -> Result<TokenNumber> {
        sqlx::query_scalar(NEXT_TOKEN_SQL)
            .bind(org_id)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)
    }

    async fn insert_ticket(&mut self, ticket: &Ticket) -> Result<()> {
        sqlx::query(INSERT_TICKET_SQL)
            .bind(&ticket.id)
            .bind(&ticket.org_id)
            .bind(&ticket.display_name)
            .bind(&ticket.contact)
            .bind(ticket.token_number)
            .bind(ticket.status.as_str())
            .bind(ticket.created_at)
            .bind(ticket.called_at)
            .bind(ticket.completed_at)
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }
}
