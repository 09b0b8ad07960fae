// SQLite TicketStore Implementation

use crate::error::map_sqlx_error;
use crate::SqliteQueueTransaction;
use async_trait::async_trait;
use sqlx::SqlitePool;
use walkin_core::domain::{OrgId, Ticket, TicketId, TicketStatus, TokenNumber};
use walkin_core::error::{AppError, Result};
use walkin_core::port::{TicketStore, TicketStoreTransaction, TransactionalTicketStore};

pub(crate) const NEXT_TOKEN_SQL: &str = r#"
    INSERT INTO token_counters (org_id, last_issued) VALUES (?, 1)
    ON CONFLICT(org_id) DO UPDATE SET last_issued = last_issued + 1
    RETURNING last_issued
"#;

pub(crate) const INSERT_TICKET_SQL: &str = r#"
    INSERT INTO tickets (
        id, org_id, display_name, contact, token_number,
        status, created_at, called_at, completed_at
    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

/// SQLite-backed persistence for tickets, token counters and organizations
#[derive(Clone)]
pub struct SqliteQueueStore {
    pub(crate) pool: SqlitePool,
}

impl SqliteQueueStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TicketStore for SqliteQueueStore {
    async fn load_ticket(&self, id: &TicketId) -> Result<Option<Ticket>> {
        let row = sqlx::query_as::<_, TicketRow>("SELECT * FROM tickets WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(TicketRow::into_ticket).transpose()
    }

    async fn load_ticket_by_token(
        &self,
        org_id: &OrgId,
        token_number: TokenNumber,
    ) -> Result<Option<Ticket>> {
        let row = sqlx::query_as::<_, TicketRow>(
            "SELECT * FROM tickets WHERE org_id = ? AND token_number = ?",
        )
        .bind(org_id)
        .bind(token_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(TicketRow::into_ticket).transpose()
    }

    async fn save_ticket(&self, ticket: &Ticket) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO tickets (
                id, org_id, display_name, contact, token_number,
                status, created_at, called_at, completed_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                status = excluded.status,
                called_at = excluded.called_at,
                completed_at = excluded.completed_at
            "#,
        )
        .bind(&ticket.id)
        .bind(&ticket.org_id)
        .bind(&ticket.display_name)
        .bind(&ticket.contact)
        .bind(ticket.token_number)
        .bind(ticket.status.as_str())
        .bind(ticket.created_at)
        .bind(ticket.called_at)
        .bind(ticket.completed_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn list_open_tickets(&self, org_id: &OrgId) -> Result<Vec<Ticket>> {
        let rows: Vec<TicketRow> = sqlx::query_as(
            r#"
            SELECT * FROM tickets
            WHERE org_id = ? AND status IN ('WAITING', 'PROCESSING')
            ORDER BY token_number ASC
            "#,
        )
        .bind(org_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(TicketRow::into_ticket).collect()
    }

    async fn next_token_number(&self, org_id: &OrgId) -> Result<TokenNumber> {
        // Single statement: increment and read back atomically
        sqlx::query_scalar(NEXT_TOKEN_SQL)
            .bind(org_id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn last_token_number(&self, org_id: &OrgId) -> Result<TokenNumber> {
        let last: Option<TokenNumber> =
            sqlx::query_scalar("SELECT last_issued FROM token_counters WHERE org_id = ?")
                .bind(org_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        Ok(last.unwrap_or(0))
    }
}

#[async_trait]
impl TransactionalTicketStore for SqliteQueueStore {
    async fn begin_transaction(&self) -> Result<Box<dyn TicketStoreTransaction>> {
        let tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        Ok(Box::new(SqliteQueueTransaction::new(tx)))
    }
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
struct TicketRow {
    id: String,
    org_id: String,
    display_name: String,
    contact: String,
    token_number: i64,
    status: String,
    created_at: i64,
    called_at: Option<i64>,
    completed_at: Option<i64>,
}

impl TicketRow {
    fn into_ticket(self) -> Result<Ticket> {
        let status = TicketStatus::parse(&self.status).ok_or_else(|| {
            AppError::Persistence(format!(
                "Unknown status {} for ticket {}",
                self.status, self.id
            ))
        })?;

        // Position/ETA are derived by the queue state after loading
        Ok(Ticket {
            id: self.id,
            org_id: self.org_id,
            display_name: self.display_name,
            contact: self.contact,
            token_number: self.token_number,
            position: 0,
            estimated_wait_minutes: 0,
            status,
            created_at: self.created_at,
            called_at: self.called_at,
            completed_at: self.completed_at,
        })
    }
}
