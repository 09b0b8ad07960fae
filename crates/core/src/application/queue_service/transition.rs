// Serve / Call Use Cases - ticket status transitions

use super::QueueService;
use crate::domain::{Ticket, TicketStatus};
use crate::error::{AppError, Result};
use crate::port::TicketStore;
use serde::Serialize;
use tracing::info;

/// Result of a staff action on a ticket
#[derive(Debug, Clone, Serialize)]
pub struct TransitionOutcome {
    pub ticket: Ticket,
    pub warnings: Vec<String>,
}

impl QueueService {
    /// Mark a waiting or processing ticket as completed
    pub async fn serve(&self, org_id: &str, ticket_id: &str) -> Result<TransitionOutcome> {
        let ticket = self
            .transition(org_id, Some(ticket_id), TicketStatus::Completed)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Ticket {} not found", ticket_id)))?;

        let message = format!(
            "Hello {}, token {} has been served. Thank you for visiting.",
            ticket.display_name, ticket.token_number
        );
        let warnings = self.notify(&ticket, message).await.into_iter().collect();
        Ok(TransitionOutcome { ticket, warnings })
    }

    /// Move the first waiting ticket to processing (`None` on an empty queue)
    pub async fn call_next(&self, org_id: &str) -> Result<Option<TransitionOutcome>> {
        match self.transition(org_id, None, TicketStatus::Processing).await? {
            Some(ticket) => Ok(Some(self.announce_call(ticket).await)),
            None => Ok(None),
        }
    }

    /// Move a specific waiting ticket to processing
    pub async fn begin_processing(&self, org_id: &str, ticket_id: &str) -> Result<TransitionOutcome> {
        let ticket = self
            .transition(org_id, Some(ticket_id), TicketStatus::Processing)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Ticket {} not found", ticket_id)))?;
        Ok(self.announce_call(ticket).await)
    }

    async fn announce_call(&self, ticket: Ticket) -> TransitionOutcome {
        let message = format!(
            "Hello {}, token {} is being called. Please proceed to the counter.",
            ticket.display_name, ticket.token_number
        );
        let warnings = self.notify(&ticket, message).await.into_iter().collect();
        TransitionOutcome { ticket, warnings }
    }

    /// Apply one transition under the organization's write lock
    ///
    /// `ticket_id = None` targets the head of the queue. The ticket is
    /// persisted before the in-memory state changes, so a storage failure
    /// leaves positions untouched.
    async fn transition(
        &self,
        org_id: &str,
        ticket_id: Option<&str>,
        to: TicketStatus,
    ) -> Result<Option<Ticket>> {
        let queue = self.org_queue(org_id).await?;
        let mut queue = queue.write().await;

        let current = match ticket_id {
            Some(id) => queue.state.get(id).cloned(),
            None => queue.state.head().cloned(),
        };
        let Some(mut next) = current else {
            return match ticket_id {
                Some(id) => self.reject_released(org_id, id, to).await,
                None => Ok(None),
            };
        };

        apply(&mut next, to, self.time_provider.now_millis())?;

        self.store.save_ticket(&next).await?;
        let updated = queue.state.replace(next)?;

        info!(
            org_id = %org_id,
            ticket_id = %updated.id,
            token_number = updated.token_number,
            status = %updated.status,
            still_waiting = queue.state.waiting_count(),
            "Ticket transitioned"
        );
        Ok(Some(updated))
    }

    /// Transition on a ticket that is no longer held in memory
    ///
    /// Only completed tickets leave the queue state, so any transition on one
    /// is refused. Unknown IDs and other organizations' tickets yield `None`.
    async fn reject_released(
        &self,
        org_id: &str,
        ticket_id: &str,
        to: TicketStatus,
    ) -> Result<Option<Ticket>> {
        let stored = self.store.load_ticket(&ticket_id.to_string()).await?;
        let Some(mut ticket) = stored.filter(|t| t.org_id == org_id) else {
            return Ok(None);
        };

        let stored_status = ticket.status;
        apply(&mut ticket, to, self.time_provider.now_millis())?;
        Err(AppError::Internal(format!(
            "Ticket {} is {} in storage but missing from the queue",
            ticket_id, stored_status
        )))
    }
}

fn apply(ticket: &mut Ticket, to: TicketStatus, now: i64) -> Result<()> {
    match to {
        TicketStatus::Completed => ticket.complete(now)?,
        TicketStatus::Processing => ticket.begin_processing(now)?,
        TicketStatus::Waiting => {
            return Err(AppError::Internal(
                "Tickets cannot be returned to the waiting list".to_string(),
            ))
        }
    }
    Ok(())
}
