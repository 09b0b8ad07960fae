// Join Use Case

use super::{EmergencyJoinPolicy, QueueService};
use crate::application::ledger::TicketLedger;
use crate::domain::Ticket;
use crate::error::{AppError, Result};
use crate::port::{CodePayload, RenderedCode, TicketStoreTransaction, TransactionalTicketStore};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Join request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRequest {
    pub display_name: String,
    pub contact: String,
}

impl JoinRequest {
    pub fn new(display_name: impl Into<String>, contact: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            contact: contact.into(),
        }
    }
}

/// Join result
#[derive(Debug, Clone, Serialize)]
pub struct JoinOutcome {
    pub ticket: Ticket,
    /// True when the contact already had a waiting ticket
    pub existing: bool,
    pub emergency_stop: bool,
    pub emergency_message: String,
    pub code: Option<RenderedCode>,
    /// Non-fatal problems (notification, code rendering)
    pub warnings: Vec<String>,
}

/// Trim and check caller-supplied fields
pub fn validate_request(req: &JoinRequest) -> Result<JoinRequest> {
    let display_name = req.display_name.trim();
    let contact = req.contact.trim();

    if display_name.is_empty() || contact.is_empty() {
        return Err(AppError::Validation(
            "Name and contact are required".to_string(),
        ));
    }

    Ok(JoinRequest::new(display_name, contact))
}

impl QueueService {
    /// Register a customer, or return their existing waiting ticket
    pub async fn join(&self, org_id: &str, req: JoinRequest) -> Result<JoinOutcome> {
        let req = validate_request(&req)?;
        let queue = self.org_queue(org_id).await?;

        let (ticket, existing, config) = {
            let mut queue = queue.write().await;
            let config = queue.state.config().clone();

            if let Some(ticket) = queue.state.find_waiting_by_contact(&req.contact) {
                info!(
                    org_id = %org_id,
                    ticket_id = %ticket.id,
                    token_number = ticket.token_number,
                    "Contact already waiting, returning existing ticket"
                );
                (ticket.clone(), true, config)
            } else {
                if config.emergency_stop
                    && self.config.emergency_join_policy == EmergencyJoinPolicy::Reject
                {
                    return Err(AppError::QueueHalted(if config.emergency_message.is_empty() {
                        "Queue is paused by an emergency stop".to_string()
                    } else {
                        config.emergency_message.clone()
                    }));
                }

                // Token draw and insert commit together; on any error the
                // transaction is rolled back and nothing is issued.
                let mut tx = self.store.begin_transaction().await?;
                let staged = self
                    .stage_ticket(tx.as_mut(), &queue.ledger, org_id, &req)
                    .await;
                let ticket = match staged {
                    Ok(ticket) => ticket,
                    Err(e) => {
                        if let Err(rollback_err) = tx.rollback().await {
                            warn!(org_id = %org_id, error = %rollback_err, "Rollback failed");
                        }
                        return Err(e);
                    }
                };
                tx.commit().await?;
                queue.ledger.confirm(ticket.token_number);

                let ticket = queue.state.admit(ticket)?;
                info!(
                    org_id = %org_id,
                    ticket_id = %ticket.id,
                    token_number = ticket.token_number,
                    position = ticket.position,
                    "Customer joined queue"
                );
                (ticket, false, config)
            }
        };
        // Lock released: rendering and notification must not block the queue.

        let mut warnings = Vec::new();

        let code = match self.renderer.render_code(&CodePayload::from(&ticket)) {
            Ok(code) => Some(code),
            Err(e) => {
                warn!(ticket_id = %ticket.id, error = %e, "Code rendering failed");
                warnings.push(format!("Code not rendered: {}", e));
                None
            }
        };

        if !existing {
            let message = format!(
                "Hello {}, your token number is {}. There are {} people ahead of you. Estimated waiting time: {} min.",
                ticket.display_name,
                ticket.token_number,
                ticket.position.saturating_sub(1),
                ticket.estimated_wait_minutes
            );
            warnings.extend(self.notify(&ticket, message).await);
        }

        Ok(JoinOutcome {
            ticket,
            existing,
            emergency_stop: config.emergency_stop,
            emergency_message: config.emergency_message,
            code,
            warnings,
        })
    }

    /// Draw a token and insert the new ticket inside `tx`
    async fn stage_ticket(
        &self,
        tx: &mut dyn TicketStoreTransaction,
        ledger: &TicketLedger,
        org_id: &str,
        req: &JoinRequest,
    ) -> Result<Ticket> {
        let token = ledger.issue(tx).await?;
        let ticket = Ticket::new(
            self.id_provider.generate_id(),
            self.time_provider.now_millis(),
            org_id,
            req.display_name.clone(),
            req.contact.clone(),
            token,
        );
        tx.insert_ticket(&ticket).await?;
        Ok(ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_trims_fields() {
        let req = validate_request(&JoinRequest::new("  Bob ", " 555-2 ")).unwrap();
        assert_eq!(req.display_name, "Bob");
        assert_eq!(req.contact, "555-2");
    }

    #[test]
    fn test_validate_rejects_blank_fields() {
        for req in [JoinRequest::new("", "555-2"), JoinRequest::new("Bob", "   ")] {
            let err = validate_request(&req).unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
            assert!(err.to_string().contains("required"));
        }
    }
}
