// Queue Service - orchestrates ledger, queue state and emergency control

pub mod join;
mod registration;
mod transition;

pub use join::{JoinOutcome, JoinRequest};
pub use registration::EntryCodeOutcome;
pub use transition::TransitionOutcome;

use crate::application::emergency;
use crate::application::ledger::TicketLedger;
use crate::domain::{OrgId, QueueConfig, QueueState, Ticket, TokenNumber};
use crate::error::{AppError, Result};
use crate::port::{
    CodeRenderer, IdProvider, Notifier, OrganizationStore, QueueStore, TicketStore, TimeProvider,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// What `join` does while the emergency stop is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmergencyJoinPolicy {
    /// Admit the customer; the result carries the emergency flag and message
    #[default]
    Allow,
    /// Fail with `AppError::QueueHalted` (re-joins still return the existing ticket)
    Reject,
}

/// Queue service settings
#[derive(Debug, Clone)]
pub struct QueueServiceConfig {
    /// Settings copied into every newly registered organization
    pub queue_defaults: QueueConfig,
    pub emergency_join_policy: EmergencyJoinPolicy,
}

impl Default for QueueServiceConfig {
    fn default() -> Self {
        Self {
            queue_defaults: QueueConfig::new(""),
            emergency_join_policy: EmergencyJoinPolicy::Allow,
        }
    }
}

/// Waiting list and settings read under one lock
#[derive(Debug, Clone, Serialize)]
pub struct QueueSnapshot {
    pub config: QueueConfig,
    pub waiting: Vec<Ticket>,
}

/// Mutable queue of one organization
///
/// The write half of the lock serializes `join`, `serve`, `call_next` and
/// `set_emergency`; readers share the read half.
struct OrgQueue {
    ledger: TicketLedger,
    state: QueueState,
}

/// Queue Service
pub struct QueueService {
    store: Arc<dyn QueueStore>,
    notifier: Arc<dyn Notifier>,
    renderer: Arc<dyn CodeRenderer>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
    config: QueueServiceConfig,
    queues: RwLock<HashMap<OrgId, Arc<RwLock<OrgQueue>>>>,
}

impl QueueService {
    pub fn new(
        store: Arc<dyn QueueStore>,
        notifier: Arc<dyn Notifier>,
        renderer: Arc<dyn CodeRenderer>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
        config: QueueServiceConfig,
    ) -> Self {
        Self {
            store,
            notifier,
            renderer,
            id_provider,
            time_provider,
            config,
            queues: RwLock::new(HashMap::new()),
        }
    }

    /// All waiting tickets, ordered by token number
    pub async fn list_waiting(&self, org_id: &str) -> Result<Vec<Ticket>> {
        let queue = self.org_queue(org_id).await?;
        let queue = queue.read().await;
        Ok(queue.state.list_waiting())
    }

    /// Waiting tickets together with the emergency settings
    pub async fn snapshot(&self, org_id: &str) -> Result<QueueSnapshot> {
        let queue = self.org_queue(org_id).await?;
        let queue = queue.read().await;
        Ok(QueueSnapshot {
            config: queue.state.config().clone(),
            waiting: queue.state.list_waiting(),
        })
    }

    /// Ticket carrying `token_number`
    ///
    /// Completed tickets are no longer held in memory and are read from the store.
    pub async fn status_of(&self, org_id: &str, token_number: TokenNumber) -> Result<Ticket> {
        let queue = self.org_queue(org_id).await?;
        if let Some(ticket) = queue.read().await.state.by_token(token_number) {
            return Ok(ticket.clone());
        }

        self.store
            .load_ticket_by_token(&org_id.to_string(), token_number)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Token {} not found", token_number)))
    }

    /// Set or clear the emergency stop
    pub async fn set_emergency(
        &self,
        org_id: &str,
        stop: bool,
        message: Option<String>,
    ) -> Result<QueueConfig> {
        let queue = self.org_queue(org_id).await?;
        let mut queue = queue.write().await;
        emergency::set_emergency(self.store.as_ref(), &mut queue.state, stop, message).await
    }

    /// Current emergency settings
    pub async fn get_emergency(&self, org_id: &str) -> Result<QueueConfig> {
        let queue = self.org_queue(org_id).await?;
        let queue = queue.read().await;
        Ok(emergency::get_emergency(&queue.state))
    }

    /// Queue of `org_id`, loaded from the store on first use
    ///
    /// Loading happens outside the map lock so other organizations are not
    /// blocked; if two callers race, the first insert wins.
    async fn org_queue(&self, org_id: &str) -> Result<Arc<RwLock<OrgQueue>>> {
        if let Some(queue) = self.queues.read().await.get(org_id) {
            return Ok(Arc::clone(queue));
        }

        let loaded = self.load_queue(org_id).await?;

        let mut queues = self.queues.write().await;
        if let Some(queue) = queues.get(org_id) {
            return Ok(Arc::clone(queue));
        }
        let queue = Arc::new(RwLock::new(loaded));
        queues.insert(org_id.to_string(), Arc::clone(&queue));
        Ok(queue)
    }

    /// Hydrate an organization's open tickets and token counter
    async fn load_queue(&self, org_id: &str) -> Result<OrgQueue> {
        let org_id = org_id.to_string();
        let config = self
            .store
            .load_config(&org_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Organization {} not found", org_id)))?;
        let tickets = self.store.list_open_tickets(&org_id).await?;
        let last_token = self.store.last_token_number(&org_id).await?;
        let state = QueueState::hydrate(config, tickets)?;
        let ledger = TicketLedger::new(org_id.clone(), last_token);

        info!(
            org_id = %org_id,
            open = state.len(),
            waiting = state.waiting_count(),
            last_token = last_token,
            "Queue loaded"
        );

        Ok(OrgQueue { ledger, state })
    }

    /// Best-effort customer message; returns a warning on failure
    async fn notify(&self, ticket: &Ticket, message: String) -> Option<String> {
        match self.notifier.notify(&ticket.contact, &message).await {
            Ok(()) => {
                debug!(ticket_id = %ticket.id, "Notification sent");
                None
            }
            Err(e) => {
                warn!(
                    ticket_id = %ticket.id,
                    token_number = ticket.token_number,
                    error = %e,
                    "Notification failed"
                );
                Some(format!("Notification not delivered: {}", e))
            }
        }
    }
}
