//! RPC Request/Response Types
//!
//! Defines the JSON-RPC method parameters and results.

use serde::{Deserialize, Serialize};
use walkin_core::application::{EntryCodeOutcome, JoinOutcome, QueueSnapshot, TransitionOutcome};
use walkin_core::domain::{Organization, QueueConfig, Ticket, TicketStatus};

/// Ticket as seen by clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TicketView {
    pub ticket_id: String,
    pub token_number: i64,
    pub display_name: String,
    pub contact: String,
    pub status: TicketStatus,
    pub position: u32,
    pub estimated_wait_minutes: u32,
    pub created_at: i64,
}

impl From<Ticket> for TicketView {
    fn from(ticket: Ticket) -> Self {
        Self {
            ticket_id: ticket.id,
            token_number: ticket.token_number,
            display_name: ticket.display_name,
            contact: ticket.contact,
            status: ticket.status,
            position: ticket.position,
            estimated_wait_minutes: ticket.estimated_wait_minutes,
            created_at: ticket.created_at,
        }
    }
}

/// org.register.v1 - Register an organization
#[derive(Debug, Deserialize)]
pub struct RegisterOrgRequest {
    pub name: String,
    pub contact_email: String,
}

/// org.get.v1 - Look up an organization
#[derive(Debug, Deserialize)]
pub struct GetOrgRequest {
    pub org_id: String,
}

/// Organization as returned by org.register.v1 and org.get.v1
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationResponse {
    pub org_id: String,
    pub name: String,
    pub contact_email: String,
    pub per_person_minutes: u32,
    pub emergency_penalty_minutes: u32,
}

impl From<Organization> for OrganizationResponse {
    fn from(org: Organization) -> Self {
        Self {
            org_id: org.id,
            name: org.name,
            contact_email: org.contact_email,
            per_person_minutes: org.queue.per_person_minutes,
            emergency_penalty_minutes: org.queue.emergency_penalty_minutes,
        }
    }
}

/// org.entry_code.v1 - Generate a code to post at the entrance
#[derive(Debug, Deserialize)]
pub struct EntryCodeRequest {
    pub org_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryCodeResponse {
    pub org_id: String,
    pub organization: String,
    pub code: String,
    /// Rendered blob (data URI)
    pub rendered: String,
}

impl From<EntryCodeOutcome> for EntryCodeResponse {
    fn from(outcome: EntryCodeOutcome) -> Self {
        Self {
            org_id: outcome.entry.org_id,
            organization: outcome.entry.organization,
            code: outcome.entry.code,
            rendered: outcome.rendered.0,
        }
    }
}

/// queue.join.v1 - Join an organization's queue
#[derive(Debug, Deserialize)]
pub struct JoinRequest {
    pub org_id: String,
    pub display_name: String,
    pub contact: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinResponse {
    pub ticket: TicketView,
    pub existing: bool,
    pub emergency_stop: bool,
    pub emergency_message: String,
    pub code: Option<String>,
    pub warnings: Vec<String>,
}

impl From<JoinOutcome> for JoinResponse {
    fn from(outcome: JoinOutcome) -> Self {
        Self {
            ticket: outcome.ticket.into(),
            existing: outcome.existing,
            emergency_stop: outcome.emergency_stop,
            emergency_message: outcome.emergency_message,
            code: outcome.code.map(|code| code.0),
            warnings: outcome.warnings,
        }
    }
}

/// queue.status.v1 - Look up a ticket by token number
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub org_id: String,
    pub token_number: i64,
}

/// queue.list.v1 - Waiting list with the emergency banner
#[derive(Debug, Deserialize)]
pub struct ListRequest {
    pub org_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse {
    pub emergency_stop: bool,
    pub emergency_message: String,
    pub tickets: Vec<TicketView>,
}

impl From<QueueSnapshot> for ListResponse {
    fn from(snapshot: QueueSnapshot) -> Self {
        Self {
            emergency_stop: snapshot.config.emergency_stop,
            emergency_message: snapshot.config.emergency_message,
            tickets: snapshot.waiting.into_iter().map(TicketView::from).collect(),
        }
    }
}

/// queue.serve.v1 / queue.begin_processing.v1 - Act on one ticket
#[derive(Debug, Deserialize)]
pub struct TicketActionRequest {
    pub org_id: String,
    pub ticket_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketActionResponse {
    pub ticket: TicketView,
    pub warnings: Vec<String>,
}

impl From<TransitionOutcome> for TicketActionResponse {
    fn from(outcome: TransitionOutcome) -> Self {
        Self {
            ticket: outcome.ticket.into(),
            warnings: outcome.warnings,
        }
    }
}

/// queue.call_next.v1 - Call the first waiting customer
#[derive(Debug, Deserialize)]
pub struct CallNextRequest {
    pub org_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallNextResponse {
    /// `None` when nobody is waiting
    pub ticket: Option<TicketView>,
    pub warnings: Vec<String>,
}

/// queue.emergency.set.v1
#[derive(Debug, Deserialize)]
pub struct SetEmergencyRequest {
    pub org_id: String,
    pub stop: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// queue.emergency.get.v1
#[derive(Debug, Deserialize)]
pub struct GetEmergencyRequest {
    pub org_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyResponse {
    pub org_id: String,
    pub emergency_stop: bool,
    pub emergency_message: String,
    pub emergency_penalty_minutes: u32,
}

impl From<QueueConfig> for EmergencyResponse {
    fn from(config: QueueConfig) -> Self {
        Self {
            org_id: config.org_id,
            emergency_stop: config.emergency_stop,
            emergency_message: config.emergency_message,
            emergency_penalty_minutes: config.emergency_penalty_minutes,
        }
    }
}
