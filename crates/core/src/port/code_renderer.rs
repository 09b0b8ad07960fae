//! Code Renderer Port
//!
//! Turns a small payload into an opaque, scannable blob. Only the payload
//! shapes are owned by the core; the image format is not.

use crate::domain::{OrgId, Organization, Ticket, TicketId, TokenNumber};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Payload encoded into a ticket code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketCode {
    pub ticket_id: TicketId,
    pub token_number: TokenNumber,
}

/// Payload encoded into an organization's entry code (posted at the door)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryCode {
    pub org_id: OrgId,
    pub code: String,
    pub organization: String,
}

impl EntryCode {
    pub fn new(org: &Organization, code: impl Into<String>) -> Self {
        Self {
            org_id: org.id.clone(),
            code: code.into(),
            organization: org.name.clone(),
        }
    }
}

/// Anything the renderer can encode (serialized without a tag)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CodePayload {
    Ticket(TicketCode),
    Entry(EntryCode),
}

impl From<&Ticket> for CodePayload {
    fn from(ticket: &Ticket) -> Self {
        CodePayload::Ticket(TicketCode {
            ticket_id: ticket.id.clone(),
            token_number: ticket.token_number,
        })
    }
}

/// Rendered code (opaque to the core, typically a data URI)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenderedCode(pub String);

/// Code renderer interface
pub trait CodeRenderer: Send + Sync {
    fn render_code(&self, payload: &CodePayload) -> Result<RenderedCode>;
}

/// Renders the payload as a `data:application/json` URI
pub struct JsonCodeRenderer;

impl CodeRenderer for JsonCodeRenderer {
    fn render_code(&self, payload: &CodePayload) -> Result<RenderedCode> {
        let json = serde_json::to_string(payload)?;
        Ok(RenderedCode(format!("data:application/json,{}", json)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::domain::QueueConfig;

    #[test]
    fn test_json_renderer_payload() {
        let payload = CodePayload::Ticket(TicketCode {
            ticket_id: "abc".to_string(),
            token_number: 7,
        });
        let code = JsonCodeRenderer.render_code(&payload).unwrap();
        assert_eq!(
            code.0,
            r#"data:application/json,{"ticketId":"abc","tokenNumber":7}"#
        );
    }

    #[test]
    fn test_entry_code_payload() {
        let org = Organization::new("org-1", 0, "Clinic", "desk@clinic.test", &QueueConfig::new(""))
            .unwrap();
        let payload = CodePayload::Entry(EntryCode::new(&org, "482913"));
        let code = JsonCodeRenderer.render_code(&payload).unwrap();
        assert_eq!(
            code.0,
            r#"data:application/json,{"orgId":"org-1","code":"482913","organization":"Clinic"}"#
        );
    }
}
