// Ticket Domain Model

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, Result};
use crate::domain::OrgId;

/// Ticket ID (UUID v4)
pub type TicketId = String;

/// Token number handed to the customer (1-based, per organization)
pub type TokenNumber = i64;

/// Ticket status
///
/// `Waiting -> Processing -> Completed`, or `Waiting -> Completed` directly.
/// `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Waiting,
    Processing,
    Completed,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Waiting => "WAITING",
            TicketStatus::Processing => "PROCESSING",
            TicketStatus::Completed => "COMPLETED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "WAITING" => Some(TicketStatus::Waiting),
            "PROCESSING" => Some(TicketStatus::Processing),
            "COMPLETED" => Some(TicketStatus::Completed),
            _ => None,
        }
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ticket Entity
///
/// `position` and `estimated_wait_minutes` are derived by [`crate::domain::QueueState`]
/// and are zero for tickets that are no longer waiting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub org_id: OrgId,
    pub display_name: String,
    pub contact: String,
    pub token_number: TokenNumber,

    // Derived
    pub position: u32,
    pub estimated_wait_minutes: u32,

    pub status: TicketStatus,
    pub created_at: i64, // epoch ms
    pub called_at: Option<i64>,
    pub completed_at: Option<i64>,
}

impl Ticket {
    /// Create a new waiting ticket
    ///
    /// # Arguments
    ///
    /// * `id` - Unique ticket ID (injected, not generated)
    /// * `created_at` - Creation timestamp in epoch ms (injected, not system time)
    /// * `token_number` - Token issued by the ledger
    pub fn new(
        id: impl Into<String>,
        created_at: i64,
        org_id: impl Into<String>,
        display_name: impl Into<String>,
        contact: impl Into<String>,
        token_number: TokenNumber,
    ) -> Self {
        Self {
            id: id.into(),
            org_id: org_id.into(),
            display_name: display_name.into(),
            contact: contact.into(),
            token_number,
            position: 0,
            estimated_wait_minutes: 0,
            status: TicketStatus::Waiting,
            created_at,
            called_at: None,
            completed_at: None,
        }
    }

    pub fn is_waiting(&self) -> bool {
        self.status == TicketStatus::Waiting
    }

    /// Transition to Processing with explicit timestamp
    pub fn begin_processing(&mut self, now_millis: i64) -> Result<()> {
        if self.status != TicketStatus::Waiting {
            return Err(self.invalid(TicketStatus::Processing));
        }
        self.status = TicketStatus::Processing;
        self.called_at = Some(now_millis);
        self.clear_derived();
        Ok(())
    }

    /// Transition to Completed with explicit timestamp (from Waiting or Processing)
    pub fn complete(&mut self, now_millis: i64) -> Result<()> {
        if self.status == TicketStatus::Completed {
            return Err(self.invalid(TicketStatus::Completed));
        }
        self.status = TicketStatus::Completed;
        self.completed_at = Some(now_millis);
        self.clear_derived();
        Ok(())
    }

    fn clear_derived(&mut self) {
        self.position = 0;
        self.estimated_wait_minutes = 0;
    }

    fn invalid(&self, to: TicketStatus) -> DomainError {
        DomainError::InvalidTransition {
            from: self.status.to_string(),
            to: to.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket() -> Ticket {
        Ticket::new("t-1", 1_000, "org", "Alice", "555-1", 1)
    }

    #[test]
    fn test_waiting_to_processing_to_completed() {
        let mut t = ticket();
        t.begin_processing(2_000).unwrap();
        assert_eq!(t.status, TicketStatus::Processing);
        assert_eq!(t.called_at, Some(2_000));

        t.complete(3_000).unwrap();
        assert_eq!(t.status, TicketStatus::Completed);
        assert_eq!(t.completed_at, Some(3_000));
    }

    #[test]
    fn test_waiting_to_completed_directly() {
        let mut t = ticket();
        t.position = 3;
        t.estimated_wait_minutes = 15;
        t.complete(2_000).unwrap();
        assert_eq!(t.status, TicketStatus::Completed);
        assert_eq!(t.position, 0);
        assert_eq!(t.estimated_wait_minutes, 0);
    }

    #[test]
    fn test_completed_is_terminal() {
        let mut t = ticket();
        t.complete(2_000).unwrap();

        let err = t.complete(3_000).unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidTransition {
                from: "COMPLETED".to_string(),
                to: "COMPLETED".to_string()
            }
        );
        assert!(t.begin_processing(3_000).is_err());
        assert_eq!(t.completed_at, Some(2_000));
    }

    #[test]
    fn test_processing_cannot_restart() {
        let mut t = ticket();
        t.begin_processing(2_000).unwrap();
        assert!(t.begin_processing(3_000).is_err());
    }

    #[test]
    fn test_status_parse() {
        for status in [
            TicketStatus::Waiting,
            TicketStatus::Processing,
            TicketStatus::Completed,
        ] {
            assert_eq!(TicketStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TicketStatus::parse("served"), None);
    }
}
