// Organization & Queue Settings Domain Model

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, Result};

/// Organization identifier
pub type OrgId = String;

/// Default service time per waiting customer (minutes)
pub const DEFAULT_PER_PERSON_MINUTES: u32 = 5;

/// Default wait penalty while the emergency stop is active (minutes)
pub const DEFAULT_EMERGENCY_PENALTY_MINUTES: u32 = 20;

/// Per-organization queue settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueConfig {
    pub org_id: OrgId,
    pub emergency_stop: bool,
    pub emergency_message: String,
    pub per_person_minutes: u32,
    pub emergency_penalty_minutes: u32,
}

impl QueueConfig {
    pub fn new(org_id: impl Into<String>) -> Self {
        Self {
            org_id: org_id.into(),
            emergency_stop: false,
            emergency_message: String::new(),
            per_person_minutes: DEFAULT_PER_PERSON_MINUTES,
            emergency_penalty_minutes: DEFAULT_EMERGENCY_PENALTY_MINUTES,
        }
    }

    /// Estimated wait for a waiting ticket at `position`
    ///
    /// Pure function of position and the current flag, so toggling the
    /// emergency stop never compounds the penalty.
    pub fn estimate_wait(&self, position: u32) -> u32 {
        let base = position.saturating_mul(self.per_person_minutes);
        if self.emergency_stop {
            base.saturating_add(self.emergency_penalty_minutes)
        } else {
            base
        }
    }
}

/// Organization (tenant owning exactly one queue)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: OrgId,
    pub name: String,
    pub contact_email: String,
    pub created_at: i64, // epoch ms
    pub queue: QueueConfig,
}

impl Organization {
    pub fn new(
        id: impl Into<String>,
        created_at: i64,
        name: impl Into<String>,
        contact_email: impl Into<String>,
        queue_defaults: &QueueConfig,
    ) -> Result<Self> {
        let id = id.into();
        let name = name.into().trim().to_string();
        let contact_email = contact_email.into().trim().to_string();

        if name.is_empty() {
            return Err(DomainError::Validation(
                "Organization name is required".to_string(),
            ));
        }
        if !contact_email.contains('@') {
            return Err(DomainError::Validation(
                "Please include a valid email".to_string(),
            ));
        }

        let queue = QueueConfig {
            org_id: id.clone(),
            emergency_stop: false,
            emergency_message: String::new(),
            per_person_minutes: queue_defaults.per_person_minutes,
            emergency_penalty_minutes: queue_defaults.emergency_penalty_minutes,
        };

        Ok(Self {
            id,
            name,
            contact_email,
            created_at,
            queue,
        })
    }
}
