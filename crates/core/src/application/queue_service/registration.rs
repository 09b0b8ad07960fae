// Organization Registration Use Case

use super::QueueService;
use crate::domain::Organization;
use crate::error::{AppError, Result};
use crate::port::{CodePayload, EntryCode, OrganizationStore, RenderedCode};
use serde::Serialize;
use tracing::info;

/// Entry code for an organization plus its rendered blob
#[derive(Debug, Clone, Serialize)]
pub struct EntryCodeOutcome {
    pub entry: EntryCode,
    pub rendered: RenderedCode,
}

impl QueueService {
    /// Create an organization with default queue settings
    ///
    /// Fails with `AppError::Duplicate` if the name or email is already registered.
    pub async fn register_organization(
        &self,
        name: &str,
        contact_email: &str,
    ) -> Result<Organization> {
        let org = Organization::new(
            self.id_provider.generate_id(),
            self.time_provider.now_millis(),
            name,
            contact_email,
            &self.config.queue_defaults,
        )
        .map_err(|e| AppError::Validation(e.to_string()))?;

        self.store.insert_organization(&org).await?;

        info!(org_id = %org.id, name = %org.name, "Organization registered");
        Ok(org)
    }

    /// Organization by ID
    pub async fn organization(&self, org_id: &str) -> Result<Organization> {
        self.store
            .load_organization(&org_id.to_string())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Organization {} not found", org_id)))
    }

    /// Generate a fresh entry code customers scan to reach the join form
    ///
    /// Codes are not stored; each call yields a new one.
    pub async fn issue_entry_code(&self, org_id: &str) -> Result<EntryCodeOutcome> {
        let org = self.organization(org_id).await?;
        let entry = EntryCode::new(&org, self.id_provider.generate_entry_code());
        let rendered = self
            .renderer
            .render_code(&CodePayload::Entry(entry.clone()))?;

        info!(org_id = %org.id, "Entry code issued");
        Ok(EntryCodeOutcome { entry, rendered })
    }
}
