// Organization Store Port (Interface)

use crate::domain::{OrgId, Organization, QueueConfig};
use crate::error::Result;
use async_trait::async_trait;

/// Repository interface for organizations and their queue settings
#[async_trait]
pub trait OrganizationStore: Send + Sync {
    /// Insert a new organization
    ///
    /// Fails with `AppError::Duplicate` when the name or contact email is taken.
    async fn insert_organization(&self, org: &Organization) -> Result<()>;

    /// Find organization by ID
    async fn load_organization(&self, org_id: &OrgId) -> Result<Option<Organization>>;

    /// Load queue settings of an organization
    async fn load_config(&self, org_id: &OrgId) -> Result<Option<QueueConfig>>;

    /// Persist queue settings (organization must exist)
    async fn save_config(&self, config: &QueueConfig) -> Result<()>;
}
