// SQLite OrganizationStore Implementation

use crate::error::{map_sqlx_error, to_u32};
use crate::SqliteQueueStore;
use async_trait::async_trait;
use walkin_core::domain::{OrgId, Organization, QueueConfig};
use walkin_core::error::{AppError, Result};
use walkin_core::port::OrganizationStore;

#[async_trait]
impl OrganizationStore for SqliteQueueStore {
    async fn insert_organization(&self, org: &Organization) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO organizations (
                id, name, contact_email, created_at,
                emergency_stop, emergency_message,
                per_person_minutes, emergency_penalty_minutes
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&org.id)
        .bind(&org.name)
        .bind(&org.contact_email)
        .bind(org.created_at)
        .bind(org.queue.emergency_stop)
        .bind(&org.queue.emergency_message)
        .bind(i64::from(org.queue.per_person_minutes))
        .bind(i64::from(org.queue.emergency_penalty_minutes))
        .execute(&self.pool)
        .await
        .map_err(|e| match map_sqlx_error(e) {
            AppError::Duplicate(_) => {
                AppError::Duplicate(format!("Organization {} already exists", org.name))
            }
            other => other,
        })?;

        Ok(())
    }

    async fn load_organization(&self, org_id: &OrgId) -> Result<Option<Organization>> {
        let row = sqlx::query_as::<_, OrganizationRow>("SELECT * FROM organizations WHERE id = ?")
            .bind(org_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.map(OrganizationRow::into_organization).transpose()
    }

    async fn load_config(&self, org_id: &OrgId) -> Result<Option<QueueConfig>> {
        Ok(self.load_organization(org_id).await?.map(|org| org.queue))
    }

    async fn save_config(&self, config: &QueueConfig) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE organizations
            SET emergency_stop = ?, emergency_message = ?,
                per_person_minutes = ?, emergency_penalty_minutes = ?
            WHERE id = ?
            "#,
        )
        .bind(config.emergency_stop)
        .bind(&config.emergency_message)
        .bind(i64::from(config.per_person_minutes))
        .bind(i64::from(config.emergency_penalty_minutes))
        .bind(&config.org_id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Organization {} not found",
                config.org_id
            )));
        }
        Ok(())
    }
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
struct OrganizationRow {
    id: String,
    name: String,
    contact_email: String,
    created_at: i64,
    emergency_stop: bool,
    emergency_message: String,
    per_person_minutes: i64,
    emergency_penalty_minutes: i64,
}

impl OrganizationRow {
    fn into_organization(self) -> Result<Organization> {
        let queue = QueueConfig {
            org_id: self.id.clone(),
            emergency_stop: self.emergency_stop,
            emergency_message: self.emergency_message,
            per_person_minutes: to_u32("per_person_minutes", self.per_person_minutes)?,
            emergency_penalty_minutes: to_u32(
                "emergency_penalty_minutes",
                self.emergency_penalty_minutes,
            )?,
        };

        Ok(Organization {
            id: self.id,
            name: self.name,
            contact_email: self.contact_email,
            created_at: self.created_at,
            queue,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::setup_test_db;

    fn org(id: &str, name: &str, email: &str) -> Organization {
        Organization::new(id, 1_000, name, email, &QueueConfig::new(id)).unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_load() {
        let (pool, _dir) = setup_test_db().await;
        let store = SqliteQueueStore::new(pool);
        let clinic = org("org-1", "Clinic", "desk@clinic.test");
        store.insert_organization(&clinic).await.unwrap();

        let found = store
            .load_organization(&"org-1".to_string())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found, clinic);
        assert!(store
            .load_config(&"org-2".to_string())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_name_or_email() {
        let (pool, _dir) = setup_test_db().await;
        let store = SqliteQueueStore::new(pool);
        store
            .insert_organization(&org("org-1", "Clinic", "desk@clinic.test"))
            .await
            .unwrap();

        let err = store
            .insert_organization(&org("org-2", "Clinic", "other@clinic.test"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Duplicate(_)));

        let err = store
            .insert_organization(&org("org-3", "Bakery", "desk@clinic.test"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_save_config() {
        let (pool, _dir) = setup_test_db().await;
        let store = SqliteQueueStore::new(pool);
        let clinic = org("org-1", "Clinic", "desk@clinic.test");
        store.insert_organization(&clinic).await.unwrap();

        let mut config = clinic.queue.clone();
        config.emergency_stop = true;
        config.emergency_message = "Closed for lunch".to_string();
        store.save_config(&config).await.unwrap();

        let loaded = store
            .load_config(&"org-1".to_string())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded, config);
    }

    #[tokio::test]
    async fn test_save_config_unknown_org() {
        let (pool, _dir) = setup_test_db().await;
        let store = SqliteQueueStore::new(pool);
        let err = store
            .save_config(&QueueConfig::new("ghost"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
