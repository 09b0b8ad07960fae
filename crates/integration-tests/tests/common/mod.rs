//! Shared setup: queue service over a SQLite file

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use walkin_core::application::{JoinOutcome, JoinRequest, QueueService, QueueServiceConfig};
use walkin_core::port::id_provider::UuidProvider;
use walkin_core::port::mocks::{RecordingNotifier, SteppingTimeProvider};
use walkin_core::port::JsonCodeRenderer;
use walkin_infra_sqlite::{create_pool, run_migrations, SqliteQueueStore};

pub struct TestQueue {
    pub service: Arc<QueueService>,
    pub notifier: Arc<RecordingNotifier>,
    pub org_id: String,
    _db: TempDb,
}

/// Database file in its own temporary directory
///
/// The directory, including `-wal`/`-shm` siblings, is deleted on drop.
pub struct TempDb {
    dir: TempDir,
}

impl TempDb {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().join("queue.db")
    }
}

/// Service bound to the database at `path` (migrated on open)
pub async fn open_service(path: &Path, config: QueueServiceConfig) -> Arc<QueueService> {
    open_service_with(path, config, Arc::new(RecordingNotifier::new())).await
}

pub async fn open_service_with(
    path: &Path,
    config: QueueServiceConfig,
    notifier: Arc<RecordingNotifier>,
) -> Arc<QueueService> {
    let pool = create_pool(&path.to_string_lossy()).await.unwrap();
    run_migrations(&pool).await.unwrap();

    Arc::new(QueueService::new(
        Arc::new(SqliteQueueStore::new(pool)),
        notifier,
        Arc::new(JsonCodeRenderer),
        Arc::new(UuidProvider),
        Arc::new(SteppingTimeProvider::new(1_700_000_000_000, 1)),
        config,
    ))
}

/// New database with one registered organization
pub async fn setup() -> TestQueue {
    setup_with(QueueServiceConfig::default()).await
}

pub async fn setup_with(config: QueueServiceConfig) -> TestQueue {
    let db = TempDb::new();
    let notifier = Arc::new(RecordingNotifier::new());
    let service = open_service_with(&db.path(), config, notifier.clone()).await;
    let org = service
        .register_organization("Riverside Clinic", "desk@riverside.test")
        .await
        .unwrap();

    TestQueue {
        service,
        notifier,
        org_id: org.id,
        _db: db,
    }
}

impl TestQueue {
    pub async fn join(&self, name: &str, contact: &str) -> JoinOutcome {
        self.service
            .join(&self.org_id, JoinRequest::new(name, contact))
            .await
            .unwrap()
    }

    /// (token, position, eta) for every waiting ticket
    pub async fn waiting(&self) -> Vec<(i64, u32, u32)> {
        self.service
            .list_waiting(&self.org_id)
            .await
            .unwrap()
            .into_iter()
            .map(|t| (t.token_number, t.position, t.estimated_wait_minutes))
            .collect()
    }

    pub async fn positions(&self) -> Vec<u32> {
        self.waiting().await.into_iter().map(|(_, p, _)| p).collect()
    }
}
