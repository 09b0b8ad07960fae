// ============================================================================
// Mock Implementations for Testing
// ============================================================================

use super::*;
use crate::domain::{
    OrgId, Organization, QueueConfig, Ticket, TicketId, TicketStatus, TokenNumber,
};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

#[derive(Debug, Default, Clone)]
struct StoreData {
    organizations: HashMap<OrgId, Organization>,
    tickets: HashMap<TicketId, Ticket>,
    counters: HashMap<OrgId, TokenNumber>,
}

/// In-memory persistence with failure injection
///
/// Transactions hold the store lock until commit/drop, mirroring a
/// single-writer database.
#[derive(Default)]
pub struct InMemoryStore {
    data: Arc<AsyncMutex<StoreData>>,
    fail_token_issue: AtomicBool,
    fail_ticket_writes: AtomicBool,
    fail_config_writes: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `next_token_number` fail with a persistence error
    pub fn fail_token_issue(&self, fail: bool) {
        self.fail_token_issue.store(fail, Ordering::SeqCst);
    }

    /// Make ticket inserts/saves fail with a persistence error
    pub fn fail_ticket_writes(&self, fail: bool) {
        self.fail_ticket_writes.store(fail, Ordering::SeqCst);
    }

    /// Make `save_config` fail with a persistence error
    pub fn fail_config_writes(&self, fail: bool) {
        self.fail_config_writes.store(fail, Ordering::SeqCst);
    }

    pub async fn ticket_count(&self) -> usize {
        self.data.lock().await.tickets.len()
    }

    fn check(flag: &AtomicBool, what: &str) -> Result<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(AppError::Persistence(format!("injected failure: {}", what)));
        }
        Ok(())
    }
}

#[async_trait]
impl TicketStore for InMemoryStore {
    async fn load_ticket(&self, id: &TicketId) -> Result<Option<Ticket>> {
        Ok(self.data.lock().await.tickets.get(id).cloned())
    }

    async fn load_ticket_by_token(
        &self,
        org_id: &OrgId,
        token_number: TokenNumber,
    ) -> Result<Option<Ticket>> {
        Ok(self
            .data
            .lock()
            .await
            .tickets
            .values()
            .find(|t| &t.org_id == org_id && t.token_number == token_number)
            .cloned())
    }

    async fn save_ticket(&self, ticket: &Ticket) -> Result<()> {
        Self::check(&self.fail_ticket_writes, "save_ticket")?;
        self.data
            .lock()
            .await
            .tickets
            .insert(ticket.id.clone(), ticket.clone());
        Ok(())
    }

    async fn list_open_tickets(&self, org_id: &OrgId) -> Result<Vec<Ticket>> {
        let data = self.data.lock().await;
        let mut tickets: Vec<Ticket> = data
            .tickets
            .values()
            .filter(|t| &t.org_id == org_id && t.status != TicketStatus::Completed)
            .cloned()
            .collect();
        tickets.sort_by_key(|t| t.token_number);
        Ok(tickets)
    }

    async fn next_token_number(&self, org_id: &OrgId) -> Result<TokenNumber> {
        Self::check(&self.fail_token_issue, "next_token_number")?;
        let mut data = self.data.lock().await;
        let counter = data.counters.entry(org_id.clone()).or_insert(0);
        *counter += 1;
        Ok(*counter)
    }

    async fn last_token_number(&self, org_id: &OrgId) -> Result<TokenNumber> {
        Ok(self.data.lock().await.counters.get(org_id).copied().unwrap_or(0))
    }
}

#[async_trait]
impl TransactionalTicketStore for InMemoryStore {
    async fn begin_transaction(&self) -> Result<Box<dyn TicketStoreTransaction>> {
        let guard = Arc::clone(&self.data).lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(InMemoryTransaction {
            guard,
            staged,
            fail_token_issue: self.fail_token_issue.load(Ordering::SeqCst),
            fail_ticket_writes: self.fail_ticket_writes.load(Ordering::SeqCst),
        }))
    }
}

#[async_trait]
impl OrganizationStore for InMemoryStore {
    async fn insert_organization(&self, org: &Organization) -> Result<()> {
        let mut data = self.data.lock().await;
        let taken = data
            .organizations
            .values()
            .any(|o| o.id == org.id || o.name == org.name || o.contact_email == org.contact_email);
        if taken {
            return Err(AppError::Duplicate(format!(
                "Organization {} already exists",
                org.name
            )));
        }
        data.organizations.insert(org.id.clone(), org.clone());
        Ok(())
    }

    async fn load_organization(&self, org_id: &OrgId) -> Result<Option<Organization>> {
        Ok(self.data.lock().await.organizations.get(org_id).cloned())
    }

    async fn load_config(&self, org_id: &OrgId) -> Result<Option<QueueConfig>> {
        Ok(self
            .data
            .lock()
            .await
            .organizations
            .get(org_id)
            .map(|o| o.queue.clone()))
    }

    async fn save_config(&self, config: &QueueConfig) -> Result<()> {
        Self::check(&self.fail_config_writes, "save_config")?;
        let mut data = self.data.lock().await;
        let org = data
            .organizations
            .get_mut(&config.org_id)
            .ok_or_else(|| AppError::NotFound(format!("Organization {} not found", config.org_id)))?;
        org.queue = config.clone();
        Ok(())
    }
}

/// Staged copy applied on commit, discarded on drop
pub struct InMemoryTransaction {
    guard: OwnedMutexGuard<StoreData>,
    staged: StoreData,
    fail_token_issue: bool,
    fail_ticket_writes: bool,
}

#[async_trait]
impl Transaction for InMemoryTransaction {
    async fn commit(mut self: Box<Self>) -> Result<()> {
        let staged = std::mem::take(&mut self.staged);
        *self.guard = staged;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl TicketStoreTransaction for InMemoryTransaction {
    async fn next_token_number(&mut self, org_id: &OrgId) -> Result<TokenNumber> {
        if self.fail_token_issue {
            return Err(AppError::Persistence(
                "injected failure: next_token_number".to_string(),
            ));
        }
        let counter = self.staged.counters.entry(org_id.clone()).or_insert(0);
        *counter += 1;
        Ok(*counter)
    }

    async fn insert_ticket(&mut self, ticket: &Ticket) -> Result<()> {
        if self.fail_ticket_writes {
            return Err(AppError::Persistence(
                "injected failure: insert_ticket".to_string(),
            ));
        }
        if self.staged.tickets.contains_key(&ticket.id) {
            return Err(AppError::Duplicate(format!("Ticket {} already exists", ticket.id)));
        }
        self.staged.tickets.insert(ticket.id.clone(), ticket.clone());
        Ok(())
    }
}

/// Notifier that records every message and can be switched to failing
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
    failing: AtomicBool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        let notifier = Self::default();
        notifier.set_failing(true);
        notifier
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// `(contact, message)` pairs delivered so far
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, contact: &str, message: &str) -> std::result::Result<(), NotifyError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(NotifyError::Delivery("gateway unavailable".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((contact.to_string(), message.to_string()));
        Ok(())
    }
}

/// Deterministic IDs: `{prefix}-1`, `{prefix}-2`, ...
pub struct SequentialIdProvider {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialIdProvider {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(1),
        }
    }
}

impl IdProvider for SequentialIdProvider {
    fn generate_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        format!("{}-{}", self.prefix, n)
    }

    /// `100001`, `100002`, ... (shares the ID counter)
    fn generate_entry_code(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        (100_000 + n).to_string()
    }
}

/// Clock that advances by a fixed step on every read
pub struct SteppingTimeProvider {
    now: AtomicI64,
    step: i64,
}

impl SteppingTimeProvider {
    pub fn new(start: i64, step: i64) -> Self {
        Self {
            now: AtomicI64::new(start),
            step,
        }
    }
}

impl TimeProvider for SteppingTimeProvider {
    fn now_millis(&self) -> i64 {
        self.now.fetch_add(self.step, Ordering::SeqCst)
    }
}

/// Renderer that always fails
pub struct FailingCodeRenderer;

impl CodeRenderer for FailingCodeRenderer {
    fn render_code(&self, _payload: &CodePayload) -> Result<RenderedCode> {
        Err(AppError::Internal("renderer offline".to_string()))
    }
}
