// Port Layer - Interfaces for external dependencies

pub mod code_renderer;
pub mod id_provider; // For deterministic testing
pub mod mocks;
pub mod notifier;
pub mod organization_store;
pub mod ticket_store;
pub mod time_provider;
pub mod transaction;

// Re-exports
pub use code_renderer::{
    CodePayload, CodeRenderer, EntryCode, JsonCodeRenderer, RenderedCode, TicketCode,
};
pub use id_provider::IdProvider;
pub use notifier::{LogNotifier, Notifier, NotifyError};
pub use organization_store::OrganizationStore;
pub use ticket_store::TicketStore;
pub use time_provider::TimeProvider;
pub use transaction::{TicketStoreTransaction, Transaction, TransactionalTicketStore};

/// Everything the queue service needs from durable storage
pub trait QueueStore: TicketStore + TransactionalTicketStore + OrganizationStore {}

impl<T> QueueStore for T where T: TicketStore + TransactionalTicketStore + OrganizationStore {}
