// Application Layer - Use Cases and Business Logic

pub mod emergency;
pub mod ledger;
pub mod queue_service;

// Re-exports
pub use ledger::TicketLedger;
pub use queue_service::{
    EmergencyJoinPolicy, EntryCodeOutcome, JoinOutcome, JoinRequest, QueueService,
    QueueServiceConfig, QueueSnapshot, TransitionOutcome,
};
