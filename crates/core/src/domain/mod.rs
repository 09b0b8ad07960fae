// Domain Layer - Pure business logic and entities

pub mod error;
pub mod organization;
pub mod queue;
pub mod ticket;

// Re-exports
pub use error::DomainError;
pub use organization::{
    OrgId, Organization, QueueConfig, DEFAULT_EMERGENCY_PENALTY_MINUTES,
    DEFAULT_PER_PERSON_MINUTES,
};
pub use queue::QueueState;
pub use ticket::{Ticket, TicketId, TicketStatus, TokenNumber};
