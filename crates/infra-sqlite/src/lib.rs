// Walk-in Queue Infrastructure - SQLite Adapter
// Implements: TicketStore, TransactionalTicketStore, OrganizationStore

mod connection;
mod error;
mod migration;
mod organization_store;
mod ticket_store;
mod transaction;

pub use connection::create_pool;
pub use migration::run_migrations;
pub use ticket_store::SqliteQueueStore;
pub use transaction::SqliteQueueTransaction;

// Note: sqlx::Error conversion is handled by error::map_sqlx_error
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for AppError here)
