// ID Provider Port (for deterministic testing)

use rand::Rng;

/// ID provider interface (allows deterministic IDs in tests)
pub trait IdProvider: Send + Sync {
    /// Generate a new unique ID
    fn generate_id(&self) -> String;

    /// Six-digit organization entry code
    fn generate_entry_code(&self) -> String;
}

/// UUID v4 provider (production)
pub struct UuidProvider;

impl IdProvider for UuidProvider {
    fn generate_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }

    fn generate_entry_code(&self) -> String {
        rand::thread_rng().gen_range(100_000..1_000_000).to_string()
    }
}
