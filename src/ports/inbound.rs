//! Inbound port. UI (adapter) calls into the application.

use crate::domain::DomainError;

/// Input port: the CLI/TUI drives one full application run.
#[async_trait::async_trait]
pub trait InputPort: Send + Sync {
    async fn run(&self) -> Result<(), DomainError>;
}
