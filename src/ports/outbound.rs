//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{
    ChatMember, DomainError, MusicianRegistry, PollMessage, TopicInfo, VotesPage,
};
use std::path::Path;

/// Message source: forum topics, polls inside a topic, chat members.
#[async_trait::async_trait]
pub trait MessageSource: Send + Sync {
    /// List forum topics of the configured chat, optionally filtered by a
    /// title substring (server-side query).
    async fn list_topics(&self, query: Option<&str>) -> Result<Vec<TopicInfo>, DomainError>;

    /// Scan up to `limit` messages of a topic, newest first, and return
    /// every poll found (newest first).
    async fn find_polls(&self, topic_id: i32, limit: i32) -> Result<Vec<PollMessage>, DomainError>;

    /// List the chat's participants (for the roster export).
    async fn list_participants(&self) -> Result<Vec<ChatMember>, DomainError>;
}

/// Paginated voter retrieval for one poll option.
#[async_trait::async_trait]
pub trait VotePageFetcher: Send + Sync {
    /// Fetch one page of voters for `option` of the poll carried by message
    /// `message_id`. `offset` is the opaque cursor from the previous page,
    /// or None for the first page.
    ///
    /// Fails with [`DomainError::VoteRequired`] when the platform demands
    /// that this account vote before reading others' votes.
    async fn fetch_page(
        &self,
        message_id: i32,
        option: &[u8],
        offset: Option<&str>,
        limit: i32,
    ) -> Result<VotesPage, DomainError>;
}

/// Musician registry loader. Delimiter, encoding and header naming are the
/// loader's concern; rows with a missing id or instrument are skipped there.
#[async_trait::async_trait]
pub trait RegistryPort: Send + Sync {
    async fn load(&self, path: &Path) -> Result<MusicianRegistry, DomainError>;
}

/// Delivers the rendered report (e.g. to Saved Messages).
#[async_trait::async_trait]
pub trait ReportSink: Send + Sync {
    async fn publish(&self, text: &str) -> Result<(), DomainError>;
}

/// Login / 2FA operations against the messaging service.
#[async_trait::async_trait]
pub trait AuthPort: Send + Sync {
    async fn is_authenticated(&self) -> Result<bool, DomainError>;

    async fn request_login_code(&self, phone: &str, api_hash: &str) -> Result<(), DomainError>;

    async fn sign_in(&self, code: &str) -> Result<crate::domain::SignInResult, DomainError>;

    async fn check_password(&self, password: &[u8]) -> Result<(), DomainError>;
}
