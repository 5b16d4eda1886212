//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Telegram gateway error: {0}")]
    TgGateway(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The topic scan found no poll message at all.
    #[error("no polls found in topic {topic_id}")]
    PollNotFound { topic_id: i32 },

    /// None of the poll's answers reads as "will attend". Carries every raw
    /// option text so the operator can see what failed to classify.
    #[error("poll has no affirmative options (✅/приду/смогу):\n{options}")]
    NoAffirmativeOptions { options: String },

    /// Telegram withholds voter identities for anonymous polls.
    #[error("poll is anonymous — Telegram does not expose who voted")]
    AnonymousPoll,

    /// The current account must cast a vote before it may read others' votes.
    #[error("Telegram requires this account to vote in the poll before the vote list is readable")]
    VoteRequired,

    #[error("musician registry error: {0}")]
    Registry(String),

    #[error("report delivery failed: {0}")]
    ReportSink(String),

    /// FloodWait error: the gateway retries in place; this surfaces only
    /// after retries are exhausted.
    #[error("FloodWait: retry after {seconds} seconds")]
    FloodWait { seconds: u64 },
}
