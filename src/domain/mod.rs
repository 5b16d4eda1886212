//! Domain layer: entities, errors, and the pure attendance logic
//! (instrument classification, option selection, report building).

pub mod entities;
pub mod errors;
pub mod instrument;
pub mod report;
pub mod schedule;

pub use entities::{
    ChatMember, MusicianRegistry, Poll, PollMessage, PollOption, SignInResult, TopicInfo, VotesPage,
};
pub use errors::DomainError;
pub use instrument::Section;
pub use report::ReportStats;
