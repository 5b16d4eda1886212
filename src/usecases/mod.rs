//! Application use cases. Orchestrate domain logic via ports.

pub mod attendance_service;
pub mod auth_service;
pub mod roster_export;
pub mod vote_aggregator;

pub use attendance_service::AttendanceService;
pub use auth_service::AuthService;
pub use roster_export::RosterExporter;
pub use vote_aggregator::VoteAggregator;
