//! End-to-end attendance run for one chosen poll:
//! select affirmative options -> aggregate voters -> load registry ->
//! build report -> publish.
//!
//! Poll and topic *selection* is interactive and lives in the UI adapter;
//! this service starts where a concrete poll message is already in hand.

use crate::domain::{report::ReportStats, schedule, DomainError, PollMessage};
use crate::ports::{RegistryPort, ReportSink};
use crate::usecases::VoteAggregator;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

pub struct AttendanceService {
    aggregator: VoteAggregator,
    registry: Arc<dyn RegistryPort>,
    sink: Arc<dyn ReportSink>,
    musicians_csv: PathBuf,
}

impl AttendanceService {
    pub fn new(
        aggregator: VoteAggregator,
        registry: Arc<dyn RegistryPort>,
        sink: Arc<dyn ReportSink>,
        musicians_csv: PathBuf,
    ) -> Self {
        Self {
            aggregator,
            registry,
            sink,
            musicians_csv,
        }
    }

    /// Process one poll and return the rendered report text. With `publish`
    /// false the report is only rendered (dry run).
    pub async fn process(
        &self,
        poll_msg: &PollMessage,
        smart_sort: bool,
        publish: bool,
    ) -> Result<String, DomainError> {
        let targets = schedule::select_targets(&poll_msg.poll.options, smart_sort)?;
        let labels: Vec<String> = targets.iter().map(|t| t.text.clone()).collect();
        info!(
            question = %poll_msg.poll.question,
            targets = targets.len(),
            smart_sort,
            "processing poll"
        );

        let voters = self.aggregator.collect(poll_msg, &targets).await?;
        info!(voters = voters.len(), "voter set collected");

        let registry = self.registry.load(&self.musicians_csv).await?;
        info!(
            rows = registry.total_rows(),
            musicians = registry.len(),
            "musician registry loaded"
        );

        let stats = ReportStats::tally(&voters, &registry);
        let text = stats.render(&poll_msg.poll.question, &labels);

        if publish {
            self.sink.publish(&text).await?;
            info!("report published");
        } else {
            info!("dry run, report not published");
        }

        Ok(text)
    }
}
