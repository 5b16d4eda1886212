//! Implements InputPort. Inquire-based interactive flow:
//! resolve topic -> pick poll -> run the attendance service.
//!
//! Flag-driven where possible (--topic-id, --poll), interactive only when a
//! lookup is ambiguous. Failure notes for operator-actionable errors are
//! also delivered to Saved Messages, so they are visible from the phone.

use crate::domain::{DomainError, PollMessage, TopicInfo};
use crate::ports::{InputPort, MessageSource, ReportSink};
use crate::usecases::AttendanceService;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use inquire::ui::{Color, RenderConfig, Styled};
use inquire::Select;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Applies the render theme for all subsequent inquire prompts. Call once at
/// startup.
pub fn apply_theme() {
    let cfg = RenderConfig::default_colored()
        .with_prompt_prefix(Styled::new("♪").with_fg(Color::LightMagenta))
        .with_highlighted_option_prefix(Styled::new("➤ ").with_fg(Color::LightCyan));
    inquire::set_global_render_config(cfg);
}

/// Per-run settings assembled in main from CLI flags and config defaults.
#[derive(Debug, Clone, Default)]
pub struct RunSettings {
    /// Print the forum topic list and exit.
    pub list_topics: bool,
    /// Explicit topic id; wins over `topic_query`.
    pub topic_id: Option<i32>,
    /// Topic title substring to look up.
    pub topic_query: Option<String>,
    /// Fallback topic when neither id nor query is given.
    pub default_topic_id: i32,
    /// Poll question substring to look up.
    pub poll_query: Option<String>,
    /// How many topic messages to scan for polls.
    pub search_limit: i32,
    /// Sort affirmative options by time/semantics.
    pub smart_sort: bool,
    /// Render the report without publishing it.
    pub dry_run: bool,
}

/// TUI adapter. Inquire prompts plus an indicatif spinner for network work.
pub struct TuiInputPort {
    source: Arc<dyn MessageSource>,
    sink: Arc<dyn ReportSink>,
    service: Arc<AttendanceService>,
    settings: RunSettings,
}

impl TuiInputPort {
    pub fn new(
        source: Arc<dyn MessageSource>,
        sink: Arc<dyn ReportSink>,
        service: Arc<AttendanceService>,
        settings: RunSettings,
    ) -> Self {
        Self {
            source,
            sink,
            service,
            settings,
        }
    }

    fn spinner(message: &str) -> ProgressBar {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner} {msg}").expect("spinner template"),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(120));
        bar
    }

    fn format_topic(topic: &TopicInfo) -> String {
        format!("ID={} | {}", topic.id, topic.title)
    }

    fn format_poll(poll: &PollMessage) -> String {
        let date = DateTime::<Utc>::from_timestamp(poll.date, 0)
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "?".to_string());
        let mut question = poll.poll.question.clone();
        if question.chars().count() > 90 {
            question = question.chars().take(90).collect();
        }
        format!("[{date}] id={} | {question}", poll.message_id)
    }

    async fn resolve_topic_id(&self) -> Result<i32, DomainError> {
        if let Some(id) = self.settings.topic_id {
            return Ok(id);
        }
        let Some(query) = self.settings.topic_query.as_deref() else {
            return Ok(self.settings.default_topic_id);
        };

        let topics = self.source.list_topics(Some(query)).await?;
        match topics.len() {
            0 => Err(DomainError::TgGateway(format!(
                "no forum topic matches: {query}"
            ))),
            1 => {
                info!(id = topics[0].id, title = %topics[0].title, "topic found");
                Ok(topics[0].id)
            }
            _ => {
                let labels: Vec<String> = topics.iter().map(Self::format_topic).collect();
                let choice = Select::new("Несколько тем подходят, выбери:", labels)
                    .raw_prompt()
                    .map_err(|e| DomainError::TgGateway(e.to_string()))?;
                Ok(topics[choice.index].id)
            }
        }
    }

    /// Pick the poll to process: single query match directly, several
    /// matches interactively, none → newest with a warning; no query →
    /// newest. `polls` is newest first and non-empty.
    async fn pick_poll(&self, polls: Vec<PollMessage>) -> Result<PollMessage, DomainError> {
        let newest = |polls: Vec<PollMessage>| {
            polls
                .into_iter()
                .next()
                .ok_or_else(|| DomainError::TgGateway("empty poll list".into()))
        };

        let Some(query) = self.settings.poll_query.as_deref() else {
            return newest(polls);
        };

        let needle = query.to_lowercase();
        let mut matches: Vec<PollMessage> = polls
            .iter()
            .filter(|p| p.poll.question.to_lowercase().contains(&needle))
            .cloned()
            .collect();

        match matches.len() {
            0 => {
                warn!(query, "no poll matches the query, taking the newest");
                newest(polls)
            }
            1 => Ok(matches.remove(0)),
            _ => {
                let labels: Vec<String> = matches.iter().map(Self::format_poll).collect();
                let choice = Select::new("Несколько опросов подходят, выбери:", labels)
                    .raw_prompt()
                    .map_err(|e| DomainError::TgGateway(e.to_string()))?;
                Ok(matches.remove(choice.index))
            }
        }
    }

    /// Deliver an operator-actionable failure note to Saved Messages.
    /// Best-effort: a sink failure here must not mask the original error.
    async fn notify_failure(&self, err: &DomainError) {
        let actionable = matches!(
            err,
            DomainError::NoAffirmativeOptions { .. }
                | DomainError::AnonymousPoll
                | DomainError::VoteRequired
                | DomainError::PollNotFound { .. }
        );
        if !actionable {
            return;
        }
        if let Err(sink_err) = self.sink.publish(&format!("❌ {err}")).await {
            warn!(error = %sink_err, "failed to deliver failure note");
        }
    }
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        if self.settings.list_topics {
            let topics = self.source.list_topics(None).await?;
            println!("📌 Темы форума:");
            for t in &topics {
                println!("ID={} | top_message={} | {}", t.id, t.top_message, t.title);
            }
            return Ok(());
        }

        let topic_id = self.resolve_topic_id().await?;
        info!(topic_id, "scanning topic for polls");

        let bar = Self::spinner("Ищу опросы в теме...");
        let polls = self
            .source
            .find_polls(topic_id, self.settings.search_limit)
            .await;
        bar.finish_and_clear();
        let polls = polls?;

        if polls.is_empty() {
            let err = DomainError::PollNotFound { topic_id };
            self.notify_failure(&err).await;
            return Err(err);
        }

        let poll_msg = self.pick_poll(polls).await?;
        info!(
            message_id = poll_msg.message_id,
            question = %poll_msg.poll.question,
            "poll selected"
        );
        for (i, opt) in poll_msg.poll.options.iter().enumerate() {
            info!("answer {i}: {}", opt.text);
        }
        if self.settings.smart_sort {
            info!("smart sort enabled: ordering options by time/semantics");
        }

        let bar = Self::spinner("Загружаю голоса...");
        let result = self
            .service
            .process(&poll_msg, self.settings.smart_sort, !self.settings.dry_run)
            .await;
        bar.finish_and_clear();

        match result {
            Ok(report) => {
                println!("{report}");
                Ok(())
            }
            Err(err) => {
                error!(%err, "run failed");
                self.notify_failure(&err).await;
                Err(err)
            }
        }
    }
}
