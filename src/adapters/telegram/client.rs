//! Implements MessageSource, VotePageFetcher and ReportSink using the
//! grammers Client.
//!
//! Handles FloodWait by sleeping and retrying. Uses raw invoke for topic
//! listing, topic history (GetReplies) and poll votes (GetPollVotes).

use crate::adapters::telegram::mapper;
use crate::domain::{ChatMember, DomainError, PollMessage, TopicInfo, VotesPage};
use crate::ports::{MessageSource, ReportSink, VotePageFetcher};
use async_trait::async_trait;
use grammers_client::tl;
use grammers_client::Client;
use grammers_client::InvocationError;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Messages per GetReplies batch while scanning a topic for polls.
const HISTORY_BATCH: i32 = 100;

/// Members per GetParticipants batch for the roster export.
const PARTICIPANTS_BATCH: i32 = 200;

/// Attempts per request before a FloodWait is surfaced to the caller.
const FLOOD_RETRIES: usize = 3;

/// Telegram gateway adapter for one configured chat. Wraps a grammers Client
/// (clone shared with the auth adapter; same session).
pub struct GrammersPollGateway {
    client: Client,
    chat_id: i64,
    /// If set, sleep this many ms before each vote-page request (rate limiting).
    votes_delay_ms: Option<u64>,
    /// Cache the resolved InputPeer so we don't walk dialogs on every request
    /// (avoids FLOOD_WAIT).
    peer_cache: Mutex<Option<tl::enums::InputPeer>>,
}

impl GrammersPollGateway {
    pub fn new(client: Client, chat_id: i64, votes_delay_ms: Option<u64>) -> Self {
        Self {
            client,
            chat_id,
            votes_delay_ms,
            peer_cache: Mutex::new(None),
        }
    }

    /// Resolve the configured chat to an InputPeer, walking dialogs once and
    /// caching the result.
    async fn input_peer(&self) -> Result<tl::enums::InputPeer, DomainError> {
        {
            let cache = self.peer_cache.lock().await;
            if let Some(peer) = cache.as_ref() {
                return Ok(peer.clone());
            }
        }

        let mut dialogs = self.client.iter_dialogs();
        let mut found = None;
        while let Some(dialog) = dialogs
            .next()
            .await
            .map_err(|e| DomainError::TgGateway(e.to_string()))?
        {
            let peer = dialog.peer();
            if peer.id().bot_api_dialog_id() == self.chat_id {
                found = Some(peer.clone());
                break;
            }
        }
        let peer = found.ok_or_else(|| {
            DomainError::TgGateway(format!("chat {} not found in dialogs", self.chat_id))
        })?;
        let peer_ref = peer
            .to_ref()
            .await
            .ok_or_else(|| DomainError::TgGateway("peer not in session cache".into()))?;
        let input_peer: tl::enums::InputPeer = peer_ref.into();

        *self.peer_cache.lock().await = Some(input_peer.clone());
        Ok(input_peer)
    }

    /// The chat as an InputChannel (forum topics and participants live on
    /// the channels namespace).
    async fn input_channel(&self) -> Result<tl::enums::InputChannel, DomainError> {
        let peer = self.input_peer().await?;
        mapper::input_channel_of(&peer).ok_or_else(|| {
            DomainError::TgGateway(format!(
                "chat {} is not a supergroup/channel; forum requests need one",
                self.chat_id
            ))
        })
    }

    /// Invoke with FloodWait absorption: on RPC 420, sleep the advertised
    /// number of seconds and retry, up to FLOOD_RETRIES attempts.
    async fn invoke_with_flood_wait<R>(&self, request: &R) -> Result<R::Return, DomainError>
    where
        R: tl::RemoteCall + Send + Sync,
    {
        let mut last_wait = 0u64;
        for attempt in 0..FLOOD_RETRIES {
            match self.client.invoke(request).await {
                Ok(res) => return Ok(res),
                Err(InvocationError::Rpc(rpc)) if rpc.code == 420 => {
                    let wait_secs = u64::from(rpc.value.unwrap_or(60));
                    warn!(attempt, wait_secs, "FloodWait, sleeping");
                    last_wait = wait_secs;
                    tokio::time::sleep(Duration::from_secs(wait_secs)).await;
                }
                Err(InvocationError::Rpc(rpc)) if rpc.name == "POLL_VOTE_REQUIRED" => {
                    return Err(DomainError::VoteRequired);
                }
                Err(e) => return Err(DomainError::TgGateway(e.to_string())),
            }
        }
        Err(DomainError::FloodWait { seconds: last_wait })
    }
}

#[async_trait]
impl MessageSource for GrammersPollGateway {
    async fn list_topics(&self, query: Option<&str>) -> Result<Vec<TopicInfo>, DomainError> {
        let channel = self.input_channel().await?;
        let req = tl::functions::channels::GetForumTopics {
            channel,
            q: query.map(String::from),
            offset_date: 0,
            offset_id: 0,
            offset_topic: 0,
            limit: 200,
        };
        let tl::enums::messages::ForumTopics::Topics(res) =
            self.invoke_with_flood_wait(&req).await?;

        Ok(res.topics.iter().filter_map(mapper::topic_info).collect())
    }

    async fn find_polls(&self, topic_id: i32, limit: i32) -> Result<Vec<PollMessage>, DomainError> {
        use tl::enums::messages::Messages;

        let peer = self.input_peer().await?;
        let mut polls = Vec::new();
        let mut scanned = 0i32;
        let mut offset_id = 0i32;

        // Newest-first scan of the topic thread, one GetReplies batch at a
        // time, until `limit` messages were seen or the topic is exhausted.
        loop {
            let batch = HISTORY_BATCH.min(limit - scanned);
            if batch <= 0 {
                break;
            }
            let req = tl::functions::messages::GetReplies {
                peer: peer.clone(),
                msg_id: topic_id,
                offset_id,
                offset_date: 0,
                add_offset: 0,
                limit: batch,
                max_id: 0,
                min_id: 0,
                hash: 0,
            };
            let raw = self.invoke_with_flood_wait(&req).await?;
            let messages = match raw {
                Messages::Messages(m) => m.messages,
                Messages::Slice(m) => m.messages,
                Messages::ChannelMessages(m) => m.messages,
                Messages::NotModified(_) => break,
            };
            if messages.is_empty() {
                break;
            }

            scanned += messages.len() as i32;
            let mut batch_min = i32::MAX;
            for msg in &messages {
                if let Some(poll) = mapper::poll_message(msg) {
                    batch_min = batch_min.min(poll.message_id);
                    polls.push(poll);
                    continue;
                }
                if let tl::enums::Message::Message(m) = msg {
                    batch_min = batch_min.min(m.id);
                } else if let tl::enums::Message::Service(m) = msg {
                    batch_min = batch_min.min(m.id);
                }
            }
            if batch_min == i32::MAX || (messages.len() as i32) < batch {
                break;
            }
            offset_id = batch_min;
        }

        debug!(topic_id, scanned, polls = polls.len(), "topic scanned");
        Ok(polls)
    }

    async fn list_participants(&self) -> Result<Vec<ChatMember>, DomainError> {
        use tl::enums::channels::ChannelParticipants;

        let channel = self.input_channel().await?;
        let mut members = Vec::new();
        let mut offset = 0i32;

        loop {
            let req = tl::functions::channels::GetParticipants {
                channel: channel.clone(),
                filter: tl::types::ChannelParticipantsRecent {}.into(),
                offset,
                limit: PARTICIPANTS_BATCH,
                hash: 0,
            };
            let raw = self.invoke_with_flood_wait(&req).await?;
            let page = match raw {
                ChannelParticipants::Participants(p) => p,
                ChannelParticipants::NotModified => break,
            };
            if page.users.is_empty() {
                break;
            }
            offset += page.users.len() as i32;
            members.extend(page.users.iter().filter_map(mapper::chat_member));
            if offset >= page.count {
                break;
            }
        }

        Ok(members)
    }
}

#[async_trait]
impl VotePageFetcher for GrammersPollGateway {
    async fn fetch_page(
        &self,
        message_id: i32,
        option: &[u8],
        offset: Option<&str>,
        limit: i32,
    ) -> Result<VotesPage, DomainError> {
        if let Some(ms) = self.votes_delay_ms {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }

        let peer = self.input_peer().await?;
        let req = tl::functions::messages::GetPollVotes {
            peer,
            id: message_id,
            option: Some(option.to_vec()),
            offset: offset.map(String::from),
            limit,
        };
        let tl::enums::messages::VotesList::List(list) =
            self.invoke_with_flood_wait(&req).await?;

        Ok(mapper::votes_page(&list))
    }
}

#[async_trait]
impl ReportSink for GrammersPollGateway {
    /// Deliver the report to the account's Saved Messages.
    async fn publish(&self, text: &str) -> Result<(), DomainError> {
        let random_id = chrono::Utc::now()
            .timestamp_nanos_opt()
            .unwrap_or_else(|| chrono::Utc::now().timestamp_millis());
        let req = tl::functions::messages::SendMessage {
            no_webpage: true,
            silent: false,
            background: false,
            clear_draft: false,
            noforwards: false,
            update_stickersets_order: false,
            invert_media: false,
            allow_paid_floodskip: false,
            peer: tl::types::InputPeerSelf {}.into(),
            reply_to: None,
            message: text.to_string(),
            random_id,
            reply_markup: None,
            entities: None,
            schedule_date: None,
            schedule_repeat_period: None,
            send_as: None,
            quick_reply_shortcut: None,
            effect: None,
            allow_paid_stars: None,
            suggested_post: None,
        };
        self.client
            .invoke(&req)
            .await
            .map_err(|e| DomainError::ReportSink(e.to_string()))?;
        Ok(())
    }
}
