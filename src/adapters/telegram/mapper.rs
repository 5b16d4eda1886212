//! Map Grammers TL types to domain entities.
//!
//! Extracts Poll, PollMessage, VotesPage, TopicInfo and ChatMember from
//! grammers_client tl types so the rest of the crate never sees TL.

use crate::domain::{ChatMember, Poll, PollMessage, PollOption, TopicInfo, VotesPage};
use grammers_client::tl;

/// Plain text of a TL rich-text value.
pub fn text_of(text: &tl::enums::TextWithEntities) -> String {
    let tl::enums::TextWithEntities::Entities(t) = text;
    t.text.clone()
}

/// Map a TL message to a domain PollMessage, if it carries a poll.
/// Service messages and poll-free messages map to None.
pub fn poll_message(msg: &tl::enums::Message) -> Option<PollMessage> {
    let tl::enums::Message::Message(m) = msg else {
        return None;
    };
    let tl::enums::MessageMedia::Poll(media) = m.media.as_ref()? else {
        return None;
    };
    let tl::enums::Poll::Poll(poll) = &media.poll;

    let options = poll
        .answers
        .iter()
        .map(|ans| {
            let tl::enums::PollAnswer::PollAnswer(a) = ans;
            PollOption {
                text: text_of(&a.text),
                option: a.option.clone(),
            }
        })
        .collect();

    Some(PollMessage {
        message_id: m.id,
        date: i64::from(m.date),
        poll: Poll {
            question: text_of(&poll.question),
            options,
            public_voters: poll.public_voters,
        },
    })
}

/// Voter user-ids and the continuation cursor of one votes page. Both the
/// vote entries and the attached user objects contribute ids; the set union
/// downstream removes the overlap.
pub fn votes_page(list: &tl::types::messages::VotesList) -> VotesPage {
    let mut voters: Vec<i64> = Vec::with_capacity(list.votes.len());

    for vote in &list.votes {
        let peer = match vote {
            tl::enums::MessagePeerVote::Vote(v) => &v.peer,
            tl::enums::MessagePeerVote::InputOption(v) => &v.peer,
            tl::enums::MessagePeerVote::Multiple(v) => &v.peer,
        };
        if let tl::enums::Peer::User(u) = peer {
            voters.push(u.user_id);
        }
    }

    for user in &list.users {
        if let tl::enums::User::User(u) = user {
            voters.push(u.id);
        }
    }

    VotesPage {
        voters,
        next_offset: list.next_offset.clone(),
    }
}

/// Map a TL forum topic. Deleted topics map to None.
pub fn topic_info(topic: &tl::enums::ForumTopic) -> Option<TopicInfo> {
    match topic {
        tl::enums::ForumTopic::Topic(t) => Some(TopicInfo {
            id: t.id,
            title: t.title.clone(),
            top_message: t.top_message,
        }),
        tl::enums::ForumTopic::Deleted(_) => None,
    }
}

/// Map a TL user to a roster row. Deleted/empty users map to None.
pub fn chat_member(user: &tl::enums::User) -> Option<ChatMember> {
    let tl::enums::User::User(u) = user else {
        return None;
    };
    Some(ChatMember {
        id: u.id,
        first_name: u.first_name.clone().unwrap_or_default(),
        last_name: u.last_name.clone().unwrap_or_default(),
        username: u.username.clone().unwrap_or_default(),
    })
}

/// InputChannel for forum/participant requests; None when the chat is not a
/// channel/supergroup.
pub fn input_channel_of(peer: &tl::enums::InputPeer) -> Option<tl::enums::InputChannel> {
    match peer {
        tl::enums::InputPeer::Channel(c) => Some(
            tl::types::InputChannel {
                channel_id: c.channel_id,
                access_hash: c.access_hash,
            }
            .into(),
        ),
        _ => None,
    }
}
