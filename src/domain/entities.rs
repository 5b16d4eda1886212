//! Domain entities. Pure data structures for the core business.
//!
//! No Telegram/IO types here — these are mapped from adapters.

use std::collections::HashMap;

/// One answer option of a poll. Identity is the opaque `option` bytes
/// assigned by the platform; `text` is the user-visible label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOption {
    pub text: String,
    pub option: Vec<u8>,
}

/// A poll as created by the message source. Read-only to the core.
#[derive(Debug, Clone)]
pub struct Poll {
    pub question: String,
    pub options: Vec<PollOption>,
    /// False for anonymous polls; voter identities are withheld then.
    pub public_voters: bool,
}

/// A poll together with the message that carries it. The message id is
/// required when requesting per-option voter pages.
#[derive(Debug, Clone)]
pub struct PollMessage {
    pub message_id: i32,
    /// Unix timestamp of the carrying message.
    pub date: i64,
    pub poll: Poll,
}

/// Forum topic metadata, for topic lookup and the `--list-topics` listing.
#[derive(Debug, Clone)]
pub struct TopicInfo {
    pub id: i32,
    pub title: String,
    pub top_message: i32,
}

/// One page of voters for a single poll option.
#[derive(Debug, Clone, Default)]
pub struct VotesPage {
    pub voters: Vec<i64>,
    /// Opaque continuation cursor. None (or empty) means the option is
    /// exhausted.
    pub next_offset: Option<String>,
}

/// A chat participant row for the roster export.
#[derive(Debug, Clone)]
pub struct ChatMember {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
}

/// Mapping from user id to the raw instrument label, loaded once per run.
/// `total_rows` counts every row the loader saw, including skipped ones.
#[derive(Debug, Clone, Default)]
pub struct MusicianRegistry {
    by_user: HashMap<i64, String>,
    total_rows: usize,
}

impl MusicianRegistry {
    pub fn new(by_user: HashMap<i64, String>, total_rows: usize) -> Self {
        Self {
            by_user,
            total_rows,
        }
    }

    /// Raw instrument label for a user, if the user is in the registry.
    pub fn instrument(&self, user_id: i64) -> Option<&str> {
        self.by_user.get(&user_id).map(String::as_str)
    }

    /// Number of users with a usable instrument label.
    pub fn len(&self) -> usize {
        self.by_user.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_user.is_empty()
    }

    pub fn total_rows(&self) -> usize {
        self.total_rows
    }
}

impl FromIterator<(i64, String)> for MusicianRegistry {
    fn from_iter<T: IntoIterator<Item = (i64, String)>>(iter: T) -> Self {
        let by_user: HashMap<i64, String> = iter.into_iter().collect();
        let total_rows = by_user.len();
        Self {
            by_user,
            total_rows,
        }
    }
}

/// Outcome of a sign-in attempt. 2FA-protected accounts require a password
/// check after the login code.
#[derive(Debug)]
pub enum SignInResult {
    Success,
    PasswordRequired { hint: Option<String> },
}
