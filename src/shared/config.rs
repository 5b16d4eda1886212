//! Application configuration. API credentials, chat/topic defaults, paths.

use serde::Deserialize;

/// Default voters-per-page for poll vote requests.
pub const DEFAULT_VOTES_PAGE_SIZE: i32 = 100;

/// Default number of topic messages scanned while looking for polls.
pub const DEFAULT_SEARCH_LIMIT: i32 = 300;

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    pub api_id: Option<i32>,
    pub api_hash: Option<String>,
    pub session_path: Option<String>,

    /// Orchestra chat id (bot-api style, e.g. -100...). Read from
    /// TG_ROLLCALL_CHAT_ID.
    pub chat_id: Option<i64>,

    /// Topic used when neither --topic-id nor --topic is given. Read from
    /// TG_ROLLCALL_DEFAULT_TOPIC_ID.
    #[serde(default)]
    pub default_topic_id: Option<i32>,

    /// Path to the musician registry CSV. Read from TG_ROLLCALL_MUSICIANS_CSV.
    #[serde(default)]
    pub musicians_csv: Option<String>,

    /// How many topic messages to scan for polls. Read from
    /// TG_ROLLCALL_SEARCH_LIMIT.
    #[serde(default)]
    pub search_limit: Option<i32>,

    /// Voters per GetPollVotes page. Read from TG_ROLLCALL_VOTES_PAGE_SIZE.
    #[serde(default)]
    pub votes_page_size: Option<i32>,

    /// Optional delay in ms before each vote-page request (rate limiting).
    /// Read from TG_ROLLCALL_VOTES_DELAY_MS.
    #[serde(default)]
    pub votes_delay_ms: Option<u64>,
}

impl AppConfig {
    /// Layered load: optional config file (explicit path, or the
    /// TG_ROLLCALL_CONFIG env var) under TG_ROLLCALL_* environment variables.
    pub fn load(file: Option<&str>) -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        let file = file
            .map(String::from)
            .or_else(|| std::env::var("TG_ROLLCALL_CONFIG").ok());
        if let Some(path) = file {
            c = c.add_source(config::File::with_name(&path));
        }
        c = c.add_source(config::Environment::with_prefix("TG_ROLLCALL"));
        c.build()?.try_deserialize()
    }

    /// Registry CSV path. Defaults to the spreadsheet name the orchestra
    /// actually exports.
    pub fn musicians_csv_or_default(&self) -> String {
        self.musicians_csv
            .clone()
            .unwrap_or_else(|| "Музыканты.csv".to_string())
    }

    /// Topic scan depth. Defaults to DEFAULT_SEARCH_LIMIT.
    pub fn search_limit_or_default(&self) -> i32 {
        self.search_limit.unwrap_or(DEFAULT_SEARCH_LIMIT)
    }

    /// Voters per page. Defaults to DEFAULT_VOTES_PAGE_SIZE.
    pub fn votes_page_size_or_default(&self) -> i32 {
        self.votes_page_size.unwrap_or(DEFAULT_VOTES_PAGE_SIZE)
    }
}
