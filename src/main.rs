//! Wiring & DI. Entry point: bootstrap adapters, inject into services, run UI.
//! No business logic here; authentication is delegated to AuthService.

use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use tg_rollcall::adapters::registry::CsvRegistryLoader;
use tg_rollcall::adapters::telegram::{GrammersAuthAdapter, GrammersPollGateway};
use tg_rollcall::adapters::ui::{RunSettings, TuiInputPort};
use tg_rollcall::ports::{
    AuthPort, InputPort, MessageSource, RegistryPort, ReportSink, VotePageFetcher,
};
use tg_rollcall::usecases::{AttendanceService, AuthService, RosterExporter, VoteAggregator};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Turn a Telegram rehearsal/concert poll into an orchestra attendance report.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a config file (otherwise TG_ROLLCALL_* env / .env).
    #[arg(long)]
    config: Option<String>,

    /// Print the forum topic list and exit.
    #[arg(long)]
    list_topics: bool,

    /// Topic id to scan (wins over --topic).
    #[arg(long)]
    topic_id: Option<i32>,

    /// Find the topic by a title substring.
    #[arg(long)]
    topic: Option<String>,

    /// Find the poll by a question substring (default: newest poll).
    #[arg(long)]
    poll: Option<String>,

    /// Sort affirmative options by extracted time, then semantics
    /// (soundcheck → rehearsal → concert).
    #[arg(long)]
    smart_sort: bool,

    /// Render and print the report without sending it anywhere.
    #[arg(long)]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export the chat's member list to a CSV (add the instrument column to
    /// turn it into the musician registry).
    CollectIds {
        /// Output CSV path.
        #[arg(long, default_value = "Участники.csv")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!("no .env found (check CWD)"),
    }

    let args = Args::parse();

    tg_rollcall::adapters::ui::init_ui();
    let cfg = tg_rollcall::shared::config::AppConfig::load(args.config.as_deref())
        .unwrap_or_default();

    let api_hash = cfg
        .api_hash
        .clone()
        .or_else(|| std::env::var("TG_ROLLCALL_API_HASH").ok())
        .unwrap_or_default();
    if api_hash.is_empty() {
        anyhow::bail!("Set TG_ROLLCALL_API_HASH (env or .env). Get from https://my.telegram.org");
    }
    let chat_id = cfg
        .chat_id
        .ok_or_else(|| anyhow::anyhow!("Set TG_ROLLCALL_CHAT_ID (the orchestra chat)"))?;

    let session_path = cfg
        .session_path
        .as_deref()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("./session.db"));

    // --- Telegram client (cloned for auth and gateway; same session) ---
    let tg_client = create_telegram_client(&cfg, &session_path).await?;

    // --- Auth: adapter + service, then run flow ---
    let auth_adapter: Arc<dyn AuthPort> = Arc::new(GrammersAuthAdapter::new(tg_client.clone()));
    let auth_service = AuthService::new(auth_adapter, api_hash);
    auth_service
        .run_auth_flow()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    // --- Gateway: one adapter behind three ports (source, votes, sink) ---
    let gateway = Arc::new(GrammersPollGateway::new(
        tg_client,
        chat_id,
        cfg.votes_delay_ms,
    ));
    let source: Arc<dyn MessageSource> = Arc::clone(&gateway) as Arc<dyn MessageSource>;
    let fetcher: Arc<dyn VotePageFetcher> = Arc::clone(&gateway) as Arc<dyn VotePageFetcher>;
    let sink: Arc<dyn ReportSink> = Arc::clone(&gateway) as Arc<dyn ReportSink>;

    if let Some(Command::CollectIds { out }) = &args.command {
        let exporter = RosterExporter::new(Arc::clone(&source));
        let written = exporter
            .export(out)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))?;
        info!(written, path = %out.display(), "done");
        return Ok(());
    }

    // --- Services ---
    let aggregator = VoteAggregator::new(fetcher, cfg.votes_page_size_or_default());
    let registry: Arc<dyn RegistryPort> = Arc::new(CsvRegistryLoader::new());
    let attendance = Arc::new(AttendanceService::new(
        aggregator,
        registry,
        Arc::clone(&sink),
        PathBuf::from(cfg.musicians_csv_or_default()),
    ));

    let settings = RunSettings {
        list_topics: args.list_topics,
        topic_id: args.topic_id,
        topic_query: args.topic.clone().filter(|t| !t.trim().is_empty()),
        default_topic_id: cfg.default_topic_id.unwrap_or(0),
        poll_query: args.poll.clone().filter(|p| !p.trim().is_empty()),
        search_limit: cfg.search_limit_or_default(),
        smart_sort: args.smart_sort,
        dry_run: args.dry_run,
    };

    let input_port: Arc<dyn InputPort> =
        Arc::new(TuiInputPort::new(source, sink, attendance, settings));

    input_port
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}

/// Create grammers Client with persistent session storage.
/// Loads existing session from `session_path` if present; otherwise a new
/// session is created and saved after login. Requires TG_ROLLCALL_API_ID
/// (and TG_ROLLCALL_API_HASH for login).
async fn create_telegram_client(
    cfg: &tg_rollcall::shared::config::AppConfig,
    session_path: &std::path::Path,
) -> anyhow::Result<grammers_client::Client> {
    let api_id = cfg
        .api_id
        .or_else(|| {
            std::env::var("TG_ROLLCALL_API_ID")
                .ok()
                .and_then(|s| s.parse().ok())
        })
        .unwrap_or(0);

    if api_id == 0 {
        anyhow::bail!(
            "Set TG_ROLLCALL_API_ID (and TG_ROLLCALL_API_HASH) in .env. Get from https://my.telegram.org"
        );
    }

    let session = tg_rollcall::adapters::telegram::session::open_file_session(session_path).await?;
    let session = Arc::new(session);
    let pool = grammers_client::SenderPool::new(session, api_id);
    let handle = pool.handle.clone();
    tokio::spawn(async move {
        pool.runner.run().await;
    });
    let client = grammers_client::Client::new(handle);

    Ok(client)
}
