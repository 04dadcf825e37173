//! Wiring & DI. Entry point: parse CLI, bootstrap the Telegram client, run
//! the dispatcher, present the record, map failures to exit codes.
//! No business logic here; collection lives in the use cases.

use std::path::Path;
use std::sync::Arc;

use clap::{ArgGroup, Parser};
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use tg_lens::adapters::telegram::{auth, client::GrammersTgGateway, session};
use tg_lens::adapters::ui::{HumanPresenter, Styles, json};
use tg_lens::domain::OsintError;
use tg_lens::ports::TgGateway;
use tg_lens::shared::config::AppConfig;
use tg_lens::usecases::{CollectOptions, Collector, Dispatcher, TargetSelector};

/// Telegram OSINT (public-access): users, channels, groups, messages.
#[derive(Debug, Parser)]
#[command(name = "tg-lens", version)]
#[command(group(ArgGroup::new("target").required(true).multiple(false)))]
struct Cli {
    /// Username (with or without @)
    #[arg(short = 'u', long, group = "target")]
    username: Option<String>,

    /// Numeric ID
    #[arg(short = 'i', long, group = "target")]
    id: Option<i64>,

    /// Phone number with country code
    #[arg(short = 'p', long, group = "target")]
    phone: Option<String>,

    /// Public message URL (https://t.me/<channel>/<msg_id>)
    #[arg(short = 'l', long, group = "target")]
    url: Option<String>,

    /// Output JSON instead of human-readable text
    #[arg(long)]
    json: bool,

    /// Download profile photos into the working directory
    #[arg(long)]
    photos: bool,

    /// Max historical photos to download
    #[arg(long, default_value_t = 10)]
    limit_photos: usize,

    /// Timezone for dates (defaults to TG_LENS_TZ, then TZ, then Europe/Paris)
    #[arg(long)]
    tz: Option<String>,

    /// Session file path
    #[arg(long)]
    session: Option<String>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

impl Cli {
    fn selector(&self) -> TargetSelector {
        // clap enforces exactly one selector.
        if let Some(username) = &self.username {
            TargetSelector::Handle(username.clone())
        } else if let Some(id) = self.id {
            TargetSelector::Id(id)
        } else if let Some(phone) = &self.phone {
            TargetSelector::Phone(phone.clone())
        } else {
            TargetSelector::MessageUrl(self.url.clone().unwrap_or_default())
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let _ = dotenv();
    // Logs go to stderr; stdout carries only the rendered record.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let code = run(cli).await;
    std::process::exit(code);
}

/// Run one invocation end to end. The client (and its session file handle)
/// is owned here and dropped on every return path before the process exits.
async fn run(cli: Cli) -> i32 {
    let cfg = match AppConfig::load() {
        Ok(cfg) => cfg,
        Err(e) => return fail(&OsintError::Config(e.to_string())),
    };

    let tz_name = cli.tz.clone().unwrap_or_else(|| cfg.tz_or_default());
    let tz = match tg_lens::usecases::timefmt::parse_zone(&tz_name) {
        Ok(tz) => tz,
        Err(e) => return fail(&e),
    };

    let api_hash = match cfg.api_hash.clone() {
        Some(h) if !h.is_empty() => h,
        _ => {
            return fail(&OsintError::Config(
                "Set TG_LENS_API_HASH or TG_API_HASH (env or .env). Get from https://my.telegram.org"
                    .into(),
            ));
        }
    };

    let session_path =
        session::session_file(cli.session.as_deref().or(cfg.session_path.as_deref()));
    let client = match create_telegram_client(&cfg, &session_path).await {
        Ok(c) => c,
        Err(e) => return fail(&OsintError::Auth(format!("client bootstrap: {e}"))),
    };

    if let Err(e) = auth::ensure_login(&client, cfg.phone.as_deref(), &api_hash).await {
        return fail(&e);
    }

    let tg: Arc<dyn TgGateway> = Arc::new(GrammersTgGateway::new(client));
    let collector = Collector::new(
        Arc::clone(&tg),
        CollectOptions {
            tz,
            photos: cli.photos,
            limit_photos: cli.limit_photos,
            photo_scan_cap: cfg.photo_scan_cap_or_default(),
        },
    );
    let dispatcher = Dispatcher::new(Arc::clone(&tg), collector);

    let selector = cli.selector();
    match dispatcher.run(&selector).await {
        Ok(Some(info)) => {
            let rendered = if cli.json {
                match json::render(&info) {
                    Ok(s) => s,
                    Err(e) => return fail(&e),
                }
            } else {
                HumanPresenter::new(Styles {
                    color: !cli.no_color,
                })
                .render(&info)
            };
            print!("{rendered}");
            if cli.json {
                println!();
            }
            0
        }
        Ok(None) => {
            // Phone lookup soft miss: no account behind the number.
            if let TargetSelector::Phone(phone) = &selector {
                println!("No user found with phone number {phone}");
            }
            0
        }
        Err(e) => fail(&e),
    }
}

fn fail(e: &OsintError) -> i32 {
    eprintln!("{e}");
    e.exit_code()
}

/// Create a grammers Client with persistent session storage. Loads the
/// session from `session_path` if present; otherwise a new session is
/// created and saved after login. Requires an api_id.
async fn create_telegram_client(
    cfg: &AppConfig,
    session_path: &Path,
) -> anyhow::Result<grammers_client::Client> {
    let api_id = cfg.api_id.unwrap_or(0);
    if api_id == 0 {
        anyhow::bail!("Set TG_LENS_API_ID or TG_API_ID (env or .env). Get from https://my.telegram.org");
    }

    let session = session::open_file_session(session_path).await?;
    let session = Arc::new(session);
    let pool = grammers_client::SenderPool::new(session, api_id);
    let handle = pool.handle.clone();
    tokio::spawn(async move {
        pool.runner.run().await;
    });
    let client = grammers_client::Client::new(handle);

    info!(session = %session_path.display(), "telegram client ready");
    Ok(client)
}
