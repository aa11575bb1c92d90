//! Showtime Watch - new film announcements for cinema listings
//!
//! Runs a single pass: load venue state, poll every market, announce new
//! films per venue and save the updated state.

use clap::Parser;
use showtime_watch::config::{Credentials, DEFAULT_FEED_URL, DEFAULT_MAX_MESSAGE_LENGTH};
use showtime_watch::notify::{SmtpMailer, TwitterPoster};
use showtime_watch::{HttpFeedClient, MarketRange, WatchConfig, Watcher};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Announces films newly on sale at tracked cinemas
#[derive(Parser, Debug)]
#[command(name = "showtime_watch")]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory holding the `theaters` and `settings` folders
    #[arg(short, long, default_value_t = default_data_dir())]
    data_dir: String,

    /// Log what would be sent, but send nothing and save nothing
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// First market id to poll
    #[arg(long, default_value_t = 0)]
    market_start: u32,

    /// Market id to stop before
    #[arg(long, default_value_t = 2500)]
    market_end: u32,

    /// Stride between polled market ids
    #[arg(long, default_value_t = 100)]
    market_step: u32,

    /// Base URL of the showtime feed
    #[arg(long, default_value = DEFAULT_FEED_URL)]
    feed_url: String,

    /// Longest social message to build, in characters
    #[arg(long, default_value_t = DEFAULT_MAX_MESSAGE_LENGTH)]
    max_message_length: usize,

    /// Write logs to a dated file in this directory instead of stderr
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// SMTP relay used for email announcements
    #[arg(long, default_value = "smtp.gmail.com")]
    smtp_host: String,

    #[arg(long, env = "SHOWTIME_SOCIAL_CONSUMER_KEY", hide_env_values = true)]
    social_consumer_key: Option<String>,

    #[arg(long, env = "SHOWTIME_SOCIAL_CONSUMER_SECRET", hide_env_values = true)]
    social_consumer_secret: Option<String>,

    #[arg(long, env = "SHOWTIME_SMTP_USER")]
    smtp_user: Option<String>,

    #[arg(long, env = "SHOWTIME_SMTP_PASSWORD", hide_env_values = true)]
    smtp_password: Option<String>,
}

/// Returns the default data directory: ~/.local/share/showtime_watch
fn default_data_dir() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("showtime_watch")
        .to_string_lossy()
        .to_string()
}

fn init_logging(log_dir: Option<&Path>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    if let Some(dir) = log_dir {
        let path = dir.join(format!(
            "showtime_watch-{}.log",
            chrono::Local::now().format("%Y%m%d")
        ));
        let file = std::fs::create_dir_all(dir).and_then(|_| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
        });
        match file {
            Ok(file) => {
                builder
                    .format(|buf, record| {
                        writeln!(
                            buf,
                            "{} - {} - {}",
                            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                            record.level(),
                            record.args()
                        )
                    })
                    .target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => eprintln!("Failed to open log file {}: {}", path.display(), e),
        }
    }

    builder.init();
}

impl Args {
    fn into_config(self) -> WatchConfig {
        let mut config = WatchConfig::new(self.data_dir);
        config.feed_url = self.feed_url;
        config.markets = MarketRange {
            start: self.market_start,
            end: self.market_end,
            step: self.market_step,
        };
        config.max_message_length = self.max_message_length;
        config.dry_run = self.dry_run;
        config.smtp_host = self.smtp_host;
        config.credentials = Credentials {
            social_consumer_key: self.social_consumer_key,
            social_consumer_secret: self.social_consumer_secret,
            smtp_user: self.smtp_user,
            smtp_password: self.smtp_password,
        };
        config
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(args.log_dir.as_deref());

    let config = args.into_config();
    log::info!("Starting showtime_watch...");
    log::info!("Data directory: {}", config.data_dir.display());

    let feed = HttpFeedClient::new(config.feed_url.as_str());
    let credentials = config.credentials.clone();
    let social = TwitterPoster::new(
        credentials.social_consumer_key,
        credentials.social_consumer_secret,
    );
    let mailer = SmtpMailer::new(
        config.smtp_host.as_str(),
        credentials.smtp_user,
        credentials.smtp_password,
    );

    let watcher = Watcher::new(config, feed, social, mailer);
    match watcher.run().await {
        Ok(summary) => {
            log::info!(
                "Posted {} messages and sent {} emails",
                summary.messages_posted,
                summary.emails_sent
            );
        }
        Err(e) => {
            log::error!("Run aborted: {}", e);
            std::process::exit(1);
        }
    }
}
