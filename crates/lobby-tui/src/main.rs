use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use lobby_client::ClientOptions;
use lobby_client::config::DEFAULT_API_URL;
use lobby_core::render::Locale;
use tracing_subscriber::EnvFilter;

mod client;
mod tui;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LocaleArg {
    En,
    Ru,
}

impl From<LocaleArg> for Locale {
    fn from(arg: LocaleArg) -> Self {
        match arg {
            LocaleArg::En => Locale::En,
            LocaleArg::Ru => Locale::Ru,
        }
    }
}

#[derive(Parser)]
#[command(name = "lobby")]
#[command(about = "Create or join a card-game room from the terminal", long_about = None)]
struct Cli {
    /// Lobby API base URL
    #[arg(short, long, env = "LOBBY_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Game-state poll interval in milliseconds
    #[arg(long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
    poll_ms: u64,

    /// Prefill the player name
    #[arg(short, long)]
    name: Option<String>,

    /// Language of the game-state labels
    #[arg(long, value_enum, default_value_t = LocaleArg::En)]
    locale: LocaleArg,

    /// Go straight to the join view after login
    #[arg(long)]
    no_game_type_step: bool,

    /// Do not fetch the player's id after registering
    #[arg(long)]
    skip_identity: bool,

    /// Hide the leave control
    #[arg(long)]
    no_leave: bool,

    /// Do not show players' hands
    #[arg(long)]
    no_hands: bool,

    /// Stay on the current view when a start request succeeds
    #[arg(long)]
    start_noop: bool,

    /// Write logs to this file (filtered by RUST_LOG, default "info")
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn options(&self) -> ClientOptions {
        ClientOptions {
            choose_game_type_step: !self.no_game_type_step,
            fetch_identity: !self.skip_identity,
            leave_enabled: !self.no_leave,
            show_hands: !self.no_hands,
            switch_view_on_start: !self.start_noop,
            locale: self.locale.into(),
        }
    }
}

/// Log to a file; the terminal belongs to the TUI.
fn init_logging(path: &Path) -> std::io::Result<()> {
    let file = std::fs::File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file
        && let Err(e) = init_logging(path)
    {
        eprintln!("Error: cannot open log file {}: {}", path.display(), e);
        return;
    }

    let options = cli.options();
    let poll_period = Duration::from_millis(cli.poll_ms);
    tracing::info!(api_url = %cli.api_url, ?options, "starting lobby client");

    let name = cli.name.unwrap_or_default();
    if let Err(e) = client::start_client(&cli.api_url, options, poll_period, name).await {
        eprintln!("Error: {}", e);
    }
}
