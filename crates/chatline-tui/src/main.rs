//! Chatline terminal chat.
//!
//! `user` chats in the conversation remembered on this machine; `agent`
//! browses every conversation and replies to one at a time.

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use chatline_client::config::{DEFAULT_API_PREFIX, DEFAULT_BASE_URL};
use chatline_client::{ChatApi, ClientConfig, HttpClient};
use chatline_core::{ConversationId, Role};
use chatline_session::{FileIdStore, IdStore};

mod app;
mod backend;
mod event;
mod state;
mod ui;

use app::App;
use backend::Backend;
use event::{BackendCommand, UiEvent};

#[derive(Parser)]
#[command(name = "chatline-tui")]
#[command(about = "Chatline terminal chat")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Backend connection settings shared by both modes.
#[derive(Args, Debug)]
struct ConnectArgs {
    /// Backend base URL
    #[arg(short, long, default_value = DEFAULT_BASE_URL)]
    url: String,

    /// Path prefix of the versioned API
    #[arg(long, default_value = DEFAULT_API_PREFIX)]
    api_prefix: String,

    /// Refresh interval in seconds
    #[arg(short, long, default_value = "5")]
    refresh: u64,

    /// Request timeout in seconds
    #[arg(long, default_value = "10")]
    timeout: u64,
}

impl ConnectArgs {
    fn config(self) -> ClientConfig {
        ClientConfig {
            api_prefix: self.api_prefix,
            poll_interval: Duration::from_secs(self.refresh.max(1)),
            request_timeout: Duration::from_secs(self.timeout.max(1)),
            ..ClientConfig::with_base_url(self.url)
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Chat as the user, resuming the conversation stored on this machine
    User {
        #[command(flatten)]
        connect: ConnectArgs,

        /// File holding the remembered conversation id
        #[arg(long)]
        state_file: Option<PathBuf>,
    },

    /// Agent dashboard - browse conversations and reply
    #[command(alias = "a")]
    Agent {
        #[command(flatten)]
        connect: ConnectArgs,

        /// Open this conversation directly instead of starting on the dashboard
        #[arg(short, long)]
        conversation: Option<String>,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    // Logs go to /tmp/chatline-tui.log so they never draw over the terminal.
    if let Ok(file) = std::fs::File::create("/tmp/chatline-tui.log") {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("chatline_tui=debug,chatline_session=debug"));
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_env_filter(filter)
            .with_ansi(false)
            .init();
    }

    let cli = Cli::parse();

    match cli.command {
        Commands::User {
            connect,
            state_file,
        } => {
            let path = state_file
                .or_else(FileIdStore::default_path)
                .ok_or("cannot determine a data directory; pass --state-file")?;
            let store: Arc<dyn IdStore> = Arc::new(FileIdStore::new(path));
            run_tui(Role::User, connect.config(), Some(store), None)?;
        }
        Commands::Agent {
            connect,
            conversation,
        } => {
            let initial = ConversationId::from_optional(conversation.as_deref());
            run_tui(Role::Agent, connect.config(), None, initial)?;
        }
    }

    Ok(())
}

fn run_tui(
    role: Role,
    config: ClientConfig,
    store: Option<Arc<dyn IdStore>>,
    initial: Option<ConversationId>,
) -> Result<(), Box<dyn Error>> {
    info!(role = %role, url = %config.base_url, "Starting TUI");

    let api: Arc<dyn ChatApi> = Arc::new(HttpClient::new(&config)?);

    // Create channels for UI <-> backend communication
    let (ui_tx, ui_rx) = mpsc::channel::<UiEvent>(100);
    let (cmd_tx, cmd_rx) = mpsc::channel::<BackendCommand>(100);

    // Spawn background thread with its own tokio runtime
    let backend = Backend::new(api, store, role, config.poll_interval, ui_tx);
    let shutdown = CancellationToken::new();
    let backend_shutdown = shutdown.clone();
    let bg_handle = std::thread::spawn(move || match tokio::runtime::Runtime::new() {
        Ok(rt) => rt.block_on(backend.run(cmd_rx, initial, backend_shutdown)),
        Err(e) => error!(error = %e, "Failed to create tokio runtime"),
    });

    let terminal = ratatui::init();

    let mut app = App::new(role, ui_rx, cmd_tx);
    let result = app.run(terminal);

    ratatui::restore();

    // Don't wait out a request that is still timing out.
    shutdown.cancel();
    let _ = bg_handle.join();

    info!("TUI shutdown complete");

    result.map_err(|e| e.into())
}
