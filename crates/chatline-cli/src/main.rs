//! Chatline CLI - command line interface for the chat backend.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use chatline_client::config::{DEFAULT_API_PREFIX, DEFAULT_BASE_URL};
use chatline_client::{ChatApi, ClientConfig, HttpClient};
use chatline_core::{Conversation, ConversationId, ConversationSummary, Message, Role};
use chatline_session::{
    fetch_dashboard, ChatSession, FileIdStore, IdStore, IdentityResolver, PollHandle,
    CONVERSATION_KEY,
};

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Chatline CLI - talk to the chat backend
#[derive(Parser)]
#[command(name = "chatline")]
#[command(about = "CLI for the Chatline chat backend", long_about = None)]
#[command(version)]
struct Cli {
    /// Backend base URL
    #[arg(short, long, global = true, default_value = DEFAULT_BASE_URL)]
    url: String,

    /// Path prefix of the versioned API
    #[arg(long, global = true, default_value = DEFAULT_API_PREFIX)]
    api_prefix: String,

    /// Poll interval for `watch`, in seconds
    #[arg(long, global = true, default_value = "5")]
    refresh: u64,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value = "10")]
    timeout: u64,

    /// File holding the remembered conversation id
    #[arg(long, global = true)]
    state_file: Option<PathBuf>,

    /// Print raw JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api_prefix: self.api_prefix.clone(),
            poll_interval: Duration::from_secs(self.refresh.max(1)),
            request_timeout: Duration::from_secs(self.timeout.max(1)),
            ..ClientConfig::with_base_url(&self.url)
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the backend is up
    Health,

    /// Create a new conversation
    Create,

    /// Show a conversation
    Get {
        /// Conversation ID
        id: String,
    },

    /// List all conversations, most recently updated first
    List,

    /// Send a message
    Send {
        /// Which side of the chat to write as: user or agent
        #[arg(long = "as", default_value = "user")]
        role: Role,

        /// Target conversation (agents must give one; users default to the remembered one)
        #[arg(short, long)]
        conversation: Option<String>,

        /// Message text
        text: String,
    },

    /// Resolve the user conversation, creating one if needed, and print its ID
    Resolve {
        /// Try this conversation before the remembered one
        #[arg(short, long)]
        conversation: Option<String>,
    },

    /// Print new messages of a conversation as they arrive (Ctrl-C to stop)
    Watch {
        /// Conversation ID
        id: String,
    },

    /// Forget the remembered conversation
    Forget,
}

#[tokio::main]
async fn main() -> CliResult {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let config = cli.client_config();
    let output = Output { json: cli.json };

    match cli.command {
        Commands::Health => health(&config).await?,
        Commands::Create => {
            let client = HttpClient::new(&config)?;
            let conversation = client.create_conversation().await?;
            output.conversation("Conversation created:", &conversation)?;
        }
        Commands::Get { id } => {
            let client = HttpClient::new(&config)?;
            let conversation = client.get_conversation(&ConversationId::new(id)).await?;
            output.conversation("", &conversation)?;
        }
        Commands::List => {
            let client = HttpClient::new(&config)?;
            let summaries = fetch_dashboard(&client).await?;
            output.summaries(&summaries);
        }
        Commands::Send {
            role,
            conversation,
            text,
        } => {
            let store = open_store(cli.state_file)?;
            let conversation = ConversationId::from_optional(conversation.as_deref());
            send(&config, &store, role, conversation, &text, &output).await?;
        }
        Commands::Resolve { conversation } => {
            let store = open_store(cli.state_file)?;
            let client = HttpClient::new(&config)?;
            let resolution = IdentityResolver::for_user(&client, &store)
                .resolve(ConversationId::from_optional(conversation.as_deref()))
                .await?;
            if output.json {
                println!("{}", serde_json::to_string_pretty(&resolution.conversation)?);
            } else if resolution.created {
                println!("{} (new)", resolution.conversation.id);
            } else {
                println!("{}", resolution.conversation.id);
            }
        }
        Commands::Watch { id } => watch(&config, ConversationId::new(id), &output).await?,
        Commands::Forget => {
            let store = open_store(cli.state_file)?;
            store.remove(CONVERSATION_KEY)?;
            println!("Forgot conversation in {}", store.path().display());
        }
    }

    Ok(())
}

fn open_store(state_file: Option<PathBuf>) -> Result<FileIdStore, Box<dyn std::error::Error>> {
    let path = state_file
        .or_else(FileIdStore::default_path)
        .ok_or("cannot determine a data directory; pass --state-file")?;
    Ok(FileIdStore::new(path))
}

async fn health(config: &ClientConfig) -> CliResult {
    let client = HttpClient::new(config)?;
    if client.health().await? {
        println!("OK {}", client.routes().root());
        Ok(())
    } else {
        Err(format!("backend at {} is not healthy", config.base_url).into())
    }
}

async fn send(
    config: &ClientConfig,
    store: &FileIdStore,
    role: Role,
    conversation: Option<ConversationId>,
    text: &str,
    output: &Output,
) -> CliResult {
    let client = HttpClient::new(config)?;
    let store: Option<&dyn IdStore> = match role {
        Role::User => Some(store as &dyn IdStore),
        Role::Agent => None,
    };
    let resolution = IdentityResolver::new(&client, store, role.into())
        .resolve(conversation)
        .await?;

    let mut session = ChatSession::with_conversation(role, resolution.conversation);
    let write = session.compose(text)?;
    write.deliver(&client).await?;

    output.conversation("Message sent:", session.conversation())
}

async fn watch(config: &ClientConfig, id: ConversationId, output: &Output) -> CliResult {
    let client = HttpClient::new(config)?;
    let mut session = ChatSession::with_conversation(Role::User, client.get_conversation(&id).await?);
    for message in &session.conversation().messages {
        output.message(message)?;
    }

    let (tx, mut rx) = mpsc::channel(8);
    let api: Arc<dyn ChatApi> = Arc::new(client);
    let poller = PollHandle::spawn(api, id, config.poll_interval, tx);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            Some(snapshot) = rx.recv() => {
                let seen = session.conversation().len();
                session.apply_snapshot(snapshot);
                for message in session.conversation().messages.iter().skip(seen) {
                    output.message(message)?;
                }
            }
        }
    }

    poller.cancel();
    Ok(())
}

/// Text or JSON printing.
struct Output {
    json: bool,
}

impl Output {
    fn conversation(&self, heading: &str, conversation: &Conversation) -> CliResult {
        if self.json {
            println!("{}", serde_json::to_string_pretty(conversation)?);
            return Ok(());
        }
        if !heading.is_empty() {
            println!("{}", heading);
        }
        print!("{}", describe_conversation(conversation));
        Ok(())
    }

    fn message(&self, message: &Message) -> CliResult {
        if self.json {
            println!("{}", serde_json::to_string(message)?);
        } else {
            println!("{}", describe_message(message));
        }
        Ok(())
    }

    fn summaries(&self, summaries: &[ConversationSummary]) {
        if self.json {
            let rows: Vec<serde_json::Value> = summaries
                .iter()
                .map(|s| {
                    serde_json::json!({
                        "conversation_uuid": s.id.as_str(),
                        "updated_at": chatline_core::timestamp::format(&s.updated_at),
                        "messages": s.message_count,
                        "last_sender": s.last_sender.map(|sender| sender.as_str()),
                        "preview": s.preview,
                    })
                })
                .collect();
            println!("{}", serde_json::Value::Array(rows));
            return;
        }
        print!("{}", describe_summaries(summaries));
    }
}

fn describe_conversation(conversation: &Conversation) -> String {
    let mut out = String::new();
    out.push_str(&format!("  ID:         {}\n", conversation.id));
    out.push_str(&format!("  Agent:      {}\n", conversation.agent_id));
    out.push_str(&format!("  Created:    {}\n", format_timestamp(&conversation.created_at)));
    out.push_str(&format!("  Updated:    {}\n", format_timestamp(&conversation.updated_at)));
    out.push_str(&format!("  Messages:   {}\n", conversation.len()));
    for message in &conversation.messages {
        out.push_str(&format!("    {}\n", describe_message(message)));
    }
    out
}

fn describe_message(message: &Message) -> String {
    format!(
        "[{}] {:<5}  {}",
        format_timestamp(&message.timestamp),
        message.sender.as_str(),
        message.content
    )
}

fn describe_summaries(summaries: &[ConversationSummary]) -> String {
    let mut out = format!("Conversations ({}):\n", summaries.len());
    out.push_str(&format!(
        "{:<36}  {:<19}  {:>4}  {:<5}  {}\n",
        "ID", "UPDATED", "MSGS", "LAST", "PREVIEW"
    ));
    out.push_str(&format!("{}\n", "-".repeat(100)));
    for summary in summaries {
        out.push_str(&format!(
            "{:<36}  {:<19}  {:>4}  {:<5}  {}\n",
            summary.id.as_str(),
            format_timestamp(&summary.updated_at),
            summary.message_count,
            summary.last_sender.map(|s| s.as_str()).unwrap_or("-"),
            summary.preview.as_deref().unwrap_or("")
        ));
    }
    out
}

fn format_timestamp(ts: &chrono::DateTime<chrono::Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatline_core::{timestamp, Sender};
    use chrono::TimeZone;

    fn at(secs: i64) -> chrono::DateTime<chrono::Utc> {
        chrono::Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_parse_send_as_agent() {
        let cli = Cli::try_parse_from([
            "chatline",
            "send",
            "--as",
            "agent",
            "--conversation",
            "abc",
            "On it.",
        ])
        .unwrap();
        match cli.command {
            Commands::Send {
                role,
                conversation,
                text,
            } => {
                assert_eq!(role, Role::Agent);
                assert_eq!(conversation.as_deref(), Some("abc"));
                assert_eq!(text, "On it.");
            }
            _ => panic!("expected send"),
        }
    }

    #[test]
    fn test_send_defaults_to_user() {
        let cli = Cli::try_parse_from(["chatline", "send", "hello"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Send {
                role: Role::User,
                conversation: None,
                ..
            }
        ));
        assert_eq!(cli.url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "chatline",
            "list",
            "--url",
            "http://example.test:9000",
            "--json",
        ])
        .unwrap();
        assert_eq!(cli.url, "http://example.test:9000");
        assert!(cli.json);
    }

    #[test]
    fn test_connection_flags_fill_client_config() {
        let cli = Cli::try_parse_from([
            "chatline",
            "watch",
            "abc",
            "--api-prefix",
            "/api/v2",
            "--refresh",
            "0",
            "--timeout",
            "3",
        ])
        .unwrap();
        let config = cli.client_config();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api_prefix, "/api/v2");
        assert_eq!(config.poll_interval, Duration::from_secs(1));
        assert_eq!(config.request_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_send_role_is_case_insensitive() {
        let cli = Cli::try_parse_from(["chatline", "send", "--as", "Agent", "-c", "abc", "hi"])
            .unwrap();
        assert!(matches!(cli.command, Commands::Send { role: Role::Agent, .. }));
    }

    #[test]
    fn test_describe_message() {
        let message = Message::new(Sender::Agent, "Hello!", at(0));
        assert_eq!(describe_message(&message), "[1970-01-01 00:00:00] agent  Hello!");
    }

    #[test]
    fn test_describe_summaries() {
        let summaries = vec![ConversationSummary {
            id: ConversationId::new("c1"),
            updated_at: timestamp::now(),
            message_count: 2,
            last_sender: Some(Sender::User),
            preview: Some("hi".into()),
        }];
        let out = describe_summaries(&summaries);
        assert!(out.starts_with("Conversations (1):"));
        assert!(out.lines().nth(3).unwrap().starts_with("c1"));
        assert!(out.contains("user "));
    }

    #[test]
    fn test_describe_conversation_lists_messages() {
        let mut conversation = Conversation::empty().with_id(ConversationId::new("c1"));
        conversation.append(Message::new(Sender::Agent, "Hello!", at(60)));
        let out = describe_conversation(&conversation);
        assert!(out.contains("ID:         c1"));
        assert!(out.contains("Messages:   1"));
        assert!(out.contains("agent  Hello!"));
    }
}
