mod app;
mod input;
mod terminal;
mod transport;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid websocket url `{0}`; expected ws:// or wss://")]
    InvalidUrl(String),
    #[error("connection task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Parser, Debug)]
#[command(name = "roomchat", about = "Terminal client for roomchat rooms")]
struct Cli {
    /// Relay websocket endpoint.
    #[arg(long, env = "ROOMCHAT_URL", default_value = "ws://127.0.0.1:3000/ws")]
    url: String,

    /// Pre-fill the login form's username.
    #[arg(long, env = "ROOMCHAT_USERNAME")]
    username: Option<String>,

    /// Pre-fill the login form's room.
    #[arg(long, env = "ROOMCHAT_ROOM")]
    room: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    // Logs go to stderr so they never interleave with the chat on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if !(cli.url.starts_with("ws://") || cli.url.starts_with("wss://")) {
        return Err(CliError::InvalidUrl(cli.url));
    }

    app::run(cli.url, cli.username, cli.room).await
}
