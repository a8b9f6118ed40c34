use clap::{ Args, Parser, Subcommand };

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP relay in front of the Gemini API.
    Serve(ServeArgs),
    /// Chat with a running relay from the terminal.
    Chat(ChatArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    // --- Upstream Provider Args ---
    /// API key for the Gemini generative-language API
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Model used for generateContent calls
    #[arg(long, env = "GEMINI_MODEL", default_value = "gemini-1.5-flash")]
    pub model: String,

    /// Base URL of the generative-language API (without the /models suffix)
    #[arg(
        long,
        env = "GEMINI_BASE_URL",
        default_value = "https://generativelanguage.googleapis.com/v1beta"
    )]
    pub base_url: String,

    // --- Listener Args ---
    /// Interface the relay binds to.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port the relay listens on.
    #[arg(long, env = "PORT", default_value = "3000")]
    pub port: u16,

    /// Optional path to the TLS certificate file (PEM format). Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format). Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ChatArgs {
    /// Base URL of a running relay
    #[arg(long, env = "RELAY_URL", default_value = "http://localhost:3000")]
    pub relay_url: String,

    // --- History Store Args ---
    /// History store type (file, memory, redis)
    #[arg(long, env = "HISTORY_TYPE", default_value = "file")]
    pub history_type: String,

    /// JSON file backing the file history store.
    #[arg(long, env = "HISTORY_PATH", default_value = ".chat_history.json")]
    pub history_path: String,

    /// Redis endpoint for the redis history store (e.g., redis://127.0.0.1:6379)
    #[arg(long, env = "HISTORY_HOST", default_value = "redis://127.0.0.1:6379")]
    pub history_host: String,

    /// Storage key holding the serialized conversation.
    #[arg(long, env = "HISTORY_KEY", default_value = "chatHistory")]
    pub history_key: String,

    /// Send each line to /chat on its own instead of the full conversation.
    #[arg(long, default_value = "false")]
    pub single_turn: bool,
}
