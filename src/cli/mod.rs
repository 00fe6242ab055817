use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// API key for the Gemini provider. Required; requests fail with a
    /// configuration error when absent or left as the placeholder value.
    #[arg(long, env = "GEMINI_API_KEY", default_value = "")]
    pub gemini_api_key: String,

    /// Port for the HTTP API server to listen on.
    #[arg(long, env = "PORT", default_value = "3000")]
    pub port: u16,

    /// Model name for chat completion.
    #[arg(long, env = "CHAT_MODEL", default_value = "gemini-pro")]
    pub chat_model: String,

    /// Base URL for the Gemini API. Override to point at a test double.
    #[arg(long, env = "CHAT_BASE_URL")]
    pub chat_base_url: Option<String>,

    /// Timeout in seconds for the upstream chat call. A hung provider call
    /// fails the request instead of blocking it indefinitely.
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value = "60")]
    pub upstream_timeout_secs: u64,

    /// Enable debug output; internal error details are echoed to clients.
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,
}
