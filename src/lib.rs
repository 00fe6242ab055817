pub mod cli;
pub mod client;
pub mod error;
pub mod llm;
pub mod models;
pub mod server;
pub mod store;

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use cli::Args;
use llm::gemini::GeminiChatClient;
use log::info;
use server::Server;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    error::set_debug_mode(args.debug);

    info!("--- Core Configuration ---");
    info!("Listen Port: {}", args.port);
    info!("Chat Model: {}", args.chat_model);
    info!("Upstream Timeout: {}s", args.upstream_timeout_secs);
    info!("Debug Mode: {}", args.debug);
    info!("-------------------------");

    let chat_client = GeminiChatClient::new(
        args.gemini_api_key.clone(),
        Some(args.chat_model.clone()),
        args.chat_base_url.clone(),
        Duration::from_secs(args.upstream_timeout_secs),
    )?;

    let server = Server::new(args.port, Arc::new(chat_client));
    server.run().await?;

    Ok(())
}
