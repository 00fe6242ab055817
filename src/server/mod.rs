pub mod api;

use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

use log::info;

use crate::llm::ChatClient;

pub struct Server {
    port: u16,
    chat_client: Arc<dyn ChatClient>,
}

impl Server {
    pub fn new(port: u16, chat_client: Arc<dyn ChatClient>) -> Self {
        Self { port, chat_client }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let addr = format!("0.0.0.0:{}", self.port).parse::<SocketAddr>()?;
        let state = api::AppState {
            chat_client: self.chat_client.clone(),
        };
        let app = api::router(state);

        info!("Starting HTTP API server on: http://{}", addr);
        info!("Health check: http://localhost:{}/health", self.port);
        info!("API Info: http://localhost:{}/api/info", self.port);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app.into_make_service()).await?;
        Ok(())
    }
}
