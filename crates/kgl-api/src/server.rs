//! HTTP server bootstrap.

use crate::handlers::AppState;
use crate::routes::create_router;
use kgl_core::TripleStore;
use kgl_query::Evaluator;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tracing::info;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

pub struct KglServer {
    config: ServerConfig,
    state: AppState,
}

impl KglServer {
    pub fn new(config: ServerConfig, store: TripleStore) -> Self {
        let state = AppState {
            store: Arc::new(Mutex::new(store)),
            evaluator: Arc::new(Evaluator::default()),
        };
        KglServer { config, state }
    }

    pub fn address(&self) -> SocketAddr {
        format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .expect("invalid server address")
    }

    pub async fn serve(self) -> anyhow::Result<()> {
        let addr = self.address();
        let app = create_router(self.state);

        info!("starting KGL API server on {addr}");
        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;
        Ok(())
    }
}
