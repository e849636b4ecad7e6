//! KGL API server entry point.

use kgl_api::{KglServer, ServerConfig};
use kgl_core::{StoreConfig, TripleStore, DEFAULT_NAMESPACE};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let graph_path = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: kgl-api <graph.csv>"))?;

    let mut store = TripleStore::new(StoreConfig {
        substring_search: true,
        similarity_index: false,
        ..StoreConfig::default()
    });
    let file = std::fs::File::open(&graph_path)?;
    kgl_io::ingest_csv(file, kgl_io::CSV_DELIMITER, &mut store, DEFAULT_NAMESPACE)?;

    KglServer::new(ServerConfig::default(), store).serve().await
}
