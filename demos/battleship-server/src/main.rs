//! Standalone battleship server.
//!
//! Binds a Broadside server on the address given as the first argument
//! (default `0.0.0.0:8080`) and runs until killed. Log verbosity follows
//! `RUST_LOG`; `info` if unset.

use broadside::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "0.0.0.0:8080".to_string());
    tracing::info!(%addr, "starting battleship server");

    let server = BroadsideServer::builder().bind(&addr).build().await?;
    server.run().await?;
    Ok(())
}
