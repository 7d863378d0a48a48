//! `BroadsideServer` builder and server loop.
//!
//! This is the entry point for running a Broadside server. It ties
//! together all the layers: transport → protocol → engine.

use std::sync::Arc;

use broadside_engine::{Engine, EngineConfig};
use broadside_protocol::{Codec, JsonCodec};
use broadside_transport::{Transport, WebSocketTransport};
use tokio::sync::Mutex;

use crate::gateway::Gateway;
use crate::handler::handle_connection;
use crate::BroadsideError;

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks.
/// Interior mutability via `Mutex` where needed. The engine sits behind
/// one lock: every event commits atomically, and its delivery list is
/// handed to the gateway only after the lock is released.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) engine: Mutex<Engine>,
    pub(crate) gateway: Mutex<Gateway>,
    pub(crate) codec: C,
}

/// Builder for configuring and starting a Broadside server.
///
/// # Example
///
/// ```rust,ignore
/// use broadside::prelude::*;
///
/// let server = BroadsideServer::builder()
///     .bind("0.0.0.0:8080")
///     .build()
///     .await?;
/// server.run().await
/// ```
pub struct BroadsideServerBuilder {
    bind_addr: String,
    engine_config: EngineConfig,
}

impl BroadsideServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            engine_config: EngineConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the engine configuration.
    pub fn engine_config(mut self, config: EngineConfig) -> Self {
        self.engine_config = config;
        self
    }

    /// Builds and starts the server.
    ///
    /// Uses `JsonCodec` and `WebSocketTransport`.
    pub async fn build(
        self,
    ) -> Result<BroadsideServer<JsonCodec>, BroadsideError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let state = Arc::new(ServerState {
            engine: Mutex::new(Engine::new(self.engine_config.clone())),
            gateway: Mutex::new(Gateway::new()),
            codec: JsonCodec,
        });

        Ok(BroadsideServer {
            transport,
            state,
            engine_config: self.engine_config,
        })
    }
}

impl Default for BroadsideServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Broadside server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct BroadsideServer<C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<C>>,
    engine_config: EngineConfig,
}

impl BroadsideServer<JsonCodec> {
    /// Creates a new builder.
    pub fn builder() -> BroadsideServerBuilder {
        BroadsideServerBuilder::new()
    }
}

impl<C> BroadsideServer<C>
where
    C: Codec + Send + Sync + 'static,
{
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> Result<std::net::SocketAddr, BroadsideError> {
        self.transport.local_addr().map_err(BroadsideError::from)
    }

    /// Runs the server accept loop.
    ///
    /// Spawns the idle-room sweep, then accepts incoming connections and
    /// spawns a handler task for each. Runs until the process is
    /// terminated.
    pub async fn run(mut self) -> Result<(), BroadsideError> {
        tracing::info!("Broadside server running");

        let sweep_state = Arc::clone(&self.state);
        let sweep_interval = self.engine_config.sweep_interval;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(sweep_interval);
            ticker.tick().await; // the first tick fires immediately
            loop {
                ticker.tick().await;
                let mut engine = sweep_state.engine.lock().await;
                let expired = engine.expire_idle();
                if !expired.is_empty() {
                    let gateway = sweep_state.gateway.lock().await;
                    drop(engine);
                    gateway.deliver(expired);
                }
            }
        });

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) =
                            handle_connection(conn, state).await
                        {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
