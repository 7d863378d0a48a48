//! Per-connection handler: greeting, event routing, and teardown.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Register an outbound queue with the gateway, spawn the writer
//!   2. Send `connected` with the minted identity
//!   3. Loop: decode client events → run through the engine → deliver
//!   4. On close or error: reconcile the disconnect through the engine

use std::sync::Arc;

use broadside_protocol::{
    ClientEvent, Codec, ConnectionId, ErrorCode, ServerEvent,
};
use broadside_transport::{Connection, WebSocketConnection};
use tokio::sync::mpsc;

use crate::server::ServerState;
use crate::BroadsideError;

/// Drop guard that reconciles the connection's disconnect when the
/// handler exits.
///
/// This ensures cleanup happens even if the handler panics. Since `Drop`
/// is synchronous, we spawn a fire-and-forget task for the async locks.
struct DisconnectGuard<C: Codec + Send + Sync + 'static> {
    conn_id: ConnectionId,
    state: Arc<ServerState<C>>,
}

impl<C: Codec + Send + Sync + 'static> Drop for DisconnectGuard<C> {
    fn drop(&mut self) {
        let conn_id = self.conn_id.clone();
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let mut engine = state.engine.lock().await;
            let out = engine.disconnect(&conn_id);
            let mut gateway = state.gateway.lock().await;
            drop(engine);
            gateway.deliver(out);
            gateway.unregister(&conn_id);
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C>(
    conn: WebSocketConnection,
    state: Arc<ServerState<C>>,
) -> Result<(), BroadsideError>
where
    C: Codec + Send + Sync + 'static,
{
    let conn_id = conn.id().clone();
    tracing::debug!(%conn_id, "handling new connection");

    // --- Step 1: outbound queue + writer task ---
    let (tx, rx) = mpsc::unbounded_channel::<ServerEvent>();
    state
        .gateway
        .lock()
        .await
        .register(conn_id.clone(), tx.clone());

    // Register the guard only once the gateway entry exists, so every
    // exit path unwinds it.
    let _guard = DisconnectGuard {
        conn_id: conn_id.clone(),
        state: Arc::clone(&state),
    };

    spawn_writer(conn.clone(), rx, Arc::clone(&state), conn_id.clone());

    // --- Step 2: greet with the minted identity ---
    let _ = tx.send(ServerEvent::Connected {
        id: conn_id.clone(),
    });

    // --- Step 3: event loop ---
    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::info!(%conn_id, "connection closed cleanly");
                break;
            }
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                break;
            }
        };

        let event: ClientEvent = match state.codec.decode(&data) {
            Ok(event) => event,
            Err(e) => {
                tracing::debug!(
                    %conn_id, error = %e, "failed to decode client event"
                );
                let _ = tx.send(ServerEvent::ErrorMessage {
                    code: ErrorCode::BadRequest,
                    message: format!("invalid message: {e}"),
                });
                continue;
            }
        };

        // Take the gateway lock before releasing the engine lock, so
        // concurrent handlers enqueue their batches in engine commit
        // order. The socket write itself still happens elsewhere (the
        // writer task), so neither lock spans network I/O.
        let mut engine = state.engine.lock().await;
        let out = engine.handle_event(&conn_id, event);
        let gateway = state.gateway.lock().await;
        drop(engine);
        gateway.deliver(out);
    }

    let _ = conn.close().await;
    // _guard drops here → disconnect reconciliation fires.
    Ok(())
}

/// Spawns the writer task: drains the outbound queue onto the socket.
///
/// Exits when every sender is gone (the gateway unregistered the
/// connection) or the socket rejects a write.
fn spawn_writer<C>(
    conn: WebSocketConnection,
    mut rx: mpsc::UnboundedReceiver<ServerEvent>,
    state: Arc<ServerState<C>>,
    conn_id: ConnectionId,
) where
    C: Codec + Send + Sync + 'static,
{
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let bytes = match state.codec.encode(&event) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::error!(
                        %conn_id, error = %e, "failed to encode outbound event"
                    );
                    continue;
                }
            };
            if let Err(e) = conn.send(&bytes).await {
                tracing::debug!(%conn_id, error = %e, "writer stopping");
                break;
            }
        }
    });
}
