//! The gateway: per-connection outbound queues.
//!
//! The engine computes *who* gets *what*; the gateway owns the only map
//! from connection identity to a live socket writer. Each connection
//! registers an unbounded sender at accept time; a writer task on the
//! other end drains the queue onto the wire. Delivery to a connection
//! that has already gone away is silently dropped — the disconnect
//! reconciliation that follows makes the state catch up.

use std::collections::HashMap;

use broadside_protocol::{ConnectionId, ServerEvent};
use tokio::sync::mpsc::UnboundedSender;

/// Routes engine output to per-connection writer queues.
#[derive(Debug, Default)]
pub(crate) struct Gateway {
    senders: HashMap<ConnectionId, UnboundedSender<ServerEvent>>,
}

impl Gateway {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Registers a connection's outbound queue.
    pub(crate) fn register(
        &mut self,
        conn_id: ConnectionId,
        sender: UnboundedSender<ServerEvent>,
    ) {
        tracing::debug!(%conn_id, "gateway registered connection");
        self.senders.insert(conn_id, sender);
    }

    /// Drops a connection's outbound queue. Idempotent.
    pub(crate) fn unregister(&mut self, conn_id: &ConnectionId) {
        if self.senders.remove(conn_id).is_some() {
            tracing::debug!(%conn_id, "gateway unregistered connection");
        }
    }

    /// Queues a batch of engine output, in order, skipping recipients
    /// that are no longer registered.
    pub(crate) fn deliver(
        &self,
        batch: Vec<(ConnectionId, ServerEvent)>,
    ) {
        for (to, event) in batch {
            let Some(sender) = self.senders.get(&to) else {
                tracing::debug!(conn_id = %to, "dropping event for unregistered connection");
                continue;
            };
            // A send error means the writer task already exited; the
            // disconnect path will clean the entry up.
            let _ = sender.send(event);
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.senders.len()
    }
}

// =========================================================================
// Tests
// =========================================================================
