//! Unified error type for the Broadside server.

use broadside_engine::EngineError;
use broadside_protocol::ProtocolError;
use broadside_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `broadside` meta-crate, you deal with this single
/// error type instead of importing errors from each sub-crate.
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum BroadsideError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// An engine-level error (room lifecycle, turn arbitration).
    #[error(transparent)]
    Engine(#[from] EngineError),
}
