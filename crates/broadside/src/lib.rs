//! # Broadside
//!
//! Authoritative two-player battleship server over WebSockets.
//!
//! Clients open a socket, receive a minted connection identity, and then
//! drive the whole match — room creation, joining, private ship
//! placement, alternating fire — through JSON events. The server is the
//! sole authority: every shot is validated and resolved here, and clients
//! only ever learn the outcomes.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use broadside::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), BroadsideError> {
//!     let server = BroadsideServer::builder()
//!         .bind("0.0.0.0:8080")
//!         .build()
//!         .await?;
//!     server.run().await
//! }
//! ```

mod error;
mod gateway;
mod handler;
mod server;

pub use error::BroadsideError;
pub use server::{BroadsideServer, BroadsideServerBuilder};

/// One-stop imports for server binaries and tests.
pub mod prelude {
    pub use crate::{BroadsideError, BroadsideServer, BroadsideServerBuilder};
    pub use broadside_engine::EngineConfig;
    pub use broadside_protocol::{
        Board, Cell, ClientEvent, ConnectionId, ErrorCode, PlayerSummary,
        RoomId, ServerEvent, ShipId,
    };
}
