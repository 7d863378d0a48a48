//! Engine configuration.

use std::time::Duration;

/// Tunables for the engine's room housekeeping.
///
/// The original system let abandoned rooms live forever; a room whose
/// players wander off mid-placement now gets reclaimed by the periodic
/// idle sweep instead.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// How long a room may go without a successful mutating event before
    /// the sweep reclaims it.
    pub idle_timeout: Duration,

    /// How often the server runs the idle sweep.
    pub sweep_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(30 * 60),
            sweep_interval: Duration::from_secs(60),
        }
    }
}
