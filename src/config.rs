//! System configuration parameters.
//!
//! All tunable parameters for the enclosure controller. Defaults match
//! the 25 MHz reference tick rate; the simulator and tests override the
//! tick-count fields to keep runs short.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Core system configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Filtering ---
    /// Consecutive ticks a raw sensor code must persist before the
    /// filter accepts it.
    pub qualify_window_ticks: u32,

    // --- Telemetry transmitter ---
    /// Ticks per serial bit period. The bit rate is exact: no
    /// fractional accumulation across the frame.
    pub ticks_per_bit: u32,

    // --- Fault rules ---
    /// Enable the all-channels-extreme fault cause in addition to the
    /// always-on heater/cooler conflict rule.
    pub extreme_fault_enabled: bool,

    // --- Observability ---
    /// Emit a status snapshot event every N ticks (0 disables).
    pub snapshot_interval_ticks: u64,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Filtering: 4 ms of agreement at the 25 MHz reference tick.
            qualify_window_ticks: 100_000,

            // Telemetry: 9600 baud at 25 MHz.
            ticks_per_bit: 2604,

            // Fault rules
            extreme_fault_enabled: true,

            // Observability: 10 ms between snapshots at reference rate.
            snapshot_interval_ticks: 250_000,
        }
    }
}

impl SystemConfig {
    /// Range-check every field. Rejected configs never reach the
    /// pipeline; values are not silently clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.qualify_window_ticks == 0 {
            return Err(ConfigError::ValidationFailed(
                "qualify_window_ticks must be at least 1",
            ));
        }
        if self.ticks_per_bit == 0 {
            return Err(ConfigError::ValidationFailed(
                "ticks_per_bit must be at least 1",
            ));
        }
        Ok(())
    }
}
