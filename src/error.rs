//! Fault and error types.
//!
//! The control pipeline has no recoverable runtime errors: undefined
//! encodings clamp at decode and every tick produces fully defined
//! outputs. The domain fault mask is a first-class output, not an
//! error. What remains fallible is configuration validation at
//! construction time. All types are `Copy` so they pass through the
//! arbiter and service without allocation.

use core::fmt;

// ───────────────────────────────────────────────────────────────
// Fault causes
// ───────────────────────────────────────────────────────────────

/// Domain fault causes. Accumulated in a bitmask by the arbiter so
/// simultaneous causes can be tracked and individually cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FaultCode {
    /// The policy demanded heating and cooling on the same tick.
    ActuatorConflict = 0b0000_0001,
    /// Every filtered channel reads its most stressed ordinal (all Low).
    SensorsExtreme = 0b0000_0010,
}

impl FaultCode {
    /// Return the bitmask for this cause.
    pub const fn mask(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for FaultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ActuatorConflict => write!(f, "heater/cooler conflict"),
            Self::SensorsExtreme => write!(f, "all channels at extreme"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Configuration errors
// ───────────────────────────────────────────────────────────────

/// Errors from building a controller out of a [`SystemConfig`]
/// (crate::config::SystemConfig).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
