//! Port traits — the hexagonal boundary between the controller core and
//! the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ EnclosureService (domain)
//! ```
//!
//! Driven adapters (the host simulator, test mocks) implement these
//! traits. The [`EnclosureService`](super::service::EnclosureService)
//! consumes them via generics, so the core never touches hardware
//! directly and every tick is fully deterministic given the sampled
//! frame.

use crate::io::{InputFrame, OutputFrame};

// ───────────────────────────────────────────────────────────────
// Input port (driven adapter: enclosure → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain samples both input words plus the
/// heartbeat bit at the start of every tick.
pub trait InputPort {
    fn sample(&mut self) -> InputFrame;
}

// ───────────────────────────────────────────────────────────────
// Output port (driven adapter: domain → enclosure)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain drives both output words at the end of
/// every tick, including ticks where nothing changed.
pub trait OutputPort {
    fn apply(&mut self, frame: OutputFrame);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / capture)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured
/// [`ControllerEvent`](super::events::ControllerEvent)s through this
/// port. Adapters decide where they go — the log, a capture buffer in
/// tests.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::ControllerEvent);
}
