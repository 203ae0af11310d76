//! Outbound controller events.
//!
//! The [`EnclosureService`](super::service::EnclosureService) emits
//! these through the [`EventSink`](super::ports::EventSink) port.
//! Adapters on the other side decide what to do with them — write a log
//! line, collect them for a test assertion.

use crate::arbiter::ActuatorState;
use crate::io::{Channel, Level, Reading};
use crate::profile::CropProfile;

/// Structured events emitted by the controller core.
#[derive(Debug, Clone)]
pub enum ControllerEvent {
    /// The controller started (or came back out of reset).
    Started,

    /// A channel's filtered value qualified to a new level.
    ReadingQualified { channel: Channel, level: Level },

    /// The fault flag asserted; carries the cause bitmask.
    FaultRaised { causes: u8 },

    /// Every fault cause has resolved.
    FaultCleared,

    /// The operator override engaged.
    OverrideEngaged,

    /// The operator override released.
    OverrideReleased,

    /// A serial fault report began transmitting.
    FrameStarted { status: u8 },

    /// A serial fault report finished its stop bit.
    FrameCompleted,

    /// Periodic status snapshot.
    Snapshot(StatusSnapshot),
}

/// A point-in-time view of the whole pipeline, suitable for logging.
#[derive(Debug, Clone, Copy)]
pub struct StatusSnapshot {
    pub tick: u64,
    pub profile: CropProfile,
    pub filtered: Reading,
    pub actuators: ActuatorState,
    pub fault_causes: u8,
    pub override_on: bool,
    pub tx_busy: bool,
}
