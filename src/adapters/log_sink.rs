//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured controller events to
//! the process logger. Tests implement the same trait with a capture
//! buffer instead.

use log::info;

use crate::app::events::ControllerEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`ControllerEvent`].
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &ControllerEvent) {
        match event {
            ControllerEvent::Started => {
                info!("START | controller online");
            }
            ControllerEvent::ReadingQualified { channel, level } => {
                info!("SENSE | {:?} qualified to {:?}", channel, level);
            }
            ControllerEvent::FaultRaised { causes } => {
                info!("FAULT | raised, causes=0b{:08b}", causes);
            }
            ControllerEvent::FaultCleared => {
                info!("FAULT | all cleared");
            }
            ControllerEvent::OverrideEngaged => {
                info!("OVRD  | engaged — all actuators forced off");
            }
            ControllerEvent::OverrideReleased => {
                info!("OVRD  | released");
            }
            ControllerEvent::FrameStarted { status } => {
                info!("TX    | frame start, status=0x{:02X}", status);
            }
            ControllerEvent::FrameCompleted => {
                info!("TX    | frame complete");
            }
            ControllerEvent::Snapshot(s) => {
                info!(
                    "TELEM | t={} | profile={} | soil={:?} light={:?} humid={:?} temp={:?} | \
                     acts=0b{:08b} | causes=0b{:08b} | ovr={} | tx_busy={}",
                    s.tick,
                    s.profile,
                    s.filtered.soil,
                    s.filtered.light,
                    s.filtered.humidity,
                    s.filtered.temperature,
                    s.actuators.word_a(false),
                    s.fault_causes,
                    s.override_on,
                    s.tx_busy,
                );
            }
        }
    }
}
