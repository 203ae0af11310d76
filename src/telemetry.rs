//! Serial fault-report transmitter.
//!
//! Frame format, LSB first, one status byte per frame:
//!
//! ```text
//!        ┌ start ┬ d0 ┬ d1 ┬ … ┬ d7 ┬ stop ┐
//! high ──┤  low  │         data       │ high ├── high
//!        └───────┴────┴────┴───┴────┴───────┘
//! ```
//!
//! Every phase holds the line for exactly `ticks_per_bit` ticks, so the
//! bit rate is an integer divider of the tick clock with zero cumulative
//! error across the 10-bit frame.
//!
//! A frame launches on a rising edge of the fault flag while idle.
//! Edges arriving mid-frame never queue and never preempt: they set a
//! pending marker, and when the stop bit finishes the transmitter starts
//! a fresh frame only if the fault is still asserted — back to back,
//! sharing the stop/start boundary. A fault held high across a whole
//! frame without a new edge does not retrigger.

use crate::arbiter::ActuatorState;
use crate::error::FaultCode;

/// Transmitter phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TxPhase {
    /// Line high, waiting for a fault rising edge.
    Idle,
    /// Start bit (line low).
    Start,
    /// Data bit `n` of the latched status byte.
    Data(u8),
    /// Stop bit (line high).
    Stop,
}

/// Result of one transmitter tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxStep {
    /// Serial line level for this tick.
    pub line: bool,
    /// A frame was launched this tick.
    pub started: bool,
    /// A frame's stop bit finished this tick.
    pub completed: bool,
}

/// Fault-report transmitter state machine.
pub struct SerialTransmitter {
    phase: TxPhase,
    /// Ticks remaining in the current bit period (≥ 1 while not idle).
    remaining: u32,
    /// Status byte latched at frame start.
    shift: u8,
    ticks_per_bit: u32,
    /// Fault level observed on the previous tick (edge detector).
    last_fault: bool,
    /// A rising edge arrived while a frame was in flight.
    pending: bool,
}

impl SerialTransmitter {
    pub fn new(ticks_per_bit: u32) -> Self {
        Self {
            phase: TxPhase::Idle,
            remaining: 0,
            shift: 0,
            // A zero period degenerates to one tick per bit; validated
            // configs never pass zero.
            ticks_per_bit: ticks_per_bit.max(1),
            last_fault: false,
            pending: false,
        }
    }

    /// Advance one tick.
    ///
    /// `fault` is the arbiter's flag from the *previous* tick (the
    /// service holds it for one tick so the transmitter never races the
    /// arbitration happening on the same tick). `status` is latched
    /// whenever a frame launches.
    pub fn tick(&mut self, fault: bool, status: u8) -> TxStep {
        let rising = fault && !self.last_fault;
        self.last_fault = fault;

        let mut started = false;
        if self.phase == TxPhase::Idle {
            if rising {
                self.begin_frame(status);
                started = true;
            }
        } else if rising {
            self.pending = true;
        }

        let line = self.line_level();

        let mut completed = false;
        if self.phase != TxPhase::Idle {
            self.remaining -= 1;
            if self.remaining == 0 {
                completed = self.advance(fault, status, &mut started);
            }
        }

        TxStep {
            line,
            started,
            completed,
        }
    }

    /// True when no frame is in flight.
    pub fn is_idle(&self) -> bool {
        self.phase == TxPhase::Idle
    }

    /// Synchronous reset: abort any in-flight frame, line back to idle
    /// high, edge detector cleared.
    pub fn reset(&mut self) {
        self.phase = TxPhase::Idle;
        self.remaining = 0;
        self.shift = 0;
        self.last_fault = false;
        self.pending = false;
    }

    // ── Internal ──────────────────────────────────────────────────

    fn begin_frame(&mut self, status: u8) {
        self.shift = status;
        self.phase = TxPhase::Start;
        self.remaining = self.ticks_per_bit;
    }

    const fn line_level(&self) -> bool {
        match self.phase {
            TxPhase::Idle | TxPhase::Stop => true,
            TxPhase::Start => false,
            TxPhase::Data(n) => (self.shift >> n) & 1 != 0,
        }
    }

    /// Move to the next phase at a bit boundary. Returns `true` when a
    /// frame completed.
    fn advance(&mut self, fault: bool, status: u8, started: &mut bool) -> bool {
        match self.phase {
            TxPhase::Idle => false,
            TxPhase::Start => {
                self.phase = TxPhase::Data(0);
                self.remaining = self.ticks_per_bit;
                false
            }
            TxPhase::Data(n) if n < 7 => {
                self.phase = TxPhase::Data(n + 1);
                self.remaining = self.ticks_per_bit;
                false
            }
            TxPhase::Data(_) => {
                self.phase = TxPhase::Stop;
                self.remaining = self.ticks_per_bit;
                false
            }
            TxPhase::Stop => {
                if self.pending && fault {
                    // The mid-frame edge is honoured now that the line
                    // is free; the frames share this bit boundary.
                    self.pending = false;
                    self.begin_frame(status);
                    *started = true;
                } else {
                    self.pending = false;
                    self.phase = TxPhase::Idle;
                    self.remaining = 0;
                }
                true
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Status byte
// ───────────────────────────────────────────────────────────────

/// Build the status byte carried by a fault-report frame.
///
/// Bits 4:0 = {pump, heater, cooler, light, dehumidifier} as driven at
/// frame start, bit 5 = heater/cooler conflict cause, bit 6 =
/// all-extreme cause, bit 7 reserved (0).
pub const fn status_byte(state: ActuatorState, causes: u8) -> u8 {
    let mut b = 0;
    if state.pump {
        b |= 1 << 0;
    }
    if state.heater {
        b |= 1 << 1;
    }
    if state.cooler {
        b |= 1 << 2;
    }
    if state.light {
        b |= 1 << 3;
    }
    if state.dehumidifier {
        b |= 1 << 4;
    }
    if causes & FaultCode::ActuatorConflict.mask() != 0 {
        b |= 1 << 5;
    }
    if causes & FaultCode::SensorsExtreme.mask() != 0 {
        b |= 1 << 6;
    }
    b
}
