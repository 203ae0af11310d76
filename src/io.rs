//! Packed I/O word codecs.
//!
//! The enclosure exchanges two bytes in and two bytes out per tick:
//!
//! ```text
//!  Input word A              Input word B
//! ┌────┬────┬────┬────┐     ┌───────┬─────────┬────┐
//! │soil│lght│humi│temp│     │ rsvd  │ profile │ovr │
//! │7:6 │5:4 │3:2 │1:0 │     │  7:3  │   2:1   │ 0  │
//! └────┴────┴────┴────┘     └───────┴─────────┴────┘
//!
//!  Output word A                          Output word B
//! ┌───┬────┬────┬────┬────┬────┬────┬───┐ ┌────┬──────┐
//! │ - │dehu│hbt │flt │lite│cool│heat│pmp│ │ser │ rsvd │
//! │ 7 │ 6  │ 5  │ 4  │ 3  │ 2  │ 1  │ 0 │ │ 7  │ 6:0  │
//! └───┴────┴────┴────┴────┴────┴────┴───┘ └────┴──────┘
//! ```
//!
//! Every 2-bit sensor field is an ordinal level; the reserved encoding 3
//! clamps to [`Level::High`] at decode so the rest of the pipeline only
//! ever sees defined values.

// ───────────────────────────────────────────────────────────────
// Levels and channels
// ───────────────────────────────────────────────────────────────

/// Quantized reading of one sensor channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Level {
    Low = 0,
    Mid = 1,
    High = 2,
}

impl Level {
    /// Decode a 2-bit field. The reserved code 3 clamps to `High`.
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => Self::Low,
            1 => Self::Mid,
            _ => Self::High,
        }
    }

    pub const fn bits(self) -> u8 {
        self as u8
    }
}

/// The four sensor channels, in word A packing order (high to low).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Soil,
    Light,
    Humidity,
    Temperature,
}

impl Channel {
    pub const ALL: [Self; 4] = [Self::Soil, Self::Light, Self::Humidity, Self::Temperature];

    /// Bit offset of this channel's 2-bit field within input word A.
    const fn shift(self) -> u8 {
        match self {
            Self::Soil => 6,
            Self::Light => 4,
            Self::Humidity => 2,
            Self::Temperature => 0,
        }
    }
}

/// One full set of channel levels — either the raw per-tick decode of
/// input word A or the filter's qualified output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reading {
    pub soil: Level,
    pub light: Level,
    pub humidity: Level,
    pub temperature: Level,
}

impl Reading {
    /// All four channels at the same level.
    pub const fn uniform(level: Level) -> Self {
        Self {
            soil: level,
            light: level,
            humidity: level,
            temperature: level,
        }
    }

    pub const fn get(self, channel: Channel) -> Level {
        match channel {
            Channel::Soil => self.soil,
            Channel::Light => self.light,
            Channel::Humidity => self.humidity,
            Channel::Temperature => self.temperature,
        }
    }

    pub fn set(&mut self, channel: Channel, level: Level) {
        match channel {
            Channel::Soil => self.soil = level,
            Channel::Light => self.light = level,
            Channel::Humidity => self.humidity = level,
            Channel::Temperature => self.temperature = level,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Input words
// ───────────────────────────────────────────────────────────────

/// Input word A: four packed 2-bit sensor codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(transparent)]
pub struct SensorWord(pub u8);

impl SensorWord {
    pub const fn pack(reading: Reading) -> Self {
        Self(
            reading.soil.bits() << Channel::Soil.shift()
                | reading.light.bits() << Channel::Light.shift()
                | reading.humidity.bits() << Channel::Humidity.shift()
                | reading.temperature.bits() << Channel::Temperature.shift(),
        )
    }

    pub const fn decode(self) -> Reading {
        Reading {
            soil: Level::from_bits(self.0 >> Channel::Soil.shift()),
            light: Level::from_bits(self.0 >> Channel::Light.shift()),
            humidity: Level::from_bits(self.0 >> Channel::Humidity.shift()),
            temperature: Level::from_bits(self.0 >> Channel::Temperature.shift()),
        }
    }
}

/// Input word B: override flag and profile selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(transparent)]
pub struct ControlWord(pub u8);

impl ControlWord {
    const OVERRIDE_MASK: u8 = 0b0000_0001;
    const PROFILE_SHIFT: u8 = 1;
    const PROFILE_MASK: u8 = 0b11;

    /// Build a control word from a 2-bit profile selector and the
    /// override flag. Reserved upper bits stay zero.
    pub const fn compose(profile_bits: u8, override_on: bool) -> Self {
        let ovr = if override_on { Self::OVERRIDE_MASK } else { 0 };
        Self((profile_bits & Self::PROFILE_MASK) << Self::PROFILE_SHIFT | ovr)
    }

    pub const fn override_flag(self) -> bool {
        self.0 & Self::OVERRIDE_MASK != 0
    }

    /// Profile selector bits 2:1, already masked to the defined range.
    pub const fn profile_bits(self) -> u8 {
        (self.0 >> Self::PROFILE_SHIFT) & Self::PROFILE_MASK
    }
}

/// Everything the controller samples at the start of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputFrame {
    pub sensors: SensorWord,
    pub control: ControlWord,
    /// Free-running collaborator bit, forwarded untouched to output word A.
    pub heartbeat: bool,
}

// ───────────────────────────────────────────────────────────────
// Output frame
// ───────────────────────────────────────────────────────────────

/// Both output words for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputFrame {
    pub word_a: u8,
    pub word_b: u8,
}

impl OutputFrame {
    pub const PUMP: u8 = 1 << 0;
    pub const HEATER: u8 = 1 << 1;
    pub const COOLER: u8 = 1 << 2;
    pub const GROW_LIGHT: u8 = 1 << 3;
    pub const FAULT: u8 = 1 << 4;
    pub const HEARTBEAT: u8 = 1 << 5;
    pub const DEHUMIDIFIER: u8 = 1 << 6;
    /// Serial telemetry line, output word B. Idle high.
    pub const SERIAL_LINE: u8 = 1 << 7;

    pub const fn new(word_a: u8, serial_high: bool) -> Self {
        Self {
            word_a,
            word_b: if serial_high { Self::SERIAL_LINE } else { 0 },
        }
    }

    pub const fn pump(self) -> bool {
        self.word_a & Self::PUMP != 0
    }

    pub const fn heater(self) -> bool {
        self.word_a & Self::HEATER != 0
    }

    pub const fn cooler(self) -> bool {
        self.word_a & Self::COOLER != 0
    }

    pub const fn grow_light(self) -> bool {
        self.word_a & Self::GROW_LIGHT != 0
    }

    pub const fn fault(self) -> bool {
        self.word_a & Self::FAULT != 0
    }

    pub const fn heartbeat(self) -> bool {
        self.word_a & Self::HEARTBEAT != 0
    }

    pub const fn dehumidifier(self) -> bool {
        self.word_a & Self::DEHUMIDIFIER != 0
    }

    pub const fn serial_high(self) -> bool {
        self.word_b & Self::SERIAL_LINE != 0
    }
}

impl Default for OutputFrame {
    /// Reset value: everything off, serial line idle high.
    fn default() -> Self {
        Self::new(0, true)
    }
}
