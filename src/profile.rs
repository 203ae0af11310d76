//! Crop profiles and their static trigger tables.
//!
//! All per-crop variation lives here as data. The policy engine is one
//! generic function over a profile-indexed row; nothing downstream
//! branches on the profile itself.

use core::fmt;

use crate::io::Level;

// ───────────────────────────────────────────────────────────────
// LevelSet
// ───────────────────────────────────────────────────────────────

/// Set of [`Level`]s, one bit per ordinal.
///
/// A trigger set names every level at which an actuator is demanded, so
/// "at or below Mid", "at or above Mid" and "never" all fit one field
/// type without sentinels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct LevelSet(u8);

impl LevelSet {
    pub const EMPTY: Self = Self(0);

    pub const fn only(level: Level) -> Self {
        Self(1 << level.bits())
    }

    pub const fn at_or_below(level: Level) -> Self {
        Self((1 << (level.bits() + 1)) - 1)
    }

    pub const fn at_or_above(level: Level) -> Self {
        Self(0b111 & !((1 << level.bits()) - 1))
    }

    pub const fn contains(self, level: Level) -> bool {
        self.0 & (1 << level.bits()) != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

// ───────────────────────────────────────────────────────────────
// Crop profiles
// ───────────────────────────────────────────────────────────────

/// Selectable crop policy. Decoded fresh from control-word bits 2:1
/// every tick; switching profiles takes effect on the next evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CropProfile {
    Radish = 0,
    Basil = 1,
    PeaShoots = 2,
    Sunflower = 3,
}

impl CropProfile {
    pub const ALL: [Self; 4] = [Self::Radish, Self::Basil, Self::PeaShoots, Self::Sunflower];

    /// Decode the 2-bit selector. Total: every raw value maps to a
    /// defined profile.
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => Self::Radish,
            1 => Self::Basil,
            2 => Self::PeaShoots,
            _ => Self::Sunflower,
        }
    }

    pub const fn bits(self) -> u8 {
        self as u8
    }

    pub fn thresholds(self) -> &'static ProfileThresholds {
        &PROFILE_TABLE[self as usize]
    }

    /// Lenient name parse for CLI/env selection. Unknown names fall
    /// back to the Radish baseline.
    pub fn from_str_lossy(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "basil" => Self::Basil,
            "peashoots" | "pea-shoots" | "pea_shoots" => Self::PeaShoots,
            "sunflower" => Self::Sunflower,
            _ => Self::Radish,
        }
    }
}

impl fmt::Display for CropProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Radish => write!(f, "radish"),
            Self::Basil => write!(f, "basil"),
            Self::PeaShoots => write!(f, "peashoots"),
            Self::Sunflower => write!(f, "sunflower"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Trigger table
// ───────────────────────────────────────────────────────────────

/// Trigger sets for one crop. Each field names the filtered levels at
/// which that actuator is demanded.
#[derive(Debug, Clone, Copy)]
pub struct ProfileThresholds {
    /// Pump triggers on soil moisture.
    pub pump_on: LevelSet,
    /// Heater triggers on temperature.
    pub heat_on: LevelSet,
    /// Cooler triggers on temperature.
    pub cool_on: LevelSet,
    /// Grow light triggers on ambient light.
    pub light_on: LevelSet,
    /// Dehumidifier triggers on humidity.
    pub dehumidify_on: LevelSet,
}

/// Baseline shared by every crop: water dry soil, light a dark bench,
/// heat only when cold, never cool, dry the air only at the lowest
/// humidity code.
const BASELINE: ProfileThresholds = ProfileThresholds {
    pump_on: LevelSet::only(Level::Low),
    heat_on: LevelSet::only(Level::Low),
    cool_on: LevelSet::EMPTY,
    light_on: LevelSet::only(Level::Low),
    dehumidify_on: LevelSet::only(Level::Low),
};

/// Policy data for the four profiles, indexed by `CropProfile as usize`.
pub static PROFILE_TABLE: [ProfileThresholds; 4] = [
    // Radish: the baseline itself.
    BASELINE,
    // Basil wants warmth: heat at Mid as well as Low.
    ProfileThresholds {
        heat_on: LevelSet::at_or_below(Level::Mid),
        ..BASELINE
    },
    // Pea shoots dislike warmth: cool from Mid upward.
    ProfileThresholds {
        cool_on: LevelSet::at_or_above(Level::Mid),
        ..BASELINE
    },
    // Sunflower dislikes damp: dehumidify from Mid upward.
    ProfileThresholds {
        dehumidify_on: LevelSet::at_or_above(Level::Mid),
        ..BASELINE
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_set_constructors() {
        let low_only = LevelSet::only(Level::Low);
        assert!(low_only.contains(Level::Low));
        assert!(!low_only.contains(Level::Mid));
        assert!(!low_only.contains(Level::High));

        let up_to_mid = LevelSet::at_or_below(Level::Mid);
        assert!(up_to_mid.contains(Level::Low));
        assert!(up_to_mid.contains(Level::Mid));
        assert!(!up_to_mid.contains(Level::High));

        let from_mid = LevelSet::at_or_above(Level::Mid);
        assert!(!from_mid.contains(Level::Low));
        assert!(from_mid.contains(Level::Mid));
        assert!(from_mid.contains(Level::High));

        assert!(LevelSet::EMPTY.is_empty());
        assert!(!LevelSet::EMPTY.contains(Level::High));
    }

    #[test]
    fn profile_decode_is_total() {
        assert_eq!(CropProfile::from_bits(0), CropProfile::Radish);
        assert_eq!(CropProfile::from_bits(1), CropProfile::Basil);
        assert_eq!(CropProfile::from_bits(2), CropProfile::PeaShoots);
        assert_eq!(CropProfile::from_bits(3), CropProfile::Sunflower);
        // Out-of-range selectors reduce to the low two bits.
        assert_eq!(CropProfile::from_bits(0b101), CropProfile::Basil);
        assert_eq!(CropProfile::from_bits(0xFF), CropProfile::Sunflower);
    }

    #[test]
    fn pump_and_light_rows_identical_across_profiles() {
        for p in CropProfile::ALL {
            let t = p.thresholds();
            assert_eq!(t.pump_on, BASELINE.pump_on, "{p} pump row deviates");
            assert_eq!(t.light_on, BASELINE.light_on, "{p} light row deviates");
        }
    }

    #[test]
    fn table_rows_distinguish_crops() {
        // Basil heats at Mid, Radish does not.
        assert!(CropProfile::Basil.thresholds().heat_on.contains(Level::Mid));
        assert!(!CropProfile::Radish.thresholds().heat_on.contains(Level::Mid));

        // Only pea shoots ever cool.
        for p in CropProfile::ALL {
            let cools = !p.thresholds().cool_on.is_empty();
            assert_eq!(cools, p == CropProfile::PeaShoots, "{p} cool row");
        }
        assert!(CropProfile::PeaShoots.thresholds().cool_on.contains(Level::High));

        // Sunflower dehumidifies at High, the others only at Low.
        assert!(
            CropProfile::Sunflower
                .thresholds()
                .dehumidify_on
                .contains(Level::High)
        );
        assert!(
            !CropProfile::Radish
                .thresholds()
                .dehumidify_on
                .contains(Level::High)
        );
        assert!(
            CropProfile::Radish
                .thresholds()
                .dehumidify_on
                .contains(Level::Low)
        );
    }

    #[test]
    fn name_parse_round_trips() {
        for p in CropProfile::ALL {
            assert_eq!(CropProfile::from_str_lossy(&p.to_string()), p);
        }
        assert_eq!(CropProfile::from_str_lossy("unknown"), CropProfile::Radish);
    }
}
