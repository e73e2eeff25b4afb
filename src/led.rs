//! LED control-word encoding.
//!
//! The PowerMate's LED is configured by writing a single packed word to the
//! device; the firmware retains the last word written until the next write or
//! a device reset. Bit layout, from the kernel driver
//! (`drivers/input/misc/powermate.c`):
//!
//! | field            | range | bits    |
//! |------------------|-------|---------|
//! | `brightness`     | 0–255 | 0..=7   |
//! | `pulse_speed`    | 0–510 | 8..=16  |
//! | `pulse_table`    | 0–2   | 17..=18 |
//! | `pulse_on_sleep` | bool  | 19      |
//! | `pulse_on_wake`  | bool  | 20      |

/// Largest brightness the hardware distinguishes.
pub const MAX_BRIGHTNESS: u16 = 255;
/// Largest pulse speed the hardware distinguishes.
pub const MAX_PULSE_SPEED: u16 = 510;
/// Highest firmware pulse-waveform index.
pub const MAX_PULSE_TABLE: u8 = 2;

const PULSE_SPEED_SHIFT: u32 = 8;
const PULSE_TABLE_SHIFT: u32 = 17;
const PULSE_ASLEEP_SHIFT: u32 = 19;
const PULSE_AWAKE_SHIFT: u32 = 20;

/// One complete LED configuration.
///
/// Values outside the documented ranges are clamped when encoding rather than
/// rejected; past the top of each range the hardware stops responding
/// noticeably anyway.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LedConfig {
    /// LED brightness (0–255). Ignored by the firmware while pulsing.
    pub brightness: u16,
    /// LED pulse speed (0–510). 255 is roughly one cycle per second.
    pub pulse_speed: u16,
    /// Firmware pulse-waveform index (0–2).
    pub pulse_table: u8,
    /// Pulse while the host is suspended.
    pub pulse_on_sleep: bool,
    /// Pulse while the host is awake.
    pub pulse_on_wake: bool,
}

impl LedConfig {
    /// A steady (non-pulsing) LED at the given brightness.
    pub fn steady(brightness: u16) -> LedConfig {
        LedConfig {
            brightness,
            ..LedConfig::default()
        }
    }

    /// A pulsing LED at the given speed, pulsing through sleep and wake.
    pub fn pulse(speed: u16) -> LedConfig {
        LedConfig {
            brightness: 0,
            pulse_speed: speed,
            pulse_table: 0,
            pulse_on_sleep: true,
            pulse_on_wake: true,
        }
    }

    /// Packs the configuration into the control word, clamping each field
    /// into its valid range first so out-of-range inputs cannot pollute the
    /// higher bits.
    pub fn encode(&self) -> u32 {
        let brightness = u32::from(self.brightness.min(MAX_BRIGHTNESS));
        let speed = u32::from(self.pulse_speed.min(MAX_PULSE_SPEED));
        let table = u32::from(self.pulse_table.min(MAX_PULSE_TABLE));
        brightness
            | speed << PULSE_SPEED_SHIFT
            | table << PULSE_TABLE_SHIFT
            | u32::from(self.pulse_on_sleep) << PULSE_ASLEEP_SHIFT
            | u32::from(self.pulse_on_wake) << PULSE_AWAKE_SHIFT
    }

    /// Unpacks a control word produced by [`encode`](Self::encode).
    pub fn decode(word: u32) -> LedConfig {
        LedConfig {
            brightness: (word & 0xff) as u16,
            pulse_speed: (word >> PULSE_SPEED_SHIFT & 0x1ff) as u16,
            pulse_table: (word >> PULSE_TABLE_SHIFT & 0x3) as u8,
            pulse_on_sleep: word >> PULSE_ASLEEP_SHIFT & 1 != 0,
            pulse_on_wake: word >> PULSE_AWAKE_SHIFT & 1 != 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steady_brightness_lands_in_the_low_byte() {
        for brightness in [0u16, 1, 128, 254, 255] {
            let word = LedConfig::steady(brightness).encode();
            assert_eq!(word & 0xff, u32::from(brightness));
            assert_eq!(word >> 8, 0, "steady config must not set pulse bits");
        }
    }

    #[test]
    fn out_of_range_fields_clamp_instead_of_polluting_high_bits() {
        for brightness in [256u16, 1000, u16::MAX] {
            let word = LedConfig::steady(brightness).encode();
            assert_eq!(word, u32::from(MAX_BRIGHTNESS));
        }

        let cfg = LedConfig {
            brightness: 999,
            pulse_speed: 9999,
            pulse_table: 200,
            pulse_on_sleep: true,
            pulse_on_wake: true,
        };
        assert_eq!(
            LedConfig::decode(cfg.encode()),
            LedConfig {
                brightness: MAX_BRIGHTNESS,
                pulse_speed: MAX_PULSE_SPEED,
                pulse_table: MAX_PULSE_TABLE,
                pulse_on_sleep: true,
                pulse_on_wake: true,
            }
        );
    }

    #[test]
    fn encode_decode_round_trips_all_in_range_tuples() {
        for brightness in [0u16, 1, 127, 255] {
            for pulse_speed in [0u16, 1, 254, 255, 509, 510] {
                for pulse_table in 0..=MAX_PULSE_TABLE {
                    for flags in 0..4u8 {
                        let cfg = LedConfig {
                            brightness,
                            pulse_speed,
                            pulse_table,
                            pulse_on_sleep: flags & 1 != 0,
                            pulse_on_wake: flags & 2 != 0,
                        };
                        assert_eq!(LedConfig::decode(cfg.encode()), cfg);
                    }
                }
            }
        }
    }

    #[test]
    fn pulse_sets_both_pulse_flags_and_no_brightness() {
        let decoded = LedConfig::decode(LedConfig::pulse(255).encode());
        assert_eq!(
            decoded,
            LedConfig {
                brightness: 0,
                pulse_speed: 255,
                pulse_table: 0,
                pulse_on_sleep: true,
                pulse_on_wake: true,
            }
        );
    }

    #[test]
    fn field_offsets_match_the_firmware_layout() {
        let cfg = LedConfig {
            brightness: 0xab,
            pulse_speed: 0x1c3,
            pulse_table: 2,
            pulse_on_sleep: true,
            pulse_on_wake: false,
        };
        assert_eq!(cfg.encode(), 0xab | 0x1c3 << 8 | 2 << 17 | 1 << 19);
    }
}
