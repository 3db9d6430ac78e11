use std::path::PathBuf;

use crate::error::{Result, SplitError};

/// Volume the emphasized track is raised to. Some source files ship
/// non-100 default volumes, so the emphasized track is always rewritten.
pub const EMPHASIZED_VOLUME: u8 = 100;
pub const DEFAULT_DE_EMPHASIZED_VOLUME: u8 = 40;
/// General MIDI 65 is the alto sax.
pub const DEFAULT_EMPHASIZED_INSTRUMENT: u8 = 65;
pub const TIMING_DIVISION: u16 = 960;
pub const DEFAULT_MIDI_OUTPUT_DIR: &str = "output";
pub const DEFAULT_MP3_OUTPUT_DIR: &str = "output/mp3s";

/// Settings for one split run. Passed explicitly into the engine instead of
/// living in module-level state so that runs can't leak into each other.
#[derive(Clone, Debug, PartialEq)]
pub struct SplitConfig {
    pub de_emphasized_volume: u8,
    pub emphasized_volume: u8,
    pub emphasized_instrument: u8,
    /// Ticks per quarter note of every generated file.
    pub timing_division: u16,
    pub midi_output_dir: PathBuf,
    pub mp3_output_dir: PathBuf,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            de_emphasized_volume: DEFAULT_DE_EMPHASIZED_VOLUME,
            emphasized_volume: EMPHASIZED_VOLUME,
            emphasized_instrument: DEFAULT_EMPHASIZED_INSTRUMENT,
            timing_division: TIMING_DIVISION,
            midi_output_dir: PathBuf::from(DEFAULT_MIDI_OUTPUT_DIR),
            mp3_output_dir: PathBuf::from(DEFAULT_MP3_OUTPUT_DIR),
        }
    }
}

impl SplitConfig {
    /// The event factory doesn't clamp, so out-of-range values are rejected
    /// here before any track gets touched.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("de-emphasized volume", self.de_emphasized_volume),
            ("emphasized volume", self.emphasized_volume),
            ("emphasized instrument", self.emphasized_instrument),
        ] {
            if value > 127 {
                return Err(SplitError::InvalidConfig(format!(
                    "{name} must be in 0..=127, got {value}"
                )));
            }
        }
        if self.timing_division == 0 || self.timing_division > 0x7fff {
            return Err(SplitError::InvalidConfig(format!(
                "timing division must be in 1..=32767, got {}",
                self.timing_division
            )));
        }
        Ok(())
    }
}
