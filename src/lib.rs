//! Splits a multi-part Standard MIDI File into one rehearsal file per voice.
//! In each generated file one performance track is played at full volume
//! with a lead instrument while every other track is lowered to a background
//! volume.

pub mod assemble;
pub mod classify;
pub mod cmdline;
pub mod config;
pub mod convert;
pub mod error;
pub mod event;
pub mod inspect;
pub mod mutate;
pub mod naming;
pub mod output;
pub mod split;
#[cfg(test)]
pub mod test_helpers;

pub use config::SplitConfig;
pub use error::{Result, SplitError};
pub use split::{split_file, split_smf, SplitOutcome};
