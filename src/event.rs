//! Construction and recognition of the two events that control how a voice
//! sounds: the program change (instrument) and control change #7 (volume).
//!
//! Status bytes are written channel-encoded, i.e. `0xB0 | channel` for a
//! volume change on `channel`. Recognition goes by message class only, so
//! files that put every voice's controllers on the base status still match.

use std::fmt;

use midly::{
    num::{u4, u7},
    MidiMessage, TrackEvent, TrackEventKind,
};

use crate::error::{Result, SplitError};

pub const PROGRAM_CHANGE_STATUS: u8 = 0xC0;
pub const CONTROL_CHANGE_STATUS: u8 = 0xB0;
pub const VOLUME_CONTROLLER: u8 = 0x07;

/// The controller classes the splitter rewrites.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerKind {
    Instrument,
    Volume,
}

impl ControllerKind {
    pub fn of(kind: &TrackEventKind) -> Option<ControllerKind> {
        match kind {
            TrackEventKind::Midi {
                message: MidiMessage::ProgramChange { .. },
                ..
            } => Some(ControllerKind::Instrument),
            TrackEventKind::Midi {
                message: MidiMessage::Controller { controller, .. },
                ..
            } if controller.as_int() == VOLUME_CONTROLLER => Some(ControllerKind::Volume),
            _ => None,
        }
    }

    pub fn matches(&self, kind: &TrackEventKind) -> bool {
        ControllerKind::of(kind) == Some(*self)
    }

    /// Status class without the channel nibble.
    pub fn status(&self) -> u8 {
        match self {
            ControllerKind::Instrument => PROGRAM_CHANGE_STATUS,
            ControllerKind::Volume => CONTROL_CHANGE_STATUS,
        }
    }
}

impl fmt::Display for ControllerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerKind::Instrument => f.write_str("program change"),
            ControllerKind::Volume => f.write_str("channel volume"),
        }
    }
}

fn encode(controller: ControllerKind, channel: u8, value: u8) -> Result<(u4, u7)> {
    match (u4::try_from(channel), u7::try_from(value)) {
        (Some(channel), Some(value)) => Ok((channel, value)),
        _ => Err(SplitError::EventEncoding {
            controller,
            channel,
            value,
        }),
    }
}

/// Program change selecting `instrument` on `channel`, at delta time 0.
pub fn instrument_event(channel: u8, instrument: u8) -> Result<TrackEvent<'static>> {
    let (channel, program) = encode(ControllerKind::Instrument, channel, instrument)?;
    Ok(TrackEvent {
        delta: 0.into(),
        kind: TrackEventKind::Midi {
            channel,
            message: MidiMessage::ProgramChange { program },
        },
    })
}

/// Channel volume change to `volume` on `channel`, at delta time 0.
pub fn volume_event(channel: u8, volume: u8) -> Result<TrackEvent<'static>> {
    let (channel, value) = encode(ControllerKind::Volume, channel, volume)?;
    Ok(TrackEvent {
        delta: 0.into(),
        kind: TrackEventKind::Midi {
            channel,
            message: MidiMessage::Controller {
                controller: VOLUME_CONTROLLER.into(),
                value,
            },
        },
    })
}
