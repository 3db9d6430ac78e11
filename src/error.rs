use std::{fmt, io, path::PathBuf};

use crate::event::ControllerKind;

pub type Result<T> = std::result::Result<T, SplitError>;

/// Everything that can go wrong while splitting one input file.
#[derive(Debug, thiserror::Error)]
pub enum SplitError {
    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to decode MIDI data: {0}")]
    Decode(#[from] midly::Error),

    #[error("Failed to encode MIDI file {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Can't encode {controller} event with channel {channel} and value {value}")]
    EventEncoding {
        controller: ControllerKind,
        channel: u8,
        value: u8,
    },

    #[error("Track {track} has no {controller} event to replace")]
    MissingController {
        track: usize,
        controller: ControllerKind,
    },

    #[error("Invalid track: {0}")]
    InvalidTrack(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{}", WriteFailureList(.0))]
    WriteFailures(Vec<WriteFailure>),

    #[error("Conversion of {} failed: {reason}", path.display())]
    Conversion { path: PathBuf, reason: String },
}

/// One output file that could not be written, kept so that sibling writes
/// can carry on and all failures get reported together.
#[derive(Debug)]
pub struct WriteFailure {
    pub track_index: usize,
    pub error: SplitError,
}

struct WriteFailureList<'a>(&'a [WriteFailure]);

impl fmt::Display for WriteFailureList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} output file(s) could not be written", self.0.len())?;
        for failure in self.0 {
            write!(f, "\n  track {}: {}", failure.track_index, failure.error)?;
        }
        Ok(())
    }
}
