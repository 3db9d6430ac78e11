use midly::{num::u4, TrackEvent, TrackEventKind};

/// What a track is for, as far as splitting is concerned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackKind {
    /// Only meta and system events, e.g. tempo and time signature.
    Header,
    /// A voice, addressed to the channel of its first channel-voice event.
    Performance { channel: u4 },
}

impl TrackKind {
    pub fn is_header(&self) -> bool {
        matches!(self, TrackKind::Header)
    }

    /// Channel of a performance track, 0 for a header track.
    pub fn channel(&self) -> u8 {
        match self {
            TrackKind::Header => 0,
            TrackKind::Performance { channel } => channel.as_int(),
        }
    }
}

/// Classifies a track by its first channel-voice event.
pub fn classify_track(track: &[TrackEvent]) -> TrackKind {
    track
        .iter()
        .find_map(|event| match event.kind {
            TrackEventKind::Midi { channel, .. } => Some(TrackKind::Performance { channel }),
            _ => None,
        })
        .unwrap_or(TrackKind::Header)
}
