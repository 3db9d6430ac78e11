use midly::{MidiMessage, TrackEvent, TrackEventKind};

use crate::event::ControllerKind;

/// Where and how a track sets its channel volume.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VolumeReport {
    /// Value of the last volume change, i.e. the one that wins on playback.
    pub last_volume: Option<u8>,
    pub count: usize,
    pub positions: Vec<usize>,
}

pub fn volume_report(track: &[TrackEvent]) -> VolumeReport {
    let mut report = VolumeReport::default();
    for (position, event) in track.iter().enumerate() {
        if let TrackEventKind::Midi {
            message: MidiMessage::Controller { value, .. },
            ..
        } = event.kind
        {
            if ControllerKind::Volume.matches(&event.kind) {
                report.count += 1;
                report.positions.push(position);
                report.last_volume = Some(value.as_int());
            }
        }
    }
    report
}

/// Program of the first program change in the track.
pub fn instrument_of(track: &[TrackEvent]) -> Option<u8> {
    track.iter().find_map(|event| match event.kind {
        TrackEventKind::Midi {
            message: MidiMessage::ProgramChange { program },
            ..
        } => Some(program.as_int()),
        _ => None,
    })
}

/// Absolute tick of every event.
pub fn absolute_times(track: &[TrackEvent]) -> Vec<u64> {
    track
        .iter()
        .scan(0u64, |time, event| {
            *time += u64::from(event.delta.as_int());
            Some(*time)
        })
        .collect()
}
