//! Builders for short in-memory tracks and files. They keep tests readable
//! by hiding the `midly` enum nesting.

use midly::{
    num::u28, Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent,
    TrackEventKind,
};

fn midi(channel: u8, message: MidiMessage) -> TrackEvent<'static> {
    TrackEvent {
        delta: 0.into(),
        kind: TrackEventKind::Midi {
            channel: channel.into(),
            message,
        },
    }
}

fn meta(message: MetaMessage<'static>) -> TrackEvent<'static> {
    TrackEvent {
        delta: 0.into(),
        kind: TrackEventKind::Meta(message),
    }
}

/// Moves an event to the given delta time.
pub fn at(delta: u32, event: TrackEvent) -> TrackEvent {
    TrackEvent {
        delta: u28::from(delta),
        ..event
    }
}

pub fn cc(channel: u8, controller: u8, value: u8) -> TrackEvent<'static> {
    midi(
        channel,
        MidiMessage::Controller {
            controller: controller.into(),
            value: value.into(),
        },
    )
}

pub fn program(channel: u8, program: u8) -> TrackEvent<'static> {
    midi(
        channel,
        MidiMessage::ProgramChange {
            program: program.into(),
        },
    )
}

pub fn note_on(channel: u8, key: u8) -> TrackEvent<'static> {
    midi(
        channel,
        MidiMessage::NoteOn {
            key: key.into(),
            vel: 100.into(),
        },
    )
}

pub fn note_off(channel: u8, key: u8) -> TrackEvent<'static> {
    midi(
        channel,
        MidiMessage::NoteOff {
            key: key.into(),
            vel: 0.into(),
        },
    )
}

pub fn meta_name(name: &'static str) -> TrackEvent<'static> {
    meta(MetaMessage::TrackName(name.as_bytes()))
}

pub fn tempo() -> TrackEvent<'static> {
    meta(MetaMessage::Tempo(500_000.into()))
}

pub fn end() -> TrackEvent<'static> {
    meta(MetaMessage::EndOfTrack)
}

/// Tempo track without any channel events.
pub fn header_track() -> Track<'static> {
    vec![tempo(), meta(MetaMessage::TimeSignature(4, 2, 24, 8)), end()]
}

/// A voice on `channel` with a program change, two volume changes and a
/// few notes. `name` of `None` leaves out the track name.
pub fn voice_track(name: Option<&'static str>, channel: u8, instrument: u8) -> Track<'static> {
    let mut track = Vec::new();
    if let Some(name) = name {
        track.push(meta_name(name));
    }
    track.extend([
        program(channel, instrument),
        cc(channel, 7, 100),
        note_on(channel, 60),
        at(480, note_off(channel, 60)),
        cc(channel, 7, 90),
        note_on(channel, 64),
        at(480, note_off(channel, 64)),
        end(),
    ]);
    track
}

pub fn smf(tracks: Vec<Track<'static>>) -> Smf<'static> {
    Smf {
        header: Header::new(Format::Parallel, Timing::Metrical(480.into())),
        tracks,
    }
}

/// Tempo track plus "Tenor" on channel 0 and "Bass" on channel 1.
pub fn tenor_bass() -> Smf<'static> {
    smf(vec![
        header_track(),
        voice_track(Some("Tenor"), 0, 52),
        voice_track(Some("Bass"), 1, 53),
    ])
}
