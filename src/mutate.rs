use midly::{num::u28, MetaMessage, Track, TrackEvent, TrackEventKind};

use crate::{
    error::{Result, SplitError},
    event::ControllerKind,
};

/// Position of the first event of the given controller class.
pub fn find_controller(track: &[TrackEvent], controller: ControllerKind) -> Option<usize> {
    track
        .iter()
        .position(|event| controller.matches(&event.kind))
}

const MAX_DELTA: u32 = (1 << 28) - 1;

fn add_deltas(a: u28, b: u28) -> u28 {
    u28::from(a.as_int().saturating_add(b.as_int()).min(MAX_DELTA))
}

/// Returns a copy of `track` in which the event at `position` is replaced by
/// `replacement` and every other event of the same controller class is
/// dropped, so that no later duplicate can override the new value.
///
/// Timing is preserved: the replacement takes over the delta time of the
/// event it overwrites, and the delta of each dropped event is carried over
/// to the next event that stays.
pub fn replace_controlling_event<'a>(
    track: &[TrackEvent<'a>],
    position: usize,
    replacement: TrackEvent<'a>,
) -> Result<Track<'a>> {
    let controller = ControllerKind::of(&replacement.kind).ok_or_else(|| {
        SplitError::InvalidTrack(format!(
            "replacement {:?} is not an instrument or volume event",
            replacement.kind
        ))
    })?;
    let replaced = track.get(position).ok_or_else(|| {
        SplitError::InvalidTrack(format!(
            "position {position} is out of range for a track of {} events",
            track.len()
        ))
    })?;

    let mut events = track.to_vec();
    events[position] = TrackEvent {
        delta: replaced.delta,
        kind: replacement.kind,
    };

    let mut kept = Vec::with_capacity(events.len());
    let mut carried = u28::from(0);
    for (index, event) in events.into_iter().enumerate() {
        if index != position && controller.matches(&event.kind) {
            carried = add_deltas(carried, event.delta);
            continue;
        }
        kept.push(TrackEvent {
            delta: add_deltas(carried, event.delta),
            kind: event.kind,
        });
        carried = u28::from(0);
    }
    // dropped events at the very end of an unterminated track still move
    // the end of the track
    if carried.as_int() > 0 && !ends_with_end_of_track(&kept) {
        kept.push(end_of_track(carried));
    }

    rebuild_track(kept)
}

fn is_end_of_track(event: &TrackEvent) -> bool {
    matches!(event.kind, TrackEventKind::Meta(MetaMessage::EndOfTrack))
}

fn ends_with_end_of_track(events: &[TrackEvent]) -> bool {
    events.last().map_or(false, is_end_of_track)
}

fn end_of_track<'a>(delta: u28) -> TrackEvent<'a> {
    TrackEvent {
        delta,
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    }
}

/// Turns an event list back into a track that serializes into a well-formed
/// track chunk. A missing trailing end-of-track event is appended; an empty
/// list or an end-of-track event before the last position is rejected.
pub fn rebuild_track<'a>(mut events: Vec<TrackEvent<'a>>) -> Result<Track<'a>> {
    if events.is_empty() {
        return Err(SplitError::InvalidTrack("track has no events".into()));
    }
    if let Some(index) = events.iter().position(is_end_of_track) {
        if index + 1 != events.len() {
            return Err(SplitError::InvalidTrack(format!(
                "end-of-track event at position {index} is followed by {} more event(s)",
                events.len() - index - 1
            )));
        }
        return Ok(events);
    }
    events.push(end_of_track(u28::from(0)));
    Ok(events)
}
