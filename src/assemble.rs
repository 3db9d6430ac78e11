use midly::{Format, Header, Smf, Timing, Track};
use tracing::debug;

use crate::{
    classify::{classify_track, TrackKind},
    config::SplitConfig,
    error::{Result, SplitError},
    event::{instrument_event, volume_event, ControllerKind},
    mutate::{find_controller, replace_controlling_event},
    naming::{generated_name, track_name, TrackNames},
};

/// The per-track building blocks of every output file, in input track order.
/// Header tracks appear unchanged in both lists.
#[derive(Debug)]
pub struct TrackVariants<'a> {
    pub kinds: Vec<TrackKind>,
    /// Lead instrument at the emphasized volume.
    pub emphasized: Vec<Track<'a>>,
    /// Original instrument at the de-emphasized volume.
    pub lowered: Vec<Track<'a>>,
    /// Raw names of performance tracks, before collision resolution.
    pub names: TrackNames,
}

/// One output file: `smf` with track `track_index` emphasized.
#[derive(Debug)]
pub struct EmphasizedFile<'a> {
    pub track_index: usize,
    pub smf: Smf<'a>,
}

fn replace_controller<'a>(
    track: &[midly::TrackEvent<'a>],
    track_index: usize,
    controller: ControllerKind,
    replacement: midly::TrackEvent<'a>,
) -> Result<Track<'a>> {
    let position = find_controller(track, controller).ok_or(SplitError::MissingController {
        track: track_index,
        controller,
    })?;
    replace_controlling_event(track, position, replacement)
}

/// Classifies every track of `smf` and builds its emphasized and lowered
/// variants. Any performance track lacking a program change or a volume
/// change makes the whole file fail, since there is nothing to rewrite.
pub fn prepare_variants<'a>(smf: &Smf<'a>, config: &SplitConfig) -> Result<TrackVariants<'a>> {
    let mut variants = TrackVariants {
        kinds: Vec::with_capacity(smf.tracks.len()),
        emphasized: Vec::with_capacity(smf.tracks.len()),
        lowered: Vec::with_capacity(smf.tracks.len()),
        names: TrackNames::new(),
    };

    for (track_index, track) in smf.tracks.iter().enumerate() {
        let kind = classify_track(track);
        variants.kinds.push(kind);
        if kind.is_header() {
            debug!(track_index, "passing header track through");
            variants.emphasized.push(track.clone());
            variants.lowered.push(track.clone());
            continue;
        }

        let channel = kind.channel();
        let with_instrument = replace_controller(
            track,
            track_index,
            ControllerKind::Instrument,
            instrument_event(channel, config.emphasized_instrument)?,
        )?;
        let emphasized = replace_controller(
            &with_instrument,
            track_index,
            ControllerKind::Volume,
            volume_event(channel, config.emphasized_volume)?,
        )?;
        let lowered = replace_controller(
            track,
            track_index,
            ControllerKind::Volume,
            volume_event(channel, config.de_emphasized_volume)?,
        )?;

        let name = track_name(track).unwrap_or_else(|| generated_name(track_index));
        debug!(track_index, channel, name = %name, "prepared performance track");
        variants.emphasized.push(emphasized);
        variants.lowered.push(lowered);
        variants.names.insert(track_index, name);
    }

    Ok(variants)
}

/// Builds one file per performance track. Every file has the same tracks in
/// the same order as the input; only the emphasized one differs.
pub fn assemble<'a>(variants: &TrackVariants<'a>, config: &SplitConfig) -> Vec<EmphasizedFile<'a>> {
    let header = Header::new(
        Format::Parallel,
        Timing::Metrical(config.timing_division.into()),
    );
    variants
        .kinds
        .iter()
        .enumerate()
        .filter(|(_, kind)| !kind.is_header())
        .map(|(track_index, _)| {
            let tracks = (0..variants.kinds.len())
                .map(|k| {
                    if k == track_index {
                        variants.emphasized[k].clone()
                    } else {
                        variants.lowered[k].clone()
                    }
                })
                .collect();
            EmphasizedFile {
                track_index,
                smf: Smf { header, tracks },
            }
        })
        .collect()
}
