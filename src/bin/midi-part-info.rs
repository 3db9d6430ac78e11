use anyhow::{Context, Result};
use midi_part_splitter::{
    classify::classify_track,
    event::ControllerKind,
    inspect::{instrument_of, volume_report},
    naming::{generated_name, track_name, TrackNames},
    output::output_path,
    split::base_name,
};
use std::{env, path::Path};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let mid_file_path = args
        .get(1)
        .context("usage: midi-part-info <file.mid>")?;

    // Load bytes first
    let data = std::fs::read(mid_file_path).with_context(|| format!("Can't read {mid_file_path}"))?;

    // Parse the raw bytes
    let smf = midly::Smf::parse(&data).with_context(|| format!("Can't parse {mid_file_path}"))?;

    println!(
        "midi file has {} tracks, format {:?}, timing {:?}",
        smf.tracks.len(),
        smf.header.format,
        smf.header.timing
    );

    let mut names = TrackNames::new();
    for (track_num, track) in smf.tracks.iter().enumerate() {
        let kind = classify_track(track);
        if kind.is_header() {
            println!("track {} is a header track with {} events", track_num, track.len());
            continue;
        }
        let name = track_name(track);
        names.insert(track_num, name.clone().unwrap_or_else(|| generated_name(track_num)));
        let volume = volume_report(track);
        let channel = kind.channel();
        println!(
            "track {} '{}' on channel {} has {} events, instrument {:?} ({} {:#04X}), {} volume change(s) at {:?} ({} {:#04X}), last volume {:?}",
            track_num,
            name.unwrap_or_default(),
            channel + 1,
            track.len(),
            instrument_of(track),
            ControllerKind::Instrument,
            ControllerKind::Instrument.status() | channel,
            volume.count,
            volume.positions,
            ControllerKind::Volume,
            ControllerKind::Volume.status() | channel,
            volume.last_volume,
        );
    }

    let base = base_name(Path::new(mid_file_path));
    for (track_num, name) in names.resolve_collisions().iter() {
        println!(
            "track {} would be written to {}",
            track_num,
            output_path(Path::new(""), &base, name).display()
        );
    }
    Ok(())
}
