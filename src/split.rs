use std::{
    fs,
    path::{Path, PathBuf},
};

use midly::Smf;
use tracing::{info, instrument};

use crate::{
    assemble::{assemble, prepare_variants},
    config::SplitConfig,
    convert::{render_all, AudioRenderer},
    error::{Result, SplitError},
    output::{write_all, OutputPaths},
};

/// What a successful split produced.
#[derive(Debug, Default)]
pub struct SplitOutcome {
    /// One MIDI file per named performance track, in track order.
    pub midi_files: Vec<PathBuf>,
    /// Conversion failures. The MIDI files above are valid regardless.
    pub conversion_failures: Vec<SplitError>,
}

/// Input file name without directory and extension, used as the prefix of
/// every output file.
pub fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Splits an already parsed file into one MIDI file per voice. Every track is
/// classified and rewritten before the first file gets written, so that
/// collision resolution sees all names. Returns the written paths in track
/// order; `split_file` wraps them into a [`SplitOutcome`].
pub fn split_smf(smf: &Smf, base_name: &str, config: &SplitConfig) -> Result<Vec<PathBuf>> {
    config.validate()?;
    let variants = prepare_variants(smf, config)?;
    let names = variants.names.resolve_collisions();
    let files = assemble(&variants, config);
    info!(
        files = files.len(),
        volume = config.de_emphasized_volume,
        "writing voice files with all other tracks lowered"
    );
    let paths = OutputPaths::new();
    let failures = write_all(&files, &names, base_name, &config.midi_output_dir, &paths);
    if !failures.is_empty() {
        return Err(SplitError::WriteFailures(failures));
    }
    Ok(paths.into_paths())
}

/// Reads `path`, writes the voice files and, given a renderer, converts each
/// written file to audio.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn split_file(
    path: &Path,
    config: &SplitConfig,
    renderer: Option<&dyn AudioRenderer>,
) -> Result<SplitOutcome> {
    let data = fs::read(path).map_err(|source| SplitError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let smf = Smf::parse(&data)?;
    info!(tracks = smf.tracks.len(), "read MIDI file");

    let midi_files = split_smf(&smf, &base_name(path), config)?;
    info!(count = midi_files.len(), "finished creating MIDI files");

    let conversion_failures = match renderer {
        Some(renderer) => render_all(renderer, &midi_files, &config.mp3_output_dir),
        None => vec![],
    };
    Ok(SplitOutcome {
        midi_files,
        conversion_failures,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        inspect::{instrument_of, volume_report},
        test_helpers::{header_track, smf, tenor_bass, voice_track},
    };
    use midly::{Format, MetaMessage, Timing, TrackEventKind};

    fn config_in(dir: &Path) -> SplitConfig {
        SplitConfig {
            midi_output_dir: dir.join("output"),
            mp3_output_dir: dir.join("mp3s"),
            ..SplitConfig::default()
        }
    }

    fn write_input(dir: &Path, name: &str, input: &Smf) -> PathBuf {
        let path = dir.join(name);
        input.save(&path).unwrap();
        path
    }

    #[test]
    fn tenor_and_bass_files_emphasize_their_own_track() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let input_path = write_input(dir.path(), "hymn.mid", &tenor_bass());

        let outcome = split_file(&input_path, &config, None).unwrap();
        let out = &config.midi_output_dir;
        assert_eq!(
            outcome.midi_files,
            vec![out.join("hymn_Tenor.mid"), out.join("hymn_Bass.mid")]
        );
        assert!(outcome.conversion_failures.is_empty());

        for (path, emphasized) in outcome.midi_files.iter().zip([1, 2]) {
            let bytes = fs::read(path).unwrap();
            let written = Smf::parse(&bytes).unwrap();
            assert_eq!(written.header.format, Format::Parallel);
            assert_eq!(written.header.timing, Timing::Metrical(960.into()));
            assert_eq!(written.tracks.len(), 3);
            for (k, track) in written.tracks.iter().enumerate().skip(1) {
                let volume = volume_report(track);
                assert_eq!(volume.count, 1);
                if k == emphasized {
                    assert_eq!(volume.last_volume, Some(100));
                    assert_eq!(instrument_of(track), Some(65));
                } else {
                    assert_eq!(volume.last_volume, Some(40));
                    assert_eq!(instrument_of(track), Some(if k == 1 { 52 } else { 53 }));
                }
            }
        }
    }

    #[test]
    fn output_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let input = tenor_bass();
        let first = split_smf(&input, "a", &config_in(&dir.path().join("1"))).unwrap();
        let second = split_smf(&input, "a", &config_in(&dir.path().join("2"))).unwrap();
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(fs::read(a).unwrap(), fs::read(b).unwrap());
        }
    }

    #[test]
    fn duplicate_names_get_numbered_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let input = smf(vec![
            header_track(),
            voice_track(Some("Alto"), 0, 1),
            voice_track(Some("Alto"), 1, 2),
            voice_track(None, 2, 3),
        ]);
        let files = split_smf(&input, "mass", &config).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "mass_Alto.mid",
                "mass_Alto(2).mid",
                "mass_autogenerated_name_track_3.mid"
            ]
        );
    }

    #[test]
    fn literal_suffixed_name_does_not_overwrite_a_numbered_duplicate() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let input = smf(vec![
            header_track(),
            voice_track(Some("Alto"), 0, 1),
            voice_track(Some("Alto"), 1, 2),
            voice_track(Some("Alto(2)"), 2, 3),
        ]);
        let files = split_smf(&input, "mass", &config).unwrap();
        let out = &config.midi_output_dir;
        assert_eq!(
            files,
            vec![
                out.join("mass_Alto.mid"),
                out.join("mass_Alto(3).mid"),
                out.join("mass_Alto(2).mid")
            ]
        );
        assert_eq!(fs::read_dir(out).unwrap().count(), 3);

        // the literal "Alto(2)" file emphasizes the third voice
        let bytes = fs::read(out.join("mass_Alto(2).mid")).unwrap();
        let written = Smf::parse(&bytes).unwrap();
        assert_eq!(instrument_of(&written.tracks[3]), Some(65));
        assert_eq!(instrument_of(&written.tracks[2]), Some(2));
    }

    #[test]
    fn voice_without_end_of_track_is_still_split() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let mut unterminated = voice_track(Some("Bass"), 1, 53);
        unterminated.pop();
        let input = smf(vec![header_track(), voice_track(Some("Tenor"), 0, 52), unterminated]);

        let files = split_smf(&input, "hymn", &config).unwrap();
        assert_eq!(files.len(), 2);
        for path in &files {
            let bytes = fs::read(path).unwrap();
            let written = Smf::parse(&bytes).unwrap();
            let bass = &written.tracks[2];
            assert!(matches!(
                bass.last().map(|event| event.kind),
                Some(TrackEventKind::Meta(MetaMessage::EndOfTrack))
            ));
        }
    }

    #[test]
    fn invalid_config_is_rejected_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let config = SplitConfig {
            emphasized_instrument: 130,
            ..config_in(dir.path())
        };
        let result = split_smf(&tenor_bass(), "hymn", &config);
        assert!(matches!(result, Err(SplitError::InvalidConfig(_))));
        assert!(!config.midi_output_dir.exists());
    }

    #[test]
    fn missing_and_malformed_inputs_fail() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        assert!(matches!(
            split_file(&dir.path().join("nope.mid"), &config, None),
            Err(SplitError::Io { .. })
        ));
        let garbage = dir.path().join("garbage.mid");
        fs::write(&garbage, b"not a midi file").unwrap();
        assert!(matches!(
            split_file(&garbage, &config, None),
            Err(SplitError::Decode(_))
        ));
    }

    #[test]
    fn base_name_strips_directory_and_extension() {
        assert_eq!(base_name(Path::new("/tmp/scores/Hine Ma Tov.mid")), "Hine Ma Tov");
        assert_eq!(base_name(Path::new("hymn")), "hymn");
    }
}
