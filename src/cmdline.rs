use std::{fs, io, num::ParseIntError, path::PathBuf};

use structopt::StructOpt;

use crate::{
    config::{SplitConfig, EMPHASIZED_VOLUME, TIMING_DIVISION},
    convert::ScriptRenderer,
};

#[derive(StructOpt, Debug)]
#[structopt(
    name = "midi-part-splitter",
    about = "Creates one rehearsal MIDI file per voice of a multi-part score"
)]
pub struct Cli {
    /// MIDI files, or directories of .mid/.midi files, to split
    #[structopt(short = "f", long = "file", parse(from_os_str), required = true)]
    pub files: Vec<PathBuf>,
    /// Volume of the non-emphasized tracks
    #[structopt(short = "v", long = "volume", parse(try_from_str = parse_midi_value), default_value = "40")]
    pub volume: u8,
    /// Instrument played by the emphasized track
    #[structopt(short = "i", long = "instrument", parse(try_from_str = parse_midi_value), default_value = "65")]
    pub instrument: u8,
    #[structopt(short = "o", long = "output-dir", parse(from_os_str), default_value = "output")]
    pub output_dir: PathBuf,
    #[structopt(short = "m", long = "mp3-dir", parse(from_os_str), default_value = "output/mp3s")]
    pub mp3_dir: PathBuf,
    /// Only write the MIDI files, skip the audio conversion
    #[structopt(long = "no-convert")]
    pub no_convert: bool,
    /// Script converting one MIDI file to audio
    #[structopt(long = "script", parse(from_os_str), default_value = "convert/convert_async.sh")]
    pub script: PathBuf,
    /// Log warnings and errors only
    #[structopt(short = "s", long = "silent")]
    pub silent: bool,
}

fn parse_midi_value(src: &str) -> Result<u8, String> {
    let value: u8 = src.parse().map_err(|e: ParseIntError| e.to_string())?;
    if value > 127 {
        return Err(format!("{value} is out of the MIDI range 0..=127"));
    }
    Ok(value)
}

impl Cli {
    pub fn config(&self) -> SplitConfig {
        SplitConfig {
            de_emphasized_volume: self.volume,
            emphasized_volume: EMPHASIZED_VOLUME,
            emphasized_instrument: self.instrument,
            timing_division: TIMING_DIVISION,
            midi_output_dir: self.output_dir.clone(),
            mp3_output_dir: self.mp3_dir.clone(),
        }
    }

    pub fn renderer(&self) -> Option<ScriptRenderer> {
        if self.no_convert {
            return None;
        }
        Some(ScriptRenderer {
            script: self.script.clone(),
            silent: self.silent,
            ..ScriptRenderer::default()
        })
    }

    /// Input files with directories expanded to the MIDI files they contain,
    /// sorted by name. Directories are not searched recursively.
    pub fn input_files(&self) -> io::Result<Vec<PathBuf>> {
        let mut inputs = vec![];
        for path in &self.files {
            if path.is_dir() {
                let mut found = vec![];
                for entry in fs::read_dir(path)? {
                    let entry_path = entry?.path();
                    if entry_path.is_file() && is_midi_file(&entry_path) {
                        found.push(entry_path);
                    }
                }
                found.sort();
                inputs.extend(found);
            } else {
                inputs.push(path.clone());
            }
        }
        Ok(inputs)
    }
}

fn is_midi_file(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("mid") || ext.eq_ignore_ascii_case("midi"))
        .unwrap_or(false)
}

pub fn parse_args() -> Cli {
    Cli::from_args()
}
