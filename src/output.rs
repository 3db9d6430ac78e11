use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    thread,
};

use crossbeam_channel::unbounded;
use midly::Smf;
use parking_lot::Mutex;
use tracing::{error, info};

use crate::{
    assemble::EmphasizedFile,
    error::{Result, SplitError, WriteFailure},
    naming::TrackNames,
};

/// Paths of the files written during one run, keyed by the track they
/// emphasize. Writer threads append to it concurrently.
#[derive(Debug, Default)]
pub struct OutputPaths(Mutex<Vec<(usize, PathBuf)>>);

impl OutputPaths {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, track_index: usize, path: PathBuf) {
        self.0.lock().push((track_index, path));
    }

    pub fn len(&self) -> usize {
        self.0.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().is_empty()
    }

    /// The recorded paths in track order, whatever order the writers
    /// finished in.
    pub fn into_paths(self) -> Vec<PathBuf> {
        let mut entries = self.0.into_inner();
        entries.sort_by_key(|(track_index, _)| *track_index);
        entries.into_iter().map(|(_, path)| path).collect()
    }
}

/// `<out_dir>/<base_name>_<track_name>.mid`
pub fn output_path(out_dir: &Path, base_name: &str, track_name: &str) -> PathBuf {
    out_dir.join(format!("{base_name}_{track_name}.mid"))
}

fn save(smf: &Smf, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|source| SplitError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    smf.write_std(&mut writer)
        .and_then(|_| writer.flush())
        .map_err(|source| SplitError::Encode {
            path: path.to_path_buf(),
            source,
        })
}

/// Writes one assembled file under its resolved track name and records the
/// path. A track without a name is skipped and yields `Ok(None)`.
pub fn write_variant(
    file: &EmphasizedFile,
    names: &TrackNames,
    base_name: &str,
    out_dir: &Path,
    paths: &OutputPaths,
) -> Result<Option<PathBuf>> {
    let track_name = match names.get(file.track_index) {
        Some(name) => name,
        None => return Ok(None),
    };
    let path = output_path(out_dir, base_name, track_name);
    fs::create_dir_all(out_dir).map_err(|source| SplitError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "creating MIDI file");
    save(&file.smf, &path)?;
    paths.push(file.track_index, path.clone());
    Ok(Some(path))
}

/// Writes every file on its own thread and waits for all of them. Written
/// paths land in `paths`; a failed write doesn't stop its siblings and is
/// returned instead, in track order.
pub fn write_all(
    files: &[EmphasizedFile],
    names: &TrackNames,
    base_name: &str,
    out_dir: &Path,
    paths: &OutputPaths,
) -> Vec<WriteFailure> {
    let (tx, rx) = unbounded();
    thread::scope(|scope| {
        for file in files {
            let tx = tx.clone();
            scope.spawn(move || {
                if let Err(error) = write_variant(file, names, base_name, out_dir, paths) {
                    error!(track_index = file.track_index, %error, "failed to write MIDI file");
                    // the receiver outlives the scope
                    let _ = tx.send(WriteFailure {
                        track_index: file.track_index,
                        error,
                    });
                }
            });
        }
    });
    drop(tx);

    let mut failures: Vec<_> = rx.iter().collect();
    failures.sort_by_key(|failure| failure.track_index);
    failures
}
