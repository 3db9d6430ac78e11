//! Hand-off to the external MIDI to WAV to MP3 rendering step.

use std::{
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    process::{Command, Stdio},
    thread,
};

use tracing::{error, info};

use crate::error::{Result, SplitError};

pub const DEFAULT_SHELL: &str = "/bin/sh";
pub const DEFAULT_SCRIPT: &str = "convert/convert_async.sh";

/// Renders one MIDI file into audio under `out_dir`.
pub trait AudioRenderer: Sync {
    fn render(&self, midi_path: &Path, out_dir: &Path) -> Result<()>;
}

/// Runs `<shell> <script> <midi path> <out dir> <silent>` and forwards the
/// script's standard output to the log.
#[derive(Clone, Debug)]
pub struct ScriptRenderer {
    pub shell: PathBuf,
    pub script: PathBuf,
    pub silent: bool,
}

impl Default for ScriptRenderer {
    fn default() -> Self {
        Self {
            shell: PathBuf::from(DEFAULT_SHELL),
            script: PathBuf::from(DEFAULT_SCRIPT),
            silent: false,
        }
    }
}

impl AudioRenderer for ScriptRenderer {
    fn render(&self, midi_path: &Path, out_dir: &Path) -> Result<()> {
        let conversion_error = |reason: String| SplitError::Conversion {
            path: midi_path.to_path_buf(),
            reason,
        };
        let mut child = Command::new(&self.shell)
            .arg(&self.script)
            .arg(midi_path)
            .arg(out_dir)
            .arg(self.silent.to_string())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|e| conversion_error(format!("can't start {}: {e}", self.script.display())))?;

        if let Some(stdout) = child.stdout.take() {
            for line in BufReader::new(stdout).lines() {
                match line {
                    Ok(line) => info!(midi = %midi_path.display(), "{line}"),
                    Err(_) => break,
                }
            }
        }

        let status = child
            .wait()
            .map_err(|e| conversion_error(format!("can't wait for script: {e}")))?;
        if status.success() {
            Ok(())
        } else {
            Err(conversion_error(format!("script exited with {status}")))
        }
    }
}

/// Renders every path on its own thread and waits for all of them. Failures
/// are logged and returned; they never affect the MIDI files themselves.
pub fn render_all(
    renderer: &dyn AudioRenderer,
    midi_paths: &[PathBuf],
    out_dir: &Path,
) -> Vec<SplitError> {
    info!(count = midi_paths.len(), "beginning MIDI --> WAV --> MP3 conversion");
    let failures: Vec<SplitError> = thread::scope(|scope| {
        let handles: Vec<_> = midi_paths
            .iter()
            .map(|path| scope.spawn(move || renderer.render(path, out_dir)))
            .collect();
        handles
            .into_iter()
            .zip(midi_paths)
            .filter_map(|(handle, path)| match handle.join() {
                Ok(Ok(())) => None,
                Ok(Err(e)) => Some(e),
                Err(_) => Some(SplitError::Conversion {
                    path: path.clone(),
                    reason: "conversion thread panicked".into(),
                }),
            })
            .collect()
    });
    for failure in &failures {
        error!(%failure, "conversion failed");
    }
    failures
}
