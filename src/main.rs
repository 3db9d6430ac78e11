use anyhow::{bail, Context, Result};
use midi_part_splitter::{cmdline::parse_args, convert::AudioRenderer, split_file, SplitConfig};
use std::{path::PathBuf, thread};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = parse_args();
    let default_level = if args.silent { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = args.config();
    config.validate()?;
    let inputs = args.input_files().context("Can't list input files")?;
    if inputs.is_empty() {
        bail!("No MIDI files found in {:?}", args.files);
    }
    let renderer = args.renderer();
    let renderer = renderer.as_ref().map(|r| r as &dyn AudioRenderer);

    let failed = run(&inputs, &config, renderer);
    if !failed.is_empty() {
        bail!("{} of {} input file(s) failed: {:?}", failed.len(), inputs.len(), failed);
    }
    info!("All done!");
    Ok(())
}

/// Splits every input on its own thread. Returns the inputs that failed.
fn run(
    inputs: &[PathBuf],
    config: &SplitConfig,
    renderer: Option<&dyn AudioRenderer>,
) -> Vec<PathBuf> {
    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|input| scope.spawn(move || split_file(input, config, renderer)))
            .collect();
        handles.into_iter().map(|handle| handle.join()).collect()
    });

    let mut failed = vec![];
    for (input, result) in inputs.iter().zip(results) {
        match result {
            Ok(Ok(outcome)) => {
                for path in &outcome.midi_files {
                    info!(input = %input.display(), "created {}", path.display());
                }
                if !outcome.conversion_failures.is_empty() {
                    warn!(
                        input = %input.display(),
                        failures = outcome.conversion_failures.len(),
                        "some conversions failed, MIDI files were kept"
                    );
                }
            }
            Ok(Err(err)) => {
                error!(input = %input.display(), "Error: {}", err);
                failed.push(input.clone());
            }
            Err(_) => {
                error!(input = %input.display(), "splitting panicked");
                failed.push(input.clone());
            }
        }
    }
    failed
}
