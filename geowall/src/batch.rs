use anyhow::{Context, Result, bail};
use geowall_effect::Registry;
use image::ImageFormat;
use rayon::prelude::*;
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

/// Decode `input`, run the named transformation and write a PNG to `output`.
pub fn process_file(registry: &Registry, transform: &str, input: &Path, output: &Path) -> Result<()> {
    let image = image::open(input).with_context(|| format!("open {} failed", input.display()))?;

    let result = registry
        .process(transform, image)
        .with_context(|| format!("`{transform}` failed on {}", input.display()))?;

    result
        .save_with_format(output, ImageFormat::Png)
        .with_context(|| format!("save {} failed", output.display()))?;

    log::info!("{} -> {}", input.display(), output.display());
    Ok(())
}

/// `<output_dir>/<stem>-<transform>.png`
pub fn output_path(output_dir: &Path, input: &Path, transform: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());

    output_dir.join(format!("{stem}-{transform}.png"))
}

/// Process every input in parallel into `output_dir`.
///
/// All workers share the registry read-only. Returns how many inputs failed;
/// each failure is logged and does not stop the others.
pub fn process_batch(
    registry: &Registry,
    transform: &str,
    inputs: &[PathBuf],
    output_dir: &Path,
) -> Result<usize> {
    // Unknown names and clashing outputs fail before any file is decoded.
    registry.get(transform)?;

    let mut claimed = HashMap::with_capacity(inputs.len());
    let mut jobs = Vec::with_capacity(inputs.len());
    for input in inputs {
        let output = output_path(output_dir, input, transform);
        if let Some(other) = claimed.insert(output.clone(), input) {
            bail!(
                "{} and {} would both write {}",
                other.display(),
                input.display(),
                output.display()
            );
        }
        jobs.push((input.as_path(), output));
    }

    fs::create_dir_all(output_dir)
        .with_context(|| format!("create {} failed", output_dir.display()))?;

    let failed = jobs
        .par_iter()
        .filter(|(input, output)| {
            match process_file(registry, transform, input, output) {
                Ok(_) => false,
                Err(e) => {
                    log::warn!("{e:?}");
                    true
                }
            }
        })
        .count();

    Ok(failed)
}
