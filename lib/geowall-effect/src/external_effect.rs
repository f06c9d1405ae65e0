//! Stylization delegated to an external program
//!
//! The image is sent to the child's stdin as PNG and the child's stdout is
//! decoded as the result. Anything that goes wrong on the way (the program
//! is missing, it hangs, it prints nothing) leaves the image unchanged and
//! is reported through `log::warn!` instead of failing the pipeline.

use crate::{Effect, ImageEffectError, ImageEffectResult};
use derivative::Derivative;
use derive_setters::Setters;
use image::{ImageFormat, RgbaImage};
use std::{
    io::Cursor,
    process::ExitStatus,
    time::{Duration, Instant},
};

const KILL_GRACE: Duration = Duration::from_millis(100);

pub(crate) const DEFAULT_COMMAND: &str = "magick";

pub(crate) fn default_args() -> Vec<String> {
    ["png:-", "-paint", "4", "png:-"]
        .into_iter()
        .map(String::from)
        .collect()
}

#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct ExternalFilterConfig {
    #[derivative(Default(value = "DEFAULT_COMMAND.to_string()"))]
    #[setters(into)]
    command: String,

    #[derivative(Default(value = "default_args()"))]
    args: Vec<String>,

    #[derivative(Default(value = "Duration::from_secs(30)"))]
    timeout: Duration,
}

/// Why the round trip to the external program produced no image.
#[derive(thiserror::Error, Debug)]
enum FilterFailure {
    #[error("failed to encode input: {0}")]
    Encode(image::ImageError),
    #[error("failed to start: {0}")]
    Spawn(std::io::Error),
    #[error("pipe error: {0}")]
    Io(std::io::Error),
    #[error("no result after {0:?}")]
    Timeout(Duration),
    #[error("exited with {0}")]
    Status(ExitStatus),
    #[error("produced no output")]
    EmptyOutput,
    #[error("output is not an image: {0}")]
    Decode(image::ImageError),
}

impl ExternalFilterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    fn run(&self, image: &RgbaImage) -> Result<RgbaImage, FilterFailure> {
        let mut encoded = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut encoded), ImageFormat::Png)
            .map_err(FilterFailure::Encode)?;

        // The handle owns stdin/stdout and the reaper threads, so dropping
        // it on any early return closes the pipes.
        let handle = duct::cmd(self.command.as_str(), &self.args)
            .stdin_bytes(encoded)
            .stdout_capture()
            .stderr_null()
            .unchecked()
            .start()
            .map_err(FilterFailure::Spawn)?;

        let finished = match Instant::now().checked_add(self.timeout) {
            Some(deadline) => handle.wait_deadline(deadline),
            None => handle.wait().map(Some),
        };

        let output = match finished.map_err(FilterFailure::Io)? {
            Some(output) => output,
            None => {
                // A grandchild can keep stdout open after the kill, so the
                // reap is bounded too. Dropping the handle detaches the rest.
                _ = handle.kill();
                _ = handle.wait_timeout(KILL_GRACE);
                return Err(FilterFailure::Timeout(self.timeout));
            }
        };

        if !output.status.success() {
            return Err(FilterFailure::Status(output.status));
        }

        if output.stdout.is_empty() {
            return Err(FilterFailure::EmptyOutput);
        }

        let decoded = image::load_from_memory(&output.stdout).map_err(FilterFailure::Decode)?;
        Ok(decoded.to_rgba8())
    }
}

impl Effect for ExternalFilterConfig {
    fn name(&self) -> &'static str {
        "external_filter"
    }

    fn validate(&self) -> ImageEffectResult<()> {
        if self.command.trim().is_empty() {
            return Err(ImageEffectError::InvalidParameter(
                "external filter command is empty".to_string(),
            ));
        }

        if self.timeout.is_zero() {
            return Err(ImageEffectError::InvalidParameter(
                "external filter timeout must be positive".to_string(),
            ));
        }

        Ok(())
    }

    fn apply(&self, image: RgbaImage) -> ImageEffectResult<RgbaImage> {
        match self.run(&image) {
            Ok(filtered) => {
                log::debug!(
                    "{} filtered {}x{} -> {}x{}",
                    self.command,
                    image.width(),
                    image.height(),
                    filtered.width(),
                    filtered.height()
                );
                Ok(filtered)
            }
            Err(e) => {
                log::warn!(
                    "external filter `{}` unavailable, image left unchanged: {e}",
                    self.command
                );
                Ok(image)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn sample() -> RgbaImage {
        RgbaImage::from_fn(24, 16, |x, y| Rgba([(x * 10) as u8, (y * 15) as u8, 99, 255]))
    }

    #[test]
    fn test_missing_program_keeps_image() {
        let image = sample();
        let out = ExternalFilterConfig::new()
            .with_command("geowall-no-such-filter-program")
            .with_args(vec![])
            .apply(image.clone())
            .unwrap();
        assert_eq!(out, image);
    }

    #[cfg(unix)]
    #[test]
    fn test_empty_output_keeps_image() {
        let image = sample();
        let out = ExternalFilterConfig::new()
            .with_command("true")
            .with_args(vec![])
            .apply(image.clone())
            .unwrap();
        assert_eq!(out, image);
    }

    #[cfg(unix)]
    #[test]
    fn test_garbage_output_keeps_image() {
        let image = sample();
        let out = ExternalFilterConfig::new()
            .with_command("echo")
            .with_args(vec!["not a png".to_string()])
            .apply(image.clone())
            .unwrap();
        assert_eq!(out, image);
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_program_keeps_image() {
        let image = sample();
        let out = ExternalFilterConfig::new()
            .with_command("false")
            .with_args(vec![])
            .apply(image.clone())
            .unwrap();
        assert_eq!(out, image);
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_keeps_image() {
        let image = sample();
        let start = Instant::now();
        let out = ExternalFilterConfig::new()
            .with_command("sleep")
            .with_args(vec!["5".to_string()])
            .with_timeout(Duration::from_millis(200))
            .apply(image.clone())
            .unwrap();
        assert_eq!(out, image);
        assert!(start.elapsed() < Duration::from_secs(4));
    }

    #[cfg(unix)]
    #[test]
    fn test_round_trip_through_cat() {
        let image = sample();
        let out = ExternalFilterConfig::new()
            .with_command("cat")
            .with_args(vec![])
            .apply(image.clone())
            .unwrap();
        assert_eq!(out, image);
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_with_forked_descendant() {
        // The shell is killed but `sleep` still holds the stdout pipe.
        let image = sample();
        let start = Instant::now();
        let out = ExternalFilterConfig::new()
            .with_command("sh")
            .with_args(vec!["-c".to_string(), "sleep 5; true".to_string()])
            .with_timeout(Duration::from_millis(200))
            .apply(image.clone())
            .unwrap();
        assert_eq!(out, image);
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn test_empty_command_rejected() {
        let err = ExternalFilterConfig::new()
            .with_command("  ")
            .validate()
            .unwrap_err();
        assert!(matches!(err, ImageEffectError::InvalidParameter(_)));
    }
}
