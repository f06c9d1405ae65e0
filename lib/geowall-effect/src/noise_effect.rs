use crate::{Effect, ImageEffectError, ImageEffectResult, seeded_rng};
use derivative::Derivative;
use derive_setters::Setters;
use image::RgbaImage;
use rand_distr::{Distribution, Normal};

/// Additive Gaussian noise on the color channels. Alpha is left alone.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct GaussianNoiseConfig {
    #[derivative(Default(value = "0.0"))]
    mean: f32,

    #[derivative(Default(value = "10.0"))]
    stddev: f32,

    #[setters(strip_option)]
    seed: Option<u64>,
}

impl GaussianNoiseConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stddev(&self) -> f32 {
        self.stddev
    }

    fn distribution(&self) -> ImageEffectResult<Normal<f32>> {
        if !self.mean.is_finite() {
            return Err(ImageEffectError::InvalidParameter(format!(
                "noise mean must be finite, got {}",
                self.mean
            )));
        }

        if !self.stddev.is_finite() || self.stddev < 0.0 {
            return Err(ImageEffectError::InvalidParameter(format!(
                "noise stddev must be finite and non-negative, got {}",
                self.stddev
            )));
        }

        Normal::new(self.mean, self.stddev)
            .map_err(|e| ImageEffectError::InvalidParameter(format!("noise distribution: {e}")))
    }
}

impl Effect for GaussianNoiseConfig {
    fn name(&self) -> &'static str {
        "noise"
    }

    fn validate(&self) -> ImageEffectResult<()> {
        self.distribution().map(|_| ())
    }

    fn apply(&self, mut image: RgbaImage) -> ImageEffectResult<RgbaImage> {
        let normal = self.distribution()?;
        let mut rng = seeded_rng(self.seed);

        for pixel in image.pixels_mut() {
            for i in 0..3 {
                let noisy = pixel[i] as f32 + normal.sample(&mut rng);
                pixel[i] = noisy.clamp(0.0, 255.0) as u8;
            }
        }

        Ok(image)
    }
}
