use crate::{
    ImageEffect, ImageEffectError, ImageEffectResult, Pipeline, TransformSettings,
    base_effect::{CropBottomConfig, ResizeConfig},
    channel_effect::ChannelGlitchConfig,
    external_effect::ExternalFilterConfig,
    filter_effect::ColorBlendConfig,
    monochrome_effect::{BlobMaskConfig, MonochromeConfig},
    noise_effect::GaussianNoiseConfig,
};
use image::DynamicImage;
use indexmap::IndexMap;
use std::{fmt, str::FromStr, time::Duration};

/// The built-in named transformations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transformation {
    Default,
    SimpleNoise,
    Glitch,
    RedOverlay,
    Watercolor,
}

impl Transformation {
    pub fn name(&self) -> &'static str {
        match self {
            Transformation::Default => "default",
            Transformation::SimpleNoise => "simple_noise",
            Transformation::Glitch => "glitch",
            Transformation::RedOverlay => "red_overlay",
            Transformation::Watercolor => "watercolor",
        }
    }

    pub fn all() -> &'static [Transformation] {
        &[
            Transformation::Default,
            Transformation::SimpleNoise,
            Transformation::Glitch,
            Transformation::RedOverlay,
            Transformation::Watercolor,
        ]
    }

    /// The ordered effect list, parameterized by `settings`.
    pub fn effects(&self, settings: &TransformSettings) -> Vec<ImageEffect> {
        let mut effects: Vec<ImageEffect> = vec![
            ResizeConfig::from_size(settings.width, settings.height).into(),
            CropBottomConfig::new()
                .with_pixels(settings.crop_bottom)
                .into(),
        ];

        match self {
            Transformation::Default => {
                let blob = &settings.blob;
                let mut blob_mask = BlobMaskConfig::new()
                    .with_count(blob.count)
                    .with_min_radius(blob.min_radius)
                    .with_max_radius(blob.max_radius)
                    .with_dilate_iterations(blob.dilate_iterations)
                    .with_blur_kernel_size(blob.blur_kernel_size);
                let mut noise = GaussianNoiseConfig::new()
                    .with_mean(settings.noise.mean)
                    .with_stddev(settings.noise.default_stddev);

                if let Some(seed) = settings.effect_seed(0) {
                    blob_mask = blob_mask.with_seed(seed);
                }
                if let Some(seed) = settings.effect_seed(1) {
                    noise = noise.with_seed(seed);
                }

                effects.push(MonochromeConfig::new().into());
                effects.push(blob_mask.into());
                effects.push(noise.into());
            }

            Transformation::SimpleNoise => {
                let mut noise = GaussianNoiseConfig::new()
                    .with_mean(settings.noise.mean)
                    .with_stddev(settings.noise.simple_stddev);

                if let Some(seed) = settings.effect_seed(0) {
                    noise = noise.with_seed(seed);
                }

                effects.push(noise.into());
            }

            Transformation::Glitch => {
                effects.push(
                    ChannelGlitchConfig::new()
                        .with_offset(settings.glitch.offset)
                        .into(),
                );
            }

            Transformation::RedOverlay => {
                effects.push(
                    ColorBlendConfig::new()
                        .with_color(settings.overlay.color)
                        .with_alpha(settings.overlay.alpha)
                        .into(),
                );
            }

            Transformation::Watercolor => {
                let watercolor = &settings.watercolor;
                effects.push(
                    ExternalFilterConfig::new()
                        .with_command(watercolor.command.clone())
                        .with_args(watercolor.args.clone())
                        .with_timeout(Duration::from_secs(watercolor.timeout_secs))
                        .into(),
                );
            }
        }

        effects
    }

    pub fn pipeline(&self, settings: &TransformSettings) -> ImageEffectResult<Pipeline> {
        Pipeline::new(self.effects(settings))
    }
}

impl fmt::Display for Transformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Transformation {
    type Err = ImageEffectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Transformation::all()
            .iter()
            .find(|t| t.name() == s)
            .copied()
            .ok_or_else(|| ImageEffectError::NotFound(s.to_string()))
    }
}

/// Name to pipeline table.
///
/// Built once at startup and only read afterwards; lookups of unknown names
/// fail with [`ImageEffectError::NotFound`].
#[derive(Debug, Clone)]
pub struct Registry {
    pipelines: IndexMap<String, Pipeline>,
}

impl Registry {
    /// Registry holding every built-in transformation.
    pub fn new(settings: &TransformSettings) -> ImageEffectResult<Self> {
        let mut registry = Self::empty();

        for transformation in Transformation::all() {
            registry.insert(transformation.name(), transformation.pipeline(settings)?)?;
        }

        Ok(registry)
    }

    pub fn empty() -> Self {
        Self {
            pipelines: IndexMap::new(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, pipeline: Pipeline) -> ImageEffectResult<()> {
        let name = name.into();
        if self.pipelines.contains_key(&name) {
            return Err(ImageEffectError::InvalidParameter(format!(
                "transformation `{name}` is already registered"
            )));
        }

        self.pipelines.insert(name, pipeline);
        Ok(())
    }

    pub fn get(&self, name: &str) -> ImageEffectResult<&Pipeline> {
        self.pipelines
            .get(name)
            .ok_or_else(|| ImageEffectError::NotFound(name.to_string()))
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.pipelines.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Pipeline)> {
        self.pipelines
            .iter()
            .map(|(name, pipeline)| (name.as_str(), pipeline))
    }

    /// Look up `name`, then run its pipeline over `image`.
    pub fn process(&self, name: &str, image: DynamicImage) -> ImageEffectResult<DynamicImage> {
        let pipeline = self.get(name)?;

        log::info!(
            "applying `{name}` ({}) to {}x{}",
            pipeline.describe(),
            image.width(),
            image.height()
        );

        pipeline.process_dynamic(image)
    }
}
