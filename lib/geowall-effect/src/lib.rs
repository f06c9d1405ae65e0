//! Image effect pipeline for geowall
//!
//! A transformation is an ordered list of effects. Each effect consumes the
//! previous effect's output and returns a new image, so a pipeline is a left
//! fold over its effects.

pub mod base_effect;
pub mod channel_effect;
pub mod external_effect;
pub mod filter_effect;
pub mod monochrome_effect;
pub mod noise_effect;
pub mod pipeline;
pub mod settings;
pub mod transformation;

pub use pipeline::Pipeline;
pub use settings::TransformSettings;
pub use transformation::{Registry, Transformation};

use image::RgbaImage;
use rand::{SeedableRng, rngs::StdRng};

pub type ImageEffectResult<T> = Result<T, ImageEffectError>;

#[derive(thiserror::Error, Debug)]
pub enum ImageEffectError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),
    #[error("Transformation not found: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub trait Effect {
    /// Short, stable name used in logs.
    fn name(&self) -> &'static str;

    /// Check the construction parameters without touching any pixels.
    fn validate(&self) -> ImageEffectResult<()> {
        Ok(())
    }

    fn apply(&self, image: RgbaImage) -> ImageEffectResult<RgbaImage>;
}

/// Fixed seeds give reproducible output, `None` draws from OS entropy.
pub(crate) fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

#[derive(Debug, Clone)]
pub enum ImageEffect {
    // Geometry
    Resize(base_effect::ResizeConfig),
    CropBottom(base_effect::CropBottomConfig),

    // Monochrome effects
    Monochrome(monochrome_effect::MonochromeConfig),
    BlobMask(monochrome_effect::BlobMaskConfig),

    // Noise
    Noise(noise_effect::GaussianNoiseConfig),

    // Channel effects
    ChannelGlitch(channel_effect::ChannelGlitchConfig),

    // Filter effects
    ColorBlend(filter_effect::ColorBlendConfig),

    // Delegated to another program
    ExternalFilter(external_effect::ExternalFilterConfig),
}

impl ImageEffect {
    fn inner(&self) -> &dyn Effect {
        match self {
            ImageEffect::Resize(config) => config,
            ImageEffect::CropBottom(config) => config,
            ImageEffect::Monochrome(config) => config,
            ImageEffect::BlobMask(config) => config,
            ImageEffect::Noise(config) => config,
            ImageEffect::ChannelGlitch(config) => config,
            ImageEffect::ColorBlend(config) => config,
            ImageEffect::ExternalFilter(config) => config,
        }
    }
}

impl Effect for ImageEffect {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn validate(&self) -> ImageEffectResult<()> {
        self.inner().validate()
    }

    fn apply(&self, image: RgbaImage) -> ImageEffectResult<RgbaImage> {
        self.inner().apply(image)
    }
}

macro_rules! impl_from_config {
    ($($variant:ident => $config:ty),* $(,)?) => {
        $(
            impl From<$config> for ImageEffect {
                fn from(config: $config) -> Self {
                    ImageEffect::$variant(config)
                }
            }
        )*
    };
}

impl_from_config! {
    Resize => base_effect::ResizeConfig,
    CropBottom => base_effect::CropBottomConfig,
    Monochrome => monochrome_effect::MonochromeConfig,
    BlobMask => monochrome_effect::BlobMaskConfig,
    Noise => noise_effect::GaussianNoiseConfig,
    ChannelGlitch => channel_effect::ChannelGlitchConfig,
    ColorBlend => filter_effect::ColorBlendConfig,
    ExternalFilter => external_effect::ExternalFilterConfig,
}
