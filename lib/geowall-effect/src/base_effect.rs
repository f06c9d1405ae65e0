//! Geometry effects
//!
//! Resizing and cropping. These change the dimensions of the image and leave
//! pixel colors alone (apart from resampling).

use crate::{Effect, ImageEffectError, ImageEffectResult};
use derivative::Derivative;
use derive_setters::Setters;
use image::{RgbaImage, imageops::FilterType};

/// Resize to an exact size with a Lanczos3 kernel.
///
/// The aspect ratio is not preserved: the target size is taken literally.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct ResizeConfig {
    #[derivative(Default(value = "1280"))]
    width: u32,

    #[derivative(Default(value = "850"))]
    height: u32,
}

impl ResizeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_size(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Effect for ResizeConfig {
    fn name(&self) -> &'static str {
        "resize"
    }

    fn validate(&self) -> ImageEffectResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ImageEffectError::InvalidParameter(format!(
                "resize target must be positive, got {}x{}",
                self.width, self.height
            )));
        }

        Ok(())
    }

    fn apply(&self, image: RgbaImage) -> ImageEffectResult<RgbaImage> {
        self.validate()?;

        if image.dimensions() == (self.width, self.height) {
            return Ok(image);
        }

        Ok(image::imageops::resize(
            &image,
            self.width,
            self.height,
            FilterType::Lanczos3,
        ))
    }
}

/// Remove rows from the bottom of the image.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct CropBottomConfig {
    #[derivative(Default(value = "50"))]
    pixels: u32,
}

impl CropBottomConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pixels(&self) -> u32 {
        self.pixels
    }
}

impl Effect for CropBottomConfig {
    fn name(&self) -> &'static str {
        "crop_bottom"
    }

    fn apply(&self, image: RgbaImage) -> ImageEffectResult<RgbaImage> {
        let (width, height) = image.dimensions();

        if self.pixels >= height {
            return Err(ImageEffectError::InvalidDimension(format!(
                "cannot crop {} rows from an image {} rows high",
                self.pixels, height
            )));
        }

        if self.pixels == 0 {
            return Ok(image);
        }

        Ok(image::imageops::crop_imm(&image, 0, 0, width, height - self.pixels).to_image())
    }
}
