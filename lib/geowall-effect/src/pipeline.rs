use crate::{Effect, ImageEffect, ImageEffectResult};
use image::{ColorType, DynamicImage, RgbaImage};
use std::time::Instant;

/// A fixed, ordered list of effects.
///
/// The order is set when the pipeline is built and cannot be changed
/// afterwards. Every effect is validated up front so bad parameters are
/// reported before any pixel is touched.
#[derive(Debug, Clone)]
pub struct Pipeline {
    effects: Vec<ImageEffect>,
}

impl Pipeline {
    pub fn new(effects: Vec<ImageEffect>) -> ImageEffectResult<Self> {
        for effect in &effects {
            effect.validate()?;
        }

        Ok(Self { effects })
    }

    pub fn effects(&self) -> &[ImageEffect] {
        &self.effects
    }

    /// Effect names in application order, e.g. `resize -> crop_bottom`.
    pub fn describe(&self) -> String {
        self.effects
            .iter()
            .map(|effect| effect.name())
            .collect::<Vec<_>>()
            .join(" -> ")
    }

    /// Feed the image through every effect, left to right.
    pub fn process(&self, image: RgbaImage) -> ImageEffectResult<RgbaImage> {
        self.effects.iter().try_fold(image, |image, effect| {
            let start = Instant::now();
            let (width, height) = image.dimensions();
            let output = effect.apply(image)?;

            log::debug!(
                "{}: {}x{} -> {}x{} in {:.2?}",
                effect.name(),
                width,
                height,
                output.width(),
                output.height(),
                start.elapsed()
            );

            Ok(output)
        })
    }

    /// Like [`Pipeline::process`] on any layout. RGB8 input comes back as
    /// RGB8, every other layout is converted to and returned as RGBA8.
    pub fn process_dynamic(&self, image: DynamicImage) -> ImageEffectResult<DynamicImage> {
        let is_rgb8 = image.color() == ColorType::Rgb8;
        let output = DynamicImage::ImageRgba8(self.process(image.into_rgba8())?);

        Ok(if is_rgb8 {
            DynamicImage::ImageRgb8(output.into_rgb8())
        } else {
            output
        })
    }
}
