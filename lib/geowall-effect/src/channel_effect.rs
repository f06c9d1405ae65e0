//! Channel manipulation effects

use crate::{Effect, ImageEffectResult};
use derivative::Derivative;
use derive_setters::Setters;
use image::{Rgba, RgbaImage};

/// Chromatic "glitch": red moves right, green moves left, blue and alpha stay.
///
/// Columns that would be read from outside the image repeat the edge column.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct ChannelGlitchConfig {
    #[derivative(Default(value = "8"))]
    offset: i32,
}

impl ChannelGlitchConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Effect for ChannelGlitchConfig {
    fn name(&self) -> &'static str {
        "channel_glitch"
    }

    fn apply(&self, image: RgbaImage) -> ImageEffectResult<RgbaImage> {
        if self.offset == 0 {
            return Ok(image);
        }

        let (width, height) = image.dimensions();
        let last = width as i64 - 1;
        let offset = self.offset as i64;
        let column = |x: i64| x.clamp(0, last) as u32;

        Ok(RgbaImage::from_fn(width, height, |x, y| {
            let x = x as i64;
            let red = image.get_pixel(column(x - offset), y)[0];
            let green = image.get_pixel(column(x + offset), y)[1];
            let Rgba([_, _, blue, alpha]) = *image.get_pixel(x as u32, y);
            Rgba([red, green, blue, alpha])
        }))
    }
}
