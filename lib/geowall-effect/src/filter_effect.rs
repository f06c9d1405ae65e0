use crate::{Effect, ImageEffectError, ImageEffectResult};
use derivative::Derivative;
use derive_setters::Setters;
use image::RgbaImage;

/// Mix a solid color into the image: `out = in * (1 - alpha) + color * alpha`.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct ColorBlendConfig {
    #[derivative(Default(value = "[255, 0, 0]"))]
    color: [u8; 3],

    #[derivative(Default(value = "0.5"))]
    alpha: f32,
}

impl ColorBlendConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self::default().with_color([r, g, b])
    }
}

impl Effect for ColorBlendConfig {
    fn name(&self) -> &'static str {
        "color_blend"
    }

    fn validate(&self) -> ImageEffectResult<()> {
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(ImageEffectError::InvalidParameter(format!(
                "blend alpha must be within [0, 1], got {}",
                self.alpha
            )));
        }

        Ok(())
    }

    fn apply(&self, mut image: RgbaImage) -> ImageEffectResult<RgbaImage> {
        self.validate()?;

        let keep = 1.0 - self.alpha;
        for pixel in image.pixels_mut() {
            for i in 0..3 {
                let val = pixel[i] as f32 * keep + self.color[i] as f32 * self.alpha;
                pixel[i] = val.round().clamp(0.0, 255.0) as u8;
            }
        }

        Ok(image)
    }
}
