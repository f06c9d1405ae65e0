//! Monochrome effects
//!
//! Plain luminance conversion, and the blob mask which reveals the original
//! colors through soft random patches over a gray base.

use crate::{Effect, ImageEffectError, ImageEffectResult, seeded_rng};
use derivative::Derivative;
use derive_setters::Setters;
use image::{GrayImage, Luma, Rgba, RgbaImage};
use imageproc::{distance_transform::Norm, drawing, filter, morphology};
use rand::{Rng, rngs::StdRng};

/// BT.601 luma with integer rounding, so an already gray pixel keeps its value.
pub(crate) fn luminance(r: u8, g: u8, b: u8) -> u8 {
    ((299 * r as u32 + 587 * g as u32 + 114 * b as u32 + 500) / 1000) as u8
}

pub(crate) fn monochrome(image: &RgbaImage) -> RgbaImage {
    let mut output = image.clone();

    for pixel in output.pixels_mut() {
        let gray = luminance(pixel[0], pixel[1], pixel[2]);
        pixel[0] = gray;
        pixel[1] = gray;
        pixel[2] = gray;
    }

    output
}

/// Luminance conversion. R, G and B all carry the luma, alpha is kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonochromeConfig;

impl MonochromeConfig {
    pub fn new() -> Self {
        Self
    }
}

impl Effect for MonochromeConfig {
    fn name(&self) -> &'static str {
        "monochrome"
    }

    fn apply(&self, image: RgbaImage) -> ImageEffectResult<RgbaImage> {
        Ok(monochrome(&image))
    }
}

/// Random blobs of original color over a monochrome copy of the image.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct BlobMaskConfig {
    /// Number of circles drawn into the mask
    #[derivative(Default(value = "12"))]
    count: u32,

    #[derivative(Default(value = "30"))]
    min_radius: u32,

    #[derivative(Default(value = "120"))]
    max_radius: u32,

    /// Passes of a 5x5 square dilation
    #[derivative(Default(value = "3"))]
    dilate_iterations: u32,

    /// Gaussian kernel size, must be odd
    #[derivative(Default(value = "31"))]
    blur_kernel_size: u32,

    #[setters(strip_option)]
    seed: Option<u64>,
}

impl BlobMaskConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the blurred selection mask. 255 keeps the original color,
    /// 0 keeps the monochrome value.
    pub fn build_mask(&self, width: u32, height: u32, rng: &mut StdRng) -> GrayImage {
        let mut mask = GrayImage::new(width, height);

        for _ in 0..self.count {
            let center = (
                rng.random_range(0..width) as i32,
                rng.random_range(0..height) as i32,
            );
            let radius = rng.random_range(self.min_radius..=self.max_radius) as i32;
            drawing::draw_filled_circle_mut(&mut mask, center, radius, Luma([255u8]));
        }

        for _ in 0..self.dilate_iterations {
            // L-infinity ball of radius 2 is the 5x5 square
            mask = morphology::dilate(&mask, Norm::LInf, 2);
        }

        filter::gaussian_blur_f32(&mask, kernel_sigma(self.blur_kernel_size))
    }
}

/// Sigma for a given kernel size, as OpenCV derives it when sigma is 0.
fn kernel_sigma(kernel_size: u32) -> f32 {
    0.3 * ((kernel_size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

impl Effect for BlobMaskConfig {
    fn name(&self) -> &'static str {
        "blob_mask"
    }

    fn validate(&self) -> ImageEffectResult<()> {
        if self.min_radius == 0
            || self.min_radius > self.max_radius
            || self.max_radius > i32::MAX as u32
        {
            return Err(ImageEffectError::InvalidParameter(format!(
                "blob radii must satisfy 0 < min_radius <= max_radius <= i32::MAX, got {}..={}",
                self.min_radius, self.max_radius
            )));
        }

        if self.blur_kernel_size == 0 || self.blur_kernel_size % 2 == 0 {
            return Err(ImageEffectError::InvalidParameter(format!(
                "blur kernel size must be odd and positive, got {}",
                self.blur_kernel_size
            )));
        }

        Ok(())
    }

    fn apply(&self, image: RgbaImage) -> ImageEffectResult<RgbaImage> {
        self.validate()?;

        let gray = monochrome(&image);
        if self.count == 0 || image.width() == 0 || image.height() == 0 {
            return Ok(gray);
        }

        let (width, height) = image.dimensions();
        let mut rng = seeded_rng(self.seed);
        let mask = self.build_mask(width, height, &mut rng);

        let output = RgbaImage::from_fn(width, height, |x, y| {
            let m = mask.get_pixel(x, y)[0] as u32;
            let color = image.get_pixel(x, y);
            let base = gray.get_pixel(x, y);
            let mix = |c: u8, g: u8| ((c as u32 * m + g as u32 * (255 - m) + 127) / 255) as u8;

            Rgba([
                mix(color[0], base[0]),
                mix(color[1], base[1]),
                mix(color[2], base[2]),
                color[3],
            ])
        });

        log::debug!("blob mask: {} blobs over {}x{}", self.count, width, height);
        Ok(output)
    }
}
