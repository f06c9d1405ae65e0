//! Tunable parameters for the built-in transformations
//!
//! Every field has a default, so a config file only needs to name the values
//! it wants to change.

use crate::external_effect::{DEFAULT_COMMAND, default_args};
use derivative::Derivative;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Derivative)]
#[derivative(Default)]
#[serde(default)]
pub struct TransformSettings {
    /// Resize target width
    #[derivative(Default(value = "1280"))]
    pub width: u32,

    /// Resize target height
    #[derivative(Default(value = "850"))]
    pub height: u32,

    /// Rows removed from the bottom after resizing
    #[derivative(Default(value = "50"))]
    pub crop_bottom: u32,

    /// Seed for the random effects. Unset means a fresh seed every run.
    pub seed: Option<u64>,

    pub noise: NoiseSettings,
    pub blob: BlobSettings,
    pub glitch: GlitchSettings,
    pub overlay: OverlaySettings,
    pub watercolor: WatercolorSettings,
}

impl TransformSettings {
    /// Seed for the `index`-th random effect of a pipeline.
    pub(crate) fn effect_seed(&self, index: u64) -> Option<u64> {
        self.seed.map(|seed| seed.wrapping_add(index))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Derivative)]
#[derivative(Default)]
#[serde(default)]
pub struct NoiseSettings {
    #[derivative(Default(value = "0.0"))]
    pub mean: f32,

    /// Noise strength of the `default` transformation
    #[derivative(Default(value = "10.0"))]
    pub default_stddev: f32,

    /// Noise strength of the `simple_noise` transformation
    #[derivative(Default(value = "20.0"))]
    pub simple_stddev: f32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Derivative)]
#[derivative(Default)]
#[serde(default)]
pub struct BlobSettings {
    #[derivative(Default(value = "12"))]
    pub count: u32,

    #[derivative(Default(value = "30"))]
    pub min_radius: u32,

    #[derivative(Default(value = "120"))]
    pub max_radius: u32,

    #[derivative(Default(value = "3"))]
    pub dilate_iterations: u32,

    #[derivative(Default(value = "31"))]
    pub blur_kernel_size: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Derivative)]
#[derivative(Default)]
#[serde(default)]
pub struct GlitchSettings {
    #[derivative(Default(value = "8"))]
    pub offset: i32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Derivative)]
#[derivative(Default)]
#[serde(default)]
pub struct OverlaySettings {
    #[derivative(Default(value = "[255, 0, 0]"))]
    pub color: [u8; 3],

    #[derivative(Default(value = "0.5"))]
    pub alpha: f32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Derivative)]
#[derivative(Default)]
#[serde(default)]
pub struct WatercolorSettings {
    #[derivative(Default(value = "DEFAULT_COMMAND.to_string()"))]
    pub command: String,

    #[derivative(Default(value = "default_args()"))]
    pub args: Vec<String>,

    #[derivative(Default(value = "30"))]
    pub timeout_secs: u64,
}
