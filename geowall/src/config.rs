use anyhow::{Context, Result};
use derivative::Derivative;
use geowall_effect::TransformSettings;
use log::debug;
use platform_dirs::AppDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

const APP_NAME: &str = "geowall";

#[derive(Serialize, Deserialize, Debug, Clone, Derivative)]
#[derivative(Default)]
#[serde(default)]
pub struct Config {
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Transformation used when `--transform` is not given
    #[derivative(Default(value = "\"default\".to_string()"))]
    pub transform: String,

    pub effects: TransformSettings,
}

impl Config {
    /// Load `path` if given, otherwise the per-user config file if it exists,
    /// otherwise the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Some(path) if path.exists() => path,
                _ => {
                    debug!("no config file, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let text = fs::read_to_string(&path)
            .with_context(|| format!("read config file {} failed", path.display()))?;
        let mut config = Self::parse(&text)
            .with_context(|| format!("parse config file {} failed", path.display()))?;
        config.config_path = Some(path);

        debug!("{:?}", config);
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str::<Config>(text)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).with_context(|| "convert config to toml failed")
    }
}

/// `<config dir>/geowall/geowall.toml` on the current platform.
pub fn default_config_path() -> Option<PathBuf> {
    AppDirs::new(Some(APP_NAME), true)
        .map(|dirs| dirs.config_dir.join(format!("{APP_NAME}.toml")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_is_default() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.transform, "default");
        assert_eq!(config.effects.width, 1280);
        assert_eq!(config.effects.height, 850);
        assert_eq!(config.effects.crop_bottom, 50);
        assert_eq!(config.effects.seed, None);
    }

    #[test]
    fn test_partial_config() {
        let config = Config::parse(
            r#"
            transform = "glitch"

            [effects]
            seed = 7
            crop_bottom = 10

            [effects.glitch]
            offset = 20

            [effects.watercolor]
            command = "gmic"
            "#,
        )
        .unwrap();

        assert_eq!(config.transform, "glitch");
        assert_eq!(config.effects.seed, Some(7));
        assert_eq!(config.effects.crop_bottom, 10);
        assert_eq!(config.effects.width, 1280);
        assert_eq!(config.effects.glitch.offset, 20);
        assert_eq!(config.effects.watercolor.command, "gmic");
        assert_eq!(config.effects.watercolor.timeout_secs, 30);
        assert_eq!(config.effects.noise.simple_stddev, 20.0);
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = Config::default();
        config.effects.blob.count = 3;
        config.effects.overlay.color = [0, 0, 255];

        let parsed = Config::parse(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed.effects.blob.count, 3);
        assert_eq!(parsed.effects.overlay.color, [0, 0, 255]);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "transform = \"red_overlay\"").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.transform, "red_overlay");
        assert_eq!(config.config_path.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(Config::load(Some(Path::new("/nonexistent/geowall.toml"))).is_err());
    }

    #[test]
    fn test_invalid_config() {
        assert!(Config::parse("transform = 3").is_err());
    }
}
