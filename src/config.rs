use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SynthcamConfig {
    pub camera: CameraConfig,
    pub image: ImageConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CameraConfig {
    /// Fill caller buffers with the still image on synthetic reads
    #[serde(default = "default_compositing")]
    pub compositing: bool,

    /// Rate requested from the motion sensor when sampling orientation
    #[serde(default = "default_sensor_rate_hz")]
    pub sensor_rate_hz: u32,

    /// Frame rate assumed when an open request carries zero
    #[serde(default = "default_frame_rate_fallback")]
    pub frame_rate_fallback: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ImageConfig {
    /// Prefix prepended to every candidate image name
    #[serde(default = "default_image_directory")]
    pub directory: String,

    /// Application identifier used in per-application candidate names
    #[serde(default = "default_app_id")]
    pub app_id: String,

    /// Largest accepted bitmap width or height
    #[serde(default = "default_max_dimension")]
    pub max_dimension: u32,
}

impl SynthcamConfig {
    /// Load configuration from a specific file path
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy();
        debug!("Loading configuration from: {}", path_str);

        let settings = Config::builder()
            .set_default("camera.compositing", default_compositing())?
            .set_default("camera.sensor_rate_hz", default_sensor_rate_hz())?
            .set_default("camera.frame_rate_fallback", default_frame_rate_fallback())?
            .set_default("image.directory", default_image_directory())?
            .set_default("image.app_id", default_app_id())?
            .set_default("image.max_dimension", default_max_dimension())?
            // Add configuration file (optional)
            .add_source(File::with_name(&path_str).required(false))
            // Add environment variables with SYNTHCAM_ prefix, e.g. SYNTHCAM_IMAGE__APP_ID
            .add_source(
                Environment::with_prefix("SYNTHCAM")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let config: SynthcamConfig = settings.try_deserialize()?;

        info!("Configuration loaded successfully");
        debug!("Final configuration: {:#?}", config);

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.camera.sensor_rate_hz == 0 {
            return Err(ConfigError::Message(
                "Camera sensor_rate_hz must be greater than 0".to_string(),
            ));
        }

        if self.image.directory.is_empty() {
            return Err(ConfigError::Message(
                "Image directory must not be empty".to_string(),
            ));
        }

        if self.image.app_id.is_empty() {
            return Err(ConfigError::Message(
                "Image app_id must not be empty".to_string(),
            ));
        }

        if self.image.max_dimension == 0 {
            return Err(ConfigError::Message(
                "Image max_dimension must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for SynthcamConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            image: ImageConfig::default(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            compositing: default_compositing(),
            sensor_rate_hz: default_sensor_rate_hz(),
            frame_rate_fallback: default_frame_rate_fallback(),
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            directory: default_image_directory(),
            app_id: default_app_id(),
            max_dimension: default_max_dimension(),
        }
    }
}

// Default value functions
fn default_compositing() -> bool {
    true
}
fn default_sensor_rate_hz() -> u32 {
    100
}
fn default_frame_rate_fallback() -> u16 {
    30
}

fn default_image_directory() -> String {
    "ux0:data/synthcam/".to_string()
}
fn default_app_id() -> String {
    "ALL".to_string()
}
fn default_max_dimension() -> u32 {
    4096
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = SynthcamConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.camera.compositing);
        assert_eq!(config.camera.sensor_rate_hz, 100);
        assert_eq!(config.image.directory, "ux0:data/synthcam/");
        assert_eq!(config.image.app_id, "ALL");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let config = SynthcamConfig::load_from_file(&path).unwrap();
        assert_eq!(config, SynthcamConfig::default());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[camera]\ncompositing = false\nsensor_rate_hz = 60\n\n[image]\napp_id = \"PCSE00001\""
        )
        .unwrap();

        let config = SynthcamConfig::load_from_file(file.path()).unwrap();
        assert!(!config.camera.compositing);
        assert_eq!(config.camera.sensor_rate_hz, 60);
        assert_eq!(config.camera.frame_rate_fallback, 30);
        assert_eq!(config.image.app_id, "PCSE00001");
        assert_eq!(config.image.directory, "ux0:data/synthcam/");
    }

    #[test]
    fn test_config_validation() {
        let mut config = SynthcamConfig::default();
        config.camera.sensor_rate_hz = 0;
        assert!(config.validate().is_err());

        config.camera.sensor_rate_hz = 100;
        config.image.app_id.clear();
        assert!(config.validate().is_err());

        config.image.app_id = "ALL".to_string();
        config.image.max_dimension = 0;
        assert!(config.validate().is_err());

        config.image.max_dimension = 1024;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = SynthcamConfig::default();
        let rendered = config.to_toml().unwrap();
        assert!(rendered.contains("[camera]"));
        assert!(rendered.contains("app_id = \"ALL\""));

        let parsed: SynthcamConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }
}
