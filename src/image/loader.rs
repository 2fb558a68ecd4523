use super::bitmap::decode_bitmap;
use super::decoded::{DecodedImage, ImageStatus, Plane};
use crate::config::ImageConfig;
use crate::error::ImageError;
use crate::format::PixelFormat;
use crate::platform::FileStore;
use tracing::{debug, info, warn};

/// Physical camera a device index refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraPosition {
    Front,
    Back,
}

impl CameraPosition {
    pub fn from_devnum(devnum: usize) -> Option<Self> {
        match devnum {
            0 => Some(CameraPosition::Front),
            1 => Some(CameraPosition::Back),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CameraPosition::Front => "Front",
            CameraPosition::Back => "Back",
        }
    }
}

/// Locates and decodes the still image shown by a synthetic camera
#[derive(Debug, Clone)]
pub struct StillImageLoader {
    directory: String,
    max_dimension: u32,
}

impl StillImageLoader {
    pub fn new(config: &ImageConfig) -> Self {
        Self {
            directory: config.directory.clone(),
            max_dimension: config.max_dimension,
        }
    }

    /// Candidate resource paths, most specific first
    pub fn candidates(&self, position: CameraPosition, name: &str) -> Vec<String> {
        let dir = &self.directory;
        let pos = position.label();
        let mut paths: Vec<String> = Vec::with_capacity(4);
        for path in [
            format!("{dir}{name}_{pos}.bmp"),
            format!("{dir}{name}.bmp"),
            format!("{dir}ALL_{pos}.bmp"),
            format!("{dir}ALL.bmp"),
        ] {
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
        paths
    }

    /// Load the first candidate that exists into `image`.
    ///
    /// Decode errors are recorded as [`ImageStatus::Failed`]; the next
    /// candidate is not tried once one has been opened.
    pub fn load(
        &self,
        files: &mut dyn FileStore,
        position: CameraPosition,
        format_code: u16,
        name: &str,
        image: &mut DecodedImage,
    ) -> ImageStatus {
        match self.try_load(files, position, format_code, name) {
            Ok((width, height, planes)) => {
                info!(
                    "Loaded {}x{} still image for {} camera as {}",
                    width,
                    height,
                    position.label(),
                    format_name(format_code)
                );
                image.set_loaded(width, height, format_code, planes);
            }
            Err(e) => {
                warn!(
                    "Still image unavailable for {} camera: {}",
                    position.label(),
                    e
                );
                image.set_failed(format_code);
            }
        }
        image.status()
    }

    fn try_load(
        &self,
        files: &mut dyn FileStore,
        position: CameraPosition,
        format_code: u16,
        name: &str,
    ) -> Result<(u32, u32, [Option<Plane>; 3]), ImageError> {
        let layout = PixelFormat::from_code(format_code)
            .and_then(|format| format.layout())
            .ok_or(ImageError::UnsupportedFormat(format_code))?;

        let candidates = self.candidates(position, name);
        for path in &candidates {
            let handle = match files.open(path) {
                Ok(handle) => handle,
                Err(e) => {
                    debug!("Candidate {} not usable: {}", path, e);
                    continue;
                }
            };

            debug!("Decoding still image {}", path);
            let decoded = decode_bitmap(files, handle, layout, self.max_dimension);
            files.close(handle);
            return decoded;
        }

        Err(ImageError::NotFound {
            tried: candidates.len(),
        })
    }
}

fn format_name(format_code: u16) -> String {
    PixelFormat::from_code(format_code)
        .map(|format| format.to_string())
        .unwrap_or_else(|| format!("format {}", format_code))
}
