use thiserror::Error;

#[derive(Error, Debug)]
pub enum SynthcamError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    #[error("Intercept error: {0}")]
    Intercept(#[from] InterceptError),

    #[error("System error: {message}")]
    System { message: String },
}

impl SynthcamError {
    pub fn system<S: Into<String>>(message: S) -> Self {
        Self::System {
            message: message.into(),
        }
    }
}

/// Failures while locating or decoding a still image
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("no candidate image found (tried {tried} paths)")]
    NotFound { tried: usize },

    #[error("bad bitmap signature {found:02x?}")]
    BadSignature { found: [u8; 2] },

    #[error("unsupported source bit depth: {0}")]
    UnsupportedDepth(u16),

    #[error("unsupported bitmap compression: {0}")]
    UnsupportedCompression(u32),

    #[error("unsupported destination pixel format: {0}")]
    UnsupportedFormat(u16),

    #[error("invalid bitmap dimensions {width}x{height}")]
    BadDimensions { width: i32, height: i32 },

    #[error("bitmap truncated: {details}")]
    Truncated { details: String },

    #[error("plane allocation of {bytes} bytes failed")]
    Allocation { bytes: usize },

    #[error("file store error on {path}: {details}")]
    Io { path: String, details: String },
}

/// Failures reported by the interception layer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InterceptError {
    #[error("failed to install hook for {export} (code {code:#x})")]
    Install { export: &'static str, code: i32 },

    #[error("no hook installed for {0}")]
    NotInstalled(&'static str),
}

pub type Result<T> = std::result::Result<T, SynthcamError>;
