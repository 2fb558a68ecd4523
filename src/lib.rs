pub mod camera;
pub mod compositor;
pub mod config;
pub mod error;
pub mod format;
pub mod hooks;
pub mod image;
pub mod mock;
pub mod orientation;
pub mod platform;

pub use camera::{
    CameraDevice, CameraInfo, CameraRead, DeviceLocation, DeviceRegistry, DeviceState,
    FrameBufferLayout, ParameterKind, ParameterStore, SyntheticCamera, SyntheticCameraBuilder,
};
pub use compositor::{shared_plane, CropGeometry, FrameCompositor, SharedPlane};
pub use config::SynthcamConfig;
pub use error::{ImageError, InterceptError, Result, SynthcamError};
pub use format::{PixelFormat, ResolutionClass};
pub use hooks::{CameraCall, EntryPoint, HookHandle, HookSet, Interceptor};
pub use image::{DecodedImage, ImageStatus, StillImageLoader};
pub use orientation::{OrientationEstimator, PanRates};
pub use platform::{Clock, FileStore, MonotonicClock, MotionSample, MotionSensor, StdFileStore};
