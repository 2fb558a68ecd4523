mod device;
mod params;
mod registry;
mod service;
mod types;

pub use device::{CameraDevice, DeviceState, FrameStamp, OpenConfig};
pub use params::{ParameterKind, ParameterStore};
pub use registry::DeviceRegistry;
pub use service::{SyntheticCamera, SyntheticCameraBuilder};
pub use types::*;
