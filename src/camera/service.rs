use super::device::{CameraDevice, DeviceState, OpenConfig};
use super::params::ParameterKind;
use super::registry::DeviceRegistry;
use super::types::{BufferMode, CameraInfo, CameraRead, DeviceLocation};
use crate::compositor::{FrameCompositor, SharedPlane};
use crate::config::SynthcamConfig;
use crate::error::{Result, SynthcamError};
use crate::format::ResolutionClass;
use crate::hooks::CameraCall;
use crate::image::{CameraPosition, StillImageLoader};
use crate::orientation::OrientationEstimator;
use crate::platform::{Clock, FileStore, MonotonicClock, MotionSensor, NoMotionSensor};
use tracing::{debug, trace, warn};

/// Fallback camera behind every intercepted entry point.
///
/// Each handler receives the result the original driver returned and only
/// substitutes its own when that result is a failure, so a working camera
/// is never altered.
pub struct SyntheticCamera {
    config: SynthcamConfig,
    loader: StillImageLoader,
    registry: DeviceRegistry,
    compositor: FrameCompositor,
    orientation: OrientationEstimator,
    clock: Box<dyn Clock>,
    motion: Box<dyn MotionSensor>,
    files: Box<dyn FileStore>,
}

impl SyntheticCamera {
    pub fn builder() -> SyntheticCameraBuilder {
        SyntheticCameraBuilder::new()
    }

    pub fn config(&self) -> &SynthcamConfig {
        &self.config
    }

    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    pub fn device(&self, devnum: i32) -> Option<&CameraDevice> {
        self.registry.get(devnum)
    }

    /// Route one intercepted call to its handler
    pub fn handle(&mut self, call: &mut CameraCall<'_>, original: i32) -> i32 {
        match call {
            CameraCall::Open { devnum, info } => self.open(*devnum, info.as_deref_mut(), original),
            CameraCall::Close { devnum } => self.close(*devnum, original),
            CameraCall::Start { devnum } => self.start(*devnum, original),
            CameraCall::Stop { devnum } => self.stop(*devnum, original),
            CameraCall::Read { devnum, read } => self.read(*devnum, read.as_deref_mut(), original),
            CameraCall::IsActive { devnum } => self.is_active(*devnum, original),
            CameraCall::GetDeviceLocation { devnum, location } => {
                self.get_device_location(*devnum, location.as_deref_mut(), original)
            }
            CameraCall::GetParameter {
                devnum,
                kind,
                value,
            } => self.get_parameter(*devnum, *kind, value.as_deref_mut(), original),
            CameraCall::SetParameter {
                devnum,
                kind,
                value,
            } => self.set_parameter(*devnum, *kind, *value, original),
        }
    }

    pub fn open(&mut self, devnum: i32, info: Option<&mut CameraInfo>, original: i32) -> i32 {
        let (Some(device), Some(info)) = (self.registry.get_mut(devnum), info) else {
            return original;
        };

        if device.state() != DeviceState::Closed {
            debug!("Open on camera {} ignored in state {:?}", devnum, device.state());
            return original;
        }

        let Some(resolution) = ResolutionClass::from_code(info.resolution) else {
            warn!(
                "Camera {} open rejected: unknown resolution class {}",
                devnum, info.resolution
            );
            return original;
        };

        let (width, height) = resolution.dimensions();
        let frame_rate = if info.framerate == 0 {
            self.config.camera.frame_rate_fallback
        } else {
            info.framerate
        };
        let open_buffers = match info.buffer {
            BufferMode::SetByOpen => info.planes.clone(),
            BufferMode::SetByRead => [None, None, None],
        };

        device.open(
            OpenConfig {
                format: info.format,
                resolution,
                frame_rate,
                width,
                height,
            },
            open_buffers,
        );

        if self.config.camera.compositing && !device.image.is_current_for(info.format) {
            if let Some(position) = CameraPosition::from_devnum(device.devnum()) {
                self.loader.load(
                    self.files.as_mut(),
                    position,
                    info.format,
                    &self.config.image.app_id,
                    &mut device.image,
                );
            }
        }

        if original < 0 {
            info.width = width as u16;
            info.height = height as u16;
            return 0;
        }
        original
    }

    pub fn close(&mut self, devnum: i32, original: i32) -> i32 {
        let Some(device) = self.registry.get_mut(devnum) else {
            return original;
        };
        device.close();
        original.max(0)
    }

    pub fn start(&mut self, devnum: i32, original: i32) -> i32 {
        let Some(device) = self.registry.get_mut(devnum) else {
            return original;
        };
        match device.state() {
            DeviceState::Closed => {
                debug!("Start on closed camera {} ignored", devnum);
                original
            }
            DeviceState::Opened => {
                device.start(self.clock.now());
                original.max(0)
            }
            DeviceState::Active => original.max(0),
        }
    }

    pub fn stop(&mut self, devnum: i32, original: i32) -> i32 {
        let Some(device) = self.registry.get_mut(devnum) else {
            return original;
        };
        device.stop();
        original.max(0)
    }

    pub fn read(&mut self, devnum: i32, read: Option<&mut CameraRead>, original: i32) -> i32 {
        let (Some(device), Some(read)) = (self.registry.get_mut(devnum), read) else {
            return original;
        };
        // the frame clock advances on every active read, even ones passed through
        let Some(stamp) = device.next_frame(self.clock.now()) else {
            return original;
        };
        if !read.layout_is_consistent() {
            warn!(
                "Camera {} read structure size {} does not match its layout",
                devnum, read.size
            );
            return original;
        }
        if original >= 0 {
            return original;
        }

        read.frame = stamp.frame;
        read.timestamp = stamp.timestamp;
        read.status = 0;
        trace!(
            "Camera {} synthetic frame {} at {}",
            devnum,
            stamp.frame,
            stamp.timestamp
        );

        if self.config.camera.compositing && device.image.is_loaded() {
            let per_read = read.layout.planes();
            let dest: [Option<SharedPlane>; 3] = std::array::from_fn(|i| {
                device.open_buffers()[i]
                    .clone()
                    .or_else(|| per_read[i].clone())
            });

            let sample = self.motion.sample(self.config.camera.sensor_rate_hz);
            let pan = self.orientation.pan_rates(sample.as_ref());
            if let Some(config) = device.config() {
                let written = self.compositor.composite(
                    &device.image,
                    &dest,
                    config.width as usize,
                    config.height as usize,
                    pan,
                );
                if written == 0 {
                    debug!("Camera {} read had no usable destination planes", devnum);
                }
            }
        }

        0
    }

    pub fn is_active(&mut self, devnum: i32, original: i32) -> i32 {
        match self.registry.get(devnum) {
            Some(device) if original <= 0 => i32::from(device.is_active()),
            _ => original,
        }
    }

    pub fn get_device_location(
        &mut self,
        devnum: i32,
        location: Option<&mut DeviceLocation>,
        original: i32,
    ) -> i32 {
        if self.registry.get(devnum).is_some() && location.is_some() && original < 0 {
            return 0;
        }
        original
    }

    pub fn get_parameter(
        &mut self,
        devnum: i32,
        kind: ParameterKind,
        value: Option<&mut i32>,
        original: i32,
    ) -> i32 {
        let (Some(device), Some(value)) = (self.registry.get(devnum), value) else {
            return original;
        };
        if original >= 0 {
            return original;
        }
        *value = device.params.get(kind);
        0
    }

    pub fn set_parameter(
        &mut self,
        devnum: i32,
        kind: ParameterKind,
        value: i32,
        original: i32,
    ) -> i32 {
        let Some(device) = self.registry.get_mut(devnum) else {
            return original;
        };
        if original >= 0 {
            return original;
        }
        debug!("Camera {} {} = {}", devnum, kind.name(), value);
        device.params.set(kind, value);
        0
    }
}

/// Builder for [`SyntheticCamera`]
pub struct SyntheticCameraBuilder {
    config: Option<SynthcamConfig>,
    clock: Option<Box<dyn Clock>>,
    motion: Option<Box<dyn MotionSensor>>,
    files: Option<Box<dyn FileStore>>,
}

impl SyntheticCameraBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            clock: None,
            motion: None,
            files: None,
        }
    }

    pub fn config(mut self, config: SynthcamConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    pub fn motion_sensor<M: MotionSensor + 'static>(mut self, motion: M) -> Self {
        self.motion = Some(Box::new(motion));
        self
    }

    pub fn file_store<F: FileStore + 'static>(mut self, files: F) -> Self {
        self.files = Some(Box::new(files));
        self
    }

    pub fn build(self) -> Result<SyntheticCamera> {
        let config = self
            .config
            .ok_or_else(|| SynthcamError::system("Camera configuration must be specified"))?;
        let files = self
            .files
            .ok_or_else(|| SynthcamError::system("File store must be specified"))?;

        Ok(SyntheticCamera {
            loader: StillImageLoader::new(&config.image),
            registry: DeviceRegistry::new(),
            compositor: FrameCompositor::new(),
            orientation: OrientationEstimator::new(),
            clock: self.clock.unwrap_or_else(|| Box::new(MonotonicClock::new())),
            motion: self.motion.unwrap_or_else(|| Box::new(NoMotionSensor)),
            files,
            config,
        })
    }
}

impl Default for SyntheticCameraBuilder {
    fn default() -> Self {
        Self::new()
    }
}
