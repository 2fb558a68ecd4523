use super::params::ParameterStore;
use crate::compositor::SharedPlane;
use crate::format::ResolutionClass;
use crate::image::DecodedImage;
use tracing::{debug, info};

/// Lifecycle of one synthetic camera
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    Closed,
    Opened,
    Active,
}

/// Configuration captured when a device is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenConfig {
    pub format: u16,
    pub resolution: ResolutionClass,
    pub frame_rate: u16,
    pub width: u32,
    pub height: u32,
}

/// Synthetic frame id and timestamp for one read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStamp {
    pub frame: u64,
    pub timestamp: u64,
}

/// State of one physical camera index
#[derive(Debug)]
pub struct CameraDevice {
    devnum: usize,
    state: DeviceState,
    config: Option<OpenConfig>,
    open_buffers: [Option<SharedPlane>; 3],
    init_timestamp: u64,
    prev_timestamp: u64,
    pub params: ParameterStore,
    pub image: DecodedImage,
}

impl CameraDevice {
    pub fn new(devnum: usize) -> Self {
        Self {
            devnum,
            state: DeviceState::Closed,
            config: None,
            open_buffers: [None, None, None],
            init_timestamp: 0,
            prev_timestamp: 0,
            params: ParameterStore::new(),
            image: DecodedImage::unloaded(),
        }
    }

    pub fn devnum(&self) -> usize {
        self.devnum
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == DeviceState::Active
    }

    pub fn config(&self) -> Option<&OpenConfig> {
        self.config.as_ref()
    }

    pub fn open_buffers(&self) -> &[Option<SharedPlane>; 3] {
        &self.open_buffers
    }

    pub fn prev_timestamp(&self) -> u64 {
        self.prev_timestamp
    }

    /// Closed -> Opened. Returns false when the device was not closed.
    pub fn open(&mut self, config: OpenConfig, open_buffers: [Option<SharedPlane>; 3]) -> bool {
        if self.state != DeviceState::Closed {
            debug!(
                "Camera {} already {:?}, ignoring open",
                self.devnum, self.state
            );
            return false;
        }

        info!(
            "Camera {} opened: {}x{} format {} at {} fps",
            self.devnum, config.width, config.height, config.format, config.frame_rate
        );
        self.config = Some(config);
        self.open_buffers = open_buffers;
        self.state = DeviceState::Opened;
        true
    }

    /// Any state -> Closed
    pub fn close(&mut self) {
        if self.state != DeviceState::Closed {
            info!("Camera {} closed", self.devnum);
        }
        self.config = None;
        self.open_buffers = [None, None, None];
        self.state = DeviceState::Closed;
    }

    /// Opened -> Active, restarting the frame clock at `now`
    pub fn start(&mut self, now: u64) -> bool {
        if self.state != DeviceState::Opened {
            return false;
        }
        self.init_timestamp = now;
        self.prev_timestamp = now;
        self.state = DeviceState::Active;
        info!("Camera {} started", self.devnum);
        true
    }

    /// Active -> Opened; a closed device stays closed
    pub fn stop(&mut self) {
        if self.state == DeviceState::Active {
            self.state = DeviceState::Opened;
            info!("Camera {} stopped", self.devnum);
        }
    }

    /// Frame id and timestamp for a read at `now`.
    ///
    /// The timestamp is the midpoint between this read and the previous
    /// one; the frame id scales the elapsed time by the frame rate with a
    /// 22-bit fixed-point shift.
    pub fn next_frame(&mut self, now: u64) -> Option<FrameStamp> {
        if self.state != DeviceState::Active {
            return None;
        }
        let frame_rate = self.config.map_or(0, |c| u64::from(c.frame_rate));

        let now = now.max(self.prev_timestamp);
        let timestamp = now / 2 + self.prev_timestamp / 2 + (now & self.prev_timestamp & 1);
        let elapsed = timestamp.saturating_sub(self.init_timestamp);
        let frame = (elapsed.wrapping_mul(frame_rate) >> 22) + 1;

        self.prev_timestamp = now;
        Some(FrameStamp { frame, timestamp })
    }
}
