use crate::compositor::SharedPlane;

/// Number of physical cameras (front, back)
pub const MAX_DEVICES: usize = 2;

// Result codes of the camera API
pub const CAMERA_ERROR_PARAM: i32 = 0x802E_0000_u32 as i32;
pub const CAMERA_ERROR_ALREADY_INIT: i32 = 0x802E_0001_u32 as i32;
pub const CAMERA_ERROR_NOT_INIT: i32 = 0x802E_0002_u32 as i32;
pub const CAMERA_ERROR_ALREADY_OPEN: i32 = 0x802E_0003_u32 as i32;
pub const CAMERA_ERROR_NOT_OPEN: i32 = 0x802E_0004_u32 as i32;
pub const CAMERA_ERROR_ALREADY_START: i32 = 0x802E_0005_u32 as i32;
pub const CAMERA_ERROR_NOT_START: i32 = 0x802E_0006_u32 as i32;
pub const CAMERA_ERROR_FORMAT_UNKNOWN: i32 = 0x802E_0007_u32 as i32;
pub const CAMERA_ERROR_RESOLUTION_UNKNOWN: i32 = 0x802E_0008_u32 as i32;
pub const CAMERA_ERROR_BAD_FRAMERATE: i32 = 0x802E_0009_u32 as i32;
pub const CAMERA_ERROR_TIMEOUT: i32 = 0x802E_000A_u32 as i32;
pub const CAMERA_ERROR_EXCLUSIVE: i32 = 0x802E_000B_u32 as i32;
pub const CAMERA_ERROR_ATTRIBUTE_UNKNOWN: i32 = 0x802E_000C_u32 as i32;
pub const CAMERA_ERROR_MAX_PROCESS: i32 = 0x802E_000D_u32 as i32;
pub const CAMERA_ERROR_NOT_ACTIVE: i32 = 0x802E_000E_u32 as i32;
pub const CAMERA_ERROR_ALREADY_READ: i32 = 0x802E_000F_u32 as i32;
pub const CAMERA_ERROR_NOT_MOUNTED: i32 = 0x802E_0010_u32 as i32;
pub const CAMERA_ERROR_FATAL: i32 = 0x802E_00FF_u32 as i32;

/// Who supplies the destination buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferMode {
    /// Buffers handed over once in the open request
    SetByOpen,
    /// Buffers handed over with every read
    SetByRead,
}

/// Open request, filled in by the driver on success
#[derive(Debug, Clone)]
pub struct CameraInfo {
    pub size: u32,
    pub priority: u16,
    pub format: u16,
    pub resolution: u16,
    pub framerate: u16,
    pub width: u16,
    pub height: u16,
    pub buffer: BufferMode,
    pub planes: [Option<SharedPlane>; 3],
}

impl CameraInfo {
    pub const SIZE: u32 = 64;

    /// Request whose frames are delivered into per-read buffers
    pub fn new(format: u16, resolution: u16, framerate: u16) -> Self {
        Self {
            size: Self::SIZE,
            priority: 0,
            format,
            resolution,
            framerate,
            width: 0,
            height: 0,
            buffer: BufferMode::SetByRead,
            planes: [None, None, None],
        }
    }

    /// Request whose frames always land in `planes`
    pub fn with_open_buffers(
        format: u16,
        resolution: u16,
        framerate: u16,
        planes: [Option<SharedPlane>; 3],
    ) -> Self {
        Self {
            buffer: BufferMode::SetByOpen,
            planes,
            ..Self::new(format, resolution, framerate)
        }
    }
}

/// The two read structure shapes callers use
#[derive(Debug, Clone)]
pub enum FrameBufferLayout {
    /// Single packed plane
    Basic { base: Option<SharedPlane> },
    /// Up to three planes
    Extended { planes: [Option<SharedPlane>; 3] },
}

impl FrameBufferLayout {
    pub fn planes(&self) -> [Option<SharedPlane>; 3] {
        match self {
            FrameBufferLayout::Basic { base } => [base.clone(), None, None],
            FrameBufferLayout::Extended { planes } => planes.clone(),
        }
    }

    /// Structure size a caller declares for this shape
    pub fn expected_size(&self) -> u32 {
        match self {
            FrameBufferLayout::Basic { .. } => 40,
            FrameBufferLayout::Extended { .. } => 56,
        }
    }
}

/// Read request and its results
#[derive(Debug, Clone)]
pub struct CameraRead {
    pub size: u32,
    pub mode: u32,
    pub status: i32,
    pub frame: u64,
    pub timestamp: u64,
    pub layout: FrameBufferLayout,
}

impl CameraRead {
    pub fn basic(base: Option<SharedPlane>) -> Self {
        Self::with_layout(FrameBufferLayout::Basic { base })
    }

    pub fn extended(planes: [Option<SharedPlane>; 3]) -> Self {
        Self::with_layout(FrameBufferLayout::Extended { planes })
    }

    fn with_layout(layout: FrameBufferLayout) -> Self {
        Self {
            size: layout.expected_size(),
            mode: 0,
            status: -1,
            frame: 0,
            timestamp: 0,
            layout,
        }
    }

    /// The declared size must match the shape the caller picked
    pub fn layout_is_consistent(&self) -> bool {
        self.size == self.layout.expected_size()
    }
}

/// Position of a camera on the device body
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DeviceLocation {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}
