//! In-memory collaborators for running the synthetic camera without
//! hardware.

use crate::camera::CAMERA_ERROR_NOT_MOUNTED;
use crate::error::ImageError;
use crate::hooks::{CameraCall, EntryPoint, HookHandle, Interceptor};
use crate::image::BITMAP_HEADER_LEN;
use crate::platform::{Clock, FileHandle, FileStore, MotionSample, MotionSensor};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start)),
        }
    }

    pub fn advance(&self, micros: u64) {
        self.now.fetch_add(micros, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Motion sensor returning the same sample every time
#[derive(Debug, Clone, Default)]
pub struct FixedMotionSensor {
    sample: Option<MotionSample>,
}

impl FixedMotionSensor {
    pub fn new(accel: [f32; 3]) -> Self {
        Self {
            sample: Some(MotionSample {
                accel,
                gyro: [0.0; 3],
            }),
        }
    }
}

impl MotionSensor for FixedMotionSensor {
    fn sample(&mut self, _rate_hz: u32) -> Option<MotionSample> {
        self.sample
    }
}

/// File store over named in-memory byte vectors
#[derive(Debug, Default)]
pub struct MemoryFileStore {
    files: HashMap<String, Vec<u8>>,
    open: HashMap<FileHandle, (String, usize)>,
    next_handle: u32,
    opens: usize,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<S: Into<String>>(&mut self, path: S, bytes: Vec<u8>) {
        self.files.insert(path.into(), bytes);
    }

    /// Number of successful opens so far
    pub fn open_count(&self) -> usize {
        self.opens
    }

    /// Handles that were opened and not closed
    pub fn open_handles(&self) -> usize {
        self.open.len()
    }

    fn missing(handle: FileHandle) -> ImageError {
        ImageError::Io {
            path: format!("handle {}", handle.0),
            details: "handle is not open".to_string(),
        }
    }
}

impl FileStore for MemoryFileStore {
    fn open(&mut self, path: &str) -> Result<FileHandle, ImageError> {
        if !self.files.contains_key(path) {
            return Err(ImageError::Io {
                path: path.to_string(),
                details: "no such file".to_string(),
            });
        }
        self.next_handle += 1;
        let handle = FileHandle(self.next_handle);
        self.open.insert(handle, (path.to_string(), 0));
        self.opens += 1;
        Ok(handle)
    }

    fn read(&mut self, handle: FileHandle, buf: &mut [u8]) -> Result<usize, ImageError> {
        let (path, position) = self.open.get_mut(&handle).ok_or_else(|| Self::missing(handle))?;
        let data = self.files.get(path.as_str()).map(Vec::as_slice).unwrap_or_default();
        let remaining = data.get(*position..).unwrap_or_default();
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        *position += n;
        Ok(n)
    }

    fn seek(&mut self, handle: FileHandle, offset: u64) -> Result<(), ImageError> {
        let (_, position) = self.open.get_mut(&handle).ok_or_else(|| Self::missing(handle))?;
        *position = usize::try_from(offset).unwrap_or(usize::MAX);
        Ok(())
    }

    fn close(&mut self, handle: FileHandle) {
        self.open.remove(&handle);
    }
}

/// Interceptor whose "original" implementations return scripted results
#[derive(Debug)]
pub struct ScriptedInterceptor {
    default_result: i32,
    results: HashMap<EntryPoint, i32>,
    failing_installs: HashSet<EntryPoint>,
    installed: HashMap<HookHandle, EntryPoint>,
    calls: Vec<EntryPoint>,
    uninstalled: Vec<EntryPoint>,
    next_handle: i32,
}

impl ScriptedInterceptor {
    /// Every original call fails as if no camera were mounted
    pub fn absent_driver() -> Self {
        Self::with_default(CAMERA_ERROR_NOT_MOUNTED)
    }

    /// Every original call succeeds with `0`
    pub fn working_driver() -> Self {
        Self::with_default(0)
    }

    pub fn with_default(default_result: i32) -> Self {
        Self {
            default_result,
            results: HashMap::new(),
            failing_installs: HashSet::new(),
            installed: HashMap::new(),
            calls: Vec::new(),
            uninstalled: Vec::new(),
            next_handle: 1,
        }
    }

    /// Script the original result of one entry point
    pub fn returning(mut self, entry: EntryPoint, result: i32) -> Self {
        self.results.insert(entry, result);
        self
    }

    /// Make installing `entry` fail
    pub fn failing_install(mut self, entry: EntryPoint) -> Self {
        self.failing_installs.insert(entry);
        self
    }

    pub fn calls(&self) -> &[EntryPoint] {
        &self.calls
    }

    pub fn installed_count(&self) -> usize {
        self.installed.len()
    }

    pub fn uninstalled(&self) -> &[EntryPoint] {
        &self.uninstalled
    }
}

impl Interceptor for ScriptedInterceptor {
    fn install(&mut self, _library_nid: u32, entry: EntryPoint) -> HookHandle {
        if self.failing_installs.contains(&entry) {
            return HookHandle(CAMERA_ERROR_NOT_MOUNTED);
        }
        let handle = HookHandle(self.next_handle);
        self.next_handle += 1;
        self.installed.insert(handle, entry);
        handle
    }

    fn call_through(&mut self, handle: HookHandle, call: &mut CameraCall<'_>) -> i32 {
        let entry = self
            .installed
            .get(&handle)
            .copied()
            .unwrap_or_else(|| call.entry_point());
        self.calls.push(entry);
        let result = self.results.get(&entry).copied().unwrap_or(self.default_result);
        debug!("Original {} on camera {} -> {:#x}", entry.name(), call.devnum(), result);
        result
    }

    fn uninstall(&mut self, handle: HookHandle) {
        if let Some(entry) = self.installed.remove(&handle) {
            self.uninstalled.push(entry);
        }
    }
}

/// Encode a bottom-up bitmap. `pixel(x, y)` yields RGBA with `y = 0` at the
/// top of the picture.
pub fn encode_bitmap<F>(width: u32, height: u32, bit_depth: u16, pixel: F) -> Vec<u8>
where
    F: Fn(u32, u32) -> [u8; 4],
{
    let stride = (width as usize * usize::from(bit_depth)).div_ceil(32) * 4;
    let image_len = stride * height as usize;
    let file_len = BITMAP_HEADER_LEN + image_len;

    let mut bytes = Vec::with_capacity(file_len);
    bytes.extend_from_slice(b"BM");
    bytes.extend_from_slice(&(file_len as u32).to_le_bytes());
    bytes.extend_from_slice(&[0; 4]);
    bytes.extend_from_slice(&(BITMAP_HEADER_LEN as u32).to_le_bytes());
    bytes.extend_from_slice(&40u32.to_le_bytes());
    bytes.extend_from_slice(&(width as i32).to_le_bytes());
    bytes.extend_from_slice(&(height as i32).to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&bit_depth.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&(image_len as u32).to_le_bytes());
    bytes.extend_from_slice(&[0; 16]);

    for row in (0..height).rev() {
        let start = bytes.len();
        for x in 0..width {
            let [r, g, b, a] = pixel(x, row);
            match bit_depth {
                16 => {
                    let value =
                        (u16::from(r >> 3) << 11) | (u16::from(g >> 2) << 5) | u16::from(b >> 3);
                    bytes.extend_from_slice(&value.to_le_bytes());
                }
                24 => bytes.extend_from_slice(&[b, g, r]),
                _ => bytes.extend_from_slice(&[b, g, r, a]),
            }
        }
        bytes.resize(start + stride, 0);
    }

    bytes
}
