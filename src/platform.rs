//! Collaborators the synthetic camera relies on: a monotonic clock, the
//! motion sensor and a small read-only file store.

use crate::error::ImageError;
use std::collections::HashMap;
use std::fs;
use std::io::{Read, Seek, SeekFrom};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, trace};

/// Monotonic, process-relative time source in microseconds
pub trait Clock: Send {
    fn now(&self) -> u64;
}

/// One calibrated sensor reading
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionSample {
    /// Acceleration in g along the sensor's raw axes
    pub accel: [f32; 3],
    /// Angular velocity in rad/s along the sensor's raw axes
    pub gyro: [f32; 3],
}

/// Source of accelerometer/gyroscope samples
pub trait MotionSensor: Send {
    /// Returns `None` when the sensor is unavailable
    fn sample(&mut self, rate_hz: u32) -> Option<MotionSample>;
}

/// Opaque handle returned by [`FileStore::open`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileHandle(pub u32);

/// Minimal named byte resource access
pub trait FileStore: Send {
    fn open(&mut self, path: &str) -> Result<FileHandle, ImageError>;

    /// Read up to `buf.len()` bytes, returning how many were read
    fn read(&mut self, handle: FileHandle, buf: &mut [u8]) -> Result<usize, ImageError>;

    /// Move to an absolute byte offset
    fn seek(&mut self, handle: FileHandle, offset: u64) -> Result<(), ImageError>;

    fn close(&mut self, handle: FileHandle);

    /// Fill `buf` completely or fail with `Truncated`
    fn read_exact(&mut self, handle: FileHandle, buf: &mut [u8]) -> Result<(), ImageError> {
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.read(handle, &mut buf[filled..])?;
            if n == 0 {
                return Err(ImageError::Truncated {
                    details: format!("expected {} bytes, got {}", buf.len(), filled),
                });
            }
            filled += n;
        }
        Ok(())
    }
}

/// Clock backed by [`Instant`], counting from construction
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_micros()).unwrap_or(u64::MAX)
    }
}

/// Motion sensor that is never available
#[derive(Debug, Default)]
pub struct NoMotionSensor;

impl MotionSensor for NoMotionSensor {
    fn sample(&mut self, _rate_hz: u32) -> Option<MotionSample> {
        None
    }
}

/// File store over the host filesystem.
///
/// Paths starting with `prefix` are mapped under `root`; anything else is
/// opened as given.
pub struct StdFileStore {
    prefix: String,
    root: PathBuf,
    open_files: HashMap<FileHandle, fs::File>,
    next_handle: u32,
}

impl StdFileStore {
    pub fn new<S: Into<String>, P: Into<PathBuf>>(prefix: S, root: P) -> Self {
        Self {
            prefix: prefix.into(),
            root: root.into(),
            open_files: HashMap::new(),
            next_handle: 1,
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        match path.strip_prefix(&self.prefix) {
            Some(relative) => self.root.join(relative),
            None => PathBuf::from(path),
        }
    }

    fn file(&mut self, handle: FileHandle) -> Result<&mut fs::File, ImageError> {
        self.open_files.get_mut(&handle).ok_or_else(|| ImageError::Io {
            path: format!("handle {}", handle.0),
            details: "handle is not open".to_string(),
        })
    }
}

impl FileStore for StdFileStore {
    fn open(&mut self, path: &str) -> Result<FileHandle, ImageError> {
        let resolved = self.resolve(path);
        let file = fs::File::open(&resolved).map_err(|e| ImageError::Io {
            path: resolved.display().to_string(),
            details: e.to_string(),
        })?;

        let handle = FileHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        self.open_files.insert(handle, file);
        debug!("Opened {} as handle {}", resolved.display(), handle.0);
        Ok(handle)
    }

    fn read(&mut self, handle: FileHandle, buf: &mut [u8]) -> Result<usize, ImageError> {
        let file = self.file(handle)?;
        file.read(buf).map_err(|e| ImageError::Io {
            path: format!("handle {}", handle.0),
            details: e.to_string(),
        })
    }

    fn seek(&mut self, handle: FileHandle, offset: u64) -> Result<(), ImageError> {
        let file = self.file(handle)?;
        file.seek(SeekFrom::Start(offset))
            .map(|_| ())
            .map_err(|e| ImageError::Io {
                path: format!("handle {}", handle.0),
                details: e.to_string(),
            })
    }

    fn close(&mut self, handle: FileHandle) {
        if self.open_files.remove(&handle).is_some() {
            trace!("Closed handle {}", handle.0);
        }
    }
}
