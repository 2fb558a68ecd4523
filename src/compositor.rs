//! Blits a decoded still image into caller-owned destination planes,
//! cropping or letterboxing according to a pan-rate pair.

use crate::image::{DecodedImage, Plane};
use crate::orientation::PanRates;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{trace, warn};

/// Destination plane memory shared between the caller and the camera
pub type SharedPlane = Arc<Mutex<Vec<u8>>>;

/// Allocate a zeroed shared plane of `len` bytes
pub fn shared_plane(len: usize) -> SharedPlane {
    Arc::new(Mutex::new(vec![0; len]))
}

/// Placement of the overlap along one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisPlacement {
    /// First source texel/row copied
    pub src_offset: usize,
    /// First destination texel/row written
    pub dst_offset: usize,
    /// Number of texels/rows copied
    pub span: usize,
}

/// Place a source extent inside a destination extent.
///
/// `rate` in [-1, 1] slides the window across the slack; the larger side
/// is the one that gets offset.
pub fn place_axis(src: usize, dst: usize, rate: f32) -> AxisPlacement {
    let slack = src.abs_diff(dst);
    let rate = if rate.is_nan() { 0.0 } else { rate.clamp(-1.0, 1.0) };
    let offset = (((1.0 + rate) / 2.0 * slack as f32) as usize).min(slack);

    let (src_offset, dst_offset) = if src > dst { (offset, 0) } else { (0, offset) };

    AxisPlacement {
        src_offset,
        dst_offset,
        span: src.min(dst),
    }
}

/// Horizontal and vertical placement for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropGeometry {
    pub columns: AxisPlacement,
    pub rows: AxisPlacement,
}

impl CropGeometry {
    pub fn compute(
        src_width: usize,
        src_height: usize,
        dst_width: usize,
        dst_height: usize,
        pan: PanRates,
    ) -> Self {
        Self {
            columns: place_axis(src_width, dst_width, pan.width),
            rows: place_axis(src_height, dst_height, pan.height),
        }
    }
}

/// Writes still-image frames into destination planes
#[derive(Debug, Default, Clone, Copy)]
pub struct FrameCompositor;

impl FrameCompositor {
    pub fn new() -> Self {
        Self
    }

    /// Composite `source` into up to three destination planes.
    ///
    /// Planes without a source or destination buffer are skipped. Returns
    /// how many planes were written.
    pub fn composite(
        &self,
        source: &DecodedImage,
        dest: &[Option<SharedPlane>; 3],
        dest_width: usize,
        dest_height: usize,
        pan: PanRates,
    ) -> usize {
        let geometry = CropGeometry::compute(
            source.width() as usize,
            source.height() as usize,
            dest_width,
            dest_height,
            pan,
        );
        trace!("Crop geometry: {:?}", geometry);

        let mut written = 0;
        for (index, target) in dest.iter().enumerate() {
            let (Some(plane), Some(target)) = (source.plane(index), target) else {
                continue;
            };
            let mut buffer = target.lock();
            if self.blit_plane(plane, &mut buffer, dest_width, dest_height, &geometry) {
                written += 1;
            }
        }
        written
    }

    /// Copy one plane, zero-filling everything outside the overlap
    pub fn blit_plane(
        &self,
        plane: &Plane,
        buffer: &mut [u8],
        dest_width: usize,
        dest_height: usize,
        geometry: &CropGeometry,
    ) -> bool {
        let texel = plane.bytes_per_texel();
        let stride = dest_width * texel;
        if stride == 0 || texel == 0 {
            return false;
        }

        let rows = dest_height.min(buffer.len() / stride);
        if rows < dest_height {
            warn!(
                "Destination plane holds {} of {} rows, compositing what fits",
                rows, dest_height
            );
        }

        let lead = geometry.columns.dst_offset * texel;
        let copy_len = geometry.columns.span * texel;
        let src_start = geometry.columns.src_offset * texel;
        let row_window = geometry.rows.dst_offset..geometry.rows.dst_offset + geometry.rows.span;

        for (y, row) in buffer.chunks_exact_mut(stride).take(rows).enumerate() {
            if !row_window.contains(&y) {
                row.fill(0);
                continue;
            }

            let source_y = y - geometry.rows.dst_offset + geometry.rows.src_offset;
            let Some(source_row) = plane.row(source_y) else {
                row.fill(0);
                continue;
            };

            row[..lead].fill(0);
            row[lead..lead + copy_len].copy_from_slice(&source_row[src_start..src_start + copy_len]);
            row[lead + copy_len..].fill(0);
        }

        true
    }
}
