//! Windows bitmap decoding into capture-format planes.

use super::decoded::Plane;
use crate::error::ImageError;
use crate::format::PlaneLayoutSpec;
use crate::platform::{FileHandle, FileStore};
use tracing::trace;

pub const BITMAP_SIGNATURE: [u8; 2] = *b"BM";

/// File header plus the 40-byte info header
pub const BITMAP_HEADER_LEN: usize = 54;

const INFO_HEADER_MIN_LEN: u32 = 40;
const COMPRESSION_RGB: u32 = 0;
const COMPRESSION_BITFIELDS: u32 = 3;

/// Fields of the bitmap headers the decoder relies on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapHeader {
    pub data_offset: u32,
    pub width: u32,
    pub height: u32,
    /// Rows are stored top row first (negative height in the file)
    pub top_down: bool,
    pub bit_depth: u16,
    pub compression: u32,
}

impl BitmapHeader {
    pub fn parse(bytes: &[u8; BITMAP_HEADER_LEN]) -> Result<Self, ImageError> {
        let signature = [bytes[0], bytes[1]];
        if signature != BITMAP_SIGNATURE {
            return Err(ImageError::BadSignature { found: signature });
        }

        let u16_at = |at: usize| u16::from_le_bytes([bytes[at], bytes[at + 1]]);
        let u32_at = |at: usize| {
            u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
        };
        let i32_at = |at: usize| {
            i32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
        };

        let data_offset = u32_at(10);
        let info_len = u32_at(14);
        if info_len < INFO_HEADER_MIN_LEN {
            return Err(ImageError::Truncated {
                details: format!("info header of {} bytes", info_len),
            });
        }

        let raw_width = i32_at(18);
        let raw_height = i32_at(22);
        if raw_width <= 0 || raw_height == 0 || raw_height == i32::MIN {
            return Err(ImageError::BadDimensions {
                width: raw_width,
                height: raw_height,
            });
        }

        let bit_depth = u16_at(28);
        if !matches!(bit_depth, 16 | 24 | 32) {
            return Err(ImageError::UnsupportedDepth(bit_depth));
        }

        let compression = u32_at(30);
        let compression_ok = compression == COMPRESSION_RGB
            || (compression == COMPRESSION_BITFIELDS && bit_depth != 24);
        if !compression_ok {
            return Err(ImageError::UnsupportedCompression(compression));
        }

        Ok(Self {
            data_offset,
            width: raw_width.unsigned_abs(),
            height: raw_height.unsigned_abs(),
            top_down: raw_height < 0,
            bit_depth,
            compression,
        })
    }

    /// Source row length, padded to a 4-byte boundary
    pub fn source_stride(&self) -> usize {
        let bits = self.width as usize * usize::from(self.bit_depth);
        bits.div_ceil(32) * 4
    }

    /// Only 32-bit bitfield sources carry alpha; in plain RGB the fourth byte is padding
    pub fn has_alpha(&self) -> bool {
        self.bit_depth == 32 && self.compression == COMPRESSION_BITFIELDS
    }
}

/// Expand one source texel into an RGBA quadruple
fn source_texel(bit_depth: u16, has_alpha: bool, bytes: &[u8]) -> [u8; 4] {
    match bit_depth {
        16 => {
            let value = u16::from_le_bytes([bytes[0], bytes[1]]);
            let r = ((value >> 11) & 0x1f) as u8;
            let g = ((value >> 5) & 0x3f) as u8;
            let b = (value & 0x1f) as u8;
            [(r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2), 0xff]
        }
        24 => [bytes[2], bytes[1], bytes[0], 0xff],
        _ if has_alpha => [bytes[2], bytes[1], bytes[0], bytes[3]],
        _ => [bytes[2], bytes[1], bytes[0], 0xff],
    }
}

fn allocate_plane(bytes: usize) -> Result<Vec<u8>, ImageError> {
    let mut data = Vec::new();
    data.try_reserve_exact(bytes)
        .map_err(|_| ImageError::Allocation { bytes })?;
    data.resize(bytes, 0);
    Ok(data)
}

/// Decode an open bitmap into planes laid out per `layout`.
///
/// Returns `(width, height, planes)`. Partially built planes are dropped on
/// any error.
pub fn decode_bitmap(
    files: &mut dyn FileStore,
    handle: FileHandle,
    layout: &PlaneLayoutSpec,
    max_dimension: u32,
) -> Result<(u32, u32, [Option<Plane>; 3]), ImageError> {
    let mut header_bytes = [0u8; BITMAP_HEADER_LEN];
    files.read_exact(handle, &mut header_bytes)?;
    let header = BitmapHeader::parse(&header_bytes)?;

    trace!(
        "Bitmap header: {}x{} @ {} bpp, data at {}",
        header.width,
        header.height,
        header.bit_depth,
        header.data_offset
    );

    let (width, height) = (header.width as usize, header.height as usize);
    if header.width > max_dimension || header.height > max_dimension {
        return Err(ImageError::Allocation {
            bytes: width.saturating_mul(height).saturating_mul(4),
        });
    }

    let mut planes: [Option<Plane>; 3] = [None, None, None];
    for (slot, spec) in planes.iter_mut().zip(layout.planes.iter()) {
        if let Some(spec) = spec {
            let stride = width * spec.bytes_per_texel();
            *slot = Some(Plane {
                bit_depth: spec.bit_depth,
                stride,
                data: allocate_plane(stride * height)?,
            });
        }
    }

    files.seek(handle, u64::from(header.data_offset))?;

    let texel_len = usize::from(header.bit_depth / 8);
    let has_alpha = header.has_alpha();
    let mut row = vec![0u8; header.source_stride()];
    for source_y in 0..height {
        files.read_exact(handle, &mut row)?;
        let dest_y = if header.top_down {
            source_y
        } else {
            height - 1 - source_y
        };

        for (x, texel) in row.chunks_exact(texel_len).take(width).enumerate() {
            let rgba = source_texel(header.bit_depth, has_alpha, texel);
            for (plane, spec) in planes.iter_mut().zip(layout.planes.iter()) {
                if let (Some(plane), Some(spec)) = (plane.as_mut(), spec) {
                    let bpt = spec.bytes_per_texel();
                    let at = dest_y * plane.stride + x * bpt;
                    spec.pack(rgba, &mut plane.data[at..at + bpt]);
                }
            }
        }
    }

    Ok((header.width, header.height, planes))
}
