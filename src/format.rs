use serde::{Deserialize, Serialize};
use std::fmt;

/// Capture pixel formats understood by the camera API.
///
/// Only the two packed 32-bit orderings can be synthesized; the planar and
/// packed YUV variants exist so that open requests for them can be recognised
/// and refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelFormat {
    /// YUV 4:2:2, three planes
    Yuv422Planar,
    /// YUV 4:2:2, single packed plane
    Yuv422Packed,
    /// YUV 4:2:0, three planes
    Yuv420Planar,
    /// 32-bit packed, `0xAABBGGRR` when read as a little-endian word
    Abgr,
    /// 32-bit packed, `0xAARRGGBB` when read as a little-endian word
    Argb,
    /// Raw sensor data
    Raw8,
}

impl PixelFormat {
    /// Decode the wire code carried in open requests
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            1 => Some(PixelFormat::Yuv422Planar),
            2 => Some(PixelFormat::Yuv422Packed),
            3 => Some(PixelFormat::Yuv420Planar),
            4 => Some(PixelFormat::Abgr),
            5 => Some(PixelFormat::Argb),
            6 => Some(PixelFormat::Raw8),
            _ => None,
        }
    }

    pub fn code(&self) -> u16 {
        match self {
            PixelFormat::Yuv422Planar => 1,
            PixelFormat::Yuv422Packed => 2,
            PixelFormat::Yuv420Planar => 3,
            PixelFormat::Abgr => 4,
            PixelFormat::Argb => 5,
            PixelFormat::Raw8 => 6,
        }
    }

    /// Plane layout used by the loader and the compositor, `None` when the
    /// format cannot be synthesized
    pub fn layout(&self) -> Option<&'static PlaneLayoutSpec> {
        PLANE_LAYOUTS
            .iter()
            .find(|(format, _)| format == self)
            .map(|(_, spec)| spec)
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PixelFormat::Yuv422Planar => "YUV422_PLANE",
            PixelFormat::Yuv422Packed => "YUV422_PACKED",
            PixelFormat::Yuv420Planar => "YUV420_PLANE",
            PixelFormat::Abgr => "ABGR",
            PixelFormat::Argb => "ARGB",
            PixelFormat::Raw8 => "RAW8",
        };
        f.write_str(name)
    }
}

/// Normalized colour channels a converted pixel is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
    Alpha,
}

/// Storage description of one destination plane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaneSpec {
    /// Bits per texel (16, 24 or 32)
    pub bit_depth: u8,
    /// Channel stored at each byte position of a texel
    pub byte_order: &'static [Channel],
}

impl PlaneSpec {
    pub fn bytes_per_texel(&self) -> usize {
        usize::from(self.bit_depth / 8)
    }

    /// Pack one normalized RGBA quadruple into `out`
    pub fn pack(&self, rgba: [u8; 4], out: &mut [u8]) {
        for (slot, channel) in out.iter_mut().zip(self.byte_order) {
            *slot = match channel {
                Channel::Red => rgba[0],
                Channel::Green => rgba[1],
                Channel::Blue => rgba[2],
                Channel::Alpha => rgba[3],
            };
        }
    }
}

/// Up to three planes, in the order the caller's base pointers are given
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaneLayoutSpec {
    pub planes: [Option<PlaneSpec>; 3],
}

const ABGR_ORDER: [Channel; 4] = [Channel::Red, Channel::Green, Channel::Blue, Channel::Alpha];
const ARGB_ORDER: [Channel; 4] = [Channel::Blue, Channel::Green, Channel::Red, Channel::Alpha];

static PLANE_LAYOUTS: [(PixelFormat, PlaneLayoutSpec); 2] = [
    (
        PixelFormat::Abgr,
        PlaneLayoutSpec {
            planes: [
                Some(PlaneSpec {
                    bit_depth: 32,
                    byte_order: &ABGR_ORDER,
                }),
                None,
                None,
            ],
        },
    ),
    (
        PixelFormat::Argb,
        PlaneLayoutSpec {
            planes: [
                Some(PlaneSpec {
                    bit_depth: 32,
                    byte_order: &ARGB_ORDER,
                }),
                None,
                None,
            ],
        },
    ),
];

/// Capture size selector carried in open requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolutionClass {
    Qqvga,
    Qcif,
    Qvga,
    Wqvga,
    Cif,
    Nhd,
}

const RESOLUTIONS: [(u16, ResolutionClass, u32, u32); 6] = [
    (1, ResolutionClass::Qqvga, 160, 120),
    (2, ResolutionClass::Qcif, 176, 144),
    (3, ResolutionClass::Qvga, 320, 240),
    (4, ResolutionClass::Wqvga, 480, 272),
    (5, ResolutionClass::Cif, 352, 288),
    (6, ResolutionClass::Nhd, 640, 360),
];

impl ResolutionClass {
    /// Decode the wire code; unknown classes are rejected
    pub fn from_code(code: u16) -> Option<Self> {
        RESOLUTIONS
            .iter()
            .find(|(c, ..)| *c == code)
            .map(|(_, class, ..)| *class)
    }

    pub fn code(&self) -> u16 {
        self.entry().0
    }

    /// Pixel (width, height) of this class
    pub fn dimensions(&self) -> (u32, u32) {
        let (_, _, width, height) = self.entry();
        (width, height)
    }

    fn entry(&self) -> (u16, ResolutionClass, u32, u32) {
        RESOLUTIONS
            .iter()
            .copied()
            .find(|(_, class, ..)| class == self)
            .unwrap_or(RESOLUTIONS[0])
    }
}
