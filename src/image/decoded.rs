/// Load state of a device's still image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageStatus {
    Unloaded,
    Loaded,
    Failed,
}

/// One decoded pixel plane
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plane {
    /// Bits per texel (16, 24 or 32)
    pub bit_depth: u8,
    /// Bytes between the starts of consecutive rows
    pub stride: usize,
    pub data: Vec<u8>,
}

impl Plane {
    pub fn bytes_per_texel(&self) -> usize {
        usize::from(self.bit_depth / 8)
    }

    pub fn row(&self, y: usize) -> Option<&[u8]> {
        let start = y.checked_mul(self.stride)?;
        self.data.get(start..start + self.stride)
    }
}

/// Still image decoded into the planes of one capture format.
///
/// The image is only reusable while the device keeps requesting the same
/// format code; anything else is a reload.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    width: u32,
    height: u32,
    format_code: Option<u16>,
    planes: [Option<Plane>; 3],
    status: ImageStatus,
}

impl DecodedImage {
    pub fn unloaded() -> Self {
        Self {
            width: 0,
            height: 0,
            format_code: None,
            planes: [None, None, None],
            status: ImageStatus::Unloaded,
        }
    }

    pub fn status(&self) -> ImageStatus {
        self.status
    }

    pub fn is_loaded(&self) -> bool {
        self.status == ImageStatus::Loaded
    }

    /// True when a loaded image exists for exactly this format code
    pub fn is_current_for(&self, format_code: u16) -> bool {
        self.is_loaded() && self.format_code == Some(format_code)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format_code(&self) -> Option<u16> {
        self.format_code
    }

    pub fn plane(&self, index: usize) -> Option<&Plane> {
        self.planes.get(index).and_then(Option::as_ref)
    }

    pub fn planes(&self) -> &[Option<Plane>; 3] {
        &self.planes
    }

    pub(crate) fn set_loaded(
        &mut self,
        width: u32,
        height: u32,
        format_code: u16,
        planes: [Option<Plane>; 3],
    ) {
        self.width = width;
        self.height = height;
        self.format_code = Some(format_code);
        self.planes = planes;
        self.status = ImageStatus::Loaded;
    }

    /// Record a failed load, releasing whatever planes were held
    pub(crate) fn set_failed(&mut self, format_code: u16) {
        self.width = 0;
        self.height = 0;
        self.format_code = Some(format_code);
        self.planes = [None, None, None];
        self.status = ImageStatus::Failed;
    }
}

impl Default for DecodedImage {
    fn default() -> Self {
        Self::unloaded()
    }
}
