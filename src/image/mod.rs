mod bitmap;
mod decoded;
mod loader;
#[cfg(test)]
mod tests;

pub use bitmap::{decode_bitmap, BitmapHeader, BITMAP_HEADER_LEN, BITMAP_SIGNATURE};
pub use decoded::{DecodedImage, ImageStatus, Plane};
pub use loader::{CameraPosition, StillImageLoader};
