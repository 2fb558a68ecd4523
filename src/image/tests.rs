use super::*;
use crate::config::ImageConfig;
use crate::error::ImageError;
use crate::format::PixelFormat;
use crate::mock::{encode_bitmap, MemoryFileStore};

const DIR: &str = "ux0:data/synthcam/";

fn loader() -> StillImageLoader {
    StillImageLoader::new(&ImageConfig::default())
}

fn load_into(files: &mut MemoryFileStore, format: u16) -> DecodedImage {
    let mut image = DecodedImage::unloaded();
    loader().load(files, CameraPosition::Front, format, "PCSE00001", &mut image);
    image
}

fn texel(image: &DecodedImage, x: usize, y: usize) -> [u8; 4] {
    let row = image.plane(0).unwrap().row(y).unwrap();
    [row[x * 4], row[x * 4 + 1], row[x * 4 + 2], row[x * 4 + 3]]
}

#[test]
fn test_full_size_image_loads_in_both_formats() {
    let mut files = MemoryFileStore::new();
    files.insert(
        format!("{DIR}ALL.bmp"),
        encode_bitmap(480, 272, 32, |x, y| [(x % 256) as u8, (y % 256) as u8, 7, 200]),
    );

    for format in [PixelFormat::Abgr, PixelFormat::Argb] {
        let image = load_into(&mut files, format.code());
        assert_eq!(image.status(), ImageStatus::Loaded);
        assert_eq!((image.width(), image.height()), (480, 272));
        assert!(image.is_current_for(format.code()));

        let plane = image.plane(0).unwrap();
        assert_eq!(plane.bit_depth, 32);
        assert_eq!(plane.stride, 480 * 4);
        assert_eq!(plane.data.len(), 480 * 272 * 4);
    }
    assert_eq!(files.open_handles(), 0);
}

#[test]
fn test_formats_differ_only_in_byte_order() {
    let mut files = MemoryFileStore::new();
    files.insert(
        format!("{DIR}ALL.bmp"),
        encode_bitmap(2, 1, 32, |_, _| [0x11, 0x22, 0x33, 0x44]),
    );

    let abgr = load_into(&mut files, PixelFormat::Abgr.code());
    let argb = load_into(&mut files, PixelFormat::Argb.code());
    assert_eq!(texel(&abgr, 1, 0), [0x11, 0x22, 0x33, 0xff]);
    assert_eq!(texel(&argb, 1, 0), [0x33, 0x22, 0x11, 0xff]);
}

#[test]
fn test_alpha_kept_only_for_bitfield_sources() {
    let mut padded = encode_bitmap(2, 1, 32, |_, _| [0x11, 0x22, 0x33, 0]);
    let mut files = MemoryFileStore::new();
    files.insert(format!("{DIR}ALL.bmp"), padded.clone());
    let image = load_into(&mut files, PixelFormat::Abgr.code());
    assert_eq!(texel(&image, 0, 0), [0x11, 0x22, 0x33, 0xff]);

    // BI_BITFIELDS
    padded[30] = 3;
    let mut files = MemoryFileStore::new();
    files.insert(format!("{DIR}ALL.bmp"), padded);
    let image = load_into(&mut files, PixelFormat::Abgr.code());
    assert_eq!(texel(&image, 0, 0), [0x11, 0x22, 0x33, 0]);
}

#[test]
fn test_bad_signature_fails_without_planes() {
    let mut bytes = encode_bitmap(4, 4, 32, |_, _| [1, 2, 3, 4]);
    bytes[0] = b'P';
    let mut files = MemoryFileStore::new();
    files.insert(format!("{DIR}ALL.bmp"), bytes);

    let image = load_into(&mut files, PixelFormat::Abgr.code());
    assert_eq!(image.status(), ImageStatus::Failed);
    assert!(image.planes().iter().all(Option::is_none));
    assert_eq!(files.open_handles(), 0);
}

#[test]
fn test_failed_load_releases_previous_planes() {
    let mut files = MemoryFileStore::new();
    files.insert(format!("{DIR}ALL.bmp"), encode_bitmap(4, 4, 32, |_, _| [9; 4]));

    let mut image = DecodedImage::unloaded();
    loader().load(&mut files, CameraPosition::Back, 4, "ALL", &mut image);
    assert!(image.is_loaded());

    loader().load(&mut files, CameraPosition::Back, 1, "ALL", &mut image);
    assert_eq!(image.status(), ImageStatus::Failed);
    assert!(image.plane(0).is_none());
    assert!(!image.is_current_for(4));
}

#[test]
fn test_yuv_formats_fail_fast() {
    let mut files = MemoryFileStore::new();
    files.insert(format!("{DIR}ALL.bmp"), encode_bitmap(4, 4, 32, |_, _| [0; 4]));

    for format in [
        PixelFormat::Yuv422Planar,
        PixelFormat::Yuv422Packed,
        PixelFormat::Yuv420Planar,
    ] {
        let image = load_into(&mut files, format.code());
        assert_eq!(image.status(), ImageStatus::Failed);
    }
    // rejected before touching the file store
    assert_eq!(files.open_count(), 0);
}

#[test]
fn test_rows_are_flipped_to_top_down() {
    let mut files = MemoryFileStore::new();
    files.insert(
        format!("{DIR}ALL.bmp"),
        encode_bitmap(3, 3, 32, |x, y| [x as u8, y as u8, 0, 255]),
    );

    let image = load_into(&mut files, PixelFormat::Abgr.code());
    assert_eq!(texel(&image, 0, 0), [0, 0, 0, 255]);
    assert_eq!(texel(&image, 2, 0), [2, 0, 0, 255]);
    assert_eq!(texel(&image, 1, 2), [1, 2, 0, 255]);
}

#[test]
fn test_24_bit_source_with_row_padding() {
    // 3 texels * 3 bytes = 9, padded to 12 per row
    let mut files = MemoryFileStore::new();
    files.insert(
        format!("{DIR}ALL.bmp"),
        encode_bitmap(3, 2, 24, |x, y| [10 * x as u8, 100 + y as u8, 50, 0]),
    );

    let image = load_into(&mut files, PixelFormat::Abgr.code());
    assert!(image.is_loaded());
    assert_eq!(texel(&image, 0, 0), [0, 100, 50, 255]);
    assert_eq!(texel(&image, 2, 1), [20, 101, 50, 255]);
}

#[test]
fn test_16_bit_source_expands_565() {
    let mut files = MemoryFileStore::new();
    files.insert(
        format!("{DIR}ALL.bmp"),
        encode_bitmap(3, 1, 16, |x, _| match x {
            0 => [255, 0, 0, 0],
            1 => [0, 255, 0, 0],
            _ => [255, 255, 255, 0],
        }),
    );

    let image = load_into(&mut files, PixelFormat::Argb.code());
    assert!(image.is_loaded());
    // ARGB stores blue, green, red, alpha
    assert_eq!(texel(&image, 0, 0), [0, 0, 255, 255]);
    assert_eq!(texel(&image, 1, 0), [0, 255, 0, 255]);
    assert_eq!(texel(&image, 2, 0), [255, 255, 255, 255]);
}

#[test]
fn test_truncated_pixel_data_fails() {
    let mut bytes = encode_bitmap(8, 8, 32, |_, _| [1; 4]);
    bytes.truncate(bytes.len() - 10);
    let mut files = MemoryFileStore::new();
    files.insert(format!("{DIR}ALL.bmp"), bytes);

    let image = load_into(&mut files, PixelFormat::Abgr.code());
    assert_eq!(image.status(), ImageStatus::Failed);
    assert!(image.plane(0).is_none());
}

#[test]
fn test_oversized_image_is_an_allocation_failure() {
    let mut files = MemoryFileStore::new();
    files.insert(format!("{DIR}ALL.bmp"), encode_bitmap(8, 2, 32, |_, _| [0; 4]));

    let config = ImageConfig {
        max_dimension: 4,
        ..ImageConfig::default()
    };
    let mut image = DecodedImage::unloaded();
    StillImageLoader::new(&config).load(
        &mut files,
        CameraPosition::Front,
        PixelFormat::Abgr.code(),
        "ALL",
        &mut image,
    );
    assert_eq!(image.status(), ImageStatus::Failed);
}

#[test]
fn test_candidate_order() {
    let candidates = loader().candidates(CameraPosition::Back, "PCSE00001");
    assert_eq!(
        candidates,
        vec![
            format!("{DIR}PCSE00001_Back.bmp"),
            format!("{DIR}PCSE00001.bmp"),
            format!("{DIR}ALL_Back.bmp"),
            format!("{DIR}ALL.bmp"),
        ]
    );

    let generic = loader().candidates(CameraPosition::Front, "ALL");
    assert_eq!(
        generic,
        vec![format!("{DIR}ALL_Front.bmp"), format!("{DIR}ALL.bmp")]
    );
}

#[test]
fn test_most_specific_candidate_wins() {
    let mut files = MemoryFileStore::new();
    files.insert(format!("{DIR}ALL.bmp"), encode_bitmap(2, 2, 32, |_, _| [1; 4]));
    files.insert(
        format!("{DIR}PCSE00001_Front.bmp"),
        encode_bitmap(4, 2, 32, |_, _| [2; 4]),
    );

    let image = load_into(&mut files, PixelFormat::Abgr.code());
    assert_eq!(image.width(), 4);
    assert_eq!(texel(&image, 0, 0), [2, 2, 2, 0xff]);
    assert_eq!(files.open_count(), 1);
}

#[test]
fn test_missing_image_fails() {
    let mut files = MemoryFileStore::new();
    let image = load_into(&mut files, PixelFormat::Abgr.code());
    assert_eq!(image.status(), ImageStatus::Failed);
}

#[test]
fn test_decode_reports_header_errors() {
    let mut bytes = encode_bitmap(2, 2, 32, |_, _| [0; 4]);
    bytes[28] = 8;
    let mut files = MemoryFileStore::new();
    files.insert("raw.bmp", bytes);

    let handle = crate::platform::FileStore::open(&mut files, "raw.bmp").unwrap();
    let layout = PixelFormat::Abgr.layout().unwrap();
    let result = decode_bitmap(&mut files, handle, layout, 4096);
    assert_eq!(result.unwrap_err(), ImageError::UnsupportedDepth(8));
}
