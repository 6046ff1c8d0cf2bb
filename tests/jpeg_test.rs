// JPEG dimension sniffer tests.
//
// Buffers are synthesized by hand so the exact marker layout is under
// test control; no real image decoding is involved.

use comic_convert::jpeg::sniff_dimensions;

/// Minimal baseline JPEG: SOI, JFIF APP0, SOF0, SOS, EOI.
fn minimal_jpeg(width: u16, height: u16, components: u8) -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8];

    // APP0 (JFIF) segment, length 16
    data.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x10]);
    data.extend_from_slice(b"JFIF\0");
    data.extend_from_slice(&[0x01, 0x01, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00]);

    // SOF0: length(2) precision(1) height(2) width(2) components(1) + 3/component
    let sof_length = 8 + 3 * components as u16;
    data.extend_from_slice(&[0xFF, 0xC0]);
    data.extend_from_slice(&sof_length.to_be_bytes());
    data.push(8);
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&width.to_be_bytes());
    data.push(components);
    for component in 0..components {
        data.extend_from_slice(&[component + 1, 0x11, 0x00]);
    }

    // SOS header plus a token amount of entropy data, then EOI
    data.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3F, 0x00]);
    data.extend_from_slice(&[0x12, 0x34, 0xFF, 0xD9]);

    data
}

#[test]
fn test_sniff_baseline_rgb() {
    let dims = sniff_dimensions(&minimal_jpeg(800, 600, 3)).expect("should sniff SOF0");
    assert_eq!((dims.width, dims.height, dims.components), (800, 600, 3));
}

#[test]
fn test_sniff_grayscale() {
    let dims = sniff_dimensions(&minimal_jpeg(100, 50, 1)).expect("should sniff grayscale");
    assert_eq!((dims.width, dims.height, dims.components), (100, 50, 1));
}

#[test]
fn test_sniff_cmyk() {
    let dims = sniff_dimensions(&minimal_jpeg(32, 32, 4)).expect("should sniff CMYK");
    assert_eq!(dims.components, 4);
}

#[test]
fn test_progressive_sof2_is_accepted() {
    let mut data = minimal_jpeg(640, 480, 3);
    // rewrite the SOF0 marker (after the 20-byte header: SOI + APP0) to SOF2
    assert_eq!(data[20], 0xFF);
    assert_eq!(data[21], 0xC0);
    data[21] = 0xC2;

    let dims = sniff_dimensions(&data).expect("should sniff SOF2");
    assert_eq!((dims.width, dims.height), (640, 480));
}

#[test]
fn test_missing_soi_fails() {
    let mut data = minimal_jpeg(800, 600, 3);
    data[0] = 0x00;
    assert!(sniff_dimensions(&data).is_err(), "buffer without FFD8 must fail");
}

#[test]
fn test_empty_and_tiny_buffers_fail() {
    assert!(sniff_dimensions(&[]).is_err());
    assert!(sniff_dimensions(&[0xFF, 0xD8]).is_err());
    assert!(sniff_dimensions(&[0xFF, 0xD8, 0xFF]).is_err());
}

#[test]
fn test_scan_before_frame_fails() {
    // SOI directly followed by SOS: dimensions are unrecoverable
    let data = [
        0xFF, 0xD8, 0xFF, 0xDA, 0x00, 0x08, 0x01, 0x01, 0x00, 0x00, 0x3F, 0x00,
    ];
    assert!(sniff_dimensions(&data).is_err());
}

#[test]
fn test_truncated_sof_segment_fails() {
    let full = minimal_jpeg(800, 600, 3);
    // cut inside the SOF segment
    let truncated = &full[..24];
    assert!(sniff_dimensions(truncated).is_err(), "truncated SOF must fail");
}

#[test]
fn test_segment_length_past_buffer_fails() {
    // APP0 claiming more bytes than the buffer holds
    let data = [0xFF, 0xD8, 0xFF, 0xE0, 0xFF, 0xFF, 0x00];
    assert!(sniff_dimensions(&data).is_err());
}

#[test]
fn test_zero_dimensions_fail() {
    assert!(sniff_dimensions(&minimal_jpeg(0, 600, 3)).is_err());
    assert!(sniff_dimensions(&minimal_jpeg(800, 0, 3)).is_err());
}
