//! JPEG header scan: recover image dimensions without decoding.
//!
//! The PDF writer embeds JPEG payloads untouched (DCTDecode), so the only
//! metadata it needs is width, height and the color component count from
//! the Start-Of-Frame segment. Scanning the marker stream for that segment
//! is far cheaper than a full decode and guards the writer against
//! embedding `/Width`/`/Height` values that disagree with the payload.

use crate::error::{ConvertError, Result};

/// Dimensions recovered from a JPEG Start-Of-Frame segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JpegDimensions {
    pub width: u16,
    pub height: u16,
    /// Color components: 1 = grayscale, 3 = RGB, 4 = CMYK.
    pub components: u8,
}

/// SOF marker family: baseline, extended, progressive and lossless
/// variants. Excludes C4 (DHT), C8 (JPG) and CC (DAC).
fn is_sof_marker(marker: u8) -> bool {
    matches!(marker, 0xC0..=0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF)
}

/// Scan a JPEG byte buffer for its frame dimensions.
///
/// Walks the marker stream after the `FF D8` Start-Of-Image marker,
/// skipping each segment by its declared length, until a Start-Of-Frame
/// segment yields the dimensions. Reaching Start-Of-Scan first, or any
/// truncated or malformed segment, fails cleanly; no partial dimensions
/// are ever returned.
pub fn sniff_dimensions(data: &[u8]) -> Result<JpegDimensions> {
    if data.len() < 4 || data[0] != 0xFF || data[1] != 0xD8 {
        return Err(ConvertError::dimension_parse(
            "missing JPEG start-of-image marker",
        ));
    }

    let mut index = 2usize;
    while index + 1 < data.len() {
        if data[index] != 0xFF {
            // fill byte or entropy-coded data, resynchronize
            index += 1;
            continue;
        }

        let marker = data[index + 1];
        index += 2;

        // standalone markers carry no segment
        if marker == 0xD8 || marker == 0xD9 {
            continue;
        }

        // start-of-scan before any SOF: dimensions are unrecoverable
        if marker == 0xDA {
            break;
        }

        if index + 1 >= data.len() {
            return Err(ConvertError::dimension_parse("truncated marker segment"));
        }

        let segment_length = u16::from_be_bytes([data[index], data[index + 1]]) as usize;
        if segment_length < 2 || index + segment_length > data.len() {
            return Err(ConvertError::dimension_parse(format!(
                "invalid segment length {segment_length} for marker 0x{marker:02X}"
            )));
        }

        if is_sof_marker(marker) {
            // segment: length(2) precision(1) height(2) width(2) components(1)
            if segment_length < 8 {
                return Err(ConvertError::dimension_parse(
                    "start-of-frame segment too short",
                ));
            }
            let height = u16::from_be_bytes([data[index + 3], data[index + 4]]);
            let width = u16::from_be_bytes([data[index + 5], data[index + 6]]);
            let components = data[index + 7];
            if width == 0 || height == 0 {
                return Err(ConvertError::dimension_parse(format!(
                    "degenerate frame size {width}x{height}"
                )));
            }
            return Ok(JpegDimensions {
                width,
                height,
                components,
            });
        }

        index += segment_length;
    }

    Err(ConvertError::dimension_parse(
        "no start-of-frame segment found",
    ))
}
