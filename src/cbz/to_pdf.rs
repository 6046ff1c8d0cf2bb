//! CBZ -> PDF assembly.
//!
//! Reads a CBZ archive, keeps the JPEG entries, sniffs their dimensions
//! and hands the sorted page sequence to the PDF writer. Non-JPEG entries
//! are excluded: only DCTDecode embedding is implemented, and transcoding
//! other formats would break the lossless round-trip of the page data.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{info, warn};
use zip::ZipArchive;

use crate::error::{ConvertError, Result};
use crate::jpeg::{self, JpegDimensions};
use crate::page_order;
use crate::pdf::writer::{self, PdfImageInput};

/// One surviving archive entry: the raw JPEG payload plus its sniffed
/// dimensions. Owned by the assembly pipeline for one conversion only.
struct ImageEntry {
    name: String,
    data: Vec<u8>,
    dimensions: JpegDimensions,
}

fn has_jpeg_extension(entry_name: &str) -> bool {
    Path::new(entry_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let lower = e.to_ascii_lowercase();
            lower == "jpg" || lower == "jpeg"
        })
        .unwrap_or(false)
}

/// Enumerate the archive and collect every usable JPEG entry.
///
/// Directory entries and non-JPEG entries are skipped silently at debug
/// level; short reads and unparsable JPEG headers are skipped with a
/// warning. Per-entry failures never abort the collection.
fn collect_entries(archive: &mut ZipArchive<File>) -> Vec<ImageEntry> {
    let mut images = Vec::new();

    for index in 0..archive.len() {
        let mut entry = match archive.by_index(index) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Failed to open archive entry {index}: {e}");
                continue;
            }
        };

        let entry_name = entry.name().to_owned();
        if entry.is_dir() || entry_name.ends_with('/') {
            continue;
        }
        if !has_jpeg_extension(&entry_name) {
            warn!("Skipping non-JPEG entry: {entry_name}");
            continue;
        }

        let declared_size = entry.size() as usize;
        let mut data = Vec::with_capacity(declared_size);
        match entry.read_to_end(&mut data) {
            Ok(bytes_read) if bytes_read == declared_size => {}
            Ok(bytes_read) => {
                warn!(
                    "Short read for entry {entry_name}: {bytes_read} of {declared_size} bytes"
                );
                continue;
            }
            Err(e) => {
                warn!("Failed to read entry {entry_name}: {e}");
                continue;
            }
        }

        let dimensions = match jpeg::sniff_dimensions(&data) {
            Ok(dims) => dims,
            Err(e) => {
                warn!("Unable to read JPEG dimensions for {entry_name}: {e}");
                continue;
            }
        };

        images.push(ImageEntry {
            name: entry_name,
            data,
            dimensions,
        });
    }

    images
}

/// Convert a CBZ archive into a single PDF document, one page per JPEG
/// entry, pages in natural name order.
pub fn convert_cbz_to_pdf(cbz_path: &Path, output_pdf_path: &Path) -> Result<()> {
    let file = File::open(cbz_path).map_err(|e| {
        ConvertError::archive_open(format!("cannot open {}: {e}", cbz_path.display()))
    })?;
    let mut archive = ZipArchive::new(file).map_err(|e| {
        ConvertError::archive_open(format!("cannot read {}: {e}", cbz_path.display()))
    })?;

    let mut images = collect_entries(&mut archive);
    drop(archive);

    if images.is_empty() {
        return Err(ConvertError::no_supported_images(format!(
            "no supported images found inside {}",
            cbz_path.display()
        )));
    }

    // Same ordering policy as the packer: numeric page hint first, stem
    // comparison as the tie breaker.
    images.sort_by(|a, b| {
        page_order::compare_stems(
            &page_order::stem_of(Path::new(&a.name)),
            &page_order::stem_of(Path::new(&b.name)),
        )
    });

    let pdf_images: Vec<PdfImageInput> = images
        .into_iter()
        .map(|entry| PdfImageInput {
            name: entry.name,
            width: entry.dimensions.width,
            height: entry.dimensions.height,
            components: entry.dimensions.components,
            data: entry.data,
        })
        .collect();

    writer::create_pdf_from_images(&pdf_images, output_pdf_path)?;

    info!(
        "Created PDF: {} ({} pages)",
        output_pdf_path.display(),
        pdf_images.len()
    );
    Ok(())
}
