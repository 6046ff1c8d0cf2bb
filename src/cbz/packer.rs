//! CBZ packing: image files -> ZIP archive with a `.cbz` extension.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::{ConvertError, Result};
use crate::page_order;

/// Extensions recognized as page images when scanning a directory.
const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "bmp", "webp"];

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let lower = e.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&lower.as_str())
        })
        .unwrap_or(false)
}

/// List the image files directly inside `directory` (no recursion).
pub fn image_files_in_directory(directory: &Path) -> Result<Vec<PathBuf>> {
    let mut image_files = Vec::new();

    for entry in std::fs::read_dir(directory)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_file() && has_image_extension(&path) {
            image_files.push(path);
        }
    }

    Ok(image_files)
}

/// Pack an explicit list of image files into a new CBZ archive.
///
/// Entries are stored under their base filenames, in the order given.
/// A source file that cannot be read or added is logged and skipped; the
/// archive is still finalized with whatever entries succeeded.
pub fn create_cbz_from_images(image_paths: &[PathBuf], output_cbz_path: &Path) -> Result<()> {
    if image_paths.is_empty() {
        return Err(ConvertError::no_supported_images(
            "no images provided for CBZ creation",
        ));
    }

    let file = File::create(output_cbz_path).map_err(|e| {
        ConvertError::archive_open(format!(
            "cannot create {}: {e}",
            output_cbz_path.display()
        ))
    })?;
    let mut archive = ZipWriter::new(BufWriter::new(file));
    let entry_options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    info!("Creating CBZ archive: {}", output_cbz_path.display());

    for image_path in image_paths {
        let filename = match image_path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name.to_owned(),
            None => {
                warn!("Skipping path without a usable filename: {}", image_path.display());
                continue;
            }
        };

        let data = match std::fs::read(image_path) {
            Ok(data) => data,
            Err(e) => {
                warn!("Image file not readable: {}: {e}", image_path.display());
                continue;
            }
        };

        let added = archive
            .start_file(filename.as_str(), entry_options)
            .map_err(ConvertError::from)
            .and_then(|()| archive.write_all(&data).map_err(ConvertError::from));
        match added {
            Ok(()) => info!("Added to CBZ: {filename} ({} bytes)", data.len()),
            Err(e) => warn!("Failed to add {filename} to archive: {e}"),
        }
    }

    let mut inner = archive
        .finish()
        .map_err(|e| ConvertError::write(format!("cannot finalize CBZ archive: {e}")))?;
    inner
        .flush()
        .map_err(|e| ConvertError::write(format!("cannot finalize CBZ archive: {e}")))?;

    info!("CBZ archive created: {}", output_cbz_path.display());
    Ok(())
}

/// Pack every image file in `image_directory` into a new CBZ archive,
/// in natural page order.
pub fn create_cbz_from_directory(image_directory: &Path, output_cbz_path: &Path) -> Result<()> {
    let mut image_files = image_files_in_directory(image_directory)?;
    if image_files.is_empty() {
        return Err(ConvertError::no_supported_images(format!(
            "no image files found in directory: {}",
            image_directory.display()
        )));
    }

    image_files.sort_by(|a, b| page_order::compare_paths(a, b));

    info!(
        "Found {} image files in {}",
        image_files.len(),
        image_directory.display()
    );

    create_cbz_from_images(&image_files, output_cbz_path)
}
