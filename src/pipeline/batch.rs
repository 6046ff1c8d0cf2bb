//! Batch orchestration: input discovery, per-file conversion, tallying.
//!
//! One file's failure never aborts the batch; it is logged, counted and
//! the next file is processed. Cancellation is coarse: the flag is polled
//! only between files, so a conversion that has started runs to
//! completion.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{error, info, warn};

use crate::cbz::{packer, to_pdf};
use crate::config::options::ConvertOptions;
use crate::error::{ConvertError, Result};
use crate::page_order;
use crate::pipeline::extractor::PageExtractor;

/// Cooperative batch-level cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    inner: Arc<AtomicBool>,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.inner.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.load(Ordering::Relaxed)
    }
}

/// Outcome counts for one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub successful: usize,
    pub failed: usize,
    pub cancelled: bool,
}

fn find_files_with_extension(directory: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in std::fs::read_dir(directory)? {
        let entry = entry?;
        let path = entry.path();
        let matches = entry.file_type()?.is_file()
            && path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case(extension))
                .unwrap_or(false);
        if matches {
            files.push(path);
        }
    }

    // Full-path sort gives a deterministic batch order.
    files.sort();
    Ok(files)
}

/// PDF files directly inside `directory`, sorted by path.
pub fn find_pdf_files(directory: &Path) -> Result<Vec<PathBuf>> {
    find_files_with_extension(directory, "pdf")
}

/// CBZ files directly inside `directory`, sorted by path.
pub fn find_cbz_files(directory: &Path) -> Result<Vec<PathBuf>> {
    find_files_with_extension(directory, "cbz")
}

/// Convert one PDF into loose page images under
/// `base_output_dir/{stem}/`, optionally packing them into
/// `base_output_dir/{stem}.cbz` and removing the loose images afterwards.
pub fn convert_single_pdf(
    pdf_path: &Path,
    base_output_dir: &Path,
    options: &ConvertOptions,
) -> Result<()> {
    let pdf_stem = page_order::stem_of(pdf_path);
    let output_dir = base_output_dir.join(&pdf_stem);

    info!("Processing: {}", pdf_path.display());
    info!("Output directory: {}", output_dir.display());

    let extractor = PageExtractor::open(pdf_path, options)?;
    info!("PDF loaded. Total pages: {}", extractor.page_count());

    let extracted = extractor.extract_all_pages(&output_dir)?;
    if extracted.is_empty() {
        return Err(ConvertError::no_supported_images(format!(
            "no pages extracted from {}",
            pdf_path.display()
        )));
    }

    info!("Extracted {} images", extracted.len());

    if options.create_cbz {
        let cbz_path = base_output_dir.join(format!("{pdf_stem}.cbz"));

        info!("Creating CBZ archive...");
        packer::create_cbz_from_directory(&output_dir, &cbz_path)?;
        info!("CBZ file created: {}", cbz_path.display());

        if options.clean_images {
            info!("Cleaning up individual image files...");
            match std::fs::remove_dir_all(&output_dir) {
                Ok(()) => info!("Cleanup complete"),
                // cleanup failure leaves stale files but the conversion
                // itself succeeded
                Err(e) => warn!("Failed to clean up {}: {e}", output_dir.display()),
            }
        }
    }

    Ok(())
}

/// Convert one CBZ into `base_output_dir/{stem}.pdf`.
pub fn convert_single_cbz(cbz_path: &Path, base_output_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(base_output_dir).map_err(|e| {
        ConvertError::directory_create(format!(
            "cannot create {}: {e}",
            base_output_dir.display()
        ))
    })?;

    let output_pdf = base_output_dir.join(format!("{}.pdf", page_order::stem_of(cbz_path)));

    info!("Processing CBZ: {}", cbz_path.display());
    info!("Output PDF: {}", output_pdf.display());

    to_pdf::convert_cbz_to_pdf(cbz_path, &output_pdf)
}

/// Run a whole batch of input files, tallying per-file outcomes.
///
/// The conversion direction comes from `options.to_pdf`. The cancel flag
/// is checked only at the top of each per-file iteration.
pub fn run_batch(
    input_files: &[PathBuf],
    base_output_dir: &Path,
    options: &ConvertOptions,
    cancel: &CancelFlag,
) -> BatchSummary {
    let mut summary = BatchSummary::default();

    for input in input_files {
        if cancel.is_cancelled() {
            summary.cancelled = true;
            break;
        }

        let result = if options.to_pdf {
            convert_single_cbz(input, base_output_dir)
        } else {
            convert_single_pdf(input, base_output_dir, options)
        };

        match result {
            Ok(()) => summary.successful += 1,
            Err(e) => {
                error!("{}: {e}", input.display());
                summary.failed += 1;
            }
        }
    }

    info!(
        "Processing complete. Successful: {}, failed: {}{}",
        summary.successful,
        summary.failed,
        if summary.cancelled { " (cancelled)" } else { "" }
    );

    summary
}
