//! PDF -> image extraction: rasterize every page to an image file.
//!
//! Pages are split into contiguous, roughly equal index ranges, one per
//! worker, and each worker renders its range sequentially. The render
//! call itself is serialized inside the pdfium wrapper; encoding and
//! saving overlap freely across workers.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::config::options::{ConvertOptions, OutputFormat};
use crate::error::{ConvertError, Result};
use crate::page_order;
use crate::render::pdfium;

/// One page saved to disk.
#[derive(Debug, Clone)]
pub struct ExtractedImage {
    pub path: PathBuf,
    /// 0-based page index within the source document.
    pub page_index: u16,
}

/// Extraction pipeline for one PDF document.
pub struct PageExtractor {
    pdf_path: PathBuf,
    pdf_stem: String,
    page_count: u16,
    format: OutputFormat,
    quality: u8,
    dpi: u32,
}

impl PageExtractor {
    /// Open `pdf_path` through the renderer and query its page count.
    ///
    /// An unreadable or password-protected document fails here, before
    /// any output is produced.
    pub fn open(pdf_path: &Path, options: &ConvertOptions) -> Result<Self> {
        let page_count = pdfium::page_count(pdf_path)?;

        Ok(PageExtractor {
            pdf_path: pdf_path.to_path_buf(),
            pdf_stem: page_order::stem_of(pdf_path),
            page_count,
            format: options.format,
            quality: options.quality,
            dpi: options.dpi,
        })
    }

    pub fn page_count(&self) -> u16 {
        self.page_count
    }

    /// Rasterize every page into `output_dir`.
    ///
    /// Workers each own a static contiguous slice of page indices; a page
    /// that fails to render or save is logged and excluded. Results are
    /// re-sorted by page index before returning, since workers complete
    /// in arbitrary order. An empty result is not an error here; callers
    /// decide how to treat a document that produced no images.
    pub fn extract_all_pages(&self, output_dir: &Path) -> Result<Vec<ExtractedImage>> {
        std::fs::create_dir_all(output_dir).map_err(|e| {
            ConvertError::directory_create(format!(
                "cannot create {}: {e}",
                output_dir.display()
            ))
        })?;

        let total_pages = self.page_count as usize;
        if total_pages == 0 {
            return Ok(Vec::new());
        }

        info!("Extracting {total_pages} pages from {}", self.pdf_path.display());

        let workers = total_pages.min(
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        );

        // Static range split: worker t covers [n*t/w, n*(t+1)/w).
        let ranges: Vec<(usize, usize)> = (0..workers)
            .map(|t| (total_pages * t / workers, total_pages * (t + 1) / workers))
            .collect();

        let per_worker: Vec<Vec<ExtractedImage>> = ranges
            .into_par_iter()
            .map(|(start, end)| {
                let mut worker_images = Vec::with_capacity(end - start);
                for page_index in start..end {
                    match self.extract_page(page_index as u16, output_dir) {
                        Ok(image) => worker_images.push(image),
                        Err(e) => {
                            warn!(
                                "Failed to extract page {} of {}: {e}",
                                page_index + 1,
                                self.pdf_path.display()
                            );
                        }
                    }
                }
                worker_images
            })
            .collect();

        let mut all_images: Vec<ExtractedImage> =
            per_worker.into_iter().flatten().collect();
        all_images.sort_by_key(|image| image.page_index);

        info!("Total pages extracted: {}", all_images.len());
        Ok(all_images)
    }

    /// Render one page and save it under
    /// `{stem}_page{N}_img1.{ext}` (1-based page number).
    fn extract_page(&self, page_index: u16, output_dir: &Path) -> Result<ExtractedImage> {
        let bitmap = pdfium::render_page(&self.pdf_path, page_index, self.dpi)?;

        let filename = format!(
            "{}_page{}_img1.{}",
            self.pdf_stem,
            page_index + 1,
            self.format.extension()
        );
        let path = output_dir.join(&filename);

        self.save_image(&bitmap, &path)?;

        info!(
            "Extracted page as image: {filename} ({}x{})",
            bitmap.width(),
            bitmap.height()
        );

        Ok(ExtractedImage { path, page_index })
    }

    fn save_image(&self, bitmap: &DynamicImage, path: &Path) -> Result<()> {
        match self.format {
            OutputFormat::Png => bitmap.save_with_format(path, ImageFormat::Png)?,
            OutputFormat::Jpeg => {
                let file = File::create(path)
                    .map_err(|e| ConvertError::write(format!("{}: {e}", path.display())))?;
                let mut writer = BufWriter::new(file);
                let encoder =
                    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut writer, self.quality);
                bitmap.to_rgb8().write_with_encoder(encoder)?;
            }
        }
        Ok(())
    }
}
