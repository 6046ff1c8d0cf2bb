//! pdfium-render wrapper: page -> DynamicImage (in-memory only).
//!
//! pdfium is not thread-safe, so every call that touches the library runs
//! under one process-wide lock. Extraction workers render one page at a
//! time through this lock and do their image encoding and file I/O outside
//! it.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use image::DynamicImage;
use pdfium_render::prelude::*;

use crate::error::{ConvertError, Result};

/// Serializes all pdfium access across extraction workers.
static RENDER_LOCK: Mutex<()> = Mutex::new(());

/// Resolves the path to the pdfium shared library.
///
/// Search order:
/// 1. `PDFIUM_DYNAMIC_LIB_PATH` environment variable
/// 2. `vendor/pdfium/lib/` relative to the project root (for development)
fn resolve_pdfium_lib_path() -> Result<PathBuf> {
    // 1. Check environment variable
    if let Ok(path) = std::env::var("PDFIUM_DYNAMIC_LIB_PATH") {
        let p = PathBuf::from(&path);
        if p.exists() {
            return Ok(p);
        }
        return Err(ConvertError::render(format!(
            "PDFIUM_DYNAMIC_LIB_PATH is set to '{path}' but the path does not exist"
        )));
    }

    // 2. Fallback: vendor/pdfium/lib/ relative to project root
    //    In development, CARGO_MANIFEST_DIR points to the project root.
    if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
        let vendor_path = PathBuf::from(&manifest_dir).join("vendor/pdfium/lib");
        if vendor_path.exists() {
            return Ok(vendor_path);
        }
    }

    Err(ConvertError::render(
        "pdfium library not found: set PDFIUM_DYNAMIC_LIB_PATH or place libpdfium.so in vendor/pdfium/lib/",
    ))
}

/// Creates a new Pdfium instance by dynamically loading the shared library.
fn create_pdfium() -> Result<Pdfium> {
    let lib_path = resolve_pdfium_lib_path()?;
    let lib_path_str = lib_path.to_str().ok_or_else(|| {
        ConvertError::render("pdfium library path contains non-UTF-8 characters")
    })?;
    let bindings =
        Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(lib_path_str))
            .map_err(|e| ConvertError::render(e.to_string()))?;
    Ok(Pdfium::new(bindings))
}

fn load_document<'a>(pdfium: &'a Pdfium, pdf_path: &Path) -> Result<PdfDocument<'a>> {
    let path_str = pdf_path
        .to_str()
        .ok_or_else(|| ConvertError::document_load("PDF path contains non-UTF-8 characters"))?;
    pdfium.load_pdf_from_file(path_str, None).map_err(|e| {
        ConvertError::document_load(format!("cannot load {}: {e}", pdf_path.display()))
    })
}

/// Number of pages in the document at `pdf_path`.
///
/// Fails with a `DocumentLoadError` for unreadable, corrupt or
/// password-protected documents.
pub fn page_count(pdf_path: &Path) -> Result<u16> {
    let _guard = RENDER_LOCK.lock().unwrap_or_else(PoisonError::into_inner);

    let pdfium = create_pdfium()?;
    let document = load_document(&pdfium, pdf_path)?;
    Ok(document.pages().len())
}

/// Renders a PDF page at the specified DPI and returns a DynamicImage.
///
/// The document is loaded from disk and the page rendered to an in-memory
/// bitmap while the render lock is held; no intermediate files are
/// created.
///
/// # Errors
/// Returns `DocumentLoadError` if the PDF cannot be opened, and
/// `RenderError` if the pdfium library cannot be initialized, the page
/// index is out of range or rendering fails.
pub fn render_page(pdf_path: &Path, page_index: u16, dpi: u32) -> Result<DynamicImage> {
    let _guard = RENDER_LOCK.lock().unwrap_or_else(PoisonError::into_inner);

    let pdfium = create_pdfium()?;
    let document = load_document(&pdfium, pdf_path)?;

    let page = document
        .pages()
        .get(page_index)
        .map_err(|e| ConvertError::render(e.to_string()))?;

    // PDF default user unit: 1 point = 1/72 inch
    // At the given DPI, each point maps to (dpi / 72) pixels
    let width_pts = page.width().value;
    let height_pts = page.height().value;
    let width_px = (width_pts * dpi as f32 / 72.0).round() as i32;
    let height_px = (height_pts * dpi as f32 / 72.0).round() as i32;

    let config = PdfRenderConfig::new()
        .set_target_width(width_px)
        .set_target_height(height_px);

    let bitmap = page
        .render_with_config(&config)
        .map_err(|e| ConvertError::render(e.to_string()))?;

    Ok(bitmap.as_image())
}
