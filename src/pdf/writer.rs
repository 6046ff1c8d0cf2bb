//! 最小限のPDF/1.4ライタ。
//!
//! JPEGページ列からPDFバイトストリームを一回のパスで直接構築する。
//! 各ページはDCTDecodeフィルタ付きImage XObjectとして元のJPEGバイト列を
//! 無加工で埋め込むため、画像データはビット単位で可逆に保たれる。
//! 汎用PDFライブラリは使用しない。

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::{ConvertError, Result};

/// One page's input to the PDF writer: the raw (still encoded) JPEG
/// payload plus the dimensions sniffed from its frame header.
#[derive(Debug, Clone)]
pub struct PdfImageInput {
    /// Original entry name, for logging only.
    pub name: String,
    pub width: u16,
    pub height: u16,
    /// Color components: 1 = gray, 4 = CMYK, anything else treated as RGB.
    pub components: u8,
    pub data: Vec<u8>,
}

impl PdfImageInput {
    /// PDF color space name derived from the JPEG component count.
    fn color_space(&self) -> &'static str {
        match self.components {
            1 => "DeviceGray",
            4 => "DeviceCMYK",
            _ => "DeviceRGB",
        }
    }
}

/// Object IDs for page `i` (0-based). Objects 1 and 2 are the Catalog and
/// the Pages node; each page then occupies three consecutive IDs.
fn page_object_id(page_index: usize) -> usize {
    3 + page_index * 3
}

/// クロスリファレンステーブル用に書き込み位置を数えるライタ。
///
/// xrefのオフセットはバイト単位で正確でなければビューアがファイルを
/// 開けないため、Seekに頼らず書き込んだバイト数を自前で追跡する。
struct CountingWriter<W: Write> {
    inner: W,
    position: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, position: 0 }
    }

    fn position(&self) -> u64 {
        self.position
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.position += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Write a complete PDF document embedding `images` one per page.
///
/// The layout is fixed: object 1 is the Catalog, object 2 the Pages node,
/// then per page a Page object, an Image XObject and a content stream.
/// Every object's byte offset is recorded at the moment its `N 0 obj`
/// token is written and replayed in the xref table.
pub fn write_pdf<W: Write>(images: &[PdfImageInput], writer: W) -> Result<()> {
    if images.is_empty() {
        return Err(ConvertError::no_supported_images(
            "no images provided for PDF creation",
        ));
    }

    let mut out = CountingWriter::new(writer);
    emit_document(images, &mut out).map_err(|e| ConvertError::write(e.to_string()))
}

/// Create parent directories and write the PDF to `output_path`.
pub fn create_pdf_from_images(images: &[PdfImageInput], output_path: &Path) -> Result<()> {
    if images.is_empty() {
        return Err(ConvertError::no_supported_images(
            "no images provided for PDF creation",
        ));
    }

    if let Some(parent) = output_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            ConvertError::directory_create(format!(
                "cannot create {}: {e}",
                parent.display()
            ))
        })?;
    }

    let file = File::create(output_path)
        .map_err(|e| ConvertError::write(format!("cannot open {}: {e}", output_path.display())))?;
    let mut out = CountingWriter::new(BufWriter::new(file));

    emit_document(images, &mut out)
        .and_then(|()| out.flush())
        .map_err(|e| ConvertError::write(format!("{}: {e}", output_path.display())))
}

fn emit_document<W: Write>(
    images: &[PdfImageInput],
    out: &mut CountingWriter<W>,
) -> io::Result<()> {
    let page_count = images.len();
    let total_objects = 2 + page_count * 3;

    // offsets[id] = stream position of "id 0 obj"; index 0 unused
    let mut offsets = vec![0u64; total_objects + 1];

    write!(out, "%PDF-1.4\n")?;

    // Object 1: Catalog
    offsets[1] = out.position();
    write!(out, "1 0 obj\n")?;
    write!(out, "<< /Type /Catalog /Pages 2 0 R >>\n")?;
    write!(out, "endobj\n")?;

    // Object 2: Pages
    offsets[2] = out.position();
    write!(out, "2 0 obj\n")?;
    write!(out, "<< /Type /Pages /Count {page_count} /Kids [")?;
    for page_index in 0..page_count {
        write!(out, " {} 0 R", page_object_id(page_index))?;
    }
    write!(out, " ] >>\n")?;
    write!(out, "endobj\n")?;

    for (page_index, image) in images.iter().enumerate() {
        let page_id = page_object_id(page_index);
        let image_id = page_id + 1;
        let content_id = page_id + 2;
        let resource_name = format!("Im{}", page_index + 1);
        let width = image.width;
        let height = image.height;

        // Page object. MediaBox uses raw pixel units, no DPI-to-point
        // conversion; viewers treat one pixel as one point.
        offsets[page_id] = out.position();
        write!(out, "{page_id} 0 obj\n")?;
        write!(out, "<< /Type /Page /Parent 2 0 R ")?;
        write!(out, "/MediaBox [0 0 {width} {height}] ")?;
        write!(
            out,
            "/Resources << /XObject << /{resource_name} {image_id} 0 R >> >> "
        )?;
        write!(out, "/Contents {content_id} 0 R >>\n")?;
        write!(out, "endobj\n")?;

        // Image XObject: the untouched JPEG bytes as a DCTDecode stream.
        offsets[image_id] = out.position();
        write!(out, "{image_id} 0 obj\n")?;
        write!(out, "<< /Type /XObject /Subtype /Image ")?;
        write!(out, "/Width {width} ")?;
        write!(out, "/Height {height} ")?;
        write!(out, "/ColorSpace /{} ", image.color_space())?;
        write!(out, "/BitsPerComponent 8 ")?;
        write!(out, "/Filter /DCTDecode ")?;
        write!(out, "/Length {} >>\n", image.data.len())?;
        write!(out, "stream\n")?;
        out.write_all(&image.data)?;
        write!(out, "\n")?;
        write!(out, "endstream\n")?;
        write!(out, "endobj\n")?;

        // Content stream: scale the unit image square to page size.
        let content = format!("q {width} 0 0 {height} 0 0 cm /{resource_name} Do Q\n");
        offsets[content_id] = out.position();
        write!(out, "{content_id} 0 obj\n")?;
        write!(out, "<< /Length {} >>\n", content.len())?;
        write!(out, "stream\n")?;
        write!(out, "{content}")?;
        write!(out, "endstream\n")?;
        write!(out, "endobj\n")?;
    }

    // Cross-reference table. Object 0 is the conventional free-list head.
    let xref_offset = out.position();
    write!(out, "xref\n")?;
    write!(out, "0 {}\n", total_objects + 1)?;
    write!(out, "0000000000 65535 f \n")?;
    for &offset in &offsets[1..] {
        write!(out, "{offset:010} 00000 n \n")?;
    }

    write!(out, "trailer\n")?;
    write!(out, "<< /Size {} /Root 1 0 R >>\n", total_objects + 1)?;
    write!(out, "startxref\n{xref_offset}\n")?;
    write!(out, "%%EOF")?;

    Ok(())
}
