use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Archive open error: {0}")]
    ArchiveOpenError(String),

    #[error("Archive read error: {0}")]
    ArchiveReadError(String),

    #[error("Unsupported entry format: {0}")]
    UnsupportedEntryFormat(String),

    #[error("JPEG dimension parse error: {0}")]
    DimensionParseError(String),

    #[error("No supported images: {0}")]
    NoSupportedImagesError(String),

    #[error("Directory create error: {0}")]
    DirectoryCreateError(String),

    #[error("Write error: {0}")]
    WriteError(String),

    #[error("Render error: {0}")]
    RenderError(String),

    #[error("Document load error: {0}")]
    DocumentLoadError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Generates factory methods for [`ConvertError`] variants that wrap a `String`.
macro_rules! error_constructors {
    ($(
        $(#[doc = $doc:expr])*
        $method:ident => $variant:ident
    ),* $(,)?) => {
        impl ConvertError {
            $(
                $(#[doc = $doc])*
                pub fn $method(msg: impl Into<String>) -> Self {
                    Self::$variant(msg.into())
                }
            )*
        }
    };
}

error_constructors! {
    /// Create a configuration error.
    config => ConfigError,
    /// Create an archive open error.
    archive_open => ArchiveOpenError,
    /// Create an archive read error.
    archive_read => ArchiveReadError,
    /// Create an unsupported entry format error.
    unsupported_entry => UnsupportedEntryFormat,
    /// Create a JPEG dimension parse error.
    dimension_parse => DimensionParseError,
    /// Create a "no supported images" error.
    no_supported_images => NoSupportedImagesError,
    /// Create a directory create error.
    directory_create => DirectoryCreateError,
    /// Create a write error.
    write => WriteError,
    /// Create a render error.
    render => RenderError,
    /// Create a document load error.
    document_load => DocumentLoadError,
}

impl From<zip::result::ZipError> for ConvertError {
    fn from(e: zip::result::ZipError) -> Self {
        Self::ArchiveReadError(e.to_string())
    }
}

impl From<image::ImageError> for ConvertError {
    fn from(e: image::ImageError) -> Self {
        Self::WriteError(e.to_string())
    }
}

impl From<pdfium_render::prelude::PdfiumError> for ConvertError {
    fn from(e: pdfium_render::prelude::PdfiumError) -> Self {
        Self::RenderError(e.to_string())
    }
}

impl From<serde_yml::Error> for ConvertError {
    fn from(e: serde_yml::Error) -> Self {
        Self::ConfigError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
