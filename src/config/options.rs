use serde::Deserialize;

use crate::error::{ConvertError, Result};

/// Image format for extracted PDF pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Png,
    Jpeg,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "png" => Some(Self::Png),
            "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
        }
    }
}

/// Options for one conversion batch. Validated once at batch start,
/// immutable afterwards.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub format: OutputFormat,
    /// JPEG quality, 1-100. Ignored for PNG output.
    pub quality: u8,
    pub dpi: u32,
    /// Pack extracted images into a CBZ archive.
    pub create_cbz: bool,
    /// Remove the loose image directory after CBZ packing.
    pub clean_images: bool,
    /// CBZ -> PDF mode instead of PDF -> images.
    pub to_pdf: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            format: OutputFormat::Jpeg,
            quality: 80,
            dpi: 150,
            create_cbz: false,
            clean_images: false,
            to_pdf: false,
        }
    }
}

impl ConvertOptions {
    /// Reject inconsistent option combinations before any processing
    /// begins.
    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.quality) {
            return Err(ConvertError::config(format!(
                "quality must be between 1 and 100, got {}",
                self.quality
            )));
        }

        if self.dpi == 0 {
            return Err(ConvertError::config("dpi must be greater than 0"));
        }

        if self.to_pdf {
            if self.create_cbz || self.clean_images {
                return Err(ConvertError::config(
                    "--cbz and --clean are not supported with --pdf",
                ));
            }
        } else if self.clean_images && !self.create_cbz {
            return Err(ConvertError::config("--clean requires --cbz"));
        }

        Ok(())
    }
}
