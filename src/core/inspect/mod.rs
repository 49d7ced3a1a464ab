//! Figure inspector
//!
//! Reports pixel size and resolution for the PNG and PDF figures in a
//! folder, so low-resolution images can be caught before printing.

pub mod pdf;
pub mod raster;
pub mod table;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::utils::error::{ForgeError, ForgeResult};

pub use table::render_table;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FigureFormat {
    Png,
    Pdf,
}

impl FigureFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(FigureFormat::Png),
            "pdf" => Some(FigureFormat::Pdf),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FigureFormat::Png => "PNG",
            FigureFormat::Pdf => "PDF",
        }
    }
}

/// Size and resolution read from one file.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Measurement {
    pub width_px: Option<u64>,
    pub height_px: Option<u64>,
    pub dpi_x: Option<f64>,
    pub dpi_y: Option<f64>,
    pub width_in: Option<f64>,
    pub height_in: Option<f64>,
}

/// One row of the inspection report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FigureInfo {
    pub filename: String,
    pub format: FigureFormat,
    pub width_px: Option<u64>,
    pub height_px: Option<u64>,
    pub dpi_x: Option<f64>,
    pub dpi_y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width_in: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_in: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FigureInfo {
    pub fn measured(filename: impl Into<String>, format: FigureFormat, m: Measurement) -> Self {
        Self {
            filename: filename.into(),
            format,
            width_px: m.width_px,
            height_px: m.height_px,
            dpi_x: m.dpi_x,
            dpi_y: m.dpi_y,
            width_in: m.width_in,
            height_in: m.height_in,
            error: None,
        }
    }

    pub fn failed(
        filename: impl Into<String>,
        format: FigureFormat,
        error: impl Into<String>,
    ) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::measured(filename, format, Measurement::default())
        }
    }
}

/// Inspect one file. Failures end up in [`FigureInfo::error`].
pub fn inspect_file(path: &Path, format: FigureFormat) -> FigureInfo {
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let measured = match format {
        FigureFormat::Png => raster::measure_png(path),
        FigureFormat::Pdf => pdf::measure_pdf(path),
    };
    match measured {
        Ok(m) => FigureInfo::measured(filename, format, m),
        Err(err) => {
            debug!(file = %path.display(), %err, "inspection failed");
            let message = match err {
                ForgeError::Pdf { message } | ForgeError::Image { message } => message,
                other => other.to_string(),
            };
            FigureInfo::failed(filename, format, message)
        }
    }
}

/// Inspect every PNG, then every PDF, directly inside `dir`.
pub fn scan_folder(dir: &Path) -> ForgeResult<Vec<FigureInfo>> {
    if !dir.is_dir() {
        return Err(ForgeError::missing_input(dir));
    }

    let mut pngs: Vec<PathBuf> = Vec::new();
    let mut pdfs: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| ForgeError::io(dir, e))? {
        let path = entry.map_err(|e| ForgeError::io(dir, e))?.path();
        if !path.is_file() {
            continue;
        }
        match FigureFormat::from_path(&path) {
            Some(FigureFormat::Png) => pngs.push(path),
            Some(FigureFormat::Pdf) => pdfs.push(path),
            None => {}
        }
    }
    pngs.sort();
    pdfs.sort();
    info!("Found {} PNG files and {} PDF files.", pngs.len(), pdfs.len());

    let mut results = Vec::with_capacity(pngs.len() + pdfs.len());
    for (paths, format) in [(pngs, FigureFormat::Png), (pdfs, FigureFormat::Pdf)] {
        for path in paths {
            info!("Processing {}...", path.display());
            results.push(inspect_file(&path, format));
        }
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(FigureFormat::from_path(Path::new("a.PNG")), Some(FigureFormat::Png));
        assert_eq!(FigureFormat::from_path(Path::new("dir/b.pdf")), Some(FigureFormat::Pdf));
        assert_eq!(FigureFormat::from_path(Path::new("c.jpg")), None);
        assert_eq!(FigureFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_failed_info_serializes_error() {
        let info = FigureInfo::failed("x.pdf", FigureFormat::Pdf, "Empty PDF");
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["error"], "Empty PDF");
        assert_eq!(json["format"], "PDF");
        assert!(json["width_px"].is_null());
        assert!(json.get("width_in").is_none());
    }

    #[test]
    fn test_scan_missing_folder() {
        let err = scan_folder(Path::new("/no/such/figures")).unwrap_err();
        assert!(matches!(err, ForgeError::MissingInput { .. }));
    }
}
