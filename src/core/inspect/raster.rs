//! PNG dimensions and resolution.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use png::{PixelDimensions, Unit};

use super::Measurement;
use crate::utils::error::{ForgeError, ForgeResult};

const INCHES_PER_METRE: f64 = 0.0254;

/// Read the PNG header and `pHYs` chunk of `path`.
pub fn measure_png(path: &Path) -> ForgeResult<Measurement> {
    let file = File::open(path).map_err(|e| ForgeError::io(path, e))?;
    let reader = png::Decoder::new(BufReader::new(file))
        .read_info()
        .map_err(|e| ForgeError::image(e.to_string()))?;
    let info = reader.info();

    let dpi = info.pixel_dims.as_ref().and_then(dpi_from_pixel_dims);
    Ok(Measurement {
        width_px: Some(u64::from(info.width)),
        height_px: Some(u64::from(info.height)),
        dpi_x: dpi.map(|(x, _)| x),
        dpi_y: dpi.map(|(_, y)| y),
        width_in: None,
        height_in: None,
    })
}

/// `pHYs` only carries a physical resolution when its unit is the metre;
/// otherwise it is just an aspect ratio.
fn dpi_from_pixel_dims(dims: &PixelDimensions) -> Option<(f64, f64)> {
    match dims.unit {
        Unit::Meter => Some((
            f64::from(dims.xppu) * INCHES_PER_METRE,
            f64::from(dims.yppu) * INCHES_PER_METRE,
        )),
        Unit::Unspecified => None,
    }
}
