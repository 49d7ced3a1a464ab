//! PDF figure geometry and effective resolution.
//!
//! A PDF figure has no pixel size of its own. The page box gives the
//! physical size; when the page paints a raster image, that image's native
//! pixels over its painted size give the effective DPI. Vector-only
//! figures are reported at [`ASSUMED_DPI`].

use std::collections::HashMap;
use std::path::Path;

use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::debug;

use super::Measurement;
use crate::utils::error::{ForgeError, ForgeResult};

/// Print-quality default for figures without an embedded raster image.
pub const ASSUMED_DPI: f64 = 300.0;
const POINTS_PER_INCH: f64 = 72.0;
/// Guard against cyclic `Parent` chains.
const MAX_INHERIT_DEPTH: usize = 32;

/// Native pixel size of an image XObject.
#[derive(Debug, Clone, Copy)]
struct ImagePixels {
    width: f64,
    height: f64,
}

/// A raster image as painted on the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedImage {
    pub width_px: f64,
    pub height_px: f64,
    /// Painted size in points.
    pub width_pt: f64,
    pub height_pt: f64,
}

impl PlacedImage {
    /// Pixels per painted inch on each axis, if both axes have extent.
    pub fn dpi(&self) -> Option<(f64, f64)> {
        let width_in = self.width_pt / POINTS_PER_INCH;
        let height_in = self.height_pt / POINTS_PER_INCH;
        if width_in > 0.0 && height_in > 0.0 {
            Some((self.width_px / width_in, self.height_px / height_in))
        } else {
            None
        }
    }
}

/// Measure the first page of the PDF at `path`.
pub fn measure_pdf(path: &Path) -> ForgeResult<Measurement> {
    let doc = Document::load(path).map_err(|e| ForgeError::pdf(e.to_string()))?;
    measure_document(&doc)
}

pub fn measure_document(doc: &Document) -> ForgeResult<Measurement> {
    let page_id = *doc
        .get_pages()
        .values()
        .next()
        .ok_or_else(|| ForgeError::pdf("Empty PDF"))?;

    let (width_pt, height_pt) = page_size(doc, page_id)?;
    let width_in = width_pt / POINTS_PER_INCH;
    let height_in = height_pt / POINTS_PER_INCH;

    let placed = first_placed_image(doc, page_id);
    debug!(?placed, width_pt, height_pt, "pdf first page");
    let (dpi_x, dpi_y) = placed
        .and_then(|image| image.dpi())
        .unwrap_or((ASSUMED_DPI, ASSUMED_DPI));

    Ok(Measurement {
        width_px: Some((width_in * dpi_x) as u64),
        height_px: Some((height_in * dpi_y) as u64),
        dpi_x: Some(dpi_x),
        dpi_y: Some(dpi_y),
        width_in: Some(width_in),
        height_in: Some(height_in),
    })
}

/// Page size in points, from the CropBox or else the MediaBox.
fn page_size(doc: &Document, page_id: ObjectId) -> ForgeResult<(f64, f64)> {
    let rect = inherited(doc, page_id, b"CropBox")
        .and_then(|obj| rect_size(doc, obj))
        .or_else(|| inherited(doc, page_id, b"MediaBox").and_then(|obj| rect_size(doc, obj)))
        .ok_or_else(|| ForgeError::pdf("page has no MediaBox"))?;
    Ok(rect)
}

fn rect_size(doc: &Document, obj: &Object) -> Option<(f64, f64)> {
    let values: Vec<f64> = match resolve(doc, obj) {
        Object::Array(items) => items.iter().filter_map(|o| number(resolve(doc, o))).collect(),
        _ => return None,
    };
    match values.as_slice() {
        [x0, y0, x1, y1] => Some(((x1 - x0).abs(), (y1 - y0).abs())),
        _ => None,
    }
}

/// Look up a page attribute, following `Parent` for inheritable keys.
fn inherited<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut current = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_INHERIT_DEPTH {
        if let Ok(value) = current.get(key) {
            return Some(resolve(doc, value));
        }
        let parent = current.get(b"Parent").ok()?.as_reference().ok()?;
        current = doc.get_dictionary(parent).ok()?;
    }
    None
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(f64::from(*r)),
        _ => None,
    }
}

fn as_dict<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Dictionary> {
    match resolve(doc, obj) {
        Object::Dictionary(dict) => Some(dict),
        Object::Stream(stream) => Some(&stream.dict),
        _ => None,
    }
}

/// Image XObjects in the page resources, by resource name.
fn page_images(doc: &Document, page_id: ObjectId) -> HashMap<Vec<u8>, ImagePixels> {
    let mut images = HashMap::new();
    let Some(xobjects) = inherited(doc, page_id, b"Resources")
        .and_then(|res| as_dict(doc, res))
        .and_then(|res| res.get(b"XObject").ok())
        .and_then(|xobj| as_dict(doc, xobj))
    else {
        return images;
    };

    for (name, obj) in xobjects.iter() {
        let Some(dict) = as_dict(doc, obj) else {
            continue;
        };
        let is_image = dict
            .get(b"Subtype")
            .ok()
            .and_then(|s| s.as_name().ok())
            .map_or(false, |s| s == b"Image");
        if !is_image {
            continue;
        }
        let width = dict.get(b"Width").ok().and_then(|o| number(resolve(doc, o)));
        let height = dict.get(b"Height").ok().and_then(|o| number(resolve(doc, o)));
        if let (Some(width), Some(height)) = (width, height) {
            images.insert(name.clone(), ImagePixels { width, height });
        }
    }
    images
}

/// Affine transform `[a b c d e f]` as used by the `cm` operator.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix([f64; 6]);

impl Matrix {
    const IDENTITY: Matrix = Matrix([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    /// `self × other`: apply `self` first, then `other`.
    fn then(&self, other: &Matrix) -> Matrix {
        let [a1, b1, c1, d1, e1, f1] = self.0;
        let [a2, b2, c2, d2, e2, f2] = other.0;
        Matrix([
            a1 * a2 + b1 * c2,
            a1 * b2 + b1 * d2,
            c1 * a2 + d1 * c2,
            c1 * b2 + d1 * d2,
            e1 * a2 + f1 * c2 + e2,
            e1 * b2 + f1 * d2 + f2,
        ])
    }

    /// Painted size of the unit square.
    fn unit_extent(&self) -> (f64, f64) {
        let [a, b, c, d, _, _] = self.0;
        ((a * a + b * b).sqrt(), (c * c + d * d).sqrt())
    }
}

/// The first raster image painted by the page's content stream.
pub fn first_placed_image(doc: &Document, page_id: ObjectId) -> Option<PlacedImage> {
    let images = page_images(doc, page_id);
    if images.is_empty() {
        return None;
    }
    let bytes = doc.get_page_content(page_id).ok()?;
    let content = Content::decode(&bytes).ok()?;

    let mut ctm = Matrix::IDENTITY;
    let mut saved = Vec::new();
    for op in &content.operations {
        match op.operator.as_str() {
            "q" => saved.push(ctm),
            "Q" => ctm = saved.pop().unwrap_or(Matrix::IDENTITY),
            "cm" => {
                let values: Vec<f64> = op.operands.iter().filter_map(number).collect();
                if let Ok(m) = <[f64; 6]>::try_from(values.as_slice()) {
                    ctm = Matrix(m).then(&ctm);
                }
            }
            "Do" => {
                let Some(name) = op.operands.first().and_then(|o| o.as_name().ok()) else {
                    continue;
                };
                if let Some(pixels) = images.get(name) {
                    let (width_pt, height_pt) = ctm.unit_extent();
                    return Some(PlacedImage {
                        width_px: pixels.width,
                        height_px: pixels.height,
                        width_pt,
                        height_pt,
                    });
                }
            }
            _ => {}
        }
    }
    None
}
