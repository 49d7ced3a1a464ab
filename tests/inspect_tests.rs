use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use pretty_assertions::assert_eq;
use thesis_forge::core::inspect::{render_table, scan_folder, FigureFormat};

fn write_png(path: &Path, width: u32, height: u32, pixels_per_metre: Option<u32>) {
    let file = File::create(path).expect("create png");
    let mut encoder = png::Encoder::new(BufWriter::new(file), width, height);
    encoder.set_color(png::ColorType::Grayscale);
    encoder.set_depth(png::BitDepth::Eight);
    if let Some(ppm) = pixels_per_metre {
        encoder.set_pixel_dims(Some(png::PixelDimensions {
            xppu: ppm,
            yppu: ppm,
            unit: png::Unit::Meter,
        }));
    }
    let mut writer = encoder.write_header().expect("png header");
    writer
        .write_image_data(&vec![128u8; (width * height) as usize])
        .expect("png data");
}

/// Single-page PDF; with `image` set, the page paints a `w`×`h` pixel
/// image stretched over the whole page.
fn write_pdf(path: &Path, page_w: i64, page_h: i64, image: Option<(i64, i64)>) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut operations = Vec::new();
    let mut resources = Dictionary::new();
    if let Some((w, h)) = image {
        let image_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => w,
                "Height" => h,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
            },
            vec![0u8; (w * h) as usize],
        ));
        resources.set("XObject", dictionary! { "Im0" => Object::Reference(image_id) });
        operations = vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Integer(page_w),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(page_h),
                    Object::Integer(0),
                    Object::Integer(0),
                ],
            ),
            Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
            Operation::new("Q", vec![]),
        ];
    }
    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => Object::Reference(pages_id),
        "Contents" => Object::Reference(content_id),
        "Resources" => resources,
    });
    // MediaBox lives on the page tree node and is inherited
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![Object::Reference(page_id)],
        "Count" => 1,
        "MediaBox" => vec![0.into(), 0.into(), page_w.into(), page_h.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));
    doc.save(path).expect("save pdf");
}

fn figures_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_png(&dir.path().join("fig_1.png"), 40, 20, Some(11811));
    write_png(&dir.path().join("fig_0.png"), 8, 8, None);
    write_pdf(&dir.path().join("a_vector.pdf"), 612, 792, None);
    write_pdf(&dir.path().join("b_raster.pdf"), 144, 72, Some((400, 200)));
    fs::write(dir.path().join("broken.pdf"), "definitely not a pdf").unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
    dir
}

#[test]
fn scan_orders_pngs_then_pdfs() {
    let dir = figures_dir();
    let results = scan_folder(dir.path()).unwrap();
    let names: Vec<_> = results
        .iter()
        .map(|r| (r.filename.as_str(), r.format))
        .collect();
    assert_eq!(
        names,
        vec![
            ("fig_0.png", FigureFormat::Png),
            ("fig_1.png", FigureFormat::Png),
            ("a_vector.pdf", FigureFormat::Pdf),
            ("b_raster.pdf", FigureFormat::Pdf),
            ("broken.pdf", FigureFormat::Pdf),
        ]
    );
}

#[test]
fn png_resolution_from_phys_chunk() {
    let dir = figures_dir();
    let results = scan_folder(dir.path()).unwrap();

    let plain = &results[0];
    assert_eq!((plain.width_px, plain.height_px), (Some(8), Some(8)));
    assert_eq!(plain.dpi_x, None);
    assert!(plain.error.is_none());

    let dense = &results[1];
    assert_eq!((dense.width_px, dense.height_px), (Some(40), Some(20)));
    assert!((dense.dpi_x.unwrap() - 300.0).abs() < 0.01);
    assert!((dense.dpi_y.unwrap() - 300.0).abs() < 0.01);
}

#[test]
fn vector_pdf_uses_assumed_resolution() {
    let dir = figures_dir();
    let results = scan_folder(dir.path()).unwrap();
    let vector = &results[2];
    assert_eq!(vector.width_px, Some(2550));
    assert_eq!(vector.height_px, Some(3300));
    assert_eq!(vector.dpi_x, Some(300.0));
    assert_eq!(vector.width_in, Some(8.5));
    assert_eq!(vector.height_in, Some(11.0));
}

#[test]
fn raster_pdf_uses_painted_image_resolution() {
    let dir = figures_dir();
    let results = scan_folder(dir.path()).unwrap();
    let raster = &results[3];
    assert_eq!(raster.dpi_x, Some(200.0));
    assert_eq!(raster.dpi_y, Some(200.0));
    assert_eq!((raster.width_px, raster.height_px), (Some(400), Some(200)));
}

#[test]
fn unreadable_pdf_is_reported_not_fatal() {
    let dir = figures_dir();
    let results = scan_folder(dir.path()).unwrap();
    let broken = &results[4];
    assert!(broken.error.is_some());
    assert_eq!(broken.width_px, None);

    let table = render_table(&results);
    assert!(table.contains("broken.pdf"));
    assert!(table.contains("[ERROR:"));
    assert!(table.contains("2,550"));
}

#[test]
fn empty_folder_yields_no_rows() {
    let dir = tempfile::tempdir().unwrap();
    assert!(scan_folder(dir.path()).unwrap().is_empty());
}
