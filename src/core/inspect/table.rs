//! Plain-text rendering of inspection results.

use std::fmt::Write;

use super::{FigureFormat, FigureInfo};

const RULE_WIDTH: usize = 100;

/// `1234567` → `1,234,567`.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn pixels(value: Option<u64>) -> String {
    value.map(group_thousands).unwrap_or_else(|| "N/A".to_string())
}

fn dpi(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.1}", v))
        .unwrap_or_else(|| "N/A".to_string())
}

/// Fixed-width table followed by a short summary.
pub fn render_table(results: &[FigureInfo]) -> String {
    if results.is_empty() {
        return "No files found.\n".to_string();
    }

    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();
    let _ = writeln!(out, "\n{}", rule);
    let _ = writeln!(
        out,
        "{:<40} {:<8} {:<12} {:<12} {:<10} {:<10}",
        "Filename", "Format", "Width (px)", "Height (px)", "DPI X", "DPI Y"
    );
    let _ = writeln!(out, "{}", rule);

    for info in results {
        let error = info
            .error
            .as_ref()
            .map(|e| format!(" [ERROR: {}]", e))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "{:<40} {:<8} {:<12} {:<12} {:<10} {:<10}{}",
            info.filename,
            info.format.as_str(),
            pixels(info.width_px),
            pixels(info.height_px),
            dpi(info.dpi_x),
            dpi(info.dpi_y),
            error
        );
    }
    let _ = writeln!(out, "{}", rule);

    let count = |format: FigureFormat| results.iter().filter(|r| r.format == format).count();
    let errors = results.iter().filter(|r| r.error.is_some()).count();
    let _ = writeln!(out, "\nSummary:");
    let _ = writeln!(out, "  Total files: {}", results.len());
    let _ = writeln!(out, "  PNG files: {}", count(FigureFormat::Png));
    let _ = writeln!(out, "  PDF files: {}", count(FigureFormat::Pdf));
    if errors > 0 {
        let _ = writeln!(out, "  Files with errors: {}", errors);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(2550), "2,550");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_render_rows_and_summary() {
        let ok = FigureInfo {
            filename: "plot.pdf".to_string(),
            format: FigureFormat::Pdf,
            width_px: Some(2550),
            height_px: Some(3300),
            dpi_x: Some(300.0),
            dpi_y: Some(300.0),
            width_in: Some(8.5),
            height_in: Some(11.0),
            error: None,
        };
        let broken = FigureInfo::failed("broken.png", FigureFormat::Png, "bad header");
        let text = render_table(&[ok, broken]);

        let row = text.lines().find(|l| l.starts_with("plot.pdf")).unwrap();
        assert!(row.contains("2,550"));
        assert!(row.contains("300.0"));

        let row = text.lines().find(|l| l.starts_with("broken.png")).unwrap();
        assert!(row.contains("N/A"));
        assert!(row.ends_with(" [ERROR: bad header]"));

        assert!(text.contains("  Total files: 2\n"));
        assert!(text.contains("  PNG files: 1\n"));
        assert!(text.contains("  Files with errors: 1\n"));
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_table(&[]), "No files found.\n");
    }
}
