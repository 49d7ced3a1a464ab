//! Figure mapping report and template.

use std::fmt::Write;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Local};
use tracing::{info, warn};

use super::extract::{extract_figures, FigureRecord};
use crate::utils::error::{read_text, write_text, ForgeError, ForgeResult};
use crate::utils::text::truncate_chars;

/// Default report file name, relative to the working directory.
pub const DEFAULT_REPORT_FILE: &str = "figure_mapping_report.txt";

const USER_FIGURE_EXTENSIONS: &[&str] = &["png", "pdf", "jpg", "jpeg"];
/// Directory name the converter extracts media into.
const CONVERTER_MEDIA_DIR: &str = "media";
const CAPTION_WIDTH: usize = 150;
const RULE_WIDTH: usize = 80;
/// Stands in for `|` in report prose so only template lines parse as mappings.
const PIPE_SUBSTITUTE: &str = "¦";

/// Everything that goes into the report.
#[derive(Debug, Clone)]
pub struct MappingReport {
    pub figures: Vec<FigureRecord>,
    pub user_figures: Vec<String>,
    pub generated: DateTime<Local>,
}

impl MappingReport {
    pub fn new(figures: Vec<FigureRecord>, user_figures: Vec<String>) -> Self {
        Self {
            figures,
            user_figures,
            generated: Local::now(),
        }
    }

    pub fn render(&self) -> String {
        let heavy = "=".repeat(RULE_WIDTH);
        let light = "-".repeat(RULE_WIDTH);
        let mut out = String::new();

        let _ = writeln!(out, "{}", heavy);
        let _ = writeln!(out, "FIGURE MAPPING REPORT");
        let _ = writeln!(out, "Generated: {}", self.generated.format("%Y-%m-%d %H:%M:%S"));
        let _ = writeln!(out, "{}\n", heavy);

        let _ = writeln!(out, "FIGURES EXTRACTED BY THE CONVERTER:");
        let _ = writeln!(out, "{}", light);
        for (i, figure) in self.figures.iter().enumerate() {
            let _ = writeln!(out, "\n{}. {}", i + 1, figure.path);
            let caption = truncate_chars(&figure.caption, CAPTION_WIDTH);
            let _ = writeln!(out, "   Caption: {}", caption.replace('|', PIPE_SUBSTITUTE));
            let _ = writeln!(out, "   Kind: {}", figure.kind.as_str());
        }

        let _ = writeln!(out, "\n\n{}", heavy);
        let _ = writeln!(out, "USER FIGURES:");
        let _ = writeln!(out, "{}", light);
        for (i, name) in self.user_figures.iter().enumerate() {
            let _ = writeln!(out, "{}. {}", i + 1, name.replace('|', PIPE_SUBSTITUTE));
        }

        let _ = writeln!(out, "\n\n{}", heavy);
        let _ = writeln!(out, "MAPPING TEMPLATE (edit by hand):");
        let _ = writeln!(out, "{}", light);
        let _ = writeln!(out, "# Format: source_path|user_path");
        let _ = writeln!(
            out,
            "# Example: source/figures/thesis/media/image2.png|fig_2_1.png\n"
        );
        for figure in &self.figures {
            let _ = writeln!(out, "{}|", figure.path);
        }

        out
    }
}

/// File names of the user's own figures under `dir`, sorted.
///
/// Searches recursively and skips the converter's `media` folders.
pub fn list_user_figures(dir: &Path) -> ForgeResult<Vec<String>> {
    let mut names = Vec::new();
    if !dir.is_dir() {
        warn!("Figures directory {} does not exist", dir.display());
        return Ok(names);
    }
    collect_user_figures(dir, &mut names)?;
    names.sort();
    Ok(names)
}

fn collect_user_figures(dir: &Path, names: &mut Vec<String>) -> ForgeResult<()> {
    let entries = fs::read_dir(dir).map_err(|e| ForgeError::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| ForgeError::io(dir, e))?;
        let path = entry.path();
        if path.is_dir() {
            if entry.file_name() != CONVERTER_MEDIA_DIR {
                collect_user_figures(&path, names)?;
            }
            continue;
        }
        let is_figure = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| USER_FIGURE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
            .unwrap_or(false);
        if is_figure {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    Ok(())
}

/// Scan `tex_file`, list `figures_dir`, and write the report to `output`.
pub fn write_mapping_report(
    tex_file: &Path,
    figures_dir: &Path,
    output: &Path,
) -> ForgeResult<MappingReport> {
    let source = read_text(tex_file)?;
    let report = MappingReport::new(extract_figures(&source), list_user_figures(figures_dir)?);
    write_text(output, &report.render())?;

    info!("Report written to: {}", output.display());
    info!("  - {} converter figures found", report.figures.len());
    info!("  - {} user figures available", report.user_figures.len());
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::figures::extract::FigureKind;
    use crate::core::figures::mapping::MappingTable;
    use chrono::TimeZone;

    fn report() -> MappingReport {
        MappingReport {
            figures: vec![
                FigureRecord {
                    path: "media/image1.png".to_string(),
                    caption: "x".repeat(200),
                    kind: FigureKind::FigureBlock,
                },
                FigureRecord {
                    path: "media/image2.png".to_string(),
                    caption: "[no caption - context: ...]".to_string(),
                    kind: FigureKind::Standalone,
                },
            ],
            user_figures: vec!["fig_1.png".to_string()],
            generated: Local.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_render_sections() {
        let text = report().render();
        assert!(text.contains("Generated: 2024-05-01 12:00:00"));
        assert!(text.contains("\n1. media/image1.png\n"));
        assert!(text.contains("   Kind: standalone"));
        assert!(text.contains("1. fig_1.png\n"));
        assert!(text.ends_with("media/image1.png|\nmedia/image2.png|\n"));
    }

    #[test]
    fn test_rendered_report_parses_to_empty_mapping() {
        let mut report = report();
        report.figures[0].caption = "Catchment map | 1:50000 scale".to_string();
        report.figures[1].caption = "[no caption - context: a | b...]".to_string();
        report.user_figures.push("odd|name.png".to_string());

        let text = report.render();
        assert!(text.contains("   Caption: Catchment map ¦ 1:50000 scale\n"));
        assert!(MappingTable::parse(&text).is_empty());
    }

    #[test]
    fn test_render_truncates_caption() {
        let text = report().render();
        let caption_line = text
            .lines()
            .find(|l| l.starts_with("   Caption: xxx"))
            .unwrap();
        assert_eq!(caption_line.len(), "   Caption: ".len() + 150);
    }
}
