//! LaTeX document splitter
//!
//! Cuts one converter-generated `.tex` file into per-section files:
//! known front-matter sections (abstract, acknowledgements, lists, ...)
//! and every part and chapter of the main matter.
//!
//! [`split_document`] is pure and returns the sections; [`split_file`]
//! adds the file I/O. Nothing is written unless the whole split succeeds.

pub mod naming;
pub mod patterns;

use std::fmt;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::utils::error::{read_text, write_text, ForgeError, ForgeResult};
use crate::utils::text::ceil_char_boundary;
use naming::{chapter_filename, clean_chapter_title, explicit_chapter_number, part_filename};
use patterns::{
    ANCHOR, BACKMATTER, BEGIN_DOCUMENT, BLANK_RUN, CHAPTER_MARKER, FRONTMATTER,
    FRONT_MATTER_HEADINGS, HEADING_ANCHOR, MAINMATTER, PART_MARKER,
};

pub use naming::sanitize_filename;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    FrontMatter,
    Part,
    Chapter,
}

impl SectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::FrontMatter => "frontmatter_section",
            SectionKind::Part => "part",
            SectionKind::Chapter => "chapter",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One output file of the split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub kind: SectionKind,
    pub filename: String,
    /// Cleaned LaTeX written to `filename`.
    pub content: String,
    /// Position in the output sequence.
    pub order: usize,
    /// Byte range of the uncleaned fragment in the input buffer.
    pub span: Range<usize>,
}

/// A part or chapter marker found in the main matter.
#[derive(Debug, Clone)]
struct Division {
    kind: SectionKind,
    /// Offset of the marker inside the main-matter region.
    start: usize,
    title: String,
    numeral: Option<String>,
}

/// Split a whole LaTeX document into sections.
///
/// Fails with [`ForgeError::MissingMarker`] when `\begin{document}` or
/// `\mainmatter` is absent. A missing `\frontmatter` skips front-matter
/// extraction; a missing `\backmatter` lets the last division run to the
/// end of the document.
pub fn split_document(source: &str) -> ForgeResult<Vec<Section>> {
    let body_start = source
        .find(BEGIN_DOCUMENT)
        .ok_or_else(|| ForgeError::missing_marker(BEGIN_DOCUMENT, ""))?;
    let body = &source[body_start..];

    let main_start = body_start
        + body
            .find(MAINMATTER)
            .ok_or_else(|| ForgeError::missing_marker(MAINMATTER, ""))?;

    let mut sections = Vec::new();

    if let Some(front) = body.find(FRONTMATTER) {
        let front_start = body_start + front;
        if front_start < main_start {
            front_matter_sections(source, front_start..main_start, &mut sections);
        }
    }

    let main_end = source[main_start..]
        .find(BACKMATTER)
        .map(|offset| main_start + offset)
        .unwrap_or(source.len());
    main_matter_sections(source, main_start..main_end, &mut sections);

    Ok(sections)
}

fn front_matter_sections(source: &str, region: Range<usize>, sections: &mut Vec<Section>) {
    let text = &source[region.clone()];

    for heading in FRONT_MATTER_HEADINGS.iter() {
        let Some(found) = heading.pattern.find(text) else {
            continue;
        };
        let start = found.start();
        let search_from = ceil_char_boundary(text, start + 1);
        let end = HEADING_ANCHOR
            .find(&text[search_from..])
            .map(|next| search_from + next.start())
            .unwrap_or(text.len());

        debug!(title = heading.title, start, end, "front-matter section");
        sections.push(Section {
            kind: SectionKind::FrontMatter,
            filename: format!("{}.tex", heading.slug),
            content: clean_latex_content(&text[start..end]),
            order: sections.len(),
            span: region.start + start..region.start + end,
        });
    }
}

fn main_matter_sections(source: &str, region: Range<usize>, sections: &mut Vec<Section>) {
    let text = &source[region.clone()];
    let divisions = find_divisions(text);

    for (i, division) in divisions.iter().enumerate() {
        let end = divisions
            .get(i + 1)
            .map(|next| next.start)
            .unwrap_or(text.len());
        let content = clean_latex_content(&text[division.start..end]);

        let filename = match division.kind {
            SectionKind::Part => {
                let numeral = division.numeral.as_deref().unwrap_or_default();
                part_filename(numeral, &division.title)
            }
            _ => {
                let number = match explicit_chapter_number(&content) {
                    Some(digits) => digits.to_string(),
                    None => {
                        let seen = sections
                            .iter()
                            .filter(|s| s.kind == SectionKind::Chapter)
                            .count();
                        (seen + 1).to_string()
                    }
                };
                chapter_filename(&number, &clean_chapter_title(&division.title))
            }
        };

        debug!(kind = %division.kind, %filename, start = division.start, end, "division");
        sections.push(Section {
            kind: division.kind,
            filename,
            content,
            order: sections.len(),
            span: region.start + division.start..region.start + end,
        });
    }
}

/// All part and chapter markers in `text`, in source order.
fn find_divisions(text: &str) -> Vec<Division> {
    let parts = PART_MARKER.captures_iter(text).map(|caps| Division {
        kind: SectionKind::Part,
        start: caps.get(0).map_or(0, |m| m.start()),
        title: caps[2].trim().to_string(),
        numeral: Some(caps[1].to_string()),
    });
    let chapters = CHAPTER_MARKER.captures_iter(text).map(|caps| Division {
        kind: SectionKind::Chapter,
        start: caps.get(0).map_or(0, |m| m.start()),
        title: caps[1].to_string(),
        numeral: None,
    });

    let mut divisions: Vec<Division> = parts.chain(chapters).collect();
    divisions.sort_by_key(|d| d.start);
    divisions
}

/// Remove pandoc anchors and squeeze blank-line runs.
pub fn clean_latex_content(content: &str) -> String {
    let content = ANCHOR.replace_all(content, "");
    let content = BLANK_RUN.replace_all(&content, "\n\n");
    content.trim().to_string()
}

/// Files written by [`split_file`].
#[derive(Debug, Clone, Serialize)]
pub struct SplitSummary {
    pub output_dir: PathBuf,
    pub files: Vec<(String, SectionKind)>,
}

/// Write `sections` into `output_dir`, creating it if needed.
pub fn write_sections(sections: &[Section], output_dir: &Path) -> ForgeResult<Vec<PathBuf>> {
    fs::create_dir_all(output_dir).map_err(|e| ForgeError::io(output_dir, e))?;

    let mut written = Vec::with_capacity(sections.len());
    for section in sections {
        let path = output_dir.join(&section.filename);
        write_text(&path, &section.content)?;
        info!("Saved: {} ({})", section.filename, section.kind);
        written.push(path);
    }
    Ok(written)
}

/// Split `tex_file` and write one file per section into `output_dir`.
pub fn split_file(tex_file: &Path, output_dir: &Path) -> ForgeResult<SplitSummary> {
    let source = read_text(tex_file)?;
    let sections = split_document(&source).map_err(|e| e.with_path(tex_file))?;
    write_sections(&sections, output_dir)?;

    info!(
        "Total: {} files created in {}",
        sections.len(),
        output_dir.display()
    );
    Ok(SplitSummary {
        output_dir: output_dir.to_path_buf(),
        files: sections
            .into_iter()
            .map(|s| (s.filename, s.kind))
            .collect(),
    })
}
