//! Image references and captions in converter output.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::utils::text::{
    braced_group, ceil_char_boundary, collapse_whitespace, floor_char_boundary, truncate_chars,
};

/// Bytes of surrounding text kept around a caption-less image.
const CONTEXT_RADIUS: usize = 200;
/// Characters of that context shown in the record.
const CONTEXT_SHOWN: usize = 100;

lazy_static! {
    static ref FIGURE_BLOCK: Regex =
        Regex::new(r"(?s)\\begin\{figure\*?\}.*?\\end\{figure\*?\}").unwrap();
    static ref INCLUDEGRAPHICS: Regex =
        Regex::new(r"\\includegraphics\*?\s*(?:\[[^\]]*\])?\s*\{([^}]+)\}").unwrap();
    static ref CAPTION_OPENER: Regex = Regex::new(r"\\caption\s*(?:\[[^\]]*\])?\s*\{").unwrap();
    static ref TEXTBAR: Regex = Regex::new(r"\\textbar(?:\{\})?").unwrap();
    static ref TEXTBACKSLASH: Regex = Regex::new(r"\\textbackslash(?:\{\})?").unwrap();
    static ref ESCAPED_CHAR: Regex = Regex::new(r"\\([%&_#$])").unwrap();
    static ref COMMAND_NAME: Regex = Regex::new(r"\\[a-zA-Z]+\*?").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FigureKind {
    /// Found inside a `figure` environment with a caption.
    FigureBlock,
    /// A bare `\includegraphics`; the caption holds surrounding text instead.
    Standalone,
}

impl FigureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FigureKind::FigureBlock => "figure_block",
            FigureKind::Standalone => "standalone",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FigureRecord {
    pub path: String,
    pub caption: String,
    pub kind: FigureKind,
}

/// Collect every image reference in `source`.
///
/// Captioned figure blocks come first, in source order; then every
/// `\includegraphics` whose path was not already recorded.
pub fn extract_figures(source: &str) -> Vec<FigureRecord> {
    let mut figures = Vec::new();

    for block in FIGURE_BLOCK.find_iter(source) {
        let block = block.as_str();
        let Some(image) = INCLUDEGRAPHICS.captures(block) else {
            continue;
        };
        let Some(caption) = find_caption(block) else {
            continue;
        };
        figures.push(FigureRecord {
            path: image[1].trim().to_string(),
            caption: clean_caption(caption),
            kind: FigureKind::FigureBlock,
        });
    }

    for image in INCLUDEGRAPHICS.captures_iter(source) {
        let path = image[1].trim();
        if figures.iter().any(|f| f.path == path) {
            continue;
        }
        let start = image.get(0).map_or(0, |m| m.start());
        figures.push(FigureRecord {
            path: path.to_string(),
            caption: format!("[no caption - context: {}...]", context_around(source, start)),
            kind: FigureKind::Standalone,
        });
    }

    figures
}

fn find_caption(block: &str) -> Option<&str> {
    let opener = CAPTION_OPENER.find(block)?;
    // the opener ends just past the '{'
    braced_group(&block[opener.end() - 1..])
}

/// Flatten a LaTeX caption into plain text.
pub fn clean_caption(caption: &str) -> String {
    let text = TEXTBAR.replace_all(caption, "|");
    let text = TEXTBACKSLASH.replace_all(&text, "");
    let text = ESCAPED_CHAR.replace_all(&text, "$1");
    let text = COMMAND_NAME.replace_all(&text, "");
    let text = text.replace(['{', '}'], "");
    collapse_whitespace(&text)
}

fn context_around(source: &str, at: usize) -> String {
    let start = floor_char_boundary(source, at.saturating_sub(CONTEXT_RADIUS));
    let end = ceil_char_boundary(source, at + CONTEXT_RADIUS);
    truncate_chars(&source[start..end], CONTEXT_SHOWN).replace(['\n', '\r'], " ")
}
