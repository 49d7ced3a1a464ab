//! Structural markers in pandoc's LaTeX output.
//!
//! Pandoc renders unnumbered Word headings (front-matter titles, "Part I."
//! separators) as `\protect\phantomsection\label{id}{}{Title}` and numbered
//! top-level headings as `\chapter{Title}`. Everything here is tied to that
//! output shape.

use lazy_static::lazy_static;
use regex::Regex;

pub const BEGIN_DOCUMENT: &str = "\\begin{document}";
pub const FRONTMATTER: &str = "\\frontmatter";
pub const MAINMATTER: &str = "\\mainmatter";
pub const BACKMATTER: &str = "\\backmatter";

/// Known front-matter titles, in output order, with their file slug.
pub const FRONT_MATTER_TITLES: &[(&str, &str)] = &[
    ("Abstract", "abstract"),
    ("Resumen", "resumen"),
    ("Resum", "resum"),
    ("Acknowledgements", "acknowledgements"),
    ("List of Figures", "list_of_figures"),
    ("List of Tables", "list_of_tables"),
    ("List of Abbreviations", "list_of_abbreviations"),
];

/// A front-matter heading and the regex that finds it.
pub struct FrontMatterHeading {
    pub title: &'static str,
    pub slug: &'static str,
    pub pattern: Regex,
}

lazy_static! {
    /// Any pandoc heading anchor followed by a title group.
    pub static ref HEADING_ANCHOR: Regex =
        Regex::new(r"\\protect\\phantomsection\\label\{[^}]+\}\{\}\{").unwrap();

    /// Bare anchor, stripped from every written fragment.
    pub static ref ANCHOR: Regex =
        Regex::new(r"\\protect\\phantomsection\\label\{[^}]+\}\{\}").unwrap();

    /// `Part <ROMAN>. <title>` separators.
    pub static ref PART_MARKER: Regex = Regex::new(
        r"\\protect\\phantomsection\\label\{[^}]+\}\{\}\{Part\s+([IVX]+)\.\s*([^}]+)\}"
    )
    .unwrap();

    pub static ref CHAPTER_MARKER: Regex = Regex::new(r"\\chapter\{([^}]+)\}").unwrap();

    /// Explicit chapter number near the top of a chapter.
    pub static ref CHAPTER_NUMBER: Regex = Regex::new(r"Chapter\s+(\d+)").unwrap();

    pub static ref TEXORPDFSTRING: Regex =
        Regex::new(r"\\texorpdfstring\{[^}]+\}\{([^}]+)\}").unwrap();

    pub static ref COMMAND_OPENER: Regex = Regex::new(r"\\[a-zA-Z]+\{").unwrap();

    pub static ref BLANK_RUN: Regex = Regex::new(r"\n{3,}").unwrap();

    pub static ref FRONT_MATTER_HEADINGS: Vec<FrontMatterHeading> = FRONT_MATTER_TITLES
        .iter()
        .map(|&(title, slug)| FrontMatterHeading {
            title,
            slug,
            pattern: Regex::new(&format!(
                r"\\protect\\phantomsection\\label\{{[^}}]+\}}\{{\}}\{{{}\}}",
                regex::escape(title)
            ))
            .unwrap(),
        })
        .collect();
}
