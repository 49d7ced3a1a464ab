//! File names for split sections.

use lazy_static::lazy_static;
use regex::Regex;

use super::patterns::{CHAPTER_NUMBER, COMMAND_OPENER, TEXORPDFSTRING};
use crate::utils::text::prefix_bytes;

/// How far into a chapter to look for an explicit "Chapter N".
const CHAPTER_NUMBER_WINDOW: usize = 200;

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"[^\w\s-]").unwrap();
    static ref SEPARATORS: Regex = Regex::new(r"[-\s]+").unwrap();
}

/// Turn a heading into a file-system safe stem.
///
/// Lowercases, drops everything but word characters, whitespace and `-`,
/// then joins the remaining words with `_`. Applying it twice gives the
/// same result as applying it once.
pub fn sanitize_filename(name: &str) -> String {
    let lowered = name.to_lowercase();
    let stripped = NON_WORD.replace_all(&lowered, "");
    let joined = SEPARATORS.replace_all(&stripped, "_");
    joined.trim_matches(|c| c == '-' || c == '_').to_string()
}

/// Strip LaTeX wrappers from a `\chapter{...}` title.
pub fn clean_chapter_title(raw: &str) -> String {
    let title = TEXORPDFSTRING.replace_all(raw, "$1");
    let title = COMMAND_OPENER.replace_all(&title, "");
    title.trim().to_string()
}

pub fn part_filename(numeral: &str, title: &str) -> String {
    let numeral = numeral.to_lowercase();
    match sanitize_filename(title) {
        stem if stem.is_empty() => format!("part_{}.tex", numeral),
        stem => format!("part_{}_{}.tex", numeral, stem),
    }
}

/// Digits of the chapter number written near the top of the fragment, if any.
///
/// Kept as written, so numbers of any length survive into the file name.
pub fn explicit_chapter_number(content: &str) -> Option<&str> {
    CHAPTER_NUMBER
        .captures(prefix_bytes(content, CHAPTER_NUMBER_WINDOW))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

pub fn chapter_filename(number: &str, title: &str) -> String {
    match sanitize_filename(title) {
        stem if stem.is_empty() => format!("chapter_{}.tex", number),
        stem => format!("chapter_{}_{}.tex", number, stem),
    }
}
