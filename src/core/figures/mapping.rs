//! User-edited figure mapping files.
//!
//! One mapping per line, `converter_path|user_path`. Lines starting with
//! `#`, blank lines and lines with an empty right-hand side are skipped.

use std::path::Path;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::utils::error::{read_text, write_text, ForgeError, ForgeResult};

/// Source path → destination path, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingTable {
    entries: IndexMap<String, String>,
}

impl MappingTable {
    pub fn parse(text: &str) -> Self {
        let mut entries = IndexMap::new();
        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let parts: Vec<&str> = line.split('|').collect();
            match parts.as_slice() {
                [from, to] if !to.trim().is_empty() => {
                    entries.insert(from.trim().to_string(), to.trim().to_string());
                }
                [_, _] => {}
                _ => debug!(line = lineno + 1, "ignoring malformed mapping line"),
            }
        }
        Self { entries }
    }

    pub fn load(path: &Path) -> ForgeResult<Self> {
        Ok(Self::parse(&read_text(path)?))
    }

    pub fn insert(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.entries.insert(from.into(), to.into());
    }

    pub fn get(&self, from: &str) -> Option<&str> {
        self.entries.get(from).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Replace every occurrence of each source path with its normalized
    /// destination. Plain substring replacement, applied in table order.
    pub fn apply(&self, source: &str, figures_root: &str) -> (String, MappingOutcome) {
        let mut content = source.to_string();
        let mut outcome = MappingOutcome::default();

        for (from, to) in self.iter() {
            if from.is_empty() {
                continue;
            }
            let occurrences = content.matches(from).count();
            if occurrences == 0 {
                outcome.missing.push(from.to_string());
                continue;
            }
            let destination = normalize_destination(to, figures_root);
            content = content.replace(from, &destination);
            outcome.replaced.push(Replacement {
                from: from.to_string(),
                to: destination,
                occurrences,
            });
        }

        (content, outcome)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Replacement {
    pub from: String,
    pub to: String,
    pub occurrences: usize,
}

/// What [`MappingTable::apply`] changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MappingOutcome {
    pub replaced: Vec<Replacement>,
    /// Source paths that did not occur in the document.
    pub missing: Vec<String>,
}

impl MappingOutcome {
    pub fn total_occurrences(&self) -> usize {
        self.replaced.iter().map(|r| r.occurrences).sum()
    }
}

/// Make a user path usable from the document: forward slashes, and rooted
/// under the figures directory unless it already is.
pub fn normalize_destination(destination: &str, figures_root: &str) -> String {
    let destination = destination.trim().replace('\\', "/");
    let destination = destination.trim_start_matches("./");
    let root = figures_root.replace('\\', "/");
    let root = root.trim_end_matches('/');

    if root.is_empty() || destination == root || destination.starts_with(&format!("{}/", root)) {
        destination.to_string()
    } else {
        format!("{}/{}", root, destination)
    }
}

/// Rewrite the image paths of `tex_file` per `mapping_file` into `output_file`.
pub fn apply_mapping_file(
    tex_file: &Path,
    mapping_file: &Path,
    output_file: &Path,
    figures_root: &Path,
) -> ForgeResult<MappingOutcome> {
    let table = MappingTable::load(mapping_file)?;
    if table.is_empty() {
        return Err(ForgeError::EmptyMapping {
            path: mapping_file.to_path_buf(),
        });
    }

    let source = read_text(tex_file)?;
    let (content, outcome) = table.apply(&source, &figures_root.to_string_lossy());
    write_text(output_file, &content)?;

    info!(
        "Mapping applied: {} figures replaced ({} occurrences)",
        outcome.replaced.len(),
        outcome.total_occurrences()
    );
    for missing in &outcome.missing {
        warn!("Mapped path not found in document: {}", missing);
    }
    info!("Output written to: {}", output_file.display());

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MAPPING: &str = "\
# Format: source_path|user_path
source/figures/thesis/media/image1.png|fig_1_1.png

source/figures/thesis/media/image2.png|
source/figures/thesis/media/image3.png | sub\\fig_3.pdf
a|b|c
source/figures/thesis/media/image1.png|fig_1_1_v2.png
";

    #[test]
    fn test_parse_skips_comments_blank_and_unmapped() {
        let table = MappingTable::parse(MAPPING);
        let entries: Vec<_> = table.iter().collect();
        assert_eq!(
            entries,
            vec![
                ("source/figures/thesis/media/image1.png", "fig_1_1_v2.png"),
                ("source/figures/thesis/media/image3.png", "sub\\fig_3.pdf"),
            ]
        );
    }

    #[test]
    fn test_normalize_destination() {
        assert_eq!(
            normalize_destination("fig_1.png", "source/figures"),
            "source/figures/fig_1.png"
        );
        assert_eq!(
            normalize_destination("sub\\fig.pdf", "source\\figures\\"),
            "source/figures/sub/fig.pdf"
        );
        assert_eq!(
            normalize_destination("./source/figures/fig.png", "source/figures"),
            "source/figures/fig.png"
        );
        assert_eq!(normalize_destination("fig.png", ""), "fig.png");
    }

    #[test]
    fn test_apply_counts_replaced_and_missing() {
        let table = MappingTable::parse(MAPPING);
        let source = "\\includegraphics{source/figures/thesis/media/image1.png}\n\
                      \\includegraphics{source/figures/thesis/media/image1.png}";
        let (content, outcome) = table.apply(source, "source/figures");

        assert_eq!(
            content,
            "\\includegraphics{source/figures/fig_1_1_v2.png}\n\
             \\includegraphics{source/figures/fig_1_1_v2.png}"
        );
        assert_eq!(outcome.replaced.len(), 1);
        assert_eq!(outcome.total_occurrences(), 2);
        assert_eq!(outcome.missing, vec!["source/figures/thesis/media/image3.png"]);
    }

    #[test]
    fn test_apply_without_matches_is_identity() {
        let mut table = MappingTable::default();
        table.insert("nowhere.png", "somewhere.png");
        let source = "Text with ünïcödé and \\includegraphics{here.png}\r\n";
        let (content, outcome) = table.apply(source, "source/figures");
        assert_eq!(content.as_bytes(), source.as_bytes());
        assert!(outcome.replaced.is_empty());
    }
}
