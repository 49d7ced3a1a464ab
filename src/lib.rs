//! Thesis Forge - Word → LaTeX → PDF thesis production toolchain
//!
//! The pieces, leaf-first:
//!
//! - [`core::inspect`]: pixel size and DPI of PNG/PDF figures
//! - [`core::figures`]: image references, captions and path remapping
//! - [`core::splitter`]: one converted `.tex` into per-chapter files
//! - [`pipeline`]: converter → splitter → typesetting engine, per variant
//!
//! The external converter (pandoc), typesetting engine (xelatex) and
//! bibliography processor (bibtex) are configured in [`config`].
//!
//! ## Example
//!
//! ```rust
//! use thesis_forge::split_document;
//!
//! let tex = "\\begin{document}\\mainmatter\n\\chapter{Introduction}\nHello.";
//! let sections = split_document(tex).unwrap();
//! assert_eq!(sections[0].filename, "chapter_1_introduction.tex");
//! ```

pub mod config;
pub mod core;
pub mod pipeline;
pub mod utils;

pub use config::{BuildVariant, ForgeConfig, SourceDocument};
pub use crate::core::figures::{extract_figures, FigureKind, FigureRecord, MappingTable};
pub use crate::core::inspect::{scan_folder, FigureFormat, FigureInfo};
pub use crate::core::splitter::{sanitize_filename, split_document, split_file, Section, SectionKind};
pub use pipeline::{Pipeline, PipelineOptions, PipelineSummary};
pub use utils::error::{ForgeError, ForgeResult};
