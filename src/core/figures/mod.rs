//! Figure mapper
//!
//! The converter extracts Word images as `media/imageN.png`. These tools
//! help swap them for the author's own figure files:
//!
//! 1. `report`: list every image reference with its caption, list the
//!    available user figures, and emit a `source|destination` template.
//! 2. `apply`: once the template is filled in, rewrite the paths.

pub mod extract;
pub mod mapping;
pub mod report;

pub use extract::{extract_figures, FigureKind, FigureRecord};
pub use mapping::{apply_mapping_file, normalize_destination, MappingOutcome, MappingTable};
pub use report::{list_user_figures, write_mapping_report, MappingReport, DEFAULT_REPORT_FILE};
