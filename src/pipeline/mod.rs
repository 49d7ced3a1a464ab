//! Build pipeline: Word → LaTeX → chapters → PDFs.
//!
//! Phases run strictly in order and every external program blocks until it
//! exits. Conversion and splitting abort the run on failure; a variant that
//! fails to compile is counted and the remaining variants still build.

pub mod compile;
pub mod process;

use std::fs;
use std::path::PathBuf;

use serde::Serialize;
use tracing::{error, info};

use crate::config::{BuildVariant, ForgeConfig};
use crate::core::splitter::split_file;
use crate::utils::error::{ForgeError, ForgeResult};
use process::ToolCommand;

pub use compile::{compile_variant, smoke_test};

#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    pub skip_conversion: bool,
    pub skip_split: bool,
    /// Variant to build; `None` or `"all"` builds every variant.
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineSummary {
    pub built: Vec<PathBuf>,
    pub failed: Vec<String>,
}

impl PipelineSummary {
    pub fn attempted(&self) -> usize {
        self.built.len() + self.failed.len()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct Pipeline<'a> {
    config: &'a ForgeConfig,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a ForgeConfig) -> Self {
        Self { config }
    }

    pub fn run(&self, options: &PipelineOptions) -> ForgeResult<PipelineSummary> {
        // an unknown variant is rejected before any work is done
        let variants = self.config.select_variants(options.version.as_deref())?;

        if options.skip_conversion {
            info!("[SKIP] Skipping Word → LaTeX conversion");
        } else {
            self.convert_documents()?;
        }

        if options.skip_split {
            info!("[SKIP] Skipping chapter split");
        } else {
            self.split_documents()?;
        }

        Ok(self.compile_variants(&variants))
    }

    /// Phase 1: run the converter over every source document.
    pub fn convert_documents(&self) -> ForgeResult<()> {
        info!("PHASE 1: Word → LaTeX conversion");
        for doc in &self.config.documents {
            if !doc.docx.is_file() {
                return Err(ForgeError::missing_input(&doc.docx));
            }
        }

        for doc in &self.config.documents {
            if let Some(parent) = doc.tex.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| ForgeError::io(parent, e))?;
            }
            ToolCommand::new(
                &self.config.tools.converter,
                format!("Conversion of {} → LaTeX", doc.docx.display()),
            )
            .arg(&doc.docx)
            .arg("--standalone")
            .arg("--to=latex")
            .arg("--top-level-division=chapter")
            .arg(format!("--extract-media={}", doc.media_dir.display()))
            .arg(format!("--output={}", doc.tex.display()))
            .run_checked()?;
        }

        info!("[OK] Word → LaTeX conversion completed");
        Ok(())
    }

    /// Phase 2: split every converted document into chapter files.
    pub fn split_documents(&self) -> ForgeResult<()> {
        info!("PHASE 2: Chapter split");
        for doc in &self.config.documents {
            if !doc.tex.is_file() {
                error!(
                    "{} not found. Run the conversion first or use --skip-conversion",
                    doc.tex.display()
                );
                return Err(ForgeError::missing_input(&doc.tex));
            }
        }

        for doc in &self.config.documents {
            info!("[PIPELINE] Splitting {} into chapters", doc.tex.display());
            split_file(&doc.tex, &doc.chapters_dir)?;
        }

        info!("[OK] Chapter split completed");
        Ok(())
    }

    /// Phase 3: typeset each variant; failures are collected, not raised.
    pub fn compile_variants(&self, variants: &[BuildVariant]) -> PipelineSummary {
        let mut summary = PipelineSummary::default();
        for variant in variants {
            match compile_variant(self.config, variant) {
                Ok(pdf) => summary.built.push(pdf),
                Err(err) => {
                    error!("[ERROR] {}: {}", variant.name, err);
                    summary.failed.push(variant.name.clone());
                }
            }
        }
        summary
    }
}
