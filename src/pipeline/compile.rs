//! Typesetting of build variants.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::process::ToolCommand;
use crate::config::{BuildVariant, ForgeConfig};
use crate::utils::error::{ForgeError, ForgeResult};

/// Engine runs per variant; later passes resolve cross-references.
pub const ENGINE_PASSES: usize = 3;

/// Entry point of a variant split into the directory to run in and the
/// file name to pass to the engine.
struct EntryPoint {
    work_dir: PathBuf,
    file_name: String,
    stem: String,
}

impl EntryPoint {
    fn locate(config: &ForgeConfig, variant: &BuildVariant) -> ForgeResult<Self> {
        let source = variant.source_path(&config.paths.build_dir);
        if !source.is_file() {
            return Err(ForgeError::missing_input(source));
        }
        let work_dir = source
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let file_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = source
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            work_dir,
            file_name,
            stem,
        })
    }

    fn engine_pass(&self, config: &ForgeConfig, description: String) -> ToolCommand {
        ToolCommand::new(&config.tools.engine, description)
            .arg("-interaction=nonstopmode")
            .arg(&self.file_name)
            .current_dir(&self.work_dir)
    }
}

/// Typeset `variant` and copy the PDF to `<output_dir>/<variant>.pdf`.
///
/// Engine and bibliography failures are only warnings, as a document with
/// unresolved references still produces a PDF. The variant fails if no PDF
/// comes out.
pub fn compile_variant(config: &ForgeConfig, variant: &BuildVariant) -> ForgeResult<PathBuf> {
    info!("PHASE 3: Compiling {}", variant.name);
    let entry = EntryPoint::locate(config, variant)?;

    for pass in 1..=ENGINE_PASSES {
        let description = format!("{} (pass {}) - {}", config.tools.engine, pass, variant.name);
        let status = entry.engine_pass(config, description).run()?;
        if !status.success() {
            warn!("[WARNING] {} pass {} had errors, continuing...", config.tools.engine, pass);
        }

        if pass == 1 {
            run_bibliography(config, variant, &entry)?;
        }
    }

    let pdf = entry.work_dir.join(format!("{}.pdf", entry.stem));
    if !pdf.is_file() {
        return Err(ForgeError::missing_input(pdf));
    }

    let output_dir = &config.paths.output_dir;
    fs::create_dir_all(output_dir).map_err(|e| ForgeError::io(output_dir, e))?;
    let destination = output_dir.join(format!("{}.pdf", variant.name));
    fs::copy(&pdf, &destination).map_err(|e| ForgeError::io(&destination, e))?;

    info!("[OK] PDF generated: {}", destination.display());
    Ok(destination)
}

/// Bibliography pass, only when the first engine pass left an `.aux` file.
fn run_bibliography(
    config: &ForgeConfig,
    variant: &BuildVariant,
    entry: &EntryPoint,
) -> ForgeResult<()> {
    let aux = format!("{}.aux", entry.stem);
    if !entry.work_dir.join(&aux).is_file() {
        return Ok(());
    }
    let status = ToolCommand::new(
        &config.tools.bibliography,
        format!("{} - {}", config.tools.bibliography, variant.name),
    )
    .arg(&aux)
    .current_dir(&entry.work_dir)
    .run()?;
    if !status.success() {
        warn!("[WARNING] {} reported errors for {}", config.tools.bibliography, variant.name);
    }
    Ok(())
}

/// One engine pass over a variant, failing on a non-zero exit.
///
/// Meant for checking a build file before running the full pipeline.
pub fn smoke_test(config: &ForgeConfig, variant_name: &str) -> ForgeResult<()> {
    let variant = config
        .variant(variant_name)
        .cloned()
        .unwrap_or_else(|_| BuildVariant::new(variant_name));
    let entry = EntryPoint::locate(config, &variant)?;

    info!("COMPILE TEST: {}", variant.name);
    entry
        .engine_pass(config, format!("{} (pass 1) - {}", config.tools.engine, variant.name))
        .run_checked()?;
    info!("[OK] First pass completed");
    Ok(())
}
