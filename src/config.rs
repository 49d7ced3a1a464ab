//! Configuration for the build pipeline
//!
//! Defaults reproduce the project layout the toolchain was written for:
//!
//! ```text
//! input/thesis.docx, input/annex_thesis.docx   Word sources
//! source/thesis_full.tex, source/annex_full.tex converter output
//! source/figures/{thesis,annex}                 extracted media
//! source/chapters/{thesis,annex}                split chapters
//! build/<variant>.tex                           typeset entry points
//! output/<variant>.pdf                          final PDFs
//! ```
//!
//! Any of it can be replaced by a TOML file, and the external programs can
//! be overridden from the environment.

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::utils::error::{read_text, ForgeError, ForgeResult};

/// Environment variable naming a TOML config file.
pub const CONFIG_ENV: &str = "TFORGE_CONFIG";
/// Environment override for the document converter program.
pub const CONVERTER_ENV: &str = "TFORGE_CONVERTER";
/// Environment override for the typesetting engine program.
pub const ENGINE_ENV: &str = "TFORGE_ENGINE";
/// Environment override for the bibliography processor program.
pub const BIBTOOL_ENV: &str = "TFORGE_BIBTOOL";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgeConfig {
    pub paths: PathsConfig,
    pub tools: ToolsConfig,
    pub documents: Vec<SourceDocument>,
    pub variants: Vec<BuildVariant>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub build_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Root of the user's own figures; mapped image paths are rewritten under it.
    pub figures_dir: PathBuf,
    /// Root for split chapters when `split` is run by hand.
    pub chapters_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub converter: String,
    pub engine: String,
    pub bibliography: String,
}

/// One Word document converted and split by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDocument {
    pub name: String,
    pub docx: PathBuf,
    pub tex: PathBuf,
    pub media_dir: PathBuf,
    pub chapters_dir: PathBuf,
}

/// One typeset build: `build/<name>.tex` → `output/<name>.pdf`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildVariant {
    pub name: String,
    /// Entry point relative to the build directory; defaults to `<name>.tex`.
    #[serde(default)]
    pub source: Option<PathBuf>,
}

impl BuildVariant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: None,
        }
    }

    /// Path of the entry point inside `build_dir`.
    pub fn source_path(&self, build_dir: &Path) -> PathBuf {
        match &self.source {
            Some(source) => build_dir.join(source),
            None => build_dir.join(format!("{}.tex", self.name)),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            build_dir: PathBuf::from("build"),
            output_dir: PathBuf::from("output"),
            figures_dir: PathBuf::from("source/figures"),
            chapters_dir: PathBuf::from("source/chapters"),
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            converter: "pandoc".to_string(),
            engine: "xelatex".to_string(),
            bibliography: "bibtex".to_string(),
        }
    }
}

impl Default for ForgeConfig {
    fn default() -> Self {
        let document = |name: &str, docx: &str| SourceDocument {
            name: name.to_string(),
            docx: PathBuf::from("input").join(docx),
            tex: PathBuf::from("source").join(format!("{}_full.tex", name)),
            media_dir: PathBuf::from("source/figures").join(name),
            chapters_dir: PathBuf::from("source/chapters").join(name),
        };

        Self {
            paths: PathsConfig::default(),
            tools: ToolsConfig::default(),
            documents: vec![
                document("thesis", "thesis.docx"),
                document("annex", "annex_thesis.docx"),
            ],
            variants: [
                "thesis_with_annex_digital",
                "thesis_digital",
                "annex_digital",
                "thesis_with_annex_print",
            ]
            .into_iter()
            .map(BuildVariant::new)
            .collect(),
        }
    }
}

impl ForgeConfig {
    /// Load the configuration.
    ///
    /// An explicit path wins over `TFORGE_CONFIG`; with neither, defaults are
    /// used. Tool overrides from the environment are applied last.
    pub fn load(path: Option<&Path>) -> ForgeResult<Self> {
        let from_env = env::var(CONFIG_ENV).ok().map(PathBuf::from);
        let mut config = match path.map(Path::to_path_buf).or(from_env) {
            Some(path) => {
                debug!(path = %path.display(), "loading configuration file");
                Self::from_toml_str(&read_text(&path)?)?
            }
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    pub fn from_toml_str(source: &str) -> ForgeResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| ForgeError::config(e.to_string()))?;
        if config.variants.is_empty() {
            return Err(ForgeError::config("at least one build variant is required"));
        }
        Ok(config)
    }

    /// Replace tool programs with `TFORGE_CONVERTER`, `TFORGE_ENGINE` and
    /// `TFORGE_BIBTOOL` when set.
    pub fn apply_env(&mut self) {
        if let Ok(program) = env::var(CONVERTER_ENV) {
            self.tools.converter = program;
        }
        if let Ok(program) = env::var(ENGINE_ENV) {
            self.tools.engine = program;
        }
        if let Ok(program) = env::var(BIBTOOL_ENV) {
            self.tools.bibliography = program;
        }
    }

    pub fn variant_names(&self) -> Vec<&str> {
        self.variants.iter().map(|v| v.name.as_str()).collect()
    }

    /// Look up a variant by name.
    pub fn variant(&self, name: &str) -> ForgeResult<&BuildVariant> {
        self.variants.iter().find(|v| v.name == name).ok_or_else(|| {
            ForgeError::config(format!(
                "unknown version '{}' (expected one of: all, {})",
                name,
                self.variant_names().join(", ")
            ))
        })
    }

    /// Variants to build: all of them for `None` or `"all"`, otherwise the one named.
    pub fn select_variants(&self, name: Option<&str>) -> ForgeResult<Vec<BuildVariant>> {
        match name {
            None | Some("all") => Ok(self.variants.clone()),
            Some(name) => Ok(vec![self.variant(name)?.clone()]),
        }
    }

    /// Output directory for a hand-run split of `tex_file`.
    ///
    /// Files named after the thesis or the annex land in their own
    /// sub-directory; anything else goes to the chapters root.
    pub fn chapters_dir_for(&self, tex_file: &Path) -> PathBuf {
        let name = tex_file
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if name.contains("thesis") {
            self.paths.chapters_dir.join("thesis")
        } else if name.contains("annex") {
            self.paths.chapters_dir.join("annex")
        } else {
            self.paths.chapters_dir.clone()
        }
    }
}
