//! Error handling for Thesis Forge
//!
//! This module provides a unified error type and result type for the
//! splitter, the figure tools and the build pipeline.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Toolchain error type
#[derive(Debug, Error)]
pub enum ForgeError {
    /// A required input file or directory does not exist
    #[error("Input not found: {}", path.display())]
    MissingInput { path: PathBuf },

    /// A structural LaTeX marker the splitter depends on is absent
    #[error("Marker {marker} not found in {}", path.display())]
    MissingMarker { marker: String, path: PathBuf },

    /// IO error with the path that caused it
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An external program could not be started
    #[error("Command not found: {program}. Is it installed?")]
    ToolNotFound { program: String },

    /// An external program exited with a non-zero status
    #[error("{description} failed with exit code {}", code.map(|c| c.to_string()).unwrap_or_else(|| "none".to_string()))]
    ToolFailed {
        description: String,
        code: Option<i32>,
    },

    /// The mapping file contained no usable `old|new` lines
    #[error("No mappings found in {}. Make sure the mapping file has been edited", path.display())]
    EmptyMapping { path: PathBuf },

    /// Invalid configuration or arguments
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// PDF could not be read
    #[error("PDF error: {message}")]
    Pdf { message: String },

    /// Raster image could not be read
    #[error("Image error: {message}")]
    Image { message: String },
}

/// Result type for toolchain operations
pub type ForgeResult<T> = Result<T, ForgeError>;

// Convenience constructors for errors
impl ForgeError {
    pub fn missing_input(path: impl Into<PathBuf>) -> Self {
        ForgeError::MissingInput { path: path.into() }
    }

    pub fn missing_marker(marker: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        ForgeError::MissingMarker {
            marker: marker.into(),
            path: path.into(),
        }
    }

    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        ForgeError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn tool_failed(description: impl Into<String>, code: Option<i32>) -> Self {
        ForgeError::ToolFailed {
            description: description.into(),
            code,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        ForgeError::Config {
            message: message.into(),
        }
    }

    pub fn pdf(message: impl Into<String>) -> Self {
        ForgeError::Pdf {
            message: message.into(),
        }
    }

    pub fn image(message: impl Into<String>) -> Self {
        ForgeError::Image {
            message: message.into(),
        }
    }

    /// Re-attach a path to an error raised while the path was not at hand.
    pub fn with_path(self, path: impl AsRef<Path>) -> Self {
        match self {
            ForgeError::MissingMarker { marker, .. } => ForgeError::MissingMarker {
                marker,
                path: path.as_ref().to_path_buf(),
            },
            other => other,
        }
    }
}

/// Read a whole UTF-8 file, mapping "not found" to [`ForgeError::MissingInput`].
pub fn read_text(path: impl AsRef<Path>) -> ForgeResult<String> {
    let path = path.as_ref();
    std::fs::read_to_string(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => ForgeError::missing_input(path),
        _ => ForgeError::io(path, err),
    })
}

/// Write a whole file, creating nothing but the file itself.
pub fn write_text(path: impl AsRef<Path>, content: &str) -> ForgeResult<()> {
    let path = path.as_ref();
    std::fs::write(path, content).map_err(|err| ForgeError::io(path, err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_marker_display() {
        let err = ForgeError::missing_marker("\\mainmatter", "thesis_full.tex");
        let msg = err.to_string();
        assert!(msg.contains("\\mainmatter"));
        assert!(msg.contains("thesis_full.tex"));
    }

    #[test]
    fn test_tool_failed_display() {
        let err = ForgeError::tool_failed("XeLaTeX (pass 1)", Some(1));
        assert_eq!(err.to_string(), "XeLaTeX (pass 1) failed with exit code 1");

        let err = ForgeError::tool_failed("pandoc", None);
        assert!(err.to_string().ends_with("exit code none"));
    }

    #[test]
    fn test_with_path_rewrites_marker_only() {
        let err = ForgeError::missing_marker("\\begin{document}", "").with_path("a.tex");
        assert!(err.to_string().contains("a.tex"));

        let err = ForgeError::config("bad").with_path("a.tex");
        assert!(!err.to_string().contains("a.tex"));
    }

    #[test]
    fn test_read_text_missing_file() {
        let err = read_text("/definitely/not/here.tex").unwrap_err();
        assert!(matches!(err, ForgeError::MissingInput { .. }));
    }
}
