//! External program invocation.

use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use tracing::{error, info};

use crate::utils::error::{ForgeError, ForgeResult};

/// A blocking call to an external tool, with output streamed to the terminal.
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: String,
    args: Vec<OsString>,
    current_dir: Option<PathBuf>,
    description: String,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            description: description.into(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The command line as it would be typed.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().map(|a| a.to_string_lossy().into_owned()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run to completion and return the exit status, whatever it is.
    pub fn run(&self) -> ForgeResult<ExitStatus> {
        info!("[PIPELINE] {}", self.description);
        info!("Running: {}", self.command_line());

        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }

        command.status().map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => {
                error!("Command not found: {}", self.program);
                ForgeError::ToolNotFound {
                    program: self.program.clone(),
                }
            }
            _ => ForgeError::io(self.current_dir.as_deref().unwrap_or(Path::new(".")), err),
        })
    }

    /// Run to completion; a non-zero exit becomes [`ForgeError::ToolFailed`].
    pub fn run_checked(&self) -> ForgeResult<()> {
        let status = self.run()?;
        if status.success() {
            info!("[OK] {} completed successfully", self.description);
            Ok(())
        } else {
            error!("[ERROR] {} failed with code {:?}", self.description, status.code());
            Err(ForgeError::tool_failed(&self.description, status.code()))
        }
    }
}
