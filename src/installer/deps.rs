use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, instrument};

use crate::{Error, Result};

/// Installs an extension's package dependencies.
pub trait DependencyInstaller {
    fn install(&self, dir: &Path) -> Result<()>;
}

/// Runs `npm install` in the extension directory.
#[derive(Debug, Clone)]
pub struct NpmInstaller {
    program: String,
}

impl Default for NpmInstaller {
    fn default() -> Self {
        Self::with_program("npm")
    }
}

impl NpmInstaller {
    /// Use a different executable (e.g. a pnpm/yarn shim).
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command_line(&self) -> String {
        format!("{} install", self.program)
    }
}

impl DependencyInstaller for NpmInstaller {
    #[instrument(skip(self), fields(program = %self.program))]
    fn install(&self, dir: &Path) -> Result<()> {
        let output = Command::new(&self.program)
            .arg("install")
            .current_dir(dir)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| Error::CommandSpawn {
                command: self.command_line(),
                source: e,
            })?;

        if !output.status.success() {
            debug!(
                stderr = %String::from_utf8_lossy(&output.stderr),
                "dependency installation failed"
            );
            return Err(Error::CommandFailed {
                command: self.command_line(),
                code: output.status.code(),
            });
        }

        debug!("dependencies installed");
        Ok(())
    }
}
