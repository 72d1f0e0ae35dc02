//! External diagram renderers.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::RenderError;

/// Turns a diagram source file into an image.
///
/// Implementations are handed to the pipeline; graph code never calls one.
pub trait DiagramRenderer {
    /// Render `source` into `output` and return the path written.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if the renderer is unavailable or fails.
    fn render(&self, source: &Path, output: &Path) -> Result<PathBuf, RenderError>;
}

impl<R: DiagramRenderer + ?Sized> DiagramRenderer for &R {
    fn render(&self, source: &Path, output: &Path) -> Result<PathBuf, RenderError> {
        (**self).render(source, output)
    }
}

/// Renderer backed by the `d2` command-line tool.
///
/// Runs `d2 <source> <output>`; the output format follows the output
/// extension.
#[derive(Debug, Clone)]
pub struct D2Cli {
    program: String,
}

impl D2Cli {
    /// Default binary name looked up on `PATH`.
    pub const DEFAULT_PROGRAM: &'static str = "d2";

    /// Use a specific binary instead of `d2` from `PATH`.
    #[must_use]
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Binary this renderer runs.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for D2Cli {
    fn default() -> Self {
        Self::with_program(Self::DEFAULT_PROGRAM)
    }
}

impl DiagramRenderer for D2Cli {
    fn render(&self, source: &Path, output: &Path) -> Result<PathBuf, RenderError> {
        tracing::debug!(
            program = %self.program,
            source = %source.display(),
            output = %output.display(),
            "Running diagram renderer"
        );

        let result = Command::new(&self.program)
            .arg(source)
            .arg(output)
            .output()
            .map_err(|e| {
                if e.kind() == io::ErrorKind::NotFound {
                    RenderError::NotInstalled {
                        program: self.program.clone(),
                    }
                } else {
                    RenderError::Io {
                        program: self.program.clone(),
                        source: e,
                    }
                }
            })?;

        if !result.status.success() {
            return Err(RenderError::Failed {
                program: self.program.clone(),
                status: result.status.to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        Ok(output.to_path_buf())
    }
}
