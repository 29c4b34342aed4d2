// ============================================================================
// File: packages/vessel/src/terminal.rs
// ----------------------------------------------------------------------------
// Terminal emulator launcher for opening a shell inside a container
// ============================================================================

use std::path::Path;
use std::process::Command;

use log::{info, warn};

use crate::error::{Result, VesselError};
use crate::sandbox::probe_command;

const XDG_TERMINAL: &str = "xdg-terminal";
const FALLBACK_TERMINAL: &str = "x-terminal-emulator";

/// Terminal emulator used by the open operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Terminal {
    program: String,
}

impl Terminal {
    /// Pick `xdg-terminal` when it answers `--version`, else the Debian
    /// alternatives fallback
    pub fn detect() -> Self {
        let program = if probe_command(XDG_TERMINAL, &["--version"]) {
            XDG_TERMINAL
        } else {
            FALLBACK_TERMINAL
        };
        Self::with_program(program)
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run the terminal with `dir` as its working directory and wait for it
    ///
    /// Failing to start the program is an error; a non-zero exit is only
    /// logged since the user closed the terminal either way.
    pub fn launch(&self, dir: &Path) -> Result<()> {
        info!("Opening {} in {}", self.program, dir.display());

        let status = Command::new(&self.program)
            .current_dir(dir)
            .status()
            .map_err(|source| VesselError::TerminalUnavailable {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            warn!("Terminal {} exited with {}", self.program, status);
        }
        Ok(())
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::detect()
    }
}
