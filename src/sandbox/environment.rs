use std::path::{Path, PathBuf};

use log::debug;

#[cfg(not(windows))]
const BIN_DIR: &str = "bin";
#[cfg(windows)]
const BIN_DIR: &str = "Scripts";

#[cfg(not(windows))]
const INTERPRETERS: &[&str] = &["python", "python3"];
#[cfg(windows)]
const INTERPRETERS: &[&str] = &["python.exe"];

#[cfg(not(windows))]
const ACTIVATE: &str = "activate";
#[cfg(windows)]
const ACTIVATE: &str = "activate.bat";

/// Marker file written by `python -m venv`
const PYVENV_CFG: &str = "pyvenv.cfg";

/// On-disk layout of a virtual environment
///
/// The container directory itself is the environment root: `bin/activate`,
/// `bin/python` and `pyvenv.cfg` all sit directly below it.
#[derive(Debug, Clone)]
pub struct VirtualEnv {
    root: PathBuf,
}

/// Result of inspecting a virtual environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnvironmentHealth {
    pub has_config: bool,
    pub has_activate: bool,
    pub has_interpreter: bool,
}

impl EnvironmentHealth {
    /// Whether the environment looks activatable
    ///
    /// This only says the activation script and an interpreter are present.
    /// It is not a process-liveness check: nothing tracks whether anything
    /// is running inside the environment.
    pub fn is_well_formed(&self) -> bool {
        self.has_activate && self.has_interpreter
    }
}

impl VirtualEnv {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.root.join(BIN_DIR)
    }

    /// Path of the activation entry point
    pub fn activate_script(&self) -> PathBuf {
        self.bin_dir().join(ACTIVATE)
    }

    /// First interpreter present in the bin directory
    ///
    /// Symlinks are followed, so a venv whose base interpreter was removed
    /// reports no interpreter.
    pub fn interpreter(&self) -> Option<PathBuf> {
        INTERPRETERS
            .iter()
            .map(|name| self.bin_dir().join(name))
            .find(|path| path.is_file())
    }

    pub fn inspect(&self) -> EnvironmentHealth {
        let health = EnvironmentHealth {
            has_config: self.root.join(PYVENV_CFG).is_file(),
            has_activate: self.activate_script().is_file(),
            has_interpreter: self.interpreter().is_some(),
        };
        debug!("Inspected environment {}: {:?}", self.root.display(), health);
        health
    }
}
