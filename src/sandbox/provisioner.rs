use std::fmt;
use std::path::Path;
use std::process::Command;

use log::{info, warn};

use crate::config::Config;
use crate::error::{Result, VesselError};

use super::command::find_command;

/// Interpreters tried when none is configured, absolute paths first
const PYTHON_CANDIDATES: &[&str] = &[
    "/usr/bin/python3",
    "/usr/local/bin/python3",
    "/bin/python3",
    "python3",
    "python",
    "python3.13",
    "python3.12",
    "python3.11",
    "python3.10",
];

/// Creates the environment backing a new container
///
/// Implementations must create a runnable environment rooted at `target`
/// and refuse to succeed if they could not.
pub trait Provisioner: fmt::Debug {
    /// Short identifier used in logs
    fn kind(&self) -> &'static str;

    fn provision(&self, target: &Path) -> Result<()>;
}

/// Provisioner that runs `<python> -m venv <target>`
#[derive(Debug, Clone, Default)]
pub struct PythonVenv {
    interpreter: Option<String>,
}

impl PythonVenv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interpreter(interpreter: impl Into<String>) -> Self {
        Self {
            interpreter: Some(interpreter.into()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            interpreter: config.python_interpreter.clone(),
        }
    }

    fn resolve_interpreter(&self) -> Option<String> {
        match &self.interpreter {
            Some(python) => Some(python.clone()),
            None => find_command(PYTHON_CANDIDATES).map(str::to_string),
        }
    }
}

impl Provisioner for PythonVenv {
    fn kind(&self) -> &'static str {
        "python-venv"
    }

    fn provision(&self, target: &Path) -> Result<()> {
        let name = container_name(target);

        let python = self.resolve_interpreter().ok_or_else(|| VesselError::CreationFailed {
            name: name.clone(),
            detail: format!("no Python interpreter found; tried {PYTHON_CANDIDATES:?}"),
        })?;

        info!(
            "Creating Python virtual environment at {} with {}",
            target.display(),
            python
        );

        let output = Command::new(&python)
            .args(["-m", "venv"])
            .arg(target)
            .output()
            .map_err(|e| {
                warn!("Failed to execute {} -m venv: {}", python, e);
                VesselError::CreationFailed {
                    name: name.clone(),
                    detail: format!("failed to run {python}: {e}"),
                }
            })?;

        if output.status.success() {
            info!("Python virtual environment created at {}", target.display());
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("Failed to create Python virtual environment: {}", stderr.trim());
            Err(VesselError::CreationFailed {
                name,
                detail: format!("{python} -m venv exited with {}: {}", output.status, stderr.trim()),
            })
        }
    }
}

fn container_name(target: &Path) -> String {
    target
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| target.display().to_string())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn missing_interpreter_is_creation_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("alpha");
        let venv = PythonVenv::with_interpreter("/nonexistent/python3");

        let err = venv.provision(&target).expect_err("spawn must fail");
        match err {
            VesselError::CreationFailed { name, .. } => assert_eq!(name, "alpha"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!target.exists());
    }

    #[test]
    fn non_zero_exit_is_creation_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        // `false` ignores its arguments and exits 1
        let venv = PythonVenv::with_interpreter("false");

        let err = venv
            .provision(&dir.path().join("beta"))
            .expect_err("non-zero exit must fail");
        assert!(matches!(err, VesselError::CreationFailed { .. }));
    }

    #[test]
    fn configured_interpreter_is_used() {
        let config = Config::default().with_python_interpreter("/opt/python/bin/python3");
        let venv = PythonVenv::from_config(&config);
        assert_eq!(
            venv.resolve_interpreter().as_deref(),
            Some("/opt/python/bin/python3")
        );
    }
}
