// ============================================================================
// File: packages/vessel/src/registry/mod.rs
// ----------------------------------------------------------------------------
// Container registry and lifecycle manager.
//
// Owns the containers root, the network registry and the backups root:
// - Container creation and deletion
// - Listing and status inspection
// - Network configuration kept consistent with container existence
// - Backup and restore
// ============================================================================

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::Config;
use crate::error::{Result, VesselError};
use crate::network::NetworkRegistry;
use crate::sandbox::{Provisioner, PythonVenv};
use crate::terminal::Terminal;

// Submodules
mod lifecycle;
mod maintenance;
mod operation;
mod queries;


// Re-exports
pub use operation::{Operation, Outcome};

/// Derived status of a container
///
/// `Active` means the environment looks well-formed (activation script and
/// interpreter present). It does not mean a process is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerStatus {
    Active,
    Inactive,
}

impl fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => f.write_str("Active"),
            Self::Inactive => f.write_str("Inactive"),
        }
    }
}

/// One row of [`ContainerRegistry::list`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerSummary {
    pub name: String,
    pub path: PathBuf,
    pub status: ContainerStatus,
}

/// Registry of containers under a single containers root
///
/// Nothing is cached: every query re-reads the filesystem, so the registry
/// always reflects the directories that actually exist. Operations are
/// synchronous and unsynchronised; run one at a time.
#[derive(Debug)]
pub struct ContainerRegistry {
    /// Resolved configuration
    pub(crate) config: Config,

    /// Flat-file network settings
    pub(crate) network: NetworkRegistry,

    /// Creates the environment behind a new container
    pub(crate) provisioner: Box<dyn Provisioner>,

    /// Terminal for the open operation, detected on first use when unset
    pub(crate) terminal: Option<Terminal>,
}

impl ContainerRegistry {
    /// Create a registry that provisions containers with `python -m venv`
    pub fn new(config: Config) -> Self {
        let provisioner = PythonVenv::from_config(&config);
        Self::with_provisioner(config, Box::new(provisioner))
    }

    /// Create a registry with a custom environment provisioner
    pub fn with_provisioner(config: Config, provisioner: Box<dyn Provisioner>) -> Self {
        let network = NetworkRegistry::new(config.network_config_path());
        Self {
            config,
            network,
            provisioner,
            terminal: None,
        }
    }

    /// Use `terminal` for the open operation instead of detecting one
    pub fn with_terminal(mut self, terminal: Terminal) -> Self {
        self.terminal = Some(terminal);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn network(&self) -> &NetworkRegistry {
        &self.network
    }

    pub fn containers_root(&self) -> PathBuf {
        self.config.containers_root()
    }

    pub fn backups_root(&self) -> PathBuf {
        self.config.backups_root()
    }

    /// Directory of container `name`, whether or not it exists
    pub fn container_path(&self, name: &str) -> PathBuf {
        self.containers_root().join(name)
    }

    /// Path of an existing container
    ///
    /// Only path safety is checked here, so directories created by other
    /// tools stay reachable even when their names could not be created.
    pub(crate) fn existing_container(&self, name: &str) -> Result<PathBuf> {
        check_path_name(name)?;
        let path = self.container_path(name);
        if path.is_dir() {
            Ok(path)
        } else {
            Err(VesselError::not_found(name))
        }
    }
}

/// Check that `name` is usable as a new container name and registry key
///
/// Stricter than [`check_path_name`]: `:` separates the fields of a network
/// registry line, and surrounding whitespace is rejected.
pub fn validate_name(name: &str) -> Result<()> {
    check_path_name(name)?;

    let reason = if name.contains(':') {
        "':' is reserved by the network registry"
    } else if name.trim() != name {
        "leading or trailing whitespace"
    } else {
        return Ok(());
    };

    Err(VesselError::InvalidName {
        name: name.to_string(),
        reason,
    })
}

/// Check that `name` names a single entry directly below the containers root
///
/// An empty name means nothing was selected.
pub fn check_path_name(name: &str) -> Result<()> {
    let reason = if name.is_empty() {
        return Err(VesselError::NoSelection);
    } else if name == "." || name == ".." {
        "reserved directory name"
    } else if name.contains(['/', '\\']) {
        "contains a path separator"
    } else if name.contains('\0') {
        "contains a NUL byte"
    } else {
        return Ok(());
    };

    Err(VesselError::InvalidName {
        name: name.to_string(),
        reason,
    })
}

pub(crate) fn is_empty_dir(path: &Path) -> bool {
    path.read_dir()
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}
