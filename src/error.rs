// ============================================================================
// File: packages/vessel/src/error.rs
// ----------------------------------------------------------------------------
// Error types surfaced by every container operation
// ============================================================================

use std::{io, path::PathBuf};

use crate::backup::ArchiveError;

/// Errors returned by the container registry and its collaborators
///
/// Every variant carries enough context (container name, path) for the
/// presentation layer to render a message without extra lookups.
#[derive(Debug, thiserror::Error)]
pub enum VesselError {
    /// An operation that needs a target was invoked without one
    #[error("No container selected")]
    NoSelection,

    /// The container directory does not exist
    #[error("Container '{name}' not found")]
    NotFound { name: String },

    /// The name cannot be used as a container directory
    #[error("Invalid container name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    /// The environment-creation tool failed or the target path conflicts
    #[error("Failed to create container '{name}': {detail}")]
    CreationFailed { name: String, detail: String },

    /// Removing the container directory failed for a reason other than absence
    #[error("Failed to delete container '{name}'")]
    DeletionFailed {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to create backup for container '{name}'")]
    BackupFailed {
        name: String,
        #[source]
        source: ArchiveError,
    },

    #[error("Failed to restore container '{name}'")]
    RestoreFailed {
        name: String,
        #[source]
        source: ArchiveError,
    },

    /// The configuration file exists but could not be read or parsed
    #[error("Failed to load config from {}: {detail}", .path.display())]
    ConfigLoadFailed { path: PathBuf, detail: String },

    #[error("Failed to save config to {}", .path.display())]
    ConfigSaveFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Network settings rejected before they reach the registry
    #[error("Invalid network configuration: {detail}")]
    NetworkConfigError { detail: String },

    /// The network registry file could not be read or rewritten
    #[error("Network registry I/O failed at {}", .path.display())]
    Registry {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The containers or backups root could not be created or enumerated
    #[error("Storage at {} is not accessible", .path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to open the terminal emulator '{program}'")]
    TerminalUnavailable {
        program: String,
        #[source]
        source: io::Error,
    },
}

impl VesselError {
    /// True for both "nothing selected" and "target does not exist"
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NoSelection | Self::NotFound { .. })
    }

    pub(crate) fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    pub(crate) fn network(detail: impl Into<String>) -> Self {
        Self::NetworkConfigError {
            detail: detail.into(),
        }
    }
}

/// Result type for container operations
pub type Result<T> = std::result::Result<T, VesselError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_kinds() {
        assert!(VesselError::NoSelection.is_not_found());
        assert!(VesselError::not_found("alpha").is_not_found());
        assert!(!VesselError::network("bad port").is_not_found());
    }

    #[test]
    fn messages_name_the_container() {
        let err = VesselError::CreationFailed {
            name: "alpha".to_string(),
            detail: "exit status 1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to create container 'alpha': exit status 1"
        );
    }
}
