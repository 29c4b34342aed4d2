// ============================================================================
// File: packages/vessel/src/registry/lifecycle.rs
// ----------------------------------------------------------------------------
// Container lifecycle operations:
// - Creation through the environment provisioner
// - Deletion with network registry purge
// ============================================================================

use std::fs;
use std::io;

use log::{error, info, warn};

use crate::error::{Result, VesselError};

use super::{
    ContainerRegistry, ContainerSummary, check_path_name, is_empty_dir, validate_name,
};

impl ContainerRegistry {
    /// Create container `name`
    ///
    /// Fails with `CreationFailed` when the path is taken by a file or a
    /// non-empty directory, or when the provisioner fails. A directory left
    /// behind by a failed provisioner is removed again.
    pub fn create(&self, name: &str) -> Result<ContainerSummary> {
        validate_name(name)?;

        let root = self.containers_root();
        let path = self.container_path(name);
        let creation_failed = |detail: String| {
            error!("Failed to create container '{}': {}", name, detail);
            VesselError::CreationFailed {
                name: name.to_string(),
                detail,
            }
        };

        let preexisting = match fs::symlink_metadata(&path) {
            Ok(metadata) if metadata.is_dir() && is_empty_dir(&path) => true,
            Ok(metadata) if metadata.is_dir() => {
                return Err(creation_failed("container already exists".to_string()));
            }
            Ok(_) => {
                return Err(creation_failed(format!(
                    "{} exists and is not a directory",
                    path.display()
                )));
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(e) => return Err(creation_failed(e.to_string())),
        };

        fs::create_dir_all(&root).map_err(|e| {
            creation_failed(format!("cannot create {}: {e}", root.display()))
        })?;

        if let Err(e) = self.provisioner.provision(&path) {
            error!(
                "Provisioner {} failed for container '{}': {}",
                self.provisioner.kind(),
                name,
                e
            );
            if !preexisting
                && path.exists()
                && let Err(cleanup) = fs::remove_dir_all(&path)
            {
                warn!(
                    "Failed to clean up partial container at {}: {}",
                    path.display(),
                    cleanup
                );
            }
            return Err(e);
        }

        info!("Container '{}' created at {}", name, path.display());
        Ok(ContainerSummary {
            name: name.to_string(),
            status: self.status_of(&path),
            path,
        })
    }

    /// Delete container `name` and purge its network settings
    ///
    /// The purge is best-effort: once the directory is gone the delete
    /// succeeds even if the registry file cannot be rewritten.
    pub fn delete(&self, name: &str) -> Result<()> {
        if let Err(e) = check_path_name(name) {
            error!("Refusing to delete container '{}': {}", name, e);
            return Err(e);
        }

        let path = self.container_path(name);
        if !path.is_dir() {
            error!("Container '{}' not found", name);
            return Err(VesselError::not_found(name));
        }

        fs::remove_dir_all(&path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                error!("Container '{}' not found", name);
                VesselError::not_found(name)
            } else {
                error!("Failed to delete container '{}': {}", name, source);
                VesselError::DeletionFailed {
                    name: name.to_string(),
                    source,
                }
            }
        })?;
        info!("Container '{}' deleted", name);

        if let Err(e) = self.network.remove(name) {
            warn!(
                "Container '{}' deleted but its network config was not purged: {}",
                name, e
            );
        }

        Ok(())
    }
}
