// ============================================================================
// File: packages/vessel/src/registry/queries.rs
// ----------------------------------------------------------------------------
// Container query operations:
// - List containers with their status
// - Status of a single container
// ============================================================================

use std::fs;
use std::io;
use std::path::Path;

use log::{debug, error};

use crate::error::{Result, VesselError};
use crate::sandbox::VirtualEnv;

use super::{ContainerRegistry, ContainerStatus, ContainerSummary};

impl ContainerRegistry {
    /// Every container, sorted by name
    ///
    /// Containers are the directories directly below the containers root,
    /// which is created first if missing. Plain files and entries whose names
    /// are not valid UTF-8 are ignored.
    pub fn list(&self) -> Result<Vec<ContainerSummary>> {
        let root = self.containers_root();
        let storage_error = |source: io::Error| {
            error!("Failed to list containers in {}: {}", root.display(), source);
            VesselError::Storage {
                path: root.clone(),
                source,
            }
        };

        fs::create_dir_all(&root).map_err(storage_error)?;

        let mut containers = Vec::new();
        for entry in fs::read_dir(&root).map_err(storage_error)? {
            let entry = entry.map_err(storage_error)?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                debug!("Skipping non UTF-8 entry {}", path.display());
                continue;
            };

            containers.push(ContainerSummary {
                status: self.status_of(&path),
                name,
                path,
            });
        }

        containers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(containers)
    }

    /// Names of every container, sorted
    pub fn names(&self) -> Result<Vec<String>> {
        Ok(self.list()?.into_iter().map(|c| c.name).collect())
    }

    pub fn exists(&self, name: &str) -> bool {
        self.existing_container(name).is_ok()
    }

    /// Status of container `name`
    pub fn status(&self, name: &str) -> Result<ContainerStatus> {
        let path = self.existing_container(name).inspect_err(|e| {
            error!("Failed to get status of container '{}': {}", name, e);
        })?;
        Ok(self.status_of(&path))
    }

    pub(crate) fn status_of(&self, path: &Path) -> ContainerStatus {
        if VirtualEnv::new(path).inspect().is_well_formed() {
            ContainerStatus::Active
        } else {
            ContainerStatus::Inactive
        }
    }
}
