// ============================================================================
// File: packages/vessel/src/registry/maintenance.rs
// ----------------------------------------------------------------------------
// Per-container maintenance operations:
// - Network configuration and lookup
// - Backup and restore
// - Opening a terminal inside a container
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{error, info, warn};

use crate::backup::{self, ArchiveError, BackupInfo};
use crate::error::{Result, VesselError};
use crate::network::{NetworkEntry, SHADOW_FILE, format_line, parse_line};
use crate::terminal::Terminal;

use super::{ContainerRegistry, check_path_name, validate_name};

impl ContainerRegistry {
    /// Record network settings for container `name`
    ///
    /// `port` falls back to the configured default. The entry is appended to
    /// the registry file, so earlier entries stay in the file and the latest
    /// one wins on load. A shadow copy is written into the container
    /// directory for backups.
    pub fn configure_network(
        &self,
        name: &str,
        ip: Option<&str>,
        port: Option<u16>,
    ) -> Result<NetworkEntry> {
        let path = validate_name(name)
            .and_then(|()| self.existing_container(name))
            .inspect_err(|e| {
                error!("Failed to configure network for container '{}': {}", name, e);
            })?;

        let port = port.unwrap_or(self.config.default_port);
        let entry = NetworkEntry::new(ip, port).inspect_err(|e| {
            error!("Rejected network config for container '{}': {}", name, e);
        })?;

        self.network.save(name, &entry).inspect_err(|e| {
            error!("Failed to save network config for container '{}': {}", name, e);
        })?;

        let shadow = path.join(SHADOW_FILE);
        if let Err(e) = fs::write(&shadow, format!("{}\n", format_line(name, &entry))) {
            warn!("Failed to write {}: {}", shadow.display(), e);
        }

        Ok(entry)
    }

    /// Current network settings of container `name`
    pub fn network_config(&self, name: &str) -> Result<Option<NetworkEntry>> {
        check_path_name(name)?;
        Ok(self.network.lookup(name))
    }

    /// Every entry in the network registry, orphaned ones included
    pub fn network_entries(&self) -> BTreeMap<String, NetworkEntry> {
        self.network.load()
    }

    /// Write `{name}_backup.zip` into the backups root
    pub fn backup(&self, name: &str) -> Result<PathBuf> {
        check_path_name(name).inspect_err(|e| error!("Failed to back up '{}': {}", name, e))?;
        let path = self.container_path(name);

        backup::create_backup(&path, &self.backups_root(), name).map_err(|source| {
            error!("Failed to create backup for container '{}': {}", name, source);
            VesselError::BackupFailed {
                name: name.to_string(),
                source,
            }
        })
    }

    /// Extract `{name}_backup.zip` into the container directory
    ///
    /// The container directory is created when missing. If the registry has
    /// no entry for `name` but the restored tree carries a shadow file, the
    /// shadow entry is registered again.
    pub fn restore(&self, name: &str) -> Result<usize> {
        check_path_name(name).inspect_err(|e| error!("Failed to restore '{}': {}", name, e))?;
        let path = self.container_path(name);

        let restored = backup::restore_backup(&self.backups_root(), &path, name)
            .map_err(|source| self.restore_failed(name, source))?;
        info!("Container '{}' restored ({} entries)", name, restored);

        self.reregister_from_shadow(name, &path);
        Ok(restored)
    }

    /// Archives in the backups root
    pub fn backups(&self) -> Result<Vec<BackupInfo>> {
        let root = self.backups_root();
        backup::list_backups(&root).map_err(|source| {
            error!("Failed to list backups in {}: {}", root.display(), source);
            VesselError::Storage { path: root, source }
        })
    }

    /// Open a terminal with the container directory as working directory
    pub fn open(&self, name: &str) -> Result<()> {
        let path = self.existing_container(name).inspect_err(|e| {
            error!("Failed to open container '{}': {}", name, e);
        })?;

        let terminal = self.terminal.clone().unwrap_or_else(Terminal::detect);
        terminal.launch(&path).inspect_err(|e| {
            error!("Failed to open container '{}': {}", name, e);
        })
    }

    fn restore_failed(&self, name: &str, source: ArchiveError) -> VesselError {
        error!("Failed to restore container '{}': {}", name, source);
        VesselError::RestoreFailed {
            name: name.to_string(),
            source,
        }
    }

    fn reregister_from_shadow(&self, name: &str, path: &Path) {
        if self.network.lookup(name).is_some() {
            return;
        }

        let shadow = path.join(SHADOW_FILE);
        let Ok(content) = fs::read_to_string(&shadow) else {
            return;
        };

        match content.lines().next().map(parse_line) {
            Some(Ok((owner, entry))) if owner == name => {
                if let Err(e) = self.network.save(name, &entry) {
                    warn!("Failed to re-register network config for '{}': {}", name, e);
                }
            }
            Some(Ok((owner, _))) => {
                warn!("Shadow file {} belongs to '{}', ignoring", shadow.display(), owner);
            }
            Some(Err(e)) => warn!("Ignoring malformed {}: {}", shadow.display(), e),
            None => {}
        }
    }
}
