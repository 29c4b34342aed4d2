use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::backup::BackupInfo;
use crate::error::Result;
use crate::network::NetworkEntry;

use super::{ContainerRegistry, ContainerStatus, ContainerSummary};

/// Operations a front end can request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    List,
    Create {
        name: String,
    },
    Delete {
        name: String,
    },
    Status {
        name: String,
    },
    ConfigureNetwork {
        name: String,
        ip: Option<String>,
        port: Option<u16>,
    },
    /// Settings of one container, or the whole registry when `name` is unset
    ShowNetwork {
        name: Option<String>,
    },
    Backup {
        name: String,
    },
    Restore {
        name: String,
    },
    ListBackups,
    Open {
        name: String,
    },
}

/// Result of a successful [`Operation`]
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Containers {
        containers: Vec<ContainerSummary>,
    },
    Created {
        container: ContainerSummary,
    },
    Deleted {
        name: String,
    },
    Status {
        name: String,
        status: ContainerStatus,
    },
    NetworkConfigured {
        name: String,
        entry: NetworkEntry,
    },
    Network {
        entries: BTreeMap<String, NetworkEntry>,
    },
    BackedUp {
        name: String,
        archive: PathBuf,
    },
    Restored {
        name: String,
        entries: usize,
    },
    Backups {
        backups: Vec<BackupInfo>,
    },
    Opened {
        name: String,
    },
}

impl ContainerRegistry {
    /// Run `operation` and wrap its result
    pub fn dispatch(&self, operation: Operation) -> Result<Outcome> {
        match operation {
            Operation::List => Ok(Outcome::Containers {
                containers: self.list()?,
            }),
            Operation::Create { name } => Ok(Outcome::Created {
                container: self.create(&name)?,
            }),
            Operation::Delete { name } => {
                self.delete(&name)?;
                Ok(Outcome::Deleted { name })
            }
            Operation::Status { name } => Ok(Outcome::Status {
                status: self.status(&name)?,
                name,
            }),
            Operation::ConfigureNetwork { name, ip, port } => Ok(Outcome::NetworkConfigured {
                entry: self.configure_network(&name, ip.as_deref(), port)?,
                name,
            }),
            Operation::ShowNetwork { name: Some(name) } => {
                let entries = self
                    .network_config(&name)?
                    .map(|entry| BTreeMap::from([(name, entry)]))
                    .unwrap_or_default();
                Ok(Outcome::Network { entries })
            }
            Operation::ShowNetwork { name: None } => Ok(Outcome::Network {
                entries: self.network_entries(),
            }),
            Operation::Backup { name } => Ok(Outcome::BackedUp {
                archive: self.backup(&name)?,
                name,
            }),
            Operation::Restore { name } => Ok(Outcome::Restored {
                entries: self.restore(&name)?,
                name,
            }),
            Operation::ListBackups => Ok(Outcome::Backups {
                backups: self.backups()?,
            }),
            Operation::Open { name } => {
                self.open(&name)?;
                Ok(Outcome::Opened { name })
            }
        }
    }
}
