//! Command line front end

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_FILE;
use crate::registry::{Operation, Outcome};

/// Manage virtualenv-backed containers
#[derive(Parser, Debug)]
#[command(name = "vessel", version, about, long_about = None)]
pub struct Args {
    /// Directory that relative configuration paths resolve against
    #[arg(long, global = true, default_value = ".")]
    pub base_dir: PathBuf,

    /// Configuration file [default: <base-dir>/config.txt]
    #[arg(long, global = true, env = "VESSEL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Append log output to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: SubCommand,
}

impl Args {
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| self.base_dir.join(DEFAULT_CONFIG_FILE))
    }
}

#[derive(Subcommand, Debug)]
pub enum SubCommand {
    /// List containers and their status
    List,

    /// Create a container
    Create { name: String },

    /// Delete a container and its network settings
    Delete { name: String },

    /// Show whether a container's environment looks usable
    Status { name: String },

    /// Inspect or change network settings
    Network {
        #[command(subcommand)]
        action: NetworkCommand,
    },

    /// Back up a container to <backups>/<name>_backup.zip
    Backup { name: String },

    /// Restore a container from its backup
    Restore { name: String },

    /// List backup archives
    Backups,

    /// Open a terminal inside a container
    Open {
        name: String,

        /// Terminal program to run instead of the detected one
        #[arg(long)]
        terminal: Option<String>,
    },

    /// Inspect or write the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum NetworkCommand {
    /// Record IP and port for a container
    Set {
        name: String,

        /// IP address (IPv4), omitted to leave unset
        #[arg(long)]
        ip: Option<String>,

        /// Port [default: default_port from config]
        #[arg(long)]
        port: Option<u16>,
    },

    /// Show settings for one container or all of them
    Show { name: Option<String> },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Write the effective configuration to the config file
    Save,
}

impl SubCommand {
    /// Registry operation for this command, `None` for config commands
    pub fn operation(&self) -> Option<Operation> {
        let op = match self {
            Self::List => Operation::List,
            Self::Create { name } => Operation::Create { name: name.clone() },
            Self::Delete { name } => Operation::Delete { name: name.clone() },
            Self::Status { name } => Operation::Status { name: name.clone() },
            Self::Network {
                action: NetworkCommand::Set { name, ip, port },
            } => Operation::ConfigureNetwork {
                name: name.clone(),
                ip: ip.clone(),
                port: *port,
            },
            Self::Network {
                action: NetworkCommand::Show { name },
            } => Operation::ShowNetwork { name: name.clone() },
            Self::Backup { name } => Operation::Backup { name: name.clone() },
            Self::Restore { name } => Operation::Restore { name: name.clone() },
            Self::Backups => Operation::ListBackups,
            Self::Open { name, .. } => Operation::Open { name: name.clone() },
            Self::Config { .. } => return None,
        };
        Some(op)
    }
}

/// Human-readable rendering of an outcome
pub fn render(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Containers { containers } if containers.is_empty() => {
            "No containers".to_string()
        }
        Outcome::Containers { containers } => containers
            .iter()
            .map(|c| format!("{} - {}", c.name, c.status))
            .collect::<Vec<_>>()
            .join("\n"),
        Outcome::Created { container } => format!(
            "Container '{}' created successfully at {}.",
            container.name,
            container.path.display()
        ),
        Outcome::Deleted { name } => format!("Container '{name}' deleted successfully."),
        Outcome::Status { name, status } => format!("{name} - {status}"),
        Outcome::NetworkConfigured { name, entry } => format!(
            "Network configuration for container '{name}' saved successfully ({entry})."
        ),
        Outcome::Network { entries } if entries.is_empty() => {
            "No network configuration".to_string()
        }
        Outcome::Network { entries } => entries
            .iter()
            .map(|(name, entry)| format!("{name} - {entry}"))
            .collect::<Vec<_>>()
            .join("\n"),
        Outcome::BackedUp { name, archive } => format!(
            "Backup for container '{name}' created successfully: {}",
            archive.display()
        ),
        Outcome::Restored { name, entries } => {
            format!("Container '{name}' restored successfully ({entries} entries).")
        }
        Outcome::Backups { backups } if backups.is_empty() => "No backups".to_string(),
        Outcome::Backups { backups } => backups
            .iter()
            .map(|b| {
                let modified = b
                    .modified
                    .map(|m| m.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_else(|| "-".to_string());
                format!("{} - {} bytes - {}", b.name, b.size, modified)
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Outcome::Opened { name } => format!("Terminal for container '{name}' closed."),
    }
}
