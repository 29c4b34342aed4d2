//! Vessel - manage virtualenv-backed containers
//!
//! A container is a named Python virtual environment below a containers
//! root. Vessel creates and deletes them, reports whether each looks
//! usable, keeps per-container network settings in a flat registry file and
//! takes zip backups that can be restored in place.
//!
//! # Example
//!
//! ```no_run
//! use vessel::{Config, ContainerRegistry, Operation};
//!
//! let config = Config::load_or_default("config.txt".as_ref());
//! let registry = ContainerRegistry::new(config);
//! registry.create("alpha")?;
//! registry.configure_network("alpha", Some("127.0.0.1"), Some(9000))?;
//! registry.dispatch(Operation::Backup { name: "alpha".to_string() })?;
//! # Ok::<(), vessel::VesselError>(())
//! ```

pub mod backup;
pub mod cli;
pub mod config;
pub mod error;
pub mod network;
pub mod platform_utils;
pub mod registry;
pub mod sandbox;
pub mod terminal;

pub use backup::{ArchiveError, BackupInfo};
pub use config::Config;
pub use error::{Result, VesselError};
pub use network::{NetworkEntry, NetworkRegistry};
pub use registry::{ContainerRegistry, ContainerStatus, ContainerSummary, Operation, Outcome};
pub use sandbox::{Provisioner, PythonVenv, VirtualEnv};
pub use terminal::Terminal;
