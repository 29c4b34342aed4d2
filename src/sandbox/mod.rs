//! Environments backing containers
//!
//! A container is a Python virtual environment created by an external tool.
//! This module holds the seam that invokes that tool ([`Provisioner`]), the
//! default `python -m venv` implementation, and the inspection used to report
//! whether an environment looks usable.

mod command;
mod environment;
mod provisioner;

pub use command::{find_command, probe_command};
pub use environment::{EnvironmentHealth, VirtualEnv};
pub use provisioner::{PythonVenv, Provisioner};
