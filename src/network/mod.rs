//! Per-container network metadata
//!
//! Containers may carry an optional IP address and a port. The settings live
//! in a flat registry file shared by all containers, and a copy of each
//! container's line is kept inside the container directory as a shadow file
//! so backups carry it along.

mod entry;
mod registry;

pub use entry::{NetworkEntry, format_line, parse_line};
pub use registry::NetworkRegistry;

/// Name of the shadow copy inside a container directory and at archive root
pub const SHADOW_FILE: &str = "network_config.txt";
