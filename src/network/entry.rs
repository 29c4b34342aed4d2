use std::fmt;
use std::net::IpAddr;

use serde::Serialize;

use crate::error::{Result, VesselError};

/// Network settings for a single container
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkEntry {
    /// IP address, empty when unset
    pub ip: String,
    pub port: u16,
}

impl NetworkEntry {
    /// Validate user-supplied settings
    ///
    /// An empty or missing IP is allowed. IPv6 literals are refused because
    /// the registry line format is colon-delimited.
    pub fn new(ip: Option<&str>, port: u16) -> Result<Self> {
        let ip = ip.map(str::trim).unwrap_or_default();

        if !ip.is_empty() {
            let addr: IpAddr = ip
                .parse()
                .map_err(|_| VesselError::network(format!("'{ip}' is not an IP address")))?;
            if addr.is_ipv6() {
                return Err(VesselError::network(format!(
                    "IPv6 address '{ip}' cannot be stored in the registry"
                )));
            }
        }

        if port == 0 {
            return Err(VesselError::network("port must be between 1 and 65535"));
        }

        Ok(Self {
            ip: ip.to_string(),
            port,
        })
    }

    pub fn has_ip(&self) -> bool {
        !self.ip.is_empty()
    }
}

impl fmt::Display for NetworkEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_ip() {
            write!(f, "{}:{}", self.ip, self.port)
        } else {
            write!(f, "*:{}", self.port)
        }
    }
}

/// Render one registry line, without the trailing newline
pub fn format_line(name: &str, entry: &NetworkEntry) -> String {
    format!("{name}:{}:{}", entry.ip, entry.port)
}

/// Parse one `name:ip:port` line
///
/// Exactly two colons are expected; the IP field is taken verbatim.
pub fn parse_line(line: &str) -> Result<(String, NetworkEntry)> {
    let fields: Vec<&str> = line.trim().split(':').collect();
    let [name, ip, port] = fields.as_slice() else {
        return Err(VesselError::network(format!(
            "expected name:ip:port, got {} field(s) in '{line}'",
            fields.len()
        )));
    };

    if name.is_empty() {
        return Err(VesselError::network(format!("empty container name in '{line}'")));
    }

    let port: u16 = port
        .parse()
        .map_err(|_| VesselError::network(format!("invalid port '{port}' in '{line}'")))?;

    Ok((
        name.to_string(),
        NetworkEntry {
            ip: ip.to_string(),
            port,
        },
    ))
}

/// Leading name field of a line, whatever the rest looks like
pub(crate) fn line_name(line: &str) -> &str {
    line.trim().split(':').next().unwrap_or_default()
}
