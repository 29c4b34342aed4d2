// ============================================================================
// File: packages/vessel/src/network/registry.rs
// ----------------------------------------------------------------------------
// Flat-file network registry:
// - Load with per-line error tolerance
// - Append-only save
// - Whole-file rewrite on removal
// ============================================================================

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::error::{Result, VesselError};

use super::entry::{NetworkEntry, format_line, line_name, parse_line};

/// Registry of per-container network settings
///
/// Backed by one text file with a `name:ip:port` line per entry. Saving
/// appends and never rewrites, so a container configured twice has two
/// lines; [`NetworkRegistry::load`] keeps the last one. There is no locking:
/// concurrent writers must be serialised by the caller.
#[derive(Debug, Clone)]
pub struct NetworkRegistry {
    path: PathBuf,
}

impl NetworkRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every well-formed entry
    ///
    /// A missing file yields an empty map. Malformed lines are logged and
    /// skipped; an unreadable file is logged and treated as empty.
    pub fn load(&self) -> BTreeMap<String, NetworkEntry> {
        let mut entries = BTreeMap::new();

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No network registry at {}", self.path.display());
                return entries;
            }
            Err(e) => {
                warn!(
                    "Failed to read network registry {}: {}",
                    self.path.display(),
                    e
                );
                return entries;
            }
        };

        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match parse_line(line) {
                Ok((name, entry)) => {
                    entries.insert(name, entry);
                }
                Err(e) => warn!(
                    "Skipping line {} of {}: {}",
                    index + 1,
                    self.path.display(),
                    e
                ),
            }
        }

        entries
    }

    /// Current entry for `name`, if any
    pub fn lookup(&self, name: &str) -> Option<NetworkEntry> {
        self.load().remove(name)
    }

    /// Append an entry for `name`
    pub fn save(&self, name: &str, entry: &NetworkEntry) -> Result<()> {
        let append = || -> io::Result<()> {
            if let Some(parent) = self.path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)?;
            }
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?;
            writeln!(file, "{}", format_line(name, entry))
        };

        append().map_err(|source| self.io_error(source))?;
        info!("Saved network config for container '{}': {}", name, entry);
        Ok(())
    }

    /// Drop every line whose name field is `name`
    ///
    /// Other lines, including malformed ones, are written back verbatim.
    /// Returns the number of lines removed.
    pub fn remove(&self, name: &str) -> Result<usize> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(self.io_error(e)),
        };

        let mut kept = String::with_capacity(content.len());
        let mut removed = 0;
        for line in content.lines() {
            if line_name(line) == name {
                removed += 1;
            } else {
                kept.push_str(line);
                kept.push('\n');
            }
        }

        if removed > 0 {
            fs::write(&self.path, kept).map_err(|e| self.io_error(e))?;
            info!(
                "Removed {} network config line(s) for container '{}'",
                removed, name
            );
        }

        Ok(removed)
    }

    fn io_error(&self, source: io::Error) -> VesselError {
        VesselError::Registry {
            path: self.path.clone(),
            source,
        }
    }
}
