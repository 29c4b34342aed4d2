//! Zip backups of container directories
//!
//! One archive per container, `{name}_backup.zip` under the backups root.
//! The archive holds the container tree under a root entry named after the
//! container, plus the network shadow file at archive root when present.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::warn;
use serde::Serialize;

mod archive;
mod restore;

pub use archive::create_backup;
pub use restore::restore_backup;

const ARCHIVE_SUFFIX: &str = "_backup.zip";

/// Failures while writing or reading a backup archive
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("source directory {} does not exist", .0.display())]
    MissingSource(PathBuf),

    #[error("backup archive {} does not exist", .0.display())]
    MissingArchive(PathBuf),

    /// Entry name is absolute or climbs out of the target with `..`
    #[error("archive entry '{0}' escapes the target directory")]
    UnsafeEntry(String),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
}

/// An archive found in the backups root
#[derive(Debug, Clone, Serialize)]
pub struct BackupInfo {
    /// Container the archive was taken from
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
}

/// File name of the archive for `name`
pub fn archive_file_name(name: &str) -> String {
    format!("{name}{ARCHIVE_SUFFIX}")
}

pub fn archive_path(backups_root: &Path, name: &str) -> PathBuf {
    backups_root.join(archive_file_name(name))
}

/// Archives under `backups_root`, sorted by container name
///
/// A missing root is an empty list. Entries whose metadata cannot be read
/// are logged and skipped.
pub fn list_backups(backups_root: &Path) -> io::Result<Vec<BackupInfo>> {
    let entries = match fs::read_dir(backups_root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut backups = Vec::new();
    for entry in entries {
        let entry = entry?;
        let file_name = entry.file_name();
        let Some(name) = file_name
            .to_str()
            .and_then(|file_name| file_name.strip_suffix(ARCHIVE_SUFFIX))
        else {
            continue;
        };

        match entry.metadata() {
            Ok(metadata) if metadata.is_file() => backups.push(BackupInfo {
                name: name.to_string(),
                path: entry.path(),
                size: metadata.len(),
                modified: metadata.modified().ok().map(DateTime::<Utc>::from),
            }),
            Ok(_) => {}
            Err(e) => warn!("Skipping backup {}: {}", entry.path().display(), e),
        }
    }

    backups.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(backups)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_naming() {
        assert_eq!(archive_file_name("alpha"), "alpha_backup.zip");
        assert_eq!(
            archive_path(Path::new("backups"), "alpha"),
            PathBuf::from("backups/alpha_backup.zip")
        );
    }

    #[test]
    fn list_only_backup_archives() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("beta_backup.zip"), b"zz").expect("write");
        fs::write(dir.path().join("alpha_backup.zip"), b"z").expect("write");
        fs::write(dir.path().join("notes.txt"), b"x").expect("write");
        fs::create_dir(dir.path().join("gamma_backup.zip")).expect("mkdir");

        let backups = list_backups(dir.path()).expect("list");
        let names: Vec<_> = backups.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["alpha", "beta"]);
        assert_eq!(backups[1].size, 2);
        assert!(backups[0].modified.is_some());
    }

    #[test]
    fn missing_root_lists_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backups = list_backups(&dir.path().join("absent")).expect("list");
        assert!(backups.is_empty());
    }
}
