use std::cmp::Reverse;
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};

use log::{debug, info};
use zip::ZipArchive;

use crate::platform_utils::{set_mode, symlink};

use super::{ArchiveError, archive_path};

const S_IFMT: u32 = 0o170000;
const S_IFLNK: u32 = 0o120000;

/// Extract `{name}_backup.zip` into `container_dir`
///
/// Entries under the `{name}/` root land at the same relative path inside
/// the container; root-level entries (the network shadow file) land directly
/// in it. Existing files are overwritten. Returns the number of entries
/// written.
pub fn restore_backup(
    backups_root: &Path,
    container_dir: &Path,
    name: &str,
) -> Result<usize, ArchiveError> {
    let source = archive_path(backups_root, name);
    let file = match File::open(&source) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ArchiveError::MissingArchive(source));
        }
        Err(e) => return Err(e.into()),
    };

    let mut archive = ZipArchive::new(file)?;
    fs::create_dir_all(container_dir)?;

    let mut written = 0;
    let mut dir_modes = Vec::new();
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let Some(relative) = relative_path(entry.name(), name) else {
            return Err(ArchiveError::UnsafeEntry(entry.name().to_string()));
        };
        if relative.as_os_str().is_empty() {
            // The root entry is the container directory itself
            continue;
        }
        if crosses_symlink(container_dir, &relative) {
            return Err(ArchiveError::UnsafeEntry(entry.name().to_string()));
        }

        let target = container_dir.join(&relative);
        let mode = entry.unix_mode();

        if entry.is_dir() {
            clear_link(&target)?;
            fs::create_dir_all(&target)?;
            if let Some(mode) = mode {
                // Owner keeps write access until every child is extracted
                set_mode(&target, mode | 0o700)?;
                dir_modes.push((target, mode));
            }
            written += 1;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        clear_file(&target)?;

        if mode.is_some_and(|mode| mode & S_IFMT == S_IFLNK) {
            let mut link_target = String::new();
            entry.read_to_string(&mut link_target)?;
            symlink(Path::new(&link_target), &target)?;
            written += 1;
            continue;
        }

        let mut out = File::create(&target)?;
        io::copy(&mut entry, &mut out)?;
        if let Some(mode) = mode {
            set_mode(&target, mode)?;
        }
        written += 1;
    }

    // Deepest first, so a read-only parent is locked after its children
    dir_modes.sort_by_key(|(path, _)| Reverse(path.components().count()));
    for (path, mode) in dir_modes {
        set_mode(&path, mode)?;
    }

    info!(
        "Restored {} entries from {} into {}",
        written,
        source.display(),
        container_dir.display()
    );
    Ok(written)
}

/// Map an entry name onto a path relative to the container directory
///
/// Returns `None` for names that are absolute or contain `..`.
fn relative_path(entry_name: &str, root: &str) -> Option<PathBuf> {
    let path = Path::new(entry_name);
    let mut components = path.components().peekable();

    if components.peek() == Some(&Component::Normal(OsStr::new(root)))
        && (components.clone().nth(1).is_some() || entry_name.ends_with('/'))
    {
        components.next();
    }

    let mut relative = PathBuf::new();
    for component in components {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }
    Some(relative)
}

/// True when an existing directory between `root` and `relative` is a symlink
///
/// A link extracted earlier in the same archive must not redirect later
/// entries outside the container.
fn crosses_symlink(root: &Path, relative: &Path) -> bool {
    let Some(parent) = relative.parent() else {
        return false;
    };

    let mut current = root.to_path_buf();
    for component in parent.components() {
        current.push(component);
        match fs::symlink_metadata(&current) {
            Ok(metadata) if metadata.file_type().is_symlink() => return true,
            Ok(_) => {}
            // Nothing below a missing directory exists yet
            Err(_) => return false,
        }
    }
    false
}

/// Remove an existing symlink so writing through it cannot escape the tree
fn clear_link(target: &Path) -> io::Result<()> {
    match fs::symlink_metadata(target) {
        Ok(metadata) if metadata.file_type().is_symlink() => {
            debug!("Replacing symlink {}", target.display());
            fs::remove_file(target)
        }
        _ => Ok(()),
    }
}

/// Remove an existing file or symlink before it is rewritten
///
/// Read-only files cannot be truncated in place.
fn clear_file(target: &Path) -> io::Result<()> {
    match fs::symlink_metadata(target) {
        Ok(metadata) if !metadata.is_dir() => fs::remove_file(target),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::create_backup;

    #[test]
    fn relative_paths() {
        assert_eq!(relative_path("alpha/", "alpha"), Some(PathBuf::new()));
        assert_eq!(
            relative_path("alpha/bin/activate", "alpha"),
            Some(PathBuf::from("bin/activate"))
        );
        assert_eq!(
            relative_path("network_config.txt", "alpha"),
            Some(PathBuf::from("network_config.txt"))
        );
        assert_eq!(relative_path("alpha/../../etc/passwd", "alpha"), None);
        assert_eq!(relative_path("/etc/passwd", "alpha"), None);
    }

    #[test]
    fn missing_archive() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = restore_backup(&dir.path().join("backups"), &dir.path().join("alpha"), "alpha")
            .expect_err("no archive");
        assert!(matches!(err, ArchiveError::MissingArchive(_)));
    }

    #[test]
    fn corrupt_archive_is_zip_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let backups = dir.path().join("backups");
        fs::create_dir_all(&backups).expect("mkdir");
        fs::write(archive_path(&backups, "alpha"), b"not a zip").expect("write");

        let err = restore_backup(&backups, &dir.path().join("alpha"), "alpha")
            .expect_err("corrupt archive");
        assert!(matches!(err, ArchiveError::Zip(_)));
    }

    #[test]
    fn restore_overwrites_and_recreates() {
        let dir = tempfile::tempdir().expect("tempdir");
        let container = dir.path().join("alpha");
        let backups = dir.path().join("backups");
        fs::create_dir_all(container.join("bin")).expect("mkdir");
        fs::write(container.join("bin/activate"), "original").expect("write");
        fs::write(container.join("data.bin"), [0u8, 159, 146, 150]).expect("write");
        create_backup(&container, &backups, "alpha").expect("backup");

        fs::write(container.join("bin/activate"), "modified").expect("write");
        fs::remove_file(container.join("data.bin")).expect("remove");

        restore_backup(&backups, &container, "alpha").expect("restore");

        assert_eq!(
            fs::read_to_string(container.join("bin/activate")).expect("read"),
            "original"
        );
        assert_eq!(
            fs::read(container.join("data.bin")).expect("read"),
            [0u8, 159, 146, 150]
        );
        assert!(!container.join("alpha").exists());
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_and_modes_survive() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let container = dir.path().join("alpha");
        let backups = dir.path().join("backups");
        fs::create_dir_all(container.join("lib")).expect("mkdir");
        fs::create_dir_all(container.join("bin")).expect("mkdir");
        std::os::unix::fs::symlink("lib", container.join("lib64")).expect("symlink");
        fs::write(container.join("bin/tool"), "#!/bin/sh\n").expect("write");
        set_mode(&container.join("bin/tool"), 0o755).expect("chmod");
        create_backup(&container, &backups, "alpha").expect("backup");

        fs::remove_dir_all(&container).expect("remove");
        restore_backup(&backups, &container, "alpha").expect("restore");

        assert_eq!(
            fs::read_link(container.join("lib64")).expect("link"),
            PathBuf::from("lib")
        );
        let mode = fs::metadata(container.join("bin/tool"))
            .expect("metadata")
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[cfg(unix)]
    #[test]
    fn entries_below_an_extracted_symlink_are_rejected() {
        use std::io::Write;

        use zip::ZipWriter;
        use zip::write::SimpleFileOptions;

        let dir = tempfile::tempdir().expect("tempdir");
        let backups = dir.path().join("backups");
        let outside = dir.path().join("outside");
        fs::create_dir_all(&backups).expect("mkdir");
        fs::create_dir_all(&outside).expect("mkdir");

        let file = File::create(archive_path(&backups, "alpha")).expect("create archive");
        let mut zip = ZipWriter::new(file);
        let options = SimpleFileOptions::default();
        zip.add_directory("alpha/", options).expect("root entry");
        zip.add_symlink("alpha/link", outside.to_string_lossy().into_owned(), options)
            .expect("link entry");
        zip.start_file("alpha/link/evil.txt", options)
            .expect("file entry");
        zip.write_all(b"escaped").expect("write entry");
        zip.finish().expect("finish archive");

        let err = restore_backup(&backups, &dir.path().join("alpha"), "alpha")
            .expect_err("write through link");
        assert!(
            matches!(&err, ArchiveError::UnsafeEntry(entry) if entry == "alpha/link/evil.txt"),
            "unexpected error {err:?}"
        );
        assert!(!outside.join("evil.txt").exists());
    }

    #[cfg(unix)]
    #[test]
    fn read_only_parts_restore_and_overwrite() {
        use std::os::unix::fs::PermissionsExt;

        let mode_of = |path: &Path| {
            fs::metadata(path)
                .expect("metadata")
                .permissions()
                .mode()
                & 0o777
        };

        let dir = tempfile::tempdir().expect("tempdir");
        let container = dir.path().join("alpha");
        let backups = dir.path().join("backups");
        fs::create_dir_all(container.join("ro/nested")).expect("mkdir");
        fs::write(container.join("ro/data.txt"), "locked").expect("write");
        fs::write(container.join("ro/nested/deep.txt"), "deeper").expect("write");
        set_mode(&container.join("ro/data.txt"), 0o444).expect("chmod");
        set_mode(&container.join("ro/nested"), 0o555).expect("chmod");
        set_mode(&container.join("ro"), 0o555).expect("chmod");
        create_backup(&container, &backups, "alpha").expect("backup");

        // Fresh directory first, then again over the read-only result
        let copy = dir.path().join("copy");
        restore_backup(&backups, &copy, "alpha").expect("restore into empty dir");
        restore_backup(&backups, &copy, "alpha").expect("restore over read-only tree");

        assert_eq!(
            fs::read_to_string(copy.join("ro/data.txt")).expect("read"),
            "locked"
        );
        assert_eq!(
            fs::read_to_string(copy.join("ro/nested/deep.txt")).expect("read"),
            "deeper"
        );
        assert_eq!(mode_of(&copy.join("ro")), 0o555);
        assert_eq!(mode_of(&copy.join("ro/nested")), 0o555);
        assert_eq!(mode_of(&copy.join("ro/data.txt")), 0o444);

        for root in [&container, &copy] {
            set_mode(&root.join("ro"), 0o755).expect("unlock");
            set_mode(&root.join("ro/nested"), 0o755).expect("unlock");
        }
    }
}
