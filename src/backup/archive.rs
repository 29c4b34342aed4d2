use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::network::SHADOW_FILE;
use crate::platform_utils::file_mode;

use super::{ArchiveError, archive_file_name, archive_path};

/// Write `{name}_backup.zip` for the container at `container_dir`
///
/// The archive is written to a temporary file beside the target and renamed
/// over any previous archive only once complete, so a failed backup never
/// replaces a good one.
pub fn create_backup(
    container_dir: &Path,
    backups_root: &Path,
    name: &str,
) -> Result<PathBuf, ArchiveError> {
    if !container_dir.is_dir() {
        return Err(ArchiveError::MissingSource(container_dir.to_path_buf()));
    }

    fs::create_dir_all(backups_root)?;
    let target = archive_path(backups_root, name);

    let mut tmp = tempfile::Builder::new()
        .prefix(&format!(".{}", archive_file_name(name)))
        .suffix(".tmp")
        .tempfile_in(backups_root)?;

    {
        let mut writer = ZipWriter::new(tmp.as_file_mut());
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        writer.add_directory(format!("{name}/"), options)?;
        let entries = add_tree(&mut writer, container_dir, name, options)?;

        let shadow = container_dir.join(SHADOW_FILE);
        if shadow.is_file() {
            add_file(&mut writer, &shadow, SHADOW_FILE, options)?;
        }

        writer.finish()?;
        debug!("Wrote {} entries for container '{}'", entries, name);
    }

    tmp.persist(&target).map_err(|e| ArchiveError::Io(e.error))?;
    info!("Backup of container '{}' written to {}", name, target.display());
    Ok(target)
}

/// Add the contents of `dir` below the `prefix` entry, depth first
///
/// Symlinks are stored as links and never followed, so a venv's
/// `lib64 -> lib` link does not duplicate the tree.
fn add_tree<W: io::Write + io::Seek>(
    writer: &mut ZipWriter<W>,
    dir: &Path,
    prefix: &str,
    options: SimpleFileOptions,
) -> Result<usize, ArchiveError> {
    let mut children = fs::read_dir(dir)?.collect::<io::Result<Vec<_>>>()?;
    children.sort_by_key(|entry| entry.file_name());

    let mut count = 0;
    for child in children {
        let path = child.path();
        let entry_name = format!("{prefix}/{}", child.file_name().to_string_lossy());
        let metadata = fs::symlink_metadata(&path)?;
        let file_type = metadata.file_type();

        if file_type.is_symlink() {
            let link_target = fs::read_link(&path)?;
            writer.add_symlink(
                entry_name,
                link_target.to_string_lossy().into_owned(),
                options,
            )?;
            count += 1;
        } else if file_type.is_dir() {
            writer.add_directory(format!("{entry_name}/"), with_mode(options, &metadata))?;
            count += 1 + add_tree(writer, &path, &entry_name, options)?;
        } else if file_type.is_file() {
            add_file(writer, &path, &entry_name, options)?;
            count += 1;
        } else {
            debug!("Skipping special file {}", path.display());
        }
    }

    Ok(count)
}

fn add_file<W: io::Write + io::Seek>(
    writer: &mut ZipWriter<W>,
    path: &Path,
    entry_name: &str,
    options: SimpleFileOptions,
) -> Result<(), ArchiveError> {
    let mut file = File::open(path)?;
    let metadata = file.metadata()?;
    writer.start_file(entry_name, with_mode(options, &metadata))?;
    io::copy(&mut file, writer)?;
    Ok(())
}

fn with_mode(options: SimpleFileOptions, metadata: &fs::Metadata) -> SimpleFileOptions {
    match file_mode(metadata) {
        Some(mode) => options.unix_permissions(mode),
        None => options,
    }
}
