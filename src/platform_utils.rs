// ============================================================================
// File: packages/vessel/src/platform_utils.rs
// ----------------------------------------------------------------------------
// Cross-platform helpers for file modes and symlinks in backup archives
// ============================================================================

use std::fs::Metadata;
use std::io;
use std::path::Path;

/// Unix permission bits of a file, `None` where the platform has none
#[cfg(unix)]
pub fn file_mode(metadata: &Metadata) -> Option<u32> {
    use std::os::unix::fs::PermissionsExt;
    Some(metadata.permissions().mode() & 0o7777)
}

#[cfg(not(unix))]
pub fn file_mode(_metadata: &Metadata) -> Option<u32> {
    None
}

/// Apply unix permission bits to `path`
///
/// On Windows this is a no-op; permissions stored in an archive created on
/// a unix host are ignored.
#[cfg(unix)]
pub fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode & 0o7777))
}

#[cfg(not(unix))]
pub fn set_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}

/// Create a symlink at `link` pointing to `target`
#[cfg(unix)]
pub fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

/// Windows needs elevated rights for symlinks; the link target is written
/// as a plain file instead
#[cfg(not(unix))]
pub fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::fs::write(link, target.to_string_lossy().as_bytes())
}
