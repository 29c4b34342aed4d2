use std::path::Path;
use std::process::{Command, Stdio};

use log::{debug, info};

/// First candidate that exists as a path or resolves on PATH
pub fn find_command<'a>(candidates: &[&'a str]) -> Option<&'a str> {
    for cmd in candidates {
        // Absolute or relative paths first
        if Path::new(cmd).is_file() {
            debug!("Found executable directly at path: {}", cmd);
            return Some(cmd);
        }

        let exists = Command::new("which")
            .arg(cmd)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false);

        if exists {
            debug!("Found executable in PATH: {}", cmd);
            return Some(cmd);
        }
    }
    info!("Could not find any of these executables: {:?}", candidates);
    None
}

/// Whether `cmd` runs and exits successfully with `args`
pub fn probe_command(cmd: &str, args: &[&str]) -> bool {
    Command::new(cmd)
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}
