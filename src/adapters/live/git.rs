//! Repository transport backed by the `git` CLI.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;

use crate::ports::git::GitTransport;
use crate::ports::PortError;

/// Clones with `git clone --depth 1` and removes checkouts from disk.
pub struct LiveGitTransport;

impl GitTransport for LiveGitTransport {
    fn clone_shallow(&self, url: &str, dest: &Path) -> Result<(), PortError> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }

        let output = Command::new("git")
            .args(["clone", "--depth", "1", "--"])
            .arg(url)
            .arg(dest)
            .output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!("git clone {url} failed: {}", stderr.trim()).into());
        }
        Ok(())
    }

    fn remove(&self, path: &Path) -> Result<(), PortError> {
        match fs::remove_dir_all(path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}
