//! Replays repository transport calls.
//!
//! A replayed clone rebuilds the checkout from the recorded snapshot so that
//! discovery sees the same files it saw during recording.

use std::fs;
use std::path::{Component, Path};

use tracing::warn;

use super::{next_output, replay_result, SharedReplayer};
use crate::adapters::recording::git::CheckoutSnapshot;
use crate::ports::{GitTransport, PortError};

/// Serves recorded clone and remove outcomes.
pub struct ReplayingGitTransport {
    replayer: SharedReplayer,
}

impl ReplayingGitTransport {
    /// Creates a transport backed by `replayer`.
    #[must_use]
    pub fn new(replayer: SharedReplayer) -> Self {
        Self { replayer }
    }
}

fn materialize(dest: &Path, snapshot: &CheckoutSnapshot) -> Result<(), PortError> {
    fs::create_dir_all(dest)?;
    for (relative, content) in &snapshot.files {
        if !stays_inside(Path::new(relative)) {
            warn!(path = %relative, "skipping snapshot path outside the checkout");
            continue;
        }
        let path = dest.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
    }
    Ok(())
}

fn stays_inside(relative: &Path) -> bool {
    relative.components().all(|c| matches!(c, Component::Normal(_)))
}

impl GitTransport for ReplayingGitTransport {
    fn clone_shallow(&self, _url: &str, dest: &Path) -> Result<(), PortError> {
        let output = next_output(&self.replayer, "git", "clone_shallow")?;
        let snapshot: CheckoutSnapshot = replay_result(output, "git::clone_shallow")?;
        materialize(dest, &snapshot)
    }

    fn remove(&self, path: &Path) -> Result<(), PortError> {
        // the checkout was built locally by `clone_shallow`, so it goes either way
        let _ = fs::remove_dir_all(path);
        let output = next_output(&self.replayer, "git", "remove")?;
        replay_result(output, "git::remove")
    }
}
