//! Repository transport port: fetch a remote repository, then discard it.

use std::path::Path;

use super::PortError;

/// Acquires and releases local copies of remote repositories.
///
/// Abstracting transport allows deterministic replay and testing
/// without network access or a `git` binary.
pub trait GitTransport: Send + Sync {
    /// Shallow-clones (depth 1) `url` into `dest`.
    ///
    /// # Errors
    ///
    /// Returns an error if the clone fails (unknown repository, network, auth).
    fn clone_shallow(&self, url: &str, dest: &Path) -> Result<(), PortError>;

    /// Recursively removes a checkout. A missing path is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory exists but cannot be removed.
    fn remove(&self, path: &Path) -> Result<(), PortError>;
}
