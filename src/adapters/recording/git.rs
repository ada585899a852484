//! Records repository transport calls.
//!
//! A successful clone is recorded together with the candidate schema files
//! found in the fresh checkout, so a replay can rebuild the same checkout
//! without network access.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{record_result, SharedRecorder};
use crate::discovery;
use crate::ports::{GitTransport, PortError};

/// Files captured from a checkout at clone time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSnapshot {
    /// Relative path to file text.
    pub files: IndexMap<String, String>,
}

#[derive(Serialize)]
struct CloneInput<'a> {
    url: &'a str,
    dest: String,
}

#[derive(Serialize)]
struct PathInput {
    path: String,
}

/// Delegates to an inner transport and records each call.
pub struct RecordingGitTransport {
    inner: Box<dyn GitTransport>,
    recorder: SharedRecorder,
}

impl RecordingGitTransport {
    /// Wraps `inner`, recording into `recorder`.
    pub fn new(inner: Box<dyn GitTransport>, recorder: SharedRecorder) -> Self {
        Self { inner, recorder }
    }
}

impl GitTransport for RecordingGitTransport {
    fn clone_shallow(&self, url: &str, dest: &Path) -> Result<(), PortError> {
        let result = self.inner.clone_shallow(url, dest);
        let snapshot = result
            .as_ref()
            .map(|_| CheckoutSnapshot { files: discovery::discover(dest).file_contents });
        let input = CloneInput { url, dest: dest.display().to_string() };
        record_result(&self.recorder, "git", "clone_shallow", &input, &snapshot);
        result
    }

    fn remove(&self, path: &Path) -> Result<(), PortError> {
        let result = self.inner.remove(path);
        let input = PathInput { path: path.display().to_string() };
        record_result(&self.recorder, "git", "remove", &input, &result);
        result
    }
}
