//! Collects interactions during a live run and writes them out at the end.

use std::path::PathBuf;

use chrono::Utc;

use super::format::{Cassette, Interaction};
use super::CassetteError;

/// Accumulates interactions in call order.
#[derive(Debug)]
pub struct CassetteRecorder {
    path: PathBuf,
    name: String,
    repo_url: Option<String>,
    interactions: Vec<Interaction>,
}

impl CassetteRecorder {
    /// Creates a recorder that will write to `path`.
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self { path: path.into(), name: name.into(), repo_url: None, interactions: Vec::new() }
    }

    /// Tags the recording with the repository being analyzed.
    pub fn set_repo_url(&mut self, url: impl Into<String>) {
        self.repo_url = Some(url.into());
    }

    /// Appends an interaction; `seq` is assigned here.
    pub fn record(
        &mut self,
        port: impl Into<String>,
        method: impl Into<String>,
        input: serde_json::Value,
        output: serde_json::Value,
    ) {
        self.interactions.push(Interaction {
            seq: self.interactions.len() as u64,
            port: port.into(),
            method: method.into(),
            input,
            output,
        });
    }

    /// Number of interactions recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.interactions.len()
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }

    /// Writes everything recorded so far and returns the cassette path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn finish(&self) -> Result<PathBuf, CassetteError> {
        let cassette = Cassette {
            name: self.name.clone(),
            recorded_at: Utc::now(),
            repo_url: self.repo_url.clone(),
            interactions: self.interactions.clone(),
        };
        cassette.save(&self.path)?;
        Ok(self.path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn finish_writes_sequenced_interactions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analyze.cassette.yaml");

        let mut recorder = CassetteRecorder::new(&path, "analyze");
        recorder.set_repo_url("https://github.com/acme/shop");
        recorder.record("clock", "now", json!({}), json!("2025-06-15T10:00:00Z"));
        recorder.record("git", "clone_shallow", json!({"url": "u"}), json!({"ok": null}));
        recorder.record("llm", "complete", json!({"prompt": "p"}), json!({"ok": {"text": "{}"}}));
        assert_eq!(recorder.len(), 3);

        let written = recorder.finish().unwrap();
        assert_eq!(written, path);

        let cassette = Cassette::load(&path).unwrap();
        assert_eq!(cassette.name, "analyze");
        assert_eq!(cassette.repo_url.as_deref(), Some("https://github.com/acme/shop"));
        let seqs: Vec<u64> = cassette.interactions.iter().map(|i| i.seq).collect();
        assert_eq!(seqs, vec![0, 1, 2]);
        assert_eq!(cassette.interactions[2].port, "llm");
    }
}
