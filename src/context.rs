//! Service context bundling the port trait objects of one run.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{info, warn};

use crate::adapters::live::{GeminiClient, LiveClock, LiveGitTransport};
use crate::adapters::recording::{
    RecordingClock, RecordingGitTransport, RecordingLlmClient, SharedRecorder,
};
use crate::adapters::replaying::{ReplayingClock, ReplayingGitTransport, ReplayingLlmClient};
use crate::cassette::{Cassette, CassetteError, CassetteRecorder, CassetteReplayer};
use crate::config::Config;
use crate::ports::{Clock, GitTransport, LlmClient, PortError};

/// Bundles the ports the analysis pipeline talks through.
///
/// Constructors wire live, recording or replaying adapters. A recording
/// context writes its cassette when [`ServiceContext::finish_recording`] is
/// called, or on drop as a fallback.
pub struct ServiceContext {
    /// Time source for checkout naming.
    pub clock: Box<dyn Clock>,
    /// Repository fetch and cleanup.
    pub git: Box<dyn GitTransport>,
    /// Schema extraction model.
    pub llm: Box<dyn LlmClient>,
    recorder: Option<SharedRecorder>,
}

impl ServiceContext {
    /// Wires arbitrary port implementations, without recording.
    #[must_use]
    pub fn from_parts(
        clock: Box<dyn Clock>,
        git: Box<dyn GitTransport>,
        llm: Box<dyn LlmClient>,
    ) -> Self {
        Self { clock, git, llm, recorder: None }
    }

    /// Creates a context backed by the system clock, `git` and Gemini.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn live(config: &Config) -> Result<Self, PortError> {
        Ok(Self::from_parts(
            Box::new(LiveClock),
            Box::new(LiveGitTransport),
            Box::new(live_llm(config)?),
        ))
    }

    /// Creates a live context that records every port call to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn recording(config: &Config, path: &Path) -> Result<Self, PortError> {
        let name = path
            .file_stem()
            .map_or_else(|| "schemaviz".to_string(), |s| s.to_string_lossy().into_owned());
        let recorder: SharedRecorder = Arc::new(Mutex::new(CassetteRecorder::new(path, name)));
        info!(path = %path.display(), "recording port interactions");

        Ok(Self {
            clock: Box::new(RecordingClock::new(Box::new(LiveClock), Arc::clone(&recorder))),
            git: Box::new(RecordingGitTransport::new(
                Box::new(LiveGitTransport),
                Arc::clone(&recorder),
            )),
            llm: Box::new(RecordingLlmClient::new(
                Box::new(live_llm(config)?),
                Arc::clone(&recorder),
            )),
            recorder: Some(recorder),
        })
    }

    /// Creates a context that answers every port call from a cassette.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, CassetteError> {
        let cassette = Cassette::load(path)?;
        let replayer = Arc::new(Mutex::new(CassetteReplayer::new(&cassette)));

        Ok(Self::from_parts(
            Box::new(ReplayingClock::new(Arc::clone(&replayer))),
            Box::new(ReplayingGitTransport::new(Arc::clone(&replayer))),
            Box::new(ReplayingLlmClient::new(replayer)),
        ))
    }

    /// Returns `true` if port calls are being recorded.
    #[must_use]
    pub fn is_recording(&self) -> bool {
        self.recorder.is_some()
    }

    /// Tags the recording, if any, with the repository being analyzed.
    pub fn tag_recording(&self, repo_url: &str) {
        if let Some(recorder) = &self.recorder {
            recorder.lock().unwrap_or_else(PoisonError::into_inner).set_repo_url(repo_url);
        }
    }

    /// Writes the cassette of a recording context. Returns `None` otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette cannot be written.
    pub fn finish_recording(&mut self) -> Result<Option<PathBuf>, CassetteError> {
        let Some(recorder) = self.recorder.take() else {
            return Ok(None);
        };
        let path = recorder.lock().unwrap_or_else(PoisonError::into_inner).finish()?;
        info!(path = %path.display(), "cassette written");
        Ok(Some(path))
    }
}

impl Drop for ServiceContext {
    fn drop(&mut self) {
        if let Err(e) = self.finish_recording() {
            warn!(error = %e, "failed to write cassette");
        }
    }
}

fn live_llm(config: &Config) -> Result<GeminiClient, PortError> {
    GeminiClient::new(&config.api_base, &config.api_key, config.request_timeout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::Interaction;
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn replaying_context_serves_each_port_from_one_cassette() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.cassette.yaml");
        Cassette {
            name: "run".into(),
            recorded_at: Utc::now(),
            repo_url: None,
            interactions: vec![
                Interaction {
                    seq: 0,
                    port: "clock".into(),
                    method: "now".into(),
                    input: json!(null),
                    output: json!("2025-06-15T10:00:00Z"),
                },
                Interaction {
                    seq: 1,
                    port: "git".into(),
                    method: "remove".into(),
                    input: json!({"path": "x"}),
                    output: json!({"ok": null}),
                },
            ],
        }
        .save(&path)
        .unwrap();

        let ctx = ServiceContext::replaying(&path).unwrap();

        assert_eq!(ctx.clock.now().timestamp_millis(), 1_749_981_600_000);
        assert!(ctx.git.remove(&dir.path().join("x")).is_ok());
        assert!(!ctx.is_recording());
    }

    #[test]
    fn replaying_missing_cassette_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ServiceContext::replaying(&dir.path().join("none.yaml")).is_err());
    }

    #[test]
    fn recording_context_writes_cassette_on_finish() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rec.cassette.yaml");
        let config = Config::from_lookup(|k| (k == "GEMINI_API_KEY").then(|| "k".to_string()))
            .unwrap();

        let mut ctx = ServiceContext::recording(&config, &path).unwrap();
        ctx.tag_recording("https://github.com/acme/shop");
        let _ = ctx.clock.now();
        assert_eq!(ctx.finish_recording().unwrap(), Some(path.clone()));
        assert_eq!(ctx.finish_recording().unwrap(), None);

        let cassette = Cassette::load(&path).unwrap();
        assert_eq!(cassette.name, "rec.cassette");
        assert_eq!(cassette.repo_url.as_deref(), Some("https://github.com/acme/shop"));
        assert_eq!(cassette.interactions.len(), 1);
    }
}
