//! Stub ports shared by the integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};

use schemaviz::ports::{
    Clock, CompletionFuture, CompletionRequest, CompletionResponse, GitTransport, LlmClient,
    PortError,
};

pub const USER_SCHEMA: &str = r#"{
  "entities": {"User": {"attributes": {"id": {"type": "number", "isKey": true}}}},
  "relationships": {}
}"#;

/// Always reads 2025-06-15T10:00:00Z.
pub struct FixedClock;

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 10, 0, 0).unwrap()
    }
}

/// What a [`FixtureGit`] saw.
#[derive(Default)]
pub struct GitLog {
    pub cloned: Mutex<Vec<PathBuf>>,
    pub removed: Mutex<Vec<PathBuf>>,
}

/// Writes fixture files into the destination instead of cloning.
pub struct FixtureGit {
    pub files: Vec<(&'static str, &'static str)>,
    pub fail_clone: bool,
    pub fail_remove: bool,
    pub log: Arc<GitLog>,
}

impl FixtureGit {
    pub fn with_files(files: Vec<(&'static str, &'static str)>) -> (Self, Arc<GitLog>) {
        let log = Arc::new(GitLog::default());
        let git =
            Self { files, fail_clone: false, fail_remove: false, log: Arc::clone(&log) };
        (git, log)
    }
}

impl GitTransport for FixtureGit {
    fn clone_shallow(&self, _url: &str, dest: &Path) -> Result<(), PortError> {
        if self.fail_clone {
            return Err("Repository not found.".into());
        }
        std::fs::create_dir_all(dest)?;
        for (relative, content) in &self.files {
            let path = dest.join(relative);
            std::fs::create_dir_all(path.parent().unwrap())?;
            std::fs::write(path, content)?;
        }
        self.log.cloned.lock().unwrap().push(dest.to_path_buf());
        Ok(())
    }

    fn remove(&self, path: &Path) -> Result<(), PortError> {
        self.log.removed.lock().unwrap().push(path.to_path_buf());
        if self.fail_remove {
            return Err("permission denied".into());
        }
        std::fs::remove_dir_all(path)?;
        Ok(())
    }
}

/// Replies with a fixed text (or error) and counts calls.
pub struct ScriptedLlm {
    pub reply: Result<String, String>,
    pub calls: Arc<AtomicUsize>,
}

impl ScriptedLlm {
    pub fn replying(text: &str) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (Self { reply: Ok(text.to_string()), calls: Arc::clone(&calls) }, calls)
    }

    pub fn failing(msg: &str) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (Self { reply: Err(msg.to_string()), calls: Arc::clone(&calls) }, calls)
    }
}

impl LlmClient for ScriptedLlm {
    fn complete(&self, _request: &CompletionRequest) -> CompletionFuture<'_> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.reply.clone();
        Box::pin(async move {
            reply
                .map(|text| CompletionResponse { text, prompt_tokens: 42, completion_tokens: 7 })
                .map_err(PortError::from)
        })
    }
}
