//! Record-replay round trip of a full analysis.
//!
//! 1. Run the pipeline on stub ports wrapped in recording adapters.
//! 2. Replay the cassette through `ServiceContext::replaying()`.
//! 3. Assert the replayed result equals the recorded one, twice.

mod common;

use std::path::Path;
use std::sync::{Arc, Mutex};

use schemaviz::adapters::recording::{RecordingClock, RecordingGitTransport, RecordingLlmClient};
use schemaviz::analyze::{AnalysisResult, Analyzer};
use schemaviz::cassette::{Cassette, CassetteRecorder};
use schemaviz::config::ExtractionSettings;
use schemaviz::context::ServiceContext;
use schemaviz::error::AnalyzeError;

use common::{FixedClock, FixtureGit, ScriptedLlm, USER_SCHEMA};

const URL: &str = "https://github.com/acme/shop";

async fn analyze(
    ctx: &ServiceContext,
    checkout_dir: &Path,
) -> Result<AnalysisResult, AnalyzeError> {
    Analyzer::new(ctx, checkout_dir, ExtractionSettings::default()).analyze(URL).await
}

/// Wraps stub ports in recording adapters that share `recorder`.
fn recording_ctx(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    git: FixtureGit,
    llm: ScriptedLlm,
) -> ServiceContext {
    ServiceContext::from_parts(
        Box::new(RecordingClock::new(Box::new(FixedClock), Arc::clone(recorder))),
        Box::new(RecordingGitTransport::new(Box::new(git), Arc::clone(recorder))),
        Box::new(RecordingLlmClient::new(Box::new(llm), Arc::clone(recorder))),
    )
}

#[tokio::test]
async fn recorded_analysis_replays_identically() {
    let dir = tempfile::tempdir().unwrap();
    let cassette_path = dir.path().join("shop.cassette.yaml");
    let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&cassette_path, "shop")));
    recorder.lock().unwrap().set_repo_url(URL);

    let (git, _) = FixtureGit::with_files(vec![
        ("db/schema.sql", "CREATE TABLE users (id INT PRIMARY KEY);"),
        ("README.md", "# shop"),
    ]);
    let (llm, _) = ScriptedLlm::replying(USER_SCHEMA);
    let recorded = {
        let ctx = recording_ctx(&recorder, git, llm);
        analyze(&ctx, &dir.path().join("live")).await.unwrap()
    };
    recorder.lock().unwrap().finish().unwrap();

    let cassette = Cassette::load(&cassette_path).unwrap();
    let calls: Vec<String> =
        cassette.interactions.iter().map(|i| format!("{}::{}", i.port, i.method)).collect();
    assert_eq!(calls, vec!["clock::now", "git::clone_shallow", "llm::complete", "git::remove"]);
    // only discovered schema files are kept in the snapshot
    let snapshot = &cassette.interactions[1].output["ok"]["files"];
    assert!(snapshot.get("db/schema.sql").is_some());
    assert!(snapshot.get("README.md").is_none());

    let first = {
        let ctx = ServiceContext::replaying(&cassette_path).unwrap();
        analyze(&ctx, &dir.path().join("replay-1")).await.unwrap()
    };
    let second = {
        let ctx = ServiceContext::replaying(&cassette_path).unwrap();
        analyze(&ctx, &dir.path().join("replay-2")).await.unwrap()
    };

    assert_eq!(first, recorded, "replay differs from recording");
    assert_eq!(first, second, "replays differ from each other");
    assert!(!dir.path().join("replay-1/shop-1749981600000").exists());
}

#[tokio::test]
async fn recorded_failure_replays_as_the_same_error() {
    let dir = tempfile::tempdir().unwrap();
    let cassette_path = dir.path().join("quota.cassette.yaml");

    let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&cassette_path, "quota")));

    let (git, _) = FixtureGit::with_files(vec![("schema.sql", "CREATE TABLE t ();")]);
    let (llm, _) = ScriptedLlm::failing("Resource has been exhausted (e.g. check quota).");
    let recorded_err = {
        let ctx = recording_ctx(&recorder, git, llm);
        analyze(&ctx, &dir.path().join("live")).await.unwrap_err()
    };
    recorder.lock().unwrap().finish().unwrap();

    let ctx = ServiceContext::replaying(&cassette_path).unwrap();
    let replayed_err = analyze(&ctx, &dir.path().join("replay")).await.unwrap_err();

    assert_eq!(replayed_err, recorded_err);
    assert_eq!(replayed_err.status_code(), 500);
}
