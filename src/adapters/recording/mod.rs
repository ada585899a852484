//! Adapters that delegate to an inner port and record each call.
//!
//! Fallible calls are stored as `{"ok": value}` or `{"err": message}`, the
//! same shape the replaying adapters read back.

pub mod clock;
pub mod git;
pub mod llm;

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use tracing::warn;

use crate::cassette::recorder::CassetteRecorder;

pub use clock::RecordingClock;
pub use git::RecordingGitTransport;
pub use llm::RecordingLlmClient;

/// Shared handle to the recorder used by every recording adapter of a run.
pub type SharedRecorder = Arc<Mutex<CassetteRecorder>>;

fn to_json<T: Serialize>(value: &T, what: &str) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or_else(|e| {
        warn!(error = %e, what, "could not serialize interaction for cassette");
        serde_json::Value::Null
    })
}

fn push(
    recorder: &SharedRecorder,
    port: &str,
    method: &str,
    input: serde_json::Value,
    output: serde_json::Value,
) {
    recorder
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .record(port, method, input, output);
}

/// Records an infallible call.
pub(crate) fn record_interaction<I, O>(
    recorder: &SharedRecorder,
    port: &str,
    method: &str,
    input: &I,
    output: &O,
) where
    I: Serialize,
    O: Serialize,
{
    push(recorder, port, method, to_json(input, "input"), to_json(output, "output"));
}

/// Records a fallible call using the `ok`/`err` convention.
pub(crate) fn record_result<T, E, I>(
    recorder: &SharedRecorder,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    T: Serialize,
    E: std::fmt::Display,
    I: Serialize,
{
    let output = match result {
        Ok(v) => serde_json::json!({ "ok": to_json(v, "ok value") }),
        Err(e) => serde_json::json!({ "err": e.to_string() }),
    };
    push(recorder, port, method, to_json(input, "input"), output);
}
