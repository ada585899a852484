//! Adapters that answer port calls from a cassette.
//!
//! All adapters of one run share a single [`CassetteReplayer`]; each pulls
//! the next interaction recorded for its own port method.

pub mod clock;
pub mod git;
pub mod llm;

use std::sync::{Arc, Mutex, PoisonError};

use serde::de::DeserializeOwned;

use crate::cassette::{CassetteError, CassetteReplayer};
use crate::ports::PortError;

pub use clock::ReplayingClock;
pub use git::ReplayingGitTransport;
pub use llm::ReplayingLlmClient;

/// Shared handle to the replayer of a run.
pub type SharedReplayer = Arc<Mutex<CassetteReplayer>>;

/// Takes the recorded output of the next `port::method` call.
pub(crate) fn next_output(
    replayer: &SharedReplayer,
    port: &str,
    method: &str,
) -> Result<serde_json::Value, CassetteError> {
    let mut guard = replayer.lock().unwrap_or_else(PoisonError::into_inner);
    guard.next_interaction(port, method).map(|i| i.output)
}

/// Decodes an `{"ok": ..}` / `{"err": ..}` output back into a result.
pub(crate) fn replay_result<T: DeserializeOwned>(
    output: serde_json::Value,
    context: &str,
) -> Result<T, PortError> {
    if let Some(err) = output.get("err") {
        return Err(err.as_str().unwrap_or("unknown error").to_string().into());
    }
    let value = match output {
        serde_json::Value::Object(mut map) if map.contains_key("ok") => {
            map.remove("ok").unwrap_or_default()
        }
        other => other,
    };
    serde_json::from_value(value)
        .map_err(|e| format!("{context}: failed to decode recorded output: {e}").into())
}
