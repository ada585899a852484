//! Replays recorded clock readings.

use chrono::{DateTime, Utc};

use super::{next_output, SharedReplayer};
use crate::ports::clock::Clock;

/// Serves recorded timestamps in order.
pub struct ReplayingClock {
    replayer: SharedReplayer,
}

impl ReplayingClock {
    /// Creates a clock backed by `replayer`.
    #[must_use]
    pub fn new(replayer: SharedReplayer) -> Self {
        Self { replayer }
    }
}

impl Clock for ReplayingClock {
    /// # Panics
    ///
    /// Panics when the cassette holds no further reading or the reading is not
    /// a timestamp, since the port has no error channel.
    fn now(&self) -> DateTime<Utc> {
        let output = next_output(&self.replayer, "clock", "now")
            .unwrap_or_else(|e| panic!("clock::now replay failed: {e}"));
        serde_json::from_value(output)
            .unwrap_or_else(|e| panic!("clock::now replay failed: not a timestamp: {e}"))
    }
}
