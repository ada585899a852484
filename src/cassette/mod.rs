//! YAML cassettes holding recorded port interactions.
//!
//! A cassette captures every call the analysis pipeline makes through its
//! ports during one `analyze` run, so the run can be replayed offline.

pub mod format;
pub mod recorder;
pub mod replayer;

use std::path::PathBuf;

use thiserror::Error;

pub use format::{Cassette, Interaction};
pub use recorder::CassetteRecorder;
pub use replayer::CassetteReplayer;

/// Errors raised while loading, writing or replaying cassettes.
#[derive(Debug, Error)]
pub enum CassetteError {
    /// The cassette file could not be read or written.
    #[error("cassette I/O failed for {path}: {source}")]
    Io {
        /// Cassette path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The cassette file is not valid cassette YAML.
    #[error("invalid cassette {path}: {source}")]
    Yaml {
        /// Cassette path.
        path: PathBuf,
        /// Underlying error.
        source: serde_yaml::Error,
    },
    /// No recorded interaction remains for a port method.
    #[error("cassette exhausted: no interaction left for {port}::{method} (available: [{available}])")]
    Exhausted {
        /// Port name.
        port: String,
        /// Method name.
        method: String,
        /// Port methods that still have interactions queued.
        available: String,
    },
}
