//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the analysis pipeline and an
//! external system (time, repository transport, LLM). Implementations live in
//! `src/adapters/`.

pub mod clock;
pub mod git;
pub mod llm;

pub use clock::Clock;
pub use git::GitTransport;
pub use llm::{CompletionFuture, CompletionRequest, CompletionResponse, LlmClient};

/// Error type returned across port boundaries.
pub type PortError = Box<dyn std::error::Error + Send + Sync>;
